// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Planning of the notifications and logistics records that follow a
//! committed transition.
//!
//! Nothing here touches storage. The API layer delivers what is planned
//! here after the transition has been persisted.

use sdms_domain::{
    ADDRESS_PLACEHOLDER, Donation, DonationStatus, LogisticsStatus, NewLogistics,
    NewNotification, NotificationType, Participant, Request,
};
use time::{Duration, OffsetDateTime};

/// Pickup is scheduled this long after a match is approved.
pub const PICKUP_LEAD_TIME: Duration = Duration::hours(24);

/// Delivery is scheduled this long after a match is approved.
pub const DELIVERY_LEAD_TIME: Duration = Duration::hours(72);

/// Name used in notifications when the donor record cannot be found.
pub const UNKNOWN_DONOR_NAME: &str = "an anonymous donor";

fn notify(
    recipient_id: i64,
    message: String,
    notification_type: NotificationType,
    donation: &Donation,
    request_id: Option<i64>,
) -> NewNotification {
    NewNotification {
        recipient_id,
        message,
        notification_type,
        related_donation_id: Some(donation.donation_id),
        related_request_id: request_id,
    }
}

/// Builds the recipient and donor notifications for an approved match.
///
/// The recipient's notification comes first.
#[must_use]
pub fn match_notifications(
    donation: &Donation,
    request: &Request,
    donor_name: &str,
    is_automatic: bool,
) -> [NewNotification; 2] {
    let how: &str = if is_automatic { "automatically " } else { "" };
    [
        notify(
            request.recipient_id,
            format!(
                "Great news! Your request for {} ({} units) has been {how}matched with a donation from {donor_name}. Delivery will be arranged soon.",
                request.item_type, request.quantity
            ),
            NotificationType::DonationMatched,
            donation,
            Some(request.request_id),
        ),
        notify(
            donation.donor_id,
            format!(
                "Your donation of {} has been matched with a recipient. Thank you for your generosity!",
                donation.item_names()
            ),
            NotificationType::DonationMatched,
            donation,
            Some(request.request_id),
        ),
    ]
}

/// Plans the logistics record for an approved match.
///
/// # Arguments
///
/// * `donation` - The matched donation
/// * `request` - The matched request
/// * `donor` - The donor, if their record could be loaded
/// * `recipient` - The recipient, if their record could be loaded
/// * `now` - The approval instant
#[must_use]
pub fn plan_match_logistics(
    donation: &Donation,
    request: &Request,
    donor: Option<&Participant>,
    recipient: Option<&Participant>,
    now: OffsetDateTime,
) -> NewLogistics {
    NewLogistics {
        donation_id: donation.donation_id,
        pickup_address: donor
            .map_or(ADDRESS_PLACEHOLDER, Participant::address_or_placeholder)
            .to_string(),
        delivery_address: recipient
            .map_or(ADDRESS_PLACEHOLDER, Participant::address_or_placeholder)
            .to_string(),
        pickup_date: now + PICKUP_LEAD_TIME,
        delivery_date: now + DELIVERY_LEAD_TIME,
        status: LogisticsStatus::Scheduled,
        notes: format!("Auto-generated for {} donation match", request.item_type),
    }
}

/// Tells a request's recipient that a donor has responded to it.
#[must_use]
pub fn submission_notification(donation: &Donation, request: &Request) -> NewNotification {
    notify(
        request.recipient_id,
        format!(
            "A donor has responded to your {} request! Awaiting admin approval.",
            request.item_type
        ),
        NotificationType::DonationSubmitted,
        donation,
        Some(request.request_id),
    )
}

/// Notifications sent when a donation is approved on its own.
#[must_use]
pub fn approval_notifications(
    donation: &Donation,
    request: Option<&Request>,
) -> Vec<NewNotification> {
    let mut notifications: Vec<NewNotification> = Vec::with_capacity(2);
    if let Some(request) = request {
        notifications.push(notify(
            request.recipient_id,
            format!(
                "Great news! Your request for {} has been approved and will be fulfilled soon.",
                request.item_type
            ),
            NotificationType::RequestFulfilled,
            donation,
            Some(request.request_id),
        ));
    }
    notifications.push(notify(
        donation.donor_id,
        String::from("Your donation has been approved! It will be processed and delivered soon."),
        NotificationType::DonationApproved,
        donation,
        None,
    ));
    notifications
}

/// Notifications sent when a donation is rejected.
#[must_use]
pub fn rejection_notifications(
    donation: &Donation,
    request: Option<&Request>,
    reason: &str,
) -> Vec<NewNotification> {
    let mut notifications: Vec<NewNotification> = Vec::with_capacity(2);
    if let Some(request) = request {
        notifications.push(notify(
            request.recipient_id,
            format!(
                "Unfortunately, the donation response to your {} request was not approved. Your request is still active for other donors.",
                request.item_type
            ),
            NotificationType::DonationRejected,
            donation,
            Some(request.request_id),
        ));
    }
    notifications.push(notify(
        donation.donor_id,
        format!(
            "Your donation was not approved. Reason: {}. Thank you for your willingness to help!",
            reason.trim()
        ),
        NotificationType::DonationRejected,
        donation,
        None,
    ));
    notifications
}

/// Notifications sent when a donation enters `in-transit` or `delivered`.
///
/// Other statuses produce nothing. The recipient is only notified when
/// the donation has one.
#[must_use]
pub fn delivery_notifications(donation: &Donation, status: DonationStatus) -> Vec<NewNotification> {
    let tracking: &str = donation.tracking_id.value();
    let (kind, to_recipient, to_donor) = match status {
        DonationStatus::InTransit => (
            NotificationType::DonationInTransit,
            format!("Your donation is now in transit! Tracking ID: {tracking}"),
            format!("Your donation is now in transit to the recipient. Tracking ID: {tracking}"),
        ),
        DonationStatus::Delivered => (
            NotificationType::DonationDelivered,
            String::from("Your donation has been delivered!"),
            String::from("Great news! Your donation has been successfully delivered."),
        ),
        _ => return Vec::new(),
    };

    let mut notifications: Vec<NewNotification> = Vec::with_capacity(2);
    if let Some(recipient_id) = donation.recipient_id {
        notifications.push(notify(
            recipient_id,
            to_recipient,
            kind,
            donation,
            donation.related_request_id,
        ));
    }
    notifications.push(notify(
        donation.donor_id,
        to_donor,
        kind,
        donation,
        donation.related_request_id,
    ));
    notifications
}
