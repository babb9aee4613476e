// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sdms::effects::{
    approval_notifications, delivery_notifications, rejection_notifications,
    submission_notification,
};
use sdms::{Command, State, TransitionResult, creation_event};
use sdms_audit::{AuditEvent, Cause, StateSnapshot};
use sdms_domain::{
    Donation, DonationItem, DonationStatus, ItemCondition, NewDonation, ParticipantRole, Request,
    ScoredRequest, TrackingId, validate_donation_items,
};
use sdms_persistence::{Persistence, PersistenceError};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CreateDonationRequest, CreateDonationResponse, DonationItemInput, DonationTransitionResponse,
    RejectDonationRequest, UpdateDonationStatusRequest,
};
use crate::side_effects::{SideEffectReport, SideEffectSink, deliver_notifications};

use super::matching::rank_requests_for;
use super::{commit, committed, load_participant_with_role};

/// How many random tracking ids are tried before giving up.
pub const TRACKING_ID_ATTEMPTS: usize = 5;

fn load_donation(persistence: &mut Persistence, donation_id: i64) -> Result<Donation, ApiError> {
    persistence
        .get_donation(donation_id)
        .map_err(|e| translate_persistence_error("Donation", e))
}

fn load_related_request(
    persistence: &mut Persistence,
    donation: &Donation,
) -> Result<Option<Request>, ApiError> {
    donation
        .related_request_id
        .map(|request_id| {
            persistence
                .get_request(request_id)
                .map_err(|e| translate_persistence_error("Request", e))
        })
        .transpose()
}

fn to_domain_items(items: Vec<DonationItemInput>) -> Result<Vec<DonationItem>, ApiError> {
    items
        .into_iter()
        .map(|input| {
            let condition: ItemCondition =
                input.condition.parse().map_err(translate_domain_error)?;
            Ok(DonationItem::new(
                input.item_name.trim(),
                input.item_type.trim(),
                input.quantity,
                condition,
            ))
        })
        .collect()
}

/// Submits a donation for review.
///
/// A unique tracking id is generated. When the donation names a related
/// request, that request's recipient is told about it. The response
/// carries the requests the donation could be matched with.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is neither the donor nor an admin
/// - The donor does not exist or is not a donor
/// - The items are empty or malformed
/// - The related request does not exist
/// - No free tracking id was found or storage fails
pub fn create_donation(
    persistence: &mut Persistence,
    sink: &mut dyn SideEffectSink,
    request: CreateDonationRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<CreateDonationResponse, ApiError> {
    AuthorizationService::authorize_self_or_admin(
        authenticated_actor,
        request.donor_id,
        "create_donation",
    )?;

    let items: Vec<DonationItem> = to_domain_items(request.items)?;
    validate_donation_items(&items).map_err(translate_domain_error)?;
    load_participant_with_role(persistence, request.donor_id, ParticipantRole::Donor)?;

    let related_request: Option<Request> = request
        .related_request_id
        .map(|request_id| {
            persistence
                .get_request(request_id)
                .map_err(|e| translate_persistence_error("Request", e))
        })
        .transpose()?;

    let mut new_donation: NewDonation = NewDonation {
        tracking_id: TrackingId::from_seed(rand::random::<u64>()),
        donor_id: request.donor_id,
        items,
        donation_date: now,
        description: request.description.filter(|d| !d.trim().is_empty()),
        related_request_id: request.related_request_id,
    };

    let mut attempt: usize = 1;
    let (donation, audit_event_id): (Donation, i64) = loop {
        let event: AuditEvent = creation_event(
            authenticated_actor.to_audit_actor(),
            cause.clone(),
            "CreateDonation",
            format!(
                "Donation {} of {} submitted by donor {}",
                new_donation.tracking_id,
                new_donation.items.len(),
                new_donation.donor_id
            ),
            StateSnapshot::from_pairs(&[(
                "donation_status",
                DonationStatus::Pending.to_string(),
            )]),
        );
        match persistence.create_donation(&new_donation, &event) {
            Ok(stored) => break stored,
            Err(PersistenceError::Duplicate(message)) if attempt < TRACKING_ID_ATTEMPTS => {
                debug!(attempt, error = %message, "Tracking id collision, retrying");
                new_donation.tracking_id = TrackingId::from_seed(rand::random::<u64>());
                attempt += 1;
            }
            Err(e) => return Err(translate_persistence_error("Donation", e)),
        }
    };

    info!(
        donation_id = donation.donation_id,
        tracking_id = %donation.tracking_id,
        donor_id = donation.donor_id,
        "Created donation"
    );

    let mut side_effects: SideEffectReport = SideEffectReport::new();
    if let Some(related) = &related_request {
        deliver_notifications(
            sink,
            persistence,
            &[submission_notification(&donation, related)],
            now,
            &mut side_effects,
        );
    }

    // The donation is committed; a failed match preview only empties the list.
    let potential_matches: Vec<ScoredRequest> = rank_requests_for(persistence, &donation, now)
        .unwrap_or_else(|e| {
            warn!(donation_id = donation.donation_id, error = %e, "Match preview failed");
            Vec::new()
        });

    Ok(CreateDonationResponse {
        donation,
        potential_matches,
        audit_event_id,
        side_effects,
    })
}

/// Lists donations awaiting review, oldest first.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or storage fails.
pub fn list_pending_donations(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<Donation>, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "list_pending_donations")?;
    persistence
        .list_pending_donations()
        .map_err(|e| translate_persistence_error("Donation", e))
}

/// Retrieves a donation visible to the actor.
///
/// Admins see every donation; the donor and the matched recipient see
/// their own.
///
/// # Errors
///
/// Returns an error if the donation does not exist or the actor is not
/// involved with it.
pub fn get_donation(
    persistence: &mut Persistence,
    donation_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Donation, ApiError> {
    let donation: Donation = load_donation(persistence, donation_id)?;
    AuthorizationService::authorize_any_of_or_admin(
        authenticated_actor,
        &[Some(donation.donor_id), donation.recipient_id],
        "get_donation",
    )?;
    Ok(donation)
}

/// Looks up a donation by its public tracking id.
///
/// # Errors
///
/// Returns an error if the tracking id is malformed or unknown.
pub fn track_donation(
    persistence: &mut Persistence,
    tracking_id: &str,
) -> Result<Donation, ApiError> {
    let tracking_id: TrackingId = TrackingId::parse(tracking_id).map_err(translate_domain_error)?;
    persistence
        .get_donation_by_tracking_id(&tracking_id)
        .map_err(|e| translate_persistence_error("Donation", e))
}

/// Approves a pending donation on its own.
///
/// A related request is credited with the donation's quantity of the
/// request's item type. The donor is notified.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the donation does not
/// exist, or the donation is no longer pending.
pub fn approve_donation(
    persistence: &mut Persistence,
    sink: &mut dyn SideEffectSink,
    donation_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<DonationTransitionResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "approve_donation")?;

    let donation: Donation = load_donation(persistence, donation_id)?;
    let related: Option<Request> = load_related_request(persistence, &donation)?;
    let mut before: State = State::new().with_donation(donation);
    if let Some(request) = related {
        before = before.with_request(request);
    }

    let (result, audit_event_id): (TransitionResult, i64) = commit(
        persistence,
        &before,
        Command::ApproveDonation { approved_at: now },
        authenticated_actor.to_audit_actor(),
        cause,
    )?;
    let donation: Donation = committed(result.new_state.donation, "donation")?;
    let request: Option<Request> = result.new_state.request;

    info!(donation_id, audit_event_id, "Approved donation");

    let mut side_effects: SideEffectReport = SideEffectReport::new();
    deliver_notifications(
        sink,
        persistence,
        &approval_notifications(&donation, request.as_ref()),
        now,
        &mut side_effects,
    );

    Ok(DonationTransitionResponse {
        donation,
        request,
        audit_event_id,
        side_effects,
    })
}

/// Rejects a pending donation with a reason.
///
/// A related request that was matched returns to pending unless another
/// donation holds its match. The donor is notified.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the reason is empty,
/// the donation does not exist, or the donation is no longer pending.
pub fn reject_donation(
    persistence: &mut Persistence,
    sink: &mut dyn SideEffectSink,
    donation_id: i64,
    request: RejectDonationRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<DonationTransitionResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "reject_donation")?;

    let donation: Donation = load_donation(persistence, donation_id)?;
    let related: Option<Request> = load_related_request(persistence, &donation)?;
    let release_request: bool = match related.as_ref() {
        Some(related) => {
            persistence
                .count_match_holders(related.request_id, donation_id)
                .map_err(|e| translate_persistence_error("Donation", e))?
                == 0
        }
        None => false,
    };
    let mut before: State = State::new().with_donation(donation);
    if let Some(related) = related {
        before = before.with_request(related);
    }

    let reason: String = request.reason;
    let (result, audit_event_id): (TransitionResult, i64) = commit(
        persistence,
        &before,
        Command::RejectDonation {
            reason: reason.clone(),
            release_request,
        },
        authenticated_actor.to_audit_actor(),
        cause,
    )?;
    let donation: Donation = committed(result.new_state.donation, "donation")?;
    let related: Option<Request> = result.new_state.request;

    info!(donation_id, audit_event_id, release_request, "Rejected donation");

    // The recipient keeps a match made by another donation and is not told
    // their request is open again.
    let mut side_effects: SideEffectReport = SideEffectReport::new();
    deliver_notifications(
        sink,
        persistence,
        &rejection_notifications(
            &donation,
            related.as_ref().filter(|_| release_request),
            reason.trim(),
        ),
        now,
        &mut side_effects,
    );

    Ok(DonationTransitionResponse {
        donation,
        request: related,
        audit_event_id,
        side_effects,
    })
}

/// Moves a donation along its delivery lifecycle.
///
/// Entering in-transit or delivered notifies the recipient.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the status is unknown
/// or not reachable from the current status, or the donation does not
/// exist.
pub fn update_donation_status(
    persistence: &mut Persistence,
    sink: &mut dyn SideEffectSink,
    donation_id: i64,
    request: UpdateDonationStatusRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<DonationTransitionResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "update_donation_status")?;
    let status: DonationStatus = request.status.parse().map_err(translate_domain_error)?;

    let before: State = State::new().with_donation(load_donation(persistence, donation_id)?);
    let (result, audit_event_id): (TransitionResult, i64) = commit(
        persistence,
        &before,
        Command::UpdateDonationStatus { status },
        authenticated_actor.to_audit_actor(),
        cause,
    )?;
    let donation: Donation = committed(result.new_state.donation, "donation")?;

    info!(donation_id, status = %status, audit_event_id, "Updated donation status");

    let mut side_effects: SideEffectReport = SideEffectReport::new();
    deliver_notifications(
        sink,
        persistence,
        &delivery_notifications(&donation, status),
        now,
        &mut side_effects,
    );

    Ok(DonationTransitionResponse {
        donation,
        request: None,
        audit_event_id,
        side_effects,
    })
}
