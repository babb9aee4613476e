// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use serde::{Deserialize, Serialize};

use sdms_domain::{
    Donation, Location, Logistics, Notification, Participant, Request, ScoredDonation,
    ScoredRequest,
};

use crate::side_effects::SideEffectReport;

/// API request to register a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterParticipantRequest {
    /// Display name.
    pub name: String,
    /// `donor`, `recipient` or `admin`.
    pub role: String,
    /// Postal address used for pickup or delivery.
    pub address: Option<String>,
    /// Coordinates used for proximity scoring.
    pub location: Option<Location>,
}

/// API response carrying a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantResponse {
    /// The participant.
    pub participant: Participant,
    /// The creation audit event, for newly registered participants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_event_id: Option<i64>,
}

/// One item of a new donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationItemInput {
    /// What the item is.
    pub item_name: String,
    /// The category matched against request item types.
    pub item_type: String,
    /// Number of units.
    pub quantity: u32,
    /// `new`, `good`, `fair` or `poor`.
    pub condition: String,
}

/// API request to submit a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDonationRequest {
    /// The donating participant.
    pub donor_id: i64,
    /// The donated items, at least one.
    pub items: Vec<DonationItemInput>,
    /// Free text.
    pub description: Option<String>,
    /// The request this donation responds to, if any.
    pub related_request_id: Option<i64>,
}

/// API response for a submitted donation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDonationResponse {
    /// The stored donation.
    pub donation: Donation,
    /// Pending requests this donation could satisfy, best first.
    pub potential_matches: Vec<ScoredRequest>,
    /// The creation audit event.
    pub audit_event_id: i64,
    /// Side effects that did not complete.
    pub side_effects: SideEffectReport,
}

/// API request to reject a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectDonationRequest {
    /// Why the donation is rejected.
    pub reason: String,
}

/// API request to move a donation along its delivery lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDonationStatusRequest {
    /// The target status.
    pub status: String,
}

/// API response for a donation state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationTransitionResponse {
    /// The donation after the change.
    pub donation: Donation,
    /// The related request after the change, when one was involved.
    pub request: Option<Request>,
    /// The audit event recording the change.
    pub audit_event_id: i64,
    /// Side effects that did not complete.
    pub side_effects: SideEffectReport,
}

/// API request to submit a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequestRequest {
    /// The requesting participant.
    pub recipient_id: i64,
    /// The requested item type.
    pub item_type: String,
    /// Number of units requested.
    pub quantity: u32,
    /// `low`, `medium`, `high` or `critical`.
    pub urgency: String,
    /// Delivery coordinates, when different from the recipient's.
    pub location: Option<Location>,
    /// Free text.
    pub description: Option<String>,
}

/// API response for a submitted request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequestResponse {
    /// The stored request.
    pub request: Request,
    /// Pending donations that could satisfy this request, best first.
    pub potential_matches: Vec<ScoredDonation>,
    /// The creation audit event.
    pub audit_event_id: i64,
}

/// API response for a request state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTransitionResponse {
    /// The request after the change.
    pub request: Request,
    /// The audit event recording the change.
    pub audit_event_id: i64,
}

/// API request to approve a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveMatchRequest {
    /// The donation to match.
    pub donation_id: i64,
    /// The request to match.
    pub request_id: i64,
    /// Whether the auto-matcher is approving.
    #[serde(default)]
    pub is_automatic: bool,
}

/// The result of an approved match.
///
/// The match itself is committed whenever this value exists. Its
/// notifications and logistics record may still have failed; see
/// [`ApprovalOutcome::is_complete`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalOutcome {
    /// The approved donation.
    pub donation: Donation,
    /// The matched request.
    pub request: Request,
    /// The audit event recording the match.
    pub audit_event_id: i64,
    /// Notifications that were stored.
    pub notification_ids: Vec<i64>,
    /// The logistics record, if it was created.
    pub logistics_id: Option<i64>,
    /// Side effects that did not complete.
    pub side_effects: SideEffectReport,
}

impl ApprovalOutcome {
    /// Whether the match and all of its side effects completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.side_effects.is_complete()
    }
}

/// API request to run the auto-matcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoMatchRequest {
    /// Scores strictly above this are approved. Uses the configured
    /// default when absent.
    pub threshold: Option<i64>,
}

/// A match made by the auto-matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoMatchEntry {
    /// The matched donation.
    pub donation_id: i64,
    /// The matched request.
    pub request_id: i64,
    /// The winning score.
    pub score: i64,
    /// Whether every side effect of the approval completed.
    pub side_effects_complete: bool,
}

/// A donation the auto-matcher could not process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoMatchFailure {
    /// The donation that failed.
    pub donation_id: i64,
    /// What went wrong.
    pub message: String,
}

/// The result of an auto-matcher run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoMatchReport {
    /// The threshold used.
    pub threshold: i64,
    /// Number of pending donations scanned.
    pub scanned: usize,
    /// Matches approved, in scan order.
    pub matches: Vec<AutoMatchEntry>,
    /// Donations that failed, in scan order.
    pub failures: Vec<AutoMatchFailure>,
}

/// API response listing notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationListResponse {
    /// Notifications, newest first.
    pub notifications: Vec<Notification>,
    /// Unread notifications, regardless of the listing filter.
    pub unread_count: i64,
}

/// API response with an unread notification count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    /// The participant.
    pub participant_id: i64,
    /// Unread notifications.
    pub unread_count: i64,
}

/// API response for marking all notifications read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    /// The participant.
    pub participant_id: i64,
    /// Notifications that changed from unread to read.
    pub updated: usize,
}

/// API request to advance a logistics record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLogisticsStatusRequest {
    /// The target status.
    pub status: String,
}

/// API response for a logistics state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsTransitionResponse {
    /// The logistics record after the change.
    pub logistics: Logistics,
    /// The donation after the change.
    pub donation: Donation,
    /// The audit event recording the change.
    pub audit_event_id: i64,
    /// Side effects that did not complete.
    pub side_effects: SideEffectReport,
}

/// API response for an audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventResponse {
    /// The event ID.
    pub event_id: i64,
    /// The actor ID.
    pub actor_id: String,
    /// The actor type.
    pub actor_type: String,
    /// The cause ID.
    pub cause_id: String,
    /// The cause description.
    pub cause_description: String,
    /// The action name.
    pub action_name: String,
    /// The action details.
    pub action_details: Option<String>,
    /// The state before the action.
    pub before_snapshot: String,
    /// The state after the action.
    pub after_snapshot: String,
    /// The donation the event concerns.
    pub donation_id: Option<i64>,
    /// The request the event concerns.
    pub request_id: Option<i64>,
}
