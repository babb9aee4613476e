// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! API boundary for the SDMS donation matching engine.
//!
//! Every operation takes the storage handle, the authenticated actor and,
//! for state changes, the cause and the evaluation instant. Operations
//! that produce notifications or logistics records also take a
//! [`SideEffectSink`].

mod auth;
mod error;
mod handlers;
mod request_response;
mod side_effects;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate_stub};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    TRACKING_ID_ATTEMPTS, approve_donation, approve_match, auto_match_donations, cancel_request,
    create_donation, create_request, find_matches_for_donation, find_matches_for_request,
    get_audit_event, get_donation, get_logistics_for_donation, get_participant, get_request,
    list_available_requests, list_notifications, list_pending_donations,
    mark_all_notifications_read, mark_notification_read, register_participant, reject_donation,
    track_donation, unread_count, update_donation_status, update_logistics_status,
};
pub use request_response::{
    ApprovalOutcome, ApproveMatchRequest, AuditEventResponse, AutoMatchEntry, AutoMatchFailure,
    AutoMatchReport, AutoMatchRequest, CreateDonationRequest, CreateDonationResponse,
    CreateRequestRequest, CreateRequestResponse, DonationItemInput, DonationTransitionResponse,
    LogisticsTransitionResponse, MarkAllReadResponse, NotificationListResponse,
    ParticipantResponse, RegisterParticipantRequest, RejectDonationRequest,
    RequestTransitionResponse, UnreadCountResponse, UpdateDonationStatusRequest,
    UpdateLogisticsStatusRequest,
};
pub use side_effects::{
    PersistedSideEffects, SideEffectError, SideEffectReport, SideEffectSink,
    deliver_notifications,
};
