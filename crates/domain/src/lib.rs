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

mod error;
mod lifecycle;
mod matching;
pub mod scoring;
mod types;
mod validation;

#[cfg(test)]
mod tests;

// Re-export public types
pub use error::DomainError;
pub use lifecycle::{DonationStatus, LogisticsStatus, RequestStatus};
pub use matching::{
    DEFAULT_AUTO_MATCH_THRESHOLD, RequestCandidate, ScoredDonation, ScoredRequest,
    is_donation_candidate, is_request_candidate, rank_donations_for_request,
    rank_requests_for_donation, select_auto_match,
};
pub use scoring::{DonationScoreBreakdown, RequestScoreBreakdown};
pub use types::{
    ADDRESS_PLACEHOLDER, Donation, DonationItem, ItemCondition, Location, Logistics,
    NewDonation, NewLogistics, NewNotification, NewParticipant, NewRequest, Notification,
    NotificationType, Participant, ParticipantRole, Request, TRACKING_ID_LEN,
    TRACKING_ID_PREFIX, TrackingId, Urgency,
};
pub use validation::{
    validate_donation_items, validate_item_type, validate_location, validate_participant_name,
    validate_rejection_reason, validate_request_fields,
};
