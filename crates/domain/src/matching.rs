// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Directional matchers.
//!
//! Matching is not symmetric. Ranking requests for a donation accepts
//! requests that consume only part of the donation and weighs urgency,
//! age, fit and proximity. Ranking donations for a request only accepts
//! donations that can satisfy the full requested quantity and weighs
//! surplus and freshness. The two strategies are kept as separate
//! functions and are tested independently.
//!
//! Both rankers re-apply their candidate predicate, so callers may pass
//! a loosely pre-filtered pool.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::lifecycle::{DonationStatus, RequestStatus};
use crate::scoring::{
    DonationScoreBreakdown, RequestScoreBreakdown, score_donation_for_request,
    score_request_for_donation,
};
use crate::types::{Donation, Location, Request};

/// Scores strictly above this value are approved without human review.
pub const DEFAULT_AUTO_MATCH_THRESHOLD: i64 = 80;

/// A request offered to the donation → request ranker.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestCandidate {
    /// The candidate request.
    pub request: Request,
    /// The recipient's own coordinates, used when the request has none.
    pub recipient_location: Option<Location>,
}

impl RequestCandidate {
    /// Creates a new candidate.
    #[must_use]
    pub const fn new(request: Request, recipient_location: Option<Location>) -> Self {
        Self {
            request,
            recipient_location,
        }
    }

    /// The delivery coordinates used for proximity scoring.
    #[must_use]
    pub fn delivery_location(&self) -> Option<&Location> {
        self.request
            .location
            .as_ref()
            .or(self.recipient_location.as_ref())
    }
}

/// A request ranked for a donation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRequest {
    /// The candidate request.
    pub request: Request,
    /// Rounded match score.
    pub match_score: i64,
    /// Units the donation could contribute: `min(requested, total donated)`.
    pub estimated_fulfillment: u32,
    /// The weighted terms behind the score.
    pub breakdown: RequestScoreBreakdown,
}

/// A donation ranked for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDonation {
    /// The candidate donation.
    pub donation: Donation,
    /// Rounded match score.
    pub match_score: i64,
    /// Units of the requested type held by the donation.
    pub available_quantity: u32,
    /// The terms behind the score.
    pub breakdown: DonationScoreBreakdown,
}

/// Returns whether a request may be matched to a donation.
///
/// The request must be pending, ask for one of the donation's item types,
/// and ask for no more than the donation's total quantity.
#[must_use]
pub fn is_request_candidate(donation: &Donation, request: &Request) -> bool {
    request.status == RequestStatus::Pending
        && donation.has_item_type(&request.item_type)
        && request.quantity <= donation.total_quantity()
}

/// Returns whether a donation may be matched to a request.
///
/// The donation must be pending and hold at least the requested quantity
/// in items of the requested type.
#[must_use]
pub fn is_donation_candidate(request: &Request, donation: &Donation) -> bool {
    donation.status == DonationStatus::Pending
        && donation.has_item_type(&request.item_type)
        && donation.quantity_of_type(&request.item_type) >= request.quantity
}

/// Ranks candidate requests for a donation, best first.
///
/// Equal scores are ordered by older request first, then by lower id.
///
/// # Arguments
///
/// * `donation` - The donation being placed
/// * `donor_location` - The donor's coordinates, if known
/// * `candidates` - Requests to consider; non-candidates are dropped
/// * `now` - The evaluation instant
#[must_use]
pub fn rank_requests_for_donation(
    donation: &Donation,
    donor_location: Option<&Location>,
    candidates: Vec<RequestCandidate>,
    now: OffsetDateTime,
) -> Vec<ScoredRequest> {
    let total_donated: u32 = donation.total_quantity();

    let mut ranked: Vec<ScoredRequest> = candidates
        .into_iter()
        .filter(|candidate| is_request_candidate(donation, &candidate.request))
        .map(|candidate| {
            let breakdown: RequestScoreBreakdown = score_request_for_donation(
                candidate.request.urgency,
                candidate.request.request_date,
                candidate.request.quantity,
                total_donated,
                donor_location,
                candidate.delivery_location(),
                now,
            );
            ScoredRequest {
                estimated_fulfillment: candidate.request.quantity.min(total_donated),
                match_score: breakdown.score(),
                breakdown,
                request: candidate.request,
            }
        })
        .collect();

    ranked.sort_by(compare_scored_requests);
    ranked
}

/// Ranks candidate donations for a request, best first.
///
/// Equal scores are ordered by older donation first, then by lower id.
///
/// # Arguments
///
/// * `request` - The request being satisfied
/// * `candidates` - Donations to consider; non-candidates are dropped
/// * `now` - The evaluation instant
#[must_use]
pub fn rank_donations_for_request(
    request: &Request,
    candidates: Vec<Donation>,
    now: OffsetDateTime,
) -> Vec<ScoredDonation> {
    let mut ranked: Vec<ScoredDonation> = candidates
        .into_iter()
        .filter(|donation| is_donation_candidate(request, donation))
        .map(|donation| {
            let available_quantity: u32 = donation.quantity_of_type(&request.item_type);
            let breakdown: DonationScoreBreakdown = score_donation_for_request(
                available_quantity,
                request.quantity,
                donation.donation_date,
                now,
            );
            ScoredDonation {
                match_score: breakdown.score(),
                available_quantity,
                breakdown,
                donation,
            }
        })
        .collect();

    ranked.sort_by(compare_scored_donations);
    ranked
}

/// Picks the auto-approvable match from a ranked list.
///
/// Only the top-ranked request is considered, and only when its score is
/// strictly greater than `threshold`.
#[must_use]
pub fn select_auto_match(ranked: &[ScoredRequest], threshold: i64) -> Option<&ScoredRequest> {
    ranked.first().filter(|top| top.match_score > threshold)
}

fn compare_scored_requests(a: &ScoredRequest, b: &ScoredRequest) -> Ordering {
    b.match_score
        .cmp(&a.match_score)
        .then_with(|| a.request.request_date.cmp(&b.request.request_date))
        .then_with(|| a.request.request_id.cmp(&b.request.request_id))
}

fn compare_scored_donations(a: &ScoredDonation, b: &ScoredDonation) -> Ordering {
    b.match_score
        .cmp(&a.match_score)
        .then_with(|| a.donation.donation_date.cmp(&b.donation.donation_date))
        .then_with(|| a.donation.donation_id.cmp(&b.donation.donation_id))
}
