// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scoring primitives for donation matching.
//!
//! Every function here is pure and works on primitive inputs so the two
//! matching directions can combine them independently:
//!
//! - donation → request: urgency (40%), age (30%), quantity fit (20%) and
//!   an optional proximity term (10%)
//! - request → donation: surplus fit and freshness, both unweighted on a
//!   50 point scale
//!
//! Scores are not normalized. The two directions have different ranges
//! and must not be compared with each other.

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{Location, Urgency};

/// Weight of the urgency term in donation → request scoring.
pub const URGENCY_WEIGHT: f64 = 0.4;
/// Weight of the age term in donation → request scoring.
pub const AGE_WEIGHT: f64 = 0.3;
/// Weight of the quantity fit term in donation → request scoring.
pub const QUANTITY_FIT_WEIGHT: f64 = 0.2;
/// Weight of the proximity term in donation → request scoring.
pub const PROXIMITY_WEIGHT: f64 = 0.1;

/// Raw age points saturate here (reached after 15 days).
pub const AGE_BONUS_CAP: f64 = 30.0;
/// Raw points for a request that consumes the whole donation.
pub const QUANTITY_FIT_SCALE: f64 = 20.0;
/// Raw proximity points at zero distance.
pub const PROXIMITY_SCALE: f64 = 10.0;
/// Distance units per lost proximity point.
pub const PROXIMITY_DISTANCE_DIVISOR: f64 = 10.0;
/// Surplus points for an exact quantity match.
pub const SURPLUS_SCALE: f64 = 50.0;
/// Freshness points for a donation submitted just now.
pub const FRESHNESS_SCALE: f64 = 50.0;
/// Points gained (age) or lost (freshness) per elapsed day.
pub const POINTS_PER_DAY: f64 = 2.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fractional days elapsed between `since` and `now`.
///
/// Timestamps in the future count as zero days old.
#[must_use]
pub fn days_elapsed(since: OffsetDateTime, now: OffsetDateTime) -> f64 {
    let seconds: f64 = (now - since).as_seconds_f64();
    (seconds / SECONDS_PER_DAY).max(0.0)
}

/// Raw urgency points for a request.
#[must_use]
pub fn urgency_points(urgency: Urgency) -> f64 {
    f64::from(urgency.points())
}

/// Raw age points: `min(days * 2, 30)`.
#[must_use]
pub fn age_bonus(days_since_request: f64) -> f64 {
    (days_since_request * POINTS_PER_DAY).min(AGE_BONUS_CAP)
}

/// Raw quantity fit points for the donation → request direction.
///
/// `min(requested / total_donated, 1) * 20`. Returns zero for an empty donation.
#[must_use]
pub fn quantity_fit(requested: u32, total_donated: u32) -> f64 {
    if total_donated == 0 {
        return 0.0;
    }
    (f64::from(requested) / f64::from(total_donated)).min(1.0) * QUANTITY_FIT_SCALE
}

/// Raw surplus fit points for the request → donation direction.
///
/// `max(0, 50 - (available - requested))`, favoring near-exact matches.
#[must_use]
pub fn surplus_fit(available: u32, requested: u32) -> f64 {
    let surplus: f64 = f64::from(available) - f64::from(requested);
    (SURPLUS_SCALE - surplus).max(0.0)
}

/// Raw proximity points: `max(0, 10 - distance / 10)`.
#[must_use]
pub fn proximity_bonus(distance: f64) -> f64 {
    (PROXIMITY_SCALE - distance / PROXIMITY_DISTANCE_DIVISOR).max(0.0)
}

/// Raw proximity points between two optional locations.
///
/// Returns `None` when either side has no location, in which case the
/// proximity term is left out of the score entirely.
#[must_use]
pub fn proximity_between(from: Option<&Location>, to: Option<&Location>) -> Option<f64> {
    match (from, to) {
        (Some(a), Some(b)) => Some(proximity_bonus(a.distance_to(b))),
        _ => None,
    }
}

/// Raw freshness points: `max(0, 50 - days * 2)`.
#[must_use]
pub fn freshness_bonus(days_since_donation: f64) -> f64 {
    (FRESHNESS_SCALE - days_since_donation * POINTS_PER_DAY).max(0.0)
}

/// Rounds a raw score to the nearest integer, half away from zero.
///
/// Scores beyond the `i64` range saturate. A NaN score can only come from
/// coordinates that intake validation refuses; it counts as 0 so the
/// candidate ranks with the weakest instead of failing the whole ranking.
#[must_use]
pub fn round_score(raw: f64) -> i64 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().to_i64().unwrap_or(if raw.is_sign_positive() {
        i64::MAX
    } else {
        i64::MIN
    })
}

/// Weighted components of a donation → request score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestScoreBreakdown {
    /// Urgency points after weighting.
    pub urgency: f64,
    /// Age points after weighting.
    pub age: f64,
    /// Quantity fit points after weighting.
    pub quantity_fit: f64,
    /// Proximity points after weighting, absent without both locations.
    pub proximity: Option<f64>,
}

impl RequestScoreBreakdown {
    /// Unrounded sum of all present terms.
    #[must_use]
    pub fn raw_total(&self) -> f64 {
        self.urgency + self.age + self.quantity_fit + self.proximity.unwrap_or(0.0)
    }

    /// Rounded match score.
    #[must_use]
    pub fn score(&self) -> i64 {
        round_score(self.raw_total())
    }
}

/// Components of a request → donation score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DonationScoreBreakdown {
    /// Surplus fit points.
    pub surplus: f64,
    /// Freshness points.
    pub freshness: f64,
}

impl DonationScoreBreakdown {
    /// Unrounded sum of both terms.
    #[must_use]
    pub fn raw_total(&self) -> f64 {
        self.surplus + self.freshness
    }

    /// Rounded match score.
    #[must_use]
    pub fn score(&self) -> i64 {
        round_score(self.raw_total())
    }
}

/// Scores a request as a destination for a donation.
///
/// # Arguments
///
/// * `urgency` - The request's urgency
/// * `request_date` - When the request was made
/// * `requested` - The requested quantity
/// * `total_donated` - Total quantity across all donation items
/// * `donor_location` - The donor's coordinates, if known
/// * `request_location` - The delivery coordinates, if known
/// * `now` - The evaluation instant
#[must_use]
pub fn score_request_for_donation(
    urgency: Urgency,
    request_date: OffsetDateTime,
    requested: u32,
    total_donated: u32,
    donor_location: Option<&Location>,
    request_location: Option<&Location>,
    now: OffsetDateTime,
) -> RequestScoreBreakdown {
    let days: f64 = days_elapsed(request_date, now);
    RequestScoreBreakdown {
        urgency: urgency_points(urgency) * URGENCY_WEIGHT,
        age: age_bonus(days) * AGE_WEIGHT,
        quantity_fit: quantity_fit(requested, total_donated) * QUANTITY_FIT_WEIGHT,
        proximity: proximity_between(donor_location, request_location)
            .map(|points| points * PROXIMITY_WEIGHT),
    }
}

/// Scores a donation as a source for a request.
///
/// # Arguments
///
/// * `available` - Quantity of the requested type held by the donation
/// * `requested` - The requested quantity
/// * `donation_date` - When the donation was submitted
/// * `now` - The evaluation instant
#[must_use]
pub fn score_donation_for_request(
    available: u32,
    requested: u32,
    donation_date: OffsetDateTime,
    now: OffsetDateTime,
) -> DonationScoreBreakdown {
    DonationScoreBreakdown {
        surplus: surplus_fit(available, requested),
        freshness: freshness_bonus(days_elapsed(donation_date, now)),
    }
}
