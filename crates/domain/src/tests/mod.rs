// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod error;
mod types;

use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::{
    Donation, DonationItem, DonationStatus, ItemCondition, Request, RequestStatus, TrackingId,
    Urgency,
};

/// Fixed evaluation instant shared by all scoring tests.
pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 12:00 UTC)
}

pub fn days_ago(days: i64) -> OffsetDateTime {
    test_now() - Duration::days(days)
}

pub fn item(item_type: &str, quantity: u32) -> DonationItem {
    DonationItem::new(
        &format!("{item_type} box"),
        item_type,
        quantity,
        ItemCondition::Good,
    )
}

pub fn create_test_donation(donation_id: i64, items: Vec<DonationItem>) -> Donation {
    Donation {
        donation_id,
        tracking_id: TrackingId::from_seed(u64::try_from(donation_id).unwrap()),
        donor_id: 1,
        recipient_id: None,
        items,
        status: DonationStatus::Pending,
        donation_date: test_now(),
        description: None,
        related_request_id: None,
        logistics_id: None,
        approved_by: None,
        approval_date: None,
        rejection_reason: None,
    }
}

pub fn create_test_request(
    request_id: i64,
    item_type: &str,
    quantity: u32,
    urgency: Urgency,
    request_date: OffsetDateTime,
) -> Request {
    Request {
        request_id,
        recipient_id: 2,
        item_type: item_type.to_string(),
        quantity,
        urgency,
        status: RequestStatus::Pending,
        request_date,
        quantity_fulfilled: 0,
        location: None,
        description: None,
    }
}
