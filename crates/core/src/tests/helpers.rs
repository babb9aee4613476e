// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sdms_audit::{Actor, Cause};
use sdms_domain::{
    Donation, DonationItem, DonationStatus, ItemCondition, Logistics, LogisticsStatus, Request,
    RequestStatus, TrackingId, Urgency,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 12:00 UTC)
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("operator"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Admin request"))
}

pub fn create_test_donation() -> Donation {
    Donation {
        donation_id: 10,
        tracking_id: TrackingId::from_seed(1234),
        donor_id: 1,
        recipient_id: None,
        items: vec![
            DonationItem::new("Canned beans", "food", 6, ItemCondition::New),
            DonationItem::new("Picture books", "books", 4, ItemCondition::Good),
        ],
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

pub fn create_test_request() -> Request {
    Request {
        request_id: 20,
        recipient_id: 2,
        item_type: String::from("food"),
        quantity: 5,
        urgency: Urgency::High,
        status: RequestStatus::Pending,
        request_date: test_now(),
        quantity_fulfilled: 0,
        location: None,
        description: None,
    }
}

pub fn create_test_logistics(status: LogisticsStatus) -> Logistics {
    Logistics {
        logistics_id: 30,
        donation_id: 10,
        pickup_address: String::from("1 Donor Way"),
        delivery_address: String::from("2 Recipient Rd"),
        pickup_date: test_now(),
        delivery_date: test_now(),
        status,
        notes: String::new(),
        updated_at: test_now(),
    }
}
