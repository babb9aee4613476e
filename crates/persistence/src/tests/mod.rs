// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod transition_tests;

use sdms::creation_event;
use sdms_audit::{Actor, AuditEvent, Cause, StateSnapshot};
use sdms_domain::{
    Donation, DonationItem, ItemCondition, Location, NewDonation, NewParticipant, NewRequest,
    Participant, ParticipantRole, Request, TrackingId, Urgency,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::SqlitePersistence;

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 12:00 UTC)
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-1"), String::from("operator"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_event(name: &str) -> AuditEvent {
    creation_event(
        create_test_actor(),
        create_test_cause(),
        name,
        format!("{name} for test"),
        StateSnapshot::new(String::from("status=pending")),
    )
}

pub fn create_participant(
    persistence: &mut SqlitePersistence,
    name: &str,
    role: ParticipantRole,
    location: Option<Location>,
) -> Participant {
    let new_participant: NewParticipant = NewParticipant {
        name: name.to_string(),
        role,
        address: Some(format!("{name} street")),
        location,
    };
    persistence
        .create_participant(&new_participant, &create_test_event("RegisterParticipant"))
        .unwrap()
        .0
}

pub fn create_donation(
    persistence: &mut SqlitePersistence,
    donor_id: i64,
    seed: u64,
    items: Vec<DonationItem>,
    days_old: i64,
) -> Donation {
    let new_donation: NewDonation = NewDonation {
        tracking_id: TrackingId::from_seed(seed),
        donor_id,
        items,
        donation_date: test_now() - Duration::days(days_old),
        description: Some(String::from("Test donation")),
        related_request_id: None,
    };
    persistence
        .create_donation(&new_donation, &create_test_event("CreateDonation"))
        .unwrap()
        .0
}

pub fn create_request(
    persistence: &mut SqlitePersistence,
    recipient_id: i64,
    item_type: &str,
    quantity: u32,
    days_old: i64,
) -> Request {
    let new_request: NewRequest = NewRequest {
        recipient_id,
        item_type: item_type.to_string(),
        quantity,
        urgency: Urgency::High,
        request_date: test_now() - Duration::days(days_old),
        location: None,
        description: None,
    };
    persistence
        .create_request(&new_request, &create_test_event("CreateRequest"))
        .unwrap()
        .0
}

pub fn item(item_type: &str, quantity: u32) -> DonationItem {
    DonationItem::new(
        &format!("{item_type} box"),
        item_type,
        quantity,
        ItemCondition::Good,
    )
}

/// A fresh database holding one donor (id 1) and one recipient (id 2).
pub fn create_seeded_persistence() -> (SqlitePersistence, Participant, Participant) {
    let mut persistence: SqlitePersistence = SqlitePersistence::new_in_memory().unwrap();
    let donor: Participant = create_participant(
        &mut persistence,
        "Dana Donor",
        ParticipantRole::Donor,
        Some(Location::new(0.0, 0.0)),
    );
    let recipient: Participant = create_participant(
        &mut persistence,
        "Rey Recipient",
        ParticipantRole::Recipient,
        None,
    );
    (persistence, donor, recipient)
}
