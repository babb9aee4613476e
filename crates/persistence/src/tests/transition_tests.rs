// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sdms::{Command, CoreError, State, TransitionResult, apply};
use sdms_audit::AuditEvent;
use sdms_domain::{
    Donation, DonationStatus, Logistics, LogisticsStatus, NewLogistics, Request, RequestStatus,
};
use time::Duration;

use super::{
    create_donation, create_request, create_seeded_persistence, create_test_actor,
    create_test_cause, item, test_now,
};
use crate::{PersistenceError, SqlitePersistence};

fn approve(before: &State) -> TransitionResult {
    apply(
        before,
        Command::ApproveMatch {
            approved_at: test_now(),
            is_automatic: false,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap()
}

fn seeded_match() -> (SqlitePersistence, Donation, Request) {
    let (mut persistence, donor, recipient) = create_seeded_persistence();
    let donation: Donation =
        create_donation(&mut persistence, donor.participant_id, 1, vec![item("food", 6)], 0);
    let request: Request =
        create_request(&mut persistence, recipient.participant_id, "food", 5, 3);
    (persistence, donation, request)
}

#[test]
fn test_approved_match_is_committed_with_audit_event() {
    let (mut persistence, donation, request) = seeded_match();
    let before: State = State::new()
        .with_donation(donation.clone())
        .with_request(request.clone());
    let result: TransitionResult = approve(&before);

    let event_id: i64 = persistence.persist_transition(&before, &result).unwrap();

    let stored_donation: Donation = persistence.get_donation(donation.donation_id).unwrap();
    assert_eq!(stored_donation.status, DonationStatus::Approved);
    assert_eq!(stored_donation.recipient_id, Some(request.recipient_id));
    assert_eq!(stored_donation.related_request_id, Some(request.request_id));
    assert_eq!(stored_donation.approved_by.as_deref(), Some("admin-1"));
    assert_eq!(stored_donation.approval_date, Some(test_now()));

    let stored_request: Request = persistence.get_request(request.request_id).unwrap();
    assert_eq!(stored_request.status, RequestStatus::Matched);

    let event: AuditEvent = persistence.get_audit_event(event_id).unwrap();
    assert_eq!(event.action.name, "ApproveMatch");
    assert_eq!(event.donation_id, Some(donation.donation_id));
    assert_eq!(event.request_id, Some(request.request_id));
    assert_eq!(event.before.get("donation_status"), Some("pending"));
    assert_eq!(event.after.get("request_status"), Some("matched"));
}

#[test]
fn test_stale_transition_is_rejected_and_writes_nothing() {
    let (mut persistence, donation, request) = seeded_match();
    let before: State = State::new()
        .with_donation(donation.clone())
        .with_request(request.clone());
    let result: TransitionResult = approve(&before);
    persistence.persist_transition(&before, &result).unwrap();

    // A second writer still holding the pending snapshot loses the race.
    let replay = persistence.persist_transition(&before, &result);
    assert!(matches!(
        replay,
        Err(PersistenceError::ConcurrentModification {
            entity: "donation",
            ..
        })
    ));

    let stored_request: Request = persistence.get_request(request.request_id).unwrap();
    assert_eq!(stored_request.status, RequestStatus::Matched);
}

#[test]
fn test_request_conflict_rolls_back_the_donation_update() {
    let (mut persistence, donation, request) = seeded_match();
    let before: State = State::new()
        .with_donation(donation.clone())
        .with_request(request.clone());

    // Cancel the request underneath the pending approval.
    let cancel_before: State = State::new().with_request(request.clone());
    let cancelled: TransitionResult = apply(
        &cancel_before,
        Command::CancelRequest,
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence
        .persist_transition(&cancel_before, &cancelled)
        .unwrap();

    let result: TransitionResult = approve(&before);
    let outcome = persistence.persist_transition(&before, &result);

    assert!(matches!(
        outcome,
        Err(PersistenceError::ConcurrentModification {
            entity: "request",
            ..
        })
    ));
    let stored_donation: Donation = persistence.get_donation(donation.donation_id).unwrap();
    assert_eq!(stored_donation.status, DonationStatus::Pending);
    assert_eq!(stored_donation.recipient_id, None);
}

#[test]
fn test_second_approval_fails_in_the_core_after_reload() {
    let (mut persistence, donation, request) = seeded_match();
    let before: State = State::new()
        .with_donation(donation.clone())
        .with_request(request.clone());
    persistence
        .persist_transition(&before, &approve(&before))
        .unwrap();

    let reloaded: State = State::new()
        .with_donation(persistence.get_donation(donation.donation_id).unwrap())
        .with_request(persistence.get_request(request.request_id).unwrap());
    let second = apply(
        &reloaded,
        Command::ApproveMatch {
            approved_at: test_now(),
            is_automatic: false,
        },
        create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(second, Err(CoreError::DomainViolation(_))));
}

#[test]
fn test_logistics_delivery_moves_the_donation() {
    let (mut persistence, donation, request) = seeded_match();
    let before: State = State::new()
        .with_donation(donation.clone())
        .with_request(request);
    persistence
        .persist_transition(&before, &approve(&before))
        .unwrap();

    let logistics_id: i64 = persistence
        .insert_logistics(
            &NewLogistics {
                donation_id: donation.donation_id,
                pickup_address: String::from("a"),
                delivery_address: String::from("b"),
                pickup_date: test_now() + Duration::hours(24),
                delivery_date: test_now() + Duration::hours(72),
                status: LogisticsStatus::Scheduled,
                notes: String::new(),
            },
            test_now(),
        )
        .unwrap();

    for status in [
        LogisticsStatus::PickedUp,
        LogisticsStatus::InTransit,
        LogisticsStatus::Delivered,
    ] {
        let state: State = State::new()
            .with_donation(persistence.get_donation(donation.donation_id).unwrap())
            .with_logistics(persistence.get_logistics(logistics_id).unwrap());
        let result: TransitionResult = apply(
            &state,
            Command::UpdateLogisticsStatus {
                status,
                updated_at: test_now() + Duration::hours(1),
            },
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();
        persistence.persist_transition(&state, &result).unwrap();
    }

    let record: Logistics = persistence.get_logistics(logistics_id).unwrap();
    assert_eq!(record.status, LogisticsStatus::Delivered);
    assert_eq!(record.updated_at, test_now() + Duration::hours(1));
    assert_eq!(
        persistence
            .get_donation(donation.donation_id)
            .unwrap()
            .status,
        DonationStatus::Delivered
    );
}

#[test]
fn test_unchanged_entities_are_not_written() {
    let (mut persistence, donation, request) = seeded_match();
    // Approving a donation whose request is already closed leaves the request alone.
    let mut closed: Request = request.clone();
    closed.status = RequestStatus::Cancelled;
    let before: State = State::new()
        .with_donation(donation.clone())
        .with_request(closed);
    let result: TransitionResult = apply(
        &before,
        Command::ApproveDonation {
            approved_at: test_now(),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    // The stored request is still pending; a write would have failed its check.
    persistence.persist_transition(&before, &result).unwrap();
    assert_eq!(
        persistence
            .get_donation(donation.donation_id)
            .unwrap()
            .status,
        DonationStatus::Approved
    );
    assert_eq!(
        persistence.get_request(request.request_id).unwrap().status,
        RequestStatus::Pending
    );
}
