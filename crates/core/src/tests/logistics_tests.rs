// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    create_test_actor, create_test_cause, create_test_donation, create_test_logistics, test_now,
};
use crate::{Command, CoreError, State, TransitionResult, apply};
use sdms_domain::{DomainError, Donation, DonationStatus, LogisticsStatus};
use time::Duration;

fn advance(state: &State, status: LogisticsStatus) -> Result<TransitionResult, CoreError> {
    apply(
        state,
        Command::UpdateLogisticsStatus {
            status,
            updated_at: test_now() + Duration::hours(1),
        },
        create_test_actor(),
        create_test_cause(),
    )
}

fn approved_donation() -> Donation {
    let mut donation: Donation = create_test_donation();
    donation.status = DonationStatus::Approved;
    donation.recipient_id = Some(2);
    donation
}

#[test]
fn test_pickup_leaves_donation_unchanged() {
    let state: State = State::new()
        .with_donation(approved_donation())
        .with_logistics(create_test_logistics(LogisticsStatus::Scheduled));

    let result: TransitionResult = advance(&state, LogisticsStatus::PickedUp).unwrap();

    let logistics = result.new_state.logistics.as_ref().unwrap();
    assert_eq!(logistics.status, LogisticsStatus::PickedUp);
    assert_eq!(logistics.updated_at, test_now() + Duration::hours(1));
    assert_eq!(
        result.new_state.donation.as_ref().unwrap().status,
        DonationStatus::Approved
    );
}

#[test]
fn test_in_transit_moves_donation_in_transit() {
    let state: State = State::new()
        .with_donation(approved_donation())
        .with_logistics(create_test_logistics(LogisticsStatus::PickedUp));

    let result: TransitionResult = advance(&state, LogisticsStatus::InTransit).unwrap();

    assert_eq!(
        result.new_state.donation.as_ref().unwrap().status,
        DonationStatus::InTransit
    );
    assert_eq!(result.audit_event.after.get("logistics_status"), Some("in-transit"));
    assert_eq!(result.audit_event.after.get("donation_status"), Some("in-transit"));
}

#[test]
fn test_delivered_moves_donation_delivered() {
    let mut donation: Donation = approved_donation();
    donation.status = DonationStatus::InTransit;
    let state: State = State::new()
        .with_donation(donation)
        .with_logistics(create_test_logistics(LogisticsStatus::InTransit));

    let result: TransitionResult = advance(&state, LogisticsStatus::Delivered).unwrap();

    assert_eq!(
        result.new_state.donation.as_ref().unwrap().status,
        DonationStatus::Delivered
    );
}

#[test]
fn test_donation_already_in_target_status_is_not_moved_again() {
    let mut donation: Donation = approved_donation();
    donation.status = DonationStatus::InTransit;
    let state: State = State::new()
        .with_donation(donation)
        .with_logistics(create_test_logistics(LogisticsStatus::PickedUp));

    let result: TransitionResult = advance(&state, LogisticsStatus::InTransit).unwrap();

    assert_eq!(
        result.new_state.donation.as_ref().unwrap().status,
        DonationStatus::InTransit
    );
}

#[test]
fn test_logistics_cannot_skip_steps() {
    let state: State = State::new()
        .with_donation(approved_donation())
        .with_logistics(create_test_logistics(LogisticsStatus::Scheduled));

    let result = advance(&state, LogisticsStatus::Delivered);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidLogisticsTransition {
                logistics_id: 30,
                from: LogisticsStatus::Scheduled,
                to: LogisticsStatus::Delivered,
            }
        ))
    );
}

#[test]
fn test_logistics_update_without_record_fails() {
    let state: State = State::new().with_donation(approved_donation());

    assert_eq!(
        advance(&state, LogisticsStatus::PickedUp),
        Err(CoreError::MissingEntity {
            command: "UpdateLogisticsStatus",
            entity: "logistics record",
        })
    );
}
