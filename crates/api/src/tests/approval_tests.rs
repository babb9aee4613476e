// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sdms_audit::AuditEvent;
use sdms_domain::{
    Donation, DonationStatus, Logistics, LogisticsStatus, Notification, NotificationType,
    Participant, Request, RequestStatus,
};
use sdms_persistence::Persistence;
use time::Duration;

use crate::{
    ApiError, ApprovalOutcome, ApproveMatchRequest, PersistedSideEffects, SideEffectError,
    approve_match,
};

use super::helpers::{
    FailingSink, create_test_admin, create_test_cause, days_ago, item_input,
    setup_test_persistence, submit_donation, submit_request, test_now,
};

struct MatchFixture {
    persistence: Persistence,
    donor: Participant,
    recipient: Participant,
    donation: Donation,
    request: Request,
}

fn setup_match() -> MatchFixture {
    let (mut persistence, donor, recipient) = setup_test_persistence();
    let donation: Donation = submit_donation(
        &mut persistence,
        donor.participant_id,
        vec![item_input("food", 6)],
        days_ago(1),
    );
    let request: Request = submit_request(
        &mut persistence,
        recipient.participant_id,
        "food",
        5,
        "high",
        days_ago(3),
    );
    MatchFixture {
        persistence,
        donor,
        recipient,
        donation,
        request,
    }
}

fn decision(donation: &Donation, request: &Request) -> ApproveMatchRequest {
    ApproveMatchRequest {
        donation_id: donation.donation_id,
        request_id: request.request_id,
        is_automatic: false,
    }
}

fn notifications_for(persistence: &mut Persistence, participant: &Participant) -> Vec<Notification> {
    persistence
        .list_notifications(participant.participant_id, false)
        .unwrap()
}

#[test]
fn test_approve_match_commits_and_runs_side_effects() {
    let mut fixture: MatchFixture = setup_match();

    let outcome: ApprovalOutcome = approve_match(
        &mut fixture.persistence,
        &mut PersistedSideEffects,
        decision(&fixture.donation, &fixture.request),
        &create_test_admin(),
        create_test_cause(),
        test_now(),
    )
    .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.notification_ids.len(), 2);
    assert_eq!(outcome.donation.status, DonationStatus::Approved);
    assert_eq!(outcome.request.status, RequestStatus::Matched);
    assert_eq!(outcome.donation.logistics_id, outcome.logistics_id);

    let stored: Donation = fixture
        .persistence
        .get_donation(fixture.donation.donation_id)
        .unwrap();
    assert_eq!(stored.status, DonationStatus::Approved);
    assert_eq!(stored.recipient_id, Some(fixture.recipient.participant_id));
    assert_eq!(stored.related_request_id, Some(fixture.request.request_id));
    assert_eq!(stored.approved_by.as_deref(), Some("admin-123"));
    assert_eq!(stored.approval_date, Some(test_now()));
    assert_eq!(stored.logistics_id, outcome.logistics_id);

    let stored_request: Request = fixture
        .persistence
        .get_request(fixture.request.request_id)
        .unwrap();
    assert_eq!(stored_request.status, RequestStatus::Matched);

    let event: AuditEvent = fixture
        .persistence
        .get_audit_event(outcome.audit_event_id)
        .unwrap();
    assert_eq!(event.action.name, "ApproveMatch");
    assert_eq!(event.donation_id, Some(fixture.donation.donation_id));
    assert_eq!(event.request_id, Some(fixture.request.request_id));
}

#[test]
fn test_match_notifications_name_the_donor_and_items() {
    let mut fixture: MatchFixture = setup_match();

    approve_match(
        &mut fixture.persistence,
        &mut PersistedSideEffects,
        decision(&fixture.donation, &fixture.request),
        &create_test_admin(),
        create_test_cause(),
        test_now(),
    )
    .unwrap();

    let to_recipient: Vec<Notification> =
        notifications_for(&mut fixture.persistence, &fixture.recipient);
    assert_eq!(to_recipient.len(), 1);
    assert_eq!(
        to_recipient[0].message,
        "Great news! Your request for food (5 units) has been matched with a donation from Dana Donor. Delivery will be arranged soon."
    );
    assert_eq!(
        to_recipient[0].notification_type,
        NotificationType::DonationMatched
    );
    assert_eq!(
        to_recipient[0].related_request_id,
        Some(fixture.request.request_id)
    );

    let to_donor: Vec<Notification> = notifications_for(&mut fixture.persistence, &fixture.donor);
    assert_eq!(to_donor.len(), 1);
    assert_eq!(
        to_donor[0].message,
        "Your donation of food box has been matched with a recipient. Thank you for your generosity!"
    );
    assert!(!to_donor[0].read);
}

#[test]
fn test_automatic_match_is_worded_as_automatic() {
    let mut fixture: MatchFixture = setup_match();
    let mut request: ApproveMatchRequest = decision(&fixture.donation, &fixture.request);
    request.is_automatic = true;

    approve_match(
        &mut fixture.persistence,
        &mut PersistedSideEffects,
        request,
        &create_test_admin(),
        create_test_cause(),
        test_now(),
    )
    .unwrap();

    let to_recipient: Vec<Notification> =
        notifications_for(&mut fixture.persistence, &fixture.recipient);
    assert!(to_recipient[0].message.contains("has been automatically matched"));
}

#[test]
fn test_logistics_record_is_scheduled_from_participant_addresses() {
    let mut fixture: MatchFixture = setup_match();

    let outcome: ApprovalOutcome = approve_match(
        &mut fixture.persistence,
        &mut PersistedSideEffects,
        decision(&fixture.donation, &fixture.request),
        &create_test_admin(),
        create_test_cause(),
        test_now(),
    )
    .unwrap();

    let logistics: Logistics = fixture
        .persistence
        .get_logistics_for_donation(fixture.donation.donation_id)
        .unwrap();
    assert_eq!(Some(logistics.logistics_id), outcome.logistics_id);
    assert_eq!(logistics.pickup_address, "Dana Donor street");
    assert_eq!(logistics.delivery_address, "Rey Recipient street");
    assert_eq!(logistics.pickup_date, test_now() + Duration::hours(24));
    assert_eq!(logistics.delivery_date, test_now() + Duration::hours(72));
    assert_eq!(logistics.status, LogisticsStatus::Scheduled);
    assert_eq!(logistics.notes, "Auto-generated for food donation match");
}

#[test]
fn test_second_approval_conflicts_without_writes() {
    let mut fixture: MatchFixture = setup_match();
    let admin = create_test_admin();

    approve_match(
        &mut fixture.persistence,
        &mut PersistedSideEffects,
        decision(&fixture.donation, &fixture.request),
        &admin,
        create_test_cause(),
        test_now(),
    )
    .unwrap();
    let mut sink: FailingSink = FailingSink::default();

    let result = approve_match(
        &mut fixture.persistence,
        &mut sink,
        decision(&fixture.donation, &fixture.request),
        &admin,
        create_test_cause(),
        test_now() + Duration::hours(1),
    );

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
    assert_eq!(sink.attempted_notifications, 0);
    assert_eq!(sink.attempted_logistics, 0);
    let stored: Donation = fixture
        .persistence
        .get_donation(fixture.donation.donation_id)
        .unwrap();
    assert_eq!(stored.approval_date, Some(test_now()));
    assert_eq!(
        notifications_for(&mut fixture.persistence, &fixture.recipient).len(),
        1
    );
}

#[test]
fn test_incompatible_item_type_is_a_rule_violation() {
    let mut fixture: MatchFixture = setup_match();
    let toys: Request = submit_request(
        &mut fixture.persistence,
        fixture.recipient.participant_id,
        "toys",
        2,
        "low",
        test_now(),
    );

    let result = approve_match(
        &mut fixture.persistence,
        &mut PersistedSideEffects,
        ApproveMatchRequest {
            donation_id: fixture.donation.donation_id,
            request_id: toys.request_id,
            is_automatic: false,
        },
        &create_test_admin(),
        create_test_cause(),
        test_now(),
    );

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "compatible_item_type"
    ));
    let stored: Donation = fixture
        .persistence
        .get_donation(fixture.donation.donation_id)
        .unwrap();
    assert_eq!(stored.status, DonationStatus::Pending);
}

#[test]
fn test_missing_donation_is_reported_before_missing_request() {
    let mut fixture: MatchFixture = setup_match();

    let result = approve_match(
        &mut fixture.persistence,
        &mut PersistedSideEffects,
        ApproveMatchRequest {
            donation_id: 999,
            request_id: 998,
            is_automatic: false,
        },
        &create_test_admin(),
        create_test_cause(),
        test_now(),
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { resource_type, .. }) if resource_type == "Donation"
    ));
}

#[test]
fn test_missing_request_is_not_found() {
    let mut fixture: MatchFixture = setup_match();

    let result = approve_match(
        &mut fixture.persistence,
        &mut PersistedSideEffects,
        ApproveMatchRequest {
            donation_id: fixture.donation.donation_id,
            request_id: 998,
            is_automatic: false,
        },
        &create_test_admin(),
        create_test_cause(),
        test_now(),
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { resource_type, .. }) if resource_type == "Request"
    ));
}

#[test]
fn test_failed_notifications_do_not_undo_the_match() {
    let mut fixture: MatchFixture = setup_match();
    let mut sink: FailingSink = FailingSink {
        fail_notifications: true,
        ..FailingSink::default()
    };

    let outcome: ApprovalOutcome = approve_match(
        &mut fixture.persistence,
        &mut sink,
        decision(&fixture.donation, &fixture.request),
        &create_test_admin(),
        create_test_cause(),
        test_now(),
    )
    .unwrap();

    assert!(!outcome.is_complete());
    assert!(outcome.notification_ids.is_empty());
    assert_eq!(sink.attempted_notifications, 2);
    assert_eq!(outcome.side_effects.failures.len(), 2);
    assert!(matches!(
        outcome.side_effects.failures[0],
        SideEffectError::Notification { recipient_id, .. }
            if recipient_id == fixture.recipient.participant_id
    ));
    assert!(outcome.logistics_id.is_some());

    let stored: Donation = fixture
        .persistence
        .get_donation(fixture.donation.donation_id)
        .unwrap();
    assert_eq!(stored.status, DonationStatus::Approved);
    assert!(notifications_for(&mut fixture.persistence, &fixture.recipient).is_empty());
}

#[test]
fn test_every_failed_side_effect_is_reported() {
    let mut fixture: MatchFixture = setup_match();
    let mut sink: FailingSink = FailingSink::failing_everything();

    let outcome: ApprovalOutcome = approve_match(
        &mut fixture.persistence,
        &mut sink,
        decision(&fixture.donation, &fixture.request),
        &create_test_admin(),
        create_test_cause(),
        test_now(),
    )
    .unwrap();

    assert_eq!(outcome.side_effects.failures.len(), 3);
    assert!(matches!(
        outcome.side_effects.failures[2],
        SideEffectError::Logistics { donation_id, .. }
            if donation_id == fixture.donation.donation_id
    ));
    assert!(outcome.logistics_id.is_none());
    assert!(outcome.donation.logistics_id.is_none());

    let stored: Donation = fixture
        .persistence
        .get_donation(fixture.donation.donation_id)
        .unwrap();
    assert_eq!(stored.status, DonationStatus::Approved);
    assert!(stored.logistics_id.is_none());
    let stored_request: Request = fixture
        .persistence
        .get_request(fixture.request.request_id)
        .unwrap();
    assert_eq!(stored_request.status, RequestStatus::Matched);
}

#[test]
fn test_closed_request_cannot_be_matched() {
    let mut fixture: MatchFixture = setup_match();
    let cancelled: Request = crate::cancel_request(
        &mut fixture.persistence,
        fixture.request.request_id,
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap()
    .request;
    assert_eq!(cancelled.status, RequestStatus::Cancelled);

    let result = approve_match(
        &mut fixture.persistence,
        &mut PersistedSideEffects,
        decision(&fixture.donation, &fixture.request),
        &create_test_admin(),
        create_test_cause(),
        test_now(),
    );

    assert!(matches!(result, Err(ApiError::Conflict { .. })));
}
