// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sdms_domain::{Location, ParticipantRole};

use crate::{
    ApiError, AuthenticatedActor, ParticipantResponse, RegisterParticipantRequest, Role,
    get_participant, register_participant,
};

use super::helpers::{create_test_admin, create_test_cause, setup_test_persistence};

fn registration(name: &str, role: &str) -> RegisterParticipantRequest {
    RegisterParticipantRequest {
        name: name.to_string(),
        role: role.to_string(),
        address: Some(String::from("1 Harbour Road")),
        location: Some(Location::new(10.0, 20.0)),
    }
}

#[test]
fn test_register_participant_records_audit_event() {
    let (mut persistence, _, _) = setup_test_persistence();

    let response: ParticipantResponse = register_participant(
        &mut persistence,
        registration("  Food Bank  ", "recipient"),
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(response.participant.name, "Food Bank");
    assert_eq!(response.participant.role, ParticipantRole::Recipient);
    assert_eq!(
        response.participant.address.as_deref(),
        Some("1 Harbour Road")
    );
    let event_id: i64 = response.audit_event_id.unwrap();
    let event = persistence.get_audit_event(event_id).unwrap();
    assert_eq!(event.action.name, "RegisterParticipant");

    let fetched: ParticipantResponse =
        get_participant(&mut persistence, response.participant.participant_id).unwrap();
    assert_eq!(fetched.participant, response.participant);
    assert!(fetched.audit_event_id.is_none());
}

#[test]
fn test_blank_address_is_not_stored() {
    let (mut persistence, _, _) = setup_test_persistence();
    let mut request: RegisterParticipantRequest = registration("Walk-in", "donor");
    request.address = Some(String::from("  "));

    let response: ParticipantResponse = register_participant(
        &mut persistence,
        request,
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap();

    assert!(response.participant.address.is_none());
}

#[test]
fn test_register_participant_validates_input() {
    let (mut persistence, _, _) = setup_test_persistence();
    let admin: AuthenticatedActor = create_test_admin();

    let empty_name = register_participant(
        &mut persistence,
        registration(" ", "donor"),
        &admin,
        create_test_cause(),
    );
    assert!(matches!(
        empty_name,
        Err(ApiError::InvalidInput { field, .. }) if field == "name"
    ));

    let bad_role = register_participant(
        &mut persistence,
        registration("Someone", "volunteer"),
        &admin,
        create_test_cause(),
    );
    assert!(matches!(
        bad_role,
        Err(ApiError::InvalidInput { field, .. }) if field == "role"
    ));

    let mut off_map: RegisterParticipantRequest = registration("Someone", "donor");
    off_map.location = Some(Location::new(0.0, 181.0));
    let bad_location =
        register_participant(&mut persistence, off_map, &admin, create_test_cause());
    assert!(matches!(
        bad_location,
        Err(ApiError::InvalidInput { field, .. }) if field == "location"
    ));
}

#[test]
fn test_only_admins_register_admins() {
    let (mut persistence, _, _) = setup_test_persistence();
    let newcomer: AuthenticatedActor = AuthenticatedActor::new(String::from("42"), Role::Donor);

    let as_admin = register_participant(
        &mut persistence,
        registration("Mallory", "admin"),
        &newcomer,
        create_test_cause(),
    );
    assert!(matches!(as_admin, Err(ApiError::Unauthorized { .. })));

    let as_donor = register_participant(
        &mut persistence,
        registration("Mallory", "donor"),
        &newcomer,
        create_test_cause(),
    );
    assert!(as_donor.is_ok());
}

#[test]
fn test_get_participant_not_found() {
    let (mut persistence, _, _) = setup_test_persistence();

    let result = get_participant(&mut persistence, 404);

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { resource_type, .. }) if resource_type == "Participant"
    ));
}
