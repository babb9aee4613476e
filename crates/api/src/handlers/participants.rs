// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sdms::creation_event;
use sdms_audit::{AuditEvent, Cause, StateSnapshot};
use sdms_domain::{NewParticipant, Participant, ParticipantRole, validate_location, validate_participant_name};
use sdms_persistence::Persistence;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{ParticipantResponse, RegisterParticipantRequest};

use super::load_participant;

/// Registers a donor, recipient or administrator.
///
/// Only administrators may register other administrators.
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty or the role is unknown
/// - The location is out of range
/// - A non-admin actor registers an admin
/// - Storage fails
pub fn register_participant(
    persistence: &mut Persistence,
    request: RegisterParticipantRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ParticipantResponse, ApiError> {
    let role: ParticipantRole = request.role.parse().map_err(translate_domain_error)?;
    if role == ParticipantRole::Admin {
        AuthorizationService::authorize_admin(authenticated_actor, "register_admin")?;
    }
    validate_participant_name(&request.name).map_err(translate_domain_error)?;
    if let Some(location) = &request.location {
        validate_location(location).map_err(translate_domain_error)?;
    }

    let new_participant: NewParticipant = NewParticipant {
        name: request.name.trim().to_string(),
        role,
        address: request.address.filter(|a| !a.trim().is_empty()),
        location: request.location,
    };

    let event: AuditEvent = creation_event(
        authenticated_actor.to_audit_actor(),
        cause,
        "RegisterParticipant",
        format!("Registered {} '{}'", role.as_str(), new_participant.name),
        StateSnapshot::from_pairs(&[("role", role.as_str().to_string())]),
    );

    let (participant, event_id): (Participant, i64) = persistence
        .create_participant(&new_participant, &event)
        .map_err(|e| translate_persistence_error("Participant", e))?;

    info!(
        participant_id = participant.participant_id,
        role = role.as_str(),
        "Registered participant"
    );

    Ok(ParticipantResponse {
        participant,
        audit_event_id: Some(event_id),
    })
}

/// Retrieves a participant.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the participant does not exist.
pub fn get_participant(
    persistence: &mut Persistence,
    participant_id: i64,
) -> Result<ParticipantResponse, ApiError> {
    Ok(ParticipantResponse {
        participant: load_participant(persistence, participant_id)?,
        audit_event_id: None,
    })
}
