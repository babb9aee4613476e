// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations.
//!
//! Every operation authorizes the actor first, then loads what it needs,
//! then either reads or applies a core command and commits it with
//! [`Persistence::persist_transition`]. Side effects run after the commit.

mod audit;
mod donations;
mod logistics;
mod matching;
mod notifications;
mod participants;
mod requests;

pub use audit::get_audit_event;
pub use donations::{
    TRACKING_ID_ATTEMPTS, approve_donation, create_donation, get_donation, list_pending_donations,
    reject_donation, track_donation, update_donation_status,
};
pub use logistics::{get_logistics_for_donation, update_logistics_status};
pub use matching::{
    approve_match, auto_match_donations, find_matches_for_donation, find_matches_for_request,
};
pub use notifications::{
    list_notifications, mark_all_notifications_read, mark_notification_read, unread_count,
};
pub use participants::{get_participant, register_participant};
pub use requests::{cancel_request, create_request, get_request, list_available_requests};

use sdms::{Command, State, TransitionResult, apply};
use sdms_audit::{Actor, Cause};
use sdms_domain::{DomainError, Participant, ParticipantRole};
use sdms_persistence::Persistence;

use crate::error::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};

/// Loads a participant, mapping absence to `ResourceNotFound`.
fn load_participant(
    persistence: &mut Persistence,
    participant_id: i64,
) -> Result<Participant, ApiError> {
    persistence
        .get_participant(participant_id)
        .map_err(|e| translate_persistence_error("Participant", e))
}

/// Loads a participant and checks its role.
fn load_participant_with_role(
    persistence: &mut Persistence,
    participant_id: i64,
    role: ParticipantRole,
) -> Result<Participant, ApiError> {
    let participant: Participant = load_participant(persistence, participant_id)?;
    if participant.role != role {
        return Err(translate_domain_error(
            DomainError::ParticipantRoleMismatch {
                participant_id,
                expected: role.as_str(),
            },
        ));
    }
    Ok(participant)
}

/// Applies a command and commits the result with its audit event.
///
/// # Returns
///
/// The transition result and the audit event id.
fn commit(
    persistence: &mut Persistence,
    before: &State,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<(TransitionResult, i64), ApiError> {
    let result: TransitionResult =
        apply(before, command, actor, cause).map_err(translate_core_error)?;
    let event_id: i64 = persistence
        .persist_transition(before, &result)
        .map_err(|e| translate_persistence_error("Transition", e))?;
    Ok((result, event_id))
}

/// Extracts an entity a successful transition always carries.
fn committed<T>(entity: Option<T>, name: &str) -> Result<T, ApiError> {
    entity.ok_or_else(|| ApiError::Internal {
        message: format!("Committed transition is missing its {name}"),
    })
}
