// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sdms_audit::AuditEvent;
use sdms_persistence::Persistence;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::AuditEventResponse;

/// Retrieves an audit event.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the event does not
/// exist.
pub fn get_audit_event(
    persistence: &mut Persistence,
    event_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<AuditEventResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "get_audit_event")?;
    let event: AuditEvent = persistence
        .get_audit_event(event_id)
        .map_err(|e| translate_persistence_error("AuditEvent", e))?;

    Ok(AuditEventResponse {
        event_id: event.event_id.unwrap_or(event_id),
        actor_id: event.actor.id,
        actor_type: event.actor.actor_type,
        cause_id: event.cause.id,
        cause_description: event.cause.description,
        action_name: event.action.name,
        action_details: event.action.details,
        before_snapshot: event.before.data,
        after_snapshot: event.after.data,
        donation_id: event.donation_id,
        request_id: event.request_id,
    })
}
