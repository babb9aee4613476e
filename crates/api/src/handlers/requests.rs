// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::cmp::Reverse;

use sdms::{Command, State, TransitionResult, creation_event};
use sdms_audit::{AuditEvent, Cause, StateSnapshot};
use sdms_domain::{
    NewRequest, ParticipantRole, Request, RequestStatus, ScoredDonation, Urgency,
    validate_location, validate_request_fields,
};
use sdms_persistence::Persistence;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CreateRequestRequest, CreateRequestResponse, RequestTransitionResponse,
};

use super::matching::rank_donations_for;
use super::{commit, committed, load_participant_with_role};

fn load_request(persistence: &mut Persistence, request_id: i64) -> Result<Request, ApiError> {
    persistence
        .get_request(request_id)
        .map_err(|e| translate_persistence_error("Request", e))
}

/// Submits a request for an item type.
///
/// The response carries the pending donations that could satisfy it.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is neither the recipient nor an admin
/// - The recipient does not exist or is not a recipient
/// - The item type is empty, the quantity is zero or the urgency is unknown
/// - The location is out of range
/// - Storage fails
pub fn create_request(
    persistence: &mut Persistence,
    request: CreateRequestRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<CreateRequestResponse, ApiError> {
    AuthorizationService::authorize_self_or_admin(
        authenticated_actor,
        request.recipient_id,
        "create_request",
    )?;

    validate_request_fields(&request.item_type, request.quantity)
        .map_err(translate_domain_error)?;
    let urgency: Urgency = request.urgency.parse().map_err(translate_domain_error)?;
    if let Some(location) = &request.location {
        validate_location(location).map_err(translate_domain_error)?;
    }
    load_participant_with_role(persistence, request.recipient_id, ParticipantRole::Recipient)?;

    let new_request: NewRequest = NewRequest {
        recipient_id: request.recipient_id,
        item_type: request.item_type.trim().to_string(),
        quantity: request.quantity,
        urgency,
        request_date: now,
        location: request.location,
        description: request.description.filter(|d| !d.trim().is_empty()),
    };

    let event: AuditEvent = creation_event(
        authenticated_actor.to_audit_actor(),
        cause,
        "CreateRequest",
        format!(
            "Recipient {} requested {} units of {} ({urgency})",
            new_request.recipient_id, new_request.quantity, new_request.item_type
        ),
        StateSnapshot::from_pairs(&[("request_status", RequestStatus::Pending.to_string())]),
    );

    let (stored, audit_event_id): (Request, i64) = persistence
        .create_request(&new_request, &event)
        .map_err(|e| translate_persistence_error("Request", e))?;

    info!(
        request_id = stored.request_id,
        recipient_id = stored.recipient_id,
        item_type = %stored.item_type,
        "Created request"
    );

    let potential_matches: Vec<ScoredDonation> = rank_donations_for(persistence, &stored, now)
        .unwrap_or_else(|e| {
            warn!(request_id = stored.request_id, error = %e, "Match preview failed");
            Vec::new()
        });

    Ok(CreateRequestResponse {
        request: stored,
        potential_matches,
        audit_event_id,
    })
}

/// Withdraws an open request.
///
/// # Errors
///
/// Returns an error if the request does not exist, the actor is neither
/// its recipient nor an admin, or the request is already fulfilled or
/// cancelled.
pub fn cancel_request(
    persistence: &mut Persistence,
    request_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<RequestTransitionResponse, ApiError> {
    let request: Request = load_request(persistence, request_id)?;
    AuthorizationService::authorize_self_or_admin(
        authenticated_actor,
        request.recipient_id,
        "cancel_request",
    )?;

    let before: State = State::new().with_request(request);
    let (result, audit_event_id): (TransitionResult, i64) = commit(
        persistence,
        &before,
        Command::CancelRequest,
        authenticated_actor.to_audit_actor(),
        cause,
    )?;

    info!(request_id, audit_event_id, "Cancelled request");

    Ok(RequestTransitionResponse {
        request: committed(result.new_state.request, "request")?,
        audit_event_id,
    })
}

/// Lists pending requests, most urgent first.
///
/// Requests of equal urgency are listed oldest first, then by id.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn list_available_requests(persistence: &mut Persistence) -> Result<Vec<Request>, ApiError> {
    let mut requests: Vec<Request> = persistence
        .list_pending_requests()
        .map_err(|e| translate_persistence_error("Request", e))?;
    requests.sort_by_key(|r| (Reverse(r.urgency.points()), r.request_date, r.request_id));
    Ok(requests)
}

/// Retrieves a request.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the request does not exist.
pub fn get_request(persistence: &mut Persistence, request_id: i64) -> Result<Request, ApiError> {
    load_request(persistence, request_id)
}
