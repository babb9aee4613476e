// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Match discovery and approval.

use std::collections::{BTreeSet, HashMap};

use sdms::effects::{UNKNOWN_DONOR_NAME, match_notifications, plan_match_logistics};
use sdms::{Command, State, TransitionResult};
use sdms_audit::{Actor, Cause};
use sdms_domain::{
    Donation, Location, NewLogistics, Participant, Request, RequestCandidate, ScoredDonation,
    ScoredRequest, rank_donations_for_request, rank_requests_for_donation, select_auto_match,
};
use sdms_persistence::Persistence;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::{
    ApprovalOutcome, ApproveMatchRequest, AutoMatchEntry, AutoMatchFailure, AutoMatchReport,
    AutoMatchRequest,
};
use crate::side_effects::{SideEffectReport, SideEffectSink, deliver_notifications};

use super::{commit, committed, load_participant};

/// Ranks pending requests for an already loaded donation.
///
/// Proximity uses the donor's location and each request's own location,
/// falling back to its recipient's location.
pub(super) fn rank_requests_for(
    persistence: &mut Persistence,
    donation: &Donation,
    now: OffsetDateTime,
) -> Result<Vec<ScoredRequest>, ApiError> {
    let donor_location: Option<Location> =
        load_participant(persistence, donation.donor_id)?.location;

    let requests: Vec<Request> = persistence
        .list_candidate_requests(&donation.item_types(), donation.total_quantity())
        .map_err(|e| translate_persistence_error("Request", e))?;

    let recipient_ids: Vec<i64> = requests
        .iter()
        .map(|r| r.recipient_id)
        .collect::<BTreeSet<i64>>()
        .into_iter()
        .collect();
    let recipient_locations: HashMap<i64, Location> = persistence
        .get_participants(&recipient_ids)
        .map_err(|e| translate_persistence_error("Participant", e))?
        .into_iter()
        .filter_map(|p| p.location.map(|location| (p.participant_id, location)))
        .collect();

    let candidates: Vec<RequestCandidate> = requests
        .into_iter()
        .map(|request| {
            let recipient_location: Option<Location> =
                recipient_locations.get(&request.recipient_id).copied();
            RequestCandidate::new(request, recipient_location)
        })
        .collect();

    debug!(
        donation_id = donation.donation_id,
        candidates = candidates.len(),
        "Ranking requests for donation"
    );

    Ok(rank_requests_for_donation(
        donation,
        donor_location.as_ref(),
        candidates,
        now,
    ))
}

/// Ranks pending donations for an already loaded request.
pub(super) fn rank_donations_for(
    persistence: &mut Persistence,
    request: &Request,
    now: OffsetDateTime,
) -> Result<Vec<ScoredDonation>, ApiError> {
    let donations: Vec<Donation> = persistence
        .list_candidate_donations(&request.item_type)
        .map_err(|e| translate_persistence_error("Donation", e))?;
    Ok(rank_donations_for_request(request, donations, now))
}

/// Finds and ranks the pending requests a donation could serve.
///
/// # Arguments
///
/// * `persistence` - The storage handle
/// * `donation_id` - The donation to place
/// * `authenticated_actor` - The caller, who must be an admin
/// * `now` - The evaluation instant
///
/// # Returns
///
/// Candidate requests, best first. Equal scores are ordered oldest
/// request first, then by lower id.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the donation does not
/// exist, or storage fails.
pub fn find_matches_for_donation(
    persistence: &mut Persistence,
    donation_id: i64,
    authenticated_actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<Vec<ScoredRequest>, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "find_matches_for_donation")?;
    let donation: Donation = persistence
        .get_donation(donation_id)
        .map_err(|e| translate_persistence_error("Donation", e))?;
    rank_requests_for(persistence, &donation, now)
}

/// Finds and ranks the pending donations that could satisfy a request.
///
/// Only donations holding at least the requested quantity of the
/// requested type qualify.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the request does not
/// exist, or storage fails.
pub fn find_matches_for_request(
    persistence: &mut Persistence,
    request_id: i64,
    authenticated_actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<Vec<ScoredDonation>, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "find_matches_for_request")?;
    let request: Request = persistence
        .get_request(request_id)
        .map_err(|e| translate_persistence_error("Request", e))?;
    rank_donations_for(persistence, &request, now)
}

/// Approves a match between a donation and a request.
///
/// The donation and request updates are committed together with their
/// audit event. Notifications and the logistics record follow the commit
/// and never undo it; failures are listed in the outcome.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The donation or request does not exist (donation checked first)
/// - Either is no longer in a state that allows the match
/// - The donation holds nothing of the requested type
/// - Another writer changed either entity first
pub fn approve_match(
    persistence: &mut Persistence,
    sink: &mut dyn SideEffectSink,
    request: ApproveMatchRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApprovalOutcome, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "approve_match")?;
    commit_match(
        persistence,
        sink,
        request,
        authenticated_actor.to_audit_actor(),
        cause,
        now,
    )
}

fn commit_match(
    persistence: &mut Persistence,
    sink: &mut dyn SideEffectSink,
    decision: ApproveMatchRequest,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApprovalOutcome, ApiError> {
    let donation: Donation = persistence
        .get_donation(decision.donation_id)
        .map_err(|e| translate_persistence_error("Donation", e))?;
    let request: Request = persistence
        .get_request(decision.request_id)
        .map_err(|e| translate_persistence_error("Request", e))?;

    let before: State = State::new().with_donation(donation).with_request(request);
    let (result, audit_event_id): (TransitionResult, i64) = commit(
        persistence,
        &before,
        Command::ApproveMatch {
            approved_at: now,
            is_automatic: decision.is_automatic,
        },
        actor,
        cause,
    )?;
    let mut donation: Donation = committed(result.new_state.donation, "donation")?;
    let request: Request = committed(result.new_state.request, "request")?;

    info!(
        donation_id = donation.donation_id,
        request_id = request.request_id,
        is_automatic = decision.is_automatic,
        audit_event_id,
        "Match approved"
    );

    let mut side_effects: SideEffectReport = SideEffectReport::new();

    let donor: Option<Participant> = lookup_for_effects(persistence, donation.donor_id);
    let recipient: Option<Participant> = lookup_for_effects(persistence, request.recipient_id);
    let donor_name: &str = donor.as_ref().map_or(UNKNOWN_DONOR_NAME, |d| d.name.as_str());

    let notification_ids: Vec<i64> = deliver_notifications(
        sink,
        persistence,
        &match_notifications(&donation, &request, donor_name, decision.is_automatic),
        now,
        &mut side_effects,
    );

    let plan: NewLogistics =
        plan_match_logistics(&donation, &request, donor.as_ref(), recipient.as_ref(), now);
    let logistics_id: Option<i64> = match sink.create_logistics(persistence, &plan, now) {
        Ok(id) => {
            donation.logistics_id = Some(id);
            Some(id)
        }
        Err(failure) => {
            side_effects.record(failure);
            None
        }
    };

    Ok(ApprovalOutcome {
        donation,
        request,
        audit_event_id,
        notification_ids,
        logistics_id,
        side_effects,
    })
}

/// Loads a participant for message text and addresses.
///
/// A failure here only degrades the side effects, so it is logged and
/// swallowed.
fn lookup_for_effects(persistence: &mut Persistence, participant_id: i64) -> Option<Participant> {
    persistence
        .get_participant(participant_id)
        .map_err(|e| warn!(participant_id, error = %e, "Participant lookup failed after commit"))
        .ok()
}

/// Approves every pending donation whose best request scores strictly
/// above the threshold.
///
/// Donations are scanned oldest first. Approvals are recorded as made by
/// the system actor. A donation that fails is reported and the scan moves
/// on to the next one.
///
/// # Arguments
///
/// * `persistence` - The storage handle
/// * `sink` - Where match side effects are delivered
/// * `request` - The run parameters
/// * `authenticated_actor` - The caller, who must be an admin
/// * `cause` - The cause recorded on every approval
/// * `now` - The evaluation instant
/// * `default_threshold` - Used when the request names no threshold
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the pending
/// donations cannot be listed. Per-donation errors are reported in the
/// result instead.
pub fn auto_match_donations(
    persistence: &mut Persistence,
    sink: &mut dyn SideEffectSink,
    request: AutoMatchRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
    default_threshold: i64,
) -> Result<AutoMatchReport, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "auto_match_donations")?;
    let threshold: i64 = request.threshold.unwrap_or(default_threshold);

    let pending: Vec<Donation> = persistence
        .list_pending_donations()
        .map_err(|e| translate_persistence_error("Donation", e))?;

    let mut report: AutoMatchReport = AutoMatchReport {
        threshold,
        scanned: pending.len(),
        matches: Vec::new(),
        failures: Vec::new(),
    };

    for donation in pending {
        let donation_id: i64 = donation.donation_id;
        let outcome: Result<Option<AutoMatchEntry>, ApiError> =
            auto_match_one(persistence, sink, &donation, threshold, &cause, now);
        match outcome {
            Ok(Some(entry)) => report.matches.push(entry),
            Ok(None) => {}
            Err(e) => {
                warn!(donation_id, error = %e, "Auto-match failed for donation");
                report.failures.push(AutoMatchFailure {
                    donation_id,
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        triggered_by = %authenticated_actor.id,
        threshold,
        scanned = report.scanned,
        matched = report.matches.len(),
        failed = report.failures.len(),
        "Auto-match run finished"
    );

    Ok(report)
}

fn auto_match_one(
    persistence: &mut Persistence,
    sink: &mut dyn SideEffectSink,
    donation: &Donation,
    threshold: i64,
    cause: &Cause,
    now: OffsetDateTime,
) -> Result<Option<AutoMatchEntry>, ApiError> {
    let ranked: Vec<ScoredRequest> = rank_requests_for(persistence, donation, now)?;
    let Some(top) = select_auto_match(&ranked, threshold) else {
        return Ok(None);
    };

    let outcome: ApprovalOutcome = commit_match(
        persistence,
        sink,
        ApproveMatchRequest {
            donation_id: donation.donation_id,
            request_id: top.request.request_id,
            is_automatic: true,
        },
        Actor::system(),
        cause.clone(),
        now,
    )?;

    Ok(Some(AutoMatchEntry {
        donation_id: donation.donation_id,
        request_id: top.request.request_id,
        score: top.match_score,
        side_effects_complete: outcome.is_complete(),
    }))
}
