// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sdms::effects::delivery_notifications;
use sdms::{Command, State, TransitionResult};
use sdms_audit::Cause;
use sdms_domain::{Donation, DonationStatus, Logistics, LogisticsStatus};
use sdms_persistence::Persistence;
use time::OffsetDateTime;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{LogisticsTransitionResponse, UpdateLogisticsStatusRequest};
use crate::side_effects::{SideEffectReport, SideEffectSink, deliver_notifications};

use super::{commit, committed};

/// Retrieves the logistics record of a donation.
///
/// Admins and the donation's donor and recipient may read it.
///
/// # Errors
///
/// Returns an error if the donation or its logistics record does not
/// exist, or the actor is not involved.
pub fn get_logistics_for_donation(
    persistence: &mut Persistence,
    donation_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Logistics, ApiError> {
    let donation: Donation = persistence
        .get_donation(donation_id)
        .map_err(|e| translate_persistence_error("Donation", e))?;
    AuthorizationService::authorize_any_of_or_admin(
        authenticated_actor,
        &[Some(donation.donor_id), donation.recipient_id],
        "get_logistics_for_donation",
    )?;
    persistence
        .get_logistics_for_donation(donation_id)
        .map_err(|e| translate_persistence_error("Logistics", e))
}

/// Advances a logistics record by one step.
///
/// Entering in-transit or delivered moves the donation along with it and
/// notifies its donor and recipient.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The status is unknown or not the next step
/// - The record or its donation does not exist
/// - The donation cannot follow the change
pub fn update_logistics_status(
    persistence: &mut Persistence,
    sink: &mut dyn SideEffectSink,
    logistics_id: i64,
    request: UpdateLogisticsStatusRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<LogisticsTransitionResponse, ApiError> {
    AuthorizationService::authorize_admin(authenticated_actor, "update_logistics_status")?;
    let status: LogisticsStatus = request.status.parse().map_err(translate_domain_error)?;

    let logistics: Logistics = persistence
        .get_logistics(logistics_id)
        .map_err(|e| translate_persistence_error("Logistics", e))?;
    let donation: Donation = persistence
        .get_donation(logistics.donation_id)
        .map_err(|e| translate_persistence_error("Donation", e))?;
    let previous_status: DonationStatus = donation.status;

    let before: State = State::new()
        .with_donation(donation)
        .with_logistics(logistics);
    let (result, audit_event_id): (TransitionResult, i64) = commit(
        persistence,
        &before,
        Command::UpdateLogisticsStatus {
            status,
            updated_at: now,
        },
        authenticated_actor.to_audit_actor(),
        cause,
    )?;
    let logistics: Logistics = committed(result.new_state.logistics, "logistics record")?;
    let donation: Donation = committed(result.new_state.donation, "donation")?;

    info!(
        logistics_id,
        donation_id = donation.donation_id,
        status = %status,
        audit_event_id,
        "Updated logistics status"
    );

    let mut side_effects: SideEffectReport = SideEffectReport::new();
    if donation.status != previous_status {
        deliver_notifications(
            sink,
            persistence,
            &delivery_notifications(&donation, donation.status),
            now,
            &mut side_effects,
        );
    }

    Ok(LogisticsTransitionResponse {
        logistics,
        donation,
        audit_event_id,
        side_effects,
    })
}
