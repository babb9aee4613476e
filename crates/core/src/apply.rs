// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{State, TransitionResult};
use sdms_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use sdms_domain::{
    Donation, DonationStatus, DomainError, Logistics, LogisticsStatus, Request, RequestStatus,
    validate_rejection_reason,
};
use time::OffsetDateTime;

/// Applies a command to the current state, producing a new state and audit event.
///
/// The input state is never modified. Persisting the result, including the
/// check that nothing changed underneath it, is the caller's job.
///
/// # Arguments
///
/// * `state` - The entities the command operates on (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - An entity the command needs is missing from `state`
/// - A requested status change is not allowed by the lifecycle rules
/// - The donation holds no item of the request's type (`ApproveMatch`)
/// - The rejection reason is empty (`RejectDonation`)
pub fn apply(
    state: &State,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let name: &'static str = command.name();
    let mut new_state: State = state.clone();

    let details: String = match command {
        Command::ApproveMatch {
            approved_at,
            is_automatic,
        } => {
            let donation: &mut Donation = require_donation(&mut new_state.donation, name)?;
            let request: &mut Request = require_request(&mut new_state.request, name)?;
            approve_match(donation, request, &actor, approved_at)?;
            format!(
                "{} donation {} with request {}",
                if is_automatic {
                    "Automatically matched"
                } else {
                    "Matched"
                },
                donation.donation_id,
                request.request_id
            )
        }
        Command::ApproveDonation { approved_at } => {
            let donation: &mut Donation = require_donation(&mut new_state.donation, name)?;
            transition_donation(donation, DonationStatus::Approved)?;
            donation.approved_by = Some(actor.id.clone());
            donation.approval_date = Some(approved_at);

            if let Some(request) = new_state.request.as_mut() {
                credit_request(request, donation)?;
            }
            let credited: String = new_state.request.as_ref().map_or_else(String::new, |r| {
                format!("; request {} is {}", r.request_id, r.status)
            });
            format!("Approved donation {}{credited}", donation.donation_id)
        }
        Command::RejectDonation {
            reason,
            release_request,
        } => {
            validate_rejection_reason(&reason)?;
            let donation: &mut Donation = require_donation(&mut new_state.donation, name)?;
            transition_donation(donation, DonationStatus::Rejected)?;
            donation.rejection_reason = Some(reason.trim().to_string());

            if let Some(request) = new_state
                .request
                .as_mut()
                .filter(|r| release_request && r.status == RequestStatus::Matched)
            {
                transition_request(request, RequestStatus::Pending)?;
            }
            format!("Rejected donation {}: {}", donation.donation_id, reason.trim())
        }
        Command::UpdateDonationStatus { status } => {
            let donation: &mut Donation = require_donation(&mut new_state.donation, name)?;
            if matches!(status, DonationStatus::Approved | DonationStatus::Rejected) {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidDonationTransition {
                        donation_id: donation.donation_id,
                        from: donation.status,
                        to: status,
                    },
                ));
            }
            let from: DonationStatus = donation.status;
            transition_donation(donation, status)?;
            format!(
                "Donation {} moved from {from} to {status}",
                donation.donation_id
            )
        }
        Command::CancelRequest => {
            let request: &mut Request = require_request(&mut new_state.request, name)?;
            transition_request(request, RequestStatus::Cancelled)?;
            format!("Cancelled request {}", request.request_id)
        }
        Command::UpdateLogisticsStatus { status, updated_at } => {
            let logistics: &mut Logistics = require_logistics(&mut new_state.logistics, name)?;
            let from: LogisticsStatus = logistics.status;
            if !from.can_transition_to(status) {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidLogisticsTransition {
                        logistics_id: logistics.logistics_id,
                        from,
                        to: status,
                    },
                ));
            }
            logistics.status = status;
            logistics.updated_at = updated_at;

            // The donation follows along when the new step implies a
            // donation status it can still reach.
            if let Some((target, donation)) = status
                .implied_donation_status()
                .zip(new_state.donation.as_mut())
                .filter(|(target, donation)| donation.status != *target)
            {
                transition_donation(donation, target)?;
            }
            format!(
                "Logistics record {} moved from {from} to {status}",
                logistics.logistics_id
            )
        }
    };

    let before: StateSnapshot = state.to_snapshot();
    let after: StateSnapshot = new_state.to_snapshot();
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(name), Some(details)),
        before,
        after,
    )
    .with_subjects(
        new_state.donation.as_ref().map(|d| d.donation_id),
        new_state.request.as_ref().map(|r| r.request_id),
    );

    Ok(TransitionResult {
        new_state,
        audit_event,
    })
}

fn approve_match(
    donation: &mut Donation,
    request: &mut Request,
    actor: &Actor,
    approved_at: OffsetDateTime,
) -> Result<(), CoreError> {
    transition_donation(donation, DonationStatus::Approved)?;
    transition_request(request, RequestStatus::Matched)?;
    if !donation.has_item_type(&request.item_type) {
        return Err(CoreError::DomainViolation(DomainError::IncompatibleMatch {
            donation_id: donation.donation_id,
            request_id: request.request_id,
            item_type: request.item_type.clone(),
        }));
    }

    donation.recipient_id = Some(request.recipient_id);
    donation.approved_by = Some(actor.id.clone());
    donation.approval_date = Some(approved_at);
    donation.related_request_id = Some(request.request_id);
    Ok(())
}

/// Adds the donation's units of the requested type to the request.
///
/// A request that can no longer be fulfilled (cancelled or already
/// fulfilled) is left untouched.
fn credit_request(request: &mut Request, donation: &Donation) -> Result<(), CoreError> {
    if !request.status.is_open() {
        return Ok(());
    }
    let credited: u32 = request
        .quantity_fulfilled
        .saturating_add(donation.quantity_of_type(&request.item_type));
    let target: RequestStatus = if credited >= request.quantity {
        RequestStatus::Fulfilled
    } else {
        RequestStatus::PartiallyFulfilled
    };
    if request.status != target {
        transition_request(request, target)?;
    }
    request.quantity_fulfilled = credited;
    Ok(())
}

fn transition_donation(donation: &mut Donation, to: DonationStatus) -> Result<(), CoreError> {
    if !donation.status.can_transition_to(to) {
        return Err(CoreError::DomainViolation(
            DomainError::InvalidDonationTransition {
                donation_id: donation.donation_id,
                from: donation.status,
                to,
            },
        ));
    }
    donation.status = to;
    Ok(())
}

fn transition_request(request: &mut Request, to: RequestStatus) -> Result<(), CoreError> {
    if !request.status.can_transition_to(to) {
        return Err(CoreError::DomainViolation(
            DomainError::InvalidRequestTransition {
                request_id: request.request_id,
                from: request.status,
                to,
            },
        ));
    }
    request.status = to;
    Ok(())
}

fn require_donation<'a>(
    donation: &'a mut Option<Donation>,
    command: &'static str,
) -> Result<&'a mut Donation, CoreError> {
    donation.as_mut().ok_or(CoreError::MissingEntity {
        command,
        entity: "donation",
    })
}

fn require_request<'a>(
    request: &'a mut Option<Request>,
    command: &'static str,
) -> Result<&'a mut Request, CoreError> {
    request.as_mut().ok_or(CoreError::MissingEntity {
        command,
        entity: "request",
    })
}

fn require_logistics<'a>(
    logistics: &'a mut Option<Logistics>,
    command: &'static str,
) -> Result<&'a mut Logistics, CoreError> {
    logistics.as_mut().ok_or(CoreError::MissingEntity {
        command,
        entity: "logistics record",
    })
}
