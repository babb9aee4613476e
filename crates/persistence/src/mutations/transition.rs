// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence of core transitions.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sdms::{State, TransitionResult};
use sdms_domain::{Donation, Logistics, Request};
use tracing::info;

use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::mutations::donations::update_donation_if_status;
use crate::mutations::logistics::update_logistics_if_status;
use crate::mutations::requests::update_request_if_unchanged;

/// Persists a transition and its audit event atomically.
///
/// Each entity present in both `before` and the result is written with a
/// conditional update against its `before` values. Entities that did not
/// change are not written.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `before` - The state the transition was computed from
/// * `result` - The transition result
///
/// # Returns
///
/// The audit event id.
///
/// # Errors
///
/// Returns `ConcurrentModification` if any entity changed after it was
/// loaded, or another error if a write fails. Nothing is written on error.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    before: &State,
    result: &TransitionResult,
) -> Result<i64, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let after: &State = &result.new_state;

        let donations: Option<(&Donation, &Donation)> =
            before.donation.as_ref().zip(after.donation.as_ref());
        if let Some((old, new)) = donations.filter(|(old, new)| old != new) {
            update_donation_if_status(conn, old.status, new)?;
        }

        let requests: Option<(&Request, &Request)> =
            before.request.as_ref().zip(after.request.as_ref());
        if let Some((old, new)) = requests.filter(|(old, new)| old != new) {
            update_request_if_unchanged(conn, old, new)?;
        }

        let records: Option<(&Logistics, &Logistics)> =
            before.logistics.as_ref().zip(after.logistics.as_ref());
        if let Some((old, new)) = records.filter(|(old, new)| old != new) {
            update_logistics_if_status(conn, old.status, new)?;
        }

        let event_id: i64 = persist_audit_event(conn, &result.audit_event, None, None)?;
        info!(
            event_id,
            action = %result.audit_event.action.name,
            "Persisted transition"
        );
        Ok(event_id)
    })
}
