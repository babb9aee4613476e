// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sdms_audit::AuditEvent;
use sdms_domain::{NewRequest, Request, RequestStatus};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_timestamp, quantity_to_db};
use crate::diesel_schema::requests;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;

/// Inserts a pending request and records its creation event.
///
/// # Returns
///
/// The new request id and the audit event id.
///
/// # Errors
///
/// Returns an error if either insert fails. Nothing is written in that case.
pub fn insert_request(
    conn: &mut SqliteConnection,
    request: &NewRequest,
    event: &AuditEvent,
) -> Result<(i64, i64), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(requests::table)
            .values((
                requests::recipient_id.eq(request.recipient_id),
                requests::item_type.eq(request.item_type.trim()),
                requests::quantity.eq(quantity_to_db(request.quantity)?),
                requests::urgency.eq(request.urgency.as_str()),
                requests::status.eq(RequestStatus::Pending.as_str()),
                requests::request_date.eq(format_timestamp(request.request_date)?),
                requests::quantity_fulfilled.eq(0),
                requests::lat.eq(request.location.map(|l| l.lat)),
                requests::lng.eq(request.location.map(|l| l.lng)),
                requests::description.eq(request.description.as_deref()),
            ))
            .execute(conn)?;

        let request_id: i64 = get_last_insert_rowid(conn)?;
        let event_id: i64 = persist_audit_event(conn, event, None, Some(request_id))?;

        info!(
            request_id,
            item_type = %request.item_type,
            quantity = request.quantity,
            urgency = request.urgency.as_str(),
            "Inserted request"
        );
        Ok((request_id, event_id))
    })
}

/// Writes a request's status and fulfilled quantity if both still hold
/// the values in `before`.
///
/// # Errors
///
/// Returns `ConcurrentModification` if either stored value differs.
pub fn update_request_if_unchanged(
    conn: &mut SqliteConnection,
    before: &Request,
    after: &Request,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        requests::table
            .filter(requests::request_id.eq(before.request_id))
            .filter(requests::status.eq(before.status.as_str()))
            .filter(requests::quantity_fulfilled.eq(quantity_to_db(before.quantity_fulfilled)?)),
    )
    .set((
        requests::status.eq(after.status.as_str()),
        requests::quantity_fulfilled.eq(quantity_to_db(after.quantity_fulfilled)?),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::ConcurrentModification {
            entity: "request",
            id: before.request_id,
        });
    }

    debug!(
        request_id = before.request_id,
        from = %before.status,
        to = %after.status,
        quantity_fulfilled = after.quantity_fulfilled,
        "Updated request"
    );
    Ok(())
}
