// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sdms_audit::AuditEvent;
use sdms_domain::NewParticipant;
use time::OffsetDateTime;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::participants;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;

/// Registers a participant and records its creation event.
///
/// # Returns
///
/// The new participant id and the audit event id.
///
/// # Errors
///
/// Returns an error if either insert fails. Nothing is written in that case.
pub fn insert_participant(
    conn: &mut SqliteConnection,
    participant: &NewParticipant,
    event: &AuditEvent,
) -> Result<(i64, i64), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let created_at: String = format_timestamp(OffsetDateTime::now_utc())?;

        diesel::insert_into(participants::table)
            .values((
                participants::name.eq(participant.name.trim()),
                participants::role.eq(participant.role.as_str()),
                participants::address.eq(participant.address.as_deref()),
                participants::lat.eq(participant.location.map(|l| l.lat)),
                participants::lng.eq(participant.location.map(|l| l.lng)),
                participants::created_at.eq(created_at),
            ))
            .execute(conn)?;

        let participant_id: i64 = get_last_insert_rowid(conn)?;
        let event_id: i64 = persist_audit_event(conn, event, None, None)?;

        info!(
            participant_id,
            role = participant.role.as_str(),
            "Registered participant"
        );
        Ok((participant_id, event_id))
    })
}
