// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sdms_domain::Participant;

use crate::data_models::ParticipantRow;
use crate::diesel_schema::participants;
use crate::error::PersistenceError;

/// Retrieves a participant by id.
///
/// # Errors
///
/// Returns `NotFound` if the participant does not exist.
pub fn get_participant(
    conn: &mut SqliteConnection,
    participant_id: i64,
) -> Result<Participant, PersistenceError> {
    participants::table
        .filter(participants::participant_id.eq(participant_id))
        .select(ParticipantRow::as_select())
        .first::<ParticipantRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Participant {participant_id}")))?
        .into_domain()
}

/// Retrieves every participant whose id is in `participant_ids`.
///
/// Unknown ids are skipped.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_participants(
    conn: &mut SqliteConnection,
    participant_ids: &[i64],
) -> Result<Vec<Participant>, PersistenceError> {
    participants::table
        .filter(participants::participant_id.eq_any(participant_ids.to_vec()))
        .order(participants::participant_id.asc())
        .select(ParticipantRow::as_select())
        .load::<ParticipantRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("get_participants: {e}")))?
        .into_iter()
        .map(ParticipantRow::into_domain)
        .collect()
}
