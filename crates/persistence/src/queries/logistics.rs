// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sdms_domain::Logistics;

use crate::data_models::LogisticsRow;
use crate::diesel_schema::logistics;
use crate::error::PersistenceError;

/// Retrieves a logistics record by id.
///
/// # Errors
///
/// Returns `NotFound` if the record does not exist.
pub fn get_logistics(
    conn: &mut SqliteConnection,
    logistics_id: i64,
) -> Result<Logistics, PersistenceError> {
    logistics::table
        .filter(logistics::logistics_id.eq(logistics_id))
        .select(LogisticsRow::as_select())
        .first::<LogisticsRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Logistics record {logistics_id}")))?
        .into_domain()
}

/// Retrieves the logistics record scheduled for a donation.
///
/// # Errors
///
/// Returns `NotFound` if the donation has no logistics record.
pub fn get_logistics_for_donation(
    conn: &mut SqliteConnection,
    donation_id: i64,
) -> Result<Logistics, PersistenceError> {
    logistics::table
        .filter(logistics::donation_id.eq(donation_id))
        .select(LogisticsRow::as_select())
        .first::<LogisticsRow>(conn)
        .optional()?
        .ok_or_else(|| {
            PersistenceError::NotFound(format!("Logistics record for donation {donation_id}"))
        })?
        .into_domain()
}
