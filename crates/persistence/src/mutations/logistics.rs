// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sdms_domain::{Logistics, LogisticsStatus, NewLogistics};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::logistics;
use crate::error::PersistenceError;
use crate::mutations::donations::set_donation_logistics_id;

/// Stores a logistics record and links it from its donation.
///
/// # Errors
///
/// Returns `Duplicate` if the donation already has a logistics record,
/// or another error if either write fails. Nothing is written on error.
pub fn insert_logistics(
    conn: &mut SqliteConnection,
    record: &NewLogistics,
    created_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let created_at: String = format_timestamp(created_at)?;

        diesel::insert_into(logistics::table)
            .values((
                logistics::donation_id.eq(record.donation_id),
                logistics::pickup_address.eq(&record.pickup_address),
                logistics::delivery_address.eq(&record.delivery_address),
                logistics::pickup_date.eq(format_timestamp(record.pickup_date)?),
                logistics::delivery_date.eq(format_timestamp(record.delivery_date)?),
                logistics::status.eq(record.status.as_str()),
                logistics::notes.eq(&record.notes),
                logistics::created_at.eq(&created_at),
                logistics::updated_at.eq(&created_at),
            ))
            .execute(conn)?;

        let logistics_id: i64 = get_last_insert_rowid(conn)?;
        set_donation_logistics_id(conn, record.donation_id, logistics_id)?;

        info!(
            logistics_id,
            donation_id = record.donation_id,
            "Scheduled logistics"
        );
        Ok(logistics_id)
    })
}

/// Writes a logistics record's status if its stored status still equals
/// `expected`.
///
/// # Errors
///
/// Returns `ConcurrentModification` if the stored status differs.
pub fn update_logistics_if_status(
    conn: &mut SqliteConnection,
    expected: LogisticsStatus,
    record: &Logistics,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        logistics::table
            .filter(logistics::logistics_id.eq(record.logistics_id))
            .filter(logistics::status.eq(expected.as_str())),
    )
    .set((
        logistics::status.eq(record.status.as_str()),
        logistics::updated_at.eq(format_timestamp(record.updated_at)?),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::ConcurrentModification {
            entity: "logistics",
            id: record.logistics_id,
        });
    }

    debug!(
        logistics_id = record.logistics_id,
        from = %expected,
        to = %record.status,
        "Updated logistics"
    );
    Ok(())
}
