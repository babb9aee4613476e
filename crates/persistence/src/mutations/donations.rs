// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sdms_audit::AuditEvent;
use sdms_domain::{Donation, DonationStatus, NewDonation};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_timestamp, quantity_to_db};
use crate::diesel_schema::{donation_items, donations};
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;

/// Inserts a donation with its items and records its creation event.
///
/// Items keep their submitted order.
///
/// # Returns
///
/// The new donation id and the audit event id.
///
/// # Errors
///
/// Returns `Duplicate` if the tracking id is already taken, or another
/// error if any insert fails. Nothing is written on error.
pub fn insert_donation(
    conn: &mut SqliteConnection,
    donation: &NewDonation,
    event: &AuditEvent,
) -> Result<(i64, i64), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(donations::table)
            .values((
                donations::tracking_id.eq(donation.tracking_id.value()),
                donations::donor_id.eq(donation.donor_id),
                donations::status.eq(DonationStatus::Pending.as_str()),
                donations::donation_date.eq(format_timestamp(donation.donation_date)?),
                donations::description.eq(donation.description.as_deref()),
                donations::related_request_id.eq(donation.related_request_id),
            ))
            .execute(conn)?;

        let donation_id: i64 = get_last_insert_rowid(conn)?;

        for (position, item) in (0_i32..).zip(donation.items.iter()) {
            diesel::insert_into(donation_items::table)
                .values((
                    donation_items::donation_id.eq(donation_id),
                    donation_items::position.eq(position),
                    donation_items::item_name.eq(item.item_name.trim()),
                    donation_items::item_type.eq(item.item_type.trim()),
                    donation_items::quantity.eq(quantity_to_db(item.quantity)?),
                    donation_items::item_condition.eq(item.condition.as_str()),
                ))
                .execute(conn)?;
        }

        let event_id: i64 =
            persist_audit_event(conn, event, Some(donation_id), donation.related_request_id)?;

        info!(
            donation_id,
            tracking_id = %donation.tracking_id,
            items = donation.items.len(),
            "Inserted donation"
        );
        Ok((donation_id, event_id))
    })
}

/// Writes a donation's mutable fields if its stored status still equals
/// `expected`.
///
/// # Errors
///
/// Returns `ConcurrentModification` if the stored status differs.
pub fn update_donation_if_status(
    conn: &mut SqliteConnection,
    expected: DonationStatus,
    donation: &Donation,
) -> Result<(), PersistenceError> {
    let approval_date: Option<String> = donation
        .approval_date
        .map(format_timestamp)
        .transpose()?;

    let updated: usize = diesel::update(
        donations::table
            .filter(donations::donation_id.eq(donation.donation_id))
            .filter(donations::status.eq(expected.as_str())),
    )
    .set((
        donations::recipient_id.eq(donation.recipient_id),
        donations::status.eq(donation.status.as_str()),
        donations::related_request_id.eq(donation.related_request_id),
        donations::logistics_id.eq(donation.logistics_id),
        donations::approved_by.eq(donation.approved_by.as_deref()),
        donations::approval_date.eq(approval_date),
        donations::rejection_reason.eq(donation.rejection_reason.as_deref()),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::ConcurrentModification {
            entity: "donation",
            id: donation.donation_id,
        });
    }

    debug!(
        donation_id = donation.donation_id,
        from = %expected,
        to = %donation.status,
        "Updated donation"
    );
    Ok(())
}

/// Links a donation to its logistics record.
///
/// # Errors
///
/// Returns `NotFound` if the donation does not exist.
pub fn set_donation_logistics_id(
    conn: &mut SqliteConnection,
    donation_id: i64,
    logistics_id: i64,
) -> Result<(), PersistenceError> {
    let updated: usize =
        diesel::update(donations::table.filter(donations::donation_id.eq(donation_id)))
            .set(donations::logistics_id.eq(Some(logistics_id)))
            .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Donation {donation_id}")));
    }
    Ok(())
}
