// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Donation queries.
//!
//! A donation is stored as one `donations` row plus its ordered
//! `donation_items` rows. Every query here returns fully assembled
//! donations.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel::SqliteConnection;
use sdms_domain::{Donation, DonationItem, DonationStatus, TrackingId};

use crate::data_models::{DonationItemRow, DonationRow};
use crate::diesel_schema::{donation_items, donations};
use crate::error::PersistenceError;

fn load_items(
    conn: &mut SqliteConnection,
    donation_ids: Vec<i64>,
) -> Result<HashMap<i64, Vec<DonationItem>>, PersistenceError> {
    let rows: Vec<DonationItemRow> = donation_items::table
        .filter(donation_items::donation_id.eq_any(donation_ids))
        .order((donation_items::donation_id.asc(), donation_items::position.asc()))
        .select(DonationItemRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("load_items: {e}")))?;

    let mut items: HashMap<i64, Vec<DonationItem>> = HashMap::new();
    for row in rows {
        let donation_id: i64 = row.donation_id;
        items.entry(donation_id).or_default().push(row.into_domain()?);
    }
    Ok(items)
}

fn assemble(
    conn: &mut SqliteConnection,
    rows: Vec<DonationRow>,
) -> Result<Vec<Donation>, PersistenceError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.donation_id).collect();
    let mut items: HashMap<i64, Vec<DonationItem>> = load_items(conn, ids)?;
    rows.into_iter()
        .map(|row| {
            let donation_items: Vec<DonationItem> =
                items.remove(&row.donation_id).unwrap_or_default();
            row.into_domain(donation_items)
        })
        .collect()
}

fn single(
    conn: &mut SqliteConnection,
    row: Option<DonationRow>,
    missing: &str,
) -> Result<Donation, PersistenceError> {
    let row: DonationRow =
        row.ok_or_else(|| PersistenceError::NotFound(missing.to_string()))?;
    assemble(conn, vec![row])?
        .pop()
        .ok_or_else(|| PersistenceError::NotFound(missing.to_string()))
}

/// Retrieves a donation and its items by id.
///
/// # Errors
///
/// Returns `NotFound` if the donation does not exist.
pub fn get_donation(
    conn: &mut SqliteConnection,
    donation_id: i64,
) -> Result<Donation, PersistenceError> {
    let row: Option<DonationRow> = donations::table
        .filter(donations::donation_id.eq(donation_id))
        .select(DonationRow::as_select())
        .first(conn)
        .optional()?;
    single(conn, row, &format!("Donation {donation_id}"))
}

/// Retrieves a donation by its public tracking id.
///
/// # Errors
///
/// Returns `NotFound` if no donation carries the tracking id.
pub fn get_donation_by_tracking_id(
    conn: &mut SqliteConnection,
    tracking_id: &TrackingId,
) -> Result<Donation, PersistenceError> {
    let row: Option<DonationRow> = donations::table
        .filter(donations::tracking_id.eq(tracking_id.value()))
        .select(DonationRow::as_select())
        .first(conn)
        .optional()?;
    single(conn, row, &format!("Tracking id {tracking_id}"))
}

/// Lists pending donations, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_pending_donations(
    conn: &mut SqliteConnection,
) -> Result<Vec<Donation>, PersistenceError> {
    let rows: Vec<DonationRow> = donations::table
        .filter(donations::status.eq(DonationStatus::Pending.as_str()))
        .order((donations::donation_date.asc(), donations::donation_id.asc()))
        .select(DonationRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_pending_donations: {e}")))?;
    assemble(conn, rows)
}

/// Lists pending donations holding at least one item of `item_type`.
///
/// This is a pre-filter. Quantity checks are left to the matcher.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_candidate_donations(
    conn: &mut SqliteConnection,
    item_type: &str,
) -> Result<Vec<Donation>, PersistenceError> {
    let holding_type: Vec<i64> = donation_items::table
        .filter(donation_items::item_type.eq(item_type))
        .select(donation_items::donation_id)
        .distinct()
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_candidate_donations: {e}")))?;

    let rows: Vec<DonationRow> = donations::table
        .filter(donations::donation_id.eq_any(holding_type))
        .filter(donations::status.eq(DonationStatus::Pending.as_str()))
        .order((donations::donation_date.asc(), donations::donation_id.asc()))
        .select(DonationRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_candidate_donations: {e}")))?;
    assemble(conn, rows)
}

/// Counts donations other than `excluding_donation_id` that hold a match
/// with `request_id`.
///
/// A donation holds the match once it is approved for the request and
/// until it is rejected or cancelled.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_match_holders(
    conn: &mut SqliteConnection,
    request_id: i64,
    excluding_donation_id: i64,
) -> Result<i64, PersistenceError> {
    let holding: [&str; 3] = [
        DonationStatus::Approved.as_str(),
        DonationStatus::InTransit.as_str(),
        DonationStatus::Delivered.as_str(),
    ];
    donations::table
        .filter(donations::related_request_id.eq(request_id))
        .filter(donations::donation_id.ne(excluding_donation_id))
        .filter(donations::status.eq_any(holding))
        .count()
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_match_holders: {e}")))
}
