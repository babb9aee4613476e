// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sdms_domain::{Request, RequestStatus};

use crate::data_models::{RequestRow, quantity_to_db};
use crate::diesel_schema::requests;
use crate::error::PersistenceError;

/// Retrieves a request by id.
///
/// # Errors
///
/// Returns `NotFound` if the request does not exist.
pub fn get_request(conn: &mut SqliteConnection, request_id: i64) -> Result<Request, PersistenceError> {
    requests::table
        .filter(requests::request_id.eq(request_id))
        .select(RequestRow::as_select())
        .first::<RequestRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Request {request_id}")))?
        .into_domain()
}

/// Lists pending requests, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_pending_requests(conn: &mut SqliteConnection) -> Result<Vec<Request>, PersistenceError> {
    requests::table
        .filter(requests::status.eq(RequestStatus::Pending.as_str()))
        .order((requests::request_date.asc(), requests::request_id.asc()))
        .select(RequestRow::as_select())
        .load::<RequestRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_pending_requests: {e}")))?
        .into_iter()
        .map(RequestRow::into_domain)
        .collect()
}

/// Lists pending requests for any of `item_types` asking for at most
/// `max_quantity` units.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_candidate_requests(
    conn: &mut SqliteConnection,
    item_types: &[&str],
    max_quantity: u32,
) -> Result<Vec<Request>, PersistenceError> {
    // Donation totals can exceed the column range; clamp rather than fail.
    let max_quantity: i32 = quantity_to_db(max_quantity).unwrap_or(i32::MAX);

    requests::table
        .filter(requests::status.eq(RequestStatus::Pending.as_str()))
        .filter(requests::item_type.eq_any(item_types.to_vec()))
        .filter(requests::quantity.le(max_quantity))
        .order((requests::request_date.asc(), requests::request_id.asc()))
        .select(RequestRow::as_select())
        .load::<RequestRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_candidate_requests: {e}")))?
        .into_iter()
        .map(RequestRow::into_domain)
        .collect()
}
