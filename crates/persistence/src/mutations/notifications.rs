// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sdms_domain::NewNotification;
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Stores an unread notification.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the recipient
/// does not exist.
pub fn insert_notification(
    conn: &mut SqliteConnection,
    notification: &NewNotification,
    created_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(notifications::table)
        .values((
            notifications::recipient_id.eq(notification.recipient_id),
            notifications::message.eq(&notification.message),
            notifications::notification_type.eq(notification.notification_type.as_str()),
            notifications::is_read.eq(0),
            notifications::related_donation_id.eq(notification.related_donation_id),
            notifications::related_request_id.eq(notification.related_request_id),
            notifications::created_at.eq(format_timestamp(created_at)?),
        ))
        .execute(conn)?;

    let notification_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        notification_id,
        recipient_id = notification.recipient_id,
        notification_type = notification.notification_type.as_str(),
        "Stored notification"
    );
    Ok(notification_id)
}

/// Marks one notification as read.
///
/// Marking an already read notification succeeds.
///
/// # Errors
///
/// Returns `NotFound` if the notification does not exist.
pub fn mark_notification_read(
    conn: &mut SqliteConnection,
    notification_id: i64,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        notifications::table.filter(notifications::notification_id.eq(notification_id)),
    )
    .set(notifications::is_read.eq(1))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Notification {notification_id}"
        )));
    }
    Ok(())
}

/// Marks all of a participant's notifications as read.
///
/// # Returns
///
/// The number of notifications that were unread.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_all_notifications_read(
    conn: &mut SqliteConnection,
    recipient_id: i64,
) -> Result<usize, PersistenceError> {
    let updated: usize = diesel::update(
        notifications::table
            .filter(notifications::recipient_id.eq(recipient_id))
            .filter(notifications::is_read.eq(0)),
    )
    .set(notifications::is_read.eq(1))
    .execute(conn)?;

    Ok(updated)
}
