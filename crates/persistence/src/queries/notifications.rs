// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sdms_domain::Notification;

use crate::data_models::NotificationRow;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Retrieves a notification by id.
///
/// # Errors
///
/// Returns `NotFound` if the notification does not exist.
pub fn get_notification(
    conn: &mut SqliteConnection,
    notification_id: i64,
) -> Result<Notification, PersistenceError> {
    notifications::table
        .filter(notifications::notification_id.eq(notification_id))
        .select(NotificationRow::as_select())
        .first::<NotificationRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("Notification {notification_id}")))?
        .into_domain()
}

/// Lists a participant's notifications, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_notifications(
    conn: &mut SqliteConnection,
    recipient_id: i64,
    unread_only: bool,
) -> Result<Vec<Notification>, PersistenceError> {
    let mut query = notifications::table
        .filter(notifications::recipient_id.eq(recipient_id))
        .into_boxed();
    if unread_only {
        query = query.filter(notifications::is_read.eq(0));
    }

    query
        .order((
            notifications::created_at.desc(),
            notifications::notification_id.desc(),
        ))
        .select(NotificationRow::as_select())
        .load::<NotificationRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_notifications: {e}")))?
        .into_iter()
        .map(NotificationRow::into_domain)
        .collect()
}

/// Counts a participant's unread notifications.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_unread_notifications(
    conn: &mut SqliteConnection,
    recipient_id: i64,
) -> Result<i64, PersistenceError> {
    notifications::table
        .filter(notifications::recipient_id.eq(recipient_id))
        .filter(notifications::is_read.eq(0))
        .count()
        .get_result::<i64>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_unread_notifications: {e}")))
}
