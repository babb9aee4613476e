// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sdms_domain::Notification;
use sdms_persistence::Persistence;
use tracing::debug;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::{MarkAllReadResponse, NotificationListResponse, UnreadCountResponse};

fn unread(persistence: &mut Persistence, participant_id: i64) -> Result<i64, ApiError> {
    persistence
        .count_unread_notifications(participant_id)
        .map_err(|e| translate_persistence_error("Notification", e))
}

/// Lists a participant's notifications, newest first.
///
/// # Errors
///
/// Returns an error if a non-admin actor asks for someone else's
/// notifications or storage fails.
pub fn list_notifications(
    persistence: &mut Persistence,
    participant_id: i64,
    unread_only: bool,
    authenticated_actor: &AuthenticatedActor,
) -> Result<NotificationListResponse, ApiError> {
    AuthorizationService::authorize_self_or_admin(
        authenticated_actor,
        participant_id,
        "list_notifications",
    )?;
    let notifications: Vec<Notification> = persistence
        .list_notifications(participant_id, unread_only)
        .map_err(|e| translate_persistence_error("Notification", e))?;
    let unread_count: i64 = unread(persistence, participant_id)?;
    Ok(NotificationListResponse {
        notifications,
        unread_count,
    })
}

/// Counts a participant's unread notifications.
///
/// # Errors
///
/// Returns an error if a non-admin actor asks about someone else or
/// storage fails.
pub fn unread_count(
    persistence: &mut Persistence,
    participant_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<UnreadCountResponse, ApiError> {
    AuthorizationService::authorize_self_or_admin(
        authenticated_actor,
        participant_id,
        "unread_count",
    )?;
    Ok(UnreadCountResponse {
        participant_id,
        unread_count: unread(persistence, participant_id)?,
    })
}

/// Marks one notification as read.
///
/// # Errors
///
/// Returns an error if the notification does not exist or belongs to
/// someone else and the actor is not an admin.
pub fn mark_notification_read(
    persistence: &mut Persistence,
    notification_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Notification, ApiError> {
    let notification: Notification = persistence
        .get_notification(notification_id)
        .map_err(|e| translate_persistence_error("Notification", e))?;
    AuthorizationService::authorize_self_or_admin(
        authenticated_actor,
        notification.recipient_id,
        "mark_notification_read",
    )?;
    persistence
        .mark_notification_read(notification_id)
        .map_err(|e| translate_persistence_error("Notification", e))?;
    debug!(notification_id, "Marked notification read");
    Ok(Notification {
        read: true,
        ..notification
    })
}

/// Marks all of a participant's notifications as read.
///
/// # Errors
///
/// Returns an error if a non-admin actor acts for someone else or
/// storage fails.
pub fn mark_all_notifications_read(
    persistence: &mut Persistence,
    participant_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MarkAllReadResponse, ApiError> {
    AuthorizationService::authorize_self_or_admin(
        authenticated_actor,
        participant_id,
        "mark_all_notifications_read",
    )?;
    let updated: usize = persistence
        .mark_all_notifications_read(participant_id)
        .map_err(|e| translate_persistence_error("Notification", e))?;
    debug!(participant_id, updated, "Marked all notifications read");
    Ok(MarkAllReadResponse {
        participant_id,
        updated,
    })
}
