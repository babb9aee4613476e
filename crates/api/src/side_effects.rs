// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delivery of post-commit side effects.
//!
//! Notifications and logistics records are written after the transition
//! that caused them has been committed. Each effect is attempted once. A
//! failure is logged, recorded in a [`SideEffectReport`] and never undoes
//! the committed transition.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::warn;

use sdms_domain::{NewLogistics, NewNotification};
use sdms_persistence::Persistence;

/// A side effect that could not be carried out.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SideEffectError {
    /// A notification could not be stored.
    #[error("Failed to notify participant {recipient_id}: {message}")]
    Notification {
        /// The participant who was not notified.
        recipient_id: i64,
        /// What went wrong.
        message: String,
    },
    /// A logistics record could not be created.
    #[error("Failed to schedule logistics for donation {donation_id}: {message}")]
    Logistics {
        /// The donation left without logistics.
        donation_id: i64,
        /// What went wrong.
        message: String,
    },
}

/// Destination for post-commit side effects.
///
/// The storage handle is passed to every call so that an implementation
/// can write through it without holding a borrow of its own.
pub trait SideEffectSink {
    /// Delivers a notification.
    ///
    /// # Returns
    ///
    /// The id of the stored notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered.
    fn deliver_notification(
        &mut self,
        persistence: &mut Persistence,
        notification: &NewNotification,
        now: OffsetDateTime,
    ) -> Result<i64, SideEffectError>;

    /// Creates a logistics record and links it from its donation.
    ///
    /// # Returns
    ///
    /// The id of the new logistics record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be created.
    fn create_logistics(
        &mut self,
        persistence: &mut Persistence,
        record: &NewLogistics,
        now: OffsetDateTime,
    ) -> Result<i64, SideEffectError>;
}

/// Writes side effects to storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistedSideEffects;

impl SideEffectSink for PersistedSideEffects {
    fn deliver_notification(
        &mut self,
        persistence: &mut Persistence,
        notification: &NewNotification,
        now: OffsetDateTime,
    ) -> Result<i64, SideEffectError> {
        persistence
            .insert_notification(notification, now)
            .map_err(|e| SideEffectError::Notification {
                recipient_id: notification.recipient_id,
                message: e.to_string(),
            })
    }

    fn create_logistics(
        &mut self,
        persistence: &mut Persistence,
        record: &NewLogistics,
        now: OffsetDateTime,
    ) -> Result<i64, SideEffectError> {
        persistence
            .insert_logistics(record, now)
            .map_err(|e| SideEffectError::Logistics {
                donation_id: record.donation_id,
                message: e.to_string(),
            })
    }
}

/// The side effects of one operation that did not complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffectReport {
    /// Every failed side effect, in the order attempted.
    pub failures: Vec<SideEffectError>,
}

impl SideEffectReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    /// Whether every side effect succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Records a failure and logs it.
    pub fn record(&mut self, failure: SideEffectError) {
        warn!(error = %failure, "Side effect failed after commit");
        self.failures.push(failure);
    }
}

/// Delivers notifications in order, recording failures.
///
/// # Returns
///
/// The ids of the notifications that were stored.
pub fn deliver_notifications<S: SideEffectSink + ?Sized>(
    sink: &mut S,
    persistence: &mut Persistence,
    notifications: &[NewNotification],
    now: OffsetDateTime,
    report: &mut SideEffectReport,
) -> Vec<i64> {
    notifications
        .iter()
        .filter_map(
            |notification| match sink.deliver_notification(persistence, notification, now) {
                Ok(id) => Some(id),
                Err(failure) => {
                    report.record(failure);
                    None
                }
            },
        )
        .collect()
}
