// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the SDMS donation matching engine.
//!
//! This crate stores participants, donations, requests, notifications,
//! logistics records and audit events in `SQLite` through Diesel.
//!
//! ## Backend
//!
//! `SQLite` is the only backend. File databases run in WAL mode; tests use
//! shared-cache in-memory databases, one per `Persistence` instance.
//! Foreign key enforcement is verified at startup.
//!
//! ## Writes
//!
//! Updates to existing entities are conditional on the values they were
//! read with. A transition whose donation, request or logistics record
//! changed in the meantime fails with
//! [`PersistenceError::ConcurrentModification`] and writes nothing.
//!
//! Creation of participants, donations and requests is recorded with an
//! audit event in the same transaction.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use diesel::SqliteConnection;
use sdms::{State, TransitionResult};
use sdms_audit::AuditEvent;
use sdms_domain::{
    Donation, Logistics, NewDonation, NewLogistics, NewNotification, NewParticipant, NewRequest,
    Notification, Participant, Request, TrackingId,
};
use time::OffsetDateTime;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Type alias kept for callers that name the backend explicitly.
pub type SqlitePersistence = Persistence;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:sdms_memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Bounds how long storage waits on a locked database.
    ///
    /// # Errors
    ///
    /// Returns an error if the setting cannot be applied.
    pub fn set_busy_timeout(&mut self, timeout: Duration) -> Result<(), PersistenceError> {
        backend::sqlite::set_busy_timeout(&mut self.conn, timeout)
    }

    // ========================================================================
    // Transitions & Audit
    // ========================================================================

    /// Persists a transition computed from `before`, with its audit event.
    ///
    /// # Returns
    ///
    /// The audit event id.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrentModification` if an entity in `before` no longer
    /// matches storage. Nothing is written on error.
    pub fn persist_transition(
        &mut self,
        before: &State,
        result: &TransitionResult,
    ) -> Result<i64, PersistenceError> {
        mutations::transition::persist_transition(&mut self.conn, before, result)
    }

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found or cannot be deserialized.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }

    // ========================================================================
    // Participants
    // ========================================================================

    /// Registers a participant.
    ///
    /// # Returns
    ///
    /// The stored participant and the id of its creation audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_participant(
        &mut self,
        participant: &NewParticipant,
        event: &AuditEvent,
    ) -> Result<(Participant, i64), PersistenceError> {
        let (participant_id, event_id): (i64, i64) =
            mutations::participants::insert_participant(&mut self.conn, participant, event)?;
        let stored: Participant =
            queries::participants::get_participant(&mut self.conn, participant_id)?;
        Ok((stored, event_id))
    }

    /// Retrieves a participant by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the participant does not exist.
    pub fn get_participant(&mut self, participant_id: i64) -> Result<Participant, PersistenceError> {
        queries::participants::get_participant(&mut self.conn, participant_id)
    }

    /// Retrieves the participants with the given ids, skipping unknown ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_participants(
        &mut self,
        participant_ids: &[i64],
    ) -> Result<Vec<Participant>, PersistenceError> {
        queries::participants::get_participants(&mut self.conn, participant_ids)
    }

    // ========================================================================
    // Donations
    // ========================================================================

    /// Stores a new pending donation.
    ///
    /// # Returns
    ///
    /// The stored donation and the id of its creation audit event.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if the tracking id is taken, or another error if
    /// the insert fails.
    pub fn create_donation(
        &mut self,
        donation: &NewDonation,
        event: &AuditEvent,
    ) -> Result<(Donation, i64), PersistenceError> {
        let (donation_id, event_id): (i64, i64) =
            mutations::donations::insert_donation(&mut self.conn, donation, event)?;
        let stored: Donation = queries::donations::get_donation(&mut self.conn, donation_id)?;
        Ok((stored, event_id))
    }

    /// Retrieves a donation by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the donation does not exist.
    pub fn get_donation(&mut self, donation_id: i64) -> Result<Donation, PersistenceError> {
        queries::donations::get_donation(&mut self.conn, donation_id)
    }

    /// Retrieves a donation by tracking id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no donation carries the tracking id.
    pub fn get_donation_by_tracking_id(
        &mut self,
        tracking_id: &TrackingId,
    ) -> Result<Donation, PersistenceError> {
        queries::donations::get_donation_by_tracking_id(&mut self.conn, tracking_id)
    }

    /// Lists pending donations, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pending_donations(&mut self) -> Result<Vec<Donation>, PersistenceError> {
        queries::donations::list_pending_donations(&mut self.conn)
    }

    /// Lists pending donations holding the given item type.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_candidate_donations(
        &mut self,
        item_type: &str,
    ) -> Result<Vec<Donation>, PersistenceError> {
        queries::donations::list_candidate_donations(&mut self.conn, item_type)
    }

    /// Counts other donations holding a match with the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_match_holders(
        &mut self,
        request_id: i64,
        excluding_donation_id: i64,
    ) -> Result<i64, PersistenceError> {
        queries::donations::count_match_holders(&mut self.conn, request_id, excluding_donation_id)
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Stores a new pending request.
    ///
    /// # Returns
    ///
    /// The stored request and the id of its creation audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_request(
        &mut self,
        request: &NewRequest,
        event: &AuditEvent,
    ) -> Result<(Request, i64), PersistenceError> {
        let (request_id, event_id): (i64, i64) =
            mutations::requests::insert_request(&mut self.conn, request, event)?;
        let stored: Request = queries::requests::get_request(&mut self.conn, request_id)?;
        Ok((stored, event_id))
    }

    /// Retrieves a request by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the request does not exist.
    pub fn get_request(&mut self, request_id: i64) -> Result<Request, PersistenceError> {
        queries::requests::get_request(&mut self.conn, request_id)
    }

    /// Lists pending requests, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pending_requests(&mut self) -> Result<Vec<Request>, PersistenceError> {
        queries::requests::list_pending_requests(&mut self.conn)
    }

    /// Lists pending requests for any of `item_types` asking for at most
    /// `max_quantity` units.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_candidate_requests(
        &mut self,
        item_types: &[&str],
        max_quantity: u32,
    ) -> Result<Vec<Request>, PersistenceError> {
        queries::requests::list_candidate_requests(&mut self.conn, item_types, max_quantity)
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Stores an unread notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_notification(
        &mut self,
        notification: &NewNotification,
        created_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::notifications::insert_notification(&mut self.conn, notification, created_at)
    }

    /// Retrieves a notification by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the notification does not exist.
    pub fn get_notification(
        &mut self,
        notification_id: i64,
    ) -> Result<Notification, PersistenceError> {
        queries::notifications::get_notification(&mut self.conn, notification_id)
    }

    /// Lists a participant's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_notifications(
        &mut self,
        recipient_id: i64,
        unread_only: bool,
    ) -> Result<Vec<Notification>, PersistenceError> {
        queries::notifications::list_notifications(&mut self.conn, recipient_id, unread_only)
    }

    /// Counts a participant's unread notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_unread_notifications(&mut self, recipient_id: i64) -> Result<i64, PersistenceError> {
        queries::notifications::count_unread_notifications(&mut self.conn, recipient_id)
    }

    /// Marks a notification as read.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the notification does not exist.
    pub fn mark_notification_read(&mut self, notification_id: i64) -> Result<(), PersistenceError> {
        mutations::notifications::mark_notification_read(&mut self.conn, notification_id)
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
        &mut self,
        recipient_id: i64,
    ) -> Result<usize, PersistenceError> {
        mutations::notifications::mark_all_notifications_read(&mut self.conn, recipient_id)
    }

    // ========================================================================
    // Logistics
    // ========================================================================

    /// Stores a logistics record and links it from its donation.
    ///
    /// # Errors
    ///
    /// Returns `Duplicate` if the donation already has a logistics record.
    pub fn insert_logistics(
        &mut self,
        record: &NewLogistics,
        created_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::logistics::insert_logistics(&mut self.conn, record, created_at)
    }

    /// Retrieves a logistics record by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the record does not exist.
    pub fn get_logistics(&mut self, logistics_id: i64) -> Result<Logistics, PersistenceError> {
        queries::logistics::get_logistics(&mut self.conn, logistics_id)
    }

    /// Retrieves the logistics record of a donation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the donation has no logistics record.
    pub fn get_logistics_for_donation(
        &mut self,
        donation_id: i64,
    ) -> Result<Logistics, PersistenceError> {
        queries::logistics::get_logistics_for_donation(&mut self.conn, donation_id)
    }
}
