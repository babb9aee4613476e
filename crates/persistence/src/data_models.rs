// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and conversions between storage and domain values.
//!
//! Enums are stored as their wire names, quantities as `INTEGER` and
//! timestamps as fixed-width UTC RFC 3339 text so that lexical order
//! matches chronological order.

use std::str::FromStr;

use diesel::prelude::*;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use sdms_domain::{
    Donation, DonationItem, ItemCondition, Location, Logistics, Notification, Participant,
    Request, TrackingId,
};

use crate::diesel_schema::{
    donation_items, donations, logistics, notifications, participants, requests,
};
use crate::error::PersistenceError;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
);

/// Renders a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(format!("format_timestamp: {e}")))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::ReconstructionError(format!("timestamp '{value}': {e}")))
}

/// Converts a stored `INTEGER` quantity back to a domain quantity.
///
/// # Errors
///
/// Returns an error if the stored value is negative.
pub fn quantity_from_db(value: i32) -> Result<u32, PersistenceError> {
    value
        .to_u32()
        .ok_or_else(|| PersistenceError::ReconstructionError(format!("quantity {value}")))
}

/// Converts a domain quantity to its `INTEGER` column value.
///
/// # Errors
///
/// Returns an error if the quantity does not fit in the column.
pub fn quantity_to_db(value: u32) -> Result<i32, PersistenceError> {
    value
        .to_i32()
        .ok_or_else(|| PersistenceError::QueryFailed(format!("quantity {value} is too large")))
}

fn parse_enum<T>(value: &str) -> Result<T, PersistenceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    T::from_str(value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

fn location_from_db(lat: Option<f64>, lng: Option<f64>) -> Option<Location> {
    lat.zip(lng).map(|(lat, lng)| Location::new(lat, lng))
}

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = participants)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ParticipantRow {
    pub participant_id: i64,
    pub name: String,
    pub role: String,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl ParticipantRow {
    pub fn into_domain(self) -> Result<Participant, PersistenceError> {
        Ok(Participant {
            participant_id: self.participant_id,
            name: self.name,
            role: parse_enum(&self.role)?,
            address: self.address,
            location: location_from_db(self.lat, self.lng),
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = donations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DonationRow {
    pub donation_id: i64,
    pub tracking_id: String,
    pub donor_id: i64,
    pub recipient_id: Option<i64>,
    pub status: String,
    pub donation_date: String,
    pub description: Option<String>,
    pub related_request_id: Option<i64>,
    pub logistics_id: Option<i64>,
    pub approved_by: Option<String>,
    pub approval_date: Option<String>,
    pub rejection_reason: Option<String>,
}

impl DonationRow {
    /// Builds the domain donation from this row and its ordered items.
    pub fn into_domain(self, items: Vec<DonationItem>) -> Result<Donation, PersistenceError> {
        Ok(Donation {
            donation_id: self.donation_id,
            tracking_id: TrackingId::parse(&self.tracking_id)
                .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?,
            donor_id: self.donor_id,
            recipient_id: self.recipient_id,
            items,
            status: parse_enum(&self.status)?,
            donation_date: parse_timestamp(&self.donation_date)?,
            description: self.description,
            related_request_id: self.related_request_id,
            logistics_id: self.logistics_id,
            approved_by: self.approved_by,
            approval_date: self
                .approval_date
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            rejection_reason: self.rejection_reason,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = donation_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DonationItemRow {
    pub donation_id: i64,
    pub item_name: String,
    pub item_type: String,
    pub quantity: i32,
    pub item_condition: String,
}

impl DonationItemRow {
    pub fn into_domain(self) -> Result<DonationItem, PersistenceError> {
        let condition: ItemCondition = parse_enum(&self.item_condition)?;
        Ok(DonationItem {
            item_name: self.item_name,
            item_type: self.item_type,
            quantity: quantity_from_db(self.quantity)?,
            condition,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RequestRow {
    pub request_id: i64,
    pub recipient_id: i64,
    pub item_type: String,
    pub quantity: i32,
    pub urgency: String,
    pub status: String,
    pub request_date: String,
    pub quantity_fulfilled: i32,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub description: Option<String>,
}

impl RequestRow {
    pub fn into_domain(self) -> Result<Request, PersistenceError> {
        Ok(Request {
            request_id: self.request_id,
            recipient_id: self.recipient_id,
            item_type: self.item_type,
            quantity: quantity_from_db(self.quantity)?,
            urgency: parse_enum(&self.urgency)?,
            status: parse_enum(&self.status)?,
            request_date: parse_timestamp(&self.request_date)?,
            quantity_fulfilled: quantity_from_db(self.quantity_fulfilled)?,
            location: location_from_db(self.lat, self.lng),
            description: self.description,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NotificationRow {
    pub notification_id: i64,
    pub recipient_id: i64,
    pub message: String,
    pub notification_type: String,
    pub is_read: i32,
    pub related_donation_id: Option<i64>,
    pub related_request_id: Option<i64>,
    pub created_at: String,
}

impl NotificationRow {
    pub fn into_domain(self) -> Result<Notification, PersistenceError> {
        Ok(Notification {
            notification_id: self.notification_id,
            recipient_id: self.recipient_id,
            message: self.message,
            notification_type: parse_enum(&self.notification_type)?,
            read: self.is_read != 0,
            related_donation_id: self.related_donation_id,
            related_request_id: self.related_request_id,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = logistics)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LogisticsRow {
    pub logistics_id: i64,
    pub donation_id: i64,
    pub pickup_address: String,
    pub delivery_address: String,
    pub pickup_date: String,
    pub delivery_date: String,
    pub status: String,
    pub notes: String,
    pub updated_at: String,
}

impl LogisticsRow {
    pub fn into_domain(self) -> Result<Logistics, PersistenceError> {
        Ok(Logistics {
            logistics_id: self.logistics_id,
            donation_id: self.donation_id,
            pickup_address: self.pickup_address,
            delivery_address: self.delivery_address,
            pickup_date: parse_timestamp(&self.pickup_date)?,
            delivery_date: parse_timestamp(&self.delivery_date)?,
            status: parse_enum(&self.status)?,
            notes: self.notes,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}
