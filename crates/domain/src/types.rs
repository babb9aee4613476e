// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::lifecycle::{DonationStatus, LogisticsStatus, RequestStatus};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Placeholder used when a participant has no address on file.
pub const ADDRESS_PLACEHOLDER: &str = "Address to be confirmed";

/// Prefix of every donation tracking id.
pub const TRACKING_ID_PREFIX: &str = "SDMS-";

/// Number of base-36 characters following the tracking id prefix.
pub const TRACKING_ID_LEN: usize = 6;

/// How urgently a recipient needs the requested items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Can wait.
    Low,
    /// Normal priority.
    #[default]
    Medium,
    /// Needed soon.
    High,
    /// Needed immediately.
    Critical,
}

impl FromStr for Urgency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(DomainError::InvalidUrgency(s.to_string())),
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Urgency {
    /// Converts this urgency to its storage and wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Returns the raw urgency points used by donation-to-request scoring.
    #[must_use]
    pub const fn points(&self) -> u32 {
        match self {
            Self::Low => 25,
            Self::Medium => 50,
            Self::High => 75,
            Self::Critical => 100,
        }
    }
}

/// Physical condition of a donated item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemCondition {
    /// Unused.
    New,
    /// Used, fully functional.
    #[default]
    Good,
    /// Visible wear.
    Fair,
    /// Heavily worn.
    Poor,
}

impl FromStr for ItemCondition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            _ => Err(DomainError::InvalidItemCondition(s.to_string())),
        }
    }
}

impl ItemCondition {
    /// Converts this condition to its storage and wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

/// The part a participant plays in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    /// Offers items.
    Donor,
    /// Requests items.
    Recipient,
    /// Reviews and matches.
    Admin,
}

impl FromStr for ParticipantRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donor" => Ok(Self::Donor),
            "recipient" => Ok(Self::Recipient),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidParticipantRole(s.to_string())),
        }
    }
}

impl ParticipantRole {
    /// Converts this role to its storage and wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Recipient => "recipient",
            Self::Admin => "admin",
        }
    }
}

/// Category of a stored notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// A donation was paired with a request.
    DonationMatched,
    /// A donation was submitted against a request.
    DonationSubmitted,
    /// A donation was approved.
    DonationApproved,
    /// A donation was rejected.
    DonationRejected,
    /// A donation left the donor.
    DonationInTransit,
    /// A donation reached the recipient.
    DonationDelivered,
    /// A request was created.
    RequestCreated,
    /// A request was fully satisfied.
    RequestFulfilled,
    /// Anything else.
    General,
}

impl FromStr for NotificationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donation_matched" => Ok(Self::DonationMatched),
            "donation_submitted" => Ok(Self::DonationSubmitted),
            "donation_approved" => Ok(Self::DonationApproved),
            "donation_rejected" => Ok(Self::DonationRejected),
            "donation_in_transit" => Ok(Self::DonationInTransit),
            "donation_delivered" => Ok(Self::DonationDelivered),
            "request_created" => Ok(Self::RequestCreated),
            "request_fulfilled" => Ok(Self::RequestFulfilled),
            "general" => Ok(Self::General),
            _ => Err(DomainError::InvalidNotificationType(s.to_string())),
        }
    }
}

impl NotificationType {
    /// Converts this type to its storage and wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DonationMatched => "donation_matched",
            Self::DonationSubmitted => "donation_submitted",
            Self::DonationApproved => "donation_approved",
            Self::DonationRejected => "donation_rejected",
            Self::DonationInTransit => "donation_in_transit",
            Self::DonationDelivered => "donation_delivered",
            Self::RequestCreated => "request_created",
            Self::RequestFulfilled => "request_fulfilled",
            Self::General => "general",
        }
    }
}

/// A planar coordinate pair.
///
/// Distances between locations are plain Euclidean distances over
/// `(lat, lng)`; no great-circle math is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Location {
    /// Creates a new `Location`.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar Euclidean distance to another location.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx: f64 = self.lat - other.lat;
        let dy: f64 = self.lng - other.lng;
        dx.hypot(dy)
    }
}

/// A donor, recipient or administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Storage identifier.
    pub participant_id: i64,
    /// Display name used in notifications.
    pub name: String,
    /// The participant's role.
    pub role: ParticipantRole,
    /// Street address used for pickup or delivery.
    pub address: Option<String>,
    /// Coordinates used for proximity scoring.
    pub location: Option<Location>,
}

impl Participant {
    /// Returns the address, or the shared placeholder when none is on file.
    #[must_use]
    pub fn address_or_placeholder(&self) -> &str {
        self.address
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(ADDRESS_PLACEHOLDER)
    }
}

/// A single line of a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationItem {
    /// Human readable item name (e.g. "Canned beans").
    pub item_name: String,
    /// Item type used for matching (e.g. "food").
    pub item_type: String,
    /// Number of units, at least 1.
    pub quantity: u32,
    /// Physical condition.
    pub condition: ItemCondition,
}

impl DonationItem {
    /// Creates a new `DonationItem`.
    ///
    /// # Arguments
    ///
    /// * `item_name` - The item's display name
    /// * `item_type` - The matching category
    /// * `quantity` - Number of units
    /// * `condition` - Physical condition
    #[must_use]
    pub fn new(item_name: &str, item_type: &str, quantity: u32, condition: ItemCondition) -> Self {
        Self {
            item_name: item_name.to_string(),
            item_type: item_type.to_string(),
            quantity,
            condition,
        }
    }
}

/// Public `SDMS-XXXXXX` identifier of a donation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingId {
    value: String,
}

impl TrackingId {
    /// Builds a tracking id from a random seed.
    ///
    /// The seed is rendered in base 36 (uppercase) and truncated or
    /// zero-padded to six characters.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let mut remaining: u64 = seed;
        let mut chars: [u8; TRACKING_ID_LEN] = [b'0'; TRACKING_ID_LEN];
        for slot in chars.iter_mut().rev() {
            // remaining % 36 is always < 36
            let index: usize = usize::try_from(remaining % 36).unwrap_or_default();
            *slot = ALPHABET[index];
            remaining /= 36;
        }
        let suffix: String = chars.iter().map(|b| char::from(*b)).collect();
        Self {
            value: format!("{TRACKING_ID_PREFIX}{suffix}"),
        }
    }

    /// Parses and validates a tracking id.
    ///
    /// Lowercase input is normalized to uppercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not consist of the `SDMS-` prefix
    /// followed by exactly six ASCII letters or digits.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let normalized: String = value.trim().to_uppercase();
        let valid: bool = normalized
            .strip_prefix(TRACKING_ID_PREFIX)
            .is_some_and(|rest| {
                rest.len() == TRACKING_ID_LEN && rest.chars().all(|c| c.is_ascii_alphanumeric())
            });
        if !valid {
            return Err(DomainError::InvalidTrackingId(value.to_string()));
        }
        Ok(Self { value: normalized })
    }

    /// Returns the tracking id value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for TrackingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A donor's offer of one or more items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    /// Storage identifier.
    pub donation_id: i64,
    /// Public tracking identifier.
    pub tracking_id: TrackingId,
    /// The donating participant.
    pub donor_id: i64,
    /// The receiving participant, set once matched.
    pub recipient_id: Option<i64>,
    /// The donated items.
    pub items: Vec<DonationItem>,
    /// Current lifecycle status.
    pub status: DonationStatus,
    /// When the donation was submitted.
    #[serde(with = "time::serde::rfc3339")]
    pub donation_date: OffsetDateTime,
    /// Free text from the donor.
    pub description: Option<String>,
    /// The request this donation answers, if any.
    pub related_request_id: Option<i64>,
    /// The logistics record scheduled for this donation.
    pub logistics_id: Option<i64>,
    /// Who approved the donation.
    pub approved_by: Option<String>,
    /// When the donation was approved.
    #[serde(with = "time::serde::rfc3339::option")]
    pub approval_date: Option<OffsetDateTime>,
    /// Why the donation was rejected.
    pub rejection_reason: Option<String>,
}

impl Donation {
    /// Returns the distinct item types in this donation, in item order.
    #[must_use]
    pub fn item_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if !types.contains(&item.item_type.as_str()) {
                types.push(&item.item_type);
            }
        }
        types
    }

    /// Returns the total quantity across all items.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Returns the summed quantity of items of the given type.
    #[must_use]
    pub fn quantity_of_type(&self, item_type: &str) -> u32 {
        self.items
            .iter()
            .filter(|item| item.item_type == item_type)
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Returns whether any item has the given type.
    #[must_use]
    pub fn has_item_type(&self, item_type: &str) -> bool {
        self.items.iter().any(|item| item.item_type == item_type)
    }

    /// Returns the item names joined with `", "`.
    #[must_use]
    pub fn item_names(&self) -> String {
        self.items
            .iter()
            .map(|item| item.item_name.as_str())
            .collect::<Vec<&str>>()
            .join(", ")
    }
}

/// A recipient's stated need for a quantity of one item type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Storage identifier.
    pub request_id: i64,
    /// The requesting participant.
    pub recipient_id: i64,
    /// Item type needed.
    pub item_type: String,
    /// Number of units needed, at least 1.
    pub quantity: u32,
    /// How urgently the items are needed.
    pub urgency: Urgency,
    /// Current lifecycle status.
    pub status: RequestStatus,
    /// When the request was submitted.
    #[serde(with = "time::serde::rfc3339")]
    pub request_date: OffsetDateTime,
    /// Units received so far from approved donations.
    pub quantity_fulfilled: u32,
    /// Delivery coordinates, if given on the request itself.
    pub location: Option<Location>,
    /// Free text from the recipient.
    pub description: Option<String>,
}

impl Request {
    /// Returns how many units are still outstanding.
    #[must_use]
    pub const fn remaining_quantity(&self) -> u32 {
        self.quantity.saturating_sub(self.quantity_fulfilled)
    }
}

/// A notification ready to be delivered to a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    /// The participant receiving the notification.
    pub recipient_id: i64,
    /// Message text.
    pub message: String,
    /// Notification category.
    pub notification_type: NotificationType,
    /// Related donation, if any.
    pub related_donation_id: Option<i64>,
    /// Related request, if any.
    pub related_request_id: Option<i64>,
}

/// A stored notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Storage identifier.
    pub notification_id: i64,
    /// The participant receiving the notification.
    pub recipient_id: i64,
    /// Message text.
    pub message: String,
    /// Notification category.
    pub notification_type: NotificationType,
    /// Whether the recipient has read it.
    pub read: bool,
    /// Related donation, if any.
    pub related_donation_id: Option<i64>,
    /// Related request, if any.
    pub related_request_id: Option<i64>,
    /// When the notification was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A logistics record ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLogistics {
    /// The donation being moved.
    pub donation_id: i64,
    /// Where the items are collected.
    pub pickup_address: String,
    /// Where the items are delivered.
    pub delivery_address: String,
    /// Planned pickup time.
    #[serde(with = "time::serde::rfc3339")]
    pub pickup_date: OffsetDateTime,
    /// Planned delivery time.
    #[serde(with = "time::serde::rfc3339")]
    pub delivery_date: OffsetDateTime,
    /// Initial status.
    pub status: LogisticsStatus,
    /// Free text notes.
    pub notes: String,
}

/// A stored logistics record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logistics {
    /// Storage identifier.
    pub logistics_id: i64,
    /// The donation being moved.
    pub donation_id: i64,
    /// Where the items are collected.
    pub pickup_address: String,
    /// Where the items are delivered.
    pub delivery_address: String,
    /// Planned pickup time.
    #[serde(with = "time::serde::rfc3339")]
    pub pickup_date: OffsetDateTime,
    /// Planned delivery time.
    #[serde(with = "time::serde::rfc3339")]
    pub delivery_date: OffsetDateTime,
    /// Current status.
    pub status: LogisticsStatus,
    /// Free text notes.
    pub notes: String,
    /// Last status change.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A participant ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewParticipant {
    /// Display name.
    pub name: String,
    /// The participant's role.
    pub role: ParticipantRole,
    /// Street address, if known.
    pub address: Option<String>,
    /// Coordinates, if known.
    pub location: Option<Location>,
}

/// A donation ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDonation {
    /// Public tracking identifier.
    pub tracking_id: TrackingId,
    /// The donating participant.
    pub donor_id: i64,
    /// The donated items.
    pub items: Vec<DonationItem>,
    /// Submission time.
    #[serde(with = "time::serde::rfc3339")]
    pub donation_date: OffsetDateTime,
    /// Free text from the donor.
    pub description: Option<String>,
    /// The request this donation answers, if any.
    pub related_request_id: Option<i64>,
}

/// A request ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRequest {
    /// The requesting participant.
    pub recipient_id: i64,
    /// Item type needed.
    pub item_type: String,
    /// Number of units needed.
    pub quantity: u32,
    /// How urgently the items are needed.
    pub urgency: Urgency,
    /// Submission time.
    #[serde(with = "time::serde::rfc3339")]
    pub request_date: OffsetDateTime,
    /// Delivery coordinates, if given.
    pub location: Option<Location>,
    /// Free text from the recipient.
    pub description: Option<String>,
}
