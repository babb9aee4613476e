// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::lifecycle::{DonationStatus, LogisticsStatus, RequestStatus};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Participant name is empty or invalid.
    InvalidName(String),
    /// Item name is empty or invalid.
    InvalidItemName(String),
    /// Item type is empty or invalid.
    InvalidItemType(String),
    /// A quantity is zero or otherwise out of range.
    InvalidQuantity {
        /// The field carrying the quantity.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// A donation was submitted without any items.
    EmptyDonation,
    /// A rejection was submitted without a reason.
    MissingRejectionReason,
    /// Coordinates are outside the valid latitude/longitude range.
    InvalidLocation {
        /// The latitude supplied.
        lat: String,
        /// The longitude supplied.
        lng: String,
    },
    /// A status string does not name a known donation status.
    InvalidDonationStatus(String),
    /// A status string does not name a known request status.
    InvalidRequestStatus(String),
    /// A status string does not name a known logistics status.
    InvalidLogisticsStatus(String),
    /// An urgency string does not name a known urgency level.
    InvalidUrgency(String),
    /// An item condition string is not recognized.
    InvalidItemCondition(String),
    /// A participant role string is not recognized.
    InvalidParticipantRole(String),
    /// A notification type string is not recognized.
    InvalidNotificationType(String),
    /// A tracking id does not have the `SDMS-XXXXXX` shape.
    InvalidTrackingId(String),
    /// The donation cannot move from its current status to the target.
    InvalidDonationTransition {
        /// The donation identifier.
        donation_id: i64,
        /// The current status.
        from: DonationStatus,
        /// The requested status.
        to: DonationStatus,
    },
    /// The request cannot move from its current status to the target.
    InvalidRequestTransition {
        /// The request identifier.
        request_id: i64,
        /// The current status.
        from: RequestStatus,
        /// The requested status.
        to: RequestStatus,
    },
    /// The logistics record cannot move from its current status to the target.
    InvalidLogisticsTransition {
        /// The logistics identifier.
        logistics_id: i64,
        /// The current status.
        from: LogisticsStatus,
        /// The requested status.
        to: LogisticsStatus,
    },
    /// The donation holds no item of the type the request asks for.
    IncompatibleMatch {
        /// The donation identifier.
        donation_id: i64,
        /// The request identifier.
        request_id: i64,
        /// The requested item type.
        item_type: String,
    },
    /// A participant does not hold the role an operation requires.
    ParticipantRoleMismatch {
        /// The participant identifier.
        participant_id: i64,
        /// The role that was required.
        expected: &'static str,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidItemName(msg) => write!(f, "Invalid item name: {msg}"),
            Self::InvalidItemType(msg) => write!(f, "Invalid item type: {msg}"),
            Self::InvalidQuantity { field, value } => {
                write!(f, "Invalid {field}: {value}. Must be at least 1")
            }
            Self::EmptyDonation => write!(f, "A donation must contain at least one item"),
            Self::MissingRejectionReason => write!(f, "A rejection reason is required"),
            Self::InvalidLocation { lat, lng } => {
                write!(f, "Invalid location ({lat}, {lng})")
            }
            Self::InvalidDonationStatus(s) => write!(f, "Invalid donation status: '{s}'"),
            Self::InvalidRequestStatus(s) => write!(f, "Invalid request status: '{s}'"),
            Self::InvalidLogisticsStatus(s) => write!(f, "Invalid logistics status: '{s}'"),
            Self::InvalidUrgency(s) => write!(f, "Invalid urgency: '{s}'"),
            Self::InvalidItemCondition(s) => write!(f, "Invalid item condition: '{s}'"),
            Self::InvalidParticipantRole(s) => write!(f, "Invalid participant role: '{s}'"),
            Self::InvalidNotificationType(s) => write!(f, "Invalid notification type: '{s}'"),
            Self::InvalidTrackingId(s) => write!(f, "Invalid tracking id: '{s}'"),
            Self::InvalidDonationTransition {
                donation_id,
                from,
                to,
            } => {
                write!(
                    f,
                    "Donation {donation_id} cannot move from '{from}' to '{to}'"
                )
            }
            Self::InvalidRequestTransition {
                request_id,
                from,
                to,
            } => {
                write!(f, "Request {request_id} cannot move from '{from}' to '{to}'")
            }
            Self::InvalidLogisticsTransition {
                logistics_id,
                from,
                to,
            } => {
                write!(
                    f,
                    "Logistics record {logistics_id} cannot move from '{from}' to '{to}'"
                )
            }
            Self::IncompatibleMatch {
                donation_id,
                request_id,
                item_type,
            } => {
                write!(
                    f,
                    "Donation {donation_id} has no '{item_type}' items to satisfy request {request_id}"
                )
            }
            Self::ParticipantRoleMismatch {
                participant_id,
                expected,
            } => {
                write!(f, "Participant {participant_id} is not a {expected}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
