// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lifecycle states for donations, requests and logistics records.
//!
//! Each status enum owns its transition table. Transitions are only
//! ever requested by commands; nothing advances a status based on time.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DonationStatus {
    /// Submitted and awaiting review. The only state eligible for matching.
    #[default]
    Pending,
    /// Approved by an administrator, either directly or through a match.
    Approved,
    /// Rejected by an administrator.
    Rejected,
    /// Picked up and on its way to the recipient.
    InTransit,
    /// Handed over to the recipient.
    Delivered,
    /// Withdrawn before delivery.
    Cancelled,
}

impl FromStr for DonationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "in-transit" => Ok(Self::InTransit),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidDonationStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl DonationStatus {
    /// Converts this status to its storage and wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::InTransit => "in-transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - `pending` → `approved`, `rejected`, `cancelled`
    /// - `approved` → `in-transit`, `delivered`, `cancelled`
    /// - `in-transit` → `delivered`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Pending,
                Self::Approved | Self::Rejected | Self::Cancelled
            ) | (
                Self::Approved,
                Self::InTransit | Self::Delivered | Self::Cancelled
            ) | (Self::InTransit, Self::Delivered)
        )
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Delivered | Self::Cancelled)
    }
}

/// Lifecycle state of a recipient request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Open and eligible as a match candidate.
    #[default]
    Pending,
    /// Paired with a donation that has not yet been delivered.
    Matched,
    /// Fully satisfied.
    Fulfilled,
    /// Withdrawn by the recipient or an administrator.
    Cancelled,
    /// Some, but not all, of the requested quantity has been donated.
    PartiallyFulfilled,
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "matched" => Ok(Self::Matched),
            "fulfilled" => Ok(Self::Fulfilled),
            "cancelled" => Ok(Self::Cancelled),
            "partially_fulfilled" => Ok(Self::PartiallyFulfilled),
            _ => Err(DomainError::InvalidRequestStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl RequestStatus {
    /// Converts this status to its storage and wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Matched => "matched",
            Self::Fulfilled => "fulfilled",
            Self::Cancelled => "cancelled",
            Self::PartiallyFulfilled => "partially_fulfilled",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// `fulfilled` and `cancelled` are terminal. Every open status may be
    /// cancelled, fulfilled or partially fulfilled; `matched` and
    /// `partially_fulfilled` may fall back to `pending` when the paired
    /// donation is rejected.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Pending,
                Self::Matched | Self::PartiallyFulfilled | Self::Fulfilled | Self::Cancelled
            ) | (
                Self::Matched,
                Self::Pending | Self::PartiallyFulfilled | Self::Fulfilled | Self::Cancelled
            ) | (
                Self::PartiallyFulfilled,
                Self::Pending | Self::Matched | Self::Fulfilled | Self::Cancelled
            )
        )
    }

    /// Returns whether the request still expects donations.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Matched | Self::PartiallyFulfilled
        )
    }
}

/// Delivery state of a logistics record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogisticsStatus {
    /// Pickup and delivery dates are planned.
    #[default]
    Scheduled,
    /// Items have been collected from the donor.
    PickedUp,
    /// Items are on their way.
    InTransit,
    /// Items reached the recipient.
    Delivered,
}

impl FromStr for LogisticsStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "picked-up" => Ok(Self::PickedUp),
            "in-transit" => Ok(Self::InTransit),
            "delivered" => Ok(Self::Delivered),
            _ => Err(DomainError::InvalidLogisticsStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for LogisticsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl LogisticsStatus {
    /// Converts this status to its storage and wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::PickedUp => "picked-up",
            Self::InTransit => "in-transit",
            Self::Delivered => "delivered",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Logistics only ever advances one step at a time:
    /// `scheduled` → `picked-up` → `in-transit` → `delivered`.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Scheduled, Self::PickedUp)
                | (Self::PickedUp, Self::InTransit)
                | (Self::InTransit, Self::Delivered)
        )
    }

    /// Returns the donation status implied by entering this logistics status, if any.
    #[must_use]
    pub const fn implied_donation_status(&self) -> Option<DonationStatus> {
        match self {
            Self::InTransit => Some(DonationStatus::InTransit),
            Self::Delivered => Some(DonationStatus::Delivered),
            Self::Scheduled | Self::PickedUp => None,
        }
    }
}
