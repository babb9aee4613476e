// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{DonationItem, Location};

/// Validates a participant name.
///
/// # Errors
///
/// Returns an error if the name is empty or whitespace.
pub fn validate_participant_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates the items of a new donation.
///
/// # Arguments
///
/// * `items` - The items submitted with the donation
///
/// # Returns
///
/// * `Ok(())` if every item is well formed
/// * `Err(DomainError)` for the first violation found
///
/// # Errors
///
/// Returns an error if:
/// - There are no items
/// - Any item name or item type is empty
/// - Any item quantity is zero
pub fn validate_donation_items(items: &[DonationItem]) -> Result<(), DomainError> {
    if items.is_empty() {
        return Err(DomainError::EmptyDonation);
    }

    for item in items {
        if item.item_name.trim().is_empty() {
            return Err(DomainError::InvalidItemName(String::from(
                "Item name cannot be empty",
            )));
        }
        validate_item_type(&item.item_type)?;
        if item.quantity == 0 {
            return Err(DomainError::InvalidQuantity {
                field: "item quantity",
                value: 0,
            });
        }
    }

    Ok(())
}

/// Validates the fields of a new request.
///
/// # Errors
///
/// Returns an error if the item type is empty or the quantity is zero.
pub fn validate_request_fields(item_type: &str, quantity: u32) -> Result<(), DomainError> {
    validate_item_type(item_type)?;
    if quantity == 0 {
        return Err(DomainError::InvalidQuantity {
            field: "request quantity",
            value: 0,
        });
    }
    Ok(())
}

/// Validates that an item type is non-empty.
///
/// # Errors
///
/// Returns an error if the item type is empty or whitespace.
pub fn validate_item_type(item_type: &str) -> Result<(), DomainError> {
    if item_type.trim().is_empty() {
        return Err(DomainError::InvalidItemType(String::from(
            "Item type cannot be empty",
        )));
    }
    Ok(())
}

/// Validates that a location holds finite, in-range coordinates.
///
/// # Errors
///
/// Returns an error if latitude is outside `[-90, 90]`, longitude is
/// outside `[-180, 180]`, or either is not finite.
pub fn validate_location(location: &Location) -> Result<(), DomainError> {
    let lat_ok: bool = location.lat.is_finite() && (-90.0..=90.0).contains(&location.lat);
    let lng_ok: bool = location.lng.is_finite() && (-180.0..=180.0).contains(&location.lng);
    if !lat_ok || !lng_ok {
        return Err(DomainError::InvalidLocation {
            lat: location.lat.to_string(),
            lng: location.lng.to_string(),
        });
    }
    Ok(())
}

/// Validates a donation rejection reason.
///
/// # Errors
///
/// Returns an error if the reason is empty or whitespace.
pub fn validate_rejection_reason(reason: &str) -> Result<(), DomainError> {
    if reason.trim().is_empty() {
        return Err(DomainError::MissingRejectionReason);
    }
    Ok(())
}
