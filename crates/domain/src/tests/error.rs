// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, DonationStatus, LogisticsStatus, RequestStatus};

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidName(String::from("test"));
    assert_eq!(format!("{err}"), "Invalid name: test");

    let err: DomainError = DomainError::InvalidQuantity {
        field: "request quantity",
        value: 0,
    };
    assert_eq!(
        format!("{err}"),
        "Invalid request quantity: 0. Must be at least 1"
    );

    let err: DomainError = DomainError::EmptyDonation;
    assert_eq!(
        format!("{err}"),
        "A donation must contain at least one item"
    );

    let err: DomainError = DomainError::InvalidUrgency(String::from("asap"));
    assert_eq!(format!("{err}"), "Invalid urgency: 'asap'");
}

#[test]
fn test_transition_error_display_uses_wire_names() {
    let err: DomainError = DomainError::InvalidDonationTransition {
        donation_id: 7,
        from: DonationStatus::Approved,
        to: DonationStatus::Approved,
    };
    assert_eq!(
        format!("{err}"),
        "Donation 7 cannot move from 'approved' to 'approved'"
    );

    let err: DomainError = DomainError::InvalidRequestTransition {
        request_id: 3,
        from: RequestStatus::Fulfilled,
        to: RequestStatus::PartiallyFulfilled,
    };
    assert_eq!(
        format!("{err}"),
        "Request 3 cannot move from 'fulfilled' to 'partially_fulfilled'"
    );

    let err: DomainError = DomainError::InvalidLogisticsTransition {
        logistics_id: 1,
        from: LogisticsStatus::Scheduled,
        to: LogisticsStatus::InTransit,
    };
    assert_eq!(
        format!("{err}"),
        "Logistics record 1 cannot move from 'scheduled' to 'in-transit'"
    );
}

#[test]
fn test_incompatible_match_display() {
    let err: DomainError = DomainError::IncompatibleMatch {
        donation_id: 1,
        request_id: 2,
        item_type: String::from("books"),
    };
    assert_eq!(
        format!("{err}"),
        "Donation 1 has no 'books' items to satisfy request 2"
    );
}
