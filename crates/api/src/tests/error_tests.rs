// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sdms::CoreError;
use sdms_domain::{DomainError, DonationStatus};
use sdms_persistence::PersistenceError;

use crate::{
    ApiError, SideEffectError, SideEffectReport, translate_core_error, translate_domain_error,
    translate_persistence_error,
};

#[test]
fn test_field_errors_become_invalid_input() {
    let err: ApiError = translate_domain_error(DomainError::InvalidQuantity {
        field: "request quantity",
        value: 0,
    });

    assert!(matches!(
        err,
        ApiError::InvalidInput { field, .. } if field == "request quantity"
    ));
}

#[test]
fn test_lifecycle_errors_become_conflicts() {
    let err: ApiError = translate_core_error(CoreError::DomainViolation(
        DomainError::InvalidDonationTransition {
            donation_id: 3,
            from: DonationStatus::Approved,
            to: DonationStatus::Approved,
        },
    ));

    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_persistence_errors_are_classified() {
    assert!(matches!(
        translate_persistence_error("Donation", PersistenceError::NotFound(String::from("7"))),
        ApiError::ResourceNotFound { resource_type, .. } if resource_type == "Donation"
    ));
    assert!(matches!(
        translate_persistence_error(
            "Transition",
            PersistenceError::ConcurrentModification {
                entity: "request",
                id: 2
            }
        ),
        ApiError::Conflict { .. }
    ));
    assert!(matches!(
        translate_persistence_error(
            "Donation",
            PersistenceError::QueryFailed(String::from("disk I/O error"))
        ),
        ApiError::DependencyFailure { .. }
    ));
}

#[test]
fn test_side_effect_report_serializes_failures() {
    let mut report: SideEffectReport = SideEffectReport::new();
    assert!(report.is_complete());
    report.record(SideEffectError::Logistics {
        donation_id: 9,
        message: String::from("scheduler unavailable"),
    });

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();

    assert!(!report.is_complete());
    assert_eq!(json["failures"][0]["effect"], "logistics");
    assert_eq!(json["failures"][0]["donation_id"], 9);
}
