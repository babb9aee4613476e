// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_donation, create_test_request, item, test_now};
use crate::{
    ADDRESS_PLACEHOLDER, DomainError, Donation, ItemCondition, Location, NotificationType,
    Participant, ParticipantRole, TRACKING_ID_LEN, TRACKING_ID_PREFIX, TrackingId, Urgency,
};
use std::str::FromStr;

#[test]
fn test_donation_aggregates_items() {
    let donation: Donation = create_test_donation(
        1,
        vec![item("food", 4), item("books", 3), item("food", 6)],
    );

    assert_eq!(donation.total_quantity(), 13);
    assert_eq!(donation.quantity_of_type("food"), 10);
    assert_eq!(donation.quantity_of_type("toys"), 0);
    assert_eq!(donation.item_types(), vec!["food", "books"]);
    assert!(donation.has_item_type("books"));
    assert!(!donation.has_item_type("Books"));
    assert_eq!(donation.item_names(), "food box, books box, food box");
}

#[test]
fn test_total_quantity_saturates() {
    let donation: Donation = create_test_donation(1, vec![item("food", u32::MAX), item("food", 5)]);
    assert_eq!(donation.total_quantity(), u32::MAX);
}

#[test]
fn test_request_remaining_quantity() {
    let mut request = create_test_request(1, "food", 10, Urgency::High, test_now());
    request.quantity_fulfilled = 4;
    assert_eq!(request.remaining_quantity(), 6);
    request.quantity_fulfilled = 12;
    assert_eq!(request.remaining_quantity(), 0);
}

#[test]
fn test_urgency_points_and_names() {
    assert_eq!(Urgency::Low.points(), 25);
    assert_eq!(Urgency::Medium.points(), 50);
    assert_eq!(Urgency::High.points(), 75);
    assert_eq!(Urgency::Critical.points(), 100);
    assert_eq!(Urgency::from_str("critical").unwrap(), Urgency::Critical);
    assert_eq!(Urgency::default(), Urgency::Medium);
    assert!(matches!(
        Urgency::from_str("urgent"),
        Err(DomainError::InvalidUrgency(_))
    ));
}

#[test]
fn test_item_condition_and_role_parsing() {
    assert_eq!(ItemCondition::from_str("fair").unwrap(), ItemCondition::Fair);
    assert_eq!(ItemCondition::Poor.as_str(), "poor");
    assert!(ItemCondition::from_str("broken").is_err());
    assert_eq!(ParticipantRole::from_str("donor").unwrap(), ParticipantRole::Donor);
    assert!(ParticipantRole::from_str("guest").is_err());
}

#[test]
fn test_notification_type_wire_names() {
    for kind in [
        NotificationType::DonationMatched,
        NotificationType::DonationInTransit,
        NotificationType::RequestFulfilled,
        NotificationType::General,
    ] {
        assert_eq!(NotificationType::from_str(kind.as_str()).unwrap(), kind);
    }
    assert_eq!(
        NotificationType::DonationInTransit.as_str(),
        "donation_in_transit"
    );
}

#[test]
fn test_location_distance_is_planar() {
    let a = Location::new(0.0, 0.0);
    let b = Location::new(3.0, 4.0);
    assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
    assert!(a.distance_to(&a).abs() < f64::EPSILON);
}

#[test]
fn test_participant_address_placeholder() {
    let mut participant = Participant {
        participant_id: 1,
        name: String::from("Dana"),
        role: ParticipantRole::Donor,
        address: None,
        location: None,
    };
    assert_eq!(participant.address_or_placeholder(), ADDRESS_PLACEHOLDER);

    participant.address = Some(String::from("   "));
    assert_eq!(participant.address_or_placeholder(), ADDRESS_PLACEHOLDER);

    participant.address = Some(String::from("12 Elm St"));
    assert_eq!(participant.address_or_placeholder(), "12 Elm St");
}

#[test]
fn test_tracking_id_from_seed_is_base36() {
    assert_eq!(TrackingId::from_seed(0).value(), "SDMS-000000");
    assert_eq!(TrackingId::from_seed(35).value(), "SDMS-00000Z");
    assert_eq!(TrackingId::from_seed(36).value(), "SDMS-000010");
    // Seeds wider than six digits keep the low-order digits.
    assert_eq!(TrackingId::from_seed(36_u64.pow(6)).value(), "SDMS-000000");
}

#[test]
fn test_tracking_id_shape() {
    let id = TrackingId::from_seed(u64::MAX);
    let suffix = id.value().strip_prefix(TRACKING_ID_PREFIX).unwrap();
    assert_eq!(suffix.len(), TRACKING_ID_LEN);
    assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    assert_eq!(TrackingId::parse(id.value()).unwrap(), id);
}

#[test]
fn test_tracking_id_parse_normalizes_case() {
    let parsed = TrackingId::parse("sdms-ab12cd").unwrap();
    assert_eq!(parsed.value(), "SDMS-AB12CD");
    assert_eq!(parsed.to_string(), "SDMS-AB12CD");
}

#[test]
fn test_tracking_id_parse_rejects_malformed_values() {
    for bad in ["", "SDMS-", "SDMS-ABC", "SDMS-ABCDEFG", "XYZ-ABCDEF", "SDMS-AB_2CD"] {
        assert!(
            matches!(TrackingId::parse(bad), Err(DomainError::InvalidTrackingId(_))),
            "{bad} should be rejected"
        );
    }
}
