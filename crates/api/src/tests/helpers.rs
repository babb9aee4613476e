// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use sdms_audit::Cause;
use sdms_domain::{Donation, Location, NewLogistics, NewNotification, Participant, Request};
use sdms_persistence::Persistence;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::{
    AuthenticatedActor, CreateDonationRequest, CreateRequestRequest, DonationItemInput,
    PersistedSideEffects, RegisterParticipantRequest, Role, SideEffectError, SideEffectSink,
    create_donation, create_request, register_participant,
};

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 12:00 UTC)
}

pub fn days_ago(days: i64) -> OffsetDateTime {
    test_now() - Duration::days(days)
}

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-123"), Role::Admin)
}

pub fn actor_for(participant: &Participant) -> AuthenticatedActor {
    let role: Role = participant.role.as_str().parse().unwrap();
    AuthenticatedActor::new(participant.participant_id.to_string(), role)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn register(
    persistence: &mut Persistence,
    name: &str,
    role: &str,
    location: Option<Location>,
) -> Participant {
    register_participant(
        persistence,
        RegisterParticipantRequest {
            name: name.to_string(),
            role: role.to_string(),
            address: Some(format!("{name} street")),
            location,
        },
        &create_test_admin(),
        create_test_cause(),
    )
    .expect("Failed to register participant")
    .participant
}

/// A fresh database with a located donor and a recipient without location.
pub fn setup_test_persistence() -> (Persistence, Participant, Participant) {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create persistence");
    let donor: Participant = register(
        &mut persistence,
        "Dana Donor",
        "donor",
        Some(Location::new(0.0, 0.0)),
    );
    let recipient: Participant = register(&mut persistence, "Rey Recipient", "recipient", None);
    (persistence, donor, recipient)
}

pub fn item_input(item_type: &str, quantity: u32) -> DonationItemInput {
    DonationItemInput {
        item_name: format!("{item_type} box"),
        item_type: item_type.to_string(),
        quantity,
        condition: String::from("good"),
    }
}

pub fn submit_donation(
    persistence: &mut Persistence,
    donor_id: i64,
    items: Vec<DonationItemInput>,
    submitted_at: OffsetDateTime,
) -> Donation {
    create_donation(
        persistence,
        &mut PersistedSideEffects,
        CreateDonationRequest {
            donor_id,
            items,
            description: None,
            related_request_id: None,
        },
        &create_test_admin(),
        create_test_cause(),
        submitted_at,
    )
    .expect("Failed to create donation")
    .donation
}

pub fn submit_request(
    persistence: &mut Persistence,
    recipient_id: i64,
    item_type: &str,
    quantity: u32,
    urgency: &str,
    submitted_at: OffsetDateTime,
) -> Request {
    create_request(
        persistence,
        CreateRequestRequest {
            recipient_id,
            item_type: item_type.to_string(),
            quantity,
            urgency: urgency.to_string(),
            location: None,
            description: None,
        },
        &create_test_admin(),
        create_test_cause(),
        submitted_at,
    )
    .expect("Failed to create request")
    .request
}

/// A sink that fails the selected effects and stores the rest.
#[derive(Debug, Default)]
pub struct FailingSink {
    pub fail_notifications: bool,
    pub fail_logistics: bool,
    pub attempted_notifications: usize,
    pub attempted_logistics: usize,
}

impl FailingSink {
    pub fn failing_everything() -> Self {
        Self {
            fail_notifications: true,
            fail_logistics: true,
            ..Self::default()
        }
    }
}

impl SideEffectSink for FailingSink {
    fn deliver_notification(
        &mut self,
        persistence: &mut Persistence,
        notification: &NewNotification,
        now: OffsetDateTime,
    ) -> Result<i64, SideEffectError> {
        self.attempted_notifications += 1;
        if self.fail_notifications {
            return Err(SideEffectError::Notification {
                recipient_id: notification.recipient_id,
                message: String::from("notification service unavailable"),
            });
        }
        PersistedSideEffects.deliver_notification(persistence, notification, now)
    }

    fn create_logistics(
        &mut self,
        persistence: &mut Persistence,
        record: &NewLogistics,
        now: OffsetDateTime,
    ) -> Result<i64, SideEffectError> {
        self.attempted_logistics += 1;
        if self.fail_logistics {
            return Err(SideEffectError::Logistics {
                donation_id: record.donation_id,
                message: String::from("scheduler unavailable"),
            });
        }
        PersistedSideEffects.create_logistics(persistence, record, now)
    }
}
