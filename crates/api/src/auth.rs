// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Authentication is a stub: the caller names an actor id and a role and
//! is trusted. Authorization is enforced here for every operation.

use std::str::FromStr;

use sdms_audit::Actor;

use crate::error::AuthError;

/// Actor roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Administrators review donations, approve matches and run the
    /// auto-matcher. They may act on any participant's data.
    Admin,
    /// Donors submit donations and follow their delivery.
    Donor,
    /// Recipients submit and cancel requests.
    Recipient,
}

impl Role {
    /// The wire name of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Donor => "donor",
            Self::Recipient => "recipient",
        }
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "donor" => Ok(Self::Donor),
            "recipient" => Ok(Self::Recipient),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown role '{s}'"),
            }),
        }
    }
}

/// An authenticated actor with an associated role.
///
/// For donors and recipients the id is their participant id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role.as_str().to_string())
    }

    /// Whether this actor is the given participant.
    #[must_use]
    pub fn is_participant(&self, participant_id: i64) -> bool {
        self.id.parse::<i64>().is_ok_and(|id| id == participant_id)
    }
}

/// Stub authentication.
///
/// Accepts any non-empty actor id with a known role.
///
/// # Arguments
///
/// * `actor_id` - The identifier of the actor to authenticate
/// * `role` - The role name to assign to the actor
///
/// # Errors
///
/// Returns an error if the id is empty or the role is unknown.
pub fn authenticate_stub(actor_id: &str, role: &str) -> Result<AuthenticatedActor, AuthError> {
    if actor_id.trim().is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    let role: Role = role.parse()?;
    Ok(AuthenticatedActor::new(actor_id.trim().to_string(), role))
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Requires the Admin role.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin.
    pub fn authorize_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Donor | Role::Recipient => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Allows admins and the participant themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-admin actor acts for another participant.
    pub fn authorize_self_or_admin(
        actor: &AuthenticatedActor,
        participant_id: i64,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.role == Role::Admin || actor.is_participant(participant_id) {
            return Ok(());
        }
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: String::from("Admin or owning participant"),
        })
    }

    /// Allows admins and any of the listed participants.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-admin actor is none of the participants.
    pub fn authorize_any_of_or_admin(
        actor: &AuthenticatedActor,
        participant_ids: &[Option<i64>],
        action: &str,
    ) -> Result<(), AuthError> {
        let involved: bool = participant_ids
            .iter()
            .flatten()
            .any(|id| actor.is_participant(*id));
        if actor.role == Role::Admin || involved {
            return Ok(());
        }
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: String::from("Admin or involved participant"),
        })
    }
}
