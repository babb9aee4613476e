// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

#[cfg(test)]
mod tests;

/// Actor type recorded for operator-initiated changes.
pub const OPERATOR_ACTOR_TYPE: &str = "operator";

/// Actor type recorded for changes made by the automatic matcher.
pub const SYSTEM_ACTOR_TYPE: &str = "system";

/// The entity performing an action.
///
/// An operator approving a match, a donor cancelling their own donation
/// or the automatic matcher are all actors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "operator", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// The actor used for automatic match approvals.
    #[must_use]
    pub fn system() -> Self {
        Self::new(
            String::from("auto-matcher"),
            String::from(SYSTEM_ACTOR_TYPE),
        )
    }

    /// Returns whether this actor is the automatic matcher or another
    /// system process.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.actor_type == SYSTEM_ACTOR_TYPE
    }
}

/// The reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// An identifier for this cause (e.g., an HTTP request id).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// The state change that was performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`ApproveMatch`", "`RejectDonation`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact textual snapshot of the entities touched by a transition.
///
/// Snapshots are `key=value` pairs joined by commas, for example
/// `donation_status=pending,request_status=pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// The rendered snapshot.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// Builds a snapshot from `key=value` pairs, preserving order.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, String)]) -> Self {
        let data: String = pairs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<String>>()
            .join(",");
        Self { data }
    }

    /// Looks up the value recorded for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.split(',').find_map(|pair| {
            pair.split_once('=')
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v)
        })
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful donation or request transition produces exactly one
/// audit event, written in the same transaction as the state change.
/// An event captures:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before and after the transition
/// - The donation and request it concerns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Storage identifier, assigned once persisted.
    pub event_id: Option<i64>,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// The donation this event concerns, if any.
    pub donation_id: Option<i64>,
    /// The request this event concerns, if any.
    pub request_id: Option<i64>,
}

impl AuditEvent {
    /// Creates a new, unpersisted `AuditEvent` with no subjects.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
            donation_id: None,
            request_id: None,
        }
    }

    /// Attaches the donation and request this event concerns.
    #[must_use]
    pub const fn with_subjects(mut self, donation_id: Option<i64>, request_id: Option<i64>) -> Self {
        self.donation_id = donation_id;
        self.request_id = request_id;
        self
    }

    /// Returns a copy carrying the storage identifier.
    #[must_use]
    pub const fn with_event_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }
}
