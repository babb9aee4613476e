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

mod apply;
mod command;
pub mod effects;
mod error;
mod state;

#[cfg(test)]
mod tests;

use sdms_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};

// Re-export public types and functions
pub use apply::apply;
pub use command::Command;
pub use error::CoreError;
pub use state::{State, TransitionResult};

/// Builds the audit event recorded when a participant, donation or
/// request is created.
///
/// Creation is not a transition, so there is no command for it. The
/// event's subjects are filled in by storage once identifiers exist.
///
/// # Arguments
///
/// * `actor` - The actor creating the entity
/// * `cause` - The cause or reason for this action
/// * `name` - The action name (e.g. "`CreateDonation`")
/// * `details` - A human readable summary
/// * `after` - Snapshot of the created entity
#[must_use]
pub fn creation_event(
    actor: Actor,
    cause: Cause,
    name: &str,
    details: String,
    after: StateSnapshot,
) -> AuditEvent {
    AuditEvent::new(
        actor,
        cause,
        Action::new(name.to_string(), Some(details)),
        StateSnapshot::new(String::new()),
        after,
    )
}
