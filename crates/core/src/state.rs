// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sdms_audit::{AuditEvent, StateSnapshot};
use sdms_domain::{Donation, Logistics, Request};

/// The entities a single command reads and writes.
///
/// A command only ever touches a donation, a request, a logistics record
/// or a combination of them. Entities the command does not need are left
/// as `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    /// The donation in scope, if any.
    pub donation: Option<Donation>,
    /// The request in scope, if any.
    pub request: Option<Request>,
    /// The logistics record in scope, if any.
    pub logistics: Option<Logistics>,
}

impl State {
    /// Creates an empty state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            donation: None,
            request: None,
            logistics: None,
        }
    }

    /// Adds a donation to the state.
    #[must_use]
    pub fn with_donation(mut self, donation: Donation) -> Self {
        self.donation = Some(donation);
        self
    }

    /// Adds a request to the state.
    #[must_use]
    pub fn with_request(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }

    /// Adds a logistics record to the state.
    #[must_use]
    pub fn with_logistics(mut self, logistics: Logistics) -> Self {
        self.logistics = Some(logistics);
        self
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if let Some(donation) = &self.donation {
            pairs.push(("donation_status", donation.status.to_string()));
        }
        if let Some(request) = &self.request {
            pairs.push(("request_status", request.status.to_string()));
            pairs.push((
                "request_quantity_fulfilled",
                request.quantity_fulfilled.to_string(),
            ));
        }
        if let Some(logistics) = &self.logistics {
            pairs.push(("logistics_status", logistics.status.to_string()));
        }
        StateSnapshot::from_pairs(&pairs)
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: State,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
