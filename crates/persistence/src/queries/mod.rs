// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `audit`: Audit event lookups
//! - `donations`: Donations with their items, candidate pools
//! - `logistics`: Logistics records
//! - `notifications`: Per-participant notification lists and counts
//! - `participants`: Participant lookups
//! - `requests`: Requests and candidate pools

pub mod audit;
pub mod donations;
pub mod logistics;
pub mod notifications;
pub mod participants;
pub mod requests;
