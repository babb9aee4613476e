// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Every public function that writes more than one row runs inside a
//! single transaction. Updates of existing entities are conditional on the
//! values they were loaded with, so a concurrent writer is detected as
//! `ConcurrentModification` instead of being silently overwritten.

pub mod audit;
pub mod donations;
pub mod logistics;
pub mod notifications;
pub mod participants;
pub mod requests;
pub mod transition;
