// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sdms_domain::{DonationStatus, LogisticsStatus};
use time::OffsetDateTime;

/// A command represents operator or system intent as data only.
///
/// Commands are the only way to change the status of an existing
/// donation, request or logistics record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pair a pending donation with a request.
    ApproveMatch {
        /// When the match was approved.
        approved_at: OffsetDateTime,
        /// Whether the auto-matcher made the decision.
        is_automatic: bool,
    },
    /// Approve a donation on its own, crediting its related request.
    ApproveDonation {
        /// When the donation was approved.
        approved_at: OffsetDateTime,
    },
    /// Reject a pending donation.
    RejectDonation {
        /// Why the donation was rejected.
        reason: String,
        /// Whether a matched related request goes back to pending.
        ///
        /// Must be `false` while another donation holds the match.
        release_request: bool,
    },
    /// Move a donation along its delivery lifecycle.
    ///
    /// Approval and rejection have dedicated commands and are refused here.
    UpdateDonationStatus {
        /// The target status.
        status: DonationStatus,
    },
    /// Withdraw an open request.
    CancelRequest,
    /// Advance a logistics record by one step.
    UpdateLogisticsStatus {
        /// The target status.
        status: LogisticsStatus,
        /// When the change happened.
        updated_at: OffsetDateTime,
    },
}

impl Command {
    /// The audit action name recorded for this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ApproveMatch { .. } => "ApproveMatch",
            Self::ApproveDonation { .. } => "ApproveDonation",
            Self::RejectDonation { .. } => "RejectDonation",
            Self::UpdateDonationStatus { .. } => "UpdateDonationStatus",
            Self::CancelRequest => "CancelRequest",
            Self::UpdateLogisticsStatus { .. } => "UpdateLogisticsStatus",
        }
    }
}
