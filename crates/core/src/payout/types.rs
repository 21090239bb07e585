//! Payout types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use rentora_shared::types::{AccountId, Currency, LedgerEntryId, PayoutId};

/// Lifecycle of a payout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    /// Created and handed to the payment processor.
    Requested,
    /// Processor confirmed the transfer; the settlement batch is posted.
    Paid,
    /// Processor rejected the transfer; covered entries become eligible
    /// again. The ledger is never rolled back.
    Failed,
}

impl PayoutStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }

    /// Returns true once the payout has been confirmed or rejected.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Paid | Self::Failed)
    }
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payout of accrued earnings to an owner's account.
///
/// `covered_entry_ids` lists the exact credit entries the amount was
/// aggregated from; their sum equals `amount`, and a non-failed payout is
/// the only one allowed to reference them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payout {
    /// Unique identifier.
    pub id: PayoutId,
    /// The account being paid out.
    pub account_id: AccountId,
    /// Total of the covered entries.
    pub amount: Decimal,
    /// Currency of the payout.
    pub currency: Currency,
    /// Current payout status.
    pub status: PayoutStatus,
    /// The ledger entries this payout covers.
    pub covered_entry_ids: Vec<LedgerEntryId>,
    /// When the payout was requested.
    pub created_at: DateTime<Utc>,
    /// When the processor confirmed or rejected the payout.
    pub finalized_at: Option<DateTime<Utc>>,
}

/// The eligible credits an account has accrued, as computed by the
/// aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleCredits {
    /// Sum of the eligible entries.
    pub amount: Decimal,
    /// The entries making up the sum.
    pub entry_ids: Vec<LedgerEntryId>,
}

impl EligibleCredits {
    /// An empty aggregation.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            amount: Decimal::ZERO,
            entry_ids: Vec::new(),
        }
    }
}
