//! Security deposit hold types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use rentora_shared::types::{BookingId, Currency, DepositHoldId};

/// Lifecycle of a deposit hold.
///
/// Strictly monotonic: `Held` may move to `Released` or `Captured`, and the
/// settled states never move again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldStatus {
    /// Deposit is sitting in escrow.
    Held,
    /// Deposit was returned to the renter in full.
    Released,
    /// Some or all of the deposit was captured against a damage claim.
    Captured,
}

impl HoldStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Held => "held",
            Self::Released => "released",
            Self::Captured => "captured",
        }
    }

    /// Returns true once the hold has settled and can no longer change.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Released | Self::Captured)
    }
}

impl fmt::Display for HoldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A security deposit held in escrow for one booking.
///
/// At most one hold exists per booking. `version` guards concurrent
/// settlement attempts: the store rejects an update whose version does not
/// match the stored one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositHold {
    /// Unique identifier.
    pub id: DepositHoldId,
    /// The booking this hold belongs to.
    pub booking_id: BookingId,
    /// The held amount.
    pub amount: Decimal,
    /// Currency of the held amount.
    pub currency: Currency,
    /// Current hold status.
    pub status: HoldStatus,
    /// When the hold was placed.
    pub held_at: DateTime<Utc>,
    /// When the hold was released (full or remainder).
    pub released_at: Option<DateTime<Utc>>,
    /// When a damage claim was captured.
    pub captured_at: Option<DateTime<Utc>>,
    /// Optimistic-concurrency version, starting at 1.
    pub version: u64,
}

impl DepositHold {
    /// Creates a new hold in the `Held` state.
    #[must_use]
    pub fn new(
        booking_id: BookingId,
        amount: Decimal,
        currency: Currency,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DepositHoldId::new(),
            booking_id,
            amount,
            currency,
            status: HoldStatus::Held,
            held_at: now,
            released_at: None,
            captured_at: None,
            version: 1,
        }
    }
}
