//! Ledger entry domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use rentora_shared::types::{AccountId, BookingId, Currency, LedgerEntryId};

/// Side of a ledger entry.
///
/// Amounts are always non-negative; the sign of a monetary fact is carried
/// by the side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Debit entry (money leaving the account's balance).
    Debit,
    /// Credit entry (money entering the account's balance).
    Credit,
}

/// Classification of the financial event behind an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Renter payment for a booking.
    Payment,
    /// Owner earnings from a booking.
    Earnings,
    /// Refund back to the renter on cancellation.
    Refund,
    /// Security deposit moved into escrow.
    DepositHold,
    /// Security deposit returned from escrow.
    DepositRelease,
    /// Platform commission on a booking.
    PlatformFee,
    /// Settlement of accrued earnings to an owner.
    Payout,
}

/// One signed monetary fact against an account. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for this entry.
    pub id: LedgerEntryId,
    /// The account affected by this entry.
    pub account_id: AccountId,
    /// Whether this is a debit or credit.
    pub side: EntrySide,
    /// The financial event this entry records.
    pub kind: EntryKind,
    /// The booking this entry is tied to (None for platform-level entries).
    pub booking_id: Option<BookingId>,
    /// Non-negative amount; sign is carried by `side`.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: Currency,
    /// Human-readable description for audit display.
    pub description: String,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates a new entry with a fresh time-ordered id.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_id: AccountId,
        side: EntrySide,
        kind: EntryKind,
        booking_id: Option<BookingId>,
        amount: Decimal,
        currency: Currency,
        description: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: LedgerEntryId::new(),
            account_id,
            side,
            kind,
            booking_id,
            amount,
            currency,
            description,
            created_at,
        }
    }

    /// Returns the signed amount (positive for credit, negative for debit).
    ///
    /// Balances are credit-normal: `balance = credits - debits`.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.side {
            EntrySide::Credit => self.amount,
            EntrySide::Debit => -self.amount,
        }
    }
}

/// Computes an account's balance over a slice of entries.
///
/// The balance is CREDIT total minus DEBIT total for the account in the
/// given currency, over all entries (settled and unsettled).
#[must_use]
pub fn balance_of(entries: &[LedgerEntry], account_id: AccountId, currency: Currency) -> Decimal {
    entries
        .iter()
        .filter(|e| e.account_id == account_id && e.currency == currency)
        .map(LedgerEntry::signed_amount)
        .sum()
}
