//! Balanced-batch validation and batch builders.
//!
//! Every booking transition with a monetary consequence is expressed as one
//! balanced batch of entries. Batches are validated before any entry is
//! persisted, so a partial write (debiting the renter but never crediting
//! the owner) is structurally impossible.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use rentora_shared::types::AccountId;

use super::accounts::{DEPOSIT_ESCROW, PAYOUT_CLEARING, PLATFORM_FEES};
use super::entry::{EntryKind, EntrySide, LedgerEntry};
use super::error::LedgerError;
use crate::booking::types::Booking;
use crate::deposit::types::DepositHold;
use crate::payout::types::Payout;

/// Validates that a batch of entries can be appended atomically.
///
/// A valid batch is non-empty, single-currency, strictly positive per entry,
/// has both sides, and balances (sum of debits equals sum of credits).
///
/// # Errors
///
/// Returns a `LedgerError` describing the first violated rule.
pub fn validate_batch(entries: &[LedgerEntry]) -> Result<(), LedgerError> {
    let Some(first) = entries.first() else {
        return Err(LedgerError::EmptyBatch);
    };

    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for entry in entries {
        if entry.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(entry.amount));
        }
        if entry.currency != first.currency {
            return Err(LedgerError::MixedCurrencies);
        }

        match entry.side {
            EntrySide::Debit => {
                total_debits += entry.amount;
                has_debit = true;
            }
            EntrySide::Credit => {
                total_credits += entry.amount;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerError::SingleSided);
    }

    if total_debits != total_credits {
        return Err(LedgerError::UnbalancedBatch {
            debits: total_debits,
            credits: total_credits,
        });
    }

    Ok(())
}

/// Builds the batch recording a successful renter payment.
///
/// DEBIT renter for `total_amount`; CREDIT owner for
/// `total_amount - platform_fee`; CREDIT platform for `platform_fee`.
/// Zero legs are omitted.
#[must_use]
pub fn payment_batch(booking: &Booking, owner: AccountId, now: DateTime<Utc>) -> Vec<LedgerEntry> {
    let owner_share = booking.owner_share();
    let mut entries = Vec::with_capacity(3);

    if booking.total_amount > Decimal::ZERO {
        entries.push(LedgerEntry::new(
            booking.renter_id,
            EntrySide::Debit,
            EntryKind::Payment,
            Some(booking.id),
            booking.total_amount,
            booking.currency,
            format!("Payment for booking {}", booking.id),
            now,
        ));
    }
    if owner_share > Decimal::ZERO {
        entries.push(LedgerEntry::new(
            owner,
            EntrySide::Credit,
            EntryKind::Earnings,
            Some(booking.id),
            owner_share,
            booking.currency,
            format!("Earnings for booking {}", booking.id),
            now,
        ));
    }
    if booking.platform_fee > Decimal::ZERO {
        entries.push(LedgerEntry::new(
            PLATFORM_FEES,
            EntrySide::Credit,
            EntryKind::PlatformFee,
            Some(booking.id),
            booking.platform_fee,
            booking.currency,
            format!("Platform fee for booking {}", booking.id),
            now,
        ));
    }

    entries
}

/// Builds the batch reversing a payment on cancellation.
///
/// The refund fraction comes from the external cancellation policy. The
/// renter is credited `total * fraction`; the owner and platform legs of the
/// original payment are debited proportionally, with the rounding remainder
/// carried by the platform leg so the batch always balances.
///
/// Returns an empty batch when the fraction is zero (no-refund policy).
///
/// # Errors
///
/// Returns `InvalidRefundFraction` if the fraction is negative or above 1.
pub fn refund_batch(
    booking: &Booking,
    owner: AccountId,
    fraction: Decimal,
    now: DateTime<Utc>,
) -> Result<Vec<LedgerEntry>, LedgerError> {
    if fraction < Decimal::ZERO || fraction > Decimal::ONE {
        return Err(LedgerError::InvalidRefundFraction(fraction));
    }
    if fraction.is_zero() || booking.total_amount.is_zero() {
        return Ok(Vec::new());
    }

    let refund = (booking.total_amount * fraction).round_dp(2);
    if refund.is_zero() {
        return Ok(Vec::new());
    }

    let owner_part = (refund * booking.owner_share() / booking.total_amount).round_dp(2);
    let platform_part = refund - owner_part;

    let mut entries = Vec::with_capacity(3);
    entries.push(LedgerEntry::new(
        booking.renter_id,
        EntrySide::Credit,
        EntryKind::Refund,
        Some(booking.id),
        refund,
        booking.currency,
        format!("Refund for cancelled booking {}", booking.id),
        now,
    ));
    if owner_part > Decimal::ZERO {
        entries.push(LedgerEntry::new(
            owner,
            EntrySide::Debit,
            EntryKind::Refund,
            Some(booking.id),
            owner_part,
            booking.currency,
            format!("Earnings reversal for cancelled booking {}", booking.id),
            now,
        ));
    }
    if platform_part > Decimal::ZERO {
        entries.push(LedgerEntry::new(
            PLATFORM_FEES,
            EntrySide::Debit,
            EntryKind::Refund,
            Some(booking.id),
            platform_part,
            booking.currency,
            format!("Platform fee reversal for cancelled booking {}", booking.id),
            now,
        ));
    }

    Ok(entries)
}

/// Builds the batch placing a security deposit into escrow.
#[must_use]
pub fn hold_batch(booking: &Booking, now: DateTime<Utc>) -> Vec<LedgerEntry> {
    vec![
        LedgerEntry::new(
            booking.renter_id,
            EntrySide::Debit,
            EntryKind::DepositHold,
            Some(booking.id),
            booking.deposit_amount,
            booking.currency,
            format!("Deposit hold for booking {}", booking.id),
            now,
        ),
        LedgerEntry::new(
            DEPOSIT_ESCROW,
            EntrySide::Credit,
            EntryKind::DepositHold,
            Some(booking.id),
            booking.deposit_amount,
            booking.currency,
            format!("Deposit escrow for booking {}", booking.id),
            now,
        ),
    ]
}

/// Builds the batch returning a held deposit to the renter in full.
#[must_use]
pub fn release_batch(
    hold: &DepositHold,
    renter: AccountId,
    now: DateTime<Utc>,
) -> Vec<LedgerEntry> {
    vec![
        LedgerEntry::new(
            DEPOSIT_ESCROW,
            EntrySide::Debit,
            EntryKind::DepositRelease,
            Some(hold.booking_id),
            hold.amount,
            hold.currency,
            format!("Deposit escrow release for booking {}", hold.booking_id),
            now,
        ),
        LedgerEntry::new(
            renter,
            EntrySide::Credit,
            EntryKind::DepositRelease,
            Some(hold.booking_id),
            hold.amount,
            hold.currency,
            format!("Deposit returned for booking {}", hold.booking_id),
            now,
        ),
    ]
}

/// Builds the batch capturing part (or all) of a held deposit against a
/// damage claim.
///
/// The escrow is debited for the full held amount; the owner is credited the
/// captured part and the renter is credited any un-captured remainder.
#[must_use]
pub fn capture_batch(
    hold: &DepositHold,
    renter: AccountId,
    owner: AccountId,
    captured: Decimal,
    now: DateTime<Utc>,
) -> Vec<LedgerEntry> {
    let remainder = hold.amount - captured;
    let mut entries = Vec::with_capacity(3);

    entries.push(LedgerEntry::new(
        DEPOSIT_ESCROW,
        EntrySide::Debit,
        EntryKind::DepositRelease,
        Some(hold.booking_id),
        hold.amount,
        hold.currency,
        format!("Deposit escrow settlement for booking {}", hold.booking_id),
        now,
    ));
    entries.push(LedgerEntry::new(
        owner,
        EntrySide::Credit,
        EntryKind::Earnings,
        Some(hold.booking_id),
        captured,
        hold.currency,
        format!("Damage claim captured for booking {}", hold.booking_id),
        now,
    ));
    if remainder > Decimal::ZERO {
        entries.push(LedgerEntry::new(
            renter,
            EntrySide::Credit,
            EntryKind::DepositRelease,
            Some(hold.booking_id),
            remainder,
            hold.currency,
            format!("Deposit remainder returned for booking {}", hold.booking_id),
            now,
        ));
    }

    entries
}

/// Builds the batch settling a paid-out amount against the owner's balance.
#[must_use]
pub fn payout_batch(payout: &Payout, now: DateTime<Utc>) -> Vec<LedgerEntry> {
    vec![
        LedgerEntry::new(
            payout.account_id,
            EntrySide::Debit,
            EntryKind::Payout,
            None,
            payout.amount,
            payout.currency,
            format!("Payout {}", payout.id),
            now,
        ),
        LedgerEntry::new(
            PAYOUT_CLEARING,
            EntrySide::Credit,
            EntryKind::Payout,
            None,
            payout.amount,
            payout.currency,
            format!("Payout clearing for {}", payout.id),
            now,
        ),
    ]
}
