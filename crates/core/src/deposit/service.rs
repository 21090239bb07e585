//! Deposit hold state transitions.
//!
//! The manager is stateless, like the booking state machine: each operation
//! validates the hold's current status and returns the updated hold plus a
//! `HoldAction` describing the escrow movement to post. Hold statuses are
//! strictly monotonic, so a settled hold is never reopened.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::DepositError;
use super::types::{DepositHold, HoldStatus};
use crate::booking::types::Booking;

/// The escrow movement resulting from a hold settlement.
#[derive(Debug, Clone)]
pub enum HoldAction {
    /// Release of an already-released hold: an idempotent no-op, nothing to
    /// post.
    AlreadyReleased,
    /// Return the full deposit to the renter.
    Release {
        /// The hold in its `Released` state.
        hold: DepositHold,
    },
    /// Capture a damage claim; the remainder goes back to the renter.
    Capture {
        /// The hold in its `Captured` state.
        hold: DepositHold,
        /// The amount captured for the owner.
        captured: Decimal,
        /// The un-captured amount returned to the renter.
        remainder: Decimal,
    },
}

/// Stateless manager for deposit hold transitions.
pub struct DepositManager;

impl DepositManager {
    /// Places a hold for the booking's deposit.
    ///
    /// Duplicate detection (one hold per booking) happens in the store,
    /// inside the same lock scope as the insert.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if the booking carries no positive deposit.
    pub fn place_hold(booking: &Booking, now: DateTime<Utc>) -> Result<DepositHold, DepositError> {
        if booking.deposit_amount <= Decimal::ZERO {
            return Err(DepositError::InvalidAmount(booking.deposit_amount));
        }
        Ok(DepositHold::new(
            booking.id,
            booking.deposit_amount,
            booking.currency,
            now,
        ))
    }

    /// Releases a held deposit back to the renter in full.
    ///
    /// Releasing an already-released hold is an idempotent no-op, so a
    /// retried release never double-pays.
    ///
    /// # Errors
    ///
    /// `FrozenByDispute` while a dispute is open, `AlreadyCaptured` if a
    /// claim was captured first.
    pub fn release(
        hold: &DepositHold,
        frozen: bool,
        now: DateTime<Utc>,
    ) -> Result<HoldAction, DepositError> {
        match hold.status {
            HoldStatus::Released => Ok(HoldAction::AlreadyReleased),
            HoldStatus::Captured => Err(DepositError::AlreadyCaptured(hold.booking_id)),
            HoldStatus::Held => {
                if frozen {
                    return Err(DepositError::FrozenByDispute(hold.booking_id));
                }
                let mut updated = hold.clone();
                updated.status = HoldStatus::Released;
                updated.released_at = Some(now);
                updated.version += 1;
                Ok(HoldAction::Release { hold: updated })
            }
        }
    }

    /// Captures part (or all) of a held deposit against a damage claim.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for a non-positive claim, `CaptureExceedsHold` when
    /// the claim is larger than the escrowed amount, `HoldNotActive` or
    /// `AlreadyCaptured` once the hold has settled, `FrozenByDispute` while
    /// a dispute is open.
    pub fn capture(
        hold: &DepositHold,
        amount: Decimal,
        frozen: bool,
        now: DateTime<Utc>,
    ) -> Result<HoldAction, DepositError> {
        match hold.status {
            HoldStatus::Captured => Err(DepositError::AlreadyCaptured(hold.booking_id)),
            HoldStatus::Released => Err(DepositError::HoldNotActive(hold.booking_id)),
            HoldStatus::Held => {
                if frozen {
                    return Err(DepositError::FrozenByDispute(hold.booking_id));
                }
                if amount <= Decimal::ZERO {
                    return Err(DepositError::InvalidAmount(amount));
                }
                if amount > hold.amount {
                    return Err(DepositError::CaptureExceedsHold {
                        requested: amount,
                        held: hold.amount,
                    });
                }
                let mut updated = hold.clone();
                updated.status = HoldStatus::Captured;
                updated.captured_at = Some(now);
                updated.version += 1;
                Ok(HoldAction::Capture {
                    hold: updated,
                    captured: amount,
                    remainder: hold.amount - amount,
                })
            }
        }
    }
}
