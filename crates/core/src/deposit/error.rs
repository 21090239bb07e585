//! Deposit hold error types.

use rust_decimal::Decimal;
use thiserror::Error;

use rentora_shared::types::BookingId;

/// Errors that can occur during deposit hold operations.
#[derive(Debug, Error)]
pub enum DepositError {
    /// Hold amount must be strictly positive.
    #[error("Deposit amount {0} must be positive")]
    InvalidAmount(Decimal),

    /// The booking already has a hold; holds are one per booking.
    #[error("Booking {0} already has a deposit hold")]
    DuplicateHold(BookingId),

    /// The hold was already captured and cannot change.
    #[error("Deposit hold for booking {0} was already captured")]
    AlreadyCaptured(BookingId),

    /// The hold is not in the `Held` state.
    #[error("Deposit hold for booking {0} is not active")]
    HoldNotActive(BookingId),

    /// Capture amount exceeds what is held in escrow.
    #[error("Capture amount {requested} exceeds held deposit {held}")]
    CaptureExceedsHold {
        /// The requested capture amount.
        requested: Decimal,
        /// The amount actually held.
        held: Decimal,
    },

    /// An open dispute freezes the hold until the dispute resolves.
    #[error("Deposit hold for booking {0} is frozen by an open dispute")]
    FrozenByDispute(BookingId),

    /// No hold exists for the booking.
    #[error("No deposit hold found for booking {0}")]
    NotFound(BookingId),

    /// Another settlement won the race; refetch and retry if still needed.
    #[error("Deposit hold version conflict: expected {expected}, found {found}")]
    VersionConflict {
        /// The version the caller based its update on.
        expected: u64,
        /// The version in the store.
        found: u64,
    },
}

impl DepositError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount(_) | Self::CaptureExceedsHold { .. } => 400,
            Self::NotFound(_) => 404,
            Self::DuplicateHold(_)
            | Self::AlreadyCaptured(_)
            | Self::HoldNotActive(_)
            | Self::FrozenByDispute(_)
            | Self::VersionConflict { .. } => 409,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_DEPOSIT_AMOUNT",
            Self::DuplicateHold(_) => "DUPLICATE_HOLD",
            Self::AlreadyCaptured(_) => "ALREADY_CAPTURED",
            Self::HoldNotActive(_) => "HOLD_NOT_ACTIVE",
            Self::CaptureExceedsHold { .. } => "CAPTURE_EXCEEDS_HOLD",
            Self::FrozenByDispute(_) => "FROZEN_BY_DISPUTE",
            Self::NotFound(_) => "HOLD_NOT_FOUND",
            Self::VersionConflict { .. } => "HOLD_VERSION_CONFLICT",
        }
    }
}
