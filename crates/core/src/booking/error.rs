//! Booking error types.
//!
//! The taxonomy follows three families: validation errors (rejected before
//! any write, safe to retry after correcting input), conflict errors (a
//! legitimate race or stale client view; refetch rather than retry), and
//! invariant errors (wrapped ledger defects, surfaced as internal errors).

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use rentora_shared::types::{AccountId, BookingId, ListingId};

use super::types::BookingStatus;
use crate::ledger::LedgerError;

/// The role a trigger requires of its actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    /// Only the listing owner may perform the trigger.
    Owner,
    /// Only the renter may perform the trigger.
    Renter,
    /// Either party may perform the trigger.
    RenterOrOwner,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "listing owner"),
            Self::Renter => write!(f, "renter"),
            Self::RenterOrOwner => write!(f, "renter or listing owner"),
        }
    }
}

/// Errors that can occur during booking operations.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Listing does not exist or is not active.
    #[error("Listing {0} is not available for booking")]
    InvalidListing(ListingId),

    /// Renter attempted to book their own listing.
    #[error("Owners cannot book their own listing")]
    SelfBooking,

    /// Start date is not strictly before end date.
    #[error("Invalid date range: start {start} must be before end {end}")]
    InvalidDateRange {
        /// Requested start date.
        start: chrono::NaiveDate,
        /// Requested end date.
        end: chrono::NaiveDate,
    },

    /// Guest count must be at least one.
    #[error("Guest count must be at least 1")]
    InvalidGuestCount,

    /// A monetary field is negative.
    #[error("Monetary field {field} must not be negative")]
    NegativeAmount {
        /// The offending field name.
        field: &'static str,
    },

    /// The listing already has an occupying booking for the date range.
    #[error("Listing {listing_id} is unavailable for the requested dates")]
    Unavailable {
        /// The contested listing.
        listing_id: ListingId,
    },

    /// The actor does not hold the role the trigger requires.
    #[error("Actor {actor} may not {trigger} this booking: requires {required}")]
    ForbiddenTransition {
        /// The attempted trigger.
        trigger: &'static str,
        /// The acting account.
        actor: AccountId,
        /// The role the trigger requires.
        required: ActorRole,
    },

    /// The trigger is not defined for the booking's current status.
    #[error("Cannot {trigger} a booking in status {status}")]
    InvalidState {
        /// The attempted trigger.
        trigger: &'static str,
        /// The booking's current status.
        status: BookingStatus,
    },

    /// Re-entrant trigger: the booking is already in the target state.
    /// Surfaces client-side races instead of silently succeeding.
    #[error("Booking is already in status {status}")]
    AlreadyInState {
        /// The booking's (and target's) status.
        status: BookingStatus,
    },

    /// Payment-processor callback amount does not match the booking total.
    #[error("Payment amount {actual} does not match booking total {expected}")]
    PaymentAmountMismatch {
        /// The booking's frozen total.
        expected: Decimal,
        /// The amount reported by the payment processor.
        actual: Decimal,
    },

    /// Booking does not exist.
    #[error("Booking {0} not found")]
    NotFound(BookingId),

    /// Ledger invariant violation while building a financial side effect.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl BookingError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidListing(_)
            | Self::SelfBooking
            | Self::InvalidDateRange { .. }
            | Self::InvalidGuestCount
            | Self::NegativeAmount { .. }
            | Self::InvalidState { .. }
            | Self::PaymentAmountMismatch { .. } => 400,

            Self::ForbiddenTransition { .. } => 403,

            Self::NotFound(_) => 404,

            Self::Unavailable { .. } | Self::AlreadyInState { .. } => 409,

            Self::Ledger(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidListing(_) => "INVALID_LISTING",
            Self::SelfBooking => "SELF_BOOKING",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::InvalidGuestCount => "INVALID_GUEST_COUNT",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::Unavailable { .. } => "UNAVAILABLE",
            Self::ForbiddenTransition { .. } => "FORBIDDEN_TRANSITION",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::AlreadyInState { .. } => "ALREADY_IN_STATE",
            Self::PaymentAmountMismatch { .. } => "PAYMENT_AMOUNT_MISMATCH",
            Self::NotFound(_) => "BOOKING_NOT_FOUND",
            Self::Ledger(_) => "LEDGER_ERROR",
        }
    }
}
