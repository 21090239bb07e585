//! Payout error types.

use rust_decimal::Decimal;
use thiserror::Error;

use rentora_shared::types::{LedgerEntryId, PayoutId};

use super::types::PayoutStatus;

/// Errors that can occur during payout operations.
#[derive(Debug, Error)]
pub enum PayoutError {
    /// No eligible credits, or the sum is under the configured minimum.
    #[error("Nothing to pay out: available {available} is below minimum {minimum}")]
    NothingToPay {
        /// Sum of currently eligible credits.
        available: Decimal,
        /// The configured minimum payout amount.
        minimum: Decimal,
    },

    /// The payout was already confirmed or rejected.
    #[error("Payout {id} is already {status}")]
    AlreadyFinalized {
        /// The payout in question.
        id: PayoutId,
        /// Its final status.
        status: PayoutStatus,
    },

    /// A non-failed payout already covers this entry.
    #[error("Ledger entry {0} is already covered by another payout")]
    EntryAlreadyCovered(LedgerEntryId),

    /// Payout does not exist.
    #[error("Payout {0} not found")]
    NotFound(PayoutId),
}

impl PayoutError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NothingToPay { .. } => 400,
            Self::NotFound(_) => 404,
            Self::AlreadyFinalized { .. } | Self::EntryAlreadyCovered(_) => 409,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NothingToPay { .. } => "NOTHING_TO_PAY",
            Self::AlreadyFinalized { .. } => "PAYOUT_ALREADY_FINALIZED",
            Self::EntryAlreadyCovered(_) => "ENTRY_ALREADY_COVERED",
            Self::NotFound(_) => "PAYOUT_NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_nothing_to_pay_is_validation() {
        let err = PayoutError::NothingToPay {
            available: dec!(10),
            minimum: dec!(25),
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "NOTHING_TO_PAY");
        assert!(err.to_string().contains("below minimum"));
    }

    #[test]
    fn test_double_finalization_is_conflict() {
        let err = PayoutError::AlreadyFinalized {
            id: PayoutId::new(),
            status: PayoutStatus::Paid,
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "PAYOUT_ALREADY_FINALIZED");
    }
}
