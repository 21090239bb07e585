//! Error types for ledger operations.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur when validating or building ledger batches.
///
/// These are invariant errors: they indicate a programming defect in a
/// caller, abort the entire operation, and are never silently corrected.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Batch contains no entries.
    #[error("Ledger batch must contain at least one entry")]
    EmptyBatch,

    /// An entry amount is zero or negative.
    #[error("Entry amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Batch mixes currencies.
    #[error("All entries in a batch must share one currency")]
    MixedCurrencies,

    /// Batch has only debits or only credits.
    #[error("Batch must have both debit and credit entries")]
    SingleSided,

    /// Batch debits and credits do not balance.
    #[error("Unbalanced batch: debits ({debits}) != credits ({credits})")]
    UnbalancedBatch {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Refund fraction outside (0, 1].
    #[error("Refund fraction must be within (0, 1], got {0}")]
    InvalidRefundFraction(Decimal),
}

impl LedgerError {
    /// Returns the HTTP status code for this error.
    ///
    /// All ledger errors are invariant violations and surface as internal
    /// errors.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        500
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::MixedCurrencies => "MIXED_CURRENCIES",
            Self::SingleSided => "SINGLE_SIDED_BATCH",
            Self::UnbalancedBatch { .. } => "UNBALANCED_BATCH",
            Self::InvalidRefundFraction(_) => "INVALID_REFUND_FRACTION",
        }
    }
}
