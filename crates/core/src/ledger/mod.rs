//! Append-only double-entry ledger.
//!
//! This module implements the financial backbone of the marketplace:
//! - Ledger entries (debits and credits against accounts)
//! - Balanced-batch validation (the atomicity unit for financial effects)
//! - Batch builders for every booking transition with a monetary consequence
//! - Well-known platform accounts

pub mod accounts;
pub mod batch;
pub mod entry;
pub mod error;

#[cfg(test)]
mod batch_props;

pub use batch::{
    capture_batch, hold_batch, payment_batch, payout_batch, refund_batch, release_batch,
    validate_batch,
};
pub use entry::{EntryKind, EntrySide, LedgerEntry, balance_of};
pub use error::LedgerError;
