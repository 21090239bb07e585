//! In-memory append-only ledger store.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use tracing::debug;

use rentora_core::ledger::{LedgerEntry, LedgerError, balance_of, validate_batch};
use rentora_shared::types::{AccountId, BookingId, Currency};

/// Append-only store of ledger entries.
///
/// Batches are validated before anything is written, so a rejected batch
/// leaves the ledger exactly as it was. Entries are never mutated or removed
/// after a successful append.
#[derive(Debug, Default)]
pub struct LedgerStore {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl LedgerStore {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a balanced batch atomically.
    ///
    /// # Errors
    ///
    /// Returns a `LedgerError` when the batch violates a validation rule;
    /// nothing is written in that case.
    pub fn append(&self, batch: Vec<LedgerEntry>) -> Result<(), LedgerError> {
        validate_batch(&batch)?;

        let mut entries = self.write();
        debug!(
            batch_len = batch.len(),
            total = entries.len() + batch.len(),
            "ledger batch appended"
        );
        entries.extend(batch);
        Ok(())
    }

    /// Returns the account's balance (credits minus debits) in a currency.
    #[must_use]
    pub fn balance_of(&self, account: AccountId, currency: Currency) -> Decimal {
        balance_of(&self.read(), account, currency)
    }

    /// Returns the entries tied to a booking, in append order.
    #[must_use]
    pub fn entries_for(&self, booking: BookingId) -> Vec<LedgerEntry> {
        self.read()
            .iter()
            .filter(|e| e.booking_id == Some(booking))
            .cloned()
            .collect()
    }

    /// Returns a snapshot of all entries, in append order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LedgerEntry> {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<LedgerEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<LedgerEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
