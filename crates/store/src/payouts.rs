//! In-memory payout store with a covered-entry index.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;

use rentora_core::payout::{Payout, PayoutError, PayoutStatus};
use rentora_shared::types::{AccountId, LedgerEntryId, PayoutId};

/// Store of payouts plus the index of entries covered by live payouts.
///
/// The index guarantees no ledger entry is referenced by two non-failed
/// payouts: insertion claims every covered entry under one lock, and a
/// payout moving to `Failed` returns its entries to the pool. The account
/// lock table serializes compute-and-claim for one account, so a concurrent
/// request finds nothing eligible instead of colliding on the index.
#[derive(Debug, Default)]
pub struct PayoutStore {
    payouts: DashMap<PayoutId, Payout>,
    covered: Mutex<HashSet<LedgerEntryId>>,
    account_locks: DashMap<AccountId, Arc<Mutex<()>>>,
}

impl PayoutStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock serializing payout requests for an account.
    #[must_use]
    pub fn account_lock(&self, account: AccountId) -> Arc<Mutex<()>> {
        self.account_locks
            .entry(account)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Inserts a freshly requested payout, claiming its covered entries.
    ///
    /// # Errors
    ///
    /// Returns `EntryAlreadyCovered` when any covered entry is already
    /// claimed by a non-failed payout; nothing is claimed in that case.
    pub fn insert(&self, payout: Payout) -> Result<(), PayoutError> {
        let mut covered = self.lock_covered();
        if let Some(taken) = payout.covered_entry_ids.iter().find(|id| covered.contains(id)) {
            return Err(PayoutError::EntryAlreadyCovered(*taken));
        }
        covered.extend(payout.covered_entry_ids.iter().copied());
        self.payouts.insert(payout.id, payout);
        Ok(())
    }

    /// Fetches a payout by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no payout exists with the id.
    pub fn get(&self, id: PayoutId) -> Result<Payout, PayoutError> {
        self.payouts
            .get(&id)
            .map(|p| p.clone())
            .ok_or(PayoutError::NotFound(id))
    }

    /// Replaces a payout after finalization.
    ///
    /// A payout moving to `Failed` releases its covered entries so they
    /// become eligible for the next request.
    pub fn update(&self, payout: Payout) {
        if payout.status == PayoutStatus::Failed {
            let mut covered = self.lock_covered();
            for id in &payout.covered_entry_ids {
                covered.remove(id);
            }
        }
        self.payouts.insert(payout.id, payout);
    }

    /// Returns the entries currently covered by non-failed payouts.
    #[must_use]
    pub fn covered_ids(&self) -> HashSet<LedgerEntryId> {
        self.lock_covered().clone()
    }

    fn lock_covered(&self) -> MutexGuard<'_, HashSet<LedgerEntryId>> {
        self.covered.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
