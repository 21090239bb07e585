//! Payout aggregation and lifecycle.
//!
//! Earnings credits accrue in the ledger; the aggregator sweeps the ones old
//! enough for the dispute window to have closed, not frozen, and not yet
//! covered by a live payout, and turns them into a `Payout` request. The
//! payment processor's confirmation finalizes the request: `Paid` posts the
//! settlement batch, `Failed` simply frees the entries for the next sweep.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use rentora_shared::config::PayoutConfig;
use rentora_shared::types::{AccountId, Currency, LedgerEntryId, PayoutId};

use super::error::PayoutError;
use super::types::{EligibleCredits, Payout, PayoutStatus};
use crate::ledger::{EntryKind, EntrySide, LedgerEntry};

/// Eligibility policy for payout aggregation.
#[derive(Debug, Clone, Copy)]
pub struct PayoutPolicy {
    /// Minimum age of a credit before it becomes eligible.
    pub settlement_delay: Duration,
    /// Smallest amount worth paying out.
    pub minimum_amount: Decimal,
}

impl From<&PayoutConfig> for PayoutPolicy {
    fn from(cfg: &PayoutConfig) -> Self {
        Self {
            settlement_delay: Duration::days(cfg.settlement_delay_days),
            minimum_amount: cfg.minimum_amount,
        }
    }
}

/// Stateless payout aggregator.
pub struct PayoutAggregator;

impl PayoutAggregator {
    /// Sums the account's payout-eligible credits.
    ///
    /// An entry is eligible when it is a CREDIT of kind `Earnings` for the
    /// account in the requested currency, at least `settlement_delay` old,
    /// not frozen by the dispute collaborator, and not covered by a
    /// non-failed payout.
    pub fn compute_eligible<F>(
        account: AccountId,
        currency: Currency,
        entries: &[LedgerEntry],
        covered: &HashSet<LedgerEntryId>,
        frozen: F,
        now: DateTime<Utc>,
        policy: &PayoutPolicy,
    ) -> EligibleCredits
    where
        F: Fn(&LedgerEntry) -> bool,
    {
        let cutoff = now - policy.settlement_delay;
        let mut eligible = EligibleCredits::empty();

        for entry in entries {
            if entry.account_id == account
                && entry.currency == currency
                && entry.side == EntrySide::Credit
                && entry.kind == EntryKind::Earnings
                && entry.created_at <= cutoff
                && !covered.contains(&entry.id)
                && !frozen(entry)
            {
                eligible.amount += entry.amount;
                eligible.entry_ids.push(entry.id);
            }
        }

        eligible
    }

    /// Creates a payout request covering the account's eligible credits.
    ///
    /// # Errors
    ///
    /// Returns `NothingToPay` when the eligible sum is zero or under the
    /// policy minimum.
    pub fn request_payout<F>(
        account: AccountId,
        currency: Currency,
        entries: &[LedgerEntry],
        covered: &HashSet<LedgerEntryId>,
        frozen: F,
        now: DateTime<Utc>,
        policy: &PayoutPolicy,
    ) -> Result<Payout, PayoutError>
    where
        F: Fn(&LedgerEntry) -> bool,
    {
        let eligible =
            Self::compute_eligible(account, currency, entries, covered, frozen, now, policy);

        if eligible.amount.is_zero() || eligible.amount < policy.minimum_amount {
            return Err(PayoutError::NothingToPay {
                available: eligible.amount,
                minimum: policy.minimum_amount,
            });
        }

        Ok(Payout {
            id: PayoutId::new(),
            account_id: account,
            amount: eligible.amount,
            currency,
            status: PayoutStatus::Requested,
            covered_entry_ids: eligible.entry_ids,
            created_at: now,
            finalized_at: None,
        })
    }

    /// Marks a requested payout as confirmed by the processor.
    ///
    /// The caller posts the settlement batch alongside this update.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyFinalized` if the payout has already settled.
    pub fn mark_paid(payout: &Payout, now: DateTime<Utc>) -> Result<Payout, PayoutError> {
        Self::finalize(payout, PayoutStatus::Paid, now)
    }

    /// Marks a requested payout as rejected by the processor.
    ///
    /// The covered entries become eligible again; no ledger entry is ever
    /// removed or amended.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyFinalized` if the payout has already settled.
    pub fn mark_failed(payout: &Payout, now: DateTime<Utc>) -> Result<Payout, PayoutError> {
        Self::finalize(payout, PayoutStatus::Failed, now)
    }

    fn finalize(
        payout: &Payout,
        status: PayoutStatus,
        now: DateTime<Utc>,
    ) -> Result<Payout, PayoutError> {
        if payout.status.is_final() {
            return Err(PayoutError::AlreadyFinalized {
                id: payout.id,
                status: payout.status,
            });
        }
        let mut updated = payout.clone();
        updated.status = status;
        updated.finalized_at = Some(now);
        Ok(updated)
    }
}
