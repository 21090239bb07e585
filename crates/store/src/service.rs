//! Marketplace service facade.
//!
//! Ties the stores and the pure core logic together behind the operations an
//! enclosing HTTP/controller layer calls. Collaborators the subsystem does
//! not own (listings, cancellation policy, disputes, the clock) are injected
//! as trait objects. Each transition executes its status change, ledger
//! batch, and deposit update as one unit under the booking's lock; events
//! for downstream notifiers are `tracing` events emitted after the unit
//! commits.

use std::sync::{Arc, PoisonError};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use rentora_core::booking::{
    Booking, BookingError, BookingStateMachine, BookingStatus, BookingTrigger, CreateBookingInput,
    DepositDirective, ListingInfo, TransitionAction, is_available,
};
use rentora_core::deposit::{DepositError, DepositManager, HoldAction};
use rentora_core::ledger::{
    LedgerEntry, LedgerError, capture_batch, hold_batch, payout_batch, release_batch,
};
use rentora_core::payout::{Payout, PayoutAggregator, PayoutError, PayoutPolicy};
use rentora_shared::Clock;
use rentora_shared::config::PayoutConfig;
use rentora_shared::error::AppError;
use rentora_shared::types::{AccountId, BookingId, Currency, ListingId, PayoutId};

use crate::bookings::BookingStore;
use crate::deposits::DepositStore;
use crate::ledger::LedgerStore;
use crate::payouts::PayoutStore;

/// Supplies listing status and ownership.
pub trait ListingDirectory: Send + Sync {
    /// Looks up a listing; `None` when it does not exist.
    fn get(&self, id: ListingId) -> Option<ListingInfo>;
}

/// Supplies the refund fraction for a cancellation.
pub trait CancellationPolicy: Send + Sync {
    /// Returns the refund fraction in `[0, 1]` for cancelling the booking at
    /// the given instant.
    fn refund_fraction(&self, booking: &Booking, at: DateTime<Utc>) -> Decimal;
}

/// Marks ledger entries and deposit holds frozen by open disputes.
pub trait DisputeRegistry: Send + Sync {
    /// Returns true when the entry is excluded from payout eligibility.
    fn is_entry_frozen(&self, entry: &LedgerEntry) -> bool;

    /// Returns true when the booking's deposit hold may not settle.
    fn is_hold_frozen(&self, booking: BookingId) -> bool;
}

/// Any error the facade can return, with the domain error preserved.
#[derive(Debug, Error)]
pub enum MarketplaceError {
    /// Booking lifecycle error.
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// Deposit hold error.
    #[error(transparent)]
    Deposit(#[from] DepositError),

    /// Payout error.
    #[error(transparent)]
    Payout(#[from] PayoutError),

    /// Ledger invariant violation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl MarketplaceError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Booking(e) => e.status_code(),
            Self::Deposit(e) => e.status_code(),
            Self::Payout(e) => e.status_code(),
            Self::Ledger(e) => e.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Booking(e) => e.error_code(),
            Self::Deposit(e) => e.error_code(),
            Self::Payout(e) => e.error_code(),
            Self::Ledger(e) => e.error_code(),
        }
    }
}

impl From<MarketplaceError> for AppError {
    fn from(err: MarketplaceError) -> Self {
        let message = err.to_string();
        match err.status_code() {
            400 => Self::Validation(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Internal(message),
        }
    }
}

/// The booking marketplace: state machine, ledger, deposits, and payouts
/// behind one facade.
pub struct MarketplaceService {
    bookings: BookingStore,
    ledger: LedgerStore,
    deposits: DepositStore,
    payouts: PayoutStore,
    listings: Arc<dyn ListingDirectory>,
    cancellation: Arc<dyn CancellationPolicy>,
    disputes: Arc<dyn DisputeRegistry>,
    clock: Arc<dyn Clock>,
    payout_policy: PayoutPolicy,
}

impl MarketplaceService {
    /// Creates a service with empty stores.
    #[must_use]
    pub fn new(
        listings: Arc<dyn ListingDirectory>,
        cancellation: Arc<dyn CancellationPolicy>,
        disputes: Arc<dyn DisputeRegistry>,
        clock: Arc<dyn Clock>,
        payout_config: &PayoutConfig,
    ) -> Self {
        Self {
            bookings: BookingStore::new(),
            ledger: LedgerStore::new(),
            deposits: DepositStore::new(),
            payouts: PayoutStore::new(),
            listings,
            cancellation,
            disputes,
            clock,
            payout_policy: PayoutPolicy::from(payout_config),
        }
    }

    /// Creates a booking, holding the listing lock across the availability
    /// check and the insert.
    ///
    /// # Errors
    ///
    /// Validation errors from the state machine, or `Unavailable` when the
    /// dates are taken by an occupying booking.
    pub fn create_booking(&self, input: &CreateBookingInput) -> Result<Booking, MarketplaceError> {
        let listing = self.listing(input.listing_id)?;
        let now = self.clock.now();
        let booking = BookingStateMachine::create(input, &listing, now)?;

        let lock = self.bookings.listing_lock(listing.id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let existing = self.bookings.for_listing(listing.id);
        if !is_available(listing.id, input.start_date, input.end_date, None, &existing) {
            return Err(BookingError::Unavailable {
                listing_id: listing.id,
            }
            .into());
        }

        self.bookings.insert(booking.clone());
        info!(
            booking_id = %booking.id,
            listing_id = %booking.listing_id,
            status = %booking.status,
            "booking created"
        );
        Ok(booking)
    }

    /// Executes a lifecycle trigger against a booking.
    ///
    /// # Errors
    ///
    /// Guard errors from the state machine, deposit/ledger errors from the
    /// transition's side effects, or `Unavailable` when an approval finds
    /// the dates were claimed by another booking in the meantime.
    pub fn transition(
        &self,
        booking_id: BookingId,
        trigger: &BookingTrigger,
        actor: AccountId,
    ) -> Result<Booking, MarketplaceError> {
        let lock = self.bookings.booking_lock(booking_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let booking = self.bookings.get(booking_id)?;
        let listing = self.listing(booking.listing_id)?;
        let now = self.clock.now();

        let action = match trigger {
            BookingTrigger::Approve => BookingStateMachine::approve(&booking, &listing, actor)?,
            BookingTrigger::Reject => BookingStateMachine::reject(&booking, &listing, actor)?,
            BookingTrigger::Cancel => {
                let fraction = self.cancellation.refund_fraction(&booking, now);
                BookingStateMachine::cancel(&booking, &listing, actor, fraction, now)?
            }
            BookingTrigger::Start => BookingStateMachine::start(&booking, &listing, actor, now)?,
            BookingTrigger::RequestReturn => {
                BookingStateMachine::request_return(&booking, actor)?
            }
            BookingTrigger::ApproveReturn { damage_claim } => BookingStateMachine::approve_return(
                &booking,
                &listing,
                actor,
                *damage_claim,
                now,
            )?,
        };

        // Approval moves the booking into a calendar-blocking status, so the
        // dates are re-checked under the listing lock: overlapping requests
        // may coexist while pending, but only one of them can be sold.
        let updated = if matches!(action, TransitionAction::Approve { .. }) {
            let listing_lock = self.bookings.listing_lock(listing.id);
            let _listing_guard = listing_lock.lock().unwrap_or_else(PoisonError::into_inner);

            let existing = self.bookings.for_listing(listing.id);
            if !is_available(
                listing.id,
                booking.start_date,
                booking.end_date,
                Some(booking.id),
                &existing,
            ) {
                return Err(BookingError::Unavailable {
                    listing_id: listing.id,
                }
                .into());
            }
            self.execute(&booking, &listing, &action, now)?
        } else {
            self.execute(&booking, &listing, &action, now)?
        };
        info!(
            booking_id = %updated.id,
            trigger = trigger.name(),
            from = %booking.status,
            to = %updated.status,
            "booking transition"
        );
        Ok(updated)
    }

    /// Payment-processor callback: the renter's payment cleared.
    ///
    /// # Errors
    ///
    /// State-machine guard errors, or `PaymentAmountMismatch` when the
    /// processor amount differs from the booking total.
    pub fn payment_succeeded(
        &self,
        booking_id: BookingId,
        amount: Decimal,
    ) -> Result<Booking, MarketplaceError> {
        let lock = self.bookings.booking_lock(booking_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let booking = self.bookings.get(booking_id)?;
        let listing = self.listing(booking.listing_id)?;
        let now = self.clock.now();

        let action = BookingStateMachine::payment_succeeded(&booking, &listing, amount, now)?;
        let updated = self.execute(&booking, &listing, &action, now)?;
        info!(
            booking_id = %updated.id,
            amount = %amount,
            "payment confirmed"
        );
        Ok(updated)
    }

    /// Payment-processor callback: the renter's payment failed.
    ///
    /// This is a business outcome, not an error: the booking stays in
    /// `PendingPayment` and the renter may retry.
    ///
    /// # Errors
    ///
    /// `InvalidState` when the booking is not awaiting payment.
    pub fn payment_failed(
        &self,
        booking_id: BookingId,
        reason: &str,
    ) -> Result<Booking, MarketplaceError> {
        let booking = self.bookings.get(booking_id)?;
        if booking.status != BookingStatus::PendingPayment {
            return Err(BookingError::InvalidState {
                trigger: "record payment failure",
                status: booking.status,
            }
            .into());
        }
        warn!(
            booking_id = %booking.id,
            reason,
            "payment failed; booking stays payable"
        );
        Ok(booking)
    }

    /// Fetches a booking by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if no booking exists with the id.
    pub fn get_booking(&self, booking_id: BookingId) -> Result<Booking, MarketplaceError> {
        Ok(self.bookings.get(booking_id)?)
    }

    /// Returns the ledger entries tied to a booking, in append order.
    #[must_use]
    pub fn get_ledger(&self, booking_id: BookingId) -> Vec<LedgerEntry> {
        self.ledger.entries_for(booking_id)
    }

    /// Fetches the deposit hold for a booking.
    ///
    /// # Errors
    ///
    /// `NotFound` if the booking has no hold.
    pub fn get_deposit_hold(
        &self,
        booking_id: BookingId,
    ) -> Result<rentora_core::deposit::DepositHold, MarketplaceError> {
        Ok(self.deposits.get(booking_id)?)
    }

    /// Returns an account's balance (credits minus debits) in a currency.
    #[must_use]
    pub fn get_balance(&self, account: AccountId, currency: Currency) -> Decimal {
        self.ledger.balance_of(account, currency)
    }

    /// Aggregates the account's eligible credits into a payout request.
    ///
    /// Requests for one account are serialized: eligibility is computed and
    /// the covered entries claimed under the account's lock, so a concurrent
    /// request sees the winner's claim and finds nothing eligible.
    ///
    /// # Errors
    ///
    /// `NothingToPay` when nothing is eligible or the sum is under the
    /// configured minimum.
    pub fn request_payout(
        &self,
        account: AccountId,
        currency: Currency,
    ) -> Result<Payout, MarketplaceError> {
        let lock = self.payouts.account_lock(account);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let entries = self.ledger.snapshot();
        let covered = self.payouts.covered_ids();
        let now = self.clock.now();

        let payout = PayoutAggregator::request_payout(
            account,
            currency,
            &entries,
            &covered,
            |e| self.disputes.is_entry_frozen(e),
            now,
            &self.payout_policy,
        )?;
        self.payouts.insert(payout.clone())?;
        info!(
            payout_id = %payout.id,
            account_id = %account,
            amount = %payout.amount,
            entries = payout.covered_entry_ids.len(),
            "payout requested"
        );
        Ok(payout)
    }

    /// Payment-processor callback: the payout transfer cleared. Posts the
    /// settlement batch against the owner's balance.
    ///
    /// # Errors
    ///
    /// `AlreadyFinalized` when the payout has already settled.
    pub fn mark_payout_paid(&self, payout_id: PayoutId) -> Result<Payout, MarketplaceError> {
        let payout = self.payouts.get(payout_id)?;
        let now = self.clock.now();
        let paid = PayoutAggregator::mark_paid(&payout, now)?;

        self.ledger.append(payout_batch(&paid, now))?;
        self.payouts.update(paid.clone());
        info!(payout_id = %paid.id, amount = %paid.amount, "payout paid");
        Ok(paid)
    }

    /// Payment-processor callback: the payout transfer failed. The covered
    /// entries become eligible again; the ledger is untouched.
    ///
    /// # Errors
    ///
    /// `AlreadyFinalized` when the payout has already settled.
    pub fn mark_payout_failed(&self, payout_id: PayoutId) -> Result<Payout, MarketplaceError> {
        let payout = self.payouts.get(payout_id)?;
        let failed = PayoutAggregator::mark_failed(&payout, self.clock.now())?;

        self.payouts.update(failed.clone());
        warn!(payout_id = %failed.id, amount = %failed.amount, "payout failed");
        Ok(failed)
    }

    fn listing(&self, id: ListingId) -> Result<ListingInfo, MarketplaceError> {
        self.listings
            .get(id)
            .ok_or_else(|| BookingError::InvalidListing(id).into())
    }

    /// Executes a validated action: side effects first, then the booking
    /// update. Every side effect is validated (or, for the deposit insert,
    /// checked) before the status change lands.
    fn execute(
        &self,
        booking: &Booking,
        listing: &ListingInfo,
        action: &TransitionAction,
        now: DateTime<Utc>,
    ) -> Result<Booking, MarketplaceError> {
        match action {
            TransitionAction::Approve { .. }
            | TransitionAction::Reject { .. }
            | TransitionAction::RequestReturn { .. } => {}

            TransitionAction::ConfirmPayment { batch, .. } => {
                self.ledger.append(batch.clone())?;
            }

            TransitionAction::Cancel { refund, .. } => {
                if !refund.is_empty() {
                    self.ledger.append(refund.clone())?;
                }
            }

            TransitionAction::Start { hold_amount, .. } => {
                if hold_amount.is_some() {
                    let hold = DepositManager::place_hold(booking, now)?;
                    self.deposits.insert(hold)?;
                    self.ledger.append(hold_batch(booking, now))?;
                }
            }

            TransitionAction::CompleteReturn { deposit, .. } => {
                self.settle_deposit(booking, listing, *deposit, now)?;
            }
        }

        let updated = BookingStateMachine::apply(booking, action, now);
        self.bookings.update(updated.clone());
        Ok(updated)
    }

    fn settle_deposit(
        &self,
        booking: &Booking,
        listing: &ListingInfo,
        directive: DepositDirective,
        now: DateTime<Utc>,
    ) -> Result<(), MarketplaceError> {
        if directive == DepositDirective::None {
            return Ok(());
        }

        let hold = self.deposits.get(booking.id)?;
        let frozen = self.disputes.is_hold_frozen(booking.id);

        let action = match directive {
            DepositDirective::None => return Ok(()),
            DepositDirective::Release => DepositManager::release(&hold, frozen, now)?,
            DepositDirective::Capture { amount } => {
                DepositManager::capture(&hold, amount, frozen, now)?
            }
        };

        match action {
            HoldAction::AlreadyReleased => {}
            HoldAction::Release { hold: updated } => {
                self.ledger
                    .append(release_batch(&hold, booking.renter_id, now))?;
                self.deposits.update(updated)?;
            }
            HoldAction::Capture {
                hold: updated,
                captured,
                ..
            } => {
                self.ledger.append(capture_batch(
                    &hold,
                    booking.renter_id,
                    listing.owner_id,
                    captured,
                    now,
                ))?;
                self.deposits.update(updated)?;
            }
        }
        Ok(())
    }
}

/// Listing directory backed by a map; useful for tests and embedders that
/// manage listings elsewhere.
#[derive(Debug, Default)]
pub struct StaticListings {
    listings: dashmap::DashMap<ListingId, ListingInfo>,
}

impl StaticListings {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listing.
    pub fn add(&self, listing: ListingInfo) {
        self.listings.insert(listing.id, listing);
    }
}

impl ListingDirectory for StaticListings {
    fn get(&self, id: ListingId) -> Option<ListingInfo> {
        self.listings.get(&id).map(|l| *l)
    }
}

/// Cancellation policy returning the same fraction for every booking.
#[derive(Debug, Clone, Copy)]
pub struct FlatRefundPolicy(pub Decimal);

impl CancellationPolicy for FlatRefundPolicy {
    fn refund_fraction(&self, _booking: &Booking, _at: DateTime<Utc>) -> Decimal {
        self.0
    }
}

/// Dispute registry with no open disputes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisputes;

impl DisputeRegistry for NoDisputes {
    fn is_entry_frozen(&self, _entry: &LedgerEntry) -> bool {
        false
    }

    fn is_hold_frozen(&self, _booking: BookingId) -> bool {
        false
    }
}
