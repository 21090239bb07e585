//! Booking state machine.
//!
//! Stateless transition logic: every trigger validates the booking's current
//! status and the actor's role, then returns a typed `TransitionAction`
//! carrying the new status and the financial side effect to execute. The
//! store applies the status change, ledger batch, and deposit update as one
//! atomic unit, so a transition either fully happens or not at all.
//!
//! Guard failures are reported per the error taxonomy: `AlreadyInState` for
//! re-entrant triggers (the booking is already in the trigger's target
//! state), `InvalidState` when the trigger is not defined for the current
//! status, and `ForbiddenTransition` for actor-role mismatches.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use rentora_shared::types::AccountId;

use super::error::{ActorRole, BookingError};
use super::types::{Booking, BookingStatus, CreateBookingInput, ListingInfo};
use crate::ledger::{LedgerEntry, payment_batch, refund_batch};

/// A caller-requested trigger against a booking.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingTrigger {
    /// Owner approves the request.
    Approve,
    /// Owner rejects the request.
    Reject,
    /// Renter or owner cancels before the rental starts.
    Cancel,
    /// Owner hands the item over and starts the rental.
    Start,
    /// Renter requests the return inspection.
    RequestReturn,
    /// Owner approves the return, optionally capturing the deposit.
    ApproveReturn {
        /// Damage claim against the security deposit, if any.
        damage_claim: Option<Decimal>,
    },
}

impl BookingTrigger {
    /// Returns the trigger's name for error reporting and logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
            Self::Start => "start",
            Self::RequestReturn => "request return",
            Self::ApproveReturn { .. } => "approve return",
        }
    }
}

/// What should happen to the deposit hold when a return is approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositDirective {
    /// Booking carried no deposit.
    None,
    /// Release the hold back to the renter in full.
    Release,
    /// Capture the claimed amount; the remainder is implicitly released.
    Capture {
        /// The amount claimed against the deposit.
        amount: Decimal,
    },
}

/// A validated transition with its financial side effect.
///
/// Each variant captures the resulting status plus the descriptor the store
/// executes atomically with the status change.
#[derive(Debug, Clone)]
pub enum TransitionAction {
    /// Owner approved the request; awaiting payment.
    Approve {
        /// The new status (`PendingPayment`).
        new_status: BookingStatus,
    },
    /// Owner rejected the request.
    Reject {
        /// The new status (`Rejected`).
        new_status: BookingStatus,
    },
    /// Payment succeeded; booking confirmed and payment posted.
    ConfirmPayment {
        /// The new status (`Confirmed`).
        new_status: BookingStatus,
        /// Balanced payment batch to append.
        batch: Vec<LedgerEntry>,
    },
    /// Booking cancelled, reversing the payment if one was posted.
    Cancel {
        /// The new status (`Cancelled`).
        new_status: BookingStatus,
        /// Refund batch; empty when nothing was paid or policy refunds zero.
        refund: Vec<LedgerEntry>,
    },
    /// Rental physically started.
    Start {
        /// The new status (`InProgress`).
        new_status: BookingStatus,
        /// Timestamp recorded as the actual start.
        actual_start_date: DateTime<Utc>,
        /// Deposit to place on hold, when the booking carries one.
        hold_amount: Option<Decimal>,
    },
    /// Renter asked for the return inspection.
    RequestReturn {
        /// The new status (`PendingReturnInspection`).
        new_status: BookingStatus,
    },
    /// Owner approved the return; booking completed.
    CompleteReturn {
        /// The new status (`Completed`).
        new_status: BookingStatus,
        /// Timestamp recorded as the actual end.
        actual_end_date: DateTime<Utc>,
        /// How to resolve the deposit hold.
        deposit: DepositDirective,
    },
}

impl TransitionAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> BookingStatus {
        match self {
            Self::Approve { new_status }
            | Self::Reject { new_status }
            | Self::ConfirmPayment { new_status, .. }
            | Self::Cancel { new_status, .. }
            | Self::Start { new_status, .. }
            | Self::RequestReturn { new_status }
            | Self::CompleteReturn { new_status, .. } => *new_status,
        }
    }
}

/// Stateless service validating and describing booking transitions.
pub struct BookingStateMachine;

impl BookingStateMachine {
    /// Creates a new booking in its initial pending state.
    ///
    /// Validates the listing, actor, dates, and monetary fields; the
    /// availability check runs separately, inside the store's per-listing
    /// lock, together with the insert.
    ///
    /// # Errors
    ///
    /// Returns a validation `BookingError` before anything is written.
    pub fn create(
        input: &CreateBookingInput,
        listing: &ListingInfo,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        if !listing.is_active {
            return Err(BookingError::InvalidListing(listing.id));
        }
        if input.renter_id == listing.owner_id {
            return Err(BookingError::SelfBooking);
        }
        if input.start_date >= input.end_date {
            return Err(BookingError::InvalidDateRange {
                start: input.start_date,
                end: input.end_date,
            });
        }
        if input.guest_count == 0 {
            return Err(BookingError::InvalidGuestCount);
        }
        for (field, amount) in [
            ("base_price", input.base_price),
            ("platform_fee", input.platform_fee),
            ("service_fee", input.service_fee),
            ("deposit_amount", input.deposit_amount),
        ] {
            if amount < Decimal::ZERO {
                return Err(BookingError::NegativeAmount { field });
            }
        }

        let status = if listing.instant_book {
            BookingStatus::PendingPayment
        } else {
            BookingStatus::PendingOwnerApproval
        };

        Ok(Booking {
            id: rentora_shared::types::BookingId::new(),
            listing_id: input.listing_id,
            renter_id: input.renter_id,
            start_date: input.start_date,
            end_date: input.end_date,
            actual_start_date: None,
            actual_end_date: None,
            base_price: input.base_price,
            platform_fee: input.platform_fee,
            service_fee: input.service_fee,
            deposit_amount: input.deposit_amount,
            total_amount: input.base_price + input.platform_fee + input.service_fee,
            currency: input.currency,
            guest_count: input.guest_count,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    /// Owner approves a pending request.
    ///
    /// # Errors
    ///
    /// `AlreadyInState` if already awaiting payment, `InvalidState` for any
    /// other status, `ForbiddenTransition` if the actor is not the owner.
    pub fn approve(
        booking: &Booking,
        listing: &ListingInfo,
        actor: AccountId,
    ) -> Result<TransitionAction, BookingError> {
        match booking.status {
            BookingStatus::PendingPayment => Err(BookingError::AlreadyInState {
                status: booking.status,
            }),
            BookingStatus::PendingOwnerApproval => {
                Self::require_owner(actor, listing, "approve")?;
                Ok(TransitionAction::Approve {
                    new_status: BookingStatus::PendingPayment,
                })
            }
            _ => Err(BookingError::InvalidState {
                trigger: "approve",
                status: booking.status,
            }),
        }
    }

    /// Owner rejects a pending request.
    ///
    /// # Errors
    ///
    /// Same guard taxonomy as [`Self::approve`].
    pub fn reject(
        booking: &Booking,
        listing: &ListingInfo,
        actor: AccountId,
    ) -> Result<TransitionAction, BookingError> {
        match booking.status {
            BookingStatus::Rejected => Err(BookingError::AlreadyInState {
                status: booking.status,
            }),
            BookingStatus::PendingOwnerApproval => {
                Self::require_owner(actor, listing, "reject")?;
                Ok(TransitionAction::Reject {
                    new_status: BookingStatus::Rejected,
                })
            }
            _ => Err(BookingError::InvalidState {
                trigger: "reject",
                status: booking.status,
            }),
        }
    }

    /// Payment-processor callback reporting a successful payment.
    ///
    /// Produces the payment batch: DEBIT renter for the total, CREDIT owner
    /// for total minus platform fee, CREDIT platform for the fee.
    ///
    /// # Errors
    ///
    /// `AlreadyInState` if already confirmed, `InvalidState` otherwise,
    /// `PaymentAmountMismatch` if the processor amount differs from the
    /// booking's frozen total.
    pub fn payment_succeeded(
        booking: &Booking,
        listing: &ListingInfo,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<TransitionAction, BookingError> {
        match booking.status {
            BookingStatus::Confirmed => Err(BookingError::AlreadyInState {
                status: booking.status,
            }),
            BookingStatus::PendingPayment => {
                if amount != booking.total_amount {
                    return Err(BookingError::PaymentAmountMismatch {
                        expected: booking.total_amount,
                        actual: amount,
                    });
                }
                Ok(TransitionAction::ConfirmPayment {
                    new_status: BookingStatus::Confirmed,
                    batch: payment_batch(booking, listing.owner_id, now),
                })
            }
            _ => Err(BookingError::InvalidState {
                trigger: "confirm payment",
                status: booking.status,
            }),
        }
    }

    /// Renter or owner cancels before the rental starts.
    ///
    /// When the booking was already paid (`Confirmed`), the refund batch
    /// reverses the payment according to the policy-supplied fraction.
    ///
    /// # Errors
    ///
    /// `AlreadyInState` if already cancelled, `InvalidState` once the rental
    /// has started or the booking is terminal, `ForbiddenTransition` for a
    /// third party.
    pub fn cancel(
        booking: &Booking,
        listing: &ListingInfo,
        actor: AccountId,
        refund_fraction: Decimal,
        now: DateTime<Utc>,
    ) -> Result<TransitionAction, BookingError> {
        match booking.status {
            BookingStatus::Cancelled => Err(BookingError::AlreadyInState {
                status: booking.status,
            }),
            BookingStatus::PendingPayment | BookingStatus::Confirmed => {
                if actor != booking.renter_id && actor != listing.owner_id {
                    return Err(BookingError::ForbiddenTransition {
                        trigger: "cancel",
                        actor,
                        required: ActorRole::RenterOrOwner,
                    });
                }
                let refund = if booking.status == BookingStatus::Confirmed {
                    refund_batch(booking, listing.owner_id, refund_fraction, now)?
                } else {
                    Vec::new()
                };
                Ok(TransitionAction::Cancel {
                    new_status: BookingStatus::Cancelled,
                    refund,
                })
            }
            _ => Err(BookingError::InvalidState {
                trigger: "cancel",
                status: booking.status,
            }),
        }
    }

    /// Owner hands over the item and starts the rental.
    ///
    /// Early start is allowed: `now >= start_date` is deliberately not
    /// required. When the booking carries a deposit, the action instructs
    /// the deposit manager to place a hold.
    ///
    /// # Errors
    ///
    /// `AlreadyInState` if already in progress, `InvalidState` otherwise,
    /// `ForbiddenTransition` if the actor is not the owner.
    pub fn start(
        booking: &Booking,
        listing: &ListingInfo,
        actor: AccountId,
        now: DateTime<Utc>,
    ) -> Result<TransitionAction, BookingError> {
        match booking.status {
            BookingStatus::InProgress => Err(BookingError::AlreadyInState {
                status: booking.status,
            }),
            BookingStatus::Confirmed => {
                Self::require_owner(actor, listing, "start")?;
                let hold_amount =
                    (booking.deposit_amount > Decimal::ZERO).then_some(booking.deposit_amount);
                Ok(TransitionAction::Start {
                    new_status: BookingStatus::InProgress,
                    actual_start_date: now,
                    hold_amount,
                })
            }
            _ => Err(BookingError::InvalidState {
                trigger: "start",
                status: booking.status,
            }),
        }
    }

    /// Renter requests the return inspection.
    ///
    /// # Errors
    ///
    /// `AlreadyInState` if already awaiting inspection, `InvalidState`
    /// otherwise, `ForbiddenTransition` if the actor is not the renter.
    pub fn request_return(
        booking: &Booking,
        actor: AccountId,
    ) -> Result<TransitionAction, BookingError> {
        match booking.status {
            BookingStatus::PendingReturnInspection => Err(BookingError::AlreadyInState {
                status: booking.status,
            }),
            BookingStatus::InProgress => {
                if actor != booking.renter_id {
                    return Err(BookingError::ForbiddenTransition {
                        trigger: "request return",
                        actor,
                        required: ActorRole::Renter,
                    });
                }
                Ok(TransitionAction::RequestReturn {
                    new_status: BookingStatus::PendingReturnInspection,
                })
            }
            _ => Err(BookingError::InvalidState {
                trigger: "request return",
                status: booking.status,
            }),
        }
    }

    /// Owner approves the return and completes the booking.
    ///
    /// Without a damage claim the deposit hold is released; with a positive
    /// one, the claimed amount is captured and the remainder implicitly
    /// released. A zero claim is a clean return and releases the hold.
    ///
    /// # Errors
    ///
    /// `AlreadyInState` if already completed, `InvalidState` otherwise,
    /// `ForbiddenTransition` if the actor is not the owner, `NegativeAmount`
    /// for a negative claim.
    pub fn approve_return(
        booking: &Booking,
        listing: &ListingInfo,
        actor: AccountId,
        damage_claim: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> Result<TransitionAction, BookingError> {
        match booking.status {
            BookingStatus::Completed => Err(BookingError::AlreadyInState {
                status: booking.status,
            }),
            BookingStatus::PendingReturnInspection => {
                Self::require_owner(actor, listing, "approve return")?;
                if damage_claim.is_some_and(|amount| amount < Decimal::ZERO) {
                    return Err(BookingError::NegativeAmount {
                        field: "damage_claim",
                    });
                }
                let deposit = if booking.deposit_amount.is_zero() {
                    DepositDirective::None
                } else {
                    match damage_claim {
                        Some(amount) if amount > Decimal::ZERO => {
                            DepositDirective::Capture { amount }
                        }
                        _ => DepositDirective::Release,
                    }
                };
                Ok(TransitionAction::CompleteReturn {
                    new_status: BookingStatus::Completed,
                    actual_end_date: now,
                    deposit,
                })
            }
            _ => Err(BookingError::InvalidState {
                trigger: "approve return",
                status: booking.status,
            }),
        }
    }

    /// Applies a validated action to a booking, producing the updated copy.
    ///
    /// Monetary fields are untouched: after leaving a pending state they are
    /// frozen, and no transition amends them.
    #[must_use]
    pub fn apply(booking: &Booking, action: &TransitionAction, now: DateTime<Utc>) -> Booking {
        let mut updated = booking.clone();
        updated.status = action.new_status();
        updated.updated_at = now;
        match action {
            TransitionAction::Start {
                actual_start_date, ..
            } => updated.actual_start_date = Some(*actual_start_date),
            TransitionAction::CompleteReturn {
                actual_end_date, ..
            } => updated.actual_end_date = Some(*actual_end_date),
            _ => {}
        }
        updated
    }

    fn require_owner(
        actor: AccountId,
        listing: &ListingInfo,
        trigger: &'static str,
    ) -> Result<(), BookingError> {
        if actor != listing.owner_id {
            return Err(BookingError::ForbiddenTransition {
                trigger,
                actor,
                required: ActorRole::Owner,
            });
        }
        Ok(())
    }
}
