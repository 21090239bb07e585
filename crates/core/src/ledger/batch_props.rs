//! Property-based tests for batch builders and balanced-batch validation.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use rentora_shared::types::{AccountId, BookingId, Currency, DepositHoldId, ListingId};

use super::batch::{
    capture_batch, hold_batch, payment_batch, refund_batch, release_batch, validate_batch,
};
use super::entry::EntrySide;
use crate::booking::types::{Booking, BookingStatus};
use crate::deposit::types::{DepositHold, HoldStatus};

/// Strategy for a positive money amount, in cents, up to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a non-negative money amount (fees may be zero).
fn fee_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a refund fraction in `[0, 1]` with four decimal places.
fn fraction() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|n| Decimal::new(n, 4))
}

fn make_booking(base_price: Decimal, platform_fee: Decimal, service_fee: Decimal) -> Booking {
    let now = Utc::now();
    Booking {
        id: BookingId::new(),
        listing_id: ListingId::new(),
        renter_id: AccountId::new(),
        start_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        actual_start_date: None,
        actual_end_date: None,
        base_price,
        platform_fee,
        service_fee,
        deposit_amount: Decimal::ZERO,
        total_amount: base_price + platform_fee + service_fee,
        currency: Currency::Usd,
        guest_count: 1,
        status: BookingStatus::Confirmed,
        created_at: now,
        updated_at: now,
    }
}

fn make_hold(amount: Decimal) -> DepositHold {
    DepositHold {
        id: DepositHoldId::new(),
        booking_id: BookingId::new(),
        amount,
        currency: Currency::Usd,
        status: HoldStatus::Held,
        held_at: Utc::now(),
        released_at: None,
        captured_at: None,
        version: 1,
    }
}

fn side_sum(entries: &[super::entry::LedgerEntry], side: EntrySide) -> Decimal {
    entries
        .iter()
        .filter(|e| e.side == side)
        .map(|e| e.amount)
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every payment batch passes validation, whatever the amounts.
    #[test]
    fn prop_payment_batch_is_balanced(
        base in positive_amount(),
        fee in fee_amount(),
        service in fee_amount(),
    ) {
        let booking = make_booking(base, fee, service);
        let batch = payment_batch(&booking, AccountId::new(), Utc::now());

        prop_assert!(validate_batch(&batch).is_ok());
        prop_assert_eq!(side_sum(&batch, EntrySide::Debit), booking.total_amount);
        prop_assert_eq!(side_sum(&batch, EntrySide::Credit), booking.total_amount);
    }

    /// Refund batches balance for every fraction in [0, 1], and the refunded
    /// amount never exceeds what was paid.
    #[test]
    fn prop_refund_batch_balances_and_never_exceeds_payment(
        base in positive_amount(),
        fee in fee_amount(),
        service in fee_amount(),
        f in fraction(),
    ) {
        let booking = make_booking(base, fee, service);
        let batch = refund_batch(&booking, AccountId::new(), f, Utc::now()).unwrap();

        if batch.is_empty() {
            // Zero-refund policy or a fraction that rounds to zero.
            prop_assert!((booking.total_amount * f).round_dp(2).is_zero());
        } else {
            prop_assert!(validate_batch(&batch).is_ok());
            let refunded = side_sum(&batch, EntrySide::Credit);
            prop_assert!(refunded <= booking.total_amount);
            prop_assert_eq!(refunded, (booking.total_amount * f).round_dp(2));
        }
    }

    /// A full refund reverses the payment exactly, leg for leg.
    #[test]
    fn prop_full_refund_reverses_payment_totals(
        base in positive_amount(),
        fee in fee_amount(),
        service in fee_amount(),
    ) {
        let booking = make_booking(base, fee, service);
        let owner = AccountId::new();
        let payment = payment_batch(&booking, owner, Utc::now());
        let refund = refund_batch(&booking, owner, Decimal::ONE, Utc::now()).unwrap();

        prop_assert_eq!(
            side_sum(&payment, EntrySide::Debit),
            side_sum(&refund, EntrySide::Credit)
        );
        prop_assert_eq!(
            side_sum(&payment, EntrySide::Credit),
            side_sum(&refund, EntrySide::Debit)
        );
    }

    /// Out-of-range fractions are always rejected.
    #[test]
    fn prop_out_of_range_fraction_rejected(excess in 1i64..10_000i64) {
        let booking = make_booking(Decimal::new(10_000, 2), Decimal::ZERO, Decimal::ZERO);
        let above = Decimal::ONE + Decimal::new(excess, 4);
        let below = -Decimal::new(excess, 4);

        prop_assert!(refund_batch(&booking, AccountId::new(), above, Utc::now()).is_err());
        prop_assert!(refund_batch(&booking, AccountId::new(), below, Utc::now()).is_err());
    }

    /// Hold and release batches always balance on the hold amount.
    #[test]
    fn prop_hold_and_release_batches_balance(amount in positive_amount()) {
        let mut booking = make_booking(Decimal::new(10_000, 2), Decimal::ZERO, Decimal::ZERO);
        booking.deposit_amount = amount;

        let hold = hold_batch(&booking, Utc::now());
        prop_assert!(validate_batch(&hold).is_ok());
        prop_assert_eq!(side_sum(&hold, EntrySide::Debit), amount);

        let release = release_batch(&make_hold(amount), booking.renter_id, Utc::now());
        prop_assert!(validate_batch(&release).is_ok());
        prop_assert_eq!(side_sum(&release, EntrySide::Credit), amount);
    }

    /// Capture batches balance for every captured amount up to the hold, and
    /// the owner and renter legs always sum to the held amount.
    #[test]
    fn prop_capture_batch_splits_exactly(
        held_cents in 2i64..10_000_000i64,
        captured_permille in 1i64..=1000i64,
    ) {
        let held = Decimal::new(held_cents, 2);
        let captured = (held * Decimal::new(captured_permille, 3)).round_dp(2);
        prop_assume!(captured > Decimal::ZERO && captured <= held);

        let hold = make_hold(held);
        let renter = AccountId::new();
        let owner = AccountId::new();
        let batch = capture_batch(&hold, renter, owner, captured, Utc::now());

        prop_assert!(validate_batch(&batch).is_ok());
        prop_assert_eq!(side_sum(&batch, EntrySide::Debit), held);

        let to_owner: Decimal = batch
            .iter()
            .filter(|e| e.account_id == owner)
            .map(|e| e.amount)
            .sum();
        let to_renter: Decimal = batch
            .iter()
            .filter(|e| e.account_id == renter)
            .map(|e| e.amount)
            .sum();
        prop_assert_eq!(to_owner, captured);
        prop_assert_eq!(to_owner + to_renter, held);
    }
}
