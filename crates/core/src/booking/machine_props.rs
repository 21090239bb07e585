//! Property-based tests for the booking state machine.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use rentora_shared::types::{AccountId, Currency, ListingId};

use super::error::BookingError;
use super::machine::{BookingStateMachine, TransitionAction};
use super::types::{Booking, BookingStatus, CreateBookingInput, ListingInfo};

static ALL_STATUSES: [BookingStatus; 8] = [
    BookingStatus::PendingOwnerApproval,
    BookingStatus::PendingPayment,
    BookingStatus::Confirmed,
    BookingStatus::InProgress,
    BookingStatus::PendingReturnInspection,
    BookingStatus::Completed,
    BookingStatus::Rejected,
    BookingStatus::Cancelled,
];

fn any_status() -> impl Strategy<Value = BookingStatus> {
    proptest::sample::select(ALL_STATUSES.as_slice())
}

/// Strategy for a positive money amount in cents.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn fee_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn make_listing() -> ListingInfo {
    ListingInfo {
        id: ListingId::new(),
        owner_id: AccountId::new(),
        is_active: true,
        instant_book: false,
    }
}

fn make_booking(listing: &ListingInfo, status: BookingStatus) -> Booking {
    let input = CreateBookingInput {
        listing_id: listing.id,
        renter_id: AccountId::new(),
        start_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        guest_count: 1,
        base_price: Decimal::new(30_000, 2),
        platform_fee: Decimal::new(2_000, 2),
        service_fee: Decimal::new(1_000, 2),
        deposit_amount: Decimal::new(5_000, 2),
        currency: Currency::Usd,
    };
    let mut booking = BookingStateMachine::create(&input, listing, Utc::now()).unwrap();
    booking.status = status;
    booking
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The frozen total is always the sum of its parts.
    #[test]
    fn prop_created_total_is_sum_of_parts(
        base in positive_amount(),
        fee in fee_amount(),
        service in fee_amount(),
    ) {
        let listing = make_listing();
        let input = CreateBookingInput {
            listing_id: listing.id,
            renter_id: AccountId::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            guest_count: 1,
            base_price: base,
            platform_fee: fee,
            service_fee: service,
            deposit_amount: Decimal::ZERO,
            currency: Currency::Usd,
        };
        let booking = BookingStateMachine::create(&input, &listing, Utc::now()).unwrap();
        prop_assert_eq!(booking.total_amount, base + fee + service);
    }

    /// Approve succeeds only from `PendingOwnerApproval`.
    #[test]
    fn prop_approve_defined_on_exactly_one_status(status in any_status()) {
        let listing = make_listing();
        let booking = make_booking(&listing, status);
        let result = BookingStateMachine::approve(&booking, &listing, listing.owner_id);

        match status {
            BookingStatus::PendingOwnerApproval => prop_assert!(result.is_ok()),
            BookingStatus::PendingPayment => {
                prop_assert!(
                    matches!(result, Err(BookingError::AlreadyInState { .. })),
                    "expected AlreadyInState, got {result:?}"
                );
            }
            _ => prop_assert!(
                matches!(result, Err(BookingError::InvalidState { .. })),
                "expected InvalidState, got {result:?}"
            ),
        }
    }

    /// Start succeeds only from `Confirmed`.
    #[test]
    fn prop_start_defined_on_exactly_one_status(status in any_status()) {
        let listing = make_listing();
        let booking = make_booking(&listing, status);
        let result = BookingStateMachine::start(&booking, &listing, listing.owner_id, Utc::now());

        match status {
            BookingStatus::Confirmed => prop_assert!(result.is_ok()),
            BookingStatus::InProgress => {
                prop_assert!(
                    matches!(result, Err(BookingError::AlreadyInState { .. })),
                    "expected AlreadyInState, got {result:?}"
                );
            }
            _ => prop_assert!(
                matches!(result, Err(BookingError::InvalidState { .. })),
                "expected InvalidState, got {result:?}"
            ),
        }
    }

    /// Cancel succeeds only before the rental starts.
    #[test]
    fn prop_cancel_defined_only_before_start(status in any_status()) {
        let listing = make_listing();
        let booking = make_booking(&listing, status);
        let result = BookingStateMachine::cancel(
            &booking,
            &listing,
            booking.renter_id,
            Decimal::ONE,
            Utc::now(),
        );

        match status {
            BookingStatus::PendingPayment | BookingStatus::Confirmed => {
                prop_assert!(result.is_ok());
            }
            BookingStatus::Cancelled => {
                prop_assert!(
                    matches!(result, Err(BookingError::AlreadyInState { .. })),
                    "expected AlreadyInState, got {result:?}"
                );
            }
            _ => prop_assert!(
                matches!(result, Err(BookingError::InvalidState { .. })),
                "expected InvalidState, got {result:?}"
            ),
        }
    }

    /// No trigger is defined on a terminal status other than the re-entrant
    /// `AlreadyInState` report.
    #[test]
    fn prop_terminal_statuses_admit_no_transition(
        status in proptest::sample::select(&[
            BookingStatus::Completed,
            BookingStatus::Rejected,
            BookingStatus::Cancelled,
        ]),
    ) {
        let listing = make_listing();
        let booking = make_booking(&listing, status);
        let owner = listing.owner_id;
        let renter = booking.renter_id;
        let now = Utc::now();

        prop_assert!(BookingStateMachine::approve(&booking, &listing, owner).is_err());
        prop_assert!(BookingStateMachine::reject(&booking, &listing, owner).is_err());
        prop_assert!(
            BookingStateMachine::payment_succeeded(&booking, &listing, booking.total_amount, now)
                .is_err()
        );
        prop_assert!(
            BookingStateMachine::cancel(&booking, &listing, renter, Decimal::ONE, now).is_err()
        );
        prop_assert!(BookingStateMachine::start(&booking, &listing, owner, now).is_err());
        prop_assert!(BookingStateMachine::request_return(&booking, renter).is_err());
        prop_assert!(
            BookingStateMachine::approve_return(&booking, &listing, owner, None, now).is_err()
        );
    }

    /// A third-party actor never gets past an owner- or renter-guarded
    /// trigger on its defined source status.
    #[test]
    fn prop_third_party_always_forbidden(_seed in any::<u64>()) {
        let listing = make_listing();
        let stranger = AccountId::new();
        let now = Utc::now();

        let pending = make_booking(&listing, BookingStatus::PendingOwnerApproval);
        let approve = BookingStateMachine::approve(&pending, &listing, stranger);
        prop_assert!(
            matches!(approve, Err(BookingError::ForbiddenTransition { .. })),
            "expected ForbiddenTransition, got {approve:?}"
        );

        let confirmed = make_booking(&listing, BookingStatus::Confirmed);
        let cancel = BookingStateMachine::cancel(&confirmed, &listing, stranger, Decimal::ONE, now);
        prop_assert!(
            matches!(cancel, Err(BookingError::ForbiddenTransition { .. })),
            "expected ForbiddenTransition, got {cancel:?}"
        );
        let start = BookingStateMachine::start(&confirmed, &listing, stranger, now);
        prop_assert!(
            matches!(start, Err(BookingError::ForbiddenTransition { .. })),
            "expected ForbiddenTransition, got {start:?}"
        );

        let in_progress = make_booking(&listing, BookingStatus::InProgress);
        let request = BookingStateMachine::request_return(&in_progress, stranger);
        prop_assert!(
            matches!(request, Err(BookingError::ForbiddenTransition { .. })),
            "expected ForbiddenTransition, got {request:?}"
        );
    }

    /// Applying any successful transition never changes the monetary fields.
    #[test]
    fn prop_apply_preserves_monetary_fields(status in any_status()) {
        let listing = make_listing();
        let booking = make_booking(&listing, status);
        let now = Utc::now();

        let actions: Vec<TransitionAction> = [
            BookingStateMachine::approve(&booking, &listing, listing.owner_id),
            BookingStateMachine::reject(&booking, &listing, listing.owner_id),
            BookingStateMachine::payment_succeeded(&booking, &listing, booking.total_amount, now),
            BookingStateMachine::cancel(&booking, &listing, booking.renter_id, Decimal::ONE, now),
            BookingStateMachine::start(&booking, &listing, listing.owner_id, now),
            BookingStateMachine::request_return(&booking, booking.renter_id),
            BookingStateMachine::approve_return(&booking, &listing, listing.owner_id, None, now),
        ]
        .into_iter()
        .flatten()
        .collect();

        for action in actions {
            let updated = BookingStateMachine::apply(&booking, &action, now);
            prop_assert_eq!(updated.base_price, booking.base_price);
            prop_assert_eq!(updated.platform_fee, booking.platform_fee);
            prop_assert_eq!(updated.service_fee, booking.service_fee);
            prop_assert_eq!(updated.deposit_amount, booking.deposit_amount);
            prop_assert_eq!(updated.total_amount, booking.total_amount);
            prop_assert_eq!(updated.status, action.new_status());
        }
    }
}
