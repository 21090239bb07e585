//! Property-based tests for deposit hold monotonicity.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use rentora_shared::types::{BookingId, Currency};

use super::service::{DepositManager, HoldAction};
use super::types::{DepositHold, HoldStatus};

/// Strategy for a positive held amount in cents.
fn held_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// A settlement attempt against a hold.
#[derive(Debug, Clone)]
enum Attempt {
    Release,
    Capture(Decimal),
}

fn attempt() -> impl Strategy<Value = Attempt> {
    prop_oneof![
        Just(Attempt::Release),
        (1i64..10_000_000i64).prop_map(|cents| Attempt::Capture(Decimal::new(cents, 2))),
    ]
}

fn apply(hold: &DepositHold, attempt: &Attempt) -> Option<DepositHold> {
    let now = Utc::now();
    let action = match attempt {
        Attempt::Release => DepositManager::release(hold, false, now),
        Attempt::Capture(amount) => DepositManager::capture(hold, *amount, false, now),
    };
    match action {
        Ok(HoldAction::Release { hold } | HoldAction::Capture { hold, .. }) => Some(hold),
        Ok(HoldAction::AlreadyReleased) | Err(_) => None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A hold's status never reverses: once settled, no sequence of further
    /// release/capture attempts changes it, and at most one settlement
    /// succeeds.
    #[test]
    fn prop_hold_status_is_monotonic(
        amount in held_amount(),
        attempts in proptest::collection::vec(attempt(), 1..8),
    ) {
        let mut hold = DepositHold::new(BookingId::new(), amount, Currency::Usd, Utc::now());
        let mut settlements = 0usize;

        for a in &attempts {
            let before = hold.status;
            if let Some(updated) = apply(&hold, a) {
                prop_assert_eq!(before, HoldStatus::Held);
                prop_assert!(updated.status.is_settled());
                prop_assert_eq!(updated.version, hold.version + 1);
                settlements += 1;
                hold = updated;
            } else {
                // Rejected or no-op attempts leave the hold untouched.
                prop_assert_eq!(hold.status, before);
            }
        }

        prop_assert!(settlements <= 1);
    }

    /// Capture succeeds exactly when the claim is positive and within the
    /// held amount, and the split always covers the full deposit.
    #[test]
    fn prop_capture_bounds(
        amount in held_amount(),
        claim_cents in 1i64..20_000_000i64,
    ) {
        let hold = DepositHold::new(BookingId::new(), amount, Currency::Usd, Utc::now());
        let claim = Decimal::new(claim_cents, 2);

        match DepositManager::capture(&hold, claim, false, Utc::now()) {
            Ok(HoldAction::Capture { captured, remainder, .. }) => {
                prop_assert!(claim <= amount);
                prop_assert_eq!(captured, claim);
                prop_assert_eq!(captured + remainder, amount);
            }
            Ok(_) => prop_assert!(false, "capture of a held deposit must settle or fail"),
            Err(_) => prop_assert!(claim > amount),
        }
    }
}
