//! Property-based tests for date-range overlap checking.

use chrono::NaiveDate;
use proptest::prelude::*;

use super::availability::ranges_overlap;

/// Strategy for an arbitrary date within a few years of the epoch base.
fn any_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..2000i64).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .checked_add_days(chrono::Days::new(offset.unsigned_abs()))
            .unwrap()
    })
}

/// Strategy for a valid half-open range (start strictly before end).
fn date_range() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (any_date(), 1u64..365u64).prop_map(|(start, len)| {
        (start, start.checked_add_days(chrono::Days::new(len)).unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Overlap is symmetric.
    #[test]
    fn prop_overlap_is_symmetric(a in date_range(), b in date_range()) {
        prop_assert_eq!(
            ranges_overlap(a.0, a.1, b.0, b.1),
            ranges_overlap(b.0, b.1, a.0, a.1)
        );
    }

    /// A valid range always overlaps itself.
    #[test]
    fn prop_range_overlaps_itself(a in date_range()) {
        prop_assert!(ranges_overlap(a.0, a.1, a.0, a.1));
    }

    /// Back-to-back ranges never overlap: checkout day equals check-in day.
    #[test]
    fn prop_adjacent_ranges_never_overlap(a in date_range(), len in 1u64..365u64) {
        let b_start = a.1;
        let b_end = b_start.checked_add_days(chrono::Days::new(len)).unwrap();
        prop_assert!(!ranges_overlap(a.0, a.1, b_start, b_end));
    }

    /// Two ranges overlap exactly when some day is occupied by both: the
    /// half-open formula agrees with a day-by-day scan.
    #[test]
    fn prop_overlap_matches_day_scan(a in date_range(), b in date_range()) {
        let mut shared_day = false;
        let mut day = a.0;
        while day < a.1 {
            if day >= b.0 && day < b.1 {
                shared_day = true;
                break;
            }
            day = day.succ_opt().unwrap();
        }
        prop_assert_eq!(ranges_overlap(a.0, a.1, b.0, b.1), shared_day);
    }

    /// A range containing another always overlaps it.
    #[test]
    fn prop_containment_implies_overlap(inner in date_range(), pad in 0u64..30u64) {
        let outer_start = inner.0.checked_sub_days(chrono::Days::new(pad)).unwrap();
        let outer_end = inner.1.checked_add_days(chrono::Days::new(pad)).unwrap();
        prop_assert!(ranges_overlap(outer_start, outer_end, inner.0, inner.1));
    }
}
