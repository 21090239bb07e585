//! Date-range availability checking.
//!
//! A booking occupies a listing's calendar while its status is one of
//! `PendingPayment`, `Confirmed`, `InProgress`, `PendingReturnInspection`.
//! Ranges are half-open: a checkout on day N and a check-in on day N do not
//! conflict.
//!
//! These are pure functions; the store runs them inside the same lock scope
//! as the booking insert. Checking and then inserting as two separate steps
//! is the classic race that causes double-booking.

use chrono::NaiveDate;

use rentora_shared::types::{BookingId, ListingId};

use super::types::Booking;

/// Returns true if two half-open date ranges overlap.
#[must_use]
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Returns true if the listing has no occupying booking overlapping the
/// requested range.
///
/// `excluding` lets an update-in-place re-check availability without
/// colliding with itself.
#[must_use]
pub fn is_available(
    listing_id: ListingId,
    start_date: NaiveDate,
    end_date: NaiveDate,
    excluding: Option<BookingId>,
    bookings: &[Booking],
) -> bool {
    !bookings.iter().any(|b| {
        b.listing_id == listing_id
            && Some(b.id) != excluding
            && b.status.blocks_calendar()
            && ranges_overlap(b.start_date, b.end_date, start_date, end_date)
    })
}
