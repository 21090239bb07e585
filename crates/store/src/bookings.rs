//! In-memory booking store with per-listing and per-booking locks.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use rentora_core::booking::{Booking, BookingError};
use rentora_shared::types::{BookingId, ListingId};

/// Store of bookings keyed by id.
///
/// The lock tables give callers the mutual exclusion the domain requires:
/// the listing lock is held across the availability check and the insert so
/// two concurrent overlapping requests cannot both succeed, and the booking
/// lock serializes transitions against one booking.
#[derive(Debug, Default)]
pub struct BookingStore {
    bookings: DashMap<BookingId, Booking>,
    listing_locks: DashMap<ListingId, Arc<Mutex<()>>>,
    booking_locks: DashMap<BookingId, Arc<Mutex<()>>>,
}

impl BookingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock guarding creates for a listing.
    #[must_use]
    pub fn listing_lock(&self, listing: ListingId) -> Arc<Mutex<()>> {
        self.listing_locks
            .entry(listing)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Returns the lock serializing transitions for a booking.
    #[must_use]
    pub fn booking_lock(&self, booking: BookingId) -> Arc<Mutex<()>> {
        self.booking_locks
            .entry(booking)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Inserts a newly created booking.
    ///
    /// The caller must hold the listing lock and have run the availability
    /// check first.
    pub fn insert(&self, booking: Booking) {
        self.bookings.insert(booking.id, booking);
    }

    /// Fetches a booking by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no booking exists with the id.
    pub fn get(&self, id: BookingId) -> Result<Booking, BookingError> {
        self.bookings
            .get(&id)
            .map(|b| b.clone())
            .ok_or(BookingError::NotFound(id))
    }

    /// Replaces a booking after a transition.
    pub fn update(&self, booking: Booking) {
        self.bookings.insert(booking.id, booking);
    }

    /// Returns all bookings for a listing.
    #[must_use]
    pub fn for_listing(&self, listing: ListingId) -> Vec<Booking> {
        self.bookings
            .iter()
            .filter(|b| b.listing_id == listing)
            .map(|b| b.clone())
            .collect()
    }
}
