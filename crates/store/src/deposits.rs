//! In-memory deposit hold store with version-checked updates.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use rentora_core::deposit::{DepositError, DepositHold};
use rentora_shared::types::BookingId;

/// Store of deposit holds, keyed by booking (one hold per booking).
///
/// Updates are optimistic: the incoming hold must carry a version exactly
/// one above the stored one, which rejects both the double-hold race and
/// concurrent settlement attempts.
#[derive(Debug, Default)]
pub struct DepositStore {
    holds: DashMap<BookingId, DepositHold>,
}

impl DepositStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new hold for a booking.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateHold` if the booking already has one.
    pub fn insert(&self, hold: DepositHold) -> Result<(), DepositError> {
        match self.holds.entry(hold.booking_id) {
            Entry::Occupied(_) => Err(DepositError::DuplicateHold(hold.booking_id)),
            Entry::Vacant(slot) => {
                slot.insert(hold);
                Ok(())
            }
        }
    }

    /// Fetches the hold for a booking.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the booking has no hold.
    pub fn get(&self, booking: BookingId) -> Result<DepositHold, DepositError> {
        self.holds
            .get(&booking)
            .map(|h| h.clone())
            .ok_or(DepositError::NotFound(booking))
    }

    /// Replaces a hold after a settlement transition.
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` when another settlement got there first,
    /// `NotFound` if the hold does not exist.
    pub fn update(&self, hold: DepositHold) -> Result<(), DepositError> {
        match self.holds.entry(hold.booking_id) {
            Entry::Vacant(_) => Err(DepositError::NotFound(hold.booking_id)),
            Entry::Occupied(mut slot) => {
                let stored = slot.get();
                if stored.version + 1 != hold.version {
                    return Err(DepositError::VersionConflict {
                        expected: hold.version.saturating_sub(1),
                        found: stored.version,
                    });
                }
                slot.insert(hold);
                Ok(())
            }
        }
    }
}
