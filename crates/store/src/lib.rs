//! In-memory stores and the marketplace service facade for Rentora.
//!
//! The stores implement the concurrency contract the domain requires:
//! create-and-check under a per-listing lock, atomic balanced-batch ledger
//! appends, version-checked deposit updates, and a covered-entry index for
//! payouts. `MarketplaceService` wires them to the pure core logic. The
//! storage backend is pluggable; this crate is the reference implementation
//! of the contract.

pub mod bookings;
pub mod deposits;
pub mod ledger;
pub mod payouts;
pub mod service;


pub use bookings::BookingStore;
pub use deposits::DepositStore;
pub use ledger::LedgerStore;
pub use payouts::PayoutStore;
pub use service::{
    CancellationPolicy, DisputeRegistry, FlatRefundPolicy, ListingDirectory, MarketplaceError,
    MarketplaceService, NoDisputes, StaticListings,
};
