//! Booking lifecycle state machine and availability checking.
//!
//! This module owns the `Booking` entity:
//! - Status state machine with per-transition guards
//! - Typed transition actions carrying the financial side effects
//! - Date-range overlap checking that protects against double-booking
//! - Error types for booking operations

pub mod availability;
pub mod error;
pub mod machine;
pub mod types;

#[cfg(test)]
mod availability_props;
#[cfg(test)]
mod machine_props;

pub use availability::{is_available, ranges_overlap};
pub use error::{ActorRole, BookingError};
pub use machine::{BookingStateMachine, BookingTrigger, DepositDirective, TransitionAction};
pub use types::{Booking, BookingStatus, CreateBookingInput, ListingInfo};
