//! Security deposit holds.
//!
//! A deposit is held in escrow when a rental starts and settled exactly once
//! when the return is approved: released in full, or captured (in part or in
//! whole) against a damage claim.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::DepositError;
pub use service::{DepositManager, HoldAction};
pub use types::{DepositHold, HoldStatus};
