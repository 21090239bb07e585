//! Payout aggregation for owner earnings.

pub mod error;
pub mod service;
pub mod types;

pub use error::PayoutError;
pub use service::{PayoutAggregator, PayoutPolicy};
pub use types::{EligibleCredits, Payout, PayoutStatus};
