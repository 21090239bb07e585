//! Shared types, errors, and configuration for Rentora.
//!
//! This crate provides common types used across all other crates:
//! - Currency codes paired with decimal amounts
//! - Typed IDs for type-safe entity references
//! - An injectable clock for deterministic time handling
//! - Application-wide error types
//! - Configuration management

pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
