//! Core business logic for Rentora.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, transition rules, and financial calculations live here.
//!
//! # Modules
//!
//! - `booking` - Booking lifecycle state machine and availability checking
//! - `ledger` - Append-only double-entry ledger batches
//! - `deposit` - Security-deposit hold/release/capture protocol
//! - `payout` - Payout eligibility and aggregation

pub mod booking;
pub mod deposit;
pub mod ledger;
pub mod payout;
