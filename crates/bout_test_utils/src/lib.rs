//! # Bout Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Fighter profile fixtures
//! - Determinism test harness over event streams
//! - Matchup balance statistics
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod balance;
pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
