//! # Bout Core
//!
//! Deterministic Muay Thai bout simulation.
//!
//! This crate contains **only** simulation logic:
//! - No rendering
//! - No transport or pacing (the core never sleeps)
//! - No system randomness (every draw comes from an injected, seedable source)
//!
//! This separation enables:
//! - Byte-identical replays from a seed
//! - Headless batch runs for balance work
//! - Swappable renderers driven by the event stream
//!
//! ## Crate Structure
//!
//! - [`stats`] - Combat stat derivation from fighter attributes
//! - [`spatial`] - Capsule proximity model and in-round movement
//! - [`choreography`] - Pre-fight glove-touch walk
//! - [`exchange`] - Per-tick exchange resolution
//! - [`round`] - Round scoring and bookkeeping
//! - [`bout`] - Match state machine producing the event stream
//! - [`events`] - Event protocol
//! - [`replay`] - Replay recording and verification

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod bout;
pub mod choreography;
pub mod config;
pub mod error;
pub mod events;
pub mod exchange;
pub mod math;
pub mod profile;
pub mod render;
pub mod replay;
pub mod round;
pub mod spatial;
pub mod state;
pub mod stats;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bout::{Bout, FightRecord, MatchResult, Method};
    pub use crate::config::{BoutConfig, Pace, SpatialConfig};
    pub use crate::error::{BoutError, Result};
    pub use crate::events::{
        event_log_hash, EventKind, FightEvent, FighterSnapshot, MoveType, StrikeOutcome,
        TargetZone,
    };
    pub use crate::math::Vec2;
    pub use crate::profile::{
        Durability, Fighter, FighterProfile, FightingStyle, PhysicalAttributes, TrainingProfile,
    };
    pub use crate::render::FightRenderer;
    pub use crate::replay::Replay;
    pub use crate::round::{RoundResult, RoundVerdict};
    pub use crate::state::{CombatantState, Side};
    pub use crate::stats::CombatStats;
}
