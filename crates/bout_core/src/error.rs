//! Error types for the fight simulation.
//!
//! Every failure the core can report happens at construction time: a bad
//! profile, a bad config, or a replay that no longer matches. Once a
//! [`Bout`](crate::bout::Bout) exists, producing events cannot fail.

use thiserror::Error;

/// Result type alias using [`BoutError`].
pub type Result<T> = std::result::Result<T, BoutError>;

/// Top-level error type for all simulation errors.
#[derive(Debug, Error)]
pub enum BoutError {
    /// A fighter profile field is out of its accepted range.
    #[error("Invalid profile for '{fighter}': {field} {reason}")]
    InvalidProfile {
        /// Name of the fighter whose profile was rejected.
        fighter: String,
        /// Dotted path of the offending field, e.g. `physical.age`.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A fighter profile document could not be parsed.
    #[error("Failed to parse profile '{source_name}': {message}")]
    ProfileParse {
        /// File path or other label of the document.
        source_name: String,
        /// Parser error message.
        message: String,
    },

    /// The bout configuration is inconsistent.
    #[error("Invalid bout config: {0}")]
    InvalidConfig(String),

    /// Invalid simulation or replay state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A replay was written by an incompatible format version.
    #[error("Replay version mismatch: expected {expected}, found {found}")]
    ReplayVersion {
        /// Version this build understands.
        expected: u32,
        /// Version found in the file.
        found: u32,
    },

    /// Re-simulating a replay produced a different event log.
    #[error(
        "Desync detected: expected {expected_events} events with hash {expected_hash}, \
         got {actual_events} events with hash {actual_hash}"
    )]
    Desync {
        /// Hash stored in the replay.
        expected_hash: u64,
        /// Hash of the re-simulated log.
        actual_hash: u64,
        /// Event count stored in the replay.
        expected_events: usize,
        /// Event count of the re-simulated log.
        actual_events: usize,
    },
}
