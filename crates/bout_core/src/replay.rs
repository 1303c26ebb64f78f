//! Replay recording and verification.
//!
//! A bout is fully determined by the two profiles, the rule set and the
//! seed, so a replay stores only those plus a fingerprint of the resulting
//! event log. Playing it back re-simulates the bout and compares hashes.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::bout::{Bout, FightRecord};
use crate::config::BoutConfig;
use crate::error::{BoutError, Result};
use crate::profile::{Fighter, FighterProfile};

/// Replay file format version for compatibility.
pub const REPLAY_VERSION: u32 = 1;

/// Everything needed to reproduce a bout exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    /// Replay format version.
    pub version: u32,
    /// Seed for the ChaCha8 source.
    pub seed: u64,
    /// Fighter A's profile.
    pub fighter_a: FighterProfile,
    /// Fighter B's profile.
    pub fighter_b: FighterProfile,
    /// Rule set.
    pub config: BoutConfig,
    /// Number of events the bout produced.
    pub event_count: usize,
    /// Hash of the event log.
    pub final_hash: u64,
    /// Method string of the result, for display without re-simulating.
    pub method: String,
}

impl Replay {
    /// Simulate a bout and capture it as a replay.
    ///
    /// # Errors
    ///
    /// Returns an error if either profile or the config is invalid.
    pub fn record(
        fighter_a: FighterProfile,
        fighter_b: FighterProfile,
        config: BoutConfig,
        seed: u64,
    ) -> Result<(Self, FightRecord)> {
        let mut replay = Self {
            version: REPLAY_VERSION,
            seed,
            fighter_a,
            fighter_b,
            config,
            event_count: 0,
            final_hash: 0,
            method: String::new(),
        };
        let record = replay.resimulate()?;
        replay.event_count = record.events.len();
        replay.final_hash = record.hash();
        replay.method = record.result.method.to_string();
        Ok((replay, record))
    }

    /// A fresh bout with this replay's inputs, for stepping through events.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored profiles or config are invalid.
    pub fn bout(&self) -> Result<Bout> {
        Bout::seeded(
            Fighter::new(self.fighter_a.clone())?,
            Fighter::new(self.fighter_b.clone())?,
            self.config.clone(),
            self.seed,
        )
    }

    /// Re-run the bout from the stored inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored profiles or config are invalid.
    pub fn resimulate(&self) -> Result<FightRecord> {
        self.bout()?.run()
    }

    /// Re-run the bout and check it matches the recording.
    ///
    /// # Errors
    ///
    /// Returns [`BoutError::Desync`] if the event count or hash differ.
    pub fn verify(&self) -> Result<FightRecord> {
        let record = self.resimulate()?;
        let actual_hash = record.hash();
        debug!(
            expected = self.final_hash,
            actual = actual_hash,
            events = record.events.len(),
            "Replay verification"
        );
        if actual_hash != self.final_hash || record.events.len() != self.event_count {
            return Err(BoutError::Desync {
                expected_hash: self.final_hash,
                actual_hash,
                expected_events: self.event_count,
                actual_events: record.events.len(),
            });
        }
        Ok(record)
    }

    /// Save the replay to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| BoutError::InvalidState(format!("Failed to serialize replay: {e}")))?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| BoutError::InvalidState(format!("Failed to write replay file: {e}")))?;
        Ok(())
    }

    /// Load a replay from a file.
    ///
    /// # Errors
    /// Returns an error if file reading or deserialization fails, or if the
    /// file was written by a different format version.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| BoutError::InvalidState(format!("Failed to read replay file: {e}")))?;
        let replay: Self = bincode::deserialize(&bytes)
            .map_err(|e| BoutError::InvalidState(format!("Failed to deserialize replay: {e}")))?;

        if replay.version != REPLAY_VERSION {
            return Err(BoutError::ReplayVersion {
                expected: REPLAY_VERSION,
                found: replay.version,
            });
        }

        Ok(replay)
    }
}
