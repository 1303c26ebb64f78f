//! Bout tuning constants.
//!
//! Every number the simulation reads lives in [`BoutConfig`]. Defaults are
//! the standard five-round fast-forward rule set; a RON file can override any
//! subset of fields.

use serde::{Deserialize, Serialize};

use crate::error::{BoutError, Result};
use crate::math::Vec2;

/// Logical clock used to stamp events.
///
/// Only affects timestamps and break lengths; the number of exchanges per
/// round is the same at every pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Pace {
    /// 20 second rounds, 2 second breaks.
    #[default]
    FastForward,
    /// Three minute rounds, one minute breaks.
    RealTime,
}

impl Pace {
    /// Logical round length in seconds.
    #[must_use]
    pub const fn round_seconds(self) -> f64 {
        match self {
            Pace::FastForward => 20.0,
            Pace::RealTime => 180.0,
        }
    }

    /// Break length in seconds.
    #[must_use]
    pub const fn break_seconds(self) -> u32 {
        match self {
            Pace::FastForward => 2,
            Pace::RealTime => 60,
        }
    }
}

/// Ring geometry and choreography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Minimum approximate capsule separation.
    pub min_separation: f64,
    /// Maximum distance from ring center.
    pub ring_radius: f64,
    /// Distance moved per drift step.
    pub movement_speed: f64,
    /// Per-tick probability of a drift step outside the clinch.
    pub drift_chance: f64,
    /// Drift angle is drawn uniformly from `[-max, max]` radians.
    pub drift_max_angle: f64,
    /// Center-to-center separation the clinch pulls toward.
    pub clinch_distance: f64,
    /// Fighter A's corner before the intro (B mirrors it).
    pub corner_a: Vec2,
    /// Fighter A's position at the start of each round (B mirrors it).
    pub combat_a: Vec2,
    /// Center-to-center separation at the glove touch.
    pub bump_distance: f64,
    /// Frames spent walking to the center.
    pub approach_steps: u32,
    /// Frames held at the glove touch.
    pub bump_hold_frames: u32,
    /// Frames spent walking back to the corners.
    pub retreat_steps: u32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            min_separation: 2.0,
            ring_radius: 8.0,
            movement_speed: 0.2,
            drift_chance: 0.3,
            drift_max_angle: 0.3,
            clinch_distance: 0.8,
            corner_a: Vec2::new(-4.0, 0.0),
            combat_a: Vec2::new(-2.0, 0.0),
            bump_distance: 1.0,
            approach_steps: 12,
            bump_hold_frames: 8,
            retreat_steps: 8,
        }
    }
}

impl SpatialConfig {
    /// Fighter positions at the corners, indexed by side.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 2] {
        mirrored(self.corner_a)
    }

    /// Fighter positions at the start of a round, indexed by side.
    #[must_use]
    pub fn combat_positions(&self) -> [Vec2; 2] {
        mirrored(self.combat_a)
    }
}

fn mirrored(a: Vec2) -> [Vec2; 2] {
    [a, Vec2::new(-a.x, -a.z)]
}

/// Complete rule set for one bout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoutConfig {
    /// Scheduled rounds.
    pub rounds: u32,
    /// Exchanges resolved per round.
    pub exchanges_per_round: u32,
    /// Logical clock.
    pub pace: Pace,
    /// Health below this at a round boundary ends the bout by TKO.
    pub finish_threshold: f64,
    /// Upper edge of the knockdown band `(finish, ceiling)`.
    pub knockdown_ceiling: f64,
    /// Stamina never drops below this.
    pub stamina_floor: f64,
    /// Seconds a recovery is back-dated relative to its knockdown.
    pub recovery_offset: f64,
    /// Per-tick probability of breaking an existing clinch.
    pub clinch_exit_chance: f64,
    /// Geometry and choreography.
    pub spatial: SpatialConfig,
}

impl Default for BoutConfig {
    fn default() -> Self {
        Self {
            rounds: 5,
            exchanges_per_round: 30,
            pace: Pace::FastForward,
            finish_threshold: 20.0,
            knockdown_ceiling: 30.0,
            stamina_floor: 20.0,
            recovery_offset: 2.0,
            clinch_exit_chance: 0.4,
            spatial: SpatialConfig::default(),
        }
    }
}

impl BoutConfig {
    /// Default rules with the given pace.
    #[must_use]
    pub fn with_pace(pace: Pace) -> Self {
        Self {
            pace,
            ..Self::default()
        }
    }

    /// Parse a config from RON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BoutError::InvalidConfig`] if the document is malformed or
    /// the values fail [`BoutConfig::validate`].
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: Self =
            ron::from_str(text).map_err(|e| BoutError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Seconds between consecutive exchanges.
    #[must_use]
    pub fn exchange_interval(&self) -> f64 {
        self.pace.round_seconds() / f64::from(self.exchanges_per_round)
    }

    /// Check the rule set for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`BoutError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(BoutError::InvalidConfig(msg));

        if self.rounds == 0 {
            return fail("rounds must be at least 1".to_string());
        }
        if self.exchanges_per_round == 0 {
            return fail("exchanges_per_round must be at least 1".to_string());
        }
        if !(0.0..100.0).contains(&self.finish_threshold) {
            return fail(format!(
                "finish_threshold must be within [0, 100), got {}",
                self.finish_threshold
            ));
        }
        if !(self.knockdown_ceiling > self.finish_threshold && self.knockdown_ceiling <= 100.0) {
            return fail(format!(
                "knockdown_ceiling must be above finish_threshold and at most 100, got {}",
                self.knockdown_ceiling
            ));
        }
        if !(0.0..=100.0).contains(&self.stamina_floor) {
            return fail(format!(
                "stamina_floor must be within [0, 100], got {}",
                self.stamina_floor
            ));
        }
        if !(self.recovery_offset.is_finite() && self.recovery_offset >= 0.0) {
            return fail("recovery_offset must be non-negative".to_string());
        }
        probability("clinch_exit_chance", self.clinch_exit_chance)?;

        let s = &self.spatial;
        probability("spatial.drift_chance", s.drift_chance)?;
        for (name, value) in [
            ("spatial.min_separation", s.min_separation),
            ("spatial.ring_radius", s.ring_radius),
            ("spatial.movement_speed", s.movement_speed),
            ("spatial.clinch_distance", s.clinch_distance),
            ("spatial.bump_distance", s.bump_distance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return fail(format!("{name} must be positive, got {value}"));
            }
        }
        if !(s.drift_max_angle.is_finite() && s.drift_max_angle >= 0.0) {
            return fail("spatial.drift_max_angle must be non-negative".to_string());
        }
        if s.approach_steps == 0 || s.retreat_steps == 0 {
            return fail("spatial approach/retreat steps must be at least 1".to_string());
        }
        if s.corner_a.length() > s.ring_radius || s.combat_a.length() > s.ring_radius {
            return fail("spatial corner and combat positions must lie inside the ring".to_string());
        }

        Ok(())
    }
}

fn probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(BoutError::InvalidConfig(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}
