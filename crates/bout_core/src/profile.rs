//! Fighter profile records and validation.
//!
//! A [`FighterProfile`] is the externally supplied record: physical
//! measurements, training totals, style tendencies and durability. It is
//! parsed by whoever owns the fighter records (see `bout_headless` for the
//! JSON loader) and validated here before any simulation can use it.
//!
//! # Example RON
//!
//! ```ron
//! FighterProfile(
//!     id: "demo_001",
//!     name: "Somchai Petchyindee",
//!     discipline: "Muay Thai",
//!     physical: (height_cm: 175.0, weight_kg: 70.0, age: 25,
//!                muscle_mass_percent: 75.0, fast_twitch_ratio: 60.0),
//!     training: (striking_hours: 800, clinch_hours: 500,
//!                cardio_hours: 400, sparring_hours: 600),
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{BoutError, Result};
use crate::stats::{derive_stats, CombatStats};

/// Measurable physical attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalAttributes {
    /// Standing height in centimetres. Drives capsule geometry.
    pub height_cm: f64,
    /// Fight weight in kilograms.
    pub weight_kg: f64,
    /// Age in years.
    pub age: u32,
    /// Muscle mass percentage, 0-100. Trades cardio for power.
    pub muscle_mass_percent: f64,
    /// Fast-twitch fibre ratio, 0-100. Trades endurance for speed.
    pub fast_twitch_ratio: f64,
}

/// Cumulative training hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingProfile {
    /// Pad, bag and technical striking work.
    pub striking_hours: u32,
    /// Clinch work.
    pub clinch_hours: u32,
    /// Roadwork and conditioning.
    pub cardio_hours: u32,
    /// Live sparring.
    pub sparring_hours: u32,
}

impl TrainingProfile {
    /// Sum of all training hours.
    #[must_use]
    pub fn total_hours(&self) -> u64 {
        u64::from(self.striking_hours)
            + u64::from(self.clinch_hours)
            + u64::from(self.cardio_hours)
            + u64::from(self.sparring_hours)
    }
}

/// Style tendencies, each a percentage in 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightingStyle {
    /// How often strikes target the body instead of the head.
    pub body_attack_preference: f64,
    /// Appetite for leg kicks. Carried with the record; archetype
    /// selection is uniform and does not read it.
    pub leg_kick_tendency: f64,
    /// How often a strike is a loaded power shot instead of a jab.
    pub power_punch_frequency: f64,
}

impl Default for FightingStyle {
    fn default() -> Self {
        Self {
            body_attack_preference: 30.0,
            leg_kick_tendency: 20.0,
            power_punch_frequency: 40.0,
        }
    }
}

/// Resistance to accumulated damage, each a percentage in 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Durability {
    /// Ability to absorb head shots.
    pub head_durability: f64,
    /// Ability to absorb body shots.
    pub body_durability: f64,
    /// Resistance to leg damage.
    pub leg_durability: f64,
    /// How much stamina and zone damage comes back between rounds.
    pub recovery_rate: f64,
}

impl Default for Durability {
    fn default() -> Self {
        Self {
            head_durability: 70.0,
            body_durability: 70.0,
            leg_durability: 70.0,
            recovery_rate: 60.0,
        }
    }
}

/// Complete fighter record as supplied by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterProfile {
    /// Stable identifier.
    pub id: String,
    /// Display name, used in round and match results.
    pub name: String,
    /// Discipline label, informational only.
    #[serde(default = "default_discipline")]
    pub discipline: String,
    /// Physical measurements.
    pub physical: PhysicalAttributes,
    /// Training totals.
    pub training: TrainingProfile,
    /// Style tendencies.
    #[serde(default)]
    pub style: FightingStyle,
    /// Durability.
    #[serde(default)]
    pub durability: Durability,
}

fn default_discipline() -> String {
    "Muay Thai".to_string()
}

impl FighterProfile {
    /// Parse a profile from a RON document.
    ///
    /// # Errors
    ///
    /// Returns [`BoutError::ProfileParse`] when a required field is missing
    /// or malformed.
    pub fn from_ron_str(source_name: &str, text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| BoutError::ProfileParse {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
    }

    /// Check every numeric field against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`BoutError::InvalidProfile`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let fail = |field: &'static str, reason: String| BoutError::InvalidProfile {
            fighter: self.name.clone(),
            field,
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(fail("name", "must not be empty".to_string()));
        }

        let p = &self.physical;
        positive(p.height_cm).map_err(|r| fail("physical.height_cm", r))?;
        positive(p.weight_kg).map_err(|r| fail("physical.weight_kg", r))?;
        if p.age == 0 {
            return Err(fail("physical.age", "must be positive".to_string()));
        }
        percent(p.muscle_mass_percent).map_err(|r| fail("physical.muscle_mass_percent", r))?;
        percent(p.fast_twitch_ratio).map_err(|r| fail("physical.fast_twitch_ratio", r))?;

        let s = &self.style;
        percent(s.body_attack_preference).map_err(|r| fail("style.body_attack_preference", r))?;
        percent(s.leg_kick_tendency).map_err(|r| fail("style.leg_kick_tendency", r))?;
        percent(s.power_punch_frequency).map_err(|r| fail("style.power_punch_frequency", r))?;

        let d = &self.durability;
        // Durability divides accumulated damage, so zero is rejected too.
        positive_percent(d.head_durability).map_err(|r| fail("durability.head_durability", r))?;
        positive_percent(d.body_durability).map_err(|r| fail("durability.body_durability", r))?;
        positive_percent(d.leg_durability).map_err(|r| fail("durability.leg_durability", r))?;
        percent(d.recovery_rate).map_err(|r| fail("durability.recovery_rate", r))?;

        Ok(())
    }
}

fn finite(value: f64) -> std::result::Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("must be a finite number, got {value}"))
    }
}

fn positive(value: f64) -> std::result::Result<(), String> {
    finite(value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(format!("must be positive, got {value}"))
    }
}

fn percent(value: f64) -> std::result::Result<(), String> {
    finite(value)?;
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("must be within 0-100, got {value}"))
    }
}

fn positive_percent(value: f64) -> std::result::Result<(), String> {
    percent(value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err("must be greater than 0".to_string())
    }
}

/// A validated profile with its derived combat statistics.
///
/// Built once at load time and immutable for the rest of the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    profile: FighterProfile,
    stats: CombatStats,
}

impl Fighter {
    /// Validate a profile and derive its stats.
    ///
    /// # Errors
    ///
    /// Returns [`BoutError::InvalidProfile`] if validation fails.
    pub fn new(profile: FighterProfile) -> Result<Self> {
        profile.validate()?;
        let stats = derive_stats(&profile.physical, &profile.training);
        Ok(Self { profile, stats })
    }

    /// Underlying profile.
    #[must_use]
    pub fn profile(&self) -> &FighterProfile {
        &self.profile
    }

    /// Derived combat statistics.
    #[must_use]
    pub fn stats(&self) -> &CombatStats {
        &self.stats
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Style tendencies.
    #[must_use]
    pub fn style(&self) -> &FightingStyle {
        &self.profile.style
    }

    /// Durability values.
    #[must_use]
    pub fn durability(&self) -> &Durability {
        &self.profile.durability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FighterProfile {
        FighterProfile {
            id: "demo_001".to_string(),
            name: "Somchai".to_string(),
            discipline: "Muay Thai".to_string(),
            physical: PhysicalAttributes {
                height_cm: 175.0,
                weight_kg: 70.0,
                age: 25,
                muscle_mass_percent: 75.0,
                fast_twitch_ratio: 60.0,
            },
            training: TrainingProfile {
                striking_hours: 800,
                clinch_hours: 500,
                cardio_hours: 400,
                sparring_hours: 600,
            },
            style: FightingStyle::default(),
            durability: Durability::default(),
        }
    }

    #[test]
    fn test_valid_profile_builds_fighter() {
        let fighter = Fighter::new(sample()).unwrap();
        assert_eq!(fighter.name(), "Somchai");
        assert_eq!(fighter.stats().clinch, 50.0);
    }

    #[test]
    fn test_rejects_out_of_range_percentage() {
        let mut profile = sample();
        profile.style.power_punch_frequency = 140.0;
        let err = Fighter::new(profile).unwrap_err();
        match err {
            BoutError::InvalidProfile { field, .. } => {
                assert_eq!(field, "style.power_punch_frequency");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_zero_durability() {
        let mut profile = sample();
        profile.durability.leg_durability = 0.0;
        assert!(matches!(
            profile.validate(),
            Err(BoutError::InvalidProfile {
                field: "durability.leg_durability",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_nan_weight() {
        let mut profile = sample();
        profile.physical.weight_kg = f64::NAN;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_ron_defaults_style_and_durability() {
        let text = r#"FighterProfile(
            id: "x",
            name: "Ron Fighter",
            physical: (height_cm: 172.0, weight_kg: 68.0, age: 28,
                       muscle_mass_percent: 70.0, fast_twitch_ratio: 55.0),
            training: (striking_hours: 900, clinch_hours: 600,
                       cardio_hours: 500, sparring_hours: 700),
        )"#;
        let profile = FighterProfile::from_ron_str("inline", text).unwrap();
        assert_eq!(profile.style, FightingStyle::default());
        assert_eq!(profile.durability, Durability::default());
        assert_eq!(profile.discipline, "Muay Thai");
    }

    #[test]
    fn test_ron_missing_training_fails_fast() {
        let text = r#"FighterProfile(
            id: "x",
            name: "Incomplete",
            physical: (height_cm: 172.0, weight_kg: 68.0, age: 28,
                       muscle_mass_percent: 70.0, fast_twitch_ratio: 55.0),
        )"#;
        let err = FighterProfile::from_ron_str("inline", text).unwrap_err();
        assert!(matches!(err, BoutError::ProfileParse { .. }));
    }
}
