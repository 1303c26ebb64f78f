//! Combat statistic derivation.
//!
//! Maps physical attributes and training totals onto eight combat stats on
//! a 0-100 scale. The coefficients are tuned so that elite specialists land
//! in the 75-85 band rather than pinning at 100.

use serde::{Deserialize, Serialize};

use crate::math::round1;
use crate::profile::{PhysicalAttributes, TrainingProfile};

/// Derived combat statistics, each in `[0, 100]` and rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    /// Striking power.
    pub power: f64,
    /// Hand and foot speed.
    pub speed: f64,
    /// Endurance.
    pub cardio: f64,
    /// Ability to take a shot.
    pub chin: f64,
    /// Striking technique.
    pub technique: f64,
    /// Clinch strength and skill.
    pub clinch: f64,
    /// Defensive skill.
    pub defense: f64,
    /// Ring craft.
    pub fight_iq: f64,
}

fn clamp_stat(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Derive combat statistics from a fighter's attributes.
///
/// Pure and idempotent: identical inputs always give identical output.
/// Defense reads the unrounded speed value.
#[must_use]
pub fn derive_stats(physical: &PhysicalAttributes, training: &TrainingProfile) -> CombatStats {
    let weight = physical.weight_kg;
    let muscle = physical.muscle_mass_percent;
    let fast_twitch = physical.fast_twitch_ratio;
    let age = f64::from(physical.age);

    let power = clamp_stat(weight * 0.25 + muscle * 0.25);
    let speed = clamp_stat(40.0 + (100.0 - weight) * 0.2 + fast_twitch * 0.25);
    let cardio = clamp_stat(
        30.0 + (100.0 - muscle) * 0.25
            + (100.0 - fast_twitch) * 0.12
            + f64::from(training.cardio_hours) / 40.0,
    );
    let chin = clamp_stat(40.0 + (100.0 - (age - 18.0) * 1.2) * 0.3 + weight * 0.12);
    let technique =
        clamp_stat((f64::from(training.striking_hours) / 20.0) * (1.0 + fast_twitch / 400.0));
    let clinch = clamp_stat(f64::from(training.clinch_hours) / 10.0);
    let defense = clamp_stat(f64::from(training.sparring_hours) / 15.0 + speed * 0.1);

    #[allow(clippy::cast_precision_loss)]
    let total_hours = training.total_hours() as f64;
    let fight_iq = clamp_stat(total_hours / 50.0 + ((30.0 - age) * 0.5).max(0.0));

    CombatStats {
        power: round1(power),
        speed: round1(speed),
        cardio: round1(cardio),
        chin: round1(chin),
        technique: round1(technique),
        clinch: round1(clinch),
        defense: round1(defense),
        fight_iq: round1(fight_iq),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> (PhysicalAttributes, TrainingProfile) {
        (
            PhysicalAttributes {
                height_cm: 175.0,
                weight_kg: 70.0,
                age: 25,
                muscle_mass_percent: 75.0,
                fast_twitch_ratio: 60.0,
            },
            TrainingProfile {
                striking_hours: 800,
                clinch_hours: 500,
                cardio_hours: 400,
                sparring_hours: 600,
            },
        )
    }

    fn close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 0.1 + 1e-9,
            "expected ~{expected}, got {actual}"
        );
    }

    #[test]
    fn test_reference_profile_stats() {
        let (physical, training) = reference();
        let stats = derive_stats(&physical, &training);
        close(stats.power, 36.3);
        close(stats.speed, 61.0);
        close(stats.cardio, 51.1);
        close(stats.chin, 75.9);
        close(stats.technique, 46.0);
        close(stats.clinch, 50.0);
        close(stats.defense, 46.1);
        close(stats.fight_iq, 48.5);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let (physical, training) = reference();
        let first = derive_stats(&physical, &training);
        for _ in 0..10 {
            assert_eq!(derive_stats(&physical, &training), first);
        }
    }

    #[test]
    fn test_stats_are_clamped() {
        let physical = PhysicalAttributes {
            height_cm: 200.0,
            weight_kg: 300.0,
            age: 90,
            muscle_mass_percent: 100.0,
            fast_twitch_ratio: 100.0,
        };
        let training = TrainingProfile {
            striking_hours: 100_000,
            clinch_hours: 100_000,
            cardio_hours: 100_000,
            sparring_hours: 100_000,
        };
        let stats = derive_stats(&physical, &training);
        for value in [
            stats.power,
            stats.speed,
            stats.cardio,
            stats.chin,
            stats.technique,
            stats.clinch,
            stats.defense,
            stats.fight_iq,
        ] {
            assert!((0.0..=100.0).contains(&value), "stat out of range: {value}");
        }
        assert_eq!(stats.power, 100.0);
        assert_eq!(stats.clinch, 100.0);
    }

    #[test]
    fn test_youth_bonus_only_under_thirty() {
        let (mut physical, training) = reference();
        physical.age = 40;
        let stats = derive_stats(&physical, &training);
        // 2300 hours / 50, no age bonus
        close(stats.fight_iq, 46.0);
    }
}
