//! Test fixtures and helpers.
//!
//! Pre-built fighter profiles and bouts for consistent testing.

use bout_core::bout::Bout;
use bout_core::config::BoutConfig;
use bout_core::profile::{
    Durability, Fighter, FighterProfile, FightingStyle, PhysicalAttributes, TrainingProfile,
};

/// The reference profile whose derived stats are pinned in tests:
/// 175 cm, 70 kg, age 25, 75% muscle, 60% fast-twitch, 800/500/400/600 hours.
#[must_use]
pub fn reference_profile() -> FighterProfile {
    somchai()
}

/// Somchai Petchyindee, a balanced technician.
#[must_use]
pub fn somchai() -> FighterProfile {
    FighterProfile {
        id: "demo_001".to_string(),
        name: "Somchai Petchyindee".to_string(),
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

/// Nong-O Gaiyanghadao, the more experienced clinch fighter.
#[must_use]
pub fn nong_o() -> FighterProfile {
    FighterProfile {
        id: "demo_002".to_string(),
        name: "Nong-O Gaiyanghadao".to_string(),
        discipline: "Muay Thai".to_string(),
        physical: PhysicalAttributes {
            height_cm: 172.0,
            weight_kg: 68.0,
            age: 28,
            muscle_mass_percent: 70.0,
            fast_twitch_ratio: 55.0,
        },
        training: TrainingProfile {
            striking_hours: 900,
            clinch_hours: 600,
            cardio_hours: 500,
            sparring_hours: 700,
        },
        style: FightingStyle {
            body_attack_preference: 40.0,
            leg_kick_tendency: 30.0,
            power_punch_frequency: 35.0,
        },
        durability: Durability {
            head_durability: 75.0,
            body_durability: 80.0,
            leg_durability: 70.0,
            recovery_rate: 65.0,
        },
    }
}

/// A heavy, untrained puncher with a glass jaw. Useful for stoppages.
#[must_use]
pub fn brawler() -> FighterProfile {
    FighterProfile {
        id: "demo_003".to_string(),
        name: "Glass Cannon".to_string(),
        discipline: "Boxing".to_string(),
        physical: PhysicalAttributes {
            height_cm: 185.0,
            weight_kg: 95.0,
            age: 38,
            muscle_mass_percent: 90.0,
            fast_twitch_ratio: 80.0,
        },
        training: TrainingProfile {
            striking_hours: 200,
            clinch_hours: 0,
            cardio_hours: 0,
            sparring_hours: 50,
        },
        style: FightingStyle {
            body_attack_preference: 10.0,
            leg_kick_tendency: 0.0,
            power_punch_frequency: 90.0,
        },
        durability: Durability {
            head_durability: 10.0,
            body_durability: 10.0,
            leg_durability: 10.0,
            recovery_rate: 0.0,
        },
    }
}

/// Build a validated fighter from a fixture profile.
///
/// # Panics
///
/// Panics if the profile is invalid; fixtures are always valid.
#[must_use]
pub fn fighter(profile: FighterProfile) -> Fighter {
    Fighter::new(profile).expect("fixture profile must be valid")
}

/// Somchai vs Nong-O under default rules with the given seed.
///
/// # Panics
///
/// Panics if the default config is rejected.
#[must_use]
pub fn demo_bout(seed: u64) -> Bout {
    bout_with(somchai(), nong_o(), BoutConfig::default(), seed)
}

/// Bout between two fixture profiles.
///
/// # Panics
///
/// Panics if a profile or the config is invalid.
#[must_use]
pub fn bout_with(a: FighterProfile, b: FighterProfile, config: BoutConfig, seed: u64) -> Bout {
    Bout::seeded(fighter(a), fighter(b), config, seed).expect("fixture bout must be valid")
}
