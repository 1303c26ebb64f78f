//! Determinism testing utilities.
//!
//! Provides a harness for verifying that a bout produces an identical event
//! stream given identical inputs.
//!
//! # Testing Strategy
//!
//! A bout must be fully reproducible from its profiles, rule set and seed.
//! Sources of non-determinism include:
//!
//! - **System randomness**: every draw must come from the injected source.
//!   The default is a seeded `ChaCha8Rng`, which is portable across
//!   platforms.
//!
//! - **Hash iteration order**: the core iterates fixed-size arrays indexed
//!   by side, never hash maps.
//!
//! - **Evaluation order**: floating-point results depend on operation order,
//!   so each exchange performs its draws and arithmetic in a fixed sequence.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: individual components (movement, exchange, scoring)
//! 2. **Property tests**: random profiles and seeds still replay identically
//! 3. **Integration tests**: full bouts are reproducible
//! 4. **Parallel tests**: running N bouts on separate threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use bout_core::bout::Bout;
use bout_core::events::{event_log_hash, FightEvent};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps simulated per run.
    pub steps: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic bout).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the runs were deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Bout is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Result of parallel bout runs.
#[derive(Debug, Clone)]
pub struct ParallelBoutResult {
    /// Event log hash from each bout.
    pub hashes: Vec<u64>,
    /// Event count from each bout.
    pub event_counts: Vec<usize>,
    /// Number of bouts run.
    pub num_bouts: usize,
}

impl ParallelBoutResult {
    /// Check if all bouts produced identical logs.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
            && self.event_counts.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all bouts matched.
    ///
    /// # Panics
    ///
    /// Panics if bouts produced different logs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel bouts diverged!\n\
                 Bouts: {}\n\
                 Unique hashes: {}\n\
                 Event counts: {:?}\n\
                 All hashes: {:?}",
                self.num_bouts,
                unique.len(),
                self.event_counts,
                self.hashes
            );
        }
    }
}

/// Run any stepped process multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `steps` - Number of steps per run
/// * `setup` - Function to create initial state
/// * `step` - Function to advance by one step
/// * `hash` - Function to compute a state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..steps {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Play a bout to the end and collect every event.
pub fn collect_events(bout: Bout) -> Vec<FightEvent> {
    bout.collect()
}

/// Play a freshly built bout `runs` times and compare event log hashes.
///
/// Each run pulls events until the bout is exhausted; the step count in the
/// result is the length of the first run's log.
pub fn verify_bout_determinism<F>(setup_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> Bout,
{
    let logs: Vec<Vec<FightEvent>> = (0..runs).map(|_| collect_events(setup_fn())).collect();
    let hashes: Vec<u64> = logs.iter().map(|log| event_log_hash(log)).collect();
    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1])
        && logs.windows(2).all(|w| w[0].len() == w[1].len());

    DeterminismResult {
        is_deterministic,
        hashes,
        steps: logs.first().map_or(0, |log| log.len() as u64),
    }
}

/// Run N bouts on scoped threads and collect their log hashes.
///
/// Catches non-determinism that only shows up under thread scheduling or
/// memory layout differences.
pub fn run_parallel_bouts<F>(setup_fn: F, num_bouts: usize) -> ParallelBoutResult
where
    F: Fn() -> Bout + Sync,
{
    let results: Vec<(u64, usize)> = thread::scope(|s| {
        let handles: Vec<_> = (0..num_bouts)
            .map(|_| {
                s.spawn(|| {
                    let events = collect_events(setup_fn());
                    (event_log_hash(&events), events.len())
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    });

    ParallelBoutResult {
        hashes: results.iter().map(|(hash, _)| *hash).collect(),
        event_counts: results.iter().map(|(_, count)| *count).collect(),
        num_bouts,
    }
}

/// Compare two bouts event by event, finding the first divergence.
///
/// # Returns
///
/// `None` if both produce the same stream, `Some(index)` of the first event
/// that differs (including one stream ending before the other).
pub fn find_first_divergence<F>(setup_fn: F) -> Option<usize>
where
    F: Fn() -> Bout,
{
    let mut first = setup_fn();
    let mut second = setup_fn();
    let mut index = 0;

    loop {
        match (first.advance(), second.advance()) {
            (None, None) => return None,
            (Some(a), Some(b)) if a == b => index += 1,
            _ => return Some(index),
        }
    }
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for bout testing.
///
/// These generate random but valid profiles and seeds.
pub mod strategies {
    use bout_core::profile::{
        Durability, FighterProfile, FightingStyle, PhysicalAttributes, TrainingProfile,
    };
    use proptest::prelude::*;

    /// Generate a percentage in `[0, 100]`.
    pub fn arb_percent() -> impl Strategy<Value = f64> {
        0.0..=100.0f64
    }

    /// Generate physical attributes in a plausible human range.
    pub fn arb_physical() -> impl Strategy<Value = PhysicalAttributes> {
        (150.0..210.0f64, 50.0..110.0f64, 18u32..45, arb_percent(), arb_percent()).prop_map(
            |(height_cm, weight_kg, age, muscle_mass_percent, fast_twitch_ratio)| {
                PhysicalAttributes {
                    height_cm,
                    weight_kg,
                    age,
                    muscle_mass_percent,
                    fast_twitch_ratio,
                }
            },
        )
    }

    /// Generate training totals up to 3000 hours per category.
    pub fn arb_training() -> impl Strategy<Value = TrainingProfile> {
        (0u32..3000, 0u32..3000, 0u32..3000, 0u32..3000).prop_map(
            |(striking_hours, clinch_hours, cardio_hours, sparring_hours)| TrainingProfile {
                striking_hours,
                clinch_hours,
                cardio_hours,
                sparring_hours,
            },
        )
    }

    /// Generate style tendencies.
    pub fn arb_style() -> impl Strategy<Value = FightingStyle> {
        (arb_percent(), arb_percent(), arb_percent()).prop_map(
            |(body_attack_preference, leg_kick_tendency, power_punch_frequency)| FightingStyle {
                body_attack_preference,
                leg_kick_tendency,
                power_punch_frequency,
            },
        )
    }

    /// Generate durability; zone durabilities are kept above zero.
    pub fn arb_durability() -> impl Strategy<Value = Durability> {
        (1.0..=100.0f64, 1.0..=100.0f64, 1.0..=100.0f64, arb_percent()).prop_map(
            |(head_durability, body_durability, leg_durability, recovery_rate)| Durability {
                head_durability,
                body_durability,
                leg_durability,
                recovery_rate,
            },
        )
    }

    /// Generate a complete valid profile.
    pub fn arb_profile() -> impl Strategy<Value = FighterProfile> {
        (
            "[A-Z][a-z]{2,10}",
            arb_physical(),
            arb_training(),
            arb_style(),
            arb_durability(),
        )
            .prop_map(|(name, physical, training, style, durability)| FighterProfile {
                id: name.to_lowercase(),
                name,
                discipline: "Muay Thai".to_string(),
                physical,
                training,
                style,
                durability,
            })
    }

    /// Generate a seed.
    pub fn arb_seed() -> impl Strategy<Value = u64> {
        any::<u64>()
    }
}
