//! Batch bout runner for balance testing.
//!
//! Runs many seeded bouts of one matchup in parallel using rayon and
//! collects per-bout metrics plus an aggregate summary.

use crate::metrics::{BatchSummary, BoutMetrics, MetricsCollector};
use bout_core::bout::Bout;
use bout_core::config::BoutConfig;
use bout_core::error::{BoutError, Result as BoutResult};
use bout_core::events::event_log_hash;
use bout_core::profile::{Fighter, FighterProfile};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Configuration for a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Red corner
    pub fighter_a: FighterProfile,
    /// Blue corner
    pub fighter_b: FighterProfile,
    /// Rule set shared by every bout
    pub rules: BoutConfig,
    /// Number of bouts to run
    pub bout_count: u32,
    /// Maximum parallel bouts (0 = use rayon default)
    pub parallel_bouts: u32,
    /// Output directory for results
    pub output_dir: PathBuf,
    /// Starting seed; bout `i` uses `seed_start + i`
    pub seed_start: u64,
}

impl BatchConfig {
    /// Create config for a matchup with default rules
    pub fn new(fighter_a: FighterProfile, fighter_b: FighterProfile, bout_count: u32) -> Self {
        Self {
            fighter_a,
            fighter_b,
            rules: BoutConfig::default(),
            bout_count,
            parallel_bouts: 0,
            output_dir: PathBuf::from("results"),
            seed_start: 0,
        }
    }

    /// Set output directory
    pub fn with_output(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Set seed start
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }

    /// Set rule set
    pub fn with_rules(mut self, rules: BoutConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Set parallelism
    pub fn with_parallel(mut self, parallel_bouts: u32) -> Self {
        self.parallel_bouts = parallel_bouts;
        self
    }
}

/// Results from a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used
    pub config: BatchConfig,
    /// Individual bout metrics, in seed order
    pub bouts: Vec<BoutMetrics>,
    /// Aggregate summary
    pub summary: BatchSummary,
    /// Total runtime
    pub duration_seconds: f64,
    /// Errors encountered
    pub errors: Vec<BatchError>,
}

impl BatchResults {
    /// Save results to JSON file
    pub fn save(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Load results from JSON file
    pub fn load(path: &std::path::Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(std::io::Error::other)
    }
}

/// Error during batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchError {
    /// Bout index
    pub bout_index: u32,
    /// Seed used
    pub seed: u64,
    /// Error message
    pub message: String,
}

/// Progress tracking for batch runs
#[derive(Debug)]
pub struct BatchProgress {
    /// Total bouts
    pub total: u32,
    /// Completed bouts
    pub completed: Arc<AtomicU32>,
    /// Start time
    pub start_time: Instant,
    /// Partial results for live stats
    partial_wins: Arc<Mutex<BTreeMap<String, u32>>>,
}

impl BatchProgress {
    /// Create new progress tracker
    pub fn new(total: u32) -> Self {
        Self {
            total,
            completed: Arc::new(AtomicU32::new(0)),
            start_time: Instant::now(),
            partial_wins: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Record a completed bout
    pub fn record_completion(&self, winner: Option<&str>) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        if let Some(w) = winner {
            if let Ok(mut wins) = self.partial_wins.lock() {
                *wins.entry(w.to_string()).or_insert(0) += 1;
            }
        }
    }

    /// Get current completion count
    pub fn current(&self) -> u32 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Get completion percentage
    pub fn percentage(&self) -> f64 {
        f64::from(self.current()) / f64::from(self.total.max(1)) * 100.0
    }

    /// Get estimated time remaining
    pub fn eta(&self) -> Duration {
        let completed = self.current();
        if completed == 0 {
            return Duration::from_secs(0);
        }

        let elapsed = self.start_time.elapsed();
        let per_bout = elapsed.as_secs_f64() / f64::from(completed);
        let remaining = self.total.saturating_sub(completed);
        Duration::from_secs_f64(per_bout * f64::from(remaining))
    }

    /// Get current win rates
    pub fn current_win_rates(&self) -> BTreeMap<String, f64> {
        let completed = self.current();
        if completed == 0 {
            return BTreeMap::new();
        }

        if let Ok(wins) = self.partial_wins.lock() {
            wins.iter()
                .map(|(k, v)| (k.clone(), f64::from(*v) / f64::from(completed)))
                .collect()
        } else {
            BTreeMap::new()
        }
    }

    /// Display progress to stderr
    pub fn display(&self) {
        let completed = self.current();
        let eta = self.eta();
        let rates = self.current_win_rates();

        eprintln!("╔════════════════════════════════════╗");
        eprintln!(
            "║ Batch Progress: {:>4}/{:<4} ({:>5.1}%) ║",
            completed,
            self.total,
            self.percentage()
        );
        eprintln!(
            "║ ETA: {:>29} ║",
            format!("{}m {}s", eta.as_secs() / 60, eta.as_secs() % 60)
        );
        if !rates.is_empty() {
            eprintln!("╟────────────────────────────────────╢");
            eprintln!("║ Win Rates So Far:                  ║");
            for (name, rate) in &rates {
                eprintln!("║   {:<16.16}: {:>5.1}%           ║", name, rate * 100.0);
            }
        }
        eprintln!("╚════════════════════════════════════╝");
    }
}

/// Run one bout to completion, collecting metrics from its event stream.
///
/// # Errors
///
/// Returns an error if either profile or the rules are invalid.
pub fn run_single_bout(
    fighter_a: &FighterProfile,
    fighter_b: &FighterProfile,
    rules: &BoutConfig,
    seed: u64,
) -> BoutResult<BoutMetrics> {
    let mut bout = Bout::seeded(
        Fighter::new(fighter_a.clone())?,
        Fighter::new(fighter_b.clone())?,
        rules.clone(),
        seed,
    )?;

    let mut collector = MetricsCollector::new(&format!("bout_{seed}"), seed);
    let mut events = Vec::new();
    while let Some(event) = bout.advance() {
        collector.on_event(&event);
        events.push(event);
    }

    let result = bout
        .result()
        .ok_or_else(|| BoutError::InvalidState("bout ended without a result".to_string()))?;
    Ok(collector.finalize(result, event_log_hash(&events)))
}

/// Run a batch of bouts
pub fn run_batch(config: BatchConfig) -> BatchResults {
    let start = Instant::now();
    let progress = Arc::new(BatchProgress::new(config.bout_count));

    info!(
        "Starting batch run: {} bouts of {} vs {}",
        config.bout_count, config.fighter_a.name, config.fighter_b.name
    );

    // Configure thread pool if specified
    if config.parallel_bouts > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel_bouts as usize)
            .build_global()
            .ok(); // Ignore if already set
    }

    let results: Vec<Result<BoutMetrics, BatchError>> = (0..config.bout_count)
        .into_par_iter()
        .map(|i| {
            let seed = config.seed_start.wrapping_add(u64::from(i));

            match run_single_bout(&config.fighter_a, &config.fighter_b, &config.rules, seed) {
                Ok(metrics) => {
                    let winner = metrics.winner.map(|_| metrics.winner_name.as_str());
                    progress.record_completion(winner);

                    let completed = progress.current();
                    if completed % 10 == 0 {
                        debug!("Progress: {}/{}", completed, config.bout_count);
                    }
                    if completed % 100 == 0 {
                        progress.display();
                    }

                    Ok(metrics)
                }
                Err(e) => {
                    warn!("Bout {} failed: {}", i, e);
                    Err(BatchError {
                        bout_index: i,
                        seed,
                        message: e.to_string(),
                    })
                }
            }
        })
        .collect();

    let (bouts, errors): (Vec<_>, Vec<_>) = results.into_iter().partition(Result::is_ok);
    let bouts: Vec<BoutMetrics> = bouts.into_iter().filter_map(Result::ok).collect();
    let errors: Vec<BatchError> = errors.into_iter().filter_map(Result::err).collect();

    let summary = BatchSummary::from_bouts(&bouts);
    let duration_seconds = start.elapsed().as_secs_f64();

    #[allow(clippy::cast_precision_loss)]
    let throughput = bouts.len() as f64 / duration_seconds.max(0.001);
    info!(
        "Batch complete: {} bouts in {:.1}s ({:.1} bouts/sec)",
        bouts.len(),
        duration_seconds,
        throughput
    );

    BatchResults {
        config,
        bouts,
        summary,
        duration_seconds,
        errors,
    }
}

/// Outcome of running one seed several times.
#[derive(Debug, Clone)]
pub struct DeterminismCheck {
    /// Seed that was replayed.
    pub seed: u64,
    /// Event log hash of each run.
    pub hashes: Vec<u64>,
    /// Event count of each run.
    pub event_counts: Vec<usize>,
}

impl DeterminismCheck {
    /// Whether every run produced the same log.
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
            && self.event_counts.windows(2).all(|w| w[0] == w[1])
    }
}

/// Verify determinism by running the same seed multiple times
///
/// Runs are spread over the rayon pool so thread placement cannot matter.
///
/// # Errors
///
/// Returns an error if either profile or the rules are invalid.
pub fn verify_determinism(
    fighter_a: &FighterProfile,
    fighter_b: &FighterProfile,
    rules: &BoutConfig,
    seed: u64,
    runs: u32,
) -> BoutResult<DeterminismCheck> {
    let runs: Vec<BoutMetrics> = (0..runs)
        .into_par_iter()
        .map(|_| run_single_bout(fighter_a, fighter_b, rules, seed))
        .collect::<BoutResult<_>>()?;

    Ok(DeterminismCheck {
        seed,
        hashes: runs.iter().map(|r| r.event_hash).collect(),
        event_counts: runs.iter().map(|r| r.event_count).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bout_test_utils::fixtures::{brawler, nong_o, somchai};

    fn small(count: u32) -> BatchConfig {
        BatchConfig::new(somchai(), nong_o(), count)
    }

    #[test]
    fn test_batch_config_builder() {
        let config = small(500)
            .with_output(PathBuf::from("/tmp/results"))
            .with_seed(12345)
            .with_parallel(2);

        assert_eq!(config.bout_count, 500);
        assert_eq!(config.seed_start, 12345);
        assert_eq!(config.parallel_bouts, 2);
        assert_eq!(config.rules, BoutConfig::default());
    }

    #[test]
    fn test_progress_tracking() {
        let progress = BatchProgress::new(100);
        assert_eq!(progress.current(), 0);
        assert_eq!(progress.percentage(), 0.0);

        progress.record_completion(Some("Red"));
        progress.record_completion(Some("Blue"));
        progress.record_completion(Some("Red"));
        progress.record_completion(None);

        assert_eq!(progress.current(), 4);

        let rates = progress.current_win_rates();
        assert!((rates["Red"] - 0.5).abs() < f64::EPSILON);
        assert!((rates["Blue"] - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_run_batch_small() {
        let results = run_batch(small(10).with_seed(100));

        assert_eq!(results.bouts.len(), 10);
        assert!(results.errors.is_empty());
        assert_eq!(results.summary.total_bouts, 10);
        let seeds: Vec<u64> = results.bouts.iter().map(|b| b.seed).collect();
        assert_eq!(seeds, (100..110).collect::<Vec<_>>());
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let results = run_batch(small(4).with_seed(7));
        for metrics in &results.bouts {
            let single =
                run_single_bout(&somchai(), &nong_o(), &BoutConfig::default(), metrics.seed)
                    .unwrap();
            assert_eq!(single.event_hash, metrics.event_hash);
        }
    }

    #[test]
    fn test_invalid_profile_reports_errors() {
        let mut broken = brawler();
        broken.physical.weight_kg = 0.0;
        let results = run_batch(BatchConfig::new(broken, nong_o(), 3));

        assert!(results.bouts.is_empty());
        assert_eq!(results.errors.len(), 3);
        assert_eq!(results.summary.total_bouts, 0);
    }

    #[test]
    fn test_verify_determinism() {
        let check =
            verify_determinism(&somchai(), &nong_o(), &BoutConfig::default(), 12345, 4).unwrap();
        assert_eq!(check.hashes.len(), 4);
        assert!(check.is_deterministic());
    }

    #[test]
    fn test_batch_results_save_load() {
        let results = run_batch(small(5));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("results.json");

        results.save(&path).unwrap();
        assert!(path.exists());

        let loaded = BatchResults::load(&path).unwrap();
        assert_eq!(loaded.bouts.len(), 5);
        assert_eq!(loaded.config.fighter_a.name, somchai().name);
        assert_eq!(loaded.summary.total_bouts, 5);
    }
}
