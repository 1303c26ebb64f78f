//! Headless Muay Thai bout runner.
//!
//! This binary runs bouts without graphics and streams events on stdout.
//! Designed for renderers, balance testing, and replay verification.
//!
//! # Usage
//!
//! ```bash
//! # Stream the demo bout as JSON lines
//! cargo run -p bout_headless -- run
//!
//! # Pick fighters by id or file, with championship rules
//! cargo run -p bout_headless -- run -a demo_002 -b fighters/kaewpat.json --rules data/rules/championship.ron
//!
//! # Run batch balance test
//! cargo run -p bout_headless -- batch --count 1000 --output results/
//!
//! # Record and verify a replay
//! cargo run -p bout_headless -- replay record --seed 9 --file bout.replay
//! cargo run -p bout_headless -- replay verify --file bout.replay
//! ```
//!
//! # Protocol
//!
//! Output (stdout): JSON events, one per line
//! Logs (stderr): Debug information and summaries
//!
//! See the protocol module for the event format.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bout_core::bout::Bout;
use bout_core::config::BoutConfig;
use bout_core::profile::{Fighter, FighterProfile};
use bout_core::replay::Replay;
use bout_core::stats::derive_stats;
use bout_headless::{
    batch::{run_batch, verify_determinism, BatchConfig},
    profile_loader::{load_registry, load_rules, ProfileRegistry},
    runner::{BoutRunner, OutputFormat, Pacing, RunnerConfig},
};

#[derive(Parser)]
#[command(name = "bout_headless")]
#[command(about = "Headless Muay Thai bout runner for streaming, balance testing and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory of extra fighter profiles (JSON or RON)
    #[arg(long, global = true)]
    fighter_data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Fighters and rules shared by every bout-running command.
#[derive(clap::Args, Clone)]
struct MatchupArgs {
    /// Red corner: profile id or path to a profile file
    #[arg(short = 'a', long, default_value = "demo_001")]
    fighter_a: String,

    /// Blue corner: profile id or path to a profile file
    #[arg(short = 'b', long, default_value = "demo_002")]
    fighter_b: String,

    /// Rule set (RON); defaults to five fast-forward rounds
    #[arg(long)]
    rules: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream a single bout
    Run {
        #[command(flatten)]
        matchup: MatchupArgs,

        /// Random seed (default: derived from the clock and logged)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Wall-clock pacing between events
        #[arg(short, long, value_enum, default_value = "fast")]
        pace: Pacing,

        /// Output encoding
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Disable colored text output
        #[arg(long)]
        no_color: bool,
    },

    /// Run batch of bouts for balance testing
    Batch {
        #[command(flatten)]
        matchup: MatchupArgs,

        /// Number of bouts to run
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// Maximum parallel bouts (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: u32,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Starting random seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Verify determinism by running same seed multiple times
    Verify {
        #[command(flatten)]
        matchup: MatchupArgs,

        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },

    /// Record or verify a replay file
    Replay {
        #[command(subcommand)]
        action: ReplayAction,
    },

    /// Print derived combat stats for profiles
    Stats {
        /// Profile ids or paths (default: every loaded profile)
        fighters: Vec<String>,
    },

    /// Time N bouts for benchmarking
    Benchmark {
        #[command(flatten)]
        matchup: MatchupArgs,

        /// Number of bouts to run
        #[arg(short, long, default_value = "1000")]
        count: u32,
    },
}

#[derive(Subcommand)]
enum ReplayAction {
    /// Simulate a bout and save it as a replay
    Record {
        #[command(flatten)]
        matchup: MatchupArgs,

        /// Seed to record
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Replay file path
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Re-simulate a replay and check its hash
    Verify {
        /// Replay file path
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Stream a replay's events as JSON lines, without pacing
    Play {
        /// Replay file path
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let mut registry = match load_registry(cli.fighter_data.as_deref()) {
        Ok(r) => r,
        Err(e) => fatal("Failed to load fighter profiles", &e),
    };

    match cli.command {
        Some(Commands::Run {
            matchup,
            seed,
            pace,
            format,
            no_color,
        }) => {
            cmd_run(&mut registry, &matchup, seed, pace, format, no_color);
        }
        Some(Commands::Batch {
            matchup,
            count,
            parallel,
            output,
            seed,
        }) => {
            cmd_batch(&mut registry, &matchup, count, parallel, output, seed);
        }
        Some(Commands::Verify {
            matchup,
            seed,
            runs,
        }) => {
            cmd_verify(&mut registry, &matchup, seed, runs);
        }
        Some(Commands::Replay { action }) => {
            cmd_replay(&mut registry, action);
        }
        Some(Commands::Stats { fighters }) => {
            cmd_stats(&mut registry, &fighters);
        }
        Some(Commands::Benchmark { matchup, count }) => {
            cmd_benchmark(&mut registry, &matchup, count);
        }
        None => {
            // Default: stream the demo bout
            let matchup = MatchupArgs {
                fighter_a: "demo_001".to_string(),
                fighter_b: "demo_002".to_string(),
                rules: None,
            };
            cmd_run(
                &mut registry,
                &matchup,
                None,
                Pacing::Fast,
                OutputFormat::Json,
                false,
            );
        }
    }
}

fn fatal(context: &str, error: &dyn std::fmt::Display) -> ! {
    tracing::error!(error = %error, "{}", context);
    eprintln!("FATAL: {context}: {error}");
    std::process::exit(1);
}

fn banner(title: &str) {
    eprintln!("\n{}", "=".repeat(50));
    eprintln!("{title}");
    eprintln!("{}", "=".repeat(50));
}

/// Resolve both corners and the rule set.
fn resolve_matchup(
    registry: &mut ProfileRegistry,
    matchup: &MatchupArgs,
) -> (FighterProfile, FighterProfile, BoutConfig) {
    let fighter_a = registry
        .resolve(&matchup.fighter_a)
        .unwrap_or_else(|e| fatal("Cannot load fighter A", &e));
    let fighter_b = registry
        .resolve(&matchup.fighter_b)
        .unwrap_or_else(|e| fatal("Cannot load fighter B", &e));
    let rules = match &matchup.rules {
        Some(path) => load_rules(path).unwrap_or_else(|e| fatal("Cannot load rules", &e)),
        None => BoutConfig::default(),
    };
    (fighter_a, fighter_b, rules)
}

fn build_bout(
    fighter_a: FighterProfile,
    fighter_b: FighterProfile,
    rules: BoutConfig,
    seed: u64,
) -> bout_core::error::Result<Bout> {
    Bout::seeded(Fighter::new(fighter_a)?, Fighter::new(fighter_b)?, rules, seed)
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() ^ u64::from(d.subsec_nanos()))
}

/// Stream a single bout to stdout
fn cmd_run(
    registry: &mut ProfileRegistry,
    matchup: &MatchupArgs,
    seed: Option<u64>,
    pace: Pacing,
    format: OutputFormat,
    no_color: bool,
) {
    let (fighter_a, fighter_b, rules) = resolve_matchup(registry, matchup);
    let seed = seed.unwrap_or_else(clock_seed);

    tracing::info!(
        fighter_a = %fighter_a.name,
        fighter_b = %fighter_b.name,
        seed = seed,
        pace = ?pace,
        format = ?format,
        "Starting bout"
    );

    let bout = build_bout(fighter_a, fighter_b, rules, seed)
        .unwrap_or_else(|e| fatal("Cannot start bout", &e));

    let stdout = std::io::stdout();
    let use_color = !no_color && stdout.is_terminal();
    let runner = BoutRunner::with_config(RunnerConfig {
        pacing: pace,
        format,
        use_color,
    });

    let summary = runner
        .run(bout, &mut stdout.lock())
        .unwrap_or_else(|e| fatal("Bout stream failed", &e));

    banner("BOUT COMPLETE");
    eprintln!("Seed: {seed}");
    eprintln!("Winner: {} by {}", summary.result.winner_name, summary.result.method);
    eprintln!("Events: {}", summary.event_count);
    eprintln!("Hash: {:016x}", summary.event_hash);
}

/// Run batch of bouts for balance testing
fn cmd_batch(
    registry: &mut ProfileRegistry,
    matchup: &MatchupArgs,
    count: u32,
    parallel: u32,
    output: PathBuf,
    seed: u64,
) {
    let (fighter_a, fighter_b, rules) = resolve_matchup(registry, matchup);

    let num_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);

    tracing::info!(
        fighter_a = %fighter_a.name,
        fighter_b = %fighter_b.name,
        count = count,
        parallel = parallel,
        seed = seed,
        output = %output.display(),
        cpus_available = num_cpus,
        "Batch configuration"
    );

    // Ensure output directory exists
    if let Err(e) = std::fs::create_dir_all(&output) {
        fatal(&format!("Cannot create output directory '{}'", output.display()), &e);
    }

    let config = BatchConfig::new(fighter_a, fighter_b, count)
        .with_rules(rules)
        .with_parallel(parallel)
        .with_output(output.clone())
        .with_seed(seed);

    let results = run_batch(config);

    // Save results
    let results_path = output.join("batch_results.json");
    if let Err(e) = results.save(&results_path) {
        fatal("Failed to save results", &e);
    }

    // Print summary
    let summary = &results.summary;
    banner("BATCH COMPLETE");
    eprintln!("Bouts played: {}", results.bouts.len());
    if !results.errors.is_empty() {
        eprintln!("Bouts FAILED: {} ⚠️", results.errors.len());
    }
    eprintln!("Duration: {:.1}s", results.duration_seconds);
    #[allow(clippy::cast_precision_loss)]
    let throughput = results.bouts.len() as f64 / results.duration_seconds.max(0.001);
    eprintln!("Throughput: {throughput:.1} bouts/sec");
    eprintln!("\nWin Rates:");
    for (name, rate) in &summary.win_rates {
        eprintln!("  {}: {:.1}%", name, rate * 100.0);
    }
    eprintln!("  Draws: {}", summary.draws);
    eprintln!(
        "\nStoppages: {} ({:.1}%), decisions: {}",
        summary.tko_count,
        summary.tko_rate * 100.0,
        summary.decision_count
    );
    eprintln!(
        "Rounds: avg {:.2}, min {}, max {}",
        summary.avg_rounds, summary.min_rounds, summary.max_rounds
    );

    // Report errors if any
    if !results.errors.is_empty() {
        eprintln!("\n⚠️  BOUT FAILURES:");
        for error in results.errors.iter().take(10) {
            eprintln!(
                "  Bout {} (seed {}): {}",
                error.bout_index, error.seed, error.message
            );
        }
        if results.errors.len() > 10 {
            eprintln!("  ... and {} more failures", results.errors.len() - 10);
        }
    }

    eprintln!("\nResults saved to: {}", results_path.display());

    if let Some(name) = summary.dominant_fighter(0.1) {
        eprintln!("\nBalance: {name} wins well over half of the bouts");
    }
}

/// Verify determinism
fn cmd_verify(registry: &mut ProfileRegistry, matchup: &MatchupArgs, seed: u64, runs: u32) {
    let (fighter_a, fighter_b, rules) = resolve_matchup(registry, matchup);
    tracing::info!("Verifying determinism: seed={}, runs={}", seed, runs);

    let check = verify_determinism(&fighter_a, &fighter_b, &rules, seed, runs)
        .unwrap_or_else(|e| fatal("Verification could not run", &e));

    for (i, (hash, events)) in check.hashes.iter().zip(&check.event_counts).enumerate() {
        eprintln!("  Run {}: {:016x} ({} events)", i + 1, hash, events);
    }

    if check.is_deterministic() {
        eprintln!("✓ Determinism verified: {runs} runs produced identical results");
    } else {
        eprintln!("✗ Determinism FAILED: runs produced different results");
        std::process::exit(1);
    }
}

/// Record, verify or play back a replay
fn cmd_replay(registry: &mut ProfileRegistry, action: ReplayAction) {
    match action {
        ReplayAction::Record {
            matchup,
            seed,
            file,
        } => {
            let (fighter_a, fighter_b, rules) = resolve_matchup(registry, &matchup);
            let (replay, record) = Replay::record(fighter_a, fighter_b, rules, seed)
                .unwrap_or_else(|e| fatal("Cannot record replay", &e));
            if let Err(e) = replay.save(&file) {
                fatal("Failed to save replay", &e);
            }
            eprintln!("Recorded {} events to {}", record.events.len(), file.display());
            eprintln!("Result: {} by {}", record.result.winner_name, replay.method);
            eprintln!("Hash: {:016x}", replay.final_hash);
        }
        ReplayAction::Verify { file } => {
            let replay = load_replay(&file);
            eprintln!(
                "Replay: {} vs {}, seed {}, {} events",
                replay.fighter_a.name, replay.fighter_b.name, replay.seed, replay.event_count
            );
            match replay.verify() {
                Ok(record) => {
                    eprintln!("✓ Replay verified: hash {:016x}", record.hash());
                }
                Err(e) => {
                    eprintln!("✗ Replay verification FAILED: {e}");
                    std::process::exit(1);
                }
            }
        }
        ReplayAction::Play { file } => {
            let replay = load_replay(&file);
            let bout = replay
                .bout()
                .unwrap_or_else(|e| fatal("Cannot rebuild bout", &e));
            let runner = BoutRunner::with_config(RunnerConfig {
                pacing: Pacing::Instant,
                format: OutputFormat::Json,
                use_color: false,
            });
            let summary = runner
                .run(bout, &mut std::io::stdout().lock())
                .unwrap_or_else(|e| fatal("Replay stream failed", &e));
            if summary.event_hash != replay.final_hash {
                eprintln!("⚠️  Played events do not match the recorded hash");
                std::process::exit(1);
            }
        }
    }
}

fn load_replay(file: &Path) -> Replay {
    tracing::info!("Loading replay from: {}", file.display());
    Replay::load(file).unwrap_or_else(|e| fatal("Failed to load replay", &e))
}

/// Print derived stats
fn cmd_stats(registry: &mut ProfileRegistry, fighters: &[String]) {
    let profiles: Vec<FighterProfile> = if fighters.is_empty() {
        registry.profiles().cloned().collect()
    } else {
        fighters
            .iter()
            .map(|f| {
                registry
                    .resolve(f)
                    .unwrap_or_else(|e| fatal("Cannot load fighter", &e))
            })
            .collect()
    };

    for profile in &profiles {
        let stats = derive_stats(&profile.physical, &profile.training);
        println!("{} ({})", profile.name, profile.id);
        for (label, value) in [
            ("power", stats.power),
            ("speed", stats.speed),
            ("cardio", stats.cardio),
            ("chin", stats.chin),
            ("technique", stats.technique),
            ("clinch", stats.clinch),
            ("defense", stats.defense),
            ("fight_iq", stats.fight_iq),
        ] {
            println!("  {label:<10} {value:>5.1}");
        }
    }
}

/// Run benchmark
fn cmd_benchmark(registry: &mut ProfileRegistry, matchup: &MatchupArgs, count: u32) {
    let (fighter_a, fighter_b, rules) = resolve_matchup(registry, matchup);
    tracing::info!("Running benchmark: {} bouts", count);

    let start = Instant::now();
    let mut events = 0usize;
    for seed in 0..u64::from(count) {
        let (replay, _) = Replay::record(fighter_a.clone(), fighter_b.clone(), rules.clone(), seed)
            .unwrap_or_else(|e| fatal("Bout failed", &e));
        events += replay.event_count;
    }
    let elapsed = start.elapsed();
    let secs = elapsed.as_secs_f64().max(0.001);

    banner("BENCHMARK COMPLETE");
    eprintln!("Bouts: {count}");
    eprintln!("Time: {:.3}s", elapsed.as_secs_f64());
    eprintln!("Bouts/sec: {:.1}", f64::from(count) / secs);
    #[allow(clippy::cast_precision_loss)]
    let events_per_sec = events as f64 / secs;
    eprintln!("Events/sec: {events_per_sec:.0}");
}
