//! Headless bout runner for streaming, balance testing and CI verification.
//!
//! This crate drives `bout_core` simulations without any graphics:
//!
//! - **Streaming**: play one bout as JSON lines (or narrated text) with
//!   wall-clock pacing, for a renderer or spectator on the other end
//! - **Balance testing**: run thousands of seeded bouts of a matchup in
//!   parallel and summarize win rates and stoppage rates
//! - **Replay verification**: check that a seed reproduces the same event log
//!
//! # Protocol
//!
//! Output uses JSON lines (one JSON object per event):
//!
//! - **stdout**: Events in emission order
//! - **stderr**: Logs and summaries (human-readable)
//!
//! See [`protocol`] module for the full event format.
//!
//! # Example
//!
//! ```bash
//! # Stream the demo bout at watching speed
//! cargo run -p bout_headless -- run --pace normal
//!
//! # Narrated output, no delays
//! cargo run -p bout_headless -- run --format text --pace instant --seed 7
//!
//! # Balance run
//! cargo run -p bout_headless -- batch --count 1000 --output results/
//!
//! # Verify determinism
//! cargo run -p bout_headless -- verify --seed 12345 --runs 5
//! ```

pub mod batch;
pub mod metrics;
pub mod profile_loader;
pub mod protocol;
pub mod runner;
pub mod text_renderer;

pub use batch::{run_batch, verify_determinism, BatchConfig, BatchResults, DeterminismCheck};
pub use metrics::{BatchSummary, BoutMetrics, MetricsCollector};
pub use profile_loader::{load_registry, load_rules, ProfileLoadError, ProfileRegistry};
pub use protocol::{event_to_json_line, WireEvent};
pub use runner::{BoutRunner, OutputFormat, Pacing, RunSummary, RunnerConfig};
pub use text_renderer::{TextConfig, TextRenderer};
