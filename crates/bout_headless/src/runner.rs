//! Streaming bout runner.
//!
//! Pulls events from a [`Bout`] one at a time and writes them to an output
//! as JSON lines or rendered text, sleeping between events according to the
//! selected [`Pacing`]. This is the only place in the workspace that sleeps.

use std::io::{self, Write};
use std::time::Duration;

use bout_core::bout::{Bout, MatchResult};
use bout_core::error::BoutError;
use bout_core::events::{event_log_hash, EventKind, FightEvent};
use bout_core::render::FightRenderer;
use clap::ValueEnum;
use rand::Rng;
use thiserror::Error;

use crate::protocol::event_to_json_line;
use crate::text_renderer::{TextConfig, TextRenderer};

/// Wall-clock pacing preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Pacing {
    /// No delays at all.
    Instant,
    /// Quick playback.
    #[default]
    Fast,
    /// Comfortable watching speed.
    Normal,
    /// Roughly broadcast speed.
    Realtime,
}

impl Pacing {
    /// Delay table for this preset.
    #[must_use]
    pub fn timing(self) -> Timing {
        let secs = Duration::from_secs_f64;
        match self {
            Pacing::Instant => Timing {
                exchange_delay: Duration::ZERO,
                post_event_delay: Duration::ZERO,
                round_break: Duration::ZERO,
                fixed_pauses: false,
            },
            Pacing::Fast => Timing {
                exchange_delay: secs(0.3),
                post_event_delay: secs(0.05),
                round_break: secs(2.0),
                fixed_pauses: true,
            },
            Pacing::Normal => Timing {
                exchange_delay: secs(1.0),
                post_event_delay: secs(0.1),
                round_break: secs(5.0),
                fixed_pauses: true,
            },
            Pacing::Realtime => Timing {
                exchange_delay: secs(12.0),
                post_event_delay: secs(0.2),
                round_break: secs(60.0),
                fixed_pauses: true,
            },
        }
    }
}

/// Delays applied after each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// After each state update (one per exchange).
    pub exchange_delay: Duration,
    /// After strikes and clinch actions.
    pub post_event_delay: Duration,
    /// During the rest period.
    pub round_break: Duration,
    /// Whether the fixed dramatic pauses (round start, knockdown, ...) apply.
    pub fixed_pauses: bool,
}

impl Timing {
    /// How long to wait after emitting `kind`.
    #[must_use]
    pub fn delay_after(&self, kind: &EventKind) -> Duration {
        let fixed = |seconds: f64| {
            if self.fixed_pauses {
                Duration::from_secs_f64(seconds)
            } else {
                Duration::ZERO
            }
        };
        match kind {
            EventKind::RoundStart => fixed(0.5),
            EventKind::StateUpdate { .. } => self.exchange_delay,
            EventKind::Strike { .. } | EventKind::Clinch { .. } => self.post_event_delay,
            EventKind::Knockdown { .. } => fixed(1.0),
            EventKind::Recovery { .. } => fixed(0.5),
            EventKind::RoundEnd { .. } => fixed(1.0),
            EventKind::BreakStart { .. } => self.round_break,
            EventKind::MatchStart { .. } | EventKind::ClinchExit { .. } | EventKind::MatchEnd { .. } => {
                Duration::ZERO
            }
        }
    }
}

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable narration through [`TextRenderer`].
    Text,
}

/// Runner configuration.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Wall-clock pacing.
    pub pacing: Pacing,
    /// Output encoding.
    pub format: OutputFormat,
    /// ANSI colors in text mode.
    pub use_color: bool,
}

/// Errors while streaming a bout.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Writing to the output failed.
    #[error("output error: {0}")]
    Io(#[from] io::Error),
    /// The bout itself failed.
    #[error(transparent)]
    Bout(#[from] BoutError),
}

/// What a streamed bout produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Events written.
    pub event_count: usize,
    /// Hash of the event log.
    pub event_hash: u64,
    /// Wall-clock time spent in pacing delays.
    pub paced: Duration,
    /// Final result.
    pub result: MatchResult,
}

/// Streams a bout to a writer.
pub struct BoutRunner {
    config: RunnerConfig,
}

impl BoutRunner {
    /// Create a runner with default config.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RunnerConfig::default(),
        }
    }

    /// Create a runner with custom configuration.
    #[must_use]
    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Drive `bout` to completion, writing every event to `out`.
    ///
    /// Output is flushed after each event so a reader sees it immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or the bout never finishes.
    pub fn run<R: Rng, W: Write>(
        &self,
        mut bout: Bout<R>,
        out: &mut W,
    ) -> Result<RunSummary, RunnerError> {
        let timing = self.config.pacing.timing();
        let mut renderer = match self.config.format {
            OutputFormat::Json => None,
            OutputFormat::Text => {
                let [a, b] = bout.fighters();
                let mut renderer = TextRenderer::new();
                renderer.init(
                    a.name(),
                    b.name(),
                    &TextConfig {
                        use_color: self.config.use_color,
                        round_seconds: bout.config().pace.round_seconds(),
                        ..TextConfig::default()
                    },
                );
                Some(renderer)
            }
        };

        let mut events: Vec<FightEvent> = Vec::new();
        let mut paced = Duration::ZERO;
        while let Some(event) = bout.advance() {
            let delay = timing.delay_after(&event.kind);
            match renderer.as_mut() {
                Some(renderer) => {
                    renderer.handle_event(&event);
                    out.write_all(renderer.render(delay.as_secs_f64()).as_bytes())?;
                }
                None => out.write_all(event_to_json_line(&event).as_bytes())?,
            }
            out.flush()?;

            if !delay.is_zero() {
                std::thread::sleep(delay);
                paced += delay;
            }
            events.push(event);
        }

        if let Some(renderer) = renderer.as_mut() {
            renderer.destroy();
        }

        let result = bout
            .result()
            .cloned()
            .ok_or_else(|| BoutError::InvalidState("bout ended without a result".to_string()))?;
        let summary = RunSummary {
            event_count: events.len(),
            event_hash: event_log_hash(&events),
            paced,
            result,
        };
        tracing::info!(
            events = summary.event_count,
            hash = summary.event_hash,
            winner = %summary.result.winner_name,
            method = %summary.result.method,
            "Bout streamed"
        );
        Ok(summary)
    }
}

impl Default for BoutRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bout_core::events::{MoveType, StrikeOutcome, TargetZone};
    use bout_core::state::Side;
    use bout_test_utils::fixtures::demo_bout;

    fn instant(format: OutputFormat) -> BoutRunner {
        BoutRunner::with_config(RunnerConfig {
            pacing: Pacing::Instant,
            format,
            use_color: false,
        })
    }

    #[test]
    fn test_json_stream_is_one_object_per_line() {
        let mut out = Vec::new();
        let summary = instant(OutputFormat::Json)
            .run(demo_bout(5), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), summary.event_count);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event_type"], "MATCH_START");
        let last: serde_json::Value = serde_json::from_str(lines[lines.len() - 1]).unwrap();
        assert_eq!(last["event_type"], "MATCH_END");
        assert_eq!(last["method"], summary.result.method.to_string());
        assert_eq!(summary.paced, Duration::ZERO);
    }

    #[test]
    fn test_stream_matches_run() {
        let mut out = Vec::new();
        let summary = instant(OutputFormat::Json)
            .run(demo_bout(21), &mut out)
            .unwrap();
        let record = demo_bout(21).run().unwrap();
        assert_eq!(summary.event_hash, record.hash());
        assert_eq!(summary.result, record.result);
    }

    #[test]
    fn test_text_stream_narrates() {
        let mut out = Vec::new();
        let summary = instant(OutputFormat::Text)
            .run(demo_bout(3), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("=== ROUND 1 ==="));
        assert!(text.contains(&format!("WINNER: {}", summary.result.winner_name)));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_instant_has_no_delays() {
        let timing = Pacing::Instant.timing();
        assert_eq!(timing.delay_after(&EventKind::RoundStart), Duration::ZERO);
        assert_eq!(
            timing.delay_after(&EventKind::BreakStart { duration_seconds: 60 }),
            Duration::ZERO
        );
    }

    #[test]
    fn test_preset_delays() {
        let fast = Pacing::Fast.timing();
        let strike = EventKind::Strike {
            attacker: Side::A,
            defender: Side::B,
            move_type: MoveType::Jab,
            target_zone: TargetZone::Head,
            outcome: StrikeOutcome::Missed,
            damage: 0.0,
            is_power_shot: false,
        };
        assert_eq!(fast.delay_after(&strike), Duration::from_secs_f64(0.05));
        assert_eq!(
            fast.delay_after(&EventKind::Knockdown {
                fighter: Side::B,
                cause: MoveType::Cross
            }),
            Duration::from_secs(1)
        );
        assert_eq!(
            Pacing::Realtime
                .timing()
                .delay_after(&EventKind::BreakStart { duration_seconds: 60 }),
            Duration::from_secs(60)
        );
        assert_eq!(Pacing::Normal.timing().exchange_delay, Duration::from_secs(1));
    }
}
