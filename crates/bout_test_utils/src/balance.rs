//! Balance testing utilities for headless simulation.
//!
//! Runs many seeded bouts of one matchup and summarizes who wins and how,
//! so attribute or rule changes can be checked against expected win rates.

use bout_core::bout::MatchResult;
use bout_core::config::BoutConfig;
use bout_core::profile::FighterProfile;
use bout_core::state::Side;
use serde::{Deserialize, Serialize};

use crate::fixtures::bout_with;

/// Outcome of one simulated bout, reduced to what balance checks need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoutOutcome {
    /// The winning side (None on a draw).
    pub winner: Option<Side>,
    /// Whether the bout was stopped before the final bell.
    pub stoppage: bool,
    /// Rounds actually fought.
    pub rounds: u32,
    /// Final health for A and B.
    pub final_health: [f64; 2],
}

impl From<&MatchResult> for BoutOutcome {
    fn from(result: &MatchResult) -> Self {
        Self {
            winner: result.winner,
            stoppage: result.is_stoppage(),
            rounds: u32::try_from(result.rounds.len()).unwrap_or(u32::MAX),
            final_health: result.final_health,
        }
    }
}

/// Statistics for a set of bouts of the same matchup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchupStats {
    /// Total bouts run.
    pub total_bouts: u32,
    /// Wins for fighter A.
    pub wins_a: u32,
    /// Wins for fighter B.
    pub wins_b: u32,
    /// Draws.
    pub draws: u32,
    /// Bouts ending in a stoppage.
    pub stoppages: u32,
    /// Average rounds fought.
    pub avg_rounds: f64,
}

impl MatchupStats {
    /// Fold one outcome into the running totals.
    pub fn record(&mut self, outcome: &BoutOutcome) {
        let previous = f64::from(self.total_bouts);
        self.total_bouts += 1;
        match outcome.winner {
            Some(Side::A) => self.wins_a += 1,
            Some(Side::B) => self.wins_b += 1,
            None => self.draws += 1,
        }
        if outcome.stoppage {
            self.stoppages += 1;
        }
        self.avg_rounds =
            (self.avg_rounds * previous + f64::from(outcome.rounds)) / f64::from(self.total_bouts);
    }

    /// Win rate for fighter A (0.0 to 1.0).
    #[must_use]
    pub fn win_rate_a(&self) -> f64 {
        self.rate(self.wins_a)
    }

    /// Win rate for fighter B (0.0 to 1.0).
    #[must_use]
    pub fn win_rate_b(&self) -> f64 {
        self.rate(self.wins_b)
    }

    /// Share of bouts stopped early.
    #[must_use]
    pub fn stoppage_rate(&self) -> f64 {
        if self.total_bouts == 0 {
            return 0.0;
        }
        f64::from(self.stoppages) / f64::from(self.total_bouts)
    }

    /// Check if A's win rate falls inside `[min_rate, max_rate]`.
    #[must_use]
    pub fn is_balanced(&self, min_rate: f64, max_rate: f64) -> bool {
        let rate = self.win_rate_a();
        rate >= min_rate && rate <= max_rate
    }

    fn rate(&self, wins: u32) -> f64 {
        if self.total_bouts == 0 {
            return 0.5;
        }
        f64::from(wins) / f64::from(self.total_bouts)
    }
}

impl<'a> FromIterator<&'a MatchResult> for MatchupStats {
    fn from_iter<I: IntoIterator<Item = &'a MatchResult>>(iter: I) -> Self {
        let mut stats = Self::default();
        for result in iter {
            stats.record(&BoutOutcome::from(result));
        }
        stats
    }
}

/// Run `count` bouts of a matchup with seeds `base_seed..base_seed + count`.
///
/// # Panics
///
/// Panics if a profile or the config is invalid.
#[must_use]
pub fn run_matchup(
    a: &FighterProfile,
    b: &FighterProfile,
    config: &BoutConfig,
    base_seed: u64,
    count: u32,
) -> MatchupStats {
    let mut stats = MatchupStats::default();
    for offset in 0..u64::from(count) {
        let record = bout_with(a.clone(), b.clone(), config.clone(), base_seed + offset)
            .run()
            .expect("bout must finish");
        stats.record(&BoutOutcome::from(&record.result));
    }
    tracing::debug!(
        fighter_a = %a.name,
        fighter_b = %b.name,
        win_rate_a = stats.win_rate_a(),
        stoppage_rate = stats.stoppage_rate(),
        "Matchup complete"
    );
    stats
}
