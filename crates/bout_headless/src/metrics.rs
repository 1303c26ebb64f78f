//! Bout metrics collection for balance analysis.
//!
//! A [`MetricsCollector`] watches the event stream of one bout and produces
//! [`BoutMetrics`]; [`BatchSummary`] aggregates many of those.

use std::collections::BTreeMap;

use bout_core::bout::MatchResult;
use bout_core::events::{EventKind, FightEvent, MoveType, StrikeOutcome};
use bout_core::state::Side;
use serde::{Deserialize, Serialize};

/// Complete metrics for a single bout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoutMetrics {
    /// Unique bout identifier.
    pub bout_id: String,
    /// Random seed used.
    pub seed: u64,
    /// Per-corner metrics, A then B.
    pub corners: [CornerMetrics; 2],
    /// Winning corner (None = draw).
    pub winner: Option<Side>,
    /// Winner's name, or "Draw".
    pub winner_name: String,
    /// Method string, e.g. "TKO Round 3".
    pub method: String,
    /// Whether the bout was stopped.
    pub stoppage: bool,
    /// Rounds completed.
    pub rounds: u32,
    /// Number of events emitted.
    pub event_count: usize,
    /// Event log hash (for determinism validation).
    pub event_hash: u64,
}

impl BoutMetrics {
    /// Create a new bout metrics instance.
    #[must_use]
    pub fn new(bout_id: impl Into<String>, seed: u64) -> Self {
        Self {
            bout_id: bout_id.into(),
            seed,
            ..Default::default()
        }
    }

    /// Metrics for one corner.
    #[must_use]
    pub fn corner(&self, side: Side) -> &CornerMetrics {
        &self.corners[side.index()]
    }

    /// Mutable metrics for one corner.
    pub fn corner_mut(&mut self, side: Side) -> &mut CornerMetrics {
        &mut self.corners[side.index()]
    }

    /// Finalize the bout with its result.
    pub fn finalize(&mut self, result: &MatchResult) {
        self.winner = result.winner;
        self.winner_name = result.winner_name.clone();
        self.method = result.method.to_string();
        self.stoppage = result.is_stoppage();
        #[allow(clippy::cast_possible_truncation)]
        {
            self.rounds = result.rounds.len() as u32;
        }
        let knockdowns = result.knockdowns();
        for side in Side::BOTH {
            let corner = self.corner_mut(side);
            corner.final_health = result.final_health[side.index()];
            corner.total_score = result.total_scores[side.index()];
            corner.knockdowns_suffered = knockdowns[side.index()];
        }
    }
}

/// Metrics for one corner in a bout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CornerMetrics {
    /// Fighter name.
    pub name: String,
    /// Strikes thrown, landed or not.
    pub strikes_thrown: u32,
    /// Strikes and clinch knees that did damage.
    pub strikes_landed: u32,
    /// Clean power shots landed.
    pub power_shots_landed: u32,
    /// Strikes blocked by the opponent.
    pub strikes_blocked: u32,
    /// Damage dealt by strikes and clinch knees.
    pub damage_dealt: f64,
    /// Times this fighter tied the opponent up.
    pub clinch_entries: u32,
    /// Knockdowns suffered.
    pub knockdowns_suffered: u32,
    /// Health at the end.
    pub final_health: f64,
    /// Total score (0 on a stoppage).
    pub total_score: u32,
}

impl CornerMetrics {
    /// Create metrics for a named fighter.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Fraction of thrown strikes that landed.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.strikes_thrown == 0 {
            0.0
        } else {
            f64::from(self.strikes_landed) / f64::from(self.strikes_thrown)
        }
    }
}

/// Aggregated statistics across many bouts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of bouts.
    pub total_bouts: u32,
    /// Wins by fighter name.
    pub wins_by_fighter: BTreeMap<String, u32>,
    /// Win rates by fighter name (0.0-1.0).
    pub win_rates: BTreeMap<String, f64>,
    /// Wins by corner, A then B.
    pub corner_wins: [u32; 2],
    /// Drawn bouts.
    pub draws: u32,
    /// Bouts stopped by TKO.
    pub tko_count: u32,
    /// Bouts won on points.
    pub decision_count: u32,
    /// Fraction of bouts stopped.
    pub tko_rate: f64,
    /// Average rounds completed.
    pub avg_rounds: f64,
    /// Shortest bout in rounds.
    pub min_rounds: u32,
    /// Longest bout in rounds.
    pub max_rounds: u32,
    /// Average knockdowns suffered per bout by fighter name.
    pub avg_knockdowns: BTreeMap<String, f64>,
    /// Average strike accuracy by fighter name.
    pub avg_accuracy: BTreeMap<String, f64>,
}

impl BatchSummary {
    /// Calculate summary from a list of bout metrics.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_bouts(bouts: &[BoutMetrics]) -> Self {
        if bouts.is_empty() {
            return Self::default();
        }

        let mut summary = Self {
            total_bouts: bouts.len() as u32,
            min_rounds: u32::MAX,
            ..Default::default()
        };

        let mut rounds_sum = 0u32;
        let mut knockdowns: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        let mut accuracy: BTreeMap<String, Vec<f64>> = BTreeMap::new();

        for bout in bouts {
            rounds_sum += bout.rounds;
            summary.min_rounds = summary.min_rounds.min(bout.rounds);
            summary.max_rounds = summary.max_rounds.max(bout.rounds);

            match bout.winner {
                Some(side) => {
                    summary.corner_wins[side.index()] += 1;
                    *summary
                        .wins_by_fighter
                        .entry(bout.corner(side).name.clone())
                        .or_default() += 1;
                    if bout.stoppage {
                        summary.tko_count += 1;
                    } else {
                        summary.decision_count += 1;
                    }
                }
                None => summary.draws += 1,
            }

            for corner in &bout.corners {
                knockdowns
                    .entry(corner.name.clone())
                    .or_default()
                    .push(corner.knockdowns_suffered);
                accuracy
                    .entry(corner.name.clone())
                    .or_default()
                    .push(corner.accuracy());
            }
        }

        let total = f64::from(summary.total_bouts);
        summary.avg_rounds = f64::from(rounds_sum) / total;
        summary.tko_rate = f64::from(summary.tko_count) / total;

        // Every fighter that appeared gets a rate, winless or not.
        for name in knockdowns.keys() {
            let wins = summary.wins_by_fighter.get(name).copied().unwrap_or(0);
            summary
                .win_rates
                .insert(name.clone(), f64::from(wins) / total);
        }

        for (name, values) in knockdowns {
            let avg = values.iter().sum::<u32>() as f64 / values.len() as f64;
            summary.avg_knockdowns.insert(name, avg);
        }

        for (name, values) in accuracy {
            let avg = values.iter().sum::<f64>() / values.len() as f64;
            summary.avg_accuracy.insert(name, avg);
        }

        summary
    }

    /// Win rate of a corner (0.0-1.0).
    #[must_use]
    pub fn corner_win_rate(&self, side: Side) -> f64 {
        if self.total_bouts == 0 {
            return 0.0;
        }
        f64::from(self.corner_wins[side.index()]) / f64::from(self.total_bouts)
    }

    /// Check if the corners are within `threshold` of an even split.
    ///
    /// Draws count as half a win for each corner.
    #[must_use]
    pub fn is_balanced(&self, threshold: f64) -> bool {
        if self.total_bouts == 0 {
            return true;
        }
        let half_draws = f64::from(self.draws) / (2.0 * f64::from(self.total_bouts));
        Side::BOTH
            .iter()
            .all(|&side| (self.corner_win_rate(side) + half_draws - 0.5).abs() <= threshold)
    }

    /// Get the dominant fighter (if any).
    #[must_use]
    pub fn dominant_fighter(&self, threshold: f64) -> Option<&String> {
        self.win_rates
            .iter()
            .find(|(_, rate)| **rate > 0.5 + threshold)
            .map(|(name, _)| name)
    }
}

/// Builds [`BoutMetrics`] from the event stream of one bout.
#[derive(Debug)]
pub struct MetricsCollector {
    metrics: BoutMetrics,
}

impl MetricsCollector {
    /// Create a new metrics collector.
    #[must_use]
    pub fn new(bout_id: &str, seed: u64) -> Self {
        Self {
            metrics: BoutMetrics::new(bout_id, seed),
        }
    }

    /// Record one event.
    pub fn on_event(&mut self, event: &FightEvent) {
        self.metrics.event_count += 1;
        if let Some(side) = event.kind.landed_by() {
            self.metrics.corner_mut(side).strikes_landed += 1;
        }
        match &event.kind {
            EventKind::MatchStart {
                fighter_a_name,
                fighter_b_name,
            } => {
                self.metrics.corners = [
                    CornerMetrics::new(fighter_a_name.as_str()),
                    CornerMetrics::new(fighter_b_name.as_str()),
                ];
            }
            EventKind::Strike {
                attacker,
                outcome,
                damage,
                is_power_shot,
                ..
            } => {
                let corner = self.metrics.corner_mut(*attacker);
                corner.strikes_thrown += 1;
                if outcome.landed() {
                    corner.damage_dealt += damage;
                } else if *outcome == StrikeOutcome::Blocked {
                    corner.strikes_blocked += 1;
                }
                if *is_power_shot && *outcome == StrikeOutcome::LandedClean {
                    corner.power_shots_landed += 1;
                }
            }
            EventKind::Clinch {
                initiator,
                move_type,
                damage,
                ..
            } => {
                let corner = self.metrics.corner_mut(*initiator);
                if *move_type == MoveType::ClinchEntry {
                    corner.clinch_entries += 1;
                } else {
                    corner.strikes_thrown += 1;
                }
                corner.damage_dealt += damage;
            }
            _ => {}
        }
    }

    /// Finalize and return the metrics.
    #[must_use]
    pub fn finalize(mut self, result: &MatchResult, event_hash: u64) -> BoutMetrics {
        self.metrics.finalize(result);
        self.metrics.event_hash = event_hash;
        self.metrics
    }

    /// Metrics collected so far.
    #[must_use]
    pub fn current(&self) -> &BoutMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bout_core::events::TargetZone;
    use bout_test_utils::fixtures::demo_bout;

    fn bout(winner: Option<Side>, stoppage: bool, rounds: u32) -> BoutMetrics {
        let mut metrics = BoutMetrics::new("test", 0);
        metrics.corners = [CornerMetrics::new("Red"), CornerMetrics::new("Blue")];
        metrics.winner = winner;
        metrics.stoppage = stoppage;
        metrics.rounds = rounds;
        metrics
    }

    fn strike(attacker: Side, outcome: StrikeOutcome, is_power_shot: bool) -> FightEvent {
        FightEvent::new(
            1.0,
            1,
            EventKind::Strike {
                attacker,
                defender: attacker.opponent(),
                move_type: MoveType::Cross,
                target_zone: TargetZone::Head,
                outcome,
                damage: if outcome.landed() { 4.0 } else { 0.0 },
                is_power_shot,
            },
        )
    }

    #[test]
    fn test_collector_counts_strikes() {
        let mut collector = MetricsCollector::new("bout_0", 7);
        collector.on_event(&FightEvent::new(
            0.0,
            0,
            EventKind::MatchStart {
                fighter_a_name: "Red".to_string(),
                fighter_b_name: "Blue".to_string(),
            },
        ));
        collector.on_event(&strike(Side::A, StrikeOutcome::LandedClean, true));
        collector.on_event(&strike(Side::A, StrikeOutcome::Blocked, false));
        collector.on_event(&strike(Side::B, StrikeOutcome::Missed, false));

        let metrics = collector.current();
        assert_eq!(metrics.event_count, 4);
        let red = metrics.corner(Side::A);
        assert_eq!(red.name, "Red");
        assert_eq!(red.strikes_thrown, 2);
        assert_eq!(red.strikes_landed, 1);
        assert_eq!(red.power_shots_landed, 1);
        assert_eq!(red.strikes_blocked, 1);
        assert!((red.damage_dealt - 4.0).abs() < f64::EPSILON);
        assert!((red.accuracy() - 0.5).abs() < f64::EPSILON);
        assert_eq!(metrics.corner(Side::B).strikes_landed, 0);
    }

    #[test]
    fn test_collector_matches_result() {
        let record = demo_bout(13).run().unwrap();
        let mut collector = MetricsCollector::new("bout_13", 13);
        for event in &record.events {
            collector.on_event(event);
        }
        let metrics = collector.finalize(&record.result, record.hash());

        assert_eq!(metrics.event_count, record.events.len());
        assert_eq!(metrics.method, record.result.method.to_string());
        assert_eq!(metrics.rounds as usize, record.result.rounds.len());
        let landed = record.result.strikes_landed();
        assert_eq!(metrics.corner(Side::A).strikes_landed, landed[0]);
        assert_eq!(metrics.corner(Side::B).strikes_landed, landed[1]);
    }

    #[test]
    fn test_batch_summary() {
        let bouts = vec![
            bout(Some(Side::A), true, 2),
            bout(Some(Side::A), false, 5),
            bout(Some(Side::B), false, 5),
            bout(None, false, 5),
        ];
        let summary = BatchSummary::from_bouts(&bouts);

        assert_eq!(summary.total_bouts, 4);
        assert_eq!(summary.corner_wins, [2, 1]);
        assert_eq!(summary.draws, 1);
        assert_eq!(summary.tko_count, 1);
        assert_eq!(summary.decision_count, 2);
        assert!((summary.tko_rate - 0.25).abs() < f64::EPSILON);
        assert!((summary.avg_rounds - 4.25).abs() < f64::EPSILON);
        assert_eq!((summary.min_rounds, summary.max_rounds), (2, 5));
        assert!((summary.win_rates["Red"] - 0.5).abs() < f64::EPSILON);
        assert!((summary.win_rates["Blue"] - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_balance_check() {
        let even = vec![bout(Some(Side::A), false, 5), bout(Some(Side::B), false, 5)];
        let summary = BatchSummary::from_bouts(&even);
        assert!(summary.is_balanced(0.1));
        assert!(summary.dominant_fighter(0.1).is_none());

        let lopsided = vec![bout(Some(Side::A), false, 5); 4];
        let summary = BatchSummary::from_bouts(&lopsided);
        assert!(!summary.is_balanced(0.1));
        assert_eq!(summary.dominant_fighter(0.1).map(String::as_str), Some("Red"));
        assert!((summary.win_rates["Blue"]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_batch() {
        let summary = BatchSummary::from_bouts(&[]);
        assert_eq!(summary.total_bouts, 0);
        assert!(summary.is_balanced(0.0));
    }
}
