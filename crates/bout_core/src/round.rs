//! Round scoring and per-round bookkeeping.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::FightEvent;
use crate::exchange::ExchangeReport;
use crate::state::Side;

/// A winning margin above this ratio counts as a decisive round.
pub const DECISIVE_MARGIN: f64 = 1.3;

/// How clearly a round was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundVerdict {
    /// Winner dealt more than 30% more damage.
    Decisive,
    /// Winner dealt more damage, by 30% or less.
    Narrow,
    /// Equal damage.
    Even,
}

/// Ten-point-must score for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundScore {
    /// Fighter A's points.
    pub score_a: u32,
    /// Fighter B's points.
    pub score_b: u32,
    /// Round winner; `None` on an even round.
    pub winner: Option<Side>,
    /// Margin classification.
    pub verdict: RoundVerdict,
}

/// Score a round from the damage each side dealt in it.
///
/// More damage wins the round 10-9, whether the margin is decisive or
/// narrow; equal damage is 10-10.
#[must_use]
pub fn score_round(dealt_a: f64, dealt_b: f64) -> RoundScore {
    let (winner, high, low) = if dealt_a > dealt_b {
        (Some(Side::A), dealt_a, dealt_b)
    } else if dealt_b > dealt_a {
        (Some(Side::B), dealt_b, dealt_a)
    } else {
        (None, dealt_a, dealt_b)
    };

    let verdict = match winner {
        None => RoundVerdict::Even,
        Some(_) if high > low * DECISIVE_MARGIN => RoundVerdict::Decisive,
        Some(_) => RoundVerdict::Narrow,
    };

    let (score_a, score_b) = match winner {
        Some(Side::A) => (10, 9),
        Some(Side::B) => (9, 10),
        None => (10, 10),
    };

    RoundScore {
        score_a,
        score_b,
        winner,
        verdict,
    }
}

/// Running totals for the round in progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundTally {
    /// Damage dealt by each side.
    pub damage_dealt: [f64; 2],
    /// Stamina spent by each side.
    pub stamina_used: [f64; 2],
    /// Strikes landed by each side, clinch knees included.
    pub strikes_landed: [u32; 2],
    /// Knockdowns suffered by each side.
    pub knockdowns: [u32; 2],
}

impl RoundTally {
    /// Fold one exchange into the totals.
    pub fn record(&mut self, report: &ExchangeReport) {
        for side in Side::BOTH {
            let i = side.index();
            self.damage_dealt[i] += report.damage_dealt[i];
            self.stamina_used[i] += report.stamina_spent[i];
        }
        for event in &report.events {
            if let Some(attacker) = event.landed_by() {
                self.strikes_landed[attacker.index()] += 1;
            }
        }
    }
}

/// Immutable summary of a completed round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Round number, starting at 1.
    pub round_num: u32,
    /// Fighter A's points.
    pub score_a: u32,
    /// Fighter B's points.
    pub score_b: u32,
    /// Damage dealt by each side in this round.
    pub damage_dealt: [f64; 2],
    /// Stamina spent by each side in this round.
    pub stamina_used: [f64; 2],
    /// Strikes landed by each side.
    pub strikes_landed: [u32; 2],
    /// Knockdowns suffered by each side.
    pub knockdowns: [u32; 2],
    /// Every event emitted during the round, `RoundStart` through `RoundEnd`.
    pub events: Vec<FightEvent>,
    /// Round winner; `None` on an even round.
    pub winner: Option<Side>,
    /// Margin classification.
    pub verdict: RoundVerdict,
}

impl RoundResult {
    /// Score a finished round.
    #[must_use]
    pub fn from_tally(round_num: u32, tally: &RoundTally, events: Vec<FightEvent>) -> Self {
        let score = score_round(tally.damage_dealt[0], tally.damage_dealt[1]);
        debug!(
            round = round_num,
            dealt_a = tally.damage_dealt[0],
            dealt_b = tally.damage_dealt[1],
            score_a = score.score_a,
            score_b = score.score_b,
            verdict = ?score.verdict,
            "Round scored"
        );
        Self {
            round_num,
            score_a: score.score_a,
            score_b: score.score_b,
            damage_dealt: tally.damage_dealt,
            stamina_used: tally.stamina_used,
            strikes_landed: tally.strikes_landed,
            knockdowns: tally.knockdowns,
            events,
            winner: score.winner,
            verdict: score.verdict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_damage_is_even() {
        let score = score_round(10.0, 10.0);
        assert_eq!((score.score_a, score.score_b), (10, 10));
        assert_eq!(score.winner, None);
        assert_eq!(score.verdict, RoundVerdict::Even);
    }

    #[test]
    fn test_decisive_win_for_b() {
        let score = score_round(5.0, 7.0);
        assert_eq!((score.score_a, score.score_b), (9, 10));
        assert_eq!(score.winner, Some(Side::B));
        assert_eq!(score.verdict, RoundVerdict::Decisive);
    }

    #[test]
    fn test_narrow_win_scores_the_same() {
        let score = score_round(10.0, 12.0);
        assert_eq!((score.score_a, score.score_b), (9, 10));
        assert_eq!(score.verdict, RoundVerdict::Narrow);

        let score = score_round(12.0, 10.0);
        assert_eq!((score.score_a, score.score_b), (10, 9));
        assert_eq!(score.winner, Some(Side::A));
    }

    #[test]
    fn test_shutout_round_is_decisive() {
        let score = score_round(3.0, 0.0);
        assert_eq!(score.verdict, RoundVerdict::Decisive);
        assert_eq!(score.winner, Some(Side::A));
    }

    #[test]
    fn test_tally_accumulates() {
        let mut tally = RoundTally::default();
        let report = ExchangeReport {
            archetype: crate::exchange::Archetype::Defensive,
            events: Vec::new(),
            damage_dealt: [1.5, 0.0],
            stamina_spent: [0.5, 0.0],
        };
        tally.record(&report);
        tally.record(&report);
        assert_eq!(tally.damage_dealt, [3.0, 0.0]);
        assert_eq!(tally.stamina_used, [1.0, 0.0]);
        let result = RoundResult::from_tally(2, &tally, Vec::new());
        assert_eq!(result.round_num, 2);
        assert_eq!((result.score_a, result.score_b), (10, 9));
    }
}
