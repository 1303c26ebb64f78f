//! Match and round state machines.
//!
//! [`Bout`] is an explicit state machine that produces the match one event
//! at a time. Each call to [`Bout::advance`] runs just enough simulation to
//! emit the next event and then stops, so a consumer can pace, inspect or
//! abandon the match between any two events. Nothing is held that needs
//! cleaning up; dropping a half-played bout is always fine.
//!
//! Sequence of a full match:
//!
//! ```text
//! MatchStart
//! StateUpdate x intro frames              (round 0, timestamp 0)
//! for each round:
//!     RoundStart
//!     for each exchange:
//!         Strike / Clinch / ClinchExit    (zero or more)
//!         StateUpdate
//!         Knockdown, Recovery             (on entering the knockdown band)
//!     RoundEnd
//!     MatchEnd (TKO)                      (if a fighter is below the finish line)
//!     BreakStart                          (unless it was the last round)
//! MatchEnd (Decision or Draw)
//! ```

use std::collections::VecDeque;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::choreography::IntroSequence;
use crate::config::BoutConfig;
use crate::error::{BoutError, Result};
use crate::events::{event_log_hash, EventKind, FightEvent, FighterSnapshot, MoveType};
use crate::exchange::ExchangeResolver;
use crate::math::Vec2;
use crate::profile::Fighter;
use crate::round::{RoundResult, RoundTally};
use crate::spatial::RingModel;
use crate::state::{CombatantState, Side};

/// Winner name used for drawn rounds and matches.
pub const DRAW: &str = "Draw";

/// How a match was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Stoppage after the given round.
    Tko {
        /// Round after which the fighter was below the finish line.
        round: u32,
    },
    /// Points win.
    Decision {
        /// Winner's total.
        winner_score: u32,
        /// Loser's total.
        loser_score: u32,
    },
    /// Equal totals.
    Draw {
        /// Each fighter's total.
        score: u32,
    },
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Tko { round } => write!(f, "TKO Round {round}"),
            Method::Decision {
                winner_score,
                loser_score,
            } => write!(f, "Decision ({winner_score}-{loser_score})"),
            Method::Draw { score } => write!(f, "Draw ({score}-{score})"),
        }
    }
}

/// Immutable summary of a finished match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Winning side; `None` for a draw.
    pub winner: Option<Side>,
    /// Winner's name, or [`DRAW`].
    pub winner_name: String,
    /// How it ended.
    pub method: Method,
    /// Every completed round in order.
    pub rounds: Vec<RoundResult>,
    /// Summed round scores, indexed by side; zero on a stoppage.
    pub total_scores: [u32; 2],
    /// Health at the final bell, indexed by side.
    pub final_health: [f64; 2],
}

impl MatchResult {
    /// Whether the match was stopped.
    #[must_use]
    pub fn is_stoppage(&self) -> bool {
        matches!(self.method, Method::Tko { .. })
    }

    /// Knockdowns suffered by each side across all rounds.
    #[must_use]
    pub fn knockdowns(&self) -> [u32; 2] {
        self.rounds.iter().fold([0, 0], |acc, r| {
            [acc[0] + r.knockdowns[0], acc[1] + r.knockdowns[1]]
        })
    }

    /// Strikes landed by each side across all rounds.
    #[must_use]
    pub fn strikes_landed(&self) -> [u32; 2] {
        self.rounds.iter().fold([0, 0], |acc, r| {
            [acc[0] + r.strikes_landed[0], acc[1] + r.strikes_landed[1]]
        })
    }
}

/// Full event log of a finished match together with its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightRecord {
    /// Every emitted event in order.
    pub events: Vec<FightEvent>,
    /// Final result.
    pub result: MatchResult,
}

impl FightRecord {
    /// Stable hash of the event log.
    #[must_use]
    pub fn hash(&self) -> u64 {
        event_log_hash(&self.events)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    MatchStart,
    Intro,
    RoundStart,
    Exchange,
    RoundEnd,
    Finished,
}

/// A single match between two fighters.
///
/// Generic over the random source so tests can inject scripted draws; the
/// default is a seeded [`ChaCha8Rng`].
///
/// # Example
///
/// ```
/// use bout_core::prelude::*;
///
/// let profile = |name: &str| FighterProfile {
///     id: name.to_lowercase(),
///     name: name.to_string(),
///     discipline: "Muay Thai".to_string(),
///     physical: PhysicalAttributes {
///         height_cm: 175.0,
///         weight_kg: 70.0,
///         age: 25,
///         muscle_mass_percent: 75.0,
///         fast_twitch_ratio: 60.0,
///     },
///     training: TrainingProfile {
///         striking_hours: 800,
///         clinch_hours: 500,
///         cardio_hours: 400,
///         sparring_hours: 600,
///     },
///     style: FightingStyle::default(),
///     durability: Durability::default(),
/// };
///
/// let a = Fighter::new(profile("Red")).unwrap();
/// let b = Fighter::new(profile("Blue")).unwrap();
/// let mut bout = Bout::seeded(a, b, BoutConfig::default(), 42).unwrap();
///
/// let first = bout.advance().unwrap();
/// assert_eq!(first.kind.name(), "MATCH_START");
///
/// let rest: Vec<_> = bout.by_ref().collect();
/// assert!(rest.last().unwrap().is_match_end());
/// assert!(bout.result().is_some());
/// assert!(bout.advance().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Bout<R: Rng = ChaCha8Rng> {
    fighters: [Fighter; 2],
    config: BoutConfig,
    ring: RingModel,
    states: [CombatantState; 2],
    rng: R,
    phase: Phase,
    pending: VecDeque<FightEvent>,
    intro: IntroSequence,
    round: u32,
    exchanges_done: u32,
    clock: f64,
    tally: RoundTally,
    round_events: Vec<FightEvent>,
    rounds: Vec<RoundResult>,
    result: Option<MatchResult>,
}

impl Bout<ChaCha8Rng> {
    /// Create a bout driven by a ChaCha8 source seeded with `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`BoutError::InvalidConfig`] if the config fails validation.
    pub fn seeded(
        fighter_a: Fighter,
        fighter_b: Fighter,
        config: BoutConfig,
        seed: u64,
    ) -> Result<Self> {
        Self::new(fighter_a, fighter_b, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Bout<R> {
    /// Create a bout with an explicit random source.
    ///
    /// Fighters are already validated by [`Fighter::new`]; the config is
    /// validated here so a bad rule set fails before any event exists.
    ///
    /// # Errors
    ///
    /// Returns [`BoutError::InvalidConfig`] if the config fails validation.
    pub fn new(fighter_a: Fighter, fighter_b: Fighter, config: BoutConfig, rng: R) -> Result<Self> {
        config.validate()?;

        let heights = [
            fighter_a.profile().physical.height_cm,
            fighter_b.profile().physical.height_cm,
        ];
        let ring = RingModel::new(heights, config.spatial.clone());
        let corners = config.spatial.corners();
        let intro = IntroSequence::new(&config.spatial);

        Ok(Self {
            fighters: [fighter_a, fighter_b],
            states: corners.map(CombatantState::new),
            ring,
            rng,
            phase: Phase::MatchStart,
            pending: VecDeque::new(),
            intro,
            round: 0,
            exchanges_done: 0,
            clock: 0.0,
            tally: RoundTally::default(),
            round_events: Vec::new(),
            rounds: Vec::new(),
            result: None,
            config,
        })
    }

    /// Produce the next event, or `None` once the match has ended.
    ///
    /// Calling again after `MatchEnd` keeps returning `None`.
    pub fn advance(&mut self) -> Option<FightEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            match self.phase {
                Phase::Finished => return None,
                Phase::MatchStart => self.start_match(),
                Phase::Intro => self.intro_frame(),
                Phase::RoundStart => self.start_round(),
                Phase::Exchange => {
                    if self.exchanges_done < self.config.exchanges_per_round {
                        self.tick();
                    } else {
                        self.phase = Phase::RoundEnd;
                    }
                }
                Phase::RoundEnd => self.end_round(),
            }
        }
    }

    /// Play the match to the end and return the full log.
    ///
    /// Events already pulled with [`Bout::advance`] are not included.
    ///
    /// # Errors
    ///
    /// Returns [`BoutError::InvalidState`] if the match finished without a
    /// result, which indicates a bug in the state machine.
    pub fn run(mut self) -> Result<FightRecord> {
        let events: Vec<FightEvent> = self.by_ref().collect();
        let result = self
            .result
            .take()
            .ok_or_else(|| BoutError::InvalidState("bout ended without a result".to_string()))?;
        Ok(FightRecord { events, result })
    }

    /// Final result, available once `MatchEnd` has been produced.
    #[must_use]
    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    /// Whether the terminal event has been produced.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished && self.pending.is_empty()
    }

    /// Live combat state, indexed by side.
    #[must_use]
    pub fn states(&self) -> &[CombatantState; 2] {
        &self.states
    }

    /// Fighters, indexed by side.
    #[must_use]
    pub fn fighters(&self) -> &[Fighter; 2] {
        &self.fighters
    }

    /// Rule set in use.
    #[must_use]
    pub fn config(&self) -> &BoutConfig {
        &self.config
    }

    /// Ring model in use.
    #[must_use]
    pub fn ring(&self) -> &RingModel {
        &self.ring
    }

    /// Current round, 0 before the first bell.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    fn name(&self, side: Side) -> &str {
        self.fighters[side.index()].name()
    }

    fn emit(&mut self, kind: EventKind) {
        let event = FightEvent::new(self.clock, self.round, kind);
        if self.round > 0 && self.result.is_none() {
            self.round_events.push(event.clone());
        }
        self.pending.push_back(event);
    }

    fn emit_at(&mut self, timestamp: f64, kind: EventKind) {
        let event = FightEvent::new(timestamp, self.round, kind);
        self.round_events.push(event.clone());
        self.pending.push_back(event);
    }

    fn snapshot(&self) -> EventKind {
        let fighters = [&self.states[0], &self.states[1]].map(|s| FighterSnapshot {
            health: s.health,
            stamina: s.stamina,
            head_damage: s.damage.head,
            body_damage: s.damage.body,
            leg_damage: s.damage.leg,
            position: s.position,
        });
        EventKind::StateUpdate { fighters }
    }

    fn positions(&self) -> [Vec2; 2] {
        [self.states[0].position, self.states[1].position]
    }

    fn set_positions(&mut self, positions: [Vec2; 2]) {
        for side in Side::BOTH {
            self.states[side.index()].position = positions[side.index()];
        }
    }

    fn start_match(&mut self) {
        info!(
            fighter_a = self.name(Side::A),
            fighter_b = self.name(Side::B),
            rounds = self.config.rounds,
            "Match starting"
        );
        let kind = EventKind::MatchStart {
            fighter_a_name: self.name(Side::A).to_string(),
            fighter_b_name: self.name(Side::B).to_string(),
        };
        self.emit(kind);
        self.phase = Phase::Intro;
    }

    fn intro_frame(&mut self) {
        if let Some((_, frame)) = self.intro.next() {
            self.set_positions(frame);
            let kind = self.snapshot();
            self.emit(kind);
        } else {
            self.phase = Phase::RoundStart;
        }
    }

    fn start_round(&mut self) {
        self.round += 1;
        self.clock = 0.0;
        self.exchanges_done = 0;
        self.tally = RoundTally::default();
        self.round_events.clear();
        self.set_positions(self.config.spatial.combat_positions());
        debug!(round = self.round, "Round starting");
        self.emit(EventKind::RoundStart);
        self.phase = Phase::Exchange;
    }

    fn tick(&mut self) {
        self.exchanges_done += 1;
        self.clock = self.config.exchange_interval() * f64::from(self.exchanges_done);

        let mut positions = self.positions();
        let in_clinch = self.states[0].in_clinch;
        self.ring.step(&mut positions, in_clinch, &mut self.rng);
        self.set_positions(positions);

        let resolver = ExchangeResolver::new(&self.fighters, &self.config);
        let report = resolver.resolve(&mut self.states, &mut self.rng);
        self.tally.record(&report);
        for kind in report.events {
            self.emit(kind);
        }

        let floor = self.config.stamina_floor;
        for state in &mut self.states {
            state.stamina = state.stamina.max(floor);
        }

        let kind = self.snapshot();
        self.emit(kind);

        for side in Side::BOTH {
            self.check_knockdown(side);
        }

        #[cfg(feature = "debug-validation")]
        self.validate_invariants();
    }

    fn check_knockdown(&mut self, side: Side) {
        let state = &self.states[side.index()];
        let in_band = state.health > self.config.finish_threshold
            && state.health < self.config.knockdown_ceiling;
        if !in_band || state.knocked_down {
            return;
        }

        let cause = state.last_landed.unwrap_or(MoveType::Cross);
        self.states[side.index()].knocked_down = true;
        self.tally.knockdowns[side.index()] += 1;
        debug!(round = self.round, fighter = ?side, ?cause, "Knockdown");

        self.emit(EventKind::Knockdown {
            fighter: side,
            cause,
        });
        let recovered_at = (self.clock - self.config.recovery_offset).max(0.0);
        self.emit_at(recovered_at, EventKind::Recovery { fighter: side });
    }

    fn end_round(&mut self) {
        let mut scored = RoundResult::from_tally(self.round, &self.tally, Vec::new());
        let winner_name = scored
            .winner
            .map_or(DRAW.to_string(), |side| self.name(side).to_string());
        self.emit(EventKind::RoundEnd {
            score_a: scored.score_a,
            score_b: scored.score_b,
            winner_name,
        });
        scored.events = std::mem::take(&mut self.round_events);
        self.rounds.push(scored);

        if let Some(loser) = self.stopped_fighter() {
            self.finish(Some(loser.opponent()), Method::Tko { round: self.round }, [0, 0]);
            return;
        }

        if self.round >= self.config.rounds {
            self.finish_on_points();
            return;
        }

        for side in Side::BOTH {
            let rate = self.fighters[side.index()].durability().recovery_rate;
            self.states[side.index()].recover(rate);
        }
        self.emit(EventKind::BreakStart {
            duration_seconds: self.config.pace.break_seconds(),
        });
        self.phase = Phase::RoundStart;
    }

    // Fighter A is checked first, so A loses if both are below the line.
    fn stopped_fighter(&self) -> Option<Side> {
        let finish = self.config.finish_threshold;
        let stopped = Side::BOTH
            .into_iter()
            .find(|side| self.states[side.index()].health < finish);
        debug!(
            round = self.round,
            health_a = self.states[0].health,
            health_b = self.states[1].health,
            stopped = ?stopped,
            "TKO check"
        );
        stopped
    }

    fn finish_on_points(&mut self) {
        let totals = self.rounds.iter().fold([0, 0], |acc, r| {
            [acc[0] + r.score_a, acc[1] + r.score_b]
        });
        let (winner, method) = if totals[0] > totals[1] {
            (
                Some(Side::A),
                Method::Decision {
                    winner_score: totals[0],
                    loser_score: totals[1],
                },
            )
        } else if totals[1] > totals[0] {
            (
                Some(Side::B),
                Method::Decision {
                    winner_score: totals[1],
                    loser_score: totals[0],
                },
            )
        } else {
            (None, Method::Draw { score: totals[0] })
        };
        self.finish(winner, method, totals);
    }

    fn finish(&mut self, winner: Option<Side>, method: Method, totals: [u32; 2]) {
        let winner_name = winner.map_or(DRAW.to_string(), |side| self.name(side).to_string());
        info!(
            winner = %winner_name,
            method = %method,
            score_a = totals[0],
            score_b = totals[1],
            "Match finished"
        );

        let result = MatchResult {
            winner,
            winner_name: winner_name.clone(),
            method,
            rounds: std::mem::take(&mut self.rounds),
            total_scores: totals,
            final_health: [self.states[0].health, self.states[1].health],
        };
        self.result = Some(result);
        self.emit(EventKind::MatchEnd {
            winner_name,
            method: method.to_string(),
            total_score_a: totals[0],
            total_score_b: totals[1],
        });
        self.phase = Phase::Finished;
    }

    #[cfg(feature = "debug-validation")]
    fn validate_invariants(&self) {
        for state in &self.states {
            debug_assert!(state.stamina >= self.config.stamina_floor && state.stamina <= 100.0);
            debug_assert!(state.health >= 0.0);
            debug_assert!(state.damage.head >= 0.0 && state.damage.body >= 0.0);
            debug_assert!(state.position.length() <= self.config.spatial.ring_radius + 1e-9);
        }
        debug_assert!(
            self.ring.torso_separation(&self.positions()) >= self.config.spatial.min_separation
        );
    }
}

impl<R: Rng> Iterator for Bout<R> {
    type Item = FightEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

impl<R: Rng> std::iter::FusedIterator for Bout<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{
        Durability, FighterProfile, FightingStyle, PhysicalAttributes, TrainingProfile,
    };
    use rand::rngs::mock::StepRng;

    fn profile(name: &str, weight_kg: f64) -> FighterProfile {
        FighterProfile {
            id: name.to_lowercase(),
            name: name.to_string(),
            discipline: "Muay Thai".to_string(),
            physical: PhysicalAttributes {
                height_cm: 175.0,
                weight_kg,
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

    fn pair() -> (Fighter, Fighter) {
        (
            Fighter::new(profile("Red", 70.0)).unwrap(),
            Fighter::new(profile("Blue", 68.0)).unwrap(),
        )
    }

    fn play(seed: u64) -> FightRecord {
        let (a, b) = pair();
        Bout::seeded(a, b, BoutConfig::default(), seed)
            .unwrap()
            .run()
            .unwrap()
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Tko { round: 3 }.to_string(), "TKO Round 3");
        assert_eq!(
            Method::Decision {
                winner_score: 49,
                loser_score: 46
            }
            .to_string(),
            "Decision (49-46)"
        );
        assert_eq!(Method::Draw { score: 48 }.to_string(), "Draw (48-48)");
    }

    #[test]
    fn test_starts_with_match_start_then_intro() {
        let record = play(1);
        assert_eq!(record.events[0].kind.name(), "MATCH_START");
        for event in &record.events[1..31] {
            assert_eq!(event.kind.name(), "STATE_UPDATE");
            assert_eq!(event.round_num, 0);
            assert_eq!(event.timestamp, 0.0);
        }
        assert_eq!(record.events[31].kind.name(), "ROUND_START");
        assert_eq!(record.events[31].round_num, 1);
    }

    #[test]
    fn test_single_terminal_event() {
        let record = play(2);
        let ends = record.events.iter().filter(|e| e.is_match_end()).count();
        assert_eq!(ends, 1);
        assert!(record.events.last().unwrap().is_match_end());
    }

    #[test]
    fn test_exhausted_after_match_end() {
        let (a, b) = pair();
        let mut bout = Bout::seeded(a, b, BoutConfig::default(), 5).unwrap();
        while bout.advance().is_some() {}
        assert!(bout.is_finished());
        assert!(bout.advance().is_none());
        assert!(bout.next().is_none());
    }

    #[test]
    fn test_same_seed_same_log() {
        assert_eq!(play(11).events, play(11).events);
        assert_eq!(play(11).hash(), play(11).hash());
    }

    #[test]
    fn test_round_results_match_round_end_events() {
        let record = play(21);
        let ends: Vec<_> = record
            .events
            .iter()
            .filter_map(|e| match &e.kind {
                EventKind::RoundEnd {
                    score_a, score_b, ..
                } => Some((e.round_num, *score_a, *score_b)),
                _ => None,
            })
            .collect();
        let rounds: Vec<_> = record
            .result
            .rounds
            .iter()
            .map(|r| (r.round_num, r.score_a, r.score_b))
            .collect();
        assert_eq!(ends, rounds);
        for round in &record.result.rounds {
            assert_eq!(round.events.first().unwrap().kind.name(), "ROUND_START");
            assert_eq!(round.events.last().unwrap().kind.name(), "ROUND_END");
        }
    }

    #[test]
    fn test_exchange_timestamps_fill_the_round() {
        let record = play(3);
        let last_update = record
            .events
            .iter()
            .filter(|e| e.round_num == 1 && e.kind.name() == "STATE_UPDATE")
            .last()
            .unwrap();
        assert!((last_update.timestamp - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_fails_before_any_event() {
        let (a, b) = pair();
        let config = BoutConfig {
            exchanges_per_round: 0,
            ..BoutConfig::default()
        };
        assert!(matches!(
            Bout::seeded(a, b, config, 0),
            Err(BoutError::InvalidConfig(_))
        ));
    }

    // With every draw at zero, every exchange is a striking exchange in
    // which both fighters land clean power body shots. The lighter fighter
    // hits softer, so the heavier one wins every round.
    #[test]
    fn test_scripted_draws_decide_on_points() {
        let (a, b) = pair();
        let config = BoutConfig {
            rounds: 1,
            exchanges_per_round: 2,
            ..BoutConfig::default()
        };
        let record = Bout::new(a, b, config, StepRng::new(0, 0))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(record.result.winner, Some(Side::A));
        assert_eq!(record.result.method.to_string(), "Decision (10-9)");
        assert_eq!(record.result.rounds[0].strikes_landed, [2, 2]);
    }

    fn move_of(kind: &EventKind) -> Option<MoveType> {
        match kind {
            EventKind::Strike { move_type, .. } | EventKind::Clinch { move_type, .. } => {
                Some(*move_type)
            }
            _ => None,
        }
    }

    #[test]
    fn test_knockdown_fires_once_with_cause() {
        let (a, b) = pair();
        let mut bout = Bout::seeded(a, b, BoutConfig::default(), 0).unwrap();
        // Put B just above the knockdown band before the first exchange.
        while bout.round() == 0 {
            bout.advance();
        }
        bout.states[1].health = 30.5;

        let events: Vec<_> = bout.by_ref().collect();
        let knockdowns: Vec<_> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind.name() == "KNOCKDOWN")
            .collect();
        assert_eq!(knockdowns.len(), 1);

        let (i, knockdown) = knockdowns[0];
        let EventKind::Knockdown { fighter, cause } = knockdown.kind else {
            panic!("expected knockdown, got {:?}", knockdown.kind);
        };
        assert_eq!(fighter, Side::B);

        let last_hit_on_b = events[..i]
            .iter()
            .rev()
            .find(|e| e.kind.landed_by() == Some(Side::A))
            .and_then(|e| move_of(&e.kind))
            .unwrap();
        assert_eq!(cause, last_hit_on_b);

        let recovery = &events[i + 1];
        assert_eq!(recovery.kind, EventKind::Recovery { fighter: Side::B });
        assert_eq!(recovery.round_num, knockdown.round_num);
        let expected = (knockdown.timestamp - 2.0).max(0.0);
        assert!((recovery.timestamp - expected).abs() < 1e-9);
    }

    #[test]
    fn test_early_knockdown_recovery_clamps_to_round_start() {
        let (a, b) = pair();
        let mut bout = Bout::seeded(a, b, BoutConfig::default(), 0).unwrap();
        while bout.round() == 0 {
            bout.advance();
        }
        bout.pending.clear();

        // First exchange of the round, B already inside the band.
        bout.clock = bout.config.exchange_interval();
        bout.states[1].health = 25.0;
        bout.states[1].last_landed = Some(MoveType::Knee);
        bout.check_knockdown(Side::B);

        let emitted: Vec<_> = bout.pending.drain(..).collect();
        assert_eq!(emitted.len(), 2);
        assert_eq!(
            emitted[0].kind,
            EventKind::Knockdown {
                fighter: Side::B,
                cause: MoveType::Knee
            }
        );
        assert!((emitted[0].timestamp - 20.0 / 30.0).abs() < 1e-9);
        assert_eq!(emitted[1].kind, EventKind::Recovery { fighter: Side::B });
        assert_eq!(emitted[1].timestamp, 0.0);
        assert_eq!(bout.tally.knockdowns, [0, 1]);

        // Already down this bout, so the band does not drop B again.
        bout.check_knockdown(Side::B);
        assert!(bout.pending.is_empty());
    }

    #[test]
    fn test_knockdown_without_landed_hit_blames_cross() {
        let (a, b) = pair();
        let mut bout = Bout::seeded(a, b, BoutConfig::default(), 0).unwrap();
        while bout.round() == 0 {
            bout.advance();
        }
        bout.pending.clear();

        bout.clock = 10.0;
        bout.states[0].health = 21.0;
        bout.states[0].last_landed = None;
        bout.check_knockdown(Side::A);

        let emitted: Vec<_> = bout.pending.drain(..).collect();
        assert_eq!(
            emitted[0].kind,
            EventKind::Knockdown {
                fighter: Side::A,
                cause: MoveType::Cross
            }
        );
        assert!((emitted[1].timestamp - 8.0).abs() < 1e-9);
    }
}
