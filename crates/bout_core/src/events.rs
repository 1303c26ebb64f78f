//! Fight event protocol.
//!
//! The ordered stream of [`FightEvent`]s is the only output of the core and
//! the durable record of a match. Every event shares a header (round number
//! and seconds elapsed in that round) and carries a kind-specific payload in
//! the closed [`EventKind`] union, so consumers match exhaustively.
//!
//! Events carry deltas relative to earlier events; consumers must apply
//! them in order and must not drop any.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::state::Side;

/// Fighting move classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveType {
    /// Lead straight.
    Jab,
    /// Rear straight.
    Cross,
    /// Hook to the head.
    Hook,
    /// Punch to the body.
    BodyPunch,
    /// Low round kick.
    LegKick,
    /// Round kick to the body.
    BodyKick,
    /// High round kick.
    HeadKick,
    /// Knee.
    Knee,
    /// Elbow.
    Elbow,
    /// Tying up in the clinch.
    ClinchEntry,
    /// Knee thrown from the clinch.
    ClinchKnee,
}

impl MoveType {
    /// Wire name in SCREAMING_SNAKE_CASE.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            MoveType::Jab => "JAB",
            MoveType::Cross => "CROSS",
            MoveType::Hook => "HOOK",
            MoveType::BodyPunch => "BODY_PUNCH",
            MoveType::LegKick => "LEG_KICK",
            MoveType::BodyKick => "BODY_KICK",
            MoveType::HeadKick => "HEAD_KICK",
            MoveType::Knee => "KNEE",
            MoveType::Elbow => "ELBOW",
            MoveType::ClinchEntry => "CLINCH_ENTRY",
            MoveType::ClinchKnee => "CLINCH_KNEE",
        }
    }
}

/// Where a strike is aimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetZone {
    /// Head.
    Head,
    /// Body.
    Body,
    /// Legs.
    Legs,
}

impl TargetZone {
    /// Wire name in SCREAMING_SNAKE_CASE.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            TargetZone::Head => "HEAD",
            TargetZone::Body => "BODY",
            TargetZone::Legs => "LEGS",
        }
    }
}

/// Outcome of a strike attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrikeOutcome {
    /// Full damage.
    LandedClean,
    /// Glancing, half damage.
    LandedPartial,
    /// Defended.
    Blocked,
    /// Whiffed.
    Missed,
}

impl StrikeOutcome {
    /// Whether the strike did damage.
    #[must_use]
    pub const fn landed(self) -> bool {
        matches!(self, StrikeOutcome::LandedClean | StrikeOutcome::LandedPartial)
    }

    /// Damage multiplier for a landed strike.
    #[must_use]
    pub const fn damage_factor(self) -> f64 {
        match self {
            StrikeOutcome::LandedClean => 1.0,
            StrikeOutcome::LandedPartial => 0.5,
            StrikeOutcome::Blocked | StrikeOutcome::Missed => 0.0,
        }
    }

    /// Wire name in SCREAMING_SNAKE_CASE.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            StrikeOutcome::LandedClean => "LANDED_CLEAN",
            StrikeOutcome::LandedPartial => "LANDED_PARTIAL",
            StrikeOutcome::Blocked => "BLOCKED",
            StrikeOutcome::Missed => "MISSED",
        }
    }
}

/// Snapshot of one fighter inside a [`EventKind::StateUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FighterSnapshot {
    /// Health.
    pub health: f64,
    /// Stamina.
    pub stamina: f64,
    /// Accumulated head damage.
    pub head_damage: f64,
    /// Accumulated body damage.
    pub body_damage: f64,
    /// Accumulated leg damage.
    pub leg_damage: f64,
    /// Floor position.
    pub position: Vec2,
}

/// Kind-specific payload of a fight event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Match begins.
    MatchStart {
        /// Fighter A display name.
        fighter_a_name: String,
        /// Fighter B display name.
        fighter_b_name: String,
    },
    /// Round begins.
    RoundStart,
    /// A strike landed.
    Strike {
        /// Who threw it.
        attacker: Side,
        /// Who received it.
        defender: Side,
        /// Move thrown.
        move_type: MoveType,
        /// Zone hit.
        target_zone: TargetZone,
        /// How cleanly it landed.
        outcome: StrikeOutcome,
        /// Damage applied.
        damage: f64,
        /// Loaded-up power strike rather than a setup shot.
        is_power_shot: bool,
    },
    /// Clinch entry or damage dealt inside the clinch.
    Clinch {
        /// Fighter who initiated or won the exchange.
        initiator: Side,
        /// Clinch move.
        move_type: MoveType,
        /// Outcome.
        outcome: StrikeOutcome,
        /// Damage applied to the initiator's opponent.
        damage: f64,
    },
    /// Fighters break from the clinch.
    ClinchExit {
        /// Fighter who broke the tie-up.
        breaker: Side,
    },
    /// A fighter is dropped.
    Knockdown {
        /// Who went down.
        fighter: Side,
        /// What dropped them.
        cause: MoveType,
    },
    /// A fighter beats the count.
    Recovery {
        /// Who got up.
        fighter: Side,
    },
    /// Full state snapshot of both fighters, indexed by [`Side::index`].
    StateUpdate {
        /// Per-side snapshots.
        fighters: [FighterSnapshot; 2],
    },
    /// Round scored.
    RoundEnd {
        /// Fighter A's score.
        score_a: u32,
        /// Fighter B's score.
        score_b: u32,
        /// Round winner's name, or `"Draw"`.
        winner_name: String,
    },
    /// Rest period between rounds.
    BreakStart {
        /// Length of the break.
        duration_seconds: u32,
    },
    /// Terminal event.
    MatchEnd {
        /// Winner's name, or `"Draw"`.
        winner_name: String,
        /// `"TKO Round N"`, `"Decision (X-Y)"` or `"Draw (X-X)"`.
        method: String,
        /// Fighter A's total score (0 on a stoppage).
        total_score_a: u32,
        /// Fighter B's total score (0 on a stoppage).
        total_score_b: u32,
    },
}

impl EventKind {
    /// Wire name of the event kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            EventKind::MatchStart { .. } => "MATCH_START",
            EventKind::RoundStart => "ROUND_START",
            EventKind::Strike { .. } => "STRIKE",
            EventKind::Clinch { .. } => "CLINCH",
            EventKind::ClinchExit { .. } => "CLINCH_EXIT",
            EventKind::Knockdown { .. } => "KNOCKDOWN",
            EventKind::Recovery { .. } => "RECOVERY",
            EventKind::StateUpdate { .. } => "STATE_UPDATE",
            EventKind::RoundEnd { .. } => "ROUND_END",
            EventKind::BreakStart { .. } => "BREAK_START",
            EventKind::MatchEnd { .. } => "MATCH_END",
        }
    }

    /// Side that landed damage with this event, if any.
    #[must_use]
    pub fn landed_by(&self) -> Option<Side> {
        match self {
            EventKind::Strike {
                attacker, outcome, ..
            } if outcome.landed() => Some(*attacker),
            EventKind::Clinch {
                initiator, damage, ..
            } if *damage > 0.0 => Some(*initiator),
            _ => None,
        }
    }
}

/// One immutable, ordered fight event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightEvent {
    /// Seconds elapsed within the current round.
    pub timestamp: f64,
    /// Round number; 0 before the first round.
    pub round_num: u32,
    /// Payload.
    pub kind: EventKind,
}

impl FightEvent {
    /// Create an event.
    #[must_use]
    pub fn new(timestamp: f64, round_num: u32, kind: EventKind) -> Self {
        Self {
            timestamp,
            round_num,
            kind,
        }
    }

    /// Whether this is the terminal event.
    #[must_use]
    pub fn is_match_end(&self) -> bool {
        matches!(self.kind, EventKind::MatchEnd { .. })
    }
}

// Floats hash through their bit patterns so identical runs hash identically.
impl Hash for FightEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.timestamp.to_bits().hash(state);
        self.round_num.hash(state);
        self.kind.name().hash(state);

        match &self.kind {
            EventKind::MatchStart {
                fighter_a_name,
                fighter_b_name,
            } => {
                fighter_a_name.hash(state);
                fighter_b_name.hash(state);
            }
            EventKind::RoundStart => {}
            EventKind::Strike {
                attacker,
                defender,
                move_type,
                target_zone,
                outcome,
                damage,
                is_power_shot,
            } => {
                attacker.hash(state);
                defender.hash(state);
                move_type.hash(state);
                target_zone.hash(state);
                outcome.hash(state);
                damage.to_bits().hash(state);
                is_power_shot.hash(state);
            }
            EventKind::Clinch {
                initiator,
                move_type,
                outcome,
                damage,
            } => {
                initiator.hash(state);
                move_type.hash(state);
                outcome.hash(state);
                damage.to_bits().hash(state);
            }
            EventKind::ClinchExit { breaker } => breaker.hash(state),
            EventKind::Knockdown { fighter, cause } => {
                fighter.hash(state);
                cause.hash(state);
            }
            EventKind::Recovery { fighter } => fighter.hash(state),
            EventKind::StateUpdate { fighters } => {
                for snapshot in fighters {
                    snapshot.health.to_bits().hash(state);
                    snapshot.stamina.to_bits().hash(state);
                    snapshot.head_damage.to_bits().hash(state);
                    snapshot.body_damage.to_bits().hash(state);
                    snapshot.leg_damage.to_bits().hash(state);
                    snapshot.position.x.to_bits().hash(state);
                    snapshot.position.z.to_bits().hash(state);
                }
            }
            EventKind::RoundEnd {
                score_a,
                score_b,
                winner_name,
            } => {
                score_a.hash(state);
                score_b.hash(state);
                winner_name.hash(state);
            }
            EventKind::BreakStart { duration_seconds } => duration_seconds.hash(state),
            EventKind::MatchEnd {
                winner_name,
                method,
                total_score_a,
                total_score_b,
            } => {
                winner_name.hash(state);
                method.hash(state);
                total_score_a.hash(state);
                total_score_b.hash(state);
            }
        }
    }
}

/// Stable hash of an ordered event log.
///
/// Two logs hash equal only if they contain the same events in the same
/// order; used for determinism checks and replay verification.
#[must_use]
pub fn event_log_hash(events: &[FightEvent]) -> u64 {
    let mut hasher = DefaultHasher::new();
    events.len().hash(&mut hasher);
    for event in events {
        event.hash(&mut hasher);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strike(damage: f64) -> FightEvent {
        FightEvent::new(
            6.0,
            1,
            EventKind::Strike {
                attacker: Side::A,
                defender: Side::B,
                move_type: MoveType::Cross,
                target_zone: TargetZone::Head,
                outcome: StrikeOutcome::LandedClean,
                damage,
                is_power_shot: true,
            },
        )
    }

    #[test]
    fn test_outcome_helpers() {
        assert!(StrikeOutcome::LandedClean.landed());
        assert!(StrikeOutcome::LandedPartial.landed());
        assert!(!StrikeOutcome::Blocked.landed());
        assert!(!StrikeOutcome::Missed.landed());
        assert_eq!(StrikeOutcome::LandedPartial.damage_factor(), 0.5);
    }

    #[test]
    fn test_log_hash_is_order_sensitive() {
        let a = strike(5.0);
        let b = strike(2.5);
        let forward = event_log_hash(&[a.clone(), b.clone()]);
        let reversed = event_log_hash(&[b, a]);
        assert_ne!(forward, reversed);
    }

    #[test]
    fn test_log_hash_detects_payload_change() {
        assert_eq!(
            event_log_hash(&[strike(5.0)]),
            event_log_hash(&[strike(5.0)])
        );
        assert_ne!(
            event_log_hash(&[strike(5.0)]),
            event_log_hash(&[strike(5.000_001)])
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(EventKind::RoundStart.name(), "ROUND_START");
        assert_eq!(strike(1.0).kind.name(), "STRIKE");
        assert!(FightEvent::new(
            0.0,
            5,
            EventKind::MatchEnd {
                winner_name: "Draw".into(),
                method: "Draw (48-48)".into(),
                total_score_a: 48,
                total_score_b: 48,
            }
        )
        .is_match_end());
    }
}
