//! JSON-lines wire format for streamed bouts.
//!
//! Every [`FightEvent`] becomes one JSON object on its own line:
//!
//! - `event_type`: SCREAMING_SNAKE_CASE kind name
//! - `timestamp`: seconds into the round
//! - `round_num`: 0 before the first bell
//! - kind-specific fields, flattened into the same object
//!
//! # Example Stream
//!
//! ```text
//! {"event_type":"MATCH_START","timestamp":0.0,"round_num":0,"fighter_a_name":"Red","fighter_b_name":"Blue"}
//! {"event_type":"ROUND_START","timestamp":0.0,"round_num":1}
//! {"event_type":"STRIKE","timestamp":0.6666666666666666,"round_num":1,"attacker":"A","defender":"B","move":"JAB","target":"HEAD","result":"LANDED_PARTIAL","damage":2.7,"is_power_shot":false}
//! {"event_type":"STATE_UPDATE","timestamp":0.6666666666666666,"round_num":1,"fighter_a_health":100.0,...}
//! {"event_type":"ROUND_END","timestamp":20.0,"round_num":1,"fighter_a_score":10,"fighter_b_score":9,"winner_name":"Red"}
//! {"event_type":"MATCH_END","timestamp":20.0,"round_num":5,"winner_name":"Red","method":"Decision (50-45)","fighter_a_total_score":50,"fighter_b_total_score":45}
//! ```

use bout_core::events::{EventKind, FightEvent};
use serde::Serialize;

// ============================================================================
// Wire Types
// ============================================================================

/// One event as it appears on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct WireEvent<'a> {
    /// Kind name, e.g. `"STRIKE"`.
    pub event_type: &'static str,
    /// Seconds into the round.
    pub timestamp: f64,
    /// Round number.
    pub round_num: u32,
    /// Kind-specific fields.
    #[serde(flatten)]
    pub body: WireBody<'a>,
}

/// Kind-specific fields of a [`WireEvent`].
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WireBody<'a> {
    MatchStart {
        fighter_a_name: &'a str,
        fighter_b_name: &'a str,
    },
    Strike {
        attacker: &'static str,
        defender: &'static str,
        #[serde(rename = "move")]
        move_name: &'static str,
        target: &'static str,
        result: &'static str,
        damage: f64,
        is_power_shot: bool,
    },
    Clinch {
        initiator: &'static str,
        #[serde(rename = "move")]
        move_name: &'static str,
        result: &'static str,
        damage: f64,
    },
    ClinchExit {
        breaker: &'static str,
    },
    Knockdown {
        fighter: &'static str,
        cause: &'static str,
    },
    Recovery {
        fighter: &'static str,
    },
    StateUpdate(StateFields),
    RoundEnd {
        fighter_a_score: u32,
        fighter_b_score: u32,
        winner_name: &'a str,
    },
    BreakStart {
        duration_seconds: u32,
    },
    MatchEnd {
        winner_name: &'a str,
        method: &'a str,
        fighter_a_total_score: u32,
        fighter_b_total_score: u32,
    },
    /// Kinds with no fields beyond the header.
    Bare {},
}

/// Flat per-fighter fields of a state update.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StateFields {
    pub fighter_a_health: f64,
    pub fighter_b_health: f64,
    pub fighter_a_stamina: f64,
    pub fighter_b_stamina: f64,
    pub fighter_a_head_damage: f64,
    pub fighter_a_body_damage: f64,
    pub fighter_a_leg_damage: f64,
    pub fighter_b_head_damage: f64,
    pub fighter_b_body_damage: f64,
    pub fighter_b_leg_damage: f64,
    pub fighter_a_pos_x: f64,
    pub fighter_a_pos_z: f64,
    pub fighter_b_pos_x: f64,
    pub fighter_b_pos_z: f64,
}

// ============================================================================
// Conversion
// ============================================================================

impl<'a> From<&'a FightEvent> for WireEvent<'a> {
    fn from(event: &'a FightEvent) -> Self {
        let body = match &event.kind {
            EventKind::MatchStart {
                fighter_a_name,
                fighter_b_name,
            } => WireBody::MatchStart {
                fighter_a_name,
                fighter_b_name,
            },
            EventKind::RoundStart => WireBody::Bare {},
            EventKind::Strike {
                attacker,
                defender,
                move_type,
                target_zone,
                outcome,
                damage,
                is_power_shot,
            } => WireBody::Strike {
                attacker: attacker.label(),
                defender: defender.label(),
                move_name: move_type.wire_name(),
                target: target_zone.wire_name(),
                result: outcome.wire_name(),
                damage: *damage,
                is_power_shot: *is_power_shot,
            },
            EventKind::Clinch {
                initiator,
                move_type,
                outcome,
                damage,
            } => WireBody::Clinch {
                initiator: initiator.label(),
                move_name: move_type.wire_name(),
                result: outcome.wire_name(),
                damage: *damage,
            },
            EventKind::ClinchExit { breaker } => WireBody::ClinchExit {
                breaker: breaker.label(),
            },
            EventKind::Knockdown { fighter, cause } => WireBody::Knockdown {
                fighter: fighter.label(),
                cause: cause.wire_name(),
            },
            EventKind::Recovery { fighter } => WireBody::Recovery {
                fighter: fighter.label(),
            },
            EventKind::StateUpdate { fighters: [a, b] } => WireBody::StateUpdate(StateFields {
                fighter_a_health: a.health,
                fighter_b_health: b.health,
                fighter_a_stamina: a.stamina,
                fighter_b_stamina: b.stamina,
                fighter_a_head_damage: a.head_damage,
                fighter_a_body_damage: a.body_damage,
                fighter_a_leg_damage: a.leg_damage,
                fighter_b_head_damage: b.head_damage,
                fighter_b_body_damage: b.body_damage,
                fighter_b_leg_damage: b.leg_damage,
                fighter_a_pos_x: a.position.x,
                fighter_a_pos_z: a.position.z,
                fighter_b_pos_x: b.position.x,
                fighter_b_pos_z: b.position.z,
            }),
            EventKind::RoundEnd {
                score_a,
                score_b,
                winner_name,
            } => WireBody::RoundEnd {
                fighter_a_score: *score_a,
                fighter_b_score: *score_b,
                winner_name,
            },
            EventKind::BreakStart { duration_seconds } => WireBody::BreakStart {
                duration_seconds: *duration_seconds,
            },
            EventKind::MatchEnd {
                winner_name,
                method,
                total_score_a,
                total_score_b,
            } => WireBody::MatchEnd {
                winner_name,
                method,
                fighter_a_total_score: *total_score_a,
                fighter_b_total_score: *total_score_b,
            },
        };

        Self {
            event_type: event.kind.name(),
            timestamp: event.timestamp,
            round_num: event.round_num,
            body,
        }
    }
}

impl WireEvent<'_> {
    /// Serialize to JSON line (with newline).
    #[must_use]
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"event_type":"ERROR","message":"Serialization failed: {e}"}}"#)
        });
        json.push('\n');
        json
    }
}

/// Encode one event as a JSON line.
#[must_use]
pub fn event_to_json_line(event: &FightEvent) -> String {
    WireEvent::from(event).to_json_line()
}
