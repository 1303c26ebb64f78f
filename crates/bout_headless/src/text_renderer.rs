//! Terminal renderer for streamed bouts.
//!
//! Folds events into a per-fighter visual state (pose, bars, zone damage)
//! and renders narration lines plus a status panel as plain text.

use bout_core::events::{EventKind, FightEvent, MoveType, StrikeOutcome};
use bout_core::render::FightRenderer;
use bout_core::state::Side;

/// ANSI color codes.
#[allow(dead_code)]
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";

    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GREEN: &str = "\x1b[32m";
}

/// Text renderer configuration.
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Use colored output (ANSI).
    pub use_color: bool,
    /// Width of health and stamina bars in characters.
    pub bar_width: usize,
    /// Round length, for the time-remaining clock.
    pub round_seconds: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            bar_width: 20,
            round_seconds: 20.0,
        }
    }
}

/// What a fighter is visibly doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    /// Fighting stance.
    Idle,
    /// Throwing the given move.
    Attacking(MoveType),
    /// Absorbing a strike on the guard.
    Blocking,
    /// Taking damage.
    Hurt,
    /// Tied up.
    Clinch,
    /// On the canvas.
    Down,
    /// Beating the count.
    GettingUp,
}

impl Pose {
    /// Seconds before the pose falls back to idle; 0 holds until changed.
    #[must_use]
    pub fn duration(self) -> f64 {
        match self {
            Pose::Idle | Pose::Clinch => 0.0,
            Pose::Attacking(MoveType::Jab) => 0.3,
            Pose::Attacking(MoveType::BodyPunch | MoveType::Elbow) => 0.35,
            Pose::Attacking(MoveType::LegKick | MoveType::BodyKick) => 0.5,
            Pose::Attacking(MoveType::HeadKick) => 0.6,
            Pose::Attacking(_) => 0.4,
            Pose::Blocking => 0.3,
            Pose::Hurt => 0.4,
            Pose::Down => 2.0,
            Pose::GettingUp => 1.0,
        }
    }

    /// Short label for the status panel.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Pose::Idle => "stance",
            Pose::Attacking(_) => "striking",
            Pose::Blocking => "blocking",
            Pose::Hurt => "hurt",
            Pose::Clinch => "clinch",
            Pose::Down => "DOWN",
            Pose::GettingUp => "getting up",
        }
    }
}

/// Visual state of one fighter.
#[derive(Debug, Clone)]
pub struct FighterVisual {
    /// Display name.
    pub name: String,
    /// Current pose.
    pub pose: Pose,
    /// Seconds the current pose has been held.
    pub pose_elapsed: f64,
    /// Health, 0-100.
    pub health: f64,
    /// Stamina, 0-100.
    pub stamina: f64,
    /// Accumulated head damage.
    pub head_damage: f64,
    /// Accumulated body damage.
    pub body_damage: f64,
    /// Accumulated leg damage.
    pub leg_damage: f64,
    /// Whether tied up in the clinch.
    pub in_clinch: bool,
}

impl FighterVisual {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pose: Pose::Idle,
            pose_elapsed: 0.0,
            health: 100.0,
            stamina: 100.0,
            head_damage: 0.0,
            body_damage: 0.0,
            leg_damage: 0.0,
            in_clinch: false,
        }
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
        self.pose_elapsed = 0.0;
    }

    fn rest_pose(&self) -> Pose {
        if self.in_clinch {
            Pose::Clinch
        } else {
            Pose::Idle
        }
    }

    fn advance(&mut self, delta_time: f64) {
        let duration = self.pose.duration();
        if duration <= 0.0 {
            return;
        }
        self.pose_elapsed += delta_time;
        if self.pose_elapsed >= duration {
            self.set_pose(self.rest_pose());
        }
    }
}

/// Renderer producing plain-text frames.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    config: TextConfig,
    fighters: Option<[FighterVisual; 2]>,
    round_num: u32,
    clock: f64,
    round_scores: [u32; 2],
    total_scores: [u32; 2],
    pending: Vec<String>,
    state_dirty: bool,
    narrated: usize,
}

impl TextRenderer {
    /// Create a renderer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Visual state of a fighter, once initialized.
    #[must_use]
    pub fn fighter(&self, side: Side) -> Option<&FighterVisual> {
        self.fighters.as_ref().map(|f| &f[side.index()])
    }

    /// Total scores seen on the terminal event.
    #[must_use]
    pub fn total_scores(&self) -> [u32; 2] {
        self.total_scores
    }

    /// Last round's scores.
    #[must_use]
    pub fn round_scores(&self) -> [u32; 2] {
        self.round_scores
    }

    /// Round clock as time remaining, `M:SS`.
    #[must_use]
    pub fn time_remaining(&self) -> String {
        format_clock(self.config.round_seconds - self.clock)
    }

    fn name(&self, side: Side) -> String {
        self.fighter(side)
            .map_or_else(|| side.label().to_string(), |f| f.name.clone())
    }

    fn visual_mut(&mut self, side: Side) -> Option<&mut FighterVisual> {
        self.fighters.as_mut().map(|f| &mut f[side.index()])
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.config.use_color {
            format!("{color}{text}{}", colors::RESET)
        } else {
            text.to_string()
        }
    }

    fn narrate(&mut self, line: String) {
        self.narrated += 1;
        self.pending.push(line);
    }

    // Rotates through templates so repeated moves read differently without
    // touching any random source.
    fn pick<'t>(&self, templates: &[&'t str]) -> &'t str {
        templates[self.narrated % templates.len()]
    }

    fn on_strike(
        &mut self,
        attacker: Side,
        move_type: MoveType,
        outcome: StrikeOutcome,
        is_power_shot: bool,
    ) {
        let defender = attacker.opponent();
        if let Some(visual) = self.visual_mut(attacker) {
            visual.set_pose(Pose::Attacking(move_type));
        }
        let reaction = match outcome {
            StrikeOutcome::LandedClean | StrikeOutcome::LandedPartial => Some(Pose::Hurt),
            StrikeOutcome::Blocked => Some(Pose::Blocking),
            StrikeOutcome::Missed => None,
        };
        if let (Some(pose), Some(visual)) = (reaction, self.visual_mut(defender)) {
            visual.set_pose(pose);
        }

        let line = strike_description(
            self,
            &self.name(attacker),
            &self.name(defender),
            move_type,
            outcome,
            is_power_shot,
        );
        self.narrate(line);
    }

    fn on_clinch(&mut self, initiator: Side, move_type: MoveType, damage: f64) {
        let other = initiator.opponent();
        let (a, b) = (self.name(initiator), self.name(other));
        if move_type == MoveType::ClinchEntry {
            if let Some(fighters) = self.fighters.as_mut() {
                for visual in fighters.iter_mut() {
                    visual.in_clinch = true;
                    visual.set_pose(Pose::Clinch);
                }
            }
            self.narrate(format!("{a} locks up {b} in the clinch"));
            return;
        }

        if let Some(visual) = self.visual_mut(initiator) {
            visual.set_pose(Pose::Attacking(move_type));
        }
        if damage > 0.0 {
            if let Some(visual) = self.visual_mut(other) {
                visual.set_pose(Pose::Hurt);
            }
            let template = self.pick(&[
                "{a} drives a knee into {b}",
                "Hard knee in the clinch from {a}",
                "{a} punishes {b} with a knee",
            ]);
            self.narrate(template.replace("{a}", &a).replace("{b}", &b));
        } else {
            self.narrate(format!("{a} misses in the clinch"));
        }
    }

    fn on_clinch_exit(&mut self, breaker: Side) {
        if let Some(fighters) = self.fighters.as_mut() {
            for visual in fighters.iter_mut() {
                visual.in_clinch = false;
                visual.set_pose(Pose::Idle);
            }
        }
        let name = self.name(breaker);
        self.narrate(format!("{name} breaks from the clinch"));
    }

    fn status_panel(&self) -> Vec<String> {
        let Some(fighters) = self.fighters.as_ref() else {
            return Vec::new();
        };
        let mut lines = vec![self.paint(
            &format!("  ROUND {} - {}", self.round_num, self.time_remaining()),
            colors::BOLD,
        )];
        for visual in fighters {
            lines.push(format!(
                "  {:<20} HP {} {:>5.1}  STA {} {:>5.1}  [{}] H{:.0}/B{:.0}/L{:.0}",
                truncate(&visual.name, 20),
                self.bar(visual.health),
                visual.health,
                self.bar(visual.stamina),
                visual.stamina,
                visual.pose.label(),
                visual.head_damage,
                visual.body_damage,
                visual.leg_damage,
            ));
        }
        lines
    }

    fn bar(&self, value: f64) -> String {
        let width = self.config.bar_width;
        let ratio = (value / 100.0).clamp(0.0, 1.0);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let filled = ((ratio * width as f64) as usize).min(width);
        let color = if value > 70.0 {
            colors::GREEN
        } else if value > 40.0 {
            colors::YELLOW
        } else {
            colors::RED
        };
        format!(
            "{}{}",
            self.paint(&"█".repeat(filled), color),
            "░".repeat(width - filled)
        )
    }
}

impl FightRenderer for TextRenderer {
    type Config = TextConfig;
    type Frame = String;

    fn init(&mut self, fighter_a_name: &str, fighter_b_name: &str, config: &TextConfig) {
        self.config = config.clone();
        self.fighters = Some([
            FighterVisual::new(fighter_a_name),
            FighterVisual::new(fighter_b_name),
        ]);
        self.round_num = 0;
        self.clock = 0.0;
        self.round_scores = [0, 0];
        self.total_scores = [0, 0];
        self.pending.clear();
        self.state_dirty = false;
        self.narrated = 0;
    }

    fn handle_event(&mut self, event: &FightEvent) {
        self.clock = event.timestamp;
        match &event.kind {
            EventKind::MatchStart {
                fighter_a_name,
                fighter_b_name,
            } => {
                if self.fighters.is_none() {
                    self.fighters = Some([
                        FighterVisual::new(fighter_a_name),
                        FighterVisual::new(fighter_b_name),
                    ]);
                }
                let line = self.paint(
                    &format!("{fighter_a_name} vs {fighter_b_name}"),
                    colors::CYAN,
                );
                self.narrate(line);
            }
            EventKind::RoundStart => {
                self.round_num = event.round_num;
                if let Some(fighters) = self.fighters.as_mut() {
                    for visual in fighters.iter_mut() {
                        visual.in_clinch = false;
                        visual.set_pose(Pose::Idle);
                    }
                }
                let line = self.paint(&format!("=== ROUND {} ===", event.round_num), colors::BOLD);
                self.narrate(line);
            }
            EventKind::Strike {
                attacker,
                move_type,
                outcome,
                is_power_shot,
                ..
            } => self.on_strike(*attacker, *move_type, *outcome, *is_power_shot),
            EventKind::Clinch {
                initiator,
                move_type,
                damage,
                ..
            } => self.on_clinch(*initiator, *move_type, *damage),
            EventKind::ClinchExit { breaker } => self.on_clinch_exit(*breaker),
            EventKind::Knockdown { fighter, cause } => {
                if let Some(visual) = self.visual_mut(*fighter) {
                    visual.set_pose(Pose::Down);
                }
                let name = self.name(*fighter);
                let line = self.paint(
                    &format!("{name} is DOWN from a {}!", move_name(*cause)),
                    colors::RED,
                );
                self.narrate(line);
            }
            EventKind::Recovery { fighter } => {
                if let Some(visual) = self.visual_mut(*fighter) {
                    visual.set_pose(Pose::GettingUp);
                }
                let name = self.name(*fighter);
                self.narrate(format!("{name} beats the count"));
            }
            EventKind::StateUpdate { fighters } => {
                if let Some(visuals) = self.fighters.as_mut() {
                    for (visual, snapshot) in visuals.iter_mut().zip(fighters) {
                        visual.health = snapshot.health;
                        visual.stamina = snapshot.stamina;
                        visual.head_damage = snapshot.head_damage;
                        visual.body_damage = snapshot.body_damage;
                        visual.leg_damage = snapshot.leg_damage;
                    }
                }
                if event.round_num > 0 {
                    self.state_dirty = true;
                }
            }
            EventKind::RoundEnd {
                score_a,
                score_b,
                winner_name,
            } => {
                self.round_scores = [*score_a, *score_b];
                let line = self.paint(
                    &format!(
                        "Round {} ends {score_a}-{score_b}, {winner_name} takes the round",
                        event.round_num
                    ),
                    colors::YELLOW,
                );
                self.narrate(line);
            }
            EventKind::BreakStart { duration_seconds } => {
                self.narrate(format!("Rest period ({duration_seconds}s)"));
            }
            EventKind::MatchEnd {
                winner_name,
                method,
                total_score_a,
                total_score_b,
            } => {
                self.total_scores = [*total_score_a, *total_score_b];
                let line = self.paint(
                    &format!("WINNER: {winner_name} by {method}"),
                    colors::GREEN,
                );
                self.narrate(line);
            }
        }
    }

    fn render(&mut self, delta_time: f64) -> String {
        if let Some(fighters) = self.fighters.as_mut() {
            for visual in fighters.iter_mut() {
                visual.advance(delta_time);
            }
        }

        let mut lines = std::mem::take(&mut self.pending);
        if std::mem::take(&mut self.state_dirty) {
            lines.extend(self.status_panel());
        }
        if lines.is_empty() {
            return String::new();
        }
        let mut frame = lines.join("\n");
        frame.push('\n');
        frame
    }

    fn destroy(&mut self) {
        self.fighters = None;
        self.pending.clear();
    }
}

/// Human-readable move name.
#[must_use]
pub fn move_name(move_type: MoveType) -> &'static str {
    match move_type {
        MoveType::Jab => "jab",
        MoveType::Cross => "cross",
        MoveType::Hook => "hook",
        MoveType::BodyPunch => "body shot",
        MoveType::LegKick => "leg kick",
        MoveType::BodyKick => "body kick",
        MoveType::HeadKick => "head kick",
        MoveType::Knee | MoveType::ClinchKnee => "knee",
        MoveType::Elbow => "elbow",
        MoveType::ClinchEntry => "clinch",
    }
}

fn strike_description(
    renderer: &TextRenderer,
    attacker: &str,
    defender: &str,
    move_type: MoveType,
    outcome: StrikeOutcome,
    is_power_shot: bool,
) -> String {
    let templates: &[&str] = match (outcome, is_power_shot) {
        (StrikeOutcome::LandedClean, true) => &[
            "{a} unloads a massive {m}!",
            "Huge {m} from {a} rocks {d}!",
            "{a} throws everything into that {m}!",
        ],
        (StrikeOutcome::LandedClean, false) => &[
            "{a} lands a sharp {m}",
            "{a} connects with a {m}",
            "Clean {m} from {a} finds {d}",
        ],
        (StrikeOutcome::LandedPartial, _) => &[
            "{a} grazes {d} with a {m}",
            "Glancing {m} from {a}",
            "{d} partially deflects the {m}",
        ],
        (StrikeOutcome::Blocked, _) => &[
            "{d} blocks the {m}",
            "{d} takes the {m} on the guard",
        ],
        (StrikeOutcome::Missed, _) => &[
            "{a} misses with a {m}",
            "{d} slips the {m}",
        ],
    };
    renderer
        .pick(templates)
        .replace("{a}", attacker)
        .replace("{d}", defender)
        .replace("{m}", move_name(move_type))
}

/// Format seconds as `M:SS`, clamping negatives to zero.
#[must_use]
pub fn format_clock(seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bout_core::events::{FighterSnapshot, TargetZone};
    use bout_core::math::Vec2;

    fn plain() -> TextRenderer {
        let mut renderer = TextRenderer::new();
        let config = TextConfig {
            use_color: false,
            ..TextConfig::default()
        };
        renderer.init("Red", "Blue", &config);
        renderer
    }

    fn strike(outcome: StrikeOutcome, is_power_shot: bool) -> FightEvent {
        FightEvent::new(
            2.0,
            1,
            EventKind::Strike {
                attacker: Side::A,
                defender: Side::B,
                move_type: MoveType::Hook,
                target_zone: TargetZone::Head,
                outcome,
                damage: 3.0,
                is_power_shot,
            },
        )
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(180.0), "3:00");
        assert_eq!(format_clock(65.9), "1:05");
        assert_eq!(format_clock(0.4), "0:00");
        assert_eq!(format_clock(-3.0), "0:00");
    }

    #[test]
    fn test_strike_sets_poses_and_narrates() {
        let mut renderer = plain();
        renderer.handle_event(&strike(StrikeOutcome::LandedClean, false));

        assert_eq!(
            renderer.fighter(Side::A).unwrap().pose,
            Pose::Attacking(MoveType::Hook)
        );
        assert_eq!(renderer.fighter(Side::B).unwrap().pose, Pose::Hurt);

        let frame = renderer.render(0.1);
        assert!(frame.contains("Red"));
        assert!(frame.contains("hook"));
        // Narration is drained by render.
        assert_eq!(renderer.render(0.1), "");
    }

    #[test]
    fn test_blocked_strike_reaction() {
        let mut renderer = plain();
        renderer.handle_event(&strike(StrikeOutcome::Blocked, false));
        assert_eq!(renderer.fighter(Side::B).unwrap().pose, Pose::Blocking);
        assert!(renderer.render(0.0).contains("Blue"));
    }

    #[test]
    fn test_poses_return_to_idle() {
        let mut renderer = plain();
        renderer.handle_event(&strike(StrikeOutcome::Missed, true));
        renderer.render(0.2);
        assert_ne!(renderer.fighter(Side::A).unwrap().pose, Pose::Idle);
        renderer.render(0.3);
        assert_eq!(renderer.fighter(Side::A).unwrap().pose, Pose::Idle);
    }

    #[test]
    fn test_clinch_rests_in_clinch_pose() {
        let mut renderer = plain();
        renderer.handle_event(&FightEvent::new(
            1.0,
            1,
            EventKind::Clinch {
                initiator: Side::B,
                move_type: MoveType::ClinchEntry,
                outcome: StrikeOutcome::LandedClean,
                damage: 0.0,
            },
        ));
        renderer.handle_event(&FightEvent::new(
            1.0,
            1,
            EventKind::Clinch {
                initiator: Side::B,
                move_type: MoveType::ClinchKnee,
                outcome: StrikeOutcome::LandedClean,
                damage: 4.0,
            },
        ));
        let frame = renderer.render(1.0);
        assert!(frame.contains("Blue locks up Red"));
        assert_eq!(renderer.fighter(Side::B).unwrap().pose, Pose::Clinch);
        assert_eq!(renderer.fighter(Side::A).unwrap().pose, Pose::Clinch);

        renderer.handle_event(&FightEvent::new(2.0, 1, EventKind::ClinchExit { breaker: Side::A }));
        assert_eq!(renderer.fighter(Side::A).unwrap().pose, Pose::Idle);
        assert!(renderer.render(0.0).contains("Red breaks from the clinch"));
    }

    #[test]
    fn test_state_update_shows_panel() {
        let mut renderer = plain();
        let snapshot = |health| FighterSnapshot {
            health,
            stamina: 50.0,
            head_damage: 0.0,
            body_damage: 0.0,
            leg_damage: 0.0,
            position: Vec2::ZERO,
        };
        renderer.handle_event(&FightEvent::new(0.0, 1, EventKind::RoundStart));
        renderer.handle_event(&FightEvent::new(
            5.0,
            1,
            EventKind::StateUpdate {
                fighters: [snapshot(88.0), snapshot(64.5)],
            },
        ));

        let frame = renderer.render(0.0);
        assert!(frame.contains("ROUND 1 - 0:15"));
        assert!(frame.contains("88.0"));
        assert!(frame.contains("64.5"));
        assert_eq!(renderer.fighter(Side::B).unwrap().health, 64.5);
    }

    #[test]
    fn test_match_end_records_totals() {
        let mut renderer = plain();
        renderer.handle_event(&FightEvent::new(
            20.0,
            5,
            EventKind::MatchEnd {
                winner_name: "Red".to_string(),
                method: "Decision (50-45)".to_string(),
                total_score_a: 50,
                total_score_b: 45,
            },
        ));
        assert_eq!(renderer.total_scores(), [50, 45]);
        assert!(renderer.render(0.0).contains("WINNER: Red by Decision (50-45)"));
    }

    #[test]
    fn test_destroy_clears_state() {
        let mut renderer = plain();
        renderer.destroy();
        assert!(renderer.fighter(Side::A).is_none());
    }
}
