//! Exchange resolution.
//!
//! One exchange is one tick of combat. The resolver reads both fighters'
//! stats and current state, picks one of four archetypes uniformly, applies
//! damage and stamina costs, and reports the events that happened. It holds
//! no state of its own between ticks.
//!
//! Random draws happen in a fixed order for a given archetype, so a seeded
//! source reproduces the same bout exactly.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::BoutConfig;
use crate::events::{EventKind, MoveType, StrikeOutcome, TargetZone};
use crate::profile::{Durability, Fighter};
use crate::state::{CombatantState, Side, ZoneDamage};

/// Damage coefficient for strikes in a striking exchange.
pub const STRIKE_DAMAGE: f64 = 0.15;
/// Damage coefficient for leg kicks.
pub const LEG_KICK_DAMAGE: f64 = 0.12;
/// Fraction of the clinch power gap dealt as body damage.
pub const CLINCH_DAMAGE: f64 = 0.1;

const POWER_STRIKE_COST: f64 = 2.0;
const SETUP_STRIKE_COST: f64 = 1.0;
const LEG_KICK_COST: f64 = 1.5;
const CLINCH_COST: f64 = 2.0;
const DEFENSIVE_COST: f64 = 0.5;

const BODY_POWER_MOVES: [MoveType; 3] = [MoveType::BodyPunch, MoveType::BodyKick, MoveType::Knee];
const HEAD_POWER_MOVES: [MoveType; 4] =
    [MoveType::Cross, MoveType::Hook, MoveType::HeadKick, MoveType::Elbow];
const HEAD_SETUP_MOVES: [MoveType; 2] = [MoveType::Jab, MoveType::Cross];

/// Kind of exchange resolved in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Both fighters throw.
    Striking,
    /// One fighter chops at the legs.
    LegKick,
    /// Tie-up and knees.
    Clinch,
    /// Cautious feint; low action.
    Defensive,
}

impl Archetype {
    /// All archetypes, in draw order.
    pub const ALL: [Archetype; 4] = [
        Archetype::Striking,
        Archetype::Clinch,
        Archetype::Defensive,
        Archetype::LegKick,
    ];
}

/// Performance multipliers from accumulated zone damage.
///
/// Each lies in `(0, 1]` and has a floor so a battered fighter is slowed,
/// never stopped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Degradation {
    /// Scales defense; driven by head damage, floor 0.5.
    pub defense: f64,
    /// Scales power and stamina effectiveness; driven by body damage, floor 0.6.
    pub power: f64,
    /// Scales speed; driven by leg damage, floor 0.7.
    pub speed: f64,
}

impl Degradation {
    /// Multipliers for the given damage and durability.
    #[must_use]
    pub fn from_damage(damage: &ZoneDamage, durability: &Durability) -> Self {
        Self {
            defense: (1.0 - damage.head / durability.head_durability * 0.5).max(0.5),
            power: (1.0 - damage.body / durability.body_durability * 0.4).max(0.6),
            speed: (1.0 - damage.leg / durability.leg_durability * 0.3).max(0.7),
        }
    }
}

/// Hit probability for an attack/defense pair, clamped to `[0.2, 0.9]`.
#[must_use]
pub fn hit_chance(attack: f64, defense: f64) -> f64 {
    (0.5 + (attack - defense) / 200.0).clamp(0.2, 0.9)
}

/// Map a uniform roll in `[0, 1)` onto an outcome band.
///
/// Clean below `0.6 * hit`, partial below `hit`, blocked below `hit + 0.2`,
/// missed otherwise.
#[must_use]
pub fn classify_strike(hit: f64, roll: f64) -> StrikeOutcome {
    if roll < hit * 0.6 {
        StrikeOutcome::LandedClean
    } else if roll < hit {
        StrikeOutcome::LandedPartial
    } else if roll < hit + 0.2 {
        StrikeOutcome::Blocked
    } else {
        StrikeOutcome::Missed
    }
}

/// What one exchange did.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeReport {
    /// Archetype resolved.
    pub archetype: Archetype,
    /// Events in emission order.
    pub events: Vec<EventKind>,
    /// Damage dealt by each side this exchange.
    pub damage_dealt: [f64; 2],
    /// Stamina actually spent by each side after the floor.
    pub stamina_spent: [f64; 2],
}

impl ExchangeReport {
    fn new(archetype: Archetype) -> Self {
        Self {
            archetype,
            events: Vec::new(),
            damage_dealt: [0.0; 2],
            stamina_spent: [0.0; 2],
        }
    }
}

fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

fn percent_roll<R: Rng + ?Sized>(rng: &mut R, percent: f64) -> bool {
    rng.gen::<f64>() * 100.0 < percent
}

/// Resolves exchanges for a fixed pair of fighters.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeResolver<'a> {
    fighters: &'a [Fighter; 2],
    config: &'a BoutConfig,
}

impl<'a> ExchangeResolver<'a> {
    /// Create a resolver.
    #[must_use]
    pub fn new(fighters: &'a [Fighter; 2], config: &'a BoutConfig) -> Self {
        Self { fighters, config }
    }

    /// Resolve one exchange with a uniformly drawn archetype.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        states: &mut [CombatantState; 2],
        rng: &mut R,
    ) -> ExchangeReport {
        let archetype = pick(rng, &Archetype::ALL);
        trace!(?archetype, "Exchange archetype selected");
        self.resolve_as(archetype, states, rng)
    }

    /// Resolve one exchange of a given archetype.
    pub fn resolve_as<R: Rng + ?Sized>(
        &self,
        archetype: Archetype,
        states: &mut [CombatantState; 2],
        rng: &mut R,
    ) -> ExchangeReport {
        // Multipliers are fixed for the whole exchange, even after damage lands.
        let snapshot = [self.snapshot(states, Side::A), self.snapshot(states, Side::B)];
        let mut report = ExchangeReport::new(archetype);

        match archetype {
            Archetype::Striking => self.striking(states, &snapshot, &mut report, rng),
            Archetype::LegKick => self.leg_kick(states, &snapshot, &mut report, rng),
            Archetype::Clinch => self.clinch(states, &snapshot, &mut report, rng),
            Archetype::Defensive => self.defensive(states, &snapshot, &mut report, rng),
        }
        report
    }

    fn snapshot(&self, states: &[CombatantState; 2], side: Side) -> Snapshot {
        let state = &states[side.index()];
        let degradation =
            Degradation::from_damage(&state.damage, self.fighters[side.index()].durability());
        Snapshot {
            degradation,
            effectiveness: state.stamina / 100.0 * degradation.power,
        }
    }

    fn fighter(&self, side: Side) -> &Fighter {
        &self.fighters[side.index()]
    }

    fn spend(
        &self,
        states: &mut [CombatantState; 2],
        report: &mut ExchangeReport,
        side: Side,
        cost: f64,
    ) {
        let state = &mut states[side.index()];
        let before = state.stamina;
        state.spend_stamina(cost, self.config.stamina_floor);
        report.stamina_spent[side.index()] += (before - state.stamina).max(0.0);
    }

    fn land(
        states: &mut [CombatantState; 2],
        report: &mut ExchangeReport,
        attacker: Side,
        zone: TargetZone,
        damage: f64,
        cause: MoveType,
    ) {
        states[attacker.opponent().index()].take_damage(zone, damage, cause);
        report.damage_dealt[attacker.index()] += damage;
    }

    fn striking<R: Rng + ?Sized>(
        &self,
        states: &mut [CombatantState; 2],
        snap: &[Snapshot; 2],
        report: &mut ExchangeReport,
        rng: &mut R,
    ) {
        let targets_body = Side::BOTH
            .map(|side| percent_roll(rng, self.fighter(side).style().body_attack_preference));
        let power_shot = Side::BOTH
            .map(|side| percent_roll(rng, self.fighter(side).style().power_punch_frequency));

        for attacker in Side::BOTH {
            let i = attacker.index();
            let defender = attacker.opponent();
            let (move_type, zone) = select_strike(rng, power_shot[i], targets_body[i]);

            let atk = self.fighter(attacker).stats();
            let def = self.fighter(defender).stats();
            let a = &snap[i];
            let d = &snap[defender.index()];

            let attack = (atk.power * a.degradation.power + atk.speed * a.degradation.speed)
                * a.effectiveness;
            let defense = (def.defense * d.degradation.defense + def.speed * d.degradation.speed)
                * d.effectiveness;
            let outcome = classify_strike(hit_chance(attack, defense), rng.gen());

            if outcome.landed() {
                let damage =
                    atk.power * a.degradation.power * outcome.damage_factor() * STRIKE_DAMAGE;
                Self::land(states, report, attacker, zone, damage, move_type);
                report.events.push(EventKind::Strike {
                    attacker,
                    defender,
                    move_type,
                    target_zone: zone,
                    outcome,
                    damage,
                    is_power_shot: power_shot[i],
                });
            }

            let cost = if power_shot[i] {
                POWER_STRIKE_COST
            } else {
                SETUP_STRIKE_COST
            };
            self.spend(states, report, attacker, cost);
        }
    }

    fn leg_kick<R: Rng + ?Sized>(
        &self,
        states: &mut [CombatantState; 2],
        snap: &[Snapshot; 2],
        report: &mut ExchangeReport,
        rng: &mut R,
    ) {
        let attacker = pick(rng, &Side::BOTH);
        let defender = attacker.opponent();
        let a = &snap[attacker.index()];
        let d = &snap[defender.index()];
        let power = self.fighter(attacker).stats().power;

        let attack = power * a.degradation.power * a.effectiveness;
        let defense =
            self.fighter(defender).stats().defense * d.degradation.defense * d.effectiveness;
        let outcome = classify_strike(hit_chance(attack, defense), rng.gen());

        if outcome.landed() {
            let damage = power * a.degradation.power * outcome.damage_factor() * LEG_KICK_DAMAGE;
            Self::land(states, report, attacker, TargetZone::Legs, damage, MoveType::LegKick);
            report.events.push(EventKind::Strike {
                attacker,
                defender,
                move_type: MoveType::LegKick,
                target_zone: TargetZone::Legs,
                outcome,
                damage,
                is_power_shot: false,
            });
        }
        self.spend(states, report, attacker, LEG_KICK_COST);
    }

    fn clinch<R: Rng + ?Sized>(
        &self,
        states: &mut [CombatantState; 2],
        snap: &[Snapshot; 2],
        report: &mut ExchangeReport,
        rng: &mut R,
    ) {
        if !states[0].in_clinch {
            let initiator = pick(rng, &Side::BOTH);
            for state in states.iter_mut() {
                state.in_clinch = true;
            }
            report.events.push(EventKind::Clinch {
                initiator,
                move_type: MoveType::ClinchEntry,
                outcome: StrikeOutcome::LandedClean,
                damage: 0.0,
            });
        }

        let clinch_power = Side::BOTH.map(|side| {
            let s = &snap[side.index()];
            self.fighter(side).stats().clinch * s.degradation.power * s.effectiveness
        });

        let dominant = if clinch_power[0] > clinch_power[1] {
            Some(Side::A)
        } else if clinch_power[1] > clinch_power[0] {
            Some(Side::B)
        } else {
            None
        };

        if let Some(dominant) = dominant {
            let gap = clinch_power[dominant.index()] - clinch_power[dominant.opponent().index()];
            let damage = gap * CLINCH_DAMAGE;
            Self::land(states, report, dominant, TargetZone::Body, damage, MoveType::ClinchKnee);
            report.events.push(EventKind::Clinch {
                initiator: dominant,
                move_type: MoveType::ClinchKnee,
                outcome: StrikeOutcome::LandedClean,
                damage,
            });
        }

        for side in Side::BOTH {
            self.spend(states, report, side, CLINCH_COST);
        }

        if rng.gen::<f64>() < self.config.clinch_exit_chance {
            let breaker = pick(rng, &Side::BOTH);
            for state in states.iter_mut() {
                state.in_clinch = false;
            }
            report.events.push(EventKind::ClinchExit { breaker });
        }
    }

    // Low-action filler: the attempt is rolled but never produces damage or
    // an event, only the attacker's stamina cost.
    fn defensive<R: Rng + ?Sized>(
        &self,
        states: &mut [CombatantState; 2],
        snap: &[Snapshot; 2],
        report: &mut ExchangeReport,
        rng: &mut R,
    ) {
        let attacker = pick(rng, &Side::BOTH);
        let defender = attacker.opponent();
        let a = &snap[attacker.index()];
        let d = &snap[defender.index()];

        let attack =
            self.fighter(attacker).stats().power * a.degradation.power * a.effectiveness * 0.7;
        let defense =
            self.fighter(defender).stats().defense * d.degradation.defense * d.effectiveness * 1.3;
        let mut outcome = classify_strike(hit_chance(attack, defense), rng.gen());
        if outcome == StrikeOutcome::LandedClean {
            outcome = StrikeOutcome::LandedPartial;
        }
        trace!(?attacker, ?outcome, "Defensive exchange");

        self.spend(states, report, attacker, DEFENSIVE_COST);
    }
}

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    degradation: Degradation,
    effectiveness: f64,
}

fn select_strike<R: Rng + ?Sized>(
    rng: &mut R,
    power_shot: bool,
    targets_body: bool,
) -> (MoveType, TargetZone) {
    match (targets_body, power_shot) {
        (true, true) => (pick(rng, &BODY_POWER_MOVES), TargetZone::Body),
        (true, false) => (MoveType::BodyPunch, TargetZone::Body),
        (false, true) => (pick(rng, &HEAD_POWER_MOVES), TargetZone::Head),
        (false, false) => (pick(rng, &HEAD_SETUP_MOVES), TargetZone::Head),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::profile::{FighterProfile, FightingStyle, PhysicalAttributes, TrainingProfile};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fighter(name: &str, clinch_hours: u32) -> Fighter {
        Fighter::new(FighterProfile {
            id: name.to_lowercase(),
            name: name.to_string(),
            discipline: "Muay Thai".to_string(),
            physical: PhysicalAttributes {
                height_cm: 175.0,
                weight_kg: 70.0,
                age: 25,
                muscle_mass_percent: 75.0,
                fast_twitch_ratio: 60.0,
            },
            training: TrainingProfile {
                striking_hours: 800,
                clinch_hours,
                cardio_hours: 400,
                sparring_hours: 600,
            },
            style: FightingStyle::default(),
            durability: Durability::default(),
        })
        .unwrap()
    }

    fn fresh() -> [CombatantState; 2] {
        [
            CombatantState::new(Vec2::new(-2.0, 0.0)),
            CombatantState::new(Vec2::new(2.0, 0.0)),
        ]
    }

    // Every draw from this source is zero: first choice, every roll passes.
    fn zeros() -> StepRng {
        StepRng::new(0, 0)
    }

    #[test]
    fn test_classify_strike_bands() {
        let hit = 0.5;
        assert_eq!(classify_strike(hit, 0.0), StrikeOutcome::LandedClean);
        assert_eq!(classify_strike(hit, 0.29), StrikeOutcome::LandedClean);
        assert_eq!(classify_strike(hit, 0.3), StrikeOutcome::LandedPartial);
        assert_eq!(classify_strike(hit, 0.49), StrikeOutcome::LandedPartial);
        assert_eq!(classify_strike(hit, 0.5), StrikeOutcome::Blocked);
        assert_eq!(classify_strike(hit, 0.69), StrikeOutcome::Blocked);
        assert_eq!(classify_strike(hit, 0.7), StrikeOutcome::Missed);
    }

    #[test]
    fn test_hit_chance_clamped() {
        assert_eq!(hit_chance(500.0, 0.0), 0.9);
        assert_eq!(hit_chance(0.0, 500.0), 0.2);
        assert!((hit_chance(60.0, 40.0) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_degradation_floors() {
        let durability = Durability::default();
        let fresh = Degradation::from_damage(&ZoneDamage::default(), &durability);
        assert_eq!(fresh.defense, 1.0);
        assert_eq!(fresh.power, 1.0);
        assert_eq!(fresh.speed, 1.0);

        let wrecked = ZoneDamage {
            head: 500.0,
            body: 500.0,
            leg: 500.0,
        };
        let worst = Degradation::from_damage(&wrecked, &durability);
        assert_eq!(worst.defense, 0.5);
        assert_eq!(worst.power, 0.6);
        assert_eq!(worst.speed, 0.7);
    }

    #[test]
    fn test_degradation_partial() {
        let durability = Durability::default();
        let damage = ZoneDamage {
            head: 14.0,
            body: 0.0,
            leg: 0.0,
        };
        let d = Degradation::from_damage(&damage, &durability);
        // 1 - 14/70 * 0.5
        assert!((d.defense - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_striking_both_land_with_zero_draws() {
        let fighters = [fighter("Red", 500), fighter("Blue", 500)];
        let config = BoutConfig::default();
        let resolver = ExchangeResolver::new(&fighters, &config);
        let mut states = fresh();

        let report = resolver.resolve_as(Archetype::Striking, &mut states, &mut zeros());
        assert_eq!(report.events.len(), 2);
        for event in &report.events {
            match event {
                EventKind::Strike {
                    move_type,
                    target_zone,
                    outcome,
                    is_power_shot,
                    damage,
                    ..
                } => {
                    assert_eq!(*move_type, MoveType::BodyPunch);
                    assert_eq!(*target_zone, TargetZone::Body);
                    assert_eq!(*outcome, StrikeOutcome::LandedClean);
                    assert!(*is_power_shot);
                    // power 36.3 * 1.0 * 1.0 * 0.15
                    assert!((damage - 5.445).abs() < 1e-9);
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        for state in &states {
            assert_eq!(state.stamina, 98.0);
            assert!((state.damage.body - 5.445).abs() < 1e-9);
            assert_eq!(state.last_landed, Some(MoveType::BodyPunch));
        }
        assert_eq!(report.stamina_spent, [2.0, 2.0]);
    }

    #[test]
    fn test_clinch_entry_damage_and_exit() {
        let fighters = [fighter("Grappler", 900), fighter("Striker", 100)];
        let config = BoutConfig::default();
        let resolver = ExchangeResolver::new(&fighters, &config);
        let mut states = fresh();

        let report = resolver.resolve_as(Archetype::Clinch, &mut states, &mut zeros());
        let names: Vec<_> = report.events.iter().map(EventKind::name).collect();
        assert_eq!(names, ["CLINCH", "CLINCH", "CLINCH_EXIT"]);

        match &report.events[1] {
            EventKind::Clinch {
                initiator,
                move_type,
                damage,
                ..
            } => {
                assert_eq!(*initiator, Side::A);
                assert_eq!(*move_type, MoveType::ClinchKnee);
                // (90 - 10) * 0.1
                assert!((damage - 8.0).abs() < 1e-9);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!((states[1].damage.body - 8.0).abs() < 1e-9);
        assert_eq!(states[0].health, 100.0);
        assert!(!states[0].in_clinch && !states[1].in_clinch);
        assert_eq!(states[0].stamina, 98.0);
        assert_eq!(states[1].stamina, 98.0);
    }

    #[test]
    fn test_clinch_without_advantage_deals_nothing() {
        let fighters = [fighter("Even", 500), fighter("Steven", 500)];
        let config = BoutConfig {
            clinch_exit_chance: 0.0,
            ..BoutConfig::default()
        };
        let resolver = ExchangeResolver::new(&fighters, &config);
        let mut states = fresh();

        let report = resolver.resolve_as(Archetype::Clinch, &mut states, &mut zeros());
        assert_eq!(report.events.len(), 1);
        assert!(states[0].in_clinch);
        assert_eq!(report.damage_dealt, [0.0, 0.0]);

        // Already tied up: no second entry event.
        let report = resolver.resolve_as(Archetype::Clinch, &mut states, &mut zeros());
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_defensive_is_silent() {
        let fighters = [fighter("Red", 500), fighter("Blue", 500)];
        let config = BoutConfig::default();
        let resolver = ExchangeResolver::new(&fighters, &config);
        let mut states = fresh();

        let report = resolver.resolve_as(Archetype::Defensive, &mut states, &mut zeros());
        assert!(report.events.is_empty());
        assert_eq!(states[0].stamina, 99.5);
        assert_eq!(states[1].stamina, 100.0);
        assert_eq!(states[1].health, 100.0);
    }

    #[test]
    fn test_leg_kick_hits_legs_only() {
        let fighters = [fighter("Red", 500), fighter("Blue", 500)];
        let config = BoutConfig::default();
        let resolver = ExchangeResolver::new(&fighters, &config);
        let mut states = fresh();

        let report = resolver.resolve_as(Archetype::LegKick, &mut states, &mut zeros());
        assert_eq!(report.events.len(), 1);
        assert!((states[1].damage.leg - 36.3 * 0.12).abs() < 1e-9);
        assert_eq!(states[1].damage.head, 0.0);
        assert_eq!(states[1].damage.body, 0.0);
        assert_eq!(states[0].stamina, 98.5);
    }

    #[test]
    fn test_stamina_floor_respected() {
        let fighters = [fighter("Red", 500), fighter("Blue", 500)];
        let config = BoutConfig::default();
        let resolver = ExchangeResolver::new(&fighters, &config);
        let mut states = fresh();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..400 {
            resolver.resolve(&mut states, &mut rng);
            for state in &states {
                assert!(state.stamina >= config.stamina_floor);
                assert!(state.health >= 0.0);
            }
        }
    }
}
