//! Per-fighter mutable combat state.
//!
//! Both sides live in a flat `[CombatantState; 2]` indexed by [`Side`], so
//! every rule is written once and applied to either corner.

use serde::{Deserialize, Serialize};

use crate::events::{MoveType, TargetZone};
use crate::math::Vec2;

/// Which corner a fighter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// Red corner, fighter A.
    A,
    /// Blue corner, fighter B.
    B,
}

impl Side {
    /// Both sides in canonical order.
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    /// Array index for this side.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    /// The other corner.
    #[must_use]
    pub const fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Single-letter label used on the wire.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

/// Accumulated damage per target zone. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneDamage {
    /// Head damage.
    pub head: f64,
    /// Body damage.
    pub body: f64,
    /// Leg damage.
    pub leg: f64,
}

impl ZoneDamage {
    /// Mutable accumulator for a zone.
    pub fn zone_mut(&mut self, zone: TargetZone) -> &mut f64 {
        match zone {
            TargetZone::Head => &mut self.head,
            TargetZone::Body => &mut self.body,
            TargetZone::Legs => &mut self.leg,
        }
    }
}

/// Live state of one fighter during a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantState {
    /// Overall health, starts at 100 and only goes down.
    pub health: f64,
    /// Stamina, kept within `[floor, 100]`.
    pub stamina: f64,
    /// Zone damage accumulators.
    pub damage: ZoneDamage,
    /// Floor position.
    pub position: Vec2,
    /// Whether the fighter is tied up in the clinch.
    pub in_clinch: bool,
    /// Set once the fighter has been dropped into the knockdown band.
    pub knocked_down: bool,
    /// Last move that landed on this fighter.
    pub last_landed: Option<MoveType>,
}

/// Starting health and stamina.
pub const FULL: f64 = 100.0;

impl CombatantState {
    /// Fresh fighter at the given position.
    #[must_use]
    pub fn new(position: Vec2) -> Self {
        Self {
            health: FULL,
            stamina: FULL,
            damage: ZoneDamage::default(),
            position,
            in_clinch: false,
            knocked_down: false,
            last_landed: None,
        }
    }

    /// Apply landed damage to a zone and to overall health.
    ///
    /// Negative or non-finite amounts are ignored so health can never rise.
    pub fn take_damage(&mut self, zone: TargetZone, amount: f64, cause: MoveType) {
        if !(amount.is_finite() && amount > 0.0) {
            return;
        }
        *self.damage.zone_mut(zone) += amount;
        self.health = (self.health - amount).max(0.0);
        self.last_landed = Some(cause);
    }

    /// Deduct stamina, never dropping below `floor`.
    pub fn spend_stamina(&mut self, cost: f64, floor: f64) {
        self.stamina = (self.stamina - cost).max(floor);
    }

    /// Between-round recovery scaled by the fighter's recovery rate.
    ///
    /// Stamina gains 15 points at a 100% rate (capped at 100); head and leg
    /// damage heal 2 points, body damage 3, each floored at zero.
    pub fn recover(&mut self, recovery_rate: f64) {
        let rate = recovery_rate / 100.0;
        self.stamina = (self.stamina + 15.0 * rate).min(FULL);
        self.damage.head = (self.damage.head - 2.0 * rate).max(0.0);
        self.damage.body = (self.damage.body - 3.0 * rate).max(0.0);
        self.damage.leg = (self.damage.leg - 2.0 * rate).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::A.opponent(), Side::B);
        assert_eq!(Side::B.opponent(), Side::A);
        assert_eq!(Side::A.index(), 0);
        assert_eq!(Side::B.index(), 1);
    }

    #[test]
    fn test_take_damage_updates_zone_and_health() {
        let mut state = CombatantState::new(Vec2::ZERO);
        state.take_damage(TargetZone::Body, 4.5, MoveType::Knee);
        assert_eq!(state.damage.body, 4.5);
        assert_eq!(state.health, 95.5);
        assert_eq!(state.last_landed, Some(MoveType::Knee));
    }

    #[test]
    fn test_negative_damage_is_ignored() {
        let mut state = CombatantState::new(Vec2::ZERO);
        state.take_damage(TargetZone::Head, -3.0, MoveType::Jab);
        assert_eq!(state.health, FULL);
        assert_eq!(state.damage.head, 0.0);
        assert_eq!(state.last_landed, None);
    }

    #[test]
    fn test_health_floors_at_zero() {
        let mut state = CombatantState::new(Vec2::ZERO);
        state.take_damage(TargetZone::Head, 250.0, MoveType::HeadKick);
        assert_eq!(state.health, 0.0);
    }

    #[test]
    fn test_stamina_floor() {
        let mut state = CombatantState::new(Vec2::ZERO);
        state.stamina = 21.0;
        state.spend_stamina(2.0, 20.0);
        assert_eq!(state.stamina, 20.0);
    }

    #[test]
    fn test_recovery() {
        let mut state = CombatantState::new(Vec2::ZERO);
        state.stamina = 50.0;
        state.damage = ZoneDamage {
            head: 1.0,
            body: 10.0,
            leg: 5.0,
        };
        state.recover(60.0);
        assert!((state.stamina - 59.0).abs() < 1e-9);
        assert_eq!(state.damage.head, 0.0);
        assert!((state.damage.body - 8.2).abs() < 1e-9);
        assert!((state.damage.leg - 3.8).abs() < 1e-9);
    }

    #[test]
    fn test_recovery_caps_stamina() {
        let mut state = CombatantState::new(Vec2::ZERO);
        state.stamina = 95.0;
        state.recover(100.0);
        assert_eq!(state.stamina, FULL);
    }
}
