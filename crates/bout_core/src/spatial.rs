//! Capsule proximity model and in-round movement.
//!
//! Each fighter is six capsules (torso, head, both arms, both legs) sized
//! from standing height. Capsules only keep the fighters at plausible
//! distances; they play no part in damage targeting.
//!
//! # Distance approximation
//!
//! [`capsule_distance`] is the distance between the two segment midpoints
//! minus both radii. It is not the true segment-to-segment distance. The
//! separation constants in [`SpatialConfig`] are calibrated against this
//! approximation, so it must not be replaced by exact capsule geometry
//! without retuning them.
//!
//! Collision *detection* takes the minimum over all 36 capsule pairs.
//! Collision *resolution* only looks at the torso pair and pushes the
//! fighters apart symmetrically until the torso separation meets the
//! configured minimum.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::SpatialConfig;
use crate::math::{Vec2, Vec3};

/// Below this planar distance the push direction is undefined and
/// [`FALLBACK_DIRECTION`] is used instead.
pub const DEGENERATE_DISTANCE: f64 = 0.01;

/// Push direction (from B toward A) for coincident fighters.
pub const FALLBACK_DIRECTION: Vec2 = Vec2::new(1.0, 0.0);

// Added to the resolved separation so the post-push check is not undone by
// rounding in the square root.
const SEPARATION_SLACK: f64 = 1e-9;

/// Line segment with a radius, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    /// Segment start.
    pub start: Vec3,
    /// Segment end.
    pub end: Vec3,
    /// Radius around the segment.
    pub radius: f64,
}

impl Capsule {
    /// Create a capsule.
    #[must_use]
    pub const fn new(start: Vec3, end: Vec3, radius: f64) -> Self {
        Self { start, end, radius }
    }

    /// Segment midpoint.
    #[must_use]
    pub fn midpoint(&self) -> Vec3 {
        self.start.midpoint(self.end)
    }

    /// The same capsule moved along the floor.
    #[must_use]
    pub fn translated(&self, by: Vec2) -> Self {
        Self::new(self.start.offset(by), self.end.offset(by), self.radius)
    }
}

/// Approximate surface distance between two capsules.
///
/// Midpoint distance minus both radii; negative when the volumes overlap.
#[must_use]
pub fn capsule_distance(a: &Capsule, b: &Capsule) -> f64 {
    a.midpoint().distance(b.midpoint()) - a.radius - b.radius
}

/// Body capsules of one fighter in fighter-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterCapsules {
    parts: [Capsule; 6],
}

impl FighterCapsules {
    const TORSO: usize = 0;

    /// Build the capsule set for a fighter of the given height.
    #[must_use]
    pub fn from_height(height_cm: f64) -> Self {
        let h = height_cm / 100.0;
        let hip = h * 0.3;
        let shoulder = h * 0.85;

        let torso = Capsule::new(Vec3::new(0.0, hip, 0.0), Vec3::new(0.0, shoulder, 0.0), 0.25);
        let head = Capsule::new(Vec3::new(0.0, shoulder, 0.0), Vec3::new(0.0, h, 0.0), 0.12);
        let arm = |side: f64| {
            Capsule::new(
                Vec3::new(0.25 * side, shoulder - 0.05, 0.0),
                Vec3::new(0.65 * side, shoulder - 0.45, 0.15),
                0.08,
            )
        };
        let leg = |side: f64| {
            Capsule::new(
                Vec3::new(0.15 * side, hip, 0.0),
                Vec3::new(0.15 * side, 0.0, 0.0),
                0.10,
            )
        };

        Self {
            parts: [torso, head, arm(-1.0), arm(1.0), leg(-1.0), leg(1.0)],
        }
    }

    /// Local torso capsule.
    #[must_use]
    pub fn torso(&self) -> &Capsule {
        &self.parts[Self::TORSO]
    }

    /// All six capsules translated to a floor position.
    pub fn at(&self, position: Vec2) -> impl Iterator<Item = Capsule> + '_ {
        self.parts.iter().map(move |c| c.translated(position))
    }
}

/// Proximity and movement rules for the two fighters in the ring.
///
/// Positions are owned by the caller and passed in as a `[Vec2; 2]`
/// indexed by side.
#[derive(Debug, Clone, PartialEq)]
pub struct RingModel {
    capsules: [FighterCapsules; 2],
    config: SpatialConfig,
}

impl RingModel {
    /// Build the model for two fighters' heights (cm), indexed by side.
    #[must_use]
    pub fn new(heights_cm: [f64; 2], config: SpatialConfig) -> Self {
        Self {
            capsules: heights_cm.map(FighterCapsules::from_height),
            config,
        }
    }

    /// Spatial configuration in use.
    #[must_use]
    pub fn config(&self) -> &SpatialConfig {
        &self.config
    }

    /// Minimum approximate distance over all 36 capsule pairs.
    #[must_use]
    pub fn min_distance(&self, positions: &[Vec2; 2]) -> f64 {
        let mut min = f64::INFINITY;
        for a in self.capsules[0].at(positions[0]) {
            for b in self.capsules[1].at(positions[1]) {
                min = min.min(capsule_distance(&a, &b));
            }
        }
        min
    }

    /// Approximate torso-to-torso separation.
    #[must_use]
    pub fn torso_separation(&self, positions: &[Vec2; 2]) -> f64 {
        capsule_distance(
            &self.capsules[0].torso().translated(positions[0]),
            &self.capsules[1].torso().translated(positions[1]),
        )
    }

    /// Whether any capsule pair is closer than the minimum separation.
    #[must_use]
    pub fn collides(&self, positions: &[Vec2; 2]) -> bool {
        self.min_distance(positions) < self.config.min_separation
    }

    /// Push the fighters apart along the line between them until the torso
    /// separation meets the minimum. No-op when it already does.
    ///
    /// Both fighters move the same distance, so the pair's midpoint is
    /// preserved. Coincident fighters are split along [`FALLBACK_DIRECTION`].
    pub fn resolve(&self, positions: &mut [Vec2; 2]) {
        if self.torso_separation(positions) >= self.config.min_separation {
            return;
        }

        let [a, b] = *positions;
        let direction = (a - b)
            .try_normalize(DEGENERATE_DISTANCE)
            .unwrap_or(FALLBACK_DIRECTION);

        let torso_a = self.capsules[0].torso();
        let torso_b = self.capsules[1].torso();
        let reach = self.config.min_separation + torso_a.radius + torso_b.radius;
        let rise = torso_a.midpoint().y - torso_b.midpoint().y;
        let planar = (reach * reach - rise * rise).max(0.0).sqrt() + SEPARATION_SLACK;

        let center = a.lerp(b, 0.5);
        let half = direction.scale(planar / 2.0);
        trace!(
            from = a.distance(b),
            to = planar,
            "Resolving torso overlap"
        );
        positions[0] = center + half;
        positions[1] = center - half;
    }

    /// Pull any fighter outside the ring radius back onto its edge.
    pub fn clamp_to_ring(&self, positions: &mut [Vec2; 2]) {
        let radius = self.config.ring_radius;
        for position in positions.iter_mut() {
            let distance = position.length();
            if distance > radius {
                *position = position.scale(radius / distance);
            }
        }
    }

    /// Advance positions by one exchange tick.
    ///
    /// In the clinch the fighters close toward the clinch distance. Outside
    /// it they drift together along a small random angle with
    /// `drift_chance` probability; a drift that would collide is replaced by
    /// a resolution pass. Either way the ring clamp and a final resolution
    /// run afterwards.
    pub fn step<R: Rng + ?Sized>(&self, positions: &mut [Vec2; 2], in_clinch: bool, rng: &mut R) {
        let speed = self.config.movement_speed;

        if in_clinch {
            let delta = positions[1] - positions[0];
            let distance = delta.length();
            if distance > self.config.clinch_distance {
                let toward = delta.scale(speed / distance);
                positions[0] += toward;
                positions[1] -= toward;
            }
        } else if rng.gen::<f64>() < self.config.drift_chance {
            let max = self.config.drift_max_angle;
            let angle: f64 = rng.gen_range(-max..=max);
            let offset = Vec2::new(angle.cos(), angle.sin()).scale(speed);
            let candidate = [positions[0] + offset, positions[1] - offset];
            if self.collides(&candidate) {
                self.resolve(positions);
            } else {
                *positions = candidate;
            }
        }

        self.clamp_to_ring(positions);
        self.resolve(positions);
    }
}
