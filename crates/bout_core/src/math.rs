//! Small vector and interpolation helpers for the ring model.
//!
//! The ring is a flat plane: positions live in `(x, z)` with `y` up.
//! Capsule endpoints need the vertical axis as well, so [`Vec3`] exists
//! for body geometry while [`Vec2`] carries floor positions.
//!
//! Determinism comes from the seeded random source and a fixed order of
//! operations, not from the number type, so plain `f64` is used throughout.

use serde::{Deserialize, Serialize};

/// Position on the ring floor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Left/right axis.
    pub x: f64,
    /// Forward/back axis.
    pub z: f64,
}

impl Vec2 {
    /// Create a new floor vector.
    #[must_use]
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Zero vector (ring center).
    pub const ZERO: Self = Self { x: 0.0, z: 0.0 };

    /// Squared length.
    #[must_use]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.z * other.z
    }

    /// Linearly interpolate between two vectors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: lerp(self.x, other.x, t),
            z: lerp(self.z, other.z, t),
        }
    }

    /// Scale both components.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.z * factor)
    }

    /// Unit vector in the same direction, or `None` when the length is
    /// below `epsilon`.
    #[must_use]
    pub fn try_normalize(self, epsilon: f64) -> Option<Self> {
        let len = self.length();
        if len < epsilon {
            return None;
        }
        Some(Self::new(self.x / len, self.z / len))
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            z: self.z + rhs.z,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            z: self.z - rhs.z,
        }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.z += rhs.z;
    }
}

impl std::ops::SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.z -= rhs.z;
    }
}

/// Point in fighter-local or world space (`y` is height above the canvas).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// Left/right.
    pub x: f64,
    /// Up.
    pub y: f64,
    /// Forward/back.
    pub z: f64,
}

impl Vec3 {
    /// Create a new 3D point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Midpoint between two points.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new(
            (self.x + other.x) / 2.0,
            (self.y + other.y) / 2.0,
            (self.z + other.z) / 2.0,
        )
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Shift along the floor plane, leaving height untouched.
    #[must_use]
    pub fn offset(self, by: Vec2) -> Self {
        Self::new(self.x + by.x, self.y, self.z + by.z)
    }
}

/// Linear interpolation between `start` and `end`.
#[must_use]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// Sine-based ease-in-out curve mapping `[0, 1]` onto `[0, 1]`.
#[must_use]
pub fn ease_in_out(t: f64) -> f64 {
    (1.0 - (t * std::f64::consts::PI).cos()) / 2.0
}

/// Round to one decimal place (half away from zero).
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
