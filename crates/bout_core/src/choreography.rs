//! Pre-fight glove-touch choreography.
//!
//! Fighters walk from their corners to the center, hold at the glove touch,
//! then walk back. Each frame is one pair of positions; the bout turns every
//! frame into a state update stamped at round 0.

use serde::{Deserialize, Serialize};

use crate::config::SpatialConfig;
use crate::math::{ease_in_out, Vec2};

/// Stage of the intro walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntroPhase {
    /// Easing from the corners toward the bump point.
    Approach,
    /// Holding at the bump point.
    BumpPause,
    /// Easing back to the corners.
    Retreat,
}

/// Iterator over the intro frames.
///
/// Yields `approach_steps + 1` approach frames (both endpoints included),
/// `bump_hold_frames` held frames, then `retreat_steps + 1` retreat frames.
#[derive(Debug, Clone)]
pub struct IntroSequence {
    corners: [Vec2; 2],
    bump: [Vec2; 2],
    approach_steps: u32,
    hold_frames: u32,
    retreat_steps: u32,
    phase: IntroPhase,
    frame: u32,
    done: bool,
}

impl IntroSequence {
    /// Build the sequence from the ring configuration.
    #[must_use]
    pub fn new(config: &SpatialConfig) -> Self {
        let corners = config.corners();
        let half = config.bump_distance / 2.0;
        // The bump point sits on the line between the corners.
        let bump = corners.map(|corner| {
            corner
                .try_normalize(f64::EPSILON)
                .map_or(corner, |dir| dir.scale(half))
        });

        Self {
            corners,
            bump,
            approach_steps: config.approach_steps.max(1),
            hold_frames: config.bump_hold_frames,
            retreat_steps: config.retreat_steps.max(1),
            phase: IntroPhase::Approach,
            frame: 0,
            done: false,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    /// Total number of frames this sequence yields.
    #[must_use]
    pub fn total_frames(&self) -> u32 {
        self.approach_steps + 1 + self.hold_frames + self.retreat_steps + 1
    }

    fn ease(from: [Vec2; 2], to: [Vec2; 2], step: u32, steps: u32) -> [Vec2; 2] {
        let t = ease_in_out(f64::from(step) / f64::from(steps));
        [from[0].lerp(to[0], t), from[1].lerp(to[1], t)]
    }
}

impl Iterator for IntroSequence {
    type Item = (IntroPhase, [Vec2; 2]);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            match self.phase {
                IntroPhase::Approach => {
                    if self.frame <= self.approach_steps {
                        let frame =
                            Self::ease(self.corners, self.bump, self.frame, self.approach_steps);
                        self.frame += 1;
                        return Some((IntroPhase::Approach, frame));
                    }
                    self.phase = IntroPhase::BumpPause;
                    self.frame = 0;
                }
                IntroPhase::BumpPause => {
                    if self.frame < self.hold_frames {
                        self.frame += 1;
                        return Some((IntroPhase::BumpPause, self.bump));
                    }
                    self.phase = IntroPhase::Retreat;
                    self.frame = 0;
                }
                IntroPhase::Retreat => {
                    if self.frame <= self.retreat_steps {
                        let frame =
                            Self::ease(self.bump, self.corners, self.frame, self.retreat_steps);
                        self.frame += 1;
                        return Some((IntroPhase::Retreat, frame));
                    }
                    self.done = true;
                }
            }
        }
    }
}
