//! Creature pose and limb offsets
//!
//! The pose is the only state carried between frames. Limb offsets are
//! recomputed from the phase accumulator every frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::wrap_degrees;

/// Locomotion state, recomputed from input each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gait {
    #[default]
    Idle,
    Walking,
}

/// Position, heading and animation phase of the creature
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CreaturePose {
    /// Position on the ground plane (x, z)
    pub position: Vec2,
    /// Heading in degrees, accumulated without wrapping
    pub heading: f32,
    /// Phase accumulator driving the limb animation
    pub tick: f64,
    pub is_walking: bool,
}

impl CreaturePose {
    pub fn gait(&self) -> Gait {
        if self.is_walking { Gait::Walking } else { Gait::Idle }
    }

    /// Heading folded into [0, 360) for consumers that need a bounded angle
    pub fn wrapped_heading(&self) -> f32 {
        wrap_degrees(self.heading)
    }

    /// Yaw applied to the rendered creature (radians, about +Y)
    pub fn yaw_radians(&self) -> f32 {
        -self.heading.to_radians()
    }
}

/// Height and forward/back offset of one foot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FootOffset {
    pub height: f32,
    pub depth: f32,
}

impl FootOffset {
    pub const REST: FootOffset = FootOffset {
        height: FOOT_REST_HEIGHT,
        depth: 0.0,
    };

    /// Point on the circular foot path at `phase` radians
    fn on_path(phase: f32) -> Self {
        Self {
            height: FOOT_BASELINE + phase.sin() * FOOT_AMPLITUDE,
            depth: phase.cos() * FOOT_AMPLITUDE,
        }
    }
}

/// Per-frame limb transforms derived from the phase accumulator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimbOffsets {
    pub left_foot: FootOffset,
    pub right_foot: FootOffset,
    /// Arm pitch about the shoulder (degrees)
    pub left_arm_deg: f32,
    pub right_arm_deg: f32,
    /// Head roll (degrees)
    pub head_tilt_deg: f32,
    /// Torso center height
    pub torso_height: f32,
}

impl Default for LimbOffsets {
    fn default() -> Self {
        Self::rest()
    }
}

impl LimbOffsets {
    /// Canonical standing pose
    pub fn rest() -> Self {
        Self {
            left_foot: FootOffset::REST,
            right_foot: FootOffset::REST,
            left_arm_deg: 0.0,
            right_arm_deg: 0.0,
            head_tilt_deg: 0.0,
            torso_height: TORSO_BASELINE,
        }
    }

    /// Walk cycle at phase `tick`. Feet run half a cycle apart.
    pub fn walking(tick: f64) -> Self {
        use std::f32::consts::PI;

        // Fold in f64 before narrowing to f32
        let phase = tick.rem_euclid(std::f64::consts::TAU) as f32;
        Self {
            left_foot: FootOffset::on_path(-phase),
            right_foot: FootOffset::on_path(-phase - PI),
            left_arm_deg: phase.sin() * ARM_SWING_DEG,
            right_arm_deg: phase.cos() * ARM_SWING_DEG,
            head_tilt_deg: phase.sin() * HEAD_TILT_DEG,
            torso_height: TORSO_BASELINE - phase.sin() * TORSO_BOB,
        }
    }

    pub fn for_pose(pose: &CreaturePose) -> Self {
        if pose.is_walking {
            Self::walking(pose.tick)
        } else {
            Self::rest()
        }
    }

    pub fn is_rest(&self) -> bool {
        *self == Self::rest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_initial_pose() {
        let pose = CreaturePose::default();
        assert_eq!(pose.position, Vec2::ZERO);
        assert_eq!(pose.heading, 0.0);
        assert_eq!(pose.tick, 0.0);
        assert_eq!(pose.gait(), Gait::Idle);
    }

    #[test]
    fn test_rest_values() {
        let rest = LimbOffsets::rest();
        assert_eq!(rest.left_foot.height, 0.25);
        assert_eq!(rest.right_foot.height, 0.25);
        assert_eq!(rest.left_foot.depth, 0.0);
        assert_eq!(rest.torso_height, 2.2);
        assert_eq!(rest.head_tilt_deg, 0.0);
        assert!(rest.is_rest());
    }

    #[test]
    fn test_walk_cycle_at_phase_zero() {
        let limbs = LimbOffsets::walking(0.0);
        assert!((limbs.left_foot.depth - 0.4).abs() < EPS);
        assert!((limbs.left_foot.height - 0.6).abs() < EPS);
        assert!((limbs.right_foot.depth + 0.4).abs() < EPS);
        assert!((limbs.right_foot.height - 0.6).abs() < EPS);
        assert!(limbs.left_arm_deg.abs() < EPS);
        assert!((limbs.right_arm_deg - 20.0).abs() < EPS);
        assert!((limbs.torso_height - 2.2).abs() < EPS);
    }

    #[test]
    fn test_feet_are_half_a_cycle_apart() {
        for i in 0..50 {
            let tick = i as f64 * 0.37;
            let limbs = LimbOffsets::walking(tick);
            // Opposite points on the same circle
            assert!((limbs.left_foot.depth + limbs.right_foot.depth).abs() < 1e-4);
            assert!(
                (limbs.left_foot.height + limbs.right_foot.height - 2.0 * FOOT_BASELINE).abs()
                    < 1e-4
            );
        }
    }

    #[test]
    fn test_walk_cycle_stays_in_range() {
        for i in 0..200 {
            let limbs = LimbOffsets::walking(i as f64 * 0.2);
            assert!(limbs.left_arm_deg.abs() <= ARM_SWING_DEG + EPS);
            assert!(limbs.head_tilt_deg.abs() <= HEAD_TILT_DEG + EPS);
            assert!(limbs.left_foot.height >= FOOT_BASELINE - FOOT_AMPLITUDE - EPS);
            assert!(limbs.left_foot.height <= FOOT_BASELINE + FOOT_AMPLITUDE + EPS);
            assert!((limbs.torso_height - TORSO_BASELINE).abs() <= TORSO_BOB + EPS);
        }
    }

    #[test]
    fn test_walk_cycle_is_periodic_at_large_ticks() {
        use std::f64::consts::TAU;

        // Roughly four days of frames at 60 Hz
        let tick = 4_194_304.0 + 1.3;
        let far = LimbOffsets::walking(tick);
        let near = LimbOffsets::walking(tick.rem_euclid(TAU));
        assert!((far.left_foot.depth - near.left_foot.depth).abs() < 1e-4);
        assert!((far.left_arm_deg - near.left_arm_deg).abs() < 1e-3);
        assert!((far.torso_height - near.torso_height).abs() < 1e-4);

        // A single step still moves the limbs
        let next = LimbOffsets::walking(tick + TICK_STEP);
        assert!((next.left_foot.depth - far.left_foot.depth).abs() > 1e-3);
    }

    #[test]
    fn test_wrapped_heading() {
        let pose = CreaturePose {
            heading: -370.0,
            ..Default::default()
        };
        assert!((pose.wrapped_heading() - 350.0).abs() < 1e-3);
        assert!((pose.yaw_radians() - 370.0_f32.to_radians()).abs() < EPS);
    }
}
