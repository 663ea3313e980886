//! Per-frame locomotion step
//!
//! Maps the held keys and the previous pose to the next pose and limb offsets.
//! The step is total: every input produces a pose, nothing can fail.
//!
//! Ordering within a frame:
//! 1. advance the phase accumulator (also while idle, so the walk cycle resumes
//!    where it left off)
//! 2. resolve speed and turn from the keys
//! 3. apply the turn
//! 4. move along the *new* heading

use super::input::{InputState, Key};
use super::pose::{CreaturePose, Gait, LimbOffsets};
use crate::consts::*;
use crate::heading_direction;

/// Speed and turn resolved from one input snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveIntent {
    /// Ground speed (units/frame, negative walks backwards)
    pub speed: f32,
    /// Heading change (degrees/frame)
    pub turn: f32,
    pub walking: bool,
}

impl MoveIntent {
    /// Opposing keys do not cancel: forward beats backward, left beats right.
    pub fn from_input(input: &InputState) -> Self {
        let speed = if input.is_pressed(Key::Forward) {
            WALK_SPEED
        } else if input.is_pressed(Key::Backward) {
            -WALK_SPEED
        } else {
            0.0
        };

        let turn = if input.is_pressed(Key::TurnLeft) {
            -TURN_STEP_DEG
        } else if input.is_pressed(Key::TurnRight) {
            TURN_STEP_DEG
        } else {
            0.0
        };

        Self {
            speed,
            turn,
            walking: input.any_pressed(),
        }
    }
}

/// Result of one locomotion step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionFrame {
    pub pose: CreaturePose,
    pub limbs: LimbOffsets,
}

/// Advance the creature by one frame
pub fn step(prev: &CreaturePose, input: &InputState) -> LocomotionFrame {
    let intent = MoveIntent::from_input(input);

    let tick = prev.tick + TICK_STEP;
    let heading = prev.heading + intent.turn;
    let position = prev.position + heading_direction(heading) * intent.speed;

    let pose = CreaturePose {
        position,
        heading,
        tick,
        is_walking: intent.walking,
    };

    LocomotionFrame {
        pose,
        limbs: LimbOffsets::for_pose(&pose),
    }
}

/// Owns the creature pose and applies [`step`] once per frame
#[derive(Debug, Clone, Default)]
pub struct LocomotionController {
    pose: CreaturePose,
    limbs: LimbOffsets,
}

impl LocomotionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> &CreaturePose {
        &self.pose
    }

    pub fn limbs(&self) -> &LimbOffsets {
        &self.limbs
    }

    /// Run one frame and return the new limb offsets
    pub fn update(&mut self, input: &InputState) -> &LimbOffsets {
        let prev_gait = self.pose.gait();
        let frame = step(&self.pose, input);
        self.pose = frame.pose;
        self.limbs = frame.limbs;

        let gait = self.pose.gait();
        if gait != prev_gait {
            log::trace!(
                "{:?} -> {:?} at tick {:.1}, heading {}",
                prev_gait,
                gait,
                self.pose.tick,
                self.pose.heading
            );
        }
        if gait == Gait::Idle {
            debug_assert!(self.limbs.is_rest());
        }

        &self.limbs
    }

    /// Back to origin, heading 0, tick 0
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
