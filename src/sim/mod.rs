//! Locomotion simulation module
//!
//! Everything the creature does lives here. This module must stay pure:
//! - One fixed step per frame, no delta time
//! - Input arrives as a snapshot, never read from globals
//! - No rendering or platform dependencies

pub mod input;
pub mod locomotion;
pub mod pose;

pub use input::{DrainReport, InputEvent, InputQueue, InputState, Key};
pub use locomotion::{LocomotionController, LocomotionFrame, MoveIntent, step};
pub use pose::{CreaturePose, FootOffset, Gait, LimbOffsets};
