//! Box Walker - a procedurally animated box creature on a ground plane
//!
//! Core modules:
//! - `sim`: Locomotion controller (pure per-frame pose update) and input snapshots
//! - `scene`: Creature rig, camera and scene description consumed by the renderer
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Frame pacing for the browser's animation-frame callback
//! - `stats`: Frame rate counter for the HUD

pub mod error;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod stats;

pub use error::HostError;
pub use settings::Settings;

/// Locomotion and animation constants
pub mod consts {
    /// Fixed frame rate of the driving loop. The controller never scales by delta time.
    pub const FRAME_RATE_HZ: f64 = 60.0;

    /// Phase accumulator increment per frame. The accumulator is f64 so it keeps
    /// advancing by exactly this step in sessions that run for days.
    pub const TICK_STEP: f64 = 0.2;
    /// Ground speed while a move key is held (units/frame)
    pub const WALK_SPEED: f32 = 0.1;
    /// Heading change while a turn key is held (degrees/frame)
    pub const TURN_STEP_DEG: f32 = 1.0;
    /// Rotates the heading so that "forward" matches the creature's facing
    pub const FORWARD_OFFSET_DEG: f32 = 90.0;

    /// Radius of the circular foot path
    pub const FOOT_AMPLITUDE: f32 = 0.4;
    /// Center height of the circular foot path
    pub const FOOT_BASELINE: f32 = 0.6;
    /// Foot height when standing still
    pub const FOOT_REST_HEIGHT: f32 = 0.25;

    /// Peak arm swing (degrees)
    pub const ARM_SWING_DEG: f32 = 20.0;
    /// Peak head roll (degrees)
    pub const HEAD_TILT_DEG: f32 = 4.0;

    /// Torso height at rest
    pub const TORSO_BASELINE: f32 = 2.2;
    /// Torso bob amplitude while walking
    pub const TORSO_BOB: f32 = 0.1;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit direction on the ground plane (x, z) for a heading in degrees
#[inline]
pub fn heading_direction(heading_deg: f32) -> glam::Vec2 {
    let theta = (heading_deg + consts::FORWARD_OFFSET_DEG).to_radians();
    glam::Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
    }

    #[test]
    fn test_heading_direction_zero_points_along_z() {
        let dir = heading_direction(0.0);
        assert!(dir.x.abs() < 1e-6);
        assert!((dir.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_heading_direction_is_unit() {
        for h in [-720.0_f32, -45.0, 13.0, 90.0, 1000.0] {
            assert!((heading_direction(h).length() - 1.0).abs() < 1e-5);
        }
    }
}
