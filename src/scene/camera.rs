//! Camera: perspective projection, orbit controls and the side/behind framing
//!
//! The camera belongs to the render host. It reads the creature pose to frame
//! it but never feeds anything back into locomotion.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::heading_direction;
use crate::sim::CreaturePose;

/// Initial eye position
pub const DEFAULT_EYE: Vec3 = Vec3::new(0.0, 3.0, 10.0);
/// How far behind the creature the chase camera sits
pub const CHASE_DISTANCE: f32 = 10.0;
/// How far above the ground the chase camera sits
pub const CHASE_HEIGHT: f32 = 5.0;
/// Point on the creature the chase camera looks at
pub const CHASE_LOOK_HEIGHT: f32 = 2.5;
/// Keeps the orbit away from the poles where look_at degenerates
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            fov_y_deg: 80.0,
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 2000.0,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Mouse-driven orbit around a target point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    /// Rotation about +Y (radians, 0 = eye on +Z)
    pub yaw: f32,
    /// Elevation above the XZ plane (radians)
    pub pitch: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_zoom: bool,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::from_eye(DEFAULT_EYE, Vec3::ZERO)
    }
}

impl OrbitControls {
    /// Orbit that starts with the eye at `eye` looking at `target`
    pub fn from_eye(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            min_distance: 1.0,
            max_distance: 500.0,
            enable_zoom: true,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    /// Drag by a pixel delta; dragging right swings the eye to the left
    pub fn rotate(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw -= dx * sensitivity;
        self.pitch = (self.pitch + dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Wheel zoom. Positive delta (scroll down) moves away.
    pub fn zoom(&mut self, wheel_delta: f32, speed: f32) {
        if !self.enable_zoom {
            return;
        }
        let factor = (1.0 + wheel_delta * speed).max(0.1);
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }
}

/// Camera framing mode, toggled with the `c` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// Free orbit around the scene
    #[default]
    Side,
    /// Chase camera easing in behind the creature
    Behind,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::Side => CameraMode::Behind,
            CameraMode::Behind => CameraMode::Side,
        }
    }
}

/// Current eye/target and the framing mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub mode: CameraMode,
    /// Chase smoothing: each frame covers 1/lerp of the remaining distance
    pub lerp: f32,
    pub eye: Vec3,
    pub target: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(CameraMode::default())
    }
}

impl CameraState {
    pub fn new(mode: CameraMode) -> Self {
        Self {
            mode,
            lerp: 10.0,
            eye: DEFAULT_EYE,
            target: Vec3::ZERO,
        }
    }

    pub fn toggle(&mut self) {
        self.mode = self.mode.toggled();
        log::info!("Camera mode: {:?}", self.mode);
    }

    /// Where the chase camera wants to be for `pose`
    pub fn chase_goal(pose: &CreaturePose) -> (Vec3, Vec3) {
        let forward = heading_direction(pose.heading);
        let base = Vec3::new(pose.position.x, 0.0, pose.position.y);
        let eye = base - Vec3::new(forward.x, 0.0, forward.y) * CHASE_DISTANCE + Vec3::Y * CHASE_HEIGHT;
        let target = base + Vec3::Y * CHASE_LOOK_HEIGHT;
        (eye, target)
    }

    /// Advance one frame
    pub fn update(&mut self, orbit: &OrbitControls, pose: &CreaturePose) {
        match self.mode {
            CameraMode::Side => {
                self.eye = orbit.eye();
                self.target = orbit.target;
            }
            CameraMode::Behind => {
                let (eye, target) = Self::chase_goal(pose);
                let t = 1.0 / self.lerp.max(1.0);
                self.eye = self.eye.lerp(eye, t);
                self.target = self.target.lerp(target, t);
            }
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }
}
