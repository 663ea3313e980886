//! Scene description for the render host
//!
//! Turns the creature pose into a flat list of box/plane instances plus the
//! lights. Nothing in here touches the GPU, so all of it is unit-testable.

pub mod camera;
pub mod creature;

pub use camera::{CameraMode, CameraState, OrbitControls, Projection};
pub use creature::{BodyPart, PartInstance};

use glam::{Mat4, Vec3};

use crate::sim::{CreaturePose, LimbOffsets};

/// Ground plane extent along X
pub const GROUND_WIDTH: f32 = 800.0;
/// Ground plane extent along Z
pub const GROUND_DEPTH: f32 = 100.0;
/// Length of each axis in the axes helper
pub const AXES_LENGTH: f32 = 2000.0;
const AXES_THICKNESS: f32 = 0.03;
/// Keeps the axes helper from z-fighting with the ground
const AXES_LIFT: f32 = 0.01;

/// Colors
pub mod color {
    pub const GROUND: u32 = 0xebe5e7;
    pub const AMBIENT: u32 = 0x444444;
    pub const SPOT_LIGHT: u32 = 0xffffff;
    pub const TORSO: u32 = 0xad3525;
    pub const SKIN: u32 = 0xfdd276;
    pub const EYE: u32 = 0xffffff;
    pub const BLACK: u32 = 0x000000;
    pub const AXIS_X: u32 = 0xff0000;
    pub const AXIS_Y: u32 = 0x00ff00;
    pub const AXIS_Z: u32 = 0x0000ff;
    pub const BACKGROUND: u32 = 0x000000;

    fn srgb_to_linear(c: f32) -> f32 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    /// Packed sRGB hex (0xRRGGBB) to opaque linear RGBA
    pub fn hex(rgb: u32) -> [f32; 4] {
        let channel = |shift: u32| srgb_to_linear(((rgb >> shift) & 0xff) as f32 / 255.0);
        [channel(16), channel(8), channel(0), 1.0]
    }

    /// Packed sRGB hex to linear RGB
    pub fn hex_rgb(rgb: u32) -> [f32; 3] {
        let [r, g, b, _] = hex(rgb);
        [r, g, b]
    }
}

/// Which unit mesh an instance is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mesh {
    /// Unit cube centered at the origin
    Cube,
    /// Unit quad in the XZ plane, double-sided
    Plane,
}

/// Lambert surfaces react to lights, unlit ones show their flat color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    Lambert,
    Unlit,
}

/// One object to draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub mesh: Mesh,
    pub model: Mat4,
    pub color: [f32; 4],
    pub shading: Shading,
}

/// Everything the renderer needs for one frame (except the camera)
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub instances: Vec<Instance>,
}

impl DrawList {
    pub fn with_mesh(&self, mesh: Mesh) -> impl Iterator<Item = &Instance> {
        self.instances.iter().filter(move |i| i.mesh == mesh)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Ambient plus a single spot light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: [f32; 3],
    pub spot_position: Vec3,
    pub spot_color: [f32; 3],
    pub spot_target: Vec3,
    /// Half-angle of the spot cone (radians)
    pub spot_angle: f32,
}

/// Static scene content around the creature
#[derive(Debug, Clone)]
pub struct Scene {
    pub lighting: Lighting,
    static_instances: Vec<Instance>,
}

impl Scene {
    /// Build the scene for a canvas of the given logical size.
    /// The spot light is placed relative to the canvas size.
    pub fn new(width: u32, height: u32) -> Self {
        let lighting = Lighting {
            ambient: color::hex_rgb(color::AMBIENT),
            spot_position: Vec3::new(width as f32 / 2.0, height as f32 / 2.0, 600.0),
            spot_color: color::hex_rgb(color::SPOT_LIGHT),
            spot_target: Vec3::ZERO,
            spot_angle: std::f32::consts::FRAC_PI_3,
        };

        let mut static_instances = vec![Instance {
            mesh: Mesh::Plane,
            model: Mat4::from_scale(Vec3::new(GROUND_WIDTH, 1.0, GROUND_DEPTH)),
            color: color::hex(color::GROUND),
            shading: Shading::Unlit,
        }];
        static_instances.extend(axes_helper(AXES_LENGTH));

        Self {
            lighting,
            static_instances,
        }
    }

    /// Ground, axes and the creature in its current pose
    pub fn draw_list(&self, pose: &CreaturePose, limbs: &LimbOffsets) -> DrawList {
        let creature = creature::build(pose, limbs);
        let mut instances = Vec::with_capacity(self.static_instances.len() + creature.len());
        instances.extend_from_slice(&self.static_instances);
        instances.extend(creature.into_iter().map(|p| Instance {
            mesh: Mesh::Cube,
            model: p.model,
            color: p.color,
            shading: Shading::Lambert,
        }));
        DrawList { instances }
    }
}

/// Thin boxes along +X, +Y and +Z
fn axes_helper(length: f32) -> [Instance; 3] {
    let axis = |dir: Vec3, rgb: u32| {
        let size = dir * length + (Vec3::ONE - dir) * AXES_THICKNESS;
        Instance {
            mesh: Mesh::Cube,
            model: Mat4::from_translation(dir * (length / 2.0) + Vec3::Y * AXES_LIFT)
                * Mat4::from_scale(size),
            color: color::hex(rgb),
            shading: Shading::Unlit,
        }
    };
    [
        axis(Vec3::X, color::AXIS_X),
        axis(Vec3::Y, color::AXIS_Y),
        axis(Vec3::Z, color::AXIS_Z),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(color::hex(0x000000), [0.0, 0.0, 0.0, 1.0]);
        for c in color::hex(0xffffff) {
            assert!((c - 1.0).abs() < 1e-5);
        }
        let [r, g, b, a] = color::hex(0xad3525);
        assert!(r > g && r > b);
        assert_eq!(a, 1.0);
    }

    #[test]
    fn test_spot_light_follows_canvas_size() {
        let scene = Scene::new(1360, 700);
        assert_eq!(scene.lighting.spot_position, Vec3::new(680.0, 350.0, 600.0));
    }

    #[test]
    fn test_draw_list_contents() {
        let scene = Scene::new(1360, 700);
        let list = scene.draw_list(&CreaturePose::default(), &LimbOffsets::rest());

        assert_eq!(list.with_mesh(Mesh::Plane).count(), 1);
        let lit = list
            .instances
            .iter()
            .filter(|i| i.shading == Shading::Lambert)
            .count();
        assert_eq!(lit, BodyPart::ALL.len());
        // Ground + 3 axes + creature
        assert_eq!(list.len(), 4 + BodyPart::ALL.len());
    }

    #[test]
    fn test_ground_spans_plane() {
        let scene = Scene::new(800, 600);
        let list = scene.draw_list(&CreaturePose::default(), &LimbOffsets::rest());
        let ground = list.with_mesh(Mesh::Plane).next().map(|i| i.model);
        let corner = ground.map(|m| m.transform_point3(Vec3::new(0.5, 0.0, 0.5)));
        assert_eq!(corner, Some(Vec3::new(400.0, 0.0, 50.0)));
    }

    #[test]
    fn test_axes_helper_extents() {
        let [x, y, z] = axes_helper(10.0);
        let far_x = x.model.transform_point3(Vec3::new(0.5, 0.0, 0.0));
        assert!((far_x.x - 10.0).abs() < 1e-4);
        let far_y = y.model.transform_point3(Vec3::new(0.0, 0.5, 0.0));
        assert!((far_y.y - 10.0 - AXES_LIFT).abs() < 1e-4);
        let far_z = z.model.transform_point3(Vec3::new(0.0, 0.0, 0.5));
        assert!((far_z.z - 10.0).abs() < 1e-4);
    }
}
