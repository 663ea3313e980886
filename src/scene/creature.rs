//! Box creature rig
//!
//! A fixed hierarchy of boxes: root group -> torso, head group (face parts),
//! arms pivoting at the shoulder, and feet. Each part's world matrix already
//! includes its box size, so the renderer only needs a unit cube.

use glam::{Mat4, Vec3};

use super::color;
use crate::sim::{CreaturePose, FootOffset, LimbOffsets};

/// Height of the head group's origin
pub const HEAD_HEIGHT: f32 = 4.6;
/// Shoulder pivot height
pub const SHOULDER_HEIGHT: f32 = 2.8;
/// Shoulder pivot offset from the center line
pub const SHOULDER_OFFSET: f32 = 0.8;
/// Foot offset from the center line
pub const FOOT_OFFSET: f32 = 1.0;
/// Arm box length; arms hang this far below the shoulder
pub const ARM_LENGTH: f32 = 1.4;

/// Every box the creature is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Torso,
    Head,
    LeftEye,
    RightEye,
    LeftPupil,
    RightPupil,
    Mouth,
    LeftArm,
    RightArm,
    LeftFoot,
    RightFoot,
}

impl BodyPart {
    pub const ALL: [BodyPart; 11] = [
        BodyPart::Torso,
        BodyPart::Head,
        BodyPart::LeftEye,
        BodyPart::RightEye,
        BodyPart::LeftPupil,
        BodyPart::RightPupil,
        BodyPart::Mouth,
        BodyPart::LeftArm,
        BodyPart::RightArm,
        BodyPart::LeftFoot,
        BodyPart::RightFoot,
    ];

    /// Box dimensions (width, height, depth)
    pub fn size(self) -> Vec3 {
        match self {
            BodyPart::Torso => Vec3::new(1.0, 2.5, 1.0),
            BodyPart::Head => Vec3::splat(2.0),
            BodyPart::LeftEye | BodyPart::RightEye => Vec3::new(0.5, 0.5, 0.1),
            BodyPart::LeftPupil | BodyPart::RightPupil | BodyPart::Mouth => Vec3::splat(0.2),
            BodyPart::LeftArm | BodyPart::RightArm => Vec3::new(0.5, ARM_LENGTH, 0.5),
            BodyPart::LeftFoot | BodyPart::RightFoot => Vec3::new(0.5, 0.5, 1.5),
        }
    }

    pub fn color(self) -> [f32; 4] {
        match self {
            BodyPart::Torso => color::hex(color::TORSO),
            BodyPart::Head | BodyPart::LeftArm | BodyPart::RightArm => color::hex(color::SKIN),
            BodyPart::LeftEye | BodyPart::RightEye => color::hex(color::EYE),
            BodyPart::LeftPupil
            | BodyPart::RightPupil
            | BodyPart::Mouth
            | BodyPart::LeftFoot
            | BodyPart::RightFoot => color::hex(color::BLACK),
        }
    }

    /// Position inside the head group (face parts only)
    fn face_offset(self) -> Option<Vec3> {
        match self {
            BodyPart::Head => Some(Vec3::ZERO),
            BodyPart::LeftEye => Some(Vec3::new(-0.3, 0.3, 1.0)),
            BodyPart::RightEye => Some(Vec3::new(0.3, 0.3, 1.0)),
            BodyPart::LeftPupil => Some(Vec3::new(-0.2, 0.2, 1.0)),
            BodyPart::RightPupil => Some(Vec3::new(0.2, 0.2, 1.0)),
            BodyPart::Mouth => Some(Vec3::new(0.0, -0.4, 1.0)),
            _ => None,
        }
    }
}

/// A body part with its world transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartInstance {
    pub part: BodyPart,
    /// World matrix of the unit cube, box size included
    pub model: Mat4,
    pub color: [f32; 4],
}

/// Transform of the whole creature: translate on the ground, then yaw
pub fn root_transform(pose: &CreaturePose) -> Mat4 {
    Mat4::from_translation(Vec3::new(pose.position.x, 0.0, pose.position.y))
        * Mat4::from_rotation_y(pose.yaw_radians())
}

fn head_transform(limbs: &LimbOffsets) -> Mat4 {
    Mat4::from_translation(Vec3::Y * HEAD_HEIGHT)
        * Mat4::from_rotation_z(limbs.head_tilt_deg.to_radians())
}

/// Arm hangs from the shoulder and pitches about X
fn arm_transform(side: f32, swing_deg: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(side * SHOULDER_OFFSET, SHOULDER_HEIGHT, 0.0))
        * Mat4::from_rotation_x(swing_deg.to_radians())
        * Mat4::from_translation(Vec3::Y * (-ARM_LENGTH / 2.0))
}

fn foot_transform(side: f32, foot: &FootOffset) -> Mat4 {
    Mat4::from_translation(Vec3::new(side * FOOT_OFFSET, foot.height, foot.depth))
}

/// Local transform of a part relative to the creature root (without box size)
pub fn part_transform(part: BodyPart, limbs: &LimbOffsets) -> Mat4 {
    if let Some(offset) = part.face_offset() {
        return head_transform(limbs) * Mat4::from_translation(offset);
    }
    match part {
        BodyPart::Torso => Mat4::from_translation(Vec3::Y * limbs.torso_height),
        BodyPart::LeftArm => arm_transform(-1.0, limbs.left_arm_deg),
        BodyPart::RightArm => arm_transform(1.0, limbs.right_arm_deg),
        BodyPart::LeftFoot => foot_transform(-1.0, &limbs.left_foot),
        BodyPart::RightFoot => foot_transform(1.0, &limbs.right_foot),
        _ => Mat4::IDENTITY,
    }
}

/// World-space boxes for the creature in the given pose
pub fn build(pose: &CreaturePose, limbs: &LimbOffsets) -> Vec<PartInstance> {
    let root = root_transform(pose);
    BodyPart::ALL
        .iter()
        .map(|&part| PartInstance {
            part,
            model: root * part_transform(part, limbs) * Mat4::from_scale(part.size()),
            color: part.color(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heading_direction;
    use glam::Vec2;

    const EPS: f32 = 1e-4;

    fn center(parts: &[PartInstance], part: BodyPart) -> Vec3 {
        parts
            .iter()
            .find(|p| p.part == part)
            .map(|p| p.model.transform_point3(Vec3::ZERO))
            .unwrap_or(Vec3::NAN)
    }

    #[test]
    fn test_rest_pose_layout() {
        let parts = build(&CreaturePose::default(), &LimbOffsets::rest());
        assert_eq!(parts.len(), BodyPart::ALL.len());

        assert!((center(&parts, BodyPart::Torso) - Vec3::new(0.0, 2.2, 0.0)).length() < EPS);
        assert!((center(&parts, BodyPart::Head) - Vec3::new(0.0, 4.6, 0.0)).length() < EPS);
        assert!((center(&parts, BodyPart::LeftFoot) - Vec3::new(-1.0, 0.25, 0.0)).length() < EPS);
        assert!((center(&parts, BodyPart::RightFoot) - Vec3::new(1.0, 0.25, 0.0)).length() < EPS);
        // Arms hang straight down from the shoulder
        assert!((center(&parts, BodyPart::LeftArm) - Vec3::new(-0.8, 2.1, 0.0)).length() < EPS);
    }

    #[test]
    fn test_face_is_on_the_front() {
        let parts = build(&CreaturePose::default(), &LimbOffsets::rest());
        let mouth = center(&parts, BodyPart::Mouth);
        assert!((mouth - Vec3::new(0.0, 4.2, 1.0)).length() < EPS);
    }

    #[test]
    fn test_facing_matches_walk_direction() {
        for heading in [0.0_f32, 30.0, -90.0, 180.0, 725.0] {
            let pose = CreaturePose {
                heading,
                ..Default::default()
            };
            let facing = root_transform(&pose).transform_vector3(Vec3::Z);
            let walk = heading_direction(heading);
            assert!((facing.x - walk.x).abs() < EPS, "heading {heading}");
            assert!((facing.z - walk.y).abs() < EPS, "heading {heading}");
        }
    }

    #[test]
    fn test_root_follows_position() {
        let pose = CreaturePose {
            position: Vec2::new(3.0, -7.5),
            ..Default::default()
        };
        let parts = build(&pose, &LimbOffsets::rest());
        let torso = center(&parts, BodyPart::Torso);
        assert!((torso - Vec3::new(3.0, 2.2, -7.5)).length() < EPS);
    }

    #[test]
    fn test_arm_swing_moves_hand_forward() {
        let limbs = LimbOffsets {
            left_arm_deg: 20.0,
            ..LimbOffsets::rest()
        };
        let parts = build(&CreaturePose::default(), &limbs);
        let arm = center(&parts, BodyPart::LeftArm);
        // Positive pitch about X swings the hanging arm toward -Z
        let expected_z = -(20.0_f32.to_radians().sin()) * ARM_LENGTH / 2.0;
        assert!((arm.z - expected_z).abs() < EPS);
        assert!(arm.y > SHOULDER_HEIGHT - ARM_LENGTH / 2.0);
    }

    #[test]
    fn test_head_tilt_rolls_face() {
        let limbs = LimbOffsets {
            head_tilt_deg: 4.0,
            ..LimbOffsets::rest()
        };
        let parts = build(&CreaturePose::default(), &limbs);
        let left_eye = center(&parts, BodyPart::LeftEye);
        let right_eye = center(&parts, BodyPart::RightEye);
        // Positive roll raises the right eye relative to the left
        assert!(right_eye.y > left_eye.y);
    }

    #[test]
    fn test_box_size_is_baked_in() {
        let parts = build(&CreaturePose::default(), &LimbOffsets::rest());
        let foot = parts.iter().find(|p| p.part == BodyPart::LeftFoot).map(|p| p.model);
        let extent = foot.map(|m| m.transform_vector3(Vec3::ONE));
        assert_eq!(extent, Some(Vec3::new(0.5, 0.5, 1.5)));
    }
}
