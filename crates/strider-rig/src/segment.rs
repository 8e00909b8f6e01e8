//! Body segment identities and per-segment kinematic state

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Identity of a single rigid member of the ragdoll.
///
/// The variant order in [`SegmentId::ALL`] is the fixed topological order
/// used for registration, observation iteration, and velocity averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentId {
    Hips,
    Chest,
    Spine,
    Head,
    ThighL,
    ShinL,
    FootL,
    ThighR,
    ShinR,
    FootR,
    ArmL,
    ForearmL,
    HandL,
    ArmR,
    ForearmR,
    HandR,
}

impl SegmentId {
    /// All segments in fixed topological order.
    pub const ALL: [SegmentId; 16] = [
        SegmentId::Hips,
        SegmentId::Chest,
        SegmentId::Spine,
        SegmentId::Head,
        SegmentId::ThighL,
        SegmentId::ShinL,
        SegmentId::FootL,
        SegmentId::ThighR,
        SegmentId::ShinR,
        SegmentId::FootR,
        SegmentId::ArmL,
        SegmentId::ForearmL,
        SegmentId::HandL,
        SegmentId::ArmR,
        SegmentId::ForearmR,
        SegmentId::HandR,
    ];

    /// Whether this segment has a driven joint.
    ///
    /// The hips are the root body and the hands dangle freely; neither takes
    /// target-rotation or strength commands, and observations omit local
    /// rotation and strength for them.
    pub fn has_actuated_joint(self) -> bool {
        !matches!(self, SegmentId::Hips | SegmentId::HandL | SegmentId::HandR)
    }

    /// Rest-pose offset of this segment from the hips, in meters.
    ///
    /// Together with [`SegmentId::ALL`] this is the fixed rig topology the
    /// ragdoll is built from at registration time.
    pub fn rig_offset(self) -> Vec3 {
        match self {
            SegmentId::Hips => Vec3::new(0.0, 0.0, 0.0),
            SegmentId::Spine => Vec3::new(0.0, 0.2, 0.0),
            SegmentId::Chest => Vec3::new(0.0, 0.45, 0.0),
            SegmentId::Head => Vec3::new(0.0, 0.75, 0.0),
            SegmentId::ThighL => Vec3::new(-0.12, -0.25, 0.0),
            SegmentId::ShinL => Vec3::new(-0.12, -0.65, 0.0),
            SegmentId::FootL => Vec3::new(-0.12, -0.95, 0.05),
            SegmentId::ThighR => Vec3::new(0.12, -0.25, 0.0),
            SegmentId::ShinR => Vec3::new(0.12, -0.65, 0.0),
            SegmentId::FootR => Vec3::new(0.12, -0.95, 0.05),
            SegmentId::ArmL => Vec3::new(-0.35, 0.45, 0.0),
            SegmentId::ForearmL => Vec3::new(-0.6, 0.45, 0.0),
            SegmentId::HandL => Vec3::new(-0.8, 0.45, 0.0),
            SegmentId::ArmR => Vec3::new(0.35, 0.45, 0.0),
            SegmentId::ForearmR => Vec3::new(0.6, 0.45, 0.0),
            SegmentId::HandR => Vec3::new(0.8, 0.45, 0.0),
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            SegmentId::Hips => "hips",
            SegmentId::Chest => "chest",
            SegmentId::Spine => "spine",
            SegmentId::Head => "head",
            SegmentId::ThighL => "thighL",
            SegmentId::ShinL => "shinL",
            SegmentId::FootL => "footL",
            SegmentId::ThighR => "thighR",
            SegmentId::ShinR => "shinR",
            SegmentId::FootR => "footR",
            SegmentId::ArmL => "armL",
            SegmentId::ForearmL => "forearmL",
            SegmentId::HandL => "handL",
            SegmentId::ArmR => "armR",
            SegmentId::ForearmR => "forearmR",
            SegmentId::HandR => "handR",
        }
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kinematic state of one segment, advanced by the external simulation each
/// tick and read back by the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentState {
    /// World position
    pub position: Vec3,
    /// World-space linear velocity
    pub linear_velocity: Vec3,
    /// World-space angular velocity
    pub angular_velocity: Vec3,
    /// Rotation relative to the parent segment
    pub local_rotation: Quat,
    /// Whether the segment currently touches the ground
    pub ground_contact: bool,
    /// Joint strength currently applied, in absolute torque units
    pub current_strength: f32,
}

impl SegmentState {
    /// State for a segment at rest at the given pose.
    pub fn at_rest(position: Vec3, local_rotation: Quat) -> Self {
        Self {
            position,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            local_rotation,
            ground_contact: false,
            current_strength: 0.0,
        }
    }

    /// Forward axis of this segment in world space.
    pub fn forward(&self) -> Vec3 {
        self.local_rotation * Vec3::Z
    }

    /// Up axis of this segment in world space.
    pub fn up(&self) -> Vec3 {
        self.local_rotation * Vec3::Y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_order_is_stable() {
        assert_eq!(SegmentId::ALL.len(), 16);
        assert_eq!(SegmentId::ALL[0], SegmentId::Hips);
        assert_eq!(SegmentId::ALL[3], SegmentId::Head);
        assert_eq!(SegmentId::ALL[15], SegmentId::HandR);
    }

    #[test]
    fn test_actuated_joints() {
        assert!(!SegmentId::Hips.has_actuated_joint());
        assert!(!SegmentId::HandL.has_actuated_joint());
        assert!(!SegmentId::HandR.has_actuated_joint());

        let actuated = SegmentId::ALL
            .iter()
            .filter(|s| s.has_actuated_joint())
            .count();
        assert_eq!(actuated, 13);
    }

    #[test]
    fn test_at_rest_state() {
        let state = SegmentState::at_rest(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);
        assert_eq!(state.linear_velocity, Vec3::ZERO);
        assert_eq!(state.current_strength, 0.0);
        assert!(!state.ground_contact);
        assert_eq!(state.forward(), Vec3::Z);
        assert_eq!(state.up(), Vec3::Y);
    }
}
