//! Action decoding
//!
//! The policy emits a flat vector of continuous values consumed positionally:
//! first the per-joint target-rotation components, then the per-joint
//! strength scalars. The consumption order below is the contract; locked
//! rotation axes are zero-filled rather than consumed.

use strider_rig::{RigControl, SegmentId};

use crate::error::AgentError;

/// Rotation entries in consumption order, with the axes each joint exposes
/// to the policy (x, y, z). Locked axes receive 0.0.
pub const ROTATION_LAYOUT: [(SegmentId, [bool; 3]); 13] = [
    (SegmentId::Chest, [true, true, true]),
    (SegmentId::Spine, [true, true, true]),
    (SegmentId::ThighL, [true, true, false]),
    (SegmentId::ThighR, [true, true, false]),
    (SegmentId::ShinL, [true, false, false]),
    (SegmentId::ShinR, [true, false, false]),
    (SegmentId::FootR, [true, true, true]),
    (SegmentId::FootL, [true, true, true]),
    (SegmentId::ArmL, [true, true, false]),
    (SegmentId::ArmR, [true, true, false]),
    (SegmentId::ForearmL, [true, false, false]),
    (SegmentId::ForearmR, [true, false, false]),
    (SegmentId::Head, [true, true, false]),
];

/// Strength entries in consumption order
pub const STRENGTH_LAYOUT: [SegmentId; 13] = [
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
    SegmentId::ArmR,
    SegmentId::ForearmR,
];

const fn rotation_scalar_count() -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < ROTATION_LAYOUT.len() {
        let axes = ROTATION_LAYOUT[i].1;
        total += axes[0] as usize + axes[1] as usize + axes[2] as usize;
        i += 1;
    }
    total
}

/// Expected action vector length: 26 rotation scalars + 13 strength scalars
pub const ACTION_LEN: usize = rotation_scalar_count() + STRENGTH_LAYOUT.len();

/// Decode an action vector and forward it to the rig.
///
/// The length is validated before anything is applied, so a contract
/// mismatch never half-actuates the body. Values are forwarded unmodified;
/// clamping, if any, is the rig's responsibility.
pub fn apply_action(rig: &mut impl RigControl, action: &[f32]) -> Result<(), AgentError> {
    if action.len() != ACTION_LEN {
        return Err(AgentError::InvalidAction {
            expected: ACTION_LEN,
            actual: action.len(),
        });
    }

    let mut cursor = action.iter().copied();
    // Length was checked above; the iterator cannot run dry
    let mut next = || cursor.next().unwrap_or_default();

    for (id, axes) in ROTATION_LAYOUT {
        let x = if axes[0] { next() } else { 0.0 };
        let y = if axes[1] { next() } else { 0.0 };
        let z = if axes[2] { next() } else { 0.0 };
        rig.set_joint_target_rotation(id, x, y, z)?;
    }

    for id in STRENGTH_LAYOUT {
        rig.set_joint_strength(id, next())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use strider_rig::{RagdollRig, RigAccess};

    fn full_rig() -> RagdollRig {
        let mut rig = RagdollRig::new(40_000.0);
        for id in SegmentId::ALL {
            rig.register_segment(id, Vec3::ZERO, Quat::IDENTITY).unwrap();
        }
        rig
    }

    #[test]
    fn test_action_len() {
        assert_eq!(ACTION_LEN, 39);
    }

    #[test]
    fn test_layout_covers_all_actuated_segments() {
        for id in SegmentId::ALL {
            let in_rotation = ROTATION_LAYOUT.iter().any(|(s, _)| *s == id);
            let in_strength = STRENGTH_LAYOUT.contains(&id);
            assert_eq!(in_rotation, id.has_actuated_joint());
            assert_eq!(in_strength, id.has_actuated_joint());
        }
    }

    #[test]
    fn test_wrong_length_fails_before_actuation() {
        let mut rig = full_rig();
        let result = apply_action(&mut rig, &[0.5; 38]);
        assert!(matches!(
            result,
            Err(AgentError::InvalidAction {
                expected: 39,
                actual: 38
            })
        ));
        // Nothing was applied
        for id in SegmentId::ALL {
            assert_eq!(rig.joint_target(id).unwrap(), Vec3::ZERO);
            assert_eq!(rig.segment(id).unwrap().current_strength, 0.0);
        }
    }

    #[test]
    fn test_positional_consumption_order() {
        let mut rig = full_rig();
        // Distinct value per slot so misordering is visible
        let action: Vec<f32> = (0..ACTION_LEN).map(|i| i as f32 / 100.0).collect();
        apply_action(&mut rig, &action).unwrap();

        // chest consumes slots 0..3
        assert_eq!(
            rig.joint_target(SegmentId::Chest).unwrap(),
            Vec3::new(0.00, 0.01, 0.02)
        );
        // spine consumes slots 3..6
        assert_eq!(
            rig.joint_target(SegmentId::Spine).unwrap(),
            Vec3::new(0.03, 0.04, 0.05)
        );
        // thighL consumes 6..8, roll locked
        assert_eq!(
            rig.joint_target(SegmentId::ThighL).unwrap(),
            Vec3::new(0.06, 0.07, 0.0)
        );
        // shinL consumes slot 10 only
        assert_eq!(
            rig.joint_target(SegmentId::ShinL).unwrap(),
            Vec3::new(0.10, 0.0, 0.0)
        );
        // footR consumes 12..15 (before footL per contract)
        assert_eq!(
            rig.joint_target(SegmentId::FootR).unwrap(),
            Vec3::new(0.12, 0.13, 0.14)
        );
        assert_eq!(
            rig.joint_target(SegmentId::FootL).unwrap(),
            Vec3::new(0.15, 0.16, 0.17)
        );
        // head consumes the last two rotation slots, 24..26
        assert_eq!(
            rig.joint_target(SegmentId::Head).unwrap(),
            Vec3::new(0.24, 0.25, 0.0)
        );
    }

    #[test]
    fn test_strength_consumption_order() {
        let mut rig = full_rig();
        let mut action = vec![0.0; ACTION_LEN];
        // First strength slot (chest) follows the 26 rotation scalars
        action[26] = 1.0;
        // Last strength slot is forearmR
        action[38] = 1.0;
        apply_action(&mut rig, &action).unwrap();

        let max = rig.max_joint_strength();
        assert_eq!(rig.segment(SegmentId::Chest).unwrap().current_strength, max);
        assert_eq!(
            rig.segment(SegmentId::ForearmR).unwrap().current_strength,
            max
        );
        // A zero command still maps to half torque under the [-1, 1] mapping
        assert_eq!(
            rig.segment(SegmentId::Spine).unwrap().current_strength,
            max * 0.5
        );
    }

    #[test]
    fn test_hands_and_hips_never_actuated() {
        let mut rig = full_rig();
        let action = vec![0.9; ACTION_LEN];
        apply_action(&mut rig, &action).unwrap();
        for id in [SegmentId::Hips, SegmentId::HandL, SegmentId::HandR] {
            assert_eq!(rig.joint_target(id).unwrap(), Vec3::ZERO);
            assert_eq!(rig.segment(id).unwrap().current_strength, 0.0);
        }
    }
}
