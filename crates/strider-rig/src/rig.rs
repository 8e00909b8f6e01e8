//! Rig registry: segment ownership, reset, and joint actuation
//!
//! The registry owns segment lifetime for the whole episode. Segments are
//! registered once at agent initialization and reset in place at episode
//! start, never recreated. The external simulation writes kinematic state
//! through the inherent methods; the agent reads and actuates through the
//! [`RigAccess`] / [`RigControl`] traits.

use glam::{Quat, Vec3};
use std::collections::HashMap;
use thiserror::Error;

use crate::segment::{SegmentId, SegmentState};

/// Errors from rig registry operations
#[derive(Debug, Error)]
pub enum RigError {
    #[error("segment {0} is not registered with the rig")]
    SegmentNotRegistered(SegmentId),
    #[error("segment {0} is already registered")]
    DuplicateSegment(SegmentId),
}

/// Read access to rig state for observation building
pub trait RigAccess {
    /// Get current state of a segment, if registered
    fn segment(&self, id: SegmentId) -> Option<&SegmentState>;

    /// Configured maximum joint torque, used to normalize strength
    fn max_joint_strength(&self) -> f32;
}

/// Actuation and lifecycle access for the controlling agent
pub trait RigControl: RigAccess {
    /// Register a segment with its initial pose. The pose is captured for
    /// later in-place resets.
    fn register_segment(
        &mut self,
        id: SegmentId,
        position: Vec3,
        local_rotation: Quat,
    ) -> Result<(), RigError>;

    /// Reset a segment to its registered pose with zero velocity and strength
    fn reset_segment(&mut self, id: SegmentId) -> Result<(), RigError>;

    /// Overwrite a segment's local rotation (used for episode-start yaw)
    fn set_segment_rotation(&mut self, id: SegmentId, rotation: Quat) -> Result<(), RigError>;

    /// Set the joint target rotation for a segment. Components are normalized
    /// policy outputs; mapping to joint limits is the simulation's concern.
    fn set_joint_target_rotation(
        &mut self,
        id: SegmentId,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), RigError>;

    /// Set joint strength from a normalized [-1, 1] command
    fn set_joint_strength(&mut self, id: SegmentId, strength: f32) -> Result<(), RigError>;
}

/// One registered segment: live state plus the pose captured at registration
/// and the most recent actuation command.
#[derive(Debug, Clone)]
struct RigSegment {
    state: SegmentState,
    initial_position: Vec3,
    initial_rotation: Quat,
    target_rotation: Vec3,
}

/// Concrete rig registry keyed by segment id.
///
/// Stands in for the engine-side joint controller: it stores actuation
/// commands and kinematic state but performs no integration itself.
#[derive(Debug)]
pub struct RagdollRig {
    segments: HashMap<SegmentId, RigSegment>,
    max_joint_strength: f32,
}

impl RagdollRig {
    /// Create an empty rig with the given maximum joint torque
    pub fn new(max_joint_strength: f32) -> Self {
        Self {
            segments: HashMap::new(),
            max_joint_strength,
        }
    }

    /// Number of registered segments
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Most recent joint target rotation commanded for a segment
    pub fn joint_target(&self, id: SegmentId) -> Option<Vec3> {
        self.segments.get(&id).map(|s| s.target_rotation)
    }

    /// Write kinematic state for a segment. Called by the surrounding
    /// simulation loop after it advances the tick.
    pub fn set_kinematic_state(
        &mut self,
        id: SegmentId,
        position: Vec3,
        linear_velocity: Vec3,
        angular_velocity: Vec3,
        local_rotation: Quat,
    ) -> Result<(), RigError> {
        let segment = self
            .segments
            .get_mut(&id)
            .ok_or(RigError::SegmentNotRegistered(id))?;
        segment.state.position = position;
        segment.state.linear_velocity = linear_velocity;
        segment.state.angular_velocity = angular_velocity;
        segment.state.local_rotation = local_rotation;
        Ok(())
    }

    /// Update the ground-contact flag for a segment
    pub fn set_ground_contact(&mut self, id: SegmentId, touching: bool) -> Result<(), RigError> {
        let segment = self
            .segments
            .get_mut(&id)
            .ok_or(RigError::SegmentNotRegistered(id))?;
        segment.state.ground_contact = touching;
        Ok(())
    }
}

impl RigAccess for RagdollRig {
    fn segment(&self, id: SegmentId) -> Option<&SegmentState> {
        self.segments.get(&id).map(|s| &s.state)
    }

    fn max_joint_strength(&self) -> f32 {
        self.max_joint_strength
    }
}

impl RigControl for RagdollRig {
    fn register_segment(
        &mut self,
        id: SegmentId,
        position: Vec3,
        local_rotation: Quat,
    ) -> Result<(), RigError> {
        if self.segments.contains_key(&id) {
            return Err(RigError::DuplicateSegment(id));
        }
        log::debug!("Rig: registered segment {id} at {position}");
        self.segments.insert(
            id,
            RigSegment {
                state: SegmentState::at_rest(position, local_rotation),
                initial_position: position,
                initial_rotation: local_rotation,
                target_rotation: Vec3::ZERO,
            },
        );
        Ok(())
    }

    fn reset_segment(&mut self, id: SegmentId) -> Result<(), RigError> {
        let segment = self
            .segments
            .get_mut(&id)
            .ok_or(RigError::SegmentNotRegistered(id))?;
        segment.state = SegmentState::at_rest(segment.initial_position, segment.initial_rotation);
        segment.target_rotation = Vec3::ZERO;
        Ok(())
    }

    fn set_segment_rotation(&mut self, id: SegmentId, rotation: Quat) -> Result<(), RigError> {
        let segment = self
            .segments
            .get_mut(&id)
            .ok_or(RigError::SegmentNotRegistered(id))?;
        segment.state.local_rotation = rotation;
        Ok(())
    }

    fn set_joint_target_rotation(
        &mut self,
        id: SegmentId,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), RigError> {
        let segment = self
            .segments
            .get_mut(&id)
            .ok_or(RigError::SegmentNotRegistered(id))?;
        segment.target_rotation = Vec3::new(x, y, z);
        Ok(())
    }

    fn set_joint_strength(&mut self, id: SegmentId, strength: f32) -> Result<(), RigError> {
        let segment = self
            .segments
            .get_mut(&id)
            .ok_or(RigError::SegmentNotRegistered(id))?;
        // Normalized [-1, 1] command maps onto [0, max] torque
        segment.state.current_strength = (strength + 1.0) * 0.5 * self.max_joint_strength;
        Ok(())
    }
}
