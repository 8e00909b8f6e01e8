//! Observation construction
//!
//! The observation vector is rebuilt from scratch every decision step in a
//! fixed field order. The order is a strict contract: a policy trained
//! against one layout is invalid against any other, so the layout is spelled
//! out as an explicit schema and the builder is checked against it.

use glam::{Quat, Vec3};
use strider_rig::{OrientationFrame, RigAccess, SegmentId};

use crate::error::AgentError;

/// Schema version; bump on any layout change
pub const SCHEMA_VERSION: u32 = 1;

/// Scalars in the header block (velocity summary, frame rotations, goal)
const HEADER_LEN: usize = 1 + 3 + 3 + 4 + 4 + 3;
/// Scalars every segment contributes (contact, velocities, relative position)
const PER_SEGMENT_LEN: usize = 1 + 3 + 3 + 3;
/// Extra scalars for segments with a driven joint (local rotation, strength)
const ACTUATED_EXTRA_LEN: usize = 4 + 1;

/// Total observation length: 18 header scalars, 10 per segment, 5 more for
/// each of the 13 actuated segments.
pub const OBSERVATION_LEN: usize = HEADER_LEN + 16 * PER_SEGMENT_LEN + 13 * ACTUATED_EXTRA_LEN;

/// One named field in the observation layout
#[derive(Debug, Clone)]
pub struct ObservationField {
    pub name: String,
    pub len: usize,
}

/// Ordered list of named observation fields.
///
/// Exists so layout mismatches are caught at construction time instead of
/// surfacing as silently misaligned policy inputs.
#[derive(Debug, Clone)]
pub struct ObservationSchema {
    pub version: u32,
    pub fields: Vec<ObservationField>,
}

impl ObservationSchema {
    /// The current layout
    pub fn current() -> Self {
        let mut fields = vec![
            ObservationField { name: "velocity_error".into(), len: 1 },
            ObservationField { name: "avg_velocity".into(), len: 3 },
            ObservationField { name: "goal_velocity".into(), len: 3 },
            ObservationField { name: "hips_to_frame_rotation".into(), len: 4 },
            ObservationField { name: "head_to_frame_rotation".into(), len: 4 },
            ObservationField { name: "goal_position".into(), len: 3 },
        ];
        for id in SegmentId::ALL {
            fields.push(ObservationField {
                name: format!("{id}_ground_contact"),
                len: 1,
            });
            fields.push(ObservationField {
                name: format!("{id}_linear_velocity"),
                len: 3,
            });
            fields.push(ObservationField {
                name: format!("{id}_angular_velocity"),
                len: 3,
            });
            fields.push(ObservationField {
                name: format!("{id}_relative_position"),
                len: 3,
            });
            if id.has_actuated_joint() {
                fields.push(ObservationField {
                    name: format!("{id}_local_rotation"),
                    len: 4,
                });
                fields.push(ObservationField {
                    name: format!("{id}_joint_strength"),
                    len: 1,
                });
            }
        }
        Self {
            version: SCHEMA_VERSION,
            fields,
        }
    }

    /// Total scalar count
    pub fn len(&self) -> usize {
        self.fields.iter().map(|f| f.len).sum()
    }

    /// Whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Accumulates observation scalars in schema order
struct ObservationBuilder {
    values: Vec<f32>,
}

impl ObservationBuilder {
    fn new() -> Self {
        Self {
            values: Vec::with_capacity(OBSERVATION_LEN),
        }
    }

    fn push_scalar(&mut self, v: f32) {
        self.values.push(v);
    }

    fn push_bool(&mut self, v: bool) {
        self.values.push(if v { 1.0 } else { 0.0 });
    }

    fn push_vec3(&mut self, v: Vec3) {
        self.values.extend_from_slice(&[v.x, v.y, v.z]);
    }

    fn push_quat(&mut self, q: Quat) {
        self.values.extend_from_slice(&[q.x, q.y, q.z, q.w]);
    }

    fn finish(self) -> Vec<f32> {
        debug_assert_eq!(self.values.len(), OBSERVATION_LEN, "observation layout drifted");
        self.values
    }
}

/// Mean linear velocity over all registered segments
pub fn average_velocity(rig: &impl RigAccess) -> Result<Vec3, AgentError> {
    let mut sum = Vec3::ZERO;
    for id in SegmentId::ALL {
        let state = rig
            .segment(id)
            .ok_or(AgentError::SegmentUnavailable(id))?;
        sum += state.linear_velocity;
    }
    Ok(sum / SegmentId::ALL.len() as f32)
}

/// Build the full observation vector for one decision step.
///
/// `goal` is the live chase target position when chasing, or the current
/// patrol point otherwise; the caller resolves that before calling in.
pub fn build_observation(
    rig: &impl RigAccess,
    frame: &OrientationFrame,
    goal: Vec3,
    target_speed: f32,
) -> Result<Vec<f32>, AgentError> {
    let hips = rig
        .segment(SegmentId::Hips)
        .ok_or(AgentError::SegmentUnavailable(SegmentId::Hips))?;
    let head = rig
        .segment(SegmentId::Head)
        .ok_or(AgentError::SegmentUnavailable(SegmentId::Head))?;

    let frame_forward = frame.forward();
    let goal_velocity = frame_forward * target_speed;
    let avg_velocity = average_velocity(rig)?;
    let hips_position = hips.position;
    let hips_forward = hips.forward();
    let head_forward = head.forward();
    let max_strength = rig.max_joint_strength();

    let mut builder = ObservationBuilder::new();

    builder.push_scalar(goal_velocity.distance(avg_velocity));
    builder.push_vec3(frame.inverse_direction(avg_velocity));
    builder.push_vec3(frame.inverse_direction(goal_velocity));
    builder.push_quat(Quat::from_rotation_arc(hips_forward, frame_forward));
    builder.push_quat(Quat::from_rotation_arc(head_forward, frame_forward));
    builder.push_vec3(frame.inverse_point(goal));

    for id in SegmentId::ALL {
        let state = rig
            .segment(id)
            .ok_or(AgentError::SegmentUnavailable(id))?;
        builder.push_bool(state.ground_contact);
        builder.push_vec3(frame.inverse_direction(state.linear_velocity));
        builder.push_vec3(frame.inverse_direction(state.angular_velocity));
        builder.push_vec3(frame.inverse_direction(state.position - hips_position));
        if id.has_actuated_joint() {
            builder.push_quat(state.local_rotation);
            builder.push_scalar(state.current_strength / max_strength);
        }
    }

    Ok(builder.finish())
}
