//! Reward shaping terms
//!
//! Pure functions over simulation state. Callers are responsible for running
//! the results through [`check_finite`]: a NaN here means a degenerate
//! physical configuration (for example a zero-length direction that got
//! normalized) and must never propagate into the reward stream.

use glam::Vec3;

use crate::error::AgentError;

/// Reward for matching the goal velocity.
///
/// `d = clamp(|actual - goal|, 0, target_speed)`, reward `= (1 - (d/S)^2)^2`.
/// Smooth, bounded in [0, 1], monotonically decreasing in the error up to the
/// clamp, with zero gradient at the optimum and at the clamp boundary.
pub fn matching_velocity_reward(goal: Vec3, actual: Vec3, target_speed: f32) -> f32 {
    let delta = actual.distance(goal).clamp(0.0, target_speed);
    let ratio = delta / target_speed;
    (1.0 - ratio * ratio).powi(2)
}

/// Gaze reward: how well the head faces the frame forward direction.
///
/// The head forward is flattened to the horizontal plane; the result is the
/// dot product remapped from [-1, 1] to [0, 1].
pub fn look_at_reward(frame_forward: Vec3, head_forward: Vec3) -> f32 {
    let mut flat = head_forward;
    flat.y = 0.0;
    (frame_forward.dot(flat) + 1.0) * 0.5
}

/// Upright-balance reward: alignment of the hips up axis with world up,
/// clamped to [0, 1].
pub fn balance_reward(hips_up: Vec3) -> f32 {
    Vec3::Y.dot(hips_up).clamp(0.0, 1.0)
}

/// Fail the step if a reward term came out non-finite
pub fn check_finite(value: f32, term: &'static str) -> Result<f32, AgentError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AgentError::NonFiniteReward { term })
    }
}
