//! Goal-relative orientation frame
//!
//! A yaw-only reference frame anchored at the walker's hips and facing the
//! current goal. Velocities, positions, and headings are expressed in this
//! frame so observations stay independent of world axes.

use glam::{Quat, Vec3};

/// Reference frame derived from an origin point and a goal point.
///
/// Forward is the origin-to-goal direction flattened to the horizontal
/// plane. A degenerate direction (goal directly above/below the origin, or
/// coincident with it) keeps the previous frame instead of producing NaN.
#[derive(Debug, Clone)]
pub struct OrientationFrame {
    origin: Vec3,
    rotation: Quat,
}

impl Default for OrientationFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl OrientationFrame {
    /// Frame at the world origin facing +Z
    pub fn new() -> Self {
        Self {
            origin: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    /// Re-anchor the frame at `origin`, facing `target` on the horizontal
    /// plane. Called every physics tick with the hips position and the
    /// current goal.
    pub fn update(&mut self, origin: Vec3, target: Vec3) {
        self.origin = origin;

        let mut to_target = target - origin;
        to_target.y = 0.0;
        if to_target.length_squared() > 1e-6 {
            let yaw = to_target.x.atan2(to_target.z);
            self.rotation = Quat::from_rotation_y(yaw);
        }
        // Degenerate direction: keep the previous facing
    }

    /// Frame forward axis in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Express a world-space direction in this frame
    pub fn inverse_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation.inverse() * direction
    }

    /// Express a world-space point in this frame, relative to the origin
    pub fn inverse_point(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "expected {b}, got {a}");
    }

    #[test]
    fn test_forward_faces_target() {
        let mut frame = OrientationFrame::new();
        frame.update(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        assert_vec3_near(frame.forward(), Vec3::X);

        frame.update(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0));
        assert_vec3_near(frame.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn test_elevation_is_ignored() {
        let mut frame = OrientationFrame::new();
        frame.update(Vec3::ZERO, Vec3::new(0.0, 50.0, 5.0));
        assert_vec3_near(frame.forward(), Vec3::Z);
    }

    #[test]
    fn test_degenerate_target_keeps_previous_facing() {
        let mut frame = OrientationFrame::new();
        frame.update(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0));
        // Goal directly overhead flattens to zero length
        frame.update(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0));
        assert_vec3_near(frame.forward(), Vec3::X);
        assert!(frame.forward().is_finite());
    }

    #[test]
    fn test_inverse_direction() {
        let mut frame = OrientationFrame::new();
        frame.update(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        // World +X is the frame's forward (+Z locally)
        assert_vec3_near(frame.inverse_direction(Vec3::X), Vec3::Z);
    }

    #[test]
    fn test_inverse_point_is_origin_relative() {
        let mut frame = OrientationFrame::new();
        frame.update(Vec3::new(2.0, 0.0, 0.0), Vec3::new(12.0, 0.0, 0.0));
        let local = frame.inverse_point(Vec3::new(7.0, 1.0, 0.0));
        assert_vec3_near(local, Vec3::new(0.0, 1.0, 5.0));
    }
}
