//! Patrol path: a fixed cycle of waypoints around the spawn point

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Closed loop of waypoints on a horizontal circle.
///
/// Points are computed once at initialization and never mutated; only the
/// current index advances, modulo the point count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatrolPath {
    points: Vec<Vec3>,
    current: usize,
}

impl PatrolPath {
    /// Lay out `count` points evenly spaced on a circle of `radius` around
    /// `center`, starting at angle 0 on the +X axis.
    pub fn circle(center: Vec3, radius: f32, count: usize) -> Self {
        let count = count.max(1);
        let points = (0..count)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / count as f32;
                center + Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
            })
            .collect();
        Self { points, current: 0 }
    }

    /// The waypoint currently being walked toward
    pub fn current_point(&self) -> Vec3 {
        self.points[self.current]
    }

    /// Index of the current waypoint
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// All waypoints in cyclic order
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Move to the next waypoint (cyclic)
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.points.len();
    }

    /// Advance iff `position` is within `threshold` of the current waypoint.
    /// Returns whether an advancement happened.
    pub fn advance_if_reached(&mut self, position: Vec3, threshold: f32) -> bool {
        if position.distance(self.current_point()) < threshold {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Back to the first waypoint (episode start)
    pub fn reset(&mut self) {
        self.current = 0;
    }
}
