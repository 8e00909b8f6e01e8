//! Agent configuration

use serde::{Deserialize, Serialize};

/// Tunable parameters for the locomotion agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Desired walking speed (units/sec)
    pub target_speed: f32,
    /// Upper bound for the walking speed
    pub max_speed: f32,
    /// Redraw the target speed uniformly in [0.1, max_speed] each episode
    pub randomize_speed_each_episode: bool,
    /// Radius of the patrol circle around the spawn point
    pub patrol_radius: f32,
    /// Number of waypoints on the patrol circle
    pub patrol_point_count: usize,
    /// Distance at which a patrol point counts as reached
    pub arrival_threshold: f32,
    /// Weight of the balance term in the chase reward
    pub balance_weight: f32,
    /// Heading alignment threshold while chasing (degrees)
    pub chase_alignment_threshold_deg: f32,
    /// Seed for episode randomization
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            target_speed: 10.0,
            max_speed: 10.0,
            randomize_speed_each_episode: false,
            patrol_radius: 5.0,
            patrol_point_count: 4,
            arrival_threshold: 1.0,
            balance_weight: 0.2,
            chase_alignment_threshold_deg: 30.0,
            seed: 0,
        }
    }
}

impl AgentConfig {
    /// Clamp a requested target speed into the valid [0.1, max_speed] range
    pub fn clamp_speed(&self, speed: f32) -> f32 {
        speed.clamp(0.1, self.max_speed)
    }
}
