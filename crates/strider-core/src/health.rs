//! Player health

use serde::{Deserialize, Serialize};

/// Health pool for the tracked player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerHealth {
    current: f32,
    max: f32,
}

impl PlayerHealth {
    /// Full health pool of the given size
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Apply damage. Returns true if this reduced the player to zero.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.current = (self.current - amount).max(0.0);
        log::debug!("player took {amount} damage, {} remaining", self.current);
        self.is_dead()
    }

    /// Restore health, capped at the maximum
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    /// Remaining health
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Remaining health as a fraction in [0, 1]
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            (self.current / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for PlayerHealth {
    fn default() -> Self {
        Self::new(100.0)
    }
}
