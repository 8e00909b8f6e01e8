//! Peripheral scene objects
//!
//! Boundary-level collaborators around the walker: the trigger volume that
//! requests chases, the damage-dealing contact volume, destructible keys,
//! and the door they gate. None of these carry agent logic; they only feed
//! the channels and health pools the core consumes.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use strider_agent::{ChaseEvent, ChaseSender};
use strider_rig::SegmentId;

use crate::health::PlayerHealth;

/// Axis-aligned trigger volume watching for the player.
///
/// While the player remains inside, a chase-start event is published every
/// tick; the agent drains them at its own tick boundary.
#[derive(Debug)]
pub struct FloorTrigger {
    min: Vec3,
    max: Vec3,
    sender: ChaseSender,
}

impl FloorTrigger {
    pub fn new(min: Vec3, max: Vec3, sender: ChaseSender) -> Self {
        Self { min, max, sender }
    }

    fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Poll the player position for this tick
    pub fn update(&self, player: Option<Vec3>) {
        if let Some(position) = player {
            if self.contains(position) {
                // Receiver dropped means the agent is gone; nothing to signal
                let _ = self.sender.send(ChaseEvent::Start);
            }
        }
    }
}

/// Contact volume that hurts the player when a whitelisted walker segment
/// touches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageVolume {
    pub damage_amount: f32,
    pub contact_radius: f32,
    /// Latched while any whitelisted segment stays in contact, so damage
    /// applies once per contact rather than every tick
    in_contact: bool,
}

impl DamageVolume {
    pub fn new(damage_amount: f32, contact_radius: f32) -> Self {
        Self {
            damage_amount,
            contact_radius,
            in_contact: false,
        }
    }

    /// Segments that can hurt the player on contact: everything except the
    /// spine and the feet.
    pub fn affects(id: SegmentId) -> bool {
        !matches!(id, SegmentId::Spine | SegmentId::FootL | SegmentId::FootR)
    }

    /// Check segment positions against the player and apply contact damage.
    /// Returns true if damage was dealt this tick.
    pub fn update(
        &mut self,
        segment_positions: &[(SegmentId, Vec3)],
        player: Vec3,
        health: &mut PlayerHealth,
    ) -> bool {
        let touching = segment_positions.iter().any(|(id, position)| {
            Self::affects(*id) && position.distance(player) < self.contact_radius
        });

        let entered = touching && !self.in_contact;
        self.in_contact = touching;

        if entered {
            log::info!("walker contact: player takes {} damage", self.damage_amount);
            health.take_damage(self.damage_amount);
        }
        entered
    }
}

impl Default for DamageVolume {
    fn default() -> Self {
        Self::new(25.0, 0.5)
    }
}

/// Destructible key gating the door
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyObject {
    health: i32,
}

impl KeyObject {
    pub fn new(health: i32) -> Self {
        Self { health }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }
}

impl Default for KeyObject {
    fn default() -> Self {
        Self::new(12)
    }
}

/// Door that opens once every key has been destroyed.
///
/// Opening translates the door upward by a fixed offset, exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorMechanism {
    pub position: Vec3,
    keys: Vec<KeyObject>,
    opened: bool,
}

const DOOR_OPEN_OFFSET: f32 = 5.0;

impl DoorMechanism {
    pub fn new(position: Vec3, keys: Vec<KeyObject>) -> Self {
        Self {
            position,
            keys,
            opened: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn key_mut(&mut self, index: usize) -> Option<&mut KeyObject> {
        self.keys.get_mut(index)
    }

    pub fn keys_remaining(&self) -> usize {
        self.keys.iter().filter(|k| !k.is_destroyed()).count()
    }

    /// Poll the keys; open on the first tick where none remain
    pub fn update(&mut self) {
        if !self.opened && self.keys.iter().all(KeyObject::is_destroyed) {
            self.opened = true;
            self.position.y += DOOR_OPEN_OFFSET;
            log::info!("door opened");
        }
    }
}
