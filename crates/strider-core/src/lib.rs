//! Scene glue for the Strider walker environment
//!
//! Wires the locomotion agent and rig to the peripheral scene objects
//! (player health, destructible keys, the door, trigger volumes) and
//! provides a headless environment harness with scripted kinematics for
//! demos and integration tests.

pub mod env;
pub mod gameplay;
pub mod health;

pub use env::{StepOutcome, WalkerEnv};
pub use gameplay::{DamageVolume, DoorMechanism, FloorTrigger, KeyObject};
pub use health::PlayerHealth;
