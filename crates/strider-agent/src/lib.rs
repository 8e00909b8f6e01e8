//! Locomotion agent for the Strider walker environment
//!
//! This crate implements the environment side of the observation/action/reward
//! contract for a physics-simulated humanoid ragdoll:
//! - Fixed-schema observation construction in a goal-relative frame
//! - Positional action decoding into per-joint actuation
//! - Shaped rewards for velocity matching, balance, and gaze
//! - A patrol/chase behavior state machine driven by external trigger events
//!
//! The policy that consumes observations and produces actions is external;
//! so is the rigid-body simulation behind the rig traits.

pub mod action;
pub mod agent;
pub mod config;
pub mod error;
pub mod events;
pub mod observation;
pub mod patrol;
pub mod reward;

pub use action::ACTION_LEN;
pub use agent::{AgentState, LocomotionAgent};
pub use config::AgentConfig;
pub use error::AgentError;
pub use events::{chase_channel, ChaseEvent, ChaseReceiver, ChaseSender};
pub use observation::{ObservationSchema, OBSERVATION_LEN};
pub use patrol::PatrolPath;
