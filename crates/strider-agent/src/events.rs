//! Chase request channel
//!
//! Trigger volumes never call into the agent directly. They publish events
//! on this channel and the agent drains them at the next tick boundary,
//! which keeps the agent the sole writer of its own state within a tick.

use std::sync::mpsc;

/// Behavior change requested by an external collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaseEvent {
    /// The tracked player entered sensing range
    Start,
    /// Chase called off (never produced by this crate; exposed for
    /// collaborators that need it)
    Stop,
}

/// Publishing side, held by trigger volumes
pub type ChaseSender = mpsc::Sender<ChaseEvent>;

/// Draining side, held by the agent
pub type ChaseReceiver = mpsc::Receiver<ChaseEvent>;

/// Create a connected publisher/drainer pair
pub fn chase_channel() -> (ChaseSender, ChaseReceiver) {
    mpsc::channel()
}
