//! Articulated ragdoll rig for Strider
//!
//! This crate is the physics-facing surface of the walker environment:
//! - Named body segments and their per-tick kinematic state
//! - A rig registry that owns segment lifetime and accepts joint actuation
//! - A goal-relative orientation frame for expressing velocities/positions
//!
//! The rigid-body simulation itself is an external service; the registry
//! here only stores the state that service advances each tick.

pub mod orientation;
pub mod rig;
pub mod segment;

pub use orientation::OrientationFrame;
pub use rig::{RagdollRig, RigAccess, RigControl, RigError};
pub use segment::{SegmentId, SegmentState};
