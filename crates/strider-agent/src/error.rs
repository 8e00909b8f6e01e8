//! Agent error taxonomy

use strider_rig::{RigError, SegmentId};
use thiserror::Error;

/// Errors surfaced by the locomotion agent.
///
/// Numeric and action-contract violations are fatal for the step: continuing
/// would corrupt the reward stream or half-apply actuation. Lookup failures
/// at initialization are handled as degraded-mode conditions instead and
/// never reach this enum.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The policy produced an action vector of the wrong length
    #[error("action vector length mismatch: expected {expected}, got {actual}")]
    InvalidAction { expected: usize, actual: usize },

    /// A reward term evaluated to NaN or infinity, which indicates a
    /// degenerate physical configuration
    #[error("non-finite value in {term} reward term")]
    NonFiniteReward { term: &'static str },

    /// A segment the contract requires was missing from the rig
    #[error("segment {0} unavailable in rig")]
    SegmentUnavailable(SegmentId),

    /// Error from the underlying rig registry
    #[error(transparent)]
    Rig(#[from] RigError),
}
