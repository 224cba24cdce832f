//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the probability tree's own rules.
/// These are independent of prompting, rendering and config loading.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("outcome set is empty")]
    EmptyOutcomeSet,

    #[error("duplicate outcome name: {0}")]
    DuplicateOutcome(String),

    #[error("invalid probability for '{outcome}': {value} (expected 0.0 - 1.0)")]
    InvalidProbability { outcome: String, value: f64 },

    #[error("invalid outcome '{spec}': {reason}")]
    InvalidOutcomeSpec { spec: String, reason: String },

    #[error("{outcomes} outcomes over {trials} trials exceed the tree size limit ({limit} nodes and their labels)")]
    NodeLimitExceeded {
        outcomes: usize,
        trials: u32,
        limit: u64,
    },

    #[error("tree has no root node")]
    MissingRoot,

    #[error("node is not reachable from the root: {0}")]
    DisconnectedNode(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
