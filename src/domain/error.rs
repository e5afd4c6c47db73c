//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid lineage data.
/// Any of them fails the whole forest build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cycle detected in tree '{tree}' at member: {member_id}")]
    CycleDetected { tree: String, member_id: String },

    #[error("invalid member record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("mentor chain in tree '{tree}' exceeds maximum depth {depth}")]
    DepthExceeded { tree: String, depth: usize },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
