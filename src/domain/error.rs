//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Violations of the tree's structural invariants.
///
/// Raised at the API boundary; a failed operation never mutates the tree.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralError {
    #[error("node already has a parent")]
    AlreadyAttached,

    #[error("node has no parent")]
    Unattached,

    #[error("the root cannot have siblings")]
    RootSibling,

    #[error("node does not belong to this tree")]
    UnknownNode,
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, StructuralError>;
