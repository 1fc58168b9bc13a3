//! Application-level errors (wrap domain and persistence errors)

use thiserror::Error;

use crate::domain::error::StructuralError;
use crate::infrastructure::error::FormatError;

/// Errors surfaced by document operations.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("no node is selected")]
    NoSelection,

    #[error("the clipboard is empty")]
    EmptyClipboard,

    #[error("the root cannot be reordered")]
    RootImmutable,

    #[error("the document has no nodes")]
    EmptyDocument,

    #[error("no destination path")]
    NoDestination,

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
