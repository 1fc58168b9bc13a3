//! Persistence-layer errors

use thiserror::Error;
use zip::result::ZipError;

/// Errors reading or writing a container.
///
/// The read path is deliberately coarse: a missing entry, a corrupt archive,
/// and malformed JSON all surface as [`FormatError::Damaged`]. Only the
/// version gate carries detail, so a host can tell the user which version to
/// upgrade to.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("this file requires version {required} or later (running {running})")]
    TooNew { running: String, required: String },

    #[error("invalid, very outdated, or damaged file")]
    Damaged,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for container operations.
pub type FormatResult<T> = Result<T, FormatError>;

impl From<ZipError> for FormatError {
    fn from(err: ZipError) -> Self {
        match err {
            ZipError::Io(err) => Self::Io(err),
            _ => Self::Damaged,
        }
    }
}
