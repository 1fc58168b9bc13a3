//! Application layer: document lifecycle and editing services

pub mod clipboard;
pub mod document;
pub mod error;

pub use clipboard::Clipboard;
pub use document::{Document, Location};
pub use error::{DocumentError, DocumentResult};
