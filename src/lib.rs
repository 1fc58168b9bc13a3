//! Document engine for ordered, labeled trees (e.g., linguistic syntax
//! trees): structural editing with strict invariants, embedded-markup
//! translation, LaTeX/Graphviz export, and a versioned container format.
//!
//! Hosts instantiate a [`Document`] (sharing one [`Clipboard`] across all
//! open documents) and drive it through the edit API; the exporters and the
//! container codec read the tree without mutating it.

pub mod application;
pub mod domain;
pub mod export;
pub mod infrastructure;
pub mod util;

pub use application::{Clipboard, Document, DocumentError, DocumentResult, Location};
pub use domain::{
    Manifest, MarkupTranslator, NodeData, NodeRecord, StructuralError, Translation, TreeArena,
    FORMAT_VERSION,
};
pub use export::{DiagramOptions, DotExporter, LatexExporter};
pub use infrastructure::{FormatError, FormatResult};
