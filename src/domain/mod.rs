//! Domain layer: the tree, its serialized forms, and the markup translator
//!
//! This layer is independent of external concerns (no I/O, no host UI).

pub mod error;
pub mod manifest;
pub mod markup;
pub mod record;
pub mod tree;

pub use error::{StructuralError, TreeResult};
pub use manifest::{Manifest, FORMAT_VERSION};
pub use markup::{MarkupTranslator, Translation};
pub use record::NodeRecord;
pub use tree::{NodeData, TreeArena, TreeNode, UNLABELLED};
