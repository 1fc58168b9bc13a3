//! Exporters: LaTeX (qtree) and Graphviz DOT renderings
//!
//! Both read the tree without mutating it; neither output round-trips back
//! into a document.

pub mod dot;
pub mod latex;

pub use dot::{DiagramOptions, DotExporter};
pub use latex::LatexExporter;
