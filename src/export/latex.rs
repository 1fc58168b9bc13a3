//! LaTeX (qtree) exporter.

use generational_arena::Index;

use crate::domain::markup::MarkupTranslator;
use crate::domain::tree::TreeArena;

/// Comment emitted at the top of every export.
const PREAMBLE_HINT: &str = "% Add \\usepackage{qtree} to the preamble of your document.";

const INDENT: &str = "  ";

/// Renders a tree as LaTeX source for the qtree package.
///
/// Depth-first, one node per line, indented by depth. Nodes with children
/// open a `[.` group closed on its own line; leaves below the root render
/// inline. Depth 0 is never a leaf, so a childless root still gets its
/// bracket pair. Labels and values go through the markup translator and fall
/// back to the raw text when the markup is invalid.
#[derive(Debug, Default)]
pub struct LatexExporter {
    translator: MarkupTranslator,
}

impl LatexExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full export: preamble hint, blank line, `\Tree` and the bracket body.
    pub fn render(&mut self, tree: &TreeArena, root: Index) -> String {
        let mut out = String::new();
        out.push_str(PREAMBLE_HINT);
        out.push_str("\n\n\\Tree ");
        self.render_node(tree, root, 0, &mut out);
        out
    }

    fn render_node(&mut self, tree: &TreeArena, node: Index, level: usize, out: &mut String) {
        let Some(n) = tree.get(node) else { return };
        let label = self.translated(n.data.label_text());
        let value = n
            .data
            .value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| self.translated(v));
        let leaf = n.children.is_empty() && level > 0;

        for _ in 0..level {
            out.push_str(INDENT);
        }
        if !leaf {
            out.push_str("[.");
        }
        out.push_str(&label);
        if let Some(value) = value {
            out.push_str("\\\\");
            out.push_str(&value);
        }
        out.push('\n');
        for &child in &n.children {
            self.render_node(tree, child, level + 1, out);
        }
        if !leaf {
            for _ in 0..level {
                out.push_str(INDENT);
            }
            out.push_str("]\n");
        }
    }

    /// Translated text when the markup is valid, the raw text otherwise.
    fn translated(&mut self, raw: &str) -> String {
        let translation = self.translator.translate(raw);
        if translation.valid {
            translation.tex
        } else {
            raw.to_string()
        }
    }
}
