//! Graphviz DOT exporter.

use std::collections::HashSet;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

use crate::domain::markup::MarkupTranslator;
use crate::domain::tree::TreeArena;

/// Literal glyph substitutions applied before labels reach the graph.
const REPLACEMENTS: [(&str, &str); 2] = [("<null/>", "Ø"), ("<bar/>", "<sup>′</sup>")];

/// Identifier used when a label reduces to nothing.
const FALLBACK_ID: &str = "node";

/// Graph-level rendering knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiagramOptions {
    /// Raster resolution hint
    pub dpi: u32,
    /// Horizontal separation between sibling nodes, in inches
    pub nodesep: f64,
    /// Edge height between ranks, in inches (Graphviz minimum is 0.02)
    pub ranksep: f64,
    /// Shape applied to every node statement
    pub shape: String,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            dpi: 400,
            nodesep: 0.25,
            ranksep: 0.02,
            shape: "plain".to_string(),
        }
    }
}

/// Renders a tree as undirected Graphviz DOT source.
///
/// Pre-order traversal; each node emits a node statement followed by the
/// edge to its parent. Identifiers come from the identifier-safe translation
/// of each label and are deduplicated across the whole export by appending
/// the first free numeric suffix.
#[derive(Debug)]
pub struct DotExporter {
    options: DiagramOptions,
    translator: MarkupTranslator,
    used_ids: HashSet<String>,
}

impl DotExporter {
    pub fn new(options: DiagramOptions) -> Self {
        Self {
            options,
            translator: MarkupTranslator::new(),
            used_ids: HashSet::new(),
        }
    }

    /// Full export, optionally carrying a graph name (e.g. the file stem).
    pub fn render(&mut self, tree: &TreeArena, root: Index, name: Option<&str>) -> String {
        self.used_ids.clear();
        let mut out = String::new();
        match name {
            Some(name) => out.push_str(&format!("graph {} {{\n", quote_id(name))),
            None => out.push_str("graph {\n"),
        }
        out.push_str(&format!(
            "  graph [dpi={}, nodesep={}, ranksep={}]\n",
            self.options.dpi, self.options.nodesep, self.options.ranksep
        ));
        out.push_str(&format!("  node [shape={}]\n", self.options.shape));
        self.render_node(tree, root, None, &mut out);
        out.push_str("}\n");
        out
    }

    fn render_node(
        &mut self,
        tree: &TreeArena,
        node: Index,
        parent_id: Option<&str>,
        out: &mut String,
    ) {
        let Some(n) = tree.get(node) else { return };
        let raw_label = n.data.label_text();
        let id = self.fresh_id(raw_label);
        let label = self.display_label(
            raw_label,
            n.data.value.as_deref().filter(|v| !v.is_empty()),
        );
        out.push_str(&format!("  {} [label={}]\n", quote_id(&id), label));
        if let Some(parent_id) = parent_id {
            out.push_str(&format!("  {} -- {}\n", quote_id(parent_id), quote_id(&id)));
        }
        for &child in &n.children {
            self.render_node(tree, child, Some(&id), out);
        }
    }

    /// Identifier-safe name for a label, unique within this export.
    ///
    /// Empty results fall back to a generic placeholder; duplicates get the
    /// first free numeric suffix (`DP`, `DP2`, `DP3`, …).
    fn fresh_id(&mut self, raw_label: &str) -> String {
        let base = self.translator.translate(raw_label).plain;
        let base = if base.is_empty() {
            FALLBACK_ID.to_string()
        } else {
            base
        };
        let mut id = base.clone();
        let mut suffix = 1u32;
        while !self.used_ids.insert(id.clone()) {
            suffix += 1;
            id = format!("{base}{suffix}");
        }
        id
    }

    /// Display label for one node.
    ///
    /// Value-bearing nodes always render the two-line rich label
    /// `<label<br/>value>`; plain nodes are wrapped in `<…>` only when the
    /// substituted text still reads as valid markup.
    fn display_label(&mut self, raw_label: &str, value: Option<&str>) -> String {
        if let Some(value) = value {
            return format!(
                "<{}<br/>{}>",
                self.escape_if_needed(raw_label),
                self.escape_if_needed(value)
            );
        }
        let label = self.escape_if_needed(raw_label);
        if self.translator.translate(&label).valid {
            format!("<{label}>")
        } else {
            quote_string(&label)
        }
    }

    /// Glyph-substituted text when the raw markup is valid, HTML-escaped
    /// text otherwise.
    fn escape_if_needed(&mut self, text: &str) -> String {
        if self.translator.translate(text).valid {
            let mut cleaned = text.to_string();
            for (from, to) in REPLACEMENTS {
                cleaned = cleaned.replace(from, to);
            }
            cleaned
        } else {
            html_escape(text)
        }
    }
}

/// Escape the five HTML-significant characters.
fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// DOT reserved words; never valid as bare identifiers.
const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Quote an identifier unless it is a bare DOT ID (alphanumeric or
/// underscore, not digit-initial, not a keyword).
fn quote_id(id: &str) -> String {
    let bare = !id.is_empty()
        && !id.starts_with(|c: char| c.is_ascii_digit())
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&id.to_ascii_lowercase().as_str());
    if bare {
        id.to_string()
    } else {
        quote_string(id)
    }
}

fn quote_string(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
