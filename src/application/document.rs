//! Document service: one tree, its selection, metadata, and lifecycle.

use std::path::{Path, PathBuf};

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::application::clipboard::Clipboard;
use crate::application::error::{DocumentError, DocumentResult};
use crate::domain::error::StructuralError;
use crate::domain::manifest::{Manifest, FORMAT_VERSION};
use crate::domain::tree::{NodeData, TreeArena};
use crate::export::dot::{DiagramOptions, DotExporter};
use crate::export::latex::LatexExporter;
use crate::infrastructure::archive;
use crate::infrastructure::error::FormatError;

/// Where a new or pasted node lands relative to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Child,
    Parent,
    Sibling,
}

/// One open tree document.
///
/// Owns the node arena and the current selection; every mutation marks the
/// document dirty until the next successful container save. The clipboard is
/// an injected capability so several documents in one host share a slot.
#[derive(Debug)]
pub struct Document {
    tree: TreeArena,
    selection: Option<Index>,
    manifest: Manifest,
    dirty: bool,
    last_path: Option<PathBuf>,
    clipboard: Clipboard,
}

impl Document {
    /// Fresh empty document sharing the host's clipboard.
    pub fn new(clipboard: Clipboard) -> Self {
        Self {
            tree: TreeArena::new(),
            selection: None,
            manifest: Manifest::default(),
            dirty: false,
            last_path: None,
            clipboard,
        }
    }

    /// Load a document from a container file.
    #[instrument(level = "debug", skip(clipboard))]
    pub fn open(path: &Path, clipboard: Clipboard) -> DocumentResult<Self> {
        let (manifest, record) = archive::load_path(path)?;
        let mut tree = TreeArena::new();
        let root = tree.build_record(&record);
        tree.set_root(root)?;
        debug!(version = %manifest.version, "document opened");
        Ok(Self {
            tree,
            selection: None,
            manifest,
            dirty: false,
            last_path: Some(path.to_path_buf()),
            clipboard,
        })
    }

    /// True for documents without any nodes.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// True when there are changes not yet saved to a container.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read access to the node graph.
    pub fn tree(&self) -> &TreeArena {
        &self.tree
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn selection(&self) -> Option<Index> {
        self.selection
    }

    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }

    /// Select a node. The index must belong to this document's tree.
    pub fn select(&mut self, node: Index) -> DocumentResult<()> {
        if self.tree.get(node).is_none() {
            return Err(StructuralError::UnknownNode.into());
        }
        self.selection = Some(node);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Free-form notes displayed along with the tree, such as the phrase a
    /// syntax tree was constructed from.
    pub fn notes(&self) -> &str {
        self.manifest.notes.as_deref().unwrap_or("")
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.manifest.notes = Some(notes.into());
        self.dirty = true;
    }

    /// Add a new node at `location` relative to the selection.
    ///
    /// Empty labels and values are stored as absent. In an empty document
    /// the new node becomes the root regardless of `location`; the new node
    /// becomes the selection.
    #[instrument(level = "debug", skip(self))]
    pub fn add(
        &mut self,
        location: Location,
        label: Option<&str>,
        value: Option<&str>,
    ) -> DocumentResult<Index> {
        let data = NodeData::new(normalize(label), normalize(value));
        let node = self.tree.new_node(data);
        self.place(location, node)
    }

    /// Edit the selected node. `None` leaves a field untouched; an empty
    /// string clears it to absent. Only an actual change dirties the
    /// document.
    pub fn edit(&mut self, label: Option<&str>, value: Option<&str>) -> DocumentResult<()> {
        let selection = self.selection.ok_or(DocumentError::NoSelection)?;
        let node = self
            .tree
            .get_mut(selection)
            .ok_or(StructuralError::UnknownNode)?;
        if let Some(label) = label {
            let label = normalize(Some(label));
            if node.data.label != label {
                node.data.label = label;
                self.dirty = true;
            }
        }
        if let Some(value) = value {
            let value = normalize(Some(value));
            if node.data.value != value {
                node.data.value = value;
                self.dirty = true;
            }
        }
        Ok(())
    }

    /// Delete the selected subtree.
    ///
    /// Deleting the root empties the document and clears the selection;
    /// otherwise the selection moves to the former parent.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self) -> DocumentResult<()> {
        let selection = self.selection.ok_or(DocumentError::NoSelection)?;
        if Some(selection) == self.tree.root() {
            self.tree.clear();
            self.selection = None;
        } else {
            let parent = self.tree.get(selection).and_then(|n| n.parent);
            self.tree.remove_subtree(selection)?;
            self.selection = parent;
        }
        self.dirty = true;
        Ok(())
    }

    /// Copy the selected subtree to the shared clipboard.
    pub fn copy(&self) -> DocumentResult<()> {
        let selection = self.selection.ok_or(DocumentError::NoSelection)?;
        let record = self.tree.to_record(selection)?;
        self.clipboard.put(record);
        Ok(())
    }

    /// Paste the clipboard subtree at `location`.
    ///
    /// Every paste builds fresh nodes; the slot is read, not cleared.
    #[instrument(level = "debug", skip(self))]
    pub fn paste(&mut self, location: Location) -> DocumentResult<Index> {
        let record = self
            .clipboard
            .get()
            .ok_or(DocumentError::EmptyClipboard)?;
        let node = self.tree.build_record(&record);
        self.place(location, node)
    }

    /// Move the selection one position toward the front of its siblings.
    pub fn move_up(&mut self) -> DocumentResult<()> {
        self.shift(-1)
    }

    /// Move the selection one position toward the back of its siblings.
    pub fn move_down(&mut self) -> DocumentResult<()> {
        self.shift(1)
    }

    /// Render the tree as LaTeX qtree source.
    pub fn to_latex(&self) -> DocumentResult<String> {
        let root = self.tree.root().ok_or(DocumentError::EmptyDocument)?;
        Ok(LatexExporter::new().render(&self.tree, root))
    }

    /// Render the tree as Graphviz DOT source with default options.
    pub fn to_dot(&self) -> DocumentResult<String> {
        self.to_dot_with(&DiagramOptions::default())
    }

    /// Render the tree as Graphviz DOT source. The graph is named after the
    /// last saved file, when there is one.
    pub fn to_dot_with(&self, options: &DiagramOptions) -> DocumentResult<String> {
        let root = self.tree.root().ok_or(DocumentError::EmptyDocument)?;
        let name = self
            .last_path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|stem| stem.to_string_lossy().into_owned());
        Ok(DotExporter::new(options.clone()).render(&self.tree, root, name.as_deref()))
    }

    /// Save to `path`, or to the last used path when `path` is `None`.
    ///
    /// A `.gv` destination receives DOT source. Anything else receives the
    /// versioned container, which also clears the dirty flag and becomes the
    /// new last path.
    #[instrument(level = "debug", skip(self))]
    pub fn save(&mut self, path: Option<&Path>) -> DocumentResult<()> {
        let path = match path.or(self.last_path.as_deref()) {
            Some(path) => path.to_path_buf(),
            None => return Err(DocumentError::NoDestination),
        };
        if path.extension().is_some_and(|ext| ext == "gv") {
            let dot = self.to_dot()?;
            std::fs::write(&path, dot).map_err(FormatError::from)?;
            return Ok(());
        }
        let root = self.tree.root().ok_or(DocumentError::EmptyDocument)?;
        let record = self.tree.to_record(root)?;
        archive::save_path(&path, &self.manifest, &record)?;
        self.manifest.version = FORMAT_VERSION.to_string();
        self.dirty = false;
        self.last_path = Some(path);
        Ok(())
    }

    fn shift(&mut self, offset: isize) -> DocumentResult<()> {
        let selection = self.selection.ok_or(DocumentError::NoSelection)?;
        if Some(selection) == self.tree.root() {
            return Err(DocumentError::RootImmutable);
        }
        // Boundary positions clamp to a no-op instead of erroring.
        if self.tree.shift_child(selection, offset)? {
            self.dirty = true;
        }
        Ok(())
    }

    fn place(&mut self, location: Location, node: Index) -> DocumentResult<Index> {
        if let Err(err) = self.try_place(location, node) {
            self.tree.remove_subtree(node).ok();
            return Err(err);
        }
        self.selection = Some(node);
        self.dirty = true;
        Ok(node)
    }

    fn try_place(&mut self, location: Location, node: Index) -> DocumentResult<()> {
        if self.tree.is_empty() {
            self.tree.set_root(node)?;
            return Ok(());
        }
        let selection = self.selection.ok_or(DocumentError::NoSelection)?;
        match location {
            Location::Child => self.tree.attach_child(selection, node)?,
            Location::Parent => {
                if Some(selection) == self.tree.root() {
                    self.tree.attach_child(node, selection)?;
                    self.tree.set_root(node)?;
                } else {
                    self.tree.insert_parent(selection, node)?;
                }
            }
            Location::Sibling => {
                if Some(selection) == self.tree.root() {
                    return Err(StructuralError::RootSibling.into());
                }
                let parent = self
                    .tree
                    .get(selection)
                    .and_then(|n| n.parent)
                    .ok_or(StructuralError::UnknownNode)?;
                self.tree.attach_child(parent, node)?;
            }
        }
        Ok(())
    }
}

/// Empty strings are stored as absent.
fn normalize(text: Option<&str>) -> Option<String> {
    match text {
        Some("") | None => None,
        Some(text) => Some(text.to_string()),
    }
}
