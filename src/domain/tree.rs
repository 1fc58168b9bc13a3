//! Arena-backed ordered labeled tree.
//!
//! One arena owns every node of one document. Structural operations validate
//! the tree invariants at the API boundary and leave the tree untouched when
//! they fail.

use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{StructuralError, TreeResult};
use crate::domain::record::NodeRecord;

/// Placeholder shown for nodes without a label.
pub const UNLABELLED: &str = "UNLABELLED";

/// Payload of a tree node: an optional label and an optional value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeData {
    pub label: Option<String>,
    pub value: Option<String>,
}

impl NodeData {
    pub fn new(label: Option<String>, value: Option<String>) -> Self {
        Self { label, value }
    }

    /// Label text as fed to the exporters; absent labels read as empty input.
    pub fn label_text(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => UNLABELLED,
        };
        match self.value.as_deref() {
            Some(value) if !value.is_empty() => write!(f, "{}: {}", label, value),
            _ => write!(f, "{}", label),
        }
    }
}

/// Tree node stored in the arena.
#[derive(Debug)]
pub struct TreeNode {
    /// Label/value payload for this node
    pub data: NodeData,
    /// Index of the parent node, None for unattached nodes and the root
    pub parent: Option<Index>,
    /// Indices of child nodes, in insertion order
    pub children: Vec<Index>,
}

/// Arena-based tree structure owning every node of one document.
///
/// Uses a generational arena for memory-safe node references and O(1)
/// lookups; stale indices are detected instead of dangling. Cycles are ruled
/// out by construction: only fresh, parentless subtrees are ever attached.
#[derive(Debug, Default)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Create a new unattached node.
    #[instrument(level = "trace", skip(self))]
    pub fn new_node(&mut self, data: NodeData) -> Index {
        self.arena.insert(TreeNode {
            data,
            parent: None,
            children: Vec::new(),
        })
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// True when the tree has no root.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Make `node` the root. The node must exist in this arena.
    pub fn set_root(&mut self, node: Index) -> TreeResult<()> {
        self.require(node)?;
        self.root = Some(node);
        Ok(())
    }

    /// Drop the root and every node with it.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    pub fn get(&self, node: Index) -> Option<&TreeNode> {
        self.arena.get(node)
    }

    pub fn get_mut(&mut self, node: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(node)
    }

    fn require(&self, node: Index) -> TreeResult<&TreeNode> {
        self.arena.get(node).ok_or(StructuralError::UnknownNode)
    }

    /// Append `child` to `parent`'s children and set the back-reference.
    ///
    /// Fails when `child` already has a parent; a node hangs off at most one
    /// place at a time.
    #[instrument(level = "trace", skip(self))]
    pub fn attach_child(&mut self, parent: Index, child: Index) -> TreeResult<()> {
        self.require(parent)?;
        if self.require(child)?.parent.is_some() {
            return Err(StructuralError::AlreadyAttached);
        }
        if let Some(p) = self.arena.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.arena.get_mut(child) {
            c.parent = Some(parent);
        }
        Ok(())
    }

    /// Remove `node` from its parent's children and clear the back-reference.
    ///
    /// The subtree below `node` stays intact and the relative order of its
    /// former siblings is untouched. Detaching the root (or any parentless
    /// node) is a caller-handled case and fails here.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, node: Index) -> TreeResult<()> {
        let parent = self
            .require(node)?
            .parent
            .ok_or(StructuralError::Unattached)?;
        if let Some(p) = self.arena.get_mut(parent) {
            p.children.retain(|&c| c != node);
        }
        if let Some(n) = self.arena.get_mut(node) {
            n.parent = None;
        }
        Ok(())
    }

    /// Splice `new_parent` into `node`'s position among its siblings, then
    /// make `node` its sole child.
    ///
    /// `node` must be attached and `new_parent` must not be; the sibling
    /// index is preserved.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_parent(&mut self, node: Index, new_parent: Index) -> TreeResult<()> {
        let old_parent = self
            .require(node)?
            .parent
            .ok_or(StructuralError::Unattached)?;
        if self.require(new_parent)?.parent.is_some() {
            return Err(StructuralError::AlreadyAttached);
        }
        let pos = self
            .require(old_parent)?
            .children
            .iter()
            .position(|&c| c == node)
            .ok_or(StructuralError::UnknownNode)?;
        if let Some(p) = self.arena.get_mut(old_parent) {
            p.children[pos] = new_parent;
        }
        if let Some(np) = self.arena.get_mut(new_parent) {
            np.parent = Some(old_parent);
            np.children.push(node);
        }
        if let Some(n) = self.arena.get_mut(node) {
            n.parent = Some(new_parent);
        }
        Ok(())
    }

    /// Swap `node` with the sibling `offset` positions away.
    ///
    /// Returns `Ok(false)` without mutating when the target position falls
    /// outside the sibling list. Fails for the root and other parentless
    /// nodes.
    #[instrument(level = "trace", skip(self))]
    pub fn shift_child(&mut self, node: Index, offset: isize) -> TreeResult<bool> {
        let parent = self
            .require(node)?
            .parent
            .ok_or(StructuralError::Unattached)?;
        let siblings = &self.require(parent)?.children;
        let pos = siblings
            .iter()
            .position(|&c| c == node)
            .ok_or(StructuralError::UnknownNode)? as isize;
        let target = pos + offset;
        if target < 0 || target >= siblings.len() as isize {
            return Ok(false);
        }
        if let Some(p) = self.arena.get_mut(parent) {
            p.children.swap(pos as usize, target as usize);
        }
        Ok(true)
    }

    /// Detach `node` (when attached) and drop it and all descendants from
    /// the arena.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_subtree(&mut self, node: Index) -> TreeResult<()> {
        if self.require(node)?.parent.is_some() {
            self.detach(node)?;
        }
        if self.root == Some(node) {
            self.root = None;
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(removed) = self.arena.remove(current) {
                stack.extend(removed.children);
            }
        }
        Ok(())
    }

    /// Lossless record form of the subtree rooted at `node`.
    pub fn to_record(&self, node: Index) -> TreeResult<NodeRecord> {
        let n = self.require(node)?;
        let mut children = Vec::with_capacity(n.children.len());
        for &child in &n.children {
            children.push(self.to_record(child)?);
        }
        Ok(NodeRecord {
            label: n.data.label.clone(),
            value: n.data.value.clone(),
            children,
        })
    }

    /// Build a fresh, unattached subtree from its record form.
    #[instrument(level = "trace", skip(self, record))]
    pub fn build_record(&mut self, record: &NodeRecord) -> Index {
        let node = self.new_node(NodeData::new(record.label.clone(), record.value.clone()));
        for child_record in &record.children {
            let child = self.build_record(child_record);
            // Both nodes are freshly created, so the links cannot collide.
            if let Some(c) = self.arena.get_mut(child) {
                c.parent = Some(node);
            }
            if let Some(n) = self.arena.get_mut(node) {
                n.children.push(child);
            }
        }
        node
    }

    /// Pre-order iterator over the tree, starting at the root.
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    /// Post-order iterator over the tree (leaves before their parents).
    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Number of levels in the tree; empty trees have depth 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node: Index) -> usize {
        if let Some(n) = self.get(node) {
            1 + n
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }
}

pub struct TreeIterator<'a> {
    tree: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a TreeArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                if !visited {
                    self.stack.push((current, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current, node));
                }
            }
        }
        None
    }
}
