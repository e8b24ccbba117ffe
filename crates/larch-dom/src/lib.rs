//! Node tree for the Larch parser.
//!
//! This crate provides an arena-based tree of HTML elements together with the
//! flat registry the tree builder fills while it consumes markup.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Parents
//! are stored as `Option<NodeId>`, so there are no reference cycles.
//!
//! The root element is deliberately *not* part of the registry: every registry
//! query (see [`query`]) covers all elements except the root.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Index;

use serde::Serialize;
use thiserror::Error;

/// Registry lookups by tag, `id` and `class`.
pub mod query;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the node arena.
///
/// Doubles as the node's identity in diagnostics: two handles are the same
/// node exactly when their indices are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single element and the text that trails its opening tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Tag name exactly as written in the source (no case folding).
    pub tag: String,

    /// Raw text after the tag's `>` up to the next `<`. May be empty.
    pub content: String,

    /// Attribute values with surrounding quotes already removed.
    pub attributes: AttributesMap,

    /// `None` for the root and for detached nodes.
    pub parent: Option<NodeId>,

    /// Children in attachment order.
    pub children: Vec<NodeId>,
}

impl Node {
    /// Create a detached node with no children.
    #[must_use]
    pub fn new(tag: impl Into<String>, content: impl Into<String>, attributes: AttributesMap) -> Self {
        Self {
            tag: tag.into(),
            content: content.into(),
            attributes,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Look up an attribute value by exact name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns the element's `id` attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Returns the raw `class` attribute value if present.
    ///
    /// The value is not split into tokens; `"a b"` is a single class string.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.attr("class")
    }
}

/// Errors raised by structural mutations of a [`DomTree`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The id does not address a node in this tree.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    /// `remove_child` was given a node that is not currently a child.
    #[error("node {child} is not a child of node {parent}")]
    ChildNotFound {
        /// The node whose children were searched.
        parent: NodeId,
        /// The node that was expected among them.
        child: NodeId,
    },

    /// A positional access past the end of a children list.
    #[error("child index {index} out of range for node {parent} with {len} children")]
    IndexOutOfRange {
        /// The node whose children were indexed.
        parent: NodeId,
        /// The requested position.
        index: usize,
        /// Number of children at the time of the call.
        len: usize,
    },

    /// Attaching a node under itself or one of its own descendants.
    #[error("node {child} cannot become a child of its own descendant {parent}")]
    HierarchyRequest {
        /// The prospective parent.
        parent: NodeId,
        /// The node that would have been inserted.
        child: NodeId,
    },
}

/// Arena-based element tree with a flat registry of constructed nodes.
///
/// All nodes live in one contiguous vector, using indices for every
/// relationship. The tree is built once per parse and discarded as a whole;
/// nodes are never freed individually.
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    /// All nodes ever allocated, indexed by `NodeId`.
    nodes: Vec<Node>,

    /// The first normal (non-void) element of the document.
    root: Option<NodeId>,

    /// Every registered node except the root, in registration order.
    registry: Vec<NodeId>,
}

impl DomTree {
    /// Create an empty tree with no root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The root element, if the document had one.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Make `id` the root element. The root is never added to the registry.
    pub const fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Every registered node except the root, in document order.
    #[must_use]
    pub fn registry(&self) -> &[NodeId] {
        &self.registry
    }

    /// Append `id` to the registry.
    pub fn register(&mut self, id: NodeId) {
        self.registry.push(id);
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of allocated nodes, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether no node has been allocated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree nor registered.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Tag name of a node.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| n.tag.as_str())
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// The child of `parent` at `index`.
    #[must_use]
    pub fn child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.children(parent).get(index).copied()
    }

    fn ensure_exists(&self, id: NodeId) -> Result<(), DomError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(DomError::UnknownNode(id))
        }
    }

    /// Detach `child` from whatever parent currently holds it.
    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|&c| c != child);
        }
    }

    /// Appends `child` as the last child of `parent`. A child that already has
    /// a parent is moved, so it stays in exactly one children list.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownNode`] for ids outside the arena and
    /// [`DomError::HierarchyRequest`] if `child` is `parent` or one of its
    /// ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.ensure_exists(parent)?;
        self.ensure_exists(child)?;
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Removes `child` from `parent`'s children. The child stays allocated
    /// (and registered) but no longer has a parent.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::ChildNotFound`] if `child` is not currently a child
    /// of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.ensure_exists(parent)?;
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(DomError::ChildNotFound { parent, child })?;

        let _ = self.nodes[parent.0].children.remove(position);
        self.nodes[child.0].parent = None;
        Ok(())
    }

    /// Put `new_child` at position `index` of `parent`'s children and return
    /// the node it displaced, which is left detached.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::IndexOutOfRange`] if `index` is past the end, and the
    /// same errors as [`DomTree::add_child`] for invalid nodes.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        index: usize,
        new_child: NodeId,
    ) -> Result<NodeId, DomError> {
        self.ensure_exists(parent)?;
        self.ensure_exists(new_child)?;
        let len = self.nodes[parent.0].children.len();
        if index >= len {
            return Err(DomError::IndexOutOfRange { parent, index, len });
        }
        let old = self.nodes[parent.0].children[index];
        if old == new_child {
            return Ok(old);
        }
        if parent == new_child || self.is_descendant_of(parent, new_child) {
            return Err(DomError::HierarchyRequest {
                parent,
                child: new_child,
            });
        }

        // Detaching may shift the slot when new_child is an earlier sibling.
        self.detach(new_child);
        let slot = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == old)
            .ok_or(DomError::ChildNotFound { parent, child: old })?;
        self.nodes[parent.0].children[slot] = new_child;
        self.nodes[new_child.0].parent = Some(parent);
        self.nodes[old.0].parent = None;
        Ok(old)
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Depth-first, pre-order walk starting at `id` (inclusive).
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: if self.get(id).is_some() { vec![id] } else { Vec::new() },
        }
    }

    /// Diagnostic rendering of one node, see [`NodeDisplay`].
    #[must_use]
    pub const fn display_node(&self, id: NodeId) -> NodeDisplay<'_> {
        NodeDisplay { tree: self, id }
    }
}

impl Index<NodeId> for DomTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

/// Renders every registry node on its own line.
impl fmt::Display for DomTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &id in &self.registry {
            writeln!(f, "{}", self.display_node(id))?;
        }
        Ok(())
    }
}

/// One-line debug rendering of a node:
/// `{id | Tag: tag; Content: text; Parent: pid ptag; Attrib: {..}}`.
///
/// Attributes are printed sorted by name so output is stable.
pub struct NodeDisplay<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(node) = self.tree.get(self.id) else {
            return write!(f, "{{{} | <missing>}}", self.id);
        };
        write!(f, "{{{} | Tag: {}; Content: {}; Parent: ", self.id, node.tag, node.content)?;
        match node.parent {
            Some(parent) => write!(f, "{parent} {}", self.tree.tag(parent).unwrap_or_default())?,
            None => write!(f, "None")?,
        }
        let attrs: BTreeMap<&str, &str> = node
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        write!(f, "; Attrib: {attrs:?}}}")
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
