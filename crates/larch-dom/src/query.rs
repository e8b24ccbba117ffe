//! Linear-scan lookups over the registry.
//!
//! All queries walk [`DomTree::registry`] in order and never visit the root
//! element, so the root can't be found by tag, id, or class.

use crate::{DomTree, Node, NodeId};

impl DomTree {
    fn registry_nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.registry()
            .iter()
            .filter_map(|&id| self.get(id).map(|node| (id, node)))
    }

    /// All registry nodes whose tag equals `tag` exactly (case-sensitive),
    /// in registry order.
    #[must_use]
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.registry_nodes()
            .filter(|(_, node)| node.tag == tag)
            .map(|(id, _)| id)
            .collect()
    }

    /// The first registry node whose `id` attribute equals `id`.
    ///
    /// Later nodes carrying the same id are ignored.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.registry_nodes()
            .find(|(_, node)| node.id() == Some(id))
            .map(|(node_id, _)| node_id)
    }

    /// All registry nodes whose `class` attribute equals `class` exactly.
    ///
    /// `class="a b"` matches `"a b"` only, not `"a"`.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.registry_nodes()
            .filter(|(_, node)| node.class() == Some(class))
            .map(|(id, _)| id)
            .collect()
    }
}
