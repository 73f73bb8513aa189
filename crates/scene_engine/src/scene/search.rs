//! Tree searches
//!
//! All searches are depth-first pre-order over the descendants of a node,
//! excluding the node itself, visiting children in insertion order.

use super::{NodeId, SceneGraph};

/// Pre-order iterator over the descendants of a node
///
/// Created by [`SceneGraph::descendants`].
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // Reversed so the first child is popped first.
        self.stack.extend(self.graph.children(id).iter().rev());
        Some(id)
    }
}

impl SceneGraph {
    /// Iterate over every descendant of `node` in pre-order
    pub fn descendants(&self, node: NodeId) -> Descendants<'_> {
        Descendants {
            graph: self,
            stack: self.children(node).iter().rev().copied().collect(),
        }
    }

    /// First descendant named `name`
    pub fn find_child(&self, node: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(node).find(|&id| self.name_is(id, name))
    }

    /// Every descendant named `name`, in pre-order
    pub fn find_children(&self, node: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(node).filter(|&id| self.name_is(id, name)).collect()
    }

    /// Whether `target` is a descendant of `node`
    pub fn find_child_by_id(&self, node: NodeId, target: NodeId) -> bool {
        if node == target || !self.contains(target) {
            return false;
        }
        self.ancestors(target).any(|id| id == node)
    }

    /// Root of the tree containing `node` (the node itself if it has no
    /// parent)
    pub fn root_of(&self, node: NodeId) -> Option<NodeId> {
        if !self.contains(node) {
            return None;
        }
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        Some(current)
    }

    /// Slash-joined names from the root down to `node`
    pub fn path_of(&self, node: NodeId) -> Option<String> {
        let mut names: Vec<&str> = vec![self.node(node)?.name()];
        names.extend(self.ancestors(node).filter_map(|id| self.node(id).map(|n| n.name())));
        names.reverse();
        Some(names.join("/"))
    }

    fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |&id| self.parent(id))
    }

    fn name_is(&self, node: NodeId, name: &str) -> bool {
        self.node(node).is_some_and(|node| node.name() == name)
    }
}
