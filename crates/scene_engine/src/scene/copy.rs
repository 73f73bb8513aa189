//! Deep copies of subtrees
//!
//! A copy is taken in two passes: the source subtree is first snapshotted
//! (names, transforms and cloned components, in pre-order), then the snapshot
//! is instantiated. Every fallible step happens in the first pass, so a failed
//! copy leaves the graph untouched.

use super::{Component, NodeId, SceneError, SceneGraph};
use crate::foundation::math::Transform;

struct NodeCopy {
    name: String,
    transform: Transform,
    /// Index of the parent copy, `None` for the subtree root
    parent: Option<usize>,
    components: Vec<Box<dyn Component>>,
}

impl SceneGraph {
    /// Deep copy `src` and its subtree into a new detached root
    ///
    /// Names, transforms and child order are copied; components are cloned
    /// through [`Component::clone_box`]. The copy has no parent and is
    /// `Active` even if `src` was marked for deletion.
    pub fn clone_subtree(&mut self, src: NodeId) -> Result<NodeId, SceneError> {
        let copies = self.snapshot(src)?;
        let count = copies.len();
        let root = self.instantiate(copies, None)?;
        log::debug!("Cloned subtree {:?} into {:?} ({} nodes)", src, root, count);
        Ok(root)
    }

    /// Replace the contents of `dst` with a deep copy of `src`
    ///
    /// `dst` keeps its key, its parent and its deletion state. Its name,
    /// transform, components and children are replaced. Assigning a node to
    /// itself does nothing.
    pub fn assign_from(&mut self, dst: NodeId, src: NodeId) -> Result<(), SceneError> {
        if !self.contains(dst) {
            return Err(SceneError::NodeNotFound(dst));
        }
        if dst == src {
            return Ok(());
        }

        let copies = self.snapshot(src)?;
        self.clear_contents(dst);
        self.instantiate(copies, Some(dst))?;
        log::debug!("Assigned subtree {:?} to {:?}", src, dst);
        Ok(())
    }

    fn snapshot(&self, src: NodeId) -> Result<Vec<NodeCopy>, SceneError> {
        let mut copies = Vec::new();
        let mut stack = vec![(src, None)];

        while let Some((id, parent)) = stack.pop() {
            let node = self.node(id).ok_or(SceneError::NodeNotFound(id))?;

            let mut components = Vec::with_capacity(node.components.len());
            for entry in &node.components {
                let slot = self
                    .components
                    .get(entry.id)
                    .ok_or(SceneError::ComponentCheckedOut(entry.id))?;
                let component = slot
                    .component
                    .as_deref()
                    .ok_or(SceneError::ComponentCheckedOut(entry.id))?;
                let clone = component
                    .clone_box()
                    .ok_or(SceneError::ComponentNotClonable { type_name: slot.type_name })?;
                components.push(clone);
            }

            let index = copies.len();
            copies.push(NodeCopy {
                name: node.name().to_owned(),
                transform: *node.transform(),
                parent,
                components,
            });
            stack.extend(node.children.iter().rev().map(|&child| (child, Some(index))));
        }

        Ok(copies)
    }

    /// Build nodes from a pre-order snapshot
    ///
    /// With `target`, the snapshot root is written into that existing node
    /// instead of a new one.
    fn instantiate(&mut self, copies: Vec<NodeCopy>, target: Option<NodeId>) -> Result<NodeId, SceneError> {
        let mut created: Vec<NodeId> = Vec::with_capacity(copies.len());

        for copy in copies {
            let id = match (copy.parent, target) {
                (None, Some(target)) => {
                    let node = self.node_mut(target).ok_or(SceneError::NodeNotFound(target))?;
                    node.set_name(copy.name);
                    target
                }
                (None, None) => self.create_node(copy.name),
                (Some(parent), _) => {
                    let id = self.create_node(copy.name);
                    self.link(created[parent], id);
                    id
                }
            };

            if let Some(node) = self.node_mut(id) {
                node.set_transform(copy.transform);
            }
            for component in copy.components {
                self.add_boxed_component(id, component)?;
            }
            created.push(id);
        }

        created.first().copied().ok_or(SceneError::NodeNotFound(target.unwrap_or_default()))
    }

    /// Drop every component and child of `node`, keeping the node itself
    fn clear_contents(&mut self, node: NodeId) {
        let Some(owner) = self.node_mut(node) else {
            return;
        };
        let components = owner.take_components();
        let children = std::mem::take(&mut owner.children);

        for entry in components {
            self.components.remove(entry.id);
        }
        for child in children {
            self.delete_subtree(child);
        }
    }
}
