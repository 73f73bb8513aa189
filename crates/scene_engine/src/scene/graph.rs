//! Scene graph arena
//!
//! [`SceneGraph`] owns every node and component. Parent/child links are keys,
//! so a node can never be kept alive by its parent link and a stale key is
//! detected instead of dereferenced.

use super::component::{downcast_mut, downcast_ref, ComponentSlot};
use super::node::ComponentEntry;
use super::{Component, ComponentId, NodeId, SceneError, SceneNode};
use crate::foundation::math::{rotation_of, translation_of, Affine3, Quat, Vec3};
use slotmap::SlotMap;
use std::any::TypeId;

/// Arena owning a forest of scene nodes and their components
///
/// Every node without a parent is the root of its own tree: the scene root,
/// a standalone node, or a subtree detached with
/// [`SceneGraph::remove_child`] that the caller now owns.
#[derive(Default)]
pub struct SceneGraph {
    pub(crate) nodes: SlotMap<NodeId, SceneNode>,
    pub(crate) components: SlotMap<ComponentId, ComponentSlot>,
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("nodes", &self.nodes.len())
            .field("components", &self.components.len())
            .finish()
    }
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes across all trees
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of attached components across all nodes
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Whether `node` refers to a live node
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Borrow a node
    pub fn node(&self, node: NodeId) -> Option<&SceneNode> {
        self.nodes.get(node)
    }

    /// Mutably borrow a node (name, local transform, deletion flag)
    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(node)
    }

    /// Parent of `node`, `None` for roots and stale keys
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(SceneNode::parent)
    }

    /// Children of `node` in insertion order (empty for stale keys)
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map(SceneNode::children).unwrap_or_default()
    }

    // === Structure ===

    /// Create a standalone node with no parent
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        self.nodes.insert(SceneNode::new(name))
    }

    /// Create a named child at the end of `parent`'s children
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }

        let child = self.create_node(name);
        self.link(parent, child);
        Ok(child)
    }

    /// Move a detached subtree under `parent`, appending it to the children
    ///
    /// `child` must be a root (standalone, freshly copied, or returned by
    /// [`SceneGraph::remove_child`]) and must not contain `parent`.
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let current_parent = self
            .nodes
            .get(child)
            .ok_or(SceneError::NodeNotFound(child))?
            .parent;

        if let Some(current_parent) = current_parent {
            return Err(SceneError::AlreadyAttached { child, parent: current_parent });
        }
        // `child` is a root, so `parent` is inside its subtree iff it is
        // `child` or has `child` as its root.
        if self.root_of(parent) == Some(child) {
            return Err(SceneError::CycleDetected { parent, child });
        }

        self.link(parent, child);
        Ok(child)
    }

    /// Detach `child` from `parent` and hand ownership of its subtree back
    ///
    /// Returns `None` if `child` is not a direct child of `parent`. Nothing is
    /// destroyed; the returned key is a root the caller may re-attach or
    /// [`discard`](SceneGraph::discard).
    #[must_use = "a detached subtree stays allocated until attached or discarded"]
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        let parent_node = self.nodes.get_mut(parent)?;
        let index = parent_node.children.iter().position(|&id| id == child)?;
        parent_node.children.remove(index);

        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = None;
        }
        log::debug!("Detached node {:?} from {:?}", child, parent);
        Some(child)
    }

    /// Immediately destroy a subtree the caller owns
    ///
    /// Only detached roots qualify; nodes inside a tree are removed through
    /// [`SceneGraph::destroy`] and the next update sweep.
    pub fn discard(&mut self, node: NodeId) -> Result<(), SceneError> {
        let parent = self.nodes.get(node).ok_or(SceneError::NodeNotFound(node))?.parent;
        if parent.is_some() {
            return Err(SceneError::StillAttached(node));
        }

        let removed = self.delete_subtree(node);
        log::debug!("Discarded detached subtree {:?} ({} nodes)", node, removed);
        Ok(())
    }

    /// Mark `node` for deletion at its parent's next sweep
    ///
    /// Returns `false` for stale keys. Calling it again is a no-op.
    pub fn destroy(&mut self, node: NodeId) -> bool {
        match self.nodes.get_mut(node) {
            Some(node) => {
                node.destroy();
                true
            }
            None => false,
        }
    }

    /// Whether `node` is marked for deletion (`false` for stale keys)
    pub fn is_pending_delete(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(SceneNode::is_pending_delete)
    }

    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
        }
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(child);
        }
    }

    /// Delete `node`, its descendants and all their components
    ///
    /// Does not touch the parent's child list; callers unlink first.
    /// Returns the number of nodes removed.
    pub(crate) fn delete_subtree(&mut self, node: NodeId) -> usize {
        let mut stack = vec![node];
        let mut removed = 0;

        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.remove(id) else {
                continue;
            };
            removed += 1;
            stack.extend_from_slice(&node.children);
            for entry in &node.components {
                self.components.remove(entry.id);
            }
        }

        removed
    }

    // === Components ===

    /// Attach a component, transferring ownership to `node`
    pub fn add_component<C: Component>(&mut self, node: NodeId, component: C) -> Result<ComponentId, SceneError> {
        self.add_boxed_component(node, Box::new(component))
    }

    /// Attach an already boxed component
    pub fn add_boxed_component(
        &mut self,
        node: NodeId,
        component: Box<dyn Component>,
    ) -> Result<ComponentId, SceneError> {
        if !self.nodes.contains_key(node) {
            return Err(SceneError::NodeNotFound(node));
        }

        let slot = ComponentSlot::new(node, component);
        let tag = slot.tag;
        log::trace!("Attaching {} to node {:?}", slot.type_name, node);
        let id = self.components.insert(slot);

        if let Some(owner) = self.nodes.get_mut(node) {
            owner.push_component(ComponentEntry { tag, id });
        }
        Ok(id)
    }

    /// Remove and destroy the component `component` attached to `node`
    ///
    /// Returns `false` if `node` does not own such a component.
    pub fn remove_component(&mut self, node: NodeId, component: ComponentId) -> bool {
        let Some(owner) = self.nodes.get_mut(node) else {
            return false;
        };
        if !owner.remove_component_entry(component) {
            return false;
        }

        if let Some(slot) = self.components.remove(component) {
            log::trace!("Removed {} from node {:?}", slot.type_name, node);
        }
        true
    }

    /// Borrow a component by key
    ///
    /// `None` for stale keys and for a component whose own update hook is
    /// running.
    pub fn component(&self, component: ComponentId) -> Option<&dyn Component> {
        self.components.get(component)?.component.as_deref()
    }

    /// Mutably borrow a component by key
    pub fn component_mut(&mut self, component: ComponentId) -> Option<&mut dyn Component> {
        self.components.get_mut(component)?.component.as_deref_mut()
    }

    /// Node owning `component`
    pub fn component_owner(&self, component: ComponentId) -> Option<NodeId> {
        self.components.get(component).map(|slot| slot.owner)
    }

    /// Type name recorded when `component` was attached
    pub fn component_type_name(&self, component: ComponentId) -> Option<&'static str> {
        self.components.get(component).map(|slot| slot.type_name)
    }

    /// Keys of every component on `node`, in attachment order
    pub fn component_ids(&self, node: NodeId) -> Vec<ComponentId> {
        self.nodes
            .get(node)
            .map(|node| node.component_ids().collect())
            .unwrap_or_default()
    }

    /// Key of the first component of kind `K` on `node`
    pub fn component_id<K: Component>(&self, node: NodeId) -> Option<ComponentId> {
        self.tagged_ids(node, TypeId::of::<K>())
            .into_iter()
            .find(|&id| self.component(id).is_some())
    }

    /// Keys of every component of kind `K` on `node`, in attachment order
    pub fn component_ids_of<K: Component>(&self, node: NodeId) -> Vec<ComponentId> {
        self.tagged_ids(node, TypeId::of::<K>())
            .into_iter()
            .filter(|&id| self.component(id).is_some())
            .collect()
    }

    /// First component of kind `K` on `node`
    pub fn get_component<K: Component>(&self, node: NodeId) -> Option<&K> {
        self.tagged_ids(node, TypeId::of::<K>())
            .into_iter()
            .find_map(|id| self.component(id).and_then(downcast_ref::<K>))
    }

    /// First component of kind `K` on `node`, mutably
    pub fn get_component_mut<K: Component>(&mut self, node: NodeId) -> Option<&mut K> {
        let id = self.component_id::<K>(node)?;
        self.component_mut(id).and_then(downcast_mut::<K>)
    }

    /// Every component of kind `K` on `node`, in attachment order
    pub fn get_components<K: Component>(&self, node: NodeId) -> Vec<&K> {
        self.tagged_ids(node, TypeId::of::<K>())
            .into_iter()
            .filter_map(|id| self.component(id).and_then(downcast_ref::<K>))
            .collect()
    }

    fn tagged_ids(&self, node: NodeId, tag: TypeId) -> Vec<ComponentId> {
        self.nodes
            .get(node)
            .map(|node| node.component_ids_with_tag(tag))
            .unwrap_or_default()
    }

    // === Transforms ===

    /// Local affine transform of `node`
    pub fn local_transform(&self, node: NodeId) -> Option<Affine3> {
        self.nodes.get(node).map(SceneNode::local_transform)
    }

    /// World transform of `node`, composed root-to-node from the ancestors'
    /// current local transforms
    ///
    /// Nothing is cached, so the result always reflects the latest edits and
    /// re-parenting.
    pub fn world_transform(&self, node: NodeId) -> Option<Affine3> {
        let mut chain = Vec::new();
        let mut current = Some(node);

        while let Some(id) = current {
            let node = self.nodes.get(id)?;
            chain.push(node.local_transform());
            current = node.parent;
        }

        Some(chain.iter().rev().fold(Affine3::identity(), |world, local| world * local))
    }

    /// Rotational part of the world transform
    pub fn world_rotation(&self, node: NodeId) -> Option<Quat> {
        let world = self.world_transform(node)?;
        Some(rotation_of(&world.matrix().fixed_view::<3, 3>(0, 0).into_owned()))
    }

    /// Translational part of the world transform
    pub fn world_translation(&self, node: NodeId) -> Option<Vec3> {
        self.world_transform(node).map(|world| translation_of(world.matrix()))
    }
}
