//! Scene node data
//!
//! A node holds its name, local transform, the keys of the children and
//! components it owns, and its deletion state. Structural changes go through
//! [`SceneGraph`](super::SceneGraph) so both sides of every parent/child link
//! stay in sync; the node itself only exposes its own data.

use super::{ComponentId, NodeId};
use crate::foundation::math::{Affine3, Quat, Transform, Vec3};
use std::any::TypeId;
use std::cell::{Cell, RefCell};

/// Deferred-deletion state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    /// Live and updated every tick
    #[default]
    Active,
    /// Marked by `destroy()`; removed by the parent's next sweep
    PendingDelete,
}

/// Component key paired with its type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ComponentEntry {
    pub(crate) tag: TypeId,
    pub(crate) id: ComponentId,
}

/// A node of the scene tree
#[derive(Debug)]
pub struct SceneNode {
    // Kept first: the 16-byte aligned payload.
    transform: Transform,
    name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Attachment order, which is also update order
    pub(crate) components: Vec<ComponentEntry>,
    components_sorted: Cell<bool>,
    sorted_components: RefCell<Vec<ComponentEntry>>,
    state: NodeState,
}

impl SceneNode {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            transform: Transform::identity(),
            name: name.into(),
            parent: None,
            children: Vec::new(),
            components: Vec::new(),
            components_sorted: Cell::new(true),
            sorted_components: RefCell::new(Vec::new()),
            state: NodeState::Active,
        }
    }

    /// Gets the name of the node
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the name of the node
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Parent key, `None` for a root or a detached subtree
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child keys in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Component keys in attachment order
    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.components.iter().map(|entry| entry.id)
    }

    /// Whether the lazily built type index is current
    pub fn components_sorted(&self) -> bool {
        self.components_sorted.get()
    }

    // === Local transform ===

    /// Local transform as position/rotation/scale
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Replace the whole local transform
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Local rotation
    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    /// Local translation
    pub fn translation(&self) -> Vec3 {
        self.transform.position
    }

    /// Local scale
    pub fn scale(&self) -> Vec3 {
        self.transform.scale
    }

    /// Set the local rotation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    /// Set the local translation
    pub fn set_translation(&mut self, translation: Vec3) {
        self.transform.position = translation;
    }

    /// Set the local scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.transform.scale = scale;
    }

    /// Compose an incremental rotation into the local rotation
    ///
    /// `rotation` is applied after the current one, i.e. about the parent's
    /// axes. The result is renormalized to stop drift from repeated calls.
    pub fn rotate_by(&mut self, rotation: Quat) {
        let mut composed = rotation * self.transform.rotation;
        composed.renormalize();
        self.transform.rotation = composed;
    }

    /// Local affine transform: scale, then rotate, then translate
    pub fn local_transform(&self) -> Affine3 {
        self.transform.to_affine()
    }

    // === Deferred deletion ===

    /// Current deletion state
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Whether `destroy()` has been called and the sweep has not run yet
    pub fn is_pending_delete(&self) -> bool {
        self.state == NodeState::PendingDelete
    }

    /// Mark the node for destruction at its parent's next sweep
    ///
    /// Idempotent. The node stays in the tree and fully queryable until then.
    pub fn destroy(&mut self) {
        if self.state == NodeState::Active {
            log::debug!("Node '{}' marked for deletion", self.name);
            self.state = NodeState::PendingDelete;
        }
    }

    // === Component index ===

    pub(crate) fn push_component(&mut self, entry: ComponentEntry) {
        self.components.push(entry);
        self.components_sorted.set(false);
    }

    pub(crate) fn remove_component_entry(&mut self, id: ComponentId) -> bool {
        let Some(index) = self.components.iter().position(|entry| entry.id == id) else {
            return false;
        };
        self.components.remove(index);
        self.components_sorted.set(false);
        true
    }

    pub(crate) fn take_components(&mut self) -> Vec<ComponentEntry> {
        self.components_sorted.set(false);
        std::mem::take(&mut self.components)
    }

    /// Keys of all components tagged `tag`, in attachment order
    ///
    /// Rebuilds the type index first if an add or remove invalidated it.
    pub(crate) fn component_ids_with_tag(&self, tag: TypeId) -> Vec<ComponentId> {
        self.ensure_components_sorted();
        let sorted = self.sorted_components.borrow();
        let start = sorted.partition_point(|entry| entry.tag < tag);
        sorted[start..]
            .iter()
            .take_while(|entry| entry.tag == tag)
            .map(|entry| entry.id)
            .collect()
    }

    fn ensure_components_sorted(&self) {
        if self.components_sorted.get() {
            return;
        }
        let mut sorted = self.sorted_components.borrow_mut();
        sorted.clear();
        sorted.extend_from_slice(&self.components);
        // Stable: equal tags keep attachment order.
        sorted.sort_by_key(|entry| entry.tag);
        self.components_sorted.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    #[test]
    fn test_new_node_defaults() {
        let node = SceneNode::new("Camera");

        assert_eq!(node.name(), "Camera");
        assert_eq!(node.parent(), None);
        assert!(node.children().is_empty());
        assert_eq!(node.state(), NodeState::Active);
        assert_eq!(node.scale(), Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(node.rotation(), Quat::identity());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut node = SceneNode::new("Bullet");
        node.destroy();
        node.destroy();
        assert!(node.is_pending_delete());
    }

    #[test]
    fn test_local_transform_scales_rotates_translates() {
        let mut node = SceneNode::new("Arm");
        node.set_scale(Vec3::new(2.0, 2.0, 2.0));
        node.set_rotation(Quat::from_axis_angle(&Vec3::z_axis(), HALF_PI));
        node.set_translation(Vec3::new(0.0, 0.0, 5.0));

        let mapped = node.local_transform().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(mapped, Point3::new(0.0, 2.0, 5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_by_composes() {
        let mut node = SceneNode::new("Turret");
        let quarter = Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI);
        node.rotate_by(quarter);
        node.rotate_by(quarter);

        let half = Quat::from_axis_angle(&Vec3::y_axis(), 2.0 * HALF_PI);
        assert_relative_eq!(node.rotation().angle_to(&half), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_component_index_groups_by_tag_in_attachment_order() {
        let mut keys: SlotMap<ComponentId, ()> = SlotMap::with_key();
        let (a, b, c) = (keys.insert(()), keys.insert(()), keys.insert(()));
        let mut node = SceneNode::new("Holder");

        node.push_component(ComponentEntry { tag: TypeId::of::<u8>(), id: a });
        node.push_component(ComponentEntry { tag: TypeId::of::<u16>(), id: b });
        node.push_component(ComponentEntry { tag: TypeId::of::<u8>(), id: c });
        assert!(!node.components_sorted());

        assert_eq!(node.component_ids_with_tag(TypeId::of::<u8>()), vec![a, c]);
        assert_eq!(node.component_ids_with_tag(TypeId::of::<u16>()), vec![b]);
        assert!(node.component_ids_with_tag(TypeId::of::<u32>()).is_empty());
        assert!(node.components_sorted());

        assert!(node.remove_component_entry(a));
        assert!(!node.components_sorted());
        assert_eq!(node.component_ids_with_tag(TypeId::of::<u8>()), vec![c]);
        assert!(!node.remove_component_entry(a));

        // Attachment order is untouched by sorting.
        assert_eq!(node.component_ids().collect::<Vec<_>>(), vec![b, c]);
    }
}
