//! Per-tick traversal
//!
//! One call to [`SceneGraph::update`] visits a tree top-down. Each node
//! composes its world transform from the parent's, sweeps children marked
//! for deletion, runs its component hooks and then recurses into the
//! children that survived.

use super::{ComponentId, NodeId, SceneGraph, SceneNode};
use crate::foundation::math::{translation_of, Affine3, Vec3};
use crate::foundation::time::Timer;
use crate::input::InputManager;

/// Per-tick services lent to every component hook
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Frame clock, already advanced for this tick
    pub timer: &'a Timer,
    /// Input state for this tick
    pub input: &'a InputManager,
}

impl<'a> FrameContext<'a> {
    /// Bundle the clock and input poller for one tick
    pub fn new(timer: &'a Timer, input: &'a InputManager) -> Self {
        Self { timer, input }
    }
}

/// What a component sees while its update hook runs
///
/// The graph is fully mutable from inside a hook: nodes may be marked for
/// destruction, children added or detached, transforms edited and components
/// added or removed. The calling component itself is checked out for the
/// duration of the hook, so it cannot be looked up through the graph.
pub struct UpdateContext<'a> {
    graph: &'a mut SceneGraph,
    node: NodeId,
    component: ComponentId,
    world_transform: Affine3,
    frame: FrameContext<'a>,
}

impl<'a> UpdateContext<'a> {
    /// Key of the node owning the running component
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Key of the running component
    pub fn component_id(&self) -> ComponentId {
        self.component
    }

    /// The owning node, mutably (transform, name, deletion flag)
    pub fn node_mut(&mut self) -> Option<&mut SceneNode> {
        self.graph.node_mut(self.node)
    }

    /// World transform of the owning node computed at the start of its visit
    pub fn world_transform(&self) -> &Affine3 {
        &self.world_transform
    }

    /// Translational part of [`UpdateContext::world_transform`]
    pub fn world_translation(&self) -> Vec3 {
        translation_of(self.world_transform.matrix())
    }

    /// Read access to the whole graph
    pub fn graph(&self) -> &SceneGraph {
        self.graph
    }

    /// Write access to the whole graph
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        self.graph
    }

    /// Frame clock
    pub fn time(&self) -> &'a Timer {
        self.frame.timer
    }

    /// Input poller
    pub fn input(&self) -> &'a InputManager {
        self.frame.input
    }

    /// Seconds since the previous tick, zero while paused
    pub fn delta_time(&self) -> f32 {
        self.frame.timer.delta_time()
    }

    /// Mark the owning node for deletion at its parent's next sweep
    pub fn destroy_self(&mut self) {
        self.graph.destroy(self.node);
    }
}

impl SceneGraph {
    /// Run one tick over `node` and its subtree
    ///
    /// `parent_world` is the world transform of `node`'s parent, identity for
    /// a root.
    pub fn update(&mut self, node: NodeId, parent_world: &Affine3, frame: FrameContext<'_>) {
        let Some(local) = self.local_transform(node) else {
            return;
        };
        let world = parent_world * local;

        self.sweep_pending_children(node);
        self.run_component_hooks(node, &world, frame);

        // Hooks may have detached or deleted children; skip those.
        let children = self.children(node).to_vec();
        for child in children {
            if self.parent(child) == Some(node) {
                self.update(child, &world, frame);
            }
        }
    }

    /// Delete every direct child of `node` marked for deletion
    ///
    /// Returns the number of nodes removed, descendants included.
    pub(crate) fn sweep_pending_children(&mut self, node: NodeId) -> usize {
        let pending: Vec<NodeId> = self
            .children(node)
            .iter()
            .copied()
            .filter(|&child| self.is_pending_delete(child))
            .collect();
        if pending.is_empty() {
            return 0;
        }

        if let Some(parent) = self.nodes.get_mut(node) {
            parent.children.retain(|child| !pending.contains(child));
        }

        let mut removed = 0;
        for child in pending {
            if let Some(name) = self.node(child).map(|n| n.name().to_owned()) {
                let count = self.delete_subtree(child);
                log::debug!("Swept node '{}' ({} nodes deleted)", name, count);
                removed += count;
            }
        }
        removed
    }

    fn run_component_hooks(&mut self, node: NodeId, world: &Affine3, frame: FrameContext<'_>) {
        // Components added by these hooks first run next tick.
        for id in self.component_ids(node) {
            let Some(mut component) = self.components.get_mut(id).and_then(|slot| slot.component.take()) else {
                continue;
            };

            let mut ctx = UpdateContext {
                graph: self,
                node,
                component: id,
                world_transform: *world,
                frame,
            };
            component.update(&mut ctx);

            match self.components.get_mut(id) {
                Some(slot) => slot.component = Some(component),
                None => log::trace!("{} removed during its own update", component.type_name()),
            }
        }
    }
}
