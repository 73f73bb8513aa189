//! Scene driver
//!
//! Owns the graph, its root, the frame clock and the input poller, and turns
//! one external call into one traversal of the tree.

use super::{FrameContext, NodeId, SceneError, SceneGraph};
use crate::core::config::{ApplicationConfig, SceneConfig};
use crate::foundation::math::Affine3;
use crate::foundation::time::Timer;
use crate::input::InputManager;

/// A scene tree plus the services it is updated with
#[derive(Debug)]
pub struct Scene {
    graph: SceneGraph,
    root: NodeId,
    timer: Timer,
    input: InputManager,
    config: SceneConfig,
}

impl Scene {
    /// Create a scene holding a single root node
    pub fn new(config: &ApplicationConfig) -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.create_node(config.scene.root_name.as_str());
        log::info!("Scene created with root '{}'", config.scene.root_name);

        Self {
            graph,
            root,
            timer: Timer::with_max_delta(config.time.max_delta_time),
            input: InputManager::new(),
            config: config.scene.clone(),
        }
    }

    /// Advance the clock from the wall clock and update the whole tree
    pub fn tick(&mut self) {
        self.timer.frame();
        self.run_tick();
    }

    /// Advance the clock by `delta_time` seconds and update the whole tree
    pub fn tick_with_delta(&mut self, delta_time: f32) {
        self.timer.advance(delta_time);
        self.run_tick();
    }

    fn run_tick(&mut self) {
        // No parent sweeps the root, so its deletion is handled here.
        if self.graph.is_pending_delete(self.root) {
            self.replace_root();
        }

        log::trace!("Tick {} (dt = {:.4}s)", self.timer.frame_count(), self.timer.delta_time());
        let frame = FrameContext::new(&self.timer, &self.input);
        self.graph.update(self.root, &Affine3::identity(), frame);
        self.input.frame();
    }

    /// Delete the root's tree and start a fresh one
    ///
    /// Detached subtrees and standalone nodes belong to the caller and survive.
    fn replace_root(&mut self) {
        if let Some(parent) = self.graph.parent(self.root) {
            let _ = self.graph.remove_child(parent, self.root);
        }
        let removed = self.graph.delete_subtree(self.root);
        log::warn!("Root node destroyed; deleted {} nodes", removed);
        self.root = self.graph.create_node(self.config.root_name.as_str());
    }

    /// Add a child named with the configured default name
    pub fn add_node(&mut self, parent: NodeId) -> Result<NodeId, SceneError> {
        self.graph.add_child(parent, self.config.default_node_name.as_str())
    }

    /// The scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The scene graph, mutably
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Current root key
    ///
    /// Changes if the root was destroyed and replaced.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Frame clock
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Frame clock, mutably (pause, reset)
    pub fn timer_mut(&mut self) -> &mut Timer {
        &mut self.timer
    }

    /// Input poller
    pub fn input(&self) -> &InputManager {
        &self.input
    }

    /// Input poller, mutably, for feeding window events between ticks
    pub fn input_mut(&mut self) -> &mut InputManager {
        &mut self.input
    }

    /// Number of ticks run so far
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use crate::scene::{Component, UpdateContext};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Accumulates delta time and records whether Space was just pressed
    #[derive(Default)]
    struct Recorder {
        elapsed: Rc<RefCell<f32>>,
        presses: Rc<RefCell<u32>>,
    }

    impl Component for Recorder {
        fn update(&mut self, ctx: &mut UpdateContext<'_>) {
            *self.elapsed.borrow_mut() += ctx.delta_time();
            if ctx.input().is_key_down(KeyCode::Space) {
                *self.presses.borrow_mut() += 1;
            }
        }
    }

    fn scene() -> Scene {
        Scene::new(&ApplicationConfig::default())
    }

    #[test]
    fn test_new_scene_has_named_root() {
        let scene = scene();
        assert_eq!(scene.graph().len(), 1);
        assert_eq!(scene.graph().node(scene.root()).unwrap().name(), "Root");
        assert_eq!(scene.frame_count(), 0);
    }

    #[test]
    fn test_add_node_uses_default_name() {
        let mut scene = scene();
        let root = scene.root();
        let node = scene.add_node(root).unwrap();
        assert_eq!(scene.graph().node(node).unwrap().name(), "Nameless");
    }

    #[test]
    fn test_tick_passes_clock_and_input_to_hooks() {
        let mut scene = scene();
        let recorder = Recorder::default();
        let (elapsed, presses) = (recorder.elapsed.clone(), recorder.presses.clone());
        let root = scene.root();
        scene.graph_mut().add_component(root, recorder).unwrap();

        scene.input_mut().handle_key_input(KeyCode::Space, true);
        scene.tick_with_delta(0.1);
        scene.tick_with_delta(0.1);

        assert_eq!(scene.frame_count(), 2);
        assert!((*elapsed.borrow() - 0.2).abs() < 1e-6);
        // The press edge lasts exactly one tick.
        assert_eq!(*presses.borrow(), 1);
        assert!(scene.input().is_key_held(KeyCode::Space));
    }

    #[test]
    fn test_paused_clock_gives_zero_delta() {
        let mut scene = scene();
        let recorder = Recorder::default();
        let elapsed = recorder.elapsed.clone();
        let root = scene.root();
        scene.graph_mut().add_component(root, recorder).unwrap();

        scene.timer_mut().pause();
        scene.tick_with_delta(0.1);
        assert!(elapsed.borrow().abs() < f32::EPSILON);
    }

    #[test]
    fn test_destroyed_root_is_replaced() {
        let mut scene = scene();
        let root = scene.root();
        scene.add_node(root).unwrap();
        scene.graph_mut().destroy(root);

        scene.tick_with_delta(0.016);

        assert_ne!(scene.root(), root);
        assert!(!scene.graph().contains(root));
        assert_eq!(scene.graph().len(), 1);
        assert_eq!(scene.graph().node(scene.root()).unwrap().name(), "Root");
    }

    #[test]
    fn test_root_replacement_keeps_caller_owned_nodes() {
        let mut scene = scene();
        let root = scene.root();
        let graph = scene.graph_mut();
        let a = graph.add_child(root, "A").unwrap();
        let inner = graph.add_child(a, "Inner").unwrap();
        let doomed = graph.add_child(root, "Doomed").unwrap();
        let detached = graph.remove_child(root, a).unwrap();
        let prototype = graph.create_node("Prototype");
        let part = graph.add_component(prototype, Recorder::default()).unwrap();
        graph.destroy(root);

        scene.tick_with_delta(0.016);

        let graph = scene.graph();
        assert!(!graph.contains(root));
        assert!(!graph.contains(doomed));
        assert!(graph.contains(detached));
        assert_eq!(graph.parent(inner), Some(detached));
        assert!(graph.contains(prototype));
        assert_eq!(graph.component_owner(part), Some(prototype));
        // Fresh root plus the two caller-owned trees.
        assert_eq!(graph.len(), 4);
        assert!(graph.children(scene.root()).is_empty());
    }
}
