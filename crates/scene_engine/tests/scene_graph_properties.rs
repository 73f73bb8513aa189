//! Behavioural properties of the scene graph exercised through the public API

use approx::assert_relative_eq;
use scene_engine::foundation::math::{Point3, Transform, Vec3};
use scene_engine::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct Health(i32);

impl Component for Health {
    fn clone_box(&self) -> Option<Box<dyn Component>> {
        Some(Box::new(self.clone()))
    }
}

#[derive(Debug)]
struct Armor;

impl Component for Armor {}

fn name_of(graph: &SceneGraph, node: NodeId) -> &str {
    graph.node(node).map_or("", SceneNode::name)
}

/// Every parent/child link is mirrored on both sides and every node reaches
/// its tree's root.
fn assert_tree_invariant(graph: &SceneGraph, root: NodeId) {
    for node in graph.descendants(root) {
        let parent = graph.parent(node).expect("descendant without parent");
        let occurrences = graph.children(parent).iter().filter(|&&c| c == node).count();
        assert_eq!(occurrences, 1, "{} listed {} times", name_of(graph, node), occurrences);
        assert_eq!(graph.root_of(node), Some(root));
    }
    assert_eq!(graph.parent(root), None);
    assert_eq!(graph.root_of(root), Some(root));
}

fn set_translation(graph: &mut SceneGraph, node: NodeId, translation: Vec3) {
    graph.node_mut(node).expect("node exists").set_translation(translation);
}

#[test]
fn tree_invariant_holds_through_structural_edits() {
    let mut scene = Scene::new(&ApplicationConfig::default());
    let root = scene.root();
    let graph = scene.graph_mut();

    let a = graph.add_child(root, "A").unwrap();
    let b = graph.add_child(a, "B").unwrap();
    let c = graph.add_child(root, "C").unwrap();
    graph.add_child(b, "D").unwrap();
    assert_tree_invariant(graph, root);

    let detached = graph.remove_child(root, a).unwrap();
    assert_tree_invariant(graph, root);
    assert_tree_invariant(graph, detached);

    graph.attach_child(c, detached).unwrap();
    assert_tree_invariant(graph, root);

    let copy = graph.clone_subtree(c).unwrap();
    assert_tree_invariant(graph, copy);
    graph.attach_child(root, copy).unwrap();
    assert_tree_invariant(graph, root);

    graph.destroy(b);
    scene.tick_with_delta(0.016);
    assert_tree_invariant(scene.graph(), root);
}

#[test]
fn world_transform_composes_translations() {
    let mut graph = SceneGraph::new();
    let r = graph.create_node("R");
    let a = graph.add_child(r, "A").unwrap();
    let b = graph.add_child(a, "B").unwrap();
    set_translation(&mut graph, a, Vec3::new(1.0, 0.0, 0.0));
    set_translation(&mut graph, b, Vec3::new(0.0, 2.0, 0.0));

    let world = graph.world_transform(b).unwrap();
    assert_relative_eq!(world.transform_point(&Point3::origin()), Point3::new(1.0, 2.0, 0.0));
}

#[test]
fn destroy_is_deferred_until_the_next_tick() {
    let mut scene = Scene::new(&ApplicationConfig::default());
    let r = scene.root();
    let a = scene.graph_mut().add_child(r, "A").unwrap();
    let b = scene.graph_mut().add_child(a, "B").unwrap();

    scene.graph_mut().destroy(a);
    assert_eq!(scene.graph().find_child(r, "A"), Some(a));

    scene.tick_with_delta(0.016);
    assert_eq!(scene.graph().find_child(r, "A"), None);
    assert_eq!(scene.graph().find_child(r, "B"), None);
    assert!(!scene.graph().contains(b));
}

#[test]
fn reparenting_keeps_the_subtree() {
    let mut graph = SceneGraph::new();
    let r1 = graph.create_node("R1");
    let r2 = graph.create_node("R2");
    let a = graph.add_child(r1, "A").unwrap();
    let b = graph.add_child(a, "B").unwrap();
    set_translation(&mut graph, r1, Vec3::new(10.0, 0.0, 0.0));
    set_translation(&mut graph, r2, Vec3::new(0.0, 0.0, -5.0));
    set_translation(&mut graph, b, Vec3::new(0.0, 1.0, 0.0));

    let detached = graph.remove_child(r1, a).unwrap();
    let attached = graph.attach_child(r2, detached).unwrap();

    assert_eq!(attached, a);
    assert_eq!(graph.find_child(r2, "B"), Some(b));
    assert_eq!(graph.find_child(r1, "B"), None);
    assert_relative_eq!(graph.world_translation(b).unwrap(), Vec3::new(0.0, 1.0, -5.0));
}

#[test]
fn find_children_is_pre_order() {
    let mut graph = SceneGraph::new();
    let root = graph.create_node("Root");
    let mut expected = Vec::new();
    for name in ["X", "Y", "Z"] {
        let child = graph.add_child(root, name).unwrap();
        let holder = graph.add_child(child, "Holder").unwrap();
        expected.push(graph.add_child(holder, "target").unwrap());
    }

    assert_eq!(graph.find_children(root, "target"), expected);
    assert_eq!(graph.find_child(root, "target"), expected.first().copied());
}

#[test]
fn deep_copy_is_independent() {
    let mut graph = SceneGraph::new();
    let parent = graph.create_node("Parent");
    let n = graph.add_child(parent, "N").unwrap();
    graph.add_child(n, "K").unwrap();
    graph.add_component(n, Health(5)).unwrap();
    set_translation(&mut graph, n, Vec3::new(1.0, 1.0, 1.0));

    let n2 = graph.clone_subtree(n).unwrap();
    set_translation(&mut graph, n2, Vec3::new(9.0, 9.0, 9.0));
    let copied = graph.component_id::<Health>(n2).unwrap();
    assert!(graph.remove_component(n2, copied));

    assert_relative_eq!(graph.node(n).unwrap().translation(), Vec3::new(1.0, 1.0, 1.0));
    assert_eq!(graph.get_component::<Health>(n), Some(&Health(5)));
    assert_eq!(graph.get_component::<Health>(n2), None);
    assert!(graph.find_child(n2, "K").is_some());
    assert_eq!(graph.root_of(n2), Some(n2));
}

#[test]
fn component_round_trip_returns_the_same_instance() {
    let mut graph = SceneGraph::new();
    let node = graph.create_node("Node");
    let id = graph.add_component(node, Health(1)).unwrap();

    let by_kind = graph.get_component::<Health>(node).unwrap();
    let by_id = graph.component(id).unwrap().as_any().downcast_ref::<Health>().unwrap();
    assert!(std::ptr::eq(by_kind, by_id));
    assert!(graph.get_component::<Armor>(node).is_none());
    assert!(graph.get_components::<Armor>(node).is_empty());
}

#[test]
fn stored_transforms_are_aligned() {
    let mut graph = SceneGraph::new();
    let root = graph.create_node("Root");
    for i in 0..32 {
        let child = graph.add_child(root, format!("N{i}")).unwrap();
        graph.add_child(child, "Leaf").unwrap();
    }
    let copy = graph.clone_subtree(root).unwrap();

    let align = std::mem::align_of::<Transform>();
    assert_eq!(align, 16);
    for node in [root, copy].into_iter().chain(graph.descendants(copy)) {
        let transform: *const Transform = graph.node(node).unwrap().transform();
        assert_eq!(transform as usize % align, 0);
    }
}
