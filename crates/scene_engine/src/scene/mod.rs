//! Scene graph
//!
//! A tree of spatial nodes that compose local transforms into world
//! transforms, own attachable [`Component`]s, and tolerate structural edits
//! while being traversed once per tick.
//!
//! ## Architecture
//!
//! ```text
//! Scene (driver: root key, frame clock, input)
//!      ↓ one update per tick
//! SceneGraph (arena owning every node and component)
//!      ↓ keyed by NodeId / ComponentId
//! SceneNode (name, local transform, children, components, state)
//! ```
//!
//! Nodes and components live in slot maps so ownership transfer is just
//! moving a key between parents, and keys of deleted entries go stale
//! instead of dangling. Destruction inside a running tick is deferred:
//! [`SceneGraph::destroy`] only flags a node, and the parent's next sweep
//! removes it together with its subtree.

mod component;
mod copy;
mod driver;
mod error;
mod graph;
mod node;
mod search;
mod update;

pub use component::{AsAny, Component};
pub use driver::Scene;
pub use error::SceneError;
pub use graph::SceneGraph;
pub use node::{NodeState, SceneNode};
pub use search::Descendants;
pub use update::{FrameContext, UpdateContext};

slotmap::new_key_type! {
    /// Stable identity of a node inside a [`SceneGraph`]
    pub struct NodeId;

    /// Stable identity of a component attached to a node
    pub struct ComponentId;
}
