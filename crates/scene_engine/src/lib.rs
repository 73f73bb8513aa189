//! # Scene Engine
//!
//! A hierarchical scene graph for small real-time applications.
//!
//! ## Features
//!
//! - **Scene Graph**: nodes with local transforms composed into world transforms
//! - **Components**: owned, polymorphic behaviour attached to nodes
//! - **Safe Mutation**: re-parenting and deferred destruction during a tick
//! - **Deep Copy**: whole subtrees duplicated with their components
//! - **Frame Services**: frame clock and per-frame input polling
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! #[derive(Clone)]
//! struct Drift(Vec3);
//!
//! impl Component for Drift {
//!     fn update(&mut self, ctx: &mut UpdateContext<'_>) {
//!         let step = self.0 * ctx.delta_time();
//!         if let Some(node) = ctx.node_mut() {
//!             let position = node.translation() + step;
//!             node.set_translation(position);
//!         }
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = Scene::new(&ApplicationConfig::default());
//!     let root = scene.root();
//!     let ship = scene.graph_mut().add_child(root, "Ship")?;
//!     scene.graph_mut().add_component(ship, Drift(Vec3::new(1.0, 0.0, 0.0)))?;
//!
//!     scene.tick_with_delta(0.1);
//!     let position = scene.graph().world_translation(ship).ok_or("ship missing")?;
//!     assert!((position.x - 0.1).abs() < 1e-6);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod scene;

pub mod config;
pub mod foundation;
pub mod input;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{ApplicationConfig, Config, ConfigError, EngineConfig, SceneConfig, TimeConfig},
        foundation::{
            math::{Affine3, Quat, Transform, Vec3},
            time::Timer,
        },
        input::{InputManager, KeyCode, MouseButton},
        scene::{
            Component, ComponentId, FrameContext, NodeId, NodeState, Scene, SceneError, SceneGraph,
            SceneNode, UpdateContext,
        },
    };
}
