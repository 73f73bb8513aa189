//! Headless turret demo showcasing hierarchical transforms and deferred destruction
//!
//! A turret base spins on its mount, its barrel fires shells that are deep
//! copies of a detached prototype, and every shell destroys itself once its
//! lifetime runs out. Key presses are scripted instead of read from a window.

use scene_engine::foundation::logging;
use scene_engine::foundation::math::{utils::axis_angle, Vec3};
use scene_engine::prelude::*;
use thiserror::Error;

// Turret configuration
const TURRET_ROTATION_SPEED: f32 = 1.0; // Radians per second
const FIRE_INTERVAL: f32 = 2.0; // Seconds between automatic shots
const SHELL_SPEED: f32 = 12.0;
const SHELL_LIFETIME: f32 = 1.5;
const DEMO_TICKS: u64 = 600;

const CONFIG_PATH: &str = "demo_app.toml";

/// Scripted input: (tick, key, pressed)
const INPUT_SCRIPT: &[(u64, KeyCode, bool)] = &[
    (90, KeyCode::Space, true),
    (95, KeyCode::Space, false),
    (300, KeyCode::P, true),
    (301, KeyCode::P, false),
    (360, KeyCode::P, true),
    (361, KeyCode::P, false),
];

#[derive(Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Yaw around the local Y axis
#[derive(Clone)]
struct Spin {
    speed: f32,
}

impl Component for Spin {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let angle = self.speed * ctx.delta_time();
        if let Some(node) = ctx.node_mut() {
            node.rotate_by(axis_angle(Vec3::y(), angle));
        }
    }

    fn clone_box(&self) -> Option<Box<dyn Component>> {
        Some(Box::new(self.clone()))
    }
}

/// Straight-line motion in the parent's space
#[derive(Clone)]
struct Velocity(Vec3);

impl Component for Velocity {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let step = self.0 * ctx.delta_time();
        if let Some(node) = ctx.node_mut() {
            let position = node.translation() + step;
            node.set_translation(position);
        }
    }

    fn clone_box(&self) -> Option<Box<dyn Component>> {
        Some(Box::new(self.clone()))
    }
}

/// Destroys its node after `remaining` seconds
#[derive(Clone)]
struct Lifetime {
    remaining: f32,
}

impl Component for Lifetime {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.remaining -= ctx.delta_time();
        if self.remaining <= 0.0 {
            ctx.destroy_self();
        }
    }

    fn clone_box(&self) -> Option<Box<dyn Component>> {
        Some(Box::new(self.clone()))
    }
}

/// Fires a copy of `prototype` every `interval` seconds or on Space
///
/// Not clonable: it refers to a prototype owned by the demo.
struct Launcher {
    prototype: NodeId,
    target: NodeId,
    interval: f32,
    cooldown: f32,
    fired: u32,
}

impl Launcher {
    fn fire(&mut self, ctx: &mut UpdateContext<'_>) -> Result<(), SceneError> {
        let muzzle = ctx.world_translation();
        let direction = ctx.world_transform().transform_vector(&Vec3::z());
        let graph = ctx.graph_mut();

        let shell = graph.clone_subtree(self.prototype)?;
        if let Some(node) = graph.node_mut(shell) {
            node.set_name(format!("Shell{}", self.fired));
            node.set_translation(muzzle);
        }
        if let Some(velocity) = graph.get_component_mut::<Velocity>(shell) {
            velocity.0 = direction.normalize() * SHELL_SPEED;
        }
        graph.attach_child(self.target, shell)?;

        self.fired += 1;
        log::info!("Fired shell {} from {:.2?}", self.fired, muzzle);
        Ok(())
    }
}

impl Component for Launcher {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.cooldown -= ctx.delta_time();
        let triggered = ctx.input().is_key_down(KeyCode::Space);
        if self.cooldown > 0.0 && !triggered {
            return;
        }
        self.cooldown = self.interval;

        if let Err(e) = self.fire(ctx) {
            log::error!("Launcher failed to fire: {}", e);
        }
    }
}

struct TurretDemoApp {
    scene: Scene,
    prototype: NodeId,
    fixed_timestep: f32,
}

impl TurretDemoApp {
    fn new(config: &ApplicationConfig) -> Result<Self, DemoError> {
        let mut scene = Scene::new(config);
        let root = scene.root();
        let graph = scene.graph_mut();

        let shells = graph.add_child(root, "Shells")?;
        let base = graph.add_child(root, "TurretBase")?;
        let barrel = graph.add_child(base, "TurretBarrel")?;
        if let Some(node) = graph.node_mut(barrel) {
            node.set_translation(Vec3::new(0.0, 0.5, 1.2));
        }

        let prototype = graph.create_node("ShellPrototype");
        graph.add_component(prototype, Velocity(Vec3::zeros()))?;
        graph.add_component(prototype, Lifetime { remaining: SHELL_LIFETIME })?;

        graph.add_component(base, Spin { speed: TURRET_ROTATION_SPEED })?;
        graph.add_component(
            barrel,
            Launcher {
                prototype,
                target: shells,
                interval: FIRE_INTERVAL,
                cooldown: FIRE_INTERVAL,
                fired: 0,
            },
        )?;

        Ok(Self {
            scene,
            prototype,
            fixed_timestep: config.time.fixed_timestep,
        })
    }

    fn run(&mut self) -> Result<(), DemoError> {
        for tick in 0..DEMO_TICKS {
            for &(_, key, pressed) in INPUT_SCRIPT.iter().filter(|(at, ..)| *at == tick) {
                self.scene.input_mut().handle_key_input(key, pressed);
            }
            if self.scene.input().is_key_down(KeyCode::P) {
                self.toggle_pause();
            }

            self.scene.tick_with_delta(self.fixed_timestep);

            if tick % 60 == 0 {
                self.report();
            }
        }

        self.shutdown()
    }

    fn toggle_pause(&mut self) {
        let timer = self.scene.timer_mut();
        if timer.is_paused() {
            timer.unpause();
            log::info!("Resumed");
        } else {
            timer.pause();
            log::info!("Paused");
        }
    }

    fn report(&self) {
        let graph = self.scene.graph();
        let root = self.scene.root();
        let shells = graph.find_child(root, "Shells").map_or(0, |id| graph.children(id).len());
        let barrel = graph.find_child(root, "TurretBarrel");

        log::info!(
            "t = {:.2}s | nodes: {} | shells in flight: {}",
            self.scene.timer().total_time(),
            graph.len(),
            shells
        );
        if let Some(barrel) = barrel {
            if let Some(position) = graph.world_translation(barrel) {
                log::debug!(
                    "{} at {:.2?}",
                    graph.path_of(barrel).unwrap_or_default(),
                    position
                );
            }
        }
    }

    fn shutdown(&mut self) -> Result<(), DemoError> {
        self.scene.graph_mut().discard(self.prototype)?;
        log::info!(
            "Demo finished after {} ticks with {} nodes",
            self.scene.frame_count(),
            self.scene.graph().len()
        );
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ApplicationConfig::load_or_default(CONFIG_PATH)?;
    logging::init_with_level(config.engine.effective_log_level());
    config.validate()?;

    log::info!("Starting turret demo");

    let mut app = TurretDemoApp::new(&config)?;
    let result = app.run();

    match result {
        Ok(()) => {
            log::info!("Turret demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Turret demo failed: {:?}", e);
            Err(e.into())
        }
    }
}
