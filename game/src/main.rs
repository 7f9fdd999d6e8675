//! Headless platformer demo
//!
//! Builds a small level, drives the player with a scripted sequence of
//! inputs at a fixed tick and logs every collision the engine reports.
//! Pass a JSON physics configuration path as the first argument to
//! override the defaults.

mod controller;

use controller::PlatformerController;
use pickles_engine::prelude::*;
use std::error::Error;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Number of ticks the demo runs for
const DEMO_TICKS: usize = 240;

/// Scripted input for one tick
#[derive(Debug, Clone, Copy, Default)]
struct Input {
    left: bool,
    right: bool,
    jump: bool,
}

fn scripted_input(tick: usize) -> Input {
    Input {
        left: (150..190).contains(&tick),
        right: (10..120).contains(&tick),
        jump: (40..60).contains(&tick) || (160..175).contains(&tick),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    pickles_engine::init_logging();
    info!("Starting headless platformer demo");

    let config = match std::env::args().nth(1) {
        Some(path) => PhysicsConfig::load(Path::new(&path))?,
        None => PhysicsConfig::default(),
    };
    info!(?config, "Physics configuration");

    let mut world = World::new();
    let mut collision_world = CollisionWorld::from_config(&config);
    let overlay = DebugOverlay::attach(&mut collision_world, PhysicsDebugSettings::default())?;

    // Level geometry
    let floor = world.spawn((GameObject::immovable(AxisAlignedBox::new(0, 0, 320, 16)),));
    let platform = world.spawn((GameObject::immovable(AxisAlignedBox::new(112, 40, 48, 8)),));
    let wall = world.spawn((GameObject::immovable(AxisAlignedBox::new(304, 16, 16, 64)),));
    for entity in [floor, platform, wall] {
        collision_world.add_collider(&world, entity)?;
    }

    // Coin
    let coins = Arc::new(AtomicUsize::new(0));
    let coin = spawn_coin(&mut world, AxisAlignedBox::new(128, 56, 8, 8), coins.clone())?;
    collision_world.add_trigger(&world, coin)?;

    // Player
    let player = spawn_player(&mut world, &config)?;
    collision_world.add_collider(&world, player)?;
    let mut controls = PlatformerController::new(30, 48);

    let mut was_jumping = false;
    for tick in 0..DEMO_TICKS {
        let input = scripted_input(tick);
        {
            let mut pickle = world.get::<&mut GameObject>(player)?;
            apply_input(&mut controls, &mut pickle, input, was_jumping);
        }
        was_jumping = input.jump;

        simulate_objects(&mut world, config.tick_ms)?;
        let stats = collision_world.update(&mut world, config.tick_ms)?;
        if stats.candidate_pairs > 0 {
            debug!(tick, ?stats, "Tick");
        }
    }

    let pickle = world.get::<&GameObject>(player)?;
    info!(
        position = ?pickle.position(),
        coins = coins.load(Ordering::Relaxed),
        debug_lines = overlay.lines().len(),
        "Demo finished"
    );
    Ok(())
}

fn apply_input(
    controls: &mut PlatformerController,
    pickle: &mut GameObject,
    input: Input,
    was_jumping: bool,
) {
    match (input.left, input.right) {
        (true, false) => controls.walk_left(pickle),
        (false, true) => controls.walk_right(pickle),
        _ => controls.stop_walking(pickle),
    }

    if input.jump {
        controls.jump(pickle);
    } else if was_jumping {
        controls.cancel_jump(pickle);
    }
}

fn spawn_player(world: &mut World, config: &PhysicsConfig) -> Result<Entity, Box<dyn Error>> {
    let body = config
        .body_builder()
        .friction(75)
        .gravity((0, -15))
        .terminal_velocity((2, 100))
        .build()?;

    let mut events = ObjectEvents::new();
    events.add_listener(ON_COLLIDER_ENTER, |event| {
        if let ObjectEvent::Collision(other) = event {
            info!(?other, "Player touched");
        }
    })?;
    events.add_listener(ON_COLLIDER_EXIT, |event| {
        if let ObjectEvent::Collision(other) = event {
            info!(?other, "Player left");
        }
    })?;

    Ok(world.spawn((
        GameObject::new(AxisAlignedBox::new(16, 16, 16, 16), body),
        events,
    )))
}

fn spawn_coin(
    world: &mut World,
    bounds: AxisAlignedBox,
    coins: Arc<AtomicUsize>,
) -> Result<Entity, Box<dyn Error>> {
    let events = ObjectEvents::new().with_listener(ON_TRIGGER_ENTER, move |event| {
        if let ObjectEvent::Collision(other) = event {
            let total = coins.fetch_add(1, Ordering::Relaxed) + 1;
            info!(?other, total, "Coin collected");
        }
    })?;
    let events = events.with_listener(ON_TRIGGER_EXIT, |_| info!("Coin no longer touched"))?;
    Ok(world.spawn((GameObject::immovable(bounds), events)))
}
