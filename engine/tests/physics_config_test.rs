//! Loading a physics configuration and simulating with its defaults

use pickles_engine::prelude::*;
use std::fs;

#[test]
fn test_config_file_drives_simulation() {
    let _ = tracing_subscriber::fmt().try_init();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("physics.json");
    fs::write(
        &path,
        r#"{
            "gravity": { "x": 0, "y": -20 },
            "terminal_velocity": { "x": 10, "y": 3 },
            "tick_ms": 50
        }"#,
    )
    .unwrap();

    let config = PhysicsConfig::load(&path).unwrap();
    assert_eq!(config.mass, 1);
    assert_eq!(config.tick_ms, 50);

    let mut world = World::new();
    let body = config.body_builder().build().unwrap();
    let entity = world.spawn((GameObject::new(AxisAlignedBox::new(0, 100, 1, 1), body),));

    // -20 * 50ms = one unit per tick, capped at 3
    for _ in 0..5 {
        simulate_objects(&mut world, config.tick_ms).unwrap();
    }

    let object = world.get::<&GameObject>(entity).unwrap();
    assert_eq!(object.velocity(), Vector2::new(0, -3));
    assert_eq!(object.position(), Vector2::new(0, 100 - 1 - 2 - 3 - 3 - 3));
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("physics.json");
    fs::write(&path, r#"{ "terminal_velocity": { "x": -1, "y": 5 } }"#).unwrap();

    assert!(matches!(
        PhysicsConfig::load(&path),
        Err(ConfigError::Invalid(_))
    ));
}
