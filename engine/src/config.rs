//! Configuration types for the engine

use crate::geometry::Vector2;
use crate::physics::PhysicsBodyBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Errors that can occur while loading a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Simulation defaults shared by every body the game creates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Constant acceleration applied to new bodies
    pub gravity: Vector2,
    /// Per-axis velocity cap for new bodies
    pub terminal_velocity: Vector2,
    /// Mass of new bodies
    pub mass: i32,
    /// Friction of new bodies, 100 keeps full velocity while unaccelerated
    pub friction: i32,
    /// Length of one simulation tick in milliseconds
    pub tick_ms: i32,
    /// Smallest per-axis correction for a collider contact to be reported
    pub movement_threshold: i32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vector2::new(0, -10),
            terminal_velocity: Vector2::new(100, 100),
            mass: 1,
            friction: 100,
            tick_ms: 16,
            movement_threshold: 1,
        }
    }
}

impl PhysicsConfig {
    /// Parse and validate a configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PhysicsConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!(?config, "Parsed physics config");
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = ?path, "Loading physics config");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that every default produces a valid body
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mass <= 0 {
            return Err(ConfigError::Invalid(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        if !(1..=100).contains(&self.friction) {
            return Err(ConfigError::Invalid(format!(
                "friction must be between 1 and 100, got {}",
                self.friction
            )));
        }
        if self.terminal_velocity.x < 0 || self.terminal_velocity.y < 0 {
            return Err(ConfigError::Invalid(format!(
                "terminal velocity must not be negative, got {:?}",
                self.terminal_velocity
            )));
        }
        if self.tick_ms <= 0 {
            return Err(ConfigError::Invalid(format!(
                "tick must be positive, got {}ms",
                self.tick_ms
            )));
        }
        if self.movement_threshold < 1 {
            return Err(ConfigError::Invalid(format!(
                "movement threshold must be at least 1, got {}",
                self.movement_threshold
            )));
        }
        Ok(())
    }

    /// Body builder seeded with these defaults
    pub fn body_builder(&self) -> PhysicsBodyBuilder {
        PhysicsBodyBuilder::from_config(self)
    }
}
