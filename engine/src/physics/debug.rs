//! Physics debug visualization
//!
//! Converts the registered objects of a [`CollisionWorld`] into debug lines
//! once per tick, ready for whatever renderer the game uses.

use super::world::{CollisionWorld, ObjectKind, ObjectSnapshot, WorldError, WorldEvent};
use crate::events::ON_UPDATE_EXIT;
use crate::geometry::AxisAlignedBox;
use glam::{Vec2, Vec4};
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Settings for physics debug visualization
#[derive(Debug, Clone)]
pub struct PhysicsDebugSettings {
    /// Whether to build lines at all
    pub show_colliders: bool,
    /// Color for colliders
    pub collider_color: Vec4,
    /// Color for triggers
    pub trigger_color: Vec4,
}

impl Default for PhysicsDebugSettings {
    fn default() -> Self {
        Self {
            show_colliders: true,
            collider_color: Vec4::new(0.0, 1.0, 0.0, 1.0), // Green
            trigger_color: Vec4::new(1.0, 1.0, 0.0, 0.5),  // Yellow (semi-transparent)
        }
    }
}

/// A single line of the overlay in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vec2,
    pub end: Vec2,
    pub color: Vec4,
    pub dashed: bool,
}

/// Debug lines rebuilt at the end of every world update
#[derive(Debug, Clone)]
pub struct DebugOverlay {
    lines: Arc<Mutex<Vec<DebugLine>>>,
}

impl DebugOverlay {
    /// Subscribe a new overlay to `world`'s `on_update_exit`
    pub fn attach(
        world: &mut CollisionWorld,
        settings: PhysicsDebugSettings,
    ) -> Result<Self, WorldError> {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let target = lines.clone();

        world.add_listener(ON_UPDATE_EXIT, move |event| {
            let WorldEvent::Update { objects, .. } = event else {
                return;
            };
            if let Ok(mut lines) = target.lock() {
                lines.clear();
                draw_physics_debug(objects, &mut lines, &settings);
            }
        })?;

        Ok(Self { lines })
    }

    /// Lines from the most recent update
    pub fn lines(&self) -> Vec<DebugLine> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

/// Draw every object as a box with both diagonals
pub fn draw_physics_debug(
    objects: &[ObjectSnapshot],
    debug_lines: &mut Vec<DebugLine>,
    settings: &PhysicsDebugSettings,
) {
    if !settings.show_colliders {
        return;
    }

    for object in objects {
        let (color, dashed) = match object.kind {
            ObjectKind::Collider => (settings.collider_color, false),
            ObjectKind::Trigger => (settings.trigger_color, true),
        };
        draw_box(debug_lines, &object.bounds, color, dashed);
    }
    trace!(lines = debug_lines.len(), "Drew physics debug overlay");
}

/// Draw a box outline plus its diagonals
fn draw_box(debug_lines: &mut Vec<DebugLine>, bounds: &AxisAlignedBox, color: Vec4, dashed: bool) {
    let left = bounds.x() as f32;
    let bottom = bounds.y() as f32;
    let right = bounds.right() as f32;
    let top = bounds.top() as f32;

    let corners = [
        Vec2::new(left, bottom),
        Vec2::new(right, bottom),
        Vec2::new(right, top),
        Vec2::new(left, top),
    ];

    let edges = [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)];
    for (start, end) in edges {
        debug_lines.push(DebugLine {
            start: corners[start],
            end: corners[end],
            color,
            dashed,
        });
    }
}
