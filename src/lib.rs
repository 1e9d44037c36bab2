//! Stacker - A falling-block stacking sandbox
//!
//! Core modules:
//! - `sim`: Scene control logic (spawning, dragging, tap-to-rotate, frame driver)
//! - `input`: Gesture events and view-to-field coordinate mapping
//! - `config`: Data-driven field configuration
//!
//! Rigid-body dynamics and rendering belong to the host engine, which plugs in
//! through [`sim::PhysicsBackend`].

pub mod config;
pub mod input;
pub mod sim;

pub use config::{FieldConfig, RotationPolicy};
pub use input::{Gesture, GesturePhase, ViewTransform};
pub use sim::Scene;

use glam::Vec2;

/// Scene configuration constants
pub mod consts {
    /// Fixed physics timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default field size (portrait scene)
    pub const FIELD_WIDTH: f32 = 750.0;
    pub const FIELD_HEIGHT: f32 = 1334.0;

    /// Gravity in metres/s²
    pub const GRAVITY_Y: f32 = -2.0;
    /// Field units per metre when converting gravity
    pub const UNITS_PER_METRE: f32 = 150.0;

    /// Maximum number of blocks spawned per session
    pub const MAX_NODE_COUNT: u32 = 10;
    /// Spawn delay range (seconds, upper bound exclusive)
    pub const SPAWN_DELAY_MIN: f64 = 0.25;
    pub const SPAWN_DELAY_MAX: f64 = 0.75;

    /// Terrain geometry
    pub const FLOOR_HEIGHT: f32 = 32.0;
    pub const FLOOR_CENTER_Y: f32 = 32.0;
    pub const WALL_THICKNESS: f32 = 16.0;

    /// Settle animation phase durations (seconds)
    pub const LIFT_DURATION: f32 = 0.25;
    pub const ROTATE_DURATION: f32 = 0.5;

    /// Sprite tint strength (0 = texture only, 1 = flat color)
    pub const COLOR_BLEND_FACTOR: f32 = 0.5;
}

/// Normalize angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Smallest distance between two angles on the circle
#[inline]
pub fn angle_distance(a: f32, b: f32) -> f32 {
    let d = normalize_angle(a - b);
    d.min(std::f32::consts::TAU - d)
}

/// Axis-aligned extent of a `size` box rotated by `angle`
#[inline]
pub fn rotated_extent(size: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(
        size.x * cos.abs() + size.y * sin.abs(),
        size.x * sin.abs() + size.y * cos.abs(),
    )
}
