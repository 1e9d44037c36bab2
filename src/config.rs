//! Field configuration
//!
//! One structure parameterizes the whole scene: field geometry, spawn
//! pacing, animation timing, rotation policy and the shape catalog.
//! Loaded from JSON; every missing field falls back to the default.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::catalog::{ShapeSpec, default_catalog};

/// How a tap picks the angle a block turns to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Turn to the next multiple of 90° strictly above the current angle,
    /// squaring up tipped blocks
    #[default]
    SnapToNextQuarter,
    /// Add exactly 90° to whatever the current angle is
    RelativeQuarter,
}

impl RotationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationPolicy::SnapToNextQuarter => "snap_to_next_quarter",
            RotationPolicy::RelativeQuarter => "relative_quarter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "snap" | "snap_to_next_quarter" => Some(RotationPolicy::SnapToNextQuarter),
            "relative" | "relative_quarter" => Some(RotationPolicy::RelativeQuarter),
            _ => None,
        }
    }
}

/// Floor slab geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    pub height: f32,
    /// Height of the floor's center above the field bottom
    pub center_y: f32,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            height: FLOOR_HEIGHT,
            center_y: FLOOR_CENTER_Y,
        }
    }
}

/// Side wall geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    pub thickness: f32,
    /// Outward shift of each wall's inner face from the field edge
    /// (0 = flush, just outside the visible area)
    pub outset: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            thickness: WALL_THICKNESS,
            outset: 0.0,
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Field size in field units (origin bottom-left, y up)
    pub size: Vec2,
    /// Gravity in metres/s²
    pub gravity: Vec2,
    /// Maximum blocks spawned per session
    pub max_blocks: u32,
    /// Random spawn delay range (seconds, upper bound exclusive)
    pub spawn_delay_min: f64,
    pub spawn_delay_max: f64,
    /// Spawn point; `None` means top-center of the field
    pub spawn_point: Option<Vec2>,
    pub floor: FloorConfig,
    pub walls: WallConfig,
    /// Settle animation phase durations (seconds)
    pub lift_duration: f32,
    pub rotate_duration: f32,
    pub rotation_policy: RotationPolicy,
    pub catalog: Vec<ShapeSpec>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
            gravity: Vec2::new(0.0, GRAVITY_Y),
            max_blocks: MAX_NODE_COUNT,
            spawn_delay_min: SPAWN_DELAY_MIN,
            spawn_delay_max: SPAWN_DELAY_MAX,
            spawn_point: None,
            floor: FloorConfig::default(),
            walls: WallConfig::default(),
            lift_duration: LIFT_DURATION,
            rotate_duration: ROTATE_DURATION,
            rotation_policy: RotationPolicy::default(),
            catalog: default_catalog(),
        }
    }
}

impl FieldConfig {
    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded field config from {}", path.display());
                    config.sanitized()
                }
                Err(e) => {
                    log::warn!("Invalid field config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read field config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Where new blocks appear
    pub fn effective_spawn_point(&self) -> Vec2 {
        self.spawn_point
            .unwrap_or(Vec2::new(self.size.x / 2.0, self.size.y))
    }

    /// Repair values the scene cannot run with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(self.size.x > 0.0 && self.size.y > 0.0) {
            log::warn!("Field size {:?} invalid, using {:?}", self.size, defaults.size);
            self.size = defaults.size;
        }
        if !(self.spawn_delay_min > 0.0) {
            log::warn!("spawn_delay_min {} invalid, using {}", self.spawn_delay_min, SPAWN_DELAY_MIN);
            self.spawn_delay_min = SPAWN_DELAY_MIN;
        }
        if self.spawn_delay_max <= self.spawn_delay_min {
            log::warn!(
                "spawn delay range [{}, {}) is empty, widening",
                self.spawn_delay_min,
                self.spawn_delay_max
            );
            self.spawn_delay_max = self.spawn_delay_min + (SPAWN_DELAY_MAX - SPAWN_DELAY_MIN);
        }
        if !(self.lift_duration > 0.0) {
            log::warn!("lift_duration {} invalid, using {}", self.lift_duration, LIFT_DURATION);
            self.lift_duration = LIFT_DURATION;
        }
        if !(self.rotate_duration > 0.0) {
            log::warn!("rotate_duration {} invalid, using {}", self.rotate_duration, ROTATE_DURATION);
            self.rotate_duration = ROTATE_DURATION;
        }
        if self.catalog.is_empty() {
            log::warn!("Empty shape catalog, no blocks will spawn");
        }

        self
    }
}
