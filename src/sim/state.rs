//! Scene entities and shared state types
//!
//! Blocks are addressed by [`BlockId`], never by reference, so a block torn
//! down while an interaction still points at it only turns later updates
//! into no-ops.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::catalog::{BlockColor, Collider, ShapeId, ShapeSpec};
use crate::{normalize_angle, rotated_extent};

/// Stable block identifier (allocation order = spawn order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "block#{}", self.0)
    }
}

/// Settle animation progress for a single block
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Animation {
    #[default]
    Idle,
    /// Phase 1: moving straight up by `rise`
    Lifting {
        elapsed: f32,
        start: Vec2,
        rise: f32,
        target_angle: f32,
    },
    /// Phase 2: turning from `start_angle` to `target_angle` (unnormalized)
    Rotating {
        elapsed: f32,
        start_angle: f32,
        target_angle: f32,
    },
}

impl Animation {
    pub fn is_active(&self) -> bool {
        !matches!(self, Animation::Idle)
    }
}

/// A spawned block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub shape: ShapeId,
    pub color: BlockColor,
    /// Sprite size in the block's local frame
    pub size: Vec2,
    /// Center position (field space)
    pub pos: Vec2,
    /// Rotation (radians, [0, 2π), counter-clockwise)
    pub rotation: f32,
    /// Whether the physics backend currently drives this block
    pub simulated: bool,
    pub animation: Animation,
    pub collider: Collider,
}

impl Block {
    pub fn new(id: BlockId, spec: &ShapeSpec, pos: Vec2) -> Self {
        Self {
            id,
            shape: spec.shape,
            color: spec.color,
            size: spec.effective_size(),
            pos,
            rotation: 0.0,
            simulated: true,
            animation: Animation::Idle,
            collider: Collider::for_spec(spec),
        }
    }

    /// Axis-aligned size of the rotated sprite
    pub fn frame_size(&self) -> Vec2 {
        rotated_extent(self.size, self.rotation)
    }

    /// Point-in-sprite test in the block's rotated frame
    pub fn contains_point(&self, point: Vec2) -> bool {
        let local = Vec2::from_angle(-self.rotation).rotate(point - self.pos);
        let half = self.size * 0.5;
        local.x.abs() <= half.x && local.y.abs() <= half.y
    }

    pub fn set_rotation(&mut self, angle: f32) {
        self.rotation = normalize_angle(angle);
    }
}

/// Static boundary pieces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Floor,
    LeftWall,
    RightWall,
}

/// A static, never-simulated box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    pub kind: TerrainKind,
    pub center: Vec2,
    pub size: Vec2,
}

impl Terrain {
    pub fn min(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size * 0.5
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

/// Topmost entity under a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Block(BlockId),
    Terrain(TerrainKind),
}

/// Notifications for the host (renderer, audio)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    BlockSpawned(BlockId),
    BlockRemoved(BlockId),
    DragStarted(BlockId),
    DragEnded(BlockId),
    RotationStarted { id: BlockId, target_angle: f32 },
    LiftFinished(BlockId),
    RotationFinished(BlockId),
}

/// RNG state wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
