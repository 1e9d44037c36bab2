//! Physics backend seam
//!
//! The scene owns block poses and the simulated flag; the backend advances
//! the poses of simulated blocks and is told about every flag change. A
//! host engine implements [`PhysicsBackend`] over its own bodies.
//! [`BasicPhysics`] is a small reference backend for headless runs and
//! tests: gravity plus resting contact, not a rigid-body solver.

use std::collections::HashMap;

use glam::Vec2;

use super::state::{Block, BlockId, Terrain};
use crate::consts::UNITS_PER_METRE;
use crate::normalize_angle;

pub trait PhysicsBackend {
    /// Gravity in metres/s²
    fn set_gravity(&mut self, gravity: Vec2);
    fn add_terrain(&mut self, terrain: &Terrain);
    /// Register a freshly spawned, dynamic block
    fn add_block(&mut self, block: &Block);
    fn remove_block(&mut self, id: BlockId);
    /// Enable or suspend simulation; re-enabled bodies start at rest
    fn set_simulated(&mut self, id: BlockId, simulated: bool);
    /// Advance simulated blocks by `dt` seconds
    fn step(&mut self, dt: f32, blocks: &mut [Block]);
}

/// Backend that never moves anything
#[derive(Debug, Default)]
pub struct NullPhysics;

impl PhysicsBackend for NullPhysics {
    fn set_gravity(&mut self, _gravity: Vec2) {}
    fn add_terrain(&mut self, _terrain: &Terrain) {}
    fn add_block(&mut self, _block: &Block) {}
    fn remove_block(&mut self, _id: BlockId) {}
    fn set_simulated(&mut self, _id: BlockId, _simulated: bool) {}
    fn step(&mut self, _dt: f32, _blocks: &mut [Block]) {}
}

/// Axis-aligned bounds
#[derive(Debug, Clone, Copy)]
struct Aabb {
    min: Vec2,
    max: Vec2,
}

impl Aabb {
    fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            max: center + size * 0.5,
        }
    }

    fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
    }

    fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.min.y < other.max.y && self.max.y > other.min.y
    }
}

/// Minimal gravity integrator with bounding-box resting contact
#[derive(Debug)]
pub struct BasicPhysics {
    gravity: Vec2,
    terrain: Vec<Terrain>,
    velocities: HashMap<BlockId, Vec2>,
}

impl Default for BasicPhysics {
    fn default() -> Self {
        Self::new()
    }
}

impl BasicPhysics {
    pub fn new() -> Self {
        Self {
            gravity: Vec2::ZERO,
            terrain: Vec::new(),
            velocities: HashMap::new(),
        }
    }

    /// Current velocity of a registered block (field units/s)
    pub fn velocity(&self, id: BlockId) -> Option<Vec2> {
        self.velocities.get(&id).copied()
    }

    fn resolve_terrain(&self, bounds: &mut Aabb, vel: &mut Vec2) {
        for terrain in &self.terrain {
            let solid = Aabb {
                min: terrain.min(),
                max: terrain.max(),
            };
            if !bounds.overlaps(&solid) {
                continue;
            }
            // Push out along the axis of least penetration
            let push_up = solid.max.y - bounds.min.y;
            let push_down = bounds.max.y - solid.min.y;
            let push_right = solid.max.x - bounds.min.x;
            let push_left = bounds.max.x - solid.min.x;
            let min_y = push_up.min(push_down);
            let min_x = push_right.min(push_left);
            let shift = if min_y <= min_x {
                vel.y = 0.0;
                if push_up <= push_down {
                    Vec2::new(0.0, push_up)
                } else {
                    Vec2::new(0.0, -push_down)
                }
            } else {
                vel.x = 0.0;
                if push_right <= push_left {
                    Vec2::new(push_right, 0.0)
                } else {
                    Vec2::new(-push_left, 0.0)
                }
            };
            bounds.min += shift;
            bounds.max += shift;
        }
    }
}

/// Push block `i` out of every block beneath it. A support is any block
/// whose center is lower (ties go to the older id); blocks above are left
/// to resolve against this one on their own turn.
fn resolve_supports(blocks: &[Block], i: usize, bounds: &mut Aabb, vel: &mut Vec2) {
    let (id, center_y) = (blocks[i].id, blocks[i].pos.y);
    for (j, other) in blocks.iter().enumerate() {
        if j == i || other.pos.y > center_y || (other.pos.y == center_y && other.id > id) {
            continue;
        }
        let support = Aabb::from_center(other.pos, other.frame_size());
        if !bounds.overlaps(&support) {
            continue;
        }
        // Least penetration, never downward into the support
        let push_up = support.max.y - bounds.min.y;
        let push_right = support.max.x - bounds.min.x;
        let push_left = bounds.max.x - support.min.x;
        let shift = if push_up <= push_right.min(push_left) {
            vel.y = vel.y.max(0.0);
            Vec2::new(0.0, push_up)
        } else if push_right <= push_left {
            vel.x = vel.x.max(0.0);
            Vec2::new(push_right, 0.0)
        } else {
            vel.x = vel.x.min(0.0);
            Vec2::new(-push_left, 0.0)
        };
        bounds.min += shift;
        bounds.max += shift;
    }
}

impl PhysicsBackend for BasicPhysics {
    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn add_terrain(&mut self, terrain: &Terrain) {
        self.terrain.push(*terrain);
    }

    fn add_block(&mut self, block: &Block) {
        self.velocities.insert(block.id, Vec2::ZERO);
    }

    fn remove_block(&mut self, id: BlockId) {
        self.velocities.remove(&id);
    }

    fn set_simulated(&mut self, id: BlockId, _simulated: bool) {
        // Dragged or animated bodies have no momentum to carry back
        if let Some(vel) = self.velocities.get_mut(&id) {
            *vel = Vec2::ZERO;
        }
    }

    fn step(&mut self, dt: f32, blocks: &mut [Block]) {
        let accel = self.gravity * UNITS_PER_METRE;

        // Settle lowest blocks first so stacks rest on already-resolved support
        let mut order: Vec<usize> = (0..blocks.len()).collect();
        order.sort_by(|&a, &b| {
            blocks[a]
                .pos
                .y
                .partial_cmp(&blocks[b].pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for &i in &order {
            if !blocks[i].simulated {
                continue;
            }
            let id = blocks[i].id;
            let mut vel = self.velocities.get(&id).copied().unwrap_or(Vec2::ZERO);
            vel += accel * dt;

            let frame = blocks[i].frame_size();
            let mut bounds = Aabb::from_center(blocks[i].pos + vel * dt, frame);
            resolve_supports(blocks, i, &mut bounds, &mut vel);
            self.resolve_terrain(&mut bounds, &mut vel);

            let block = &mut blocks[i];
            block.pos = (bounds.min + bounds.max) * 0.5;
            block.rotation = normalize_angle(block.rotation);
            self.velocities.insert(id, vel);
        }
    }
}
