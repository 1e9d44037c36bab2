//! Timed block spawning
//!
//! Blocks drip in at irregular intervals until the cap is reached.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::pick_random_shape;
use super::physics::PhysicsBackend;
use super::scene::Scene;
use super::state::{Block, SceneEvent};

/// Spawn counters for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnSchedule {
    /// Blocks spawned so far
    pub spawned: u32,
    /// Earliest time the next block may appear (`None` = right away)
    pub next_spawn_at: Option<f64>,
}

impl SpawnSchedule {
    pub fn is_capped(&self, max: u32) -> bool {
        self.spawned >= max
    }

    pub fn is_due(&self, now: f64) -> bool {
        self.next_spawn_at.is_none_or(|at| now >= at)
    }

    /// Count a spawn and pick the next eligible time
    fn record_spawn<R: Rng + ?Sized>(&mut self, now: f64, delay_min: f64, delay_max: f64, rng: &mut R) {
        self.spawned += 1;
        self.next_spawn_at = Some(now + rng.random_range(delay_min..delay_max));
    }
}

impl<P: PhysicsBackend> Scene<P> {
    pub fn spawned_count(&self) -> u32 {
        self.schedule.spawned
    }

    pub fn next_spawn_at(&self) -> Option<f64> {
        self.schedule.next_spawn_at
    }

    /// Spawn a block at the spawn point if the schedule allows it
    pub fn maybe_spawn(&mut self, now: f64) -> Option<&Block> {
        if self.schedule.is_capped(self.config.max_blocks) || !self.schedule.is_due(now) {
            return None;
        }
        let spec = pick_random_shape(&self.config.catalog, &mut self.rng)?;

        let id = self.allocate_id();
        let block = Block::new(id, &spec, self.spawn_point());
        self.physics.add_block(&block);
        self.blocks.push(block);

        self.schedule.record_spawn(
            now,
            self.config.spawn_delay_min,
            self.config.spawn_delay_max,
            &mut self.rng,
        );
        self.events.push(SceneEvent::BlockSpawned(id));

        log::debug!(
            "Spawned {} ({}) [{}/{}], next at {:.3}",
            id,
            spec.shape.image_key(),
            self.schedule.spawned,
            self.config.max_blocks,
            self.schedule.next_spawn_at.unwrap_or(now)
        );
        if self.schedule.is_capped(self.config.max_blocks) {
            log::info!("Spawn cap of {} reached", self.config.max_blocks);
        }

        self.blocks.last()
    }

    fn spawn_point(&self) -> Vec2 {
        self.config.effective_spawn_point()
    }
}
