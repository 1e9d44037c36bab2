//! Scene and frame driver
//!
//! Owns terrain, blocks and the interaction state. The host calls
//! [`Scene::on_frame`] once per rendered frame and forwards gestures to
//! [`Scene::handle_gesture`]; both run serially on the same thread.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::drag::{DragOutcome, DragSession};
use super::physics::PhysicsBackend;
use super::rotate::TapOutcome;
use super::spawner::SpawnSchedule;
use super::state::{Block, BlockId, HitTarget, RngState, SceneEvent, Terrain, TerrainKind};
use crate::config::FieldConfig;
use crate::consts::*;
use crate::input::{Gesture, ViewTransform};

/// Result of routing one gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    Drag(DragOutcome),
    Tap(TapOutcome),
}

pub struct Scene<P: PhysicsBackend> {
    pub(crate) config: FieldConfig,
    pub(crate) physics: P,
    pub(crate) rng_state: RngState,
    pub(crate) rng: Pcg32,
    pub(crate) terrain: Vec<Terrain>,
    /// Sorted by id (= spawn order, = draw order)
    pub(crate) blocks: Vec<Block>,
    pub(crate) schedule: SpawnSchedule,
    pub(crate) drag: DragSession,
    pub(crate) events: Vec<SceneEvent>,
    next_id: u32,
    accumulator: f32,
    last_time: Option<f64>,
}

impl<P: PhysicsBackend> Scene<P> {
    /// Build the field (gravity, floor, walls) and an empty spawn schedule
    pub fn new(config: FieldConfig, physics: P, seed: u64) -> Self {
        let config = config.sanitized();
        let rng_state = RngState::new(seed);
        let mut scene = Self {
            rng: rng_state.to_rng(),
            rng_state,
            terrain: build_terrain(&config),
            config,
            physics,
            blocks: Vec::new(),
            schedule: SpawnSchedule::default(),
            drag: DragSession::default(),
            events: Vec::new(),
            next_id: 1,
            accumulator: 0.0,
            last_time: None,
        };

        scene.physics.set_gravity(scene.config.gravity);
        for terrain in &scene.terrain {
            scene.physics.add_terrain(terrain);
        }

        log::info!(
            "Scene ready: {}x{} field, up to {} blocks, seed {}",
            scene.config.size.x,
            scene.config.size.y,
            scene.config.max_blocks,
            seed
        );
        scene
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn terrain(&self) -> &[Terrain] {
        &self.terrain
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.blocks[i])
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        match self.blocks.binary_search_by_key(&id, |b| b.id) {
            Ok(i) => Some(&mut self.blocks[i]),
            Err(_) => None,
        }
    }

    /// Block currently following the pointer
    pub fn dragged_block(&self) -> Option<BlockId> {
        self.drag.target()
    }

    /// Hand queued events to the host
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn allocate_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Topmost entity under a field-space point. Blocks draw above terrain,
    /// later blocks above earlier ones.
    pub fn hit_test(&self, point: Vec2) -> Option<HitTarget> {
        if let Some(block) = self.blocks.iter().rev().find(|b| b.contains_point(point)) {
            return Some(HitTarget::Block(block.id));
        }
        self.terrain
            .iter()
            .rev()
            .find(|t| t.contains_point(point))
            .map(|t| HitTarget::Terrain(t.kind))
    }

    /// Toggle simulation on a block that may already be gone
    pub(crate) fn set_simulated(&mut self, id: BlockId, simulated: bool) -> bool {
        let Some(block) = self.block_mut(id) else {
            log::debug!("{} no longer exists, simulated={} skipped", id, simulated);
            return false;
        };
        block.simulated = simulated;
        self.physics.set_simulated(id, simulated);
        true
    }

    /// Advance one rendered frame: animations, physics, then spawning
    pub fn on_frame(&mut self, now: f64) {
        let dt = match self.last_time {
            Some(last) if now < last => {
                log::warn!("Frame time went backwards ({} < {}), holding", now, last);
                0.0
            }
            Some(last) => (now - last) as f32,
            None => 0.0,
        };
        if self.last_time.is_none_or(|last| now > last) {
            self.last_time = Some(now);
        }

        self.advance_animations(dt);
        self.step_physics(dt);
        self.maybe_spawn(now);
    }

    fn step_physics(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.physics.step(SIM_DT, &mut self.blocks);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// Route a view-space gesture
    pub fn handle_gesture(&mut self, gesture: Gesture, view: &ViewTransform) -> GestureOutcome {
        match gesture {
            Gesture::Pan { phase, point } => {
                GestureOutcome::Drag(self.handle_pan(phase, view.to_field(point)))
            }
            Gesture::Tap { point } => GestureOutcome::Tap(self.handle_tap(view.to_field(point))),
        }
    }

    /// Tear down one block; interactions still pointing at it become no-ops
    pub fn remove_block(&mut self, id: BlockId) -> bool {
        let Ok(index) = self.blocks.binary_search_by_key(&id, |b| b.id) else {
            return false;
        };
        self.blocks.remove(index);
        self.physics.remove_block(id);
        if self.drag.target() == Some(id) {
            self.drag.clear();
        }
        self.events.push(SceneEvent::BlockRemoved(id));
        log::debug!("Removed {}", id);
        true
    }

    /// Clear all blocks and restart the spawn schedule; terrain stays
    pub fn reset(&mut self) {
        for block in &self.blocks {
            self.physics.remove_block(block.id);
            self.events.push(SceneEvent::BlockRemoved(block.id));
        }
        self.blocks.clear();
        self.drag.clear();
        self.schedule = SpawnSchedule::default();
        log::info!("Field reset");
    }
}

/// Floor across the bottom, full-height walls just outside each side
fn build_terrain(config: &FieldConfig) -> Vec<Terrain> {
    let size = config.size;
    let wall_size = Vec2::new(config.walls.thickness, size.y);
    let wall_offset = config.walls.outset + config.walls.thickness / 2.0;

    vec![
        Terrain {
            kind: TerrainKind::Floor,
            center: Vec2::new(size.x / 2.0, config.floor.center_y),
            size: Vec2::new(size.x, config.floor.height),
        },
        Terrain {
            kind: TerrainKind::LeftWall,
            center: Vec2::new(-wall_offset, size.y / 2.0),
            size: wall_size,
        },
        Terrain {
            kind: TerrainKind::RightWall,
            center: Vec2::new(size.x + wall_offset, size.y / 2.0),
            size: wall_size,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::GesturePhase;
    use crate::sim::catalog::ShapeId;
    use crate::sim::rotate::TapOutcome;
    use crate::sim::physics::{BasicPhysics, NullPhysics};
    use crate::sim::testing::{place, scene};

    #[test]
    fn test_terrain_layout() {
        let scene = scene();
        let terrain = scene.terrain();
        assert_eq!(terrain.len(), 3);

        let floor = terrain.iter().find(|t| t.kind == TerrainKind::Floor).unwrap();
        assert_eq!(floor.size, Vec2::new(FIELD_WIDTH, FLOOR_HEIGHT));
        assert_eq!(floor.center, Vec2::new(FIELD_WIDTH / 2.0, FLOOR_CENTER_Y));

        // Inner faces flush with the field edges, full height
        let left = terrain.iter().find(|t| t.kind == TerrainKind::LeftWall).unwrap();
        let right = terrain.iter().find(|t| t.kind == TerrainKind::RightWall).unwrap();
        assert_eq!(left.max().x, 0.0);
        assert_eq!(right.min().x, FIELD_WIDTH);
        assert_eq!(left.size.y, FIELD_HEIGHT);
        assert_eq!(right.size.y, FIELD_HEIGHT);
    }

    #[test]
    fn test_wall_outset_moves_walls_outward() {
        let mut config = FieldConfig::default();
        config.walls.outset = 8.0;
        let scene = Scene::new(config, NullPhysics, 1);
        let left = scene.terrain().iter().find(|t| t.kind == TerrainKind::LeftWall).unwrap();
        assert_eq!(left.max().x, -8.0);
    }

    #[test]
    fn test_hit_test_prefers_topmost_block() {
        let mut scene = scene();
        let lower = place(&mut scene, ShapeId::Square128x128, Vec2::new(375.0, 112.0));
        let upper = place(&mut scene, ShapeId::Square128x128, Vec2::new(375.0, 150.0));
        assert_eq!(scene.hit_test(Vec2::new(375.0, 120.0)), Some(HitTarget::Block(upper)));
        assert_eq!(scene.hit_test(Vec2::new(375.0, 60.0)), Some(HitTarget::Block(lower)));
        assert_eq!(
            scene.hit_test(Vec2::new(20.0, 30.0)),
            Some(HitTarget::Terrain(TerrainKind::Floor))
        );
        assert_eq!(scene.hit_test(Vec2::new(20.0, 900.0)), None);
    }

    #[test]
    fn test_set_simulated_on_missing_block_is_noop() {
        let mut scene = scene();
        assert!(!scene.set_simulated(BlockId(99), false));
    }

    #[test]
    fn test_remove_block_mid_drag_clears_session() {
        let mut scene = scene();
        let id = place(&mut scene, ShapeId::Square128x128, Vec2::new(375.0, 600.0));
        scene.handle_pan(GesturePhase::Began, Vec2::new(375.0, 600.0));
        assert_eq!(scene.dragged_block(), Some(id));

        assert!(scene.remove_block(id));
        assert_eq!(scene.dragged_block(), None);
        assert_eq!(
            scene.handle_pan(GesturePhase::Changed, Vec2::new(10.0, 10.0)),
            DragOutcome::Idle
        );
        assert_eq!(scene.handle_pan(GesturePhase::Ended, Vec2::ZERO), DragOutcome::Idle);
        assert!(!scene.remove_block(id));
    }

    #[test]
    fn test_reset_clears_blocks_and_restarts_spawning() {
        let mut scene = scene();
        scene.on_frame(0.0);
        assert_eq!(scene.blocks().len(), 1);
        scene.drain_events();

        scene.reset();
        assert!(scene.blocks().is_empty());
        assert_eq!(scene.spawned_count(), 0);
        assert_eq!(scene.terrain().len(), 3);
        let events = scene.drain_events();
        assert!(matches!(events.as_slice(), [SceneEvent::BlockRemoved(_)]));

        scene.on_frame(0.1);
        assert_eq!(scene.blocks().len(), 1);
    }

    #[test]
    fn test_frame_time_going_backwards_is_held() {
        let mut scene = Scene::new(FieldConfig::default(), BasicPhysics::new(), 3);
        scene.on_frame(10.0);
        let y = scene.blocks()[0].pos.y;
        scene.on_frame(9.0);
        assert_eq!(scene.blocks()[0].pos.y, y);
    }

    #[test]
    fn test_spawned_blocks_fall_to_the_floor() {
        let mut scene = Scene::new(FieldConfig::default(), BasicPhysics::new(), 11);
        let mut t = 0.0;
        while t < 8.0 {
            scene.on_frame(t);
            t += 1.0 / 60.0;
        }
        assert_eq!(scene.blocks().len(), 10);
        // Every block has come down from the spawn height and sits on something
        let floor_top = FLOOR_CENTER_Y + FLOOR_HEIGHT / 2.0;
        for block in scene.blocks() {
            assert!(block.simulated);
            assert!(block.pos.y < FIELD_HEIGHT);
            assert!(block.pos.y - block.frame_size().y / 2.0 >= floor_top - 0.5);
        }
    }

    #[test]
    fn test_gestures_map_from_view_space() {
        let mut scene = scene();
        let high = place(&mut scene, ShapeId::Square128x128, Vec2::new(200.0, 1000.0));
        let low = place(&mut scene, ShapeId::Square128x128, Vec2::new(375.0, 600.0));
        // Half scale, field cropped by 33.5 view units top and bottom
        let view = ViewTransform::new(Vec2::new(375.0, 600.0), Vec2::new(FIELD_WIDTH, FIELD_HEIGHT));

        let pan = |phase, point| Gesture::Pan { phase, point };
        assert_eq!(
            scene.handle_gesture(pan(GesturePhase::Began, Vec2::new(100.0, 133.5)), &view),
            GestureOutcome::Drag(DragOutcome::Started(high))
        );
        // 100 view units down is 200 field units down
        assert_eq!(
            scene.handle_gesture(pan(GesturePhase::Changed, Vec2::new(100.0, 233.5)), &view),
            GestureOutcome::Drag(DragOutcome::Moved(high))
        );
        assert!((scene.block(high).unwrap().pos - Vec2::new(200.0, 800.0)).length() < 1e-3);
        assert_eq!(
            scene.handle_gesture(pan(GesturePhase::Ended, Vec2::new(100.0, 233.5)), &view),
            GestureOutcome::Drag(DragOutcome::Ended(high))
        );

        let tap = |point| Gesture::Tap { point };
        assert!(matches!(
            scene.handle_gesture(tap(Vec2::new(187.5, 333.5)), &view),
            GestureOutcome::Tap(TapOutcome::Rotating { id, .. }) if id == low
        ));
        // Where the dragged block used to be
        assert_eq!(
            scene.handle_gesture(tap(Vec2::new(100.0, 133.5)), &view),
            GestureOutcome::Tap(TapOutcome::Missed)
        );
    }
}
