//! Scene control logic
//!
//! Everything that decides what blocks do lives here:
//! - Seeded RNG only, so a seed plus an input script replays exactly
//! - Blocks addressed by id, stored in spawn order
//! - No rendering or platform dependencies; physics plugs in via a trait

pub mod catalog;
pub mod drag;
pub mod physics;
pub mod rotate;
pub mod scene;
pub mod spawner;
pub mod state;

pub use catalog::{BlockColor, Collider, ColliderKind, ShapeId, ShapeSpec, default_catalog, pick_random_shape};
pub use drag::{DragOutcome, DragSession};
pub use physics::{BasicPhysics, NullPhysics, PhysicsBackend};
pub use rotate::{QUARTER_TURN, SettleProgress, TapOutcome, advance_settle, begin_settle, target_angle};
pub use scene::{GestureOutcome, Scene};
pub use spawner::SpawnSchedule;
pub use state::{Animation, Block, BlockId, HitTarget, SceneEvent, Terrain, TerrainKind};
