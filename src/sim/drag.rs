//! Drag state machine
//!
//! `Idle -> Dragging -> Idle`, driven by pan gesture phases. While dragging,
//! the target's simulation is suspended and its position follows the
//! pointer directly (no velocity).

use glam::Vec2;

use super::physics::PhysicsBackend;
use super::scene::Scene;
use super::state::{BlockId, HitTarget, SceneEvent, TerrainKind};
use crate::input::GesturePhase;

/// The single active drag, if any
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragSession {
    target: Option<BlockId>,
}

impl DragSession {
    pub fn target(&self) -> Option<BlockId> {
        self.target
    }

    pub(crate) fn clear(&mut self) {
        self.target = None;
    }
}

/// What a pan event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Started(BlockId),
    Moved(BlockId),
    Ended(BlockId),
    /// Nothing under the pointer
    Missed,
    /// Level geometry under the pointer
    Terrain(TerrainKind),
    /// Block is in the middle of a settle animation
    Busy(BlockId),
    /// A drag is already running (single pointer)
    AlreadyDragging(BlockId),
    /// Changed/ended with no drag running
    Idle,
    /// The dragged block was torn down
    TargetGone(BlockId),
    Unrecognized(GesturePhase),
}

impl<P: PhysicsBackend> Scene<P> {
    /// Feed one pan gesture update (field-space point)
    pub fn handle_pan(&mut self, phase: GesturePhase, point: Vec2) -> DragOutcome {
        match phase {
            GesturePhase::Began => self.begin_drag(point),
            GesturePhase::Changed => self.update_drag(point),
            // A cancelled pan must still hand the block back to physics
            GesturePhase::Ended | GesturePhase::Cancelled => self.end_drag(),
            GesturePhase::Possible | GesturePhase::Failed => {
                log::warn!("Unrecognized pan state: {:?}", phase);
                DragOutcome::Unrecognized(phase)
            }
        }
    }

    fn begin_drag(&mut self, point: Vec2) -> DragOutcome {
        if let Some(current) = self.drag.target() {
            log::debug!("Pan began while dragging {}, ignored", current);
            return DragOutcome::AlreadyDragging(current);
        }

        let id = match self.hit_test(point) {
            None => return DragOutcome::Missed,
            Some(HitTarget::Terrain(kind)) => return DragOutcome::Terrain(kind),
            Some(HitTarget::Block(id)) => id,
        };
        if self.block(id).is_some_and(|b| b.animation.is_active()) {
            return DragOutcome::Busy(id);
        }
        if !self.set_simulated(id, false) {
            return DragOutcome::TargetGone(id);
        }

        self.drag.target = Some(id);
        self.events.push(SceneEvent::DragStarted(id));
        log::debug!("Drag started on {}", id);
        DragOutcome::Started(id)
    }

    fn update_drag(&mut self, point: Vec2) -> DragOutcome {
        let Some(id) = self.drag.target() else {
            return DragOutcome::Idle;
        };
        match self.block_mut(id) {
            Some(block) => {
                block.pos = point;
                DragOutcome::Moved(id)
            }
            None => {
                self.drag.clear();
                DragOutcome::TargetGone(id)
            }
        }
    }

    fn end_drag(&mut self) -> DragOutcome {
        let Some(id) = self.drag.target.take() else {
            return DragOutcome::Idle;
        };
        if !self.set_simulated(id, true) {
            return DragOutcome::TargetGone(id);
        }
        self.events.push(SceneEvent::DragEnded(id));
        log::debug!("Drag ended on {}", id);
        DragOutcome::Ended(id)
    }
}
