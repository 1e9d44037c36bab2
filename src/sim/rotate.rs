//! Tap-to-rotate settle sequence
//!
//! A tap lifts the block by its own on-screen height, then turns it to the
//! next quarter turn, then hands it back to physics so it drops into place.
//! Lifting first keeps the spin clear of neighbouring blocks.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::physics::PhysicsBackend;
use super::scene::Scene;
use super::state::{Animation, Block, BlockId, HitTarget, SceneEvent, TerrainKind};
use crate::config::RotationPolicy;
use crate::normalize_angle;

/// 90° in radians
pub const QUARTER_TURN: f32 = FRAC_PI_2;

/// Angles this close below a quarter boundary count as on it
const SNAP_EPSILON: f32 = 1e-3;

/// What a tap did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    Rotating { id: BlockId, target_angle: f32 },
    Missed,
    Terrain(TerrainKind),
    /// Block is already animating or being dragged
    Busy(BlockId),
}

/// Progress reported by one animation step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleProgress {
    pub lift_finished: bool,
    pub finished: bool,
}

/// Final angle for a settle turn. Always counter-clockwise and greater than
/// `current`; may exceed 2π so the turn interpolates the short way round.
pub fn target_angle(current: f32, policy: RotationPolicy) -> f32 {
    let current = normalize_angle(current);
    match policy {
        RotationPolicy::SnapToNextQuarter => {
            let turns = ((current + SNAP_EPSILON) / QUARTER_TURN).floor();
            (turns + 1.0) * QUARTER_TURN
        }
        RotationPolicy::RelativeQuarter => current + QUARTER_TURN,
    }
}

/// Arm the two-phase sequence on a block
pub fn begin_settle(block: &mut Block, policy: RotationPolicy) -> f32 {
    let target = target_angle(block.rotation, policy);
    block.animation = Animation::Lifting {
        elapsed: 0.0,
        start: block.pos,
        rise: block.frame_size().y,
        target_angle: target,
    };
    target
}

/// Advance a block's settle animation by `dt`. Time left over after the lift
/// carries into the turn; the turn never starts before the lift ends.
pub fn advance_settle(
    block: &mut Block,
    dt: f32,
    lift_duration: f32,
    rotate_duration: f32,
) -> SettleProgress {
    let mut progress = SettleProgress::default();
    let mut remaining = dt;

    loop {
        match block.animation {
            Animation::Idle => break,
            Animation::Lifting {
                elapsed,
                start,
                rise,
                target_angle,
            } => {
                let elapsed = elapsed + remaining;
                if elapsed < lift_duration {
                    block.pos = start + Vec2::Y * rise * (elapsed / lift_duration);
                    block.animation = Animation::Lifting {
                        elapsed,
                        start,
                        rise,
                        target_angle,
                    };
                    break;
                }
                block.pos = start + Vec2::Y * rise;
                block.animation = Animation::Rotating {
                    elapsed: 0.0,
                    start_angle: block.rotation,
                    target_angle,
                };
                progress.lift_finished = true;
                remaining = elapsed - lift_duration;
            }
            Animation::Rotating {
                elapsed,
                start_angle,
                target_angle,
            } => {
                let elapsed = elapsed + remaining;
                if elapsed < rotate_duration {
                    let t = elapsed / rotate_duration;
                    block.set_rotation(start_angle + (target_angle - start_angle) * t);
                    block.animation = Animation::Rotating {
                        elapsed,
                        start_angle,
                        target_angle,
                    };
                } else {
                    block.set_rotation(target_angle);
                    block.animation = Animation::Idle;
                    progress.finished = true;
                }
                break;
            }
        }
    }

    progress
}

impl<P: PhysicsBackend> Scene<P> {
    /// Start a settle sequence on the block under a field-space point
    pub fn handle_tap(&mut self, point: Vec2) -> TapOutcome {
        let id = match self.hit_test(point) {
            None => return TapOutcome::Missed,
            Some(HitTarget::Terrain(kind)) => return TapOutcome::Terrain(kind),
            Some(HitTarget::Block(id)) => id,
        };
        if self.drag.target() == Some(id) {
            return TapOutcome::Busy(id);
        }

        let policy = self.config.rotation_policy;
        let Some(block) = self.block_mut(id) else {
            return TapOutcome::Missed;
        };
        if block.animation.is_active() {
            return TapOutcome::Busy(id);
        }
        let target = begin_settle(block, policy);
        self.set_simulated(id, false);

        self.events.push(SceneEvent::RotationStarted {
            id,
            target_angle: target,
        });
        log::debug!("Settle started on {} toward {:.3} rad", id, target);
        TapOutcome::Rotating {
            id,
            target_angle: target,
        }
    }

    /// Step every running settle animation; finished blocks resume physics
    pub(crate) fn advance_animations(&mut self, dt: f32) {
        let lift = self.config.lift_duration;
        let turn = self.config.rotate_duration;
        let mut finished = Vec::new();

        for block in self.blocks.iter_mut().filter(|b| b.animation.is_active()) {
            let progress = advance_settle(block, dt, lift, turn);
            if progress.lift_finished {
                self.events.push(SceneEvent::LiftFinished(block.id));
            }
            if progress.finished {
                finished.push(block.id);
            }
        }

        for id in finished {
            self.set_simulated(id, true);
            self.events.push(SceneEvent::RotationFinished(id));
            log::debug!("Settle finished on {}", id);
        }
    }

    /// Whether any block is mid-sequence
    pub fn is_animating(&self) -> bool {
        self.blocks.iter().any(|b| b.animation.is_active())
    }
}
