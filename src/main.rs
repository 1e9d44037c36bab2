//! Stacker entry point
//!
//! Runs a headless, scripted session against the reference physics backend
//! and logs what the scene does. Hosts with a real engine drive `Scene`
//! directly instead.
//!
//! Usage: `stacker [config.json] [seed] [snap|relative]`

use std::path::Path;

use glam::Vec2;

use stacker::config::{FieldConfig, RotationPolicy};
use stacker::input::{Gesture, GesturePhase, ViewTransform};
use stacker::sim::{BasicPhysics, Scene, SceneEvent};

/// Render rate of the scripted session
const FRAME_DT: f64 = 1.0 / 60.0;
const SESSION_SECONDS: f64 = 8.0;

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Stacker (headless) starting...");

    let mut config = match std::env::args().nth(1) {
        Some(path) => FieldConfig::load(Path::new(&path)),
        None => FieldConfig::default(),
    };
    let seed = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);
    if let Some(name) = std::env::args().nth(3) {
        match RotationPolicy::from_str(&name) {
            Some(policy) => config.rotation_policy = policy,
            None => log::warn!(
                "Unknown rotation policy {:?}, keeping {}",
                name,
                config.rotation_policy.as_str()
            ),
        }
    }
    log::info!("Rotation policy: {}", config.rotation_policy.as_str());

    let view = ViewTransform::identity(config.size);
    let mut scene = Scene::new(config, BasicPhysics::new(), seed);

    let mut frame = 0u32;
    let mut now = 0.0;
    while now < SESSION_SECONDS {
        scene.on_frame(now);
        script(&mut scene, &view, frame);

        for event in scene.drain_events() {
            match event {
                SceneEvent::BlockSpawned(id) => log::info!("[{:.2}s] {} spawned", now, id),
                SceneEvent::RotationFinished(id) => {
                    log::info!("[{:.2}s] {} settled", now, id)
                }
                other => log::debug!("[{:.2}s] {:?}", now, other),
            }
        }

        frame += 1;
        now = frame as f64 * FRAME_DT;
    }

    for block in scene.blocks() {
        log::info!(
            "{} {:?} at ({:.1}, {:.1}) rot {:.2} rad",
            block.id,
            block.shape,
            block.pos.x,
            block.pos.y,
            block.rotation
        );
    }
    log::info!("Session done: {} blocks", scene.blocks().len());
}

/// Drag the first block sideways, then tap it twice
fn script(scene: &mut Scene<BasicPhysics>, view: &ViewTransform, frame: u32) {
    let Some(first) = scene.blocks().first() else {
        return;
    };
    let at = view.to_view(first.pos);

    let gesture = match frame {
        240 => Gesture::Pan {
            phase: GesturePhase::Began,
            point: at,
        },
        241..=270 => Gesture::Pan {
            phase: GesturePhase::Changed,
            point: at + Vec2::new(-4.0, -2.0),
        },
        271 => Gesture::Pan {
            phase: GesturePhase::Ended,
            point: at,
        },
        330 | 400 => Gesture::Tap { point: at },
        _ => return,
    };

    let outcome = scene.handle_gesture(gesture, view);
    log::debug!("frame {}: {:?} -> {:?}", frame, gesture, outcome);
}
