//! Property tests over random frame timings and gesture scripts

use glam::Vec2;
use proptest::prelude::*;

use stacker::config::FieldConfig;
use stacker::consts::*;
use stacker::input::GesturePhase;
use stacker::sim::{BasicPhysics, Block, NullPhysics, Scene, SceneEvent};

#[derive(Debug, Clone)]
enum Step {
    Frame(f64),
    Pan(GesturePhase, Vec2),
    Tap(Vec2),
    Remove(usize),
}

fn point() -> impl Strategy<Value = Vec2> {
    (-20.0f32..770.0, 0.0f32..1334.0).prop_map(|(x, y)| Vec2::new(x, y))
}

fn phase() -> impl Strategy<Value = GesturePhase> {
    prop_oneof![
        4 => Just(GesturePhase::Began),
        6 => Just(GesturePhase::Changed),
        3 => Just(GesturePhase::Ended),
        1 => Just(GesturePhase::Cancelled),
        1 => Just(GesturePhase::Possible),
        1 => Just(GesturePhase::Failed),
    ]
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => (0.0f64..0.3).prop_map(Step::Frame),
        4 => (phase(), point()).prop_map(|(p, at)| Step::Pan(p, at)),
        2 => point().prop_map(Step::Tap),
        1 => (0usize..12).prop_map(Step::Remove),
    ]
}

/// Simulation is off exactly while a block is dragged or animating
fn assert_ownership<P: stacker::sim::PhysicsBackend>(scene: &Scene<P>) {
    for block in scene.blocks() {
        let owned = scene.dragged_block() == Some(block.id) || block.animation.is_active();
        assert_eq!(block.simulated, !owned, "{:?}", block);
    }
}

/// Aim a gesture at a spawned block half the time so drags actually land
fn aim(scene: &Scene<BasicPhysics>, at: Vec2) -> Vec2 {
    let blocks: &[Block] = scene.blocks();
    if blocks.is_empty() || at.x < 375.0 {
        return at;
    }
    blocks[(at.y as usize) % blocks.len()].pos
}

proptest! {
    #[test]
    fn spawn_count_never_exceeds_cap(dts in prop::collection::vec(0.0f64..1.0, 0..200)) {
        let mut scene = Scene::new(FieldConfig::default(), NullPhysics, 1);
        let mut now = 0.0;
        let mut spawn_times = Vec::new();
        for dt in dts {
            now += dt;
            let before = scene.spawned_count();
            scene.on_frame(now);
            prop_assert!(scene.spawned_count() <= MAX_NODE_COUNT);
            prop_assert!(scene.spawned_count() - before <= 1);
            if scene.spawned_count() > before {
                let delay = scene.next_spawn_at().unwrap() - now;
                prop_assert!((SPAWN_DELAY_MIN..SPAWN_DELAY_MAX).contains(&delay));
                spawn_times.push(now);
            }
        }
        // Consecutive spawns are never closer than the minimum delay
        for pair in spawn_times.windows(2) {
            prop_assert!(pair[1] - pair[0] >= SPAWN_DELAY_MIN - 1e-9);
        }
        prop_assert_eq!(scene.blocks().len() as u32, scene.spawned_count());
    }

    #[test]
    fn simulation_ownership_is_exclusive(steps in prop::collection::vec(step(), 1..150), seed in any::<u64>()) {
        let mut scene = Scene::new(FieldConfig::default(), BasicPhysics::new(), seed);
        let mut now = 0.0;
        scene.on_frame(now);

        for step in steps {
            match step {
                Step::Frame(dt) => {
                    now += dt;
                    scene.on_frame(now);
                }
                Step::Pan(phase, at) => {
                    let at = aim(&scene, at);
                    scene.handle_pan(phase, at);
                }
                Step::Tap(at) => {
                    let at = aim(&scene, at);
                    scene.handle_tap(at);
                }
                Step::Remove(index) => {
                    if let Some(id) = scene.blocks().get(index).map(|b| b.id) {
                        scene.remove_block(id);
                    }
                }
            }
            assert_ownership(&scene);
        }

        // Release any drag and let animations run out: nothing stays frozen
        scene.handle_pan(GesturePhase::Ended, Vec2::ZERO);
        scene.on_frame(now + 1.0);
        prop_assert!(scene.blocks().iter().all(|b| b.simulated));
    }

    #[test]
    fn terrain_never_becomes_a_target(x in 0.0f32..750.0, y in 16.0f32..48.0) {
        // Floor band with no blocks on it
        let mut scene = Scene::new(FieldConfig::default(), NullPhysics, 2);
        let floor = Vec2::new(x, y);
        prop_assert!(scene.handle_pan(GesturePhase::Began, floor) != stacker::sim::DragOutcome::Missed);
        prop_assert_eq!(scene.dragged_block(), None);
        scene.handle_tap(floor);
        prop_assert!(scene.drain_events().is_empty());
    }
}

#[test]
fn same_seed_same_session() {
    let run = |seed: u64| {
        let mut scene = Scene::new(FieldConfig::default(), BasicPhysics::new(), seed);
        let mut t = 0.0;
        for frame in 0..480 {
            scene.on_frame(t);
            if frame == 300 {
                let target = scene.blocks()[0].pos;
                scene.handle_tap(target);
            }
            t += 1.0 / 60.0;
        }
        scene
            .blocks()
            .iter()
            .map(|b| (b.shape, b.pos, b.rotation))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn tap_sequence_reports_phases_in_order() {
    let mut scene = Scene::new(FieldConfig::default(), NullPhysics, 9);
    scene.on_frame(0.0);
    let id = scene.blocks()[0].id;
    let at = scene.blocks()[0].pos;
    scene.drain_events();

    scene.handle_tap(at);
    let mut t = 0.0;
    let mut order = Vec::new();
    while t < 1.0 {
        t += 1.0 / 60.0;
        scene.on_frame(t);
        let simulated = scene.block(id).unwrap().simulated;
        for event in scene.drain_events() {
            match event {
                SceneEvent::LiftFinished(_) | SceneEvent::RotationFinished(_) => order.push(event),
                _ => {}
            }
        }
        if !order.contains(&SceneEvent::RotationFinished(id)) {
            assert!(!simulated);
        }
    }
    assert_eq!(
        order,
        vec![SceneEvent::LiftFinished(id), SceneEvent::RotationFinished(id)]
    );
    assert!(scene.block(id).unwrap().simulated);
}
