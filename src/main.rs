// Headless rig demo
//
// A camera rig follows a wandering unit across a field of random pillars.
// Frame times jitter like a real render loop while the physics tick keeps its
// own fixed step. Input is scripted through the same keyboard state a window
// would feed. Run with RUST_LOG=debug to watch pitch decisions and jumps.
//
// Usage: terrain_rig [config.toml]

use std::path::Path;

use glam::Vec3;
use rand::Rng;
use terrain_rig::engine::input::InputState;
use terrain_rig::engine::{
    Aabb, BoxScene, FollowTarget, RigCamera, RigConfig, RigError, RigScheduler, Transform, Velocity,
};
use winit::keyboard::KeyCode;

const FRAMES: u32 = 900;
const PILLARS: usize = 60;
const JUMP_FRAME: u32 = 600;
const REPORT_EVERY: u32 = 60;
const DEMO_FOLLOW_RADIUS: f32 = 25.0;

// ============================================================================
// SCENE
// ============================================================================

fn build_scene(config: &RigConfig, count: usize) -> BoxScene {
    let mut rng = rand::thread_rng();
    let mut scene = BoxScene::new(Some(0.0));

    for _ in 0..count {
        let center = Vec3::new(
            rng.gen_range(0.0..config.map.width),
            0.0,
            rng.gen_range(0.0..config.map.height),
        );
        let size = Vec3::new(
            rng.gen_range(1.0..6.0),
            rng.gen_range(2.0..18.0),
            rng.gen_range(1.0..6.0),
        );
        scene.push(Aabb::pillar(center, size, 0.0));
    }

    log::info!("Spawned {} pillars", count);
    scene
}

// ============================================================================
// SCRIPTED INPUT
// ============================================================================

/// Press and release keys the way an operator would over the demo run.
fn script_input(input: &mut InputState, frame: u32) {
    match frame {
        0 => input.press(KeyCode::KeyW),
        180 => {
            input.release(KeyCode::KeyW);
            input.press(KeyCode::KeyE);
        }
        300 => {
            input.release(KeyCode::KeyE);
            input.press(KeyCode::KeyD);
        }
        420 => input.release(KeyCode::KeyD),
        _ => {}
    }

    // zoom in for a while, then back out
    if (420..480).contains(&frame) {
        input.scroll(1.0);
    } else if (480..540).contains(&frame) {
        input.scroll(-1.0);
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> Result<(), RigError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => RigConfig::load(Path::new(&path))?,
        None => RigConfig::default(),
    };
    if config.map.follow_radius <= 0.0 {
        config.map.follow_radius = DEMO_FOLLOW_RADIUS;
    }

    let mut rng = rand::thread_rng();
    let scene = build_scene(&config, PILLARS);
    let mut scheduler = RigScheduler::new(&config, scene);

    let center = Vec3::new(config.map.width * 0.5, 0.0, config.map.height * 0.5);
    let unit = scheduler
        .world
        .spawn((
            Transform::from_position(center),
            Velocity::new(Vec3::new(rng.gen_range(-6.0..6.0), 0.0, rng.gen_range(-6.0..6.0))),
        ))
        .id();
    let rig = scheduler
        .world
        .spawn((RigCamera::new(config, center), FollowTarget(unit)))
        .id();

    let mut input = InputState::new();
    let mut physics_steps = 0;

    for frame in 0..FRAMES {
        let dt = rng.gen_range(1.0 / 144.0..1.0 / 30.0);

        script_input(&mut input, frame);
        scheduler.set_input(input.axes());
        input.end_frame();

        if frame == JUMP_FRAME {
            let unit_position = scheduler.world.get::<Transform>(unit).map(|t| t.position);
            if let Some(position) = unit_position {
                log::info!("Jumping rig to unit at {:?}", position);
                scheduler.jump(Some(rig), position);
            }
        }

        physics_steps += scheduler.advance(dt);

        if frame % REPORT_EVERY == 0 {
            if let Some(camera) = scheduler.world.get::<RigCamera>(rig) {
                let pose = camera.pose();
                log::info!(
                    "frame {:4} | anchor ({:6.2}, {:5.2}, {:6.2}) | yaw {:6.1} | pitch {:5.1} (+{:4.1}) | zoom {:.2} | eye {:?}",
                    frame,
                    pose.ground_position.x,
                    pose.ground_position.y,
                    pose.ground_position.z,
                    pose.yaw,
                    pose.pitch,
                    camera.pitch_offset(),
                    camera.zoom_fraction(),
                    camera.camera_position(),
                );
            }
        }
    }

    log::info!(
        "Ran {} frames, {} physics steps at {:.3}s",
        FRAMES,
        physics_steps,
        scheduler.physics_step()
    );
    Ok(())
}
