//! Follow Camera Sandbox
//!
//! Headless run of a follow camera through a scripted corridor. Logs the
//! camera pose and every occlusion phase change.
//!
//! Run with: cargo run -p void_sandbox
//!       or: RUST_LOG=debug cargo run --bin follow_camera_sandbox

mod corridor;
mod sandbox_config;

use corridor::{Corridor, PLAYER};
use glam::Vec3;
use sandbox_config::SandboxConfig;
use void_camera::{CameraSystem, OcclusionPhase, RigStatus, Transform};
use void_camera::physics::PhysicsOcclusion;
use void_physics::{ColliderHandle, PhysicsWorld};

/// Camera start, raised above the player and behind the corridor start
const CAMERA_START: Vec3 = Vec3::new(0.0, 3.0, -5.0);

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = SandboxConfig::load();
    log::info!(
        "Sandbox: {:.1}s at dt={:.4}, player speed {}",
        config.duration,
        config.delta_time,
        config.player_speed
    );

    if let Err(e) = run(&config) {
        log::error!("Sandbox failed: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &SandboxConfig) -> void_physics::Result<()> {
    let world = PhysicsWorld::new(config.physics.clone());
    let mut corridor = Corridor::build(world, config.player_speed, config.gate_lifetime)?;

    let mut cameras: CameraSystem<ColliderHandle> = CameraSystem::new();
    let rig = cameras.spawn(
        config.camera.clone().with_target(PLAYER),
        Transform::from_position(CAMERA_START),
    );

    if cameras.rig(rig).map(|r| r.status()) != Some(RigStatus::Active) {
        log::error!("Camera rig failed to start; see errors above");
        return Ok(());
    }

    let mut phase = OcclusionPhase::Free;
    let mut transitions = 0u32;
    let frames = config.frame_count();

    for frame in 0..frames {
        let time = frame as f32 * config.delta_time;
        corridor.step(time)?;

        for event in cameras.track_volumes(&mut corridor.world) {
            log::debug!("Unhandled volume event {:?}", event);
        }

        let scene = PhysicsOcclusion::new(&corridor.world)
            .with_filter(Corridor::camera_sight_filter())
            .ignoring(corridor.player_body);
        cameras.update(config.delta_time, &scene, &corridor.transforms);

        let Some(camera) = cameras.rig(rig) else {
            break;
        };

        if camera.phase() != phase {
            log::info!(
                "t={:6.2}s {:?} -> {:?} (occluder {:?})",
                time,
                phase,
                camera.phase(),
                camera.occluder()
            );
            phase = camera.phase();
            transitions += 1;
        }

        if config.log_every > 0 && frame % config.log_every == 0 {
            let player = corridor.player_position(time);
            let position = camera.position();
            let forward = camera.transform().rotation * Vec3::Z;
            log::info!(
                "t={:6.2}s player z={:6.2} camera=({:5.2}, {:5.2}, {:6.2}) forward=({:5.2}, {:5.2}, {:5.2}) {:?}",
                time,
                player.z,
                position.x,
                position.y,
                position.z,
                forward.x,
                forward.y,
                forward.z,
                camera.phase()
            );
        }
    }

    match cameras.despawn(rig) {
        Ok(camera) => log::info!(
            "Finished {} frames, {} occlusion transitions, camera at {:?}",
            frames,
            transitions,
            camera.position()
        ),
        Err(e) => log::warn!("{}", e),
    }
    Ok(())
}
