//! Integration tests for void_camera
//!
//! Drives follow cameras through a Rapier collision scene: following, wall
//! occlusion, designated volumes, releases and lifecycle.

use approx::assert_relative_eq;
use void_camera::pose::{interpolation_factor, look_rotation};
use void_camera::prelude::*;
use void_physics::{ColliderDesc, ColliderHandle, ColliderShape, PhysicsWorld};

const PLAYER: EntityId = EntityId(1);
const DT: f32 = 1.0 / 60.0;

struct Harness {
    world: PhysicsWorld,
    transforms: TransformRegistry,
    cameras: CameraSystem<ColliderHandle>,
    rig: RigId,
}

impl Harness {
    fn new(config: FollowCameraConfig, camera: Vec3, player: Vec3) -> Self {
        let mut transforms = TransformRegistry::new();
        transforms.insert(PLAYER, Transform::from_position(player));

        let mut cameras = CameraSystem::new();
        let rig = cameras.spawn(config, Transform::from_position(camera));

        Self {
            world: PhysicsWorld::default(),
            transforms,
            cameras,
            rig,
        }
    }

    fn following(camera: Vec3, player: Vec3) -> Self {
        Self::new(FollowCameraConfig::new(PLAYER), camera, player)
    }

    fn wall(&mut self, center: Vec3, half: Vec3) -> ColliderHandle {
        self.world
            .create_collider(
                ColliderDesc::new(ColliderShape::cuboid(half.x, half.y, half.z))
                    .with_offset(center.x, center.y, center.z),
            )
            .unwrap()
    }

    fn volume(&mut self, center: Vec3, half: Vec3) -> ColliderHandle {
        self.world
            .create_collider(
                ColliderDesc::sensor(ColliderShape::cuboid(half.x, half.y, half.z))
                    .with_offset(center.x, center.y, center.z),
            )
            .unwrap()
    }

    fn frame(&mut self) -> FrameStats {
        self.cameras.track_volumes(&mut self.world);
        self.cameras.update(DT, &self.world, &self.transforms)
    }

    fn run(&mut self, seconds: f32) {
        let frames = (seconds / DT).round() as usize;
        for _ in 0..frames {
            self.frame();
        }
    }

    fn rig(&self) -> &CameraRig<ColliderHandle> {
        self.cameras.rig(self.rig).unwrap()
    }

    fn move_player(&mut self, position: Vec3) {
        self.transforms.set_position(PLAYER, position);
    }
}

#[test]
fn test_converges_behind_unobstructed_target() {
    let mut h = Harness::following(Vec3::new(3.0, 2.0, -20.0), Vec3::ZERO);

    for _ in 0..600 {
        h.frame();
        assert_eq!(h.rig().position().y, 2.0);
    }

    let position = h.rig().position();
    assert_relative_eq!(position.x, 0.0, epsilon = 1e-3);
    assert_relative_eq!(position.z, -5.0, epsilon = 1e-3);

    let forward = h.rig().transform().rotation * Vec3::Z;
    assert!(forward.abs_diff_eq(Vec3::Z, 1e-3));
    assert_eq!(h.rig().phase(), OcclusionPhase::Free);
}

#[test]
fn test_per_frame_changes_are_bounded() {
    let mut h = Harness::following(Vec3::new(8.0, 3.0, -12.0), Vec3::new(0.0, 0.0, 4.0));
    let t = interpolation_factor(DT, 4.0);

    for _ in 0..120 {
        let before = *h.rig().transform();
        h.frame();
        let after = *h.rig().transform();

        let look = look_rotation(before.position, Vec3::new(0.0, 0.0, 4.0), LookAxis::Yaw).unwrap();
        let turned = before.rotation.angle_between(after.rotation);
        assert!(turned <= t * before.rotation.angle_between(look) + 1e-3);

        let desired = h.rig().desired_position();
        let moved = before.position.distance(after.position);
        assert!(moved <= t * before.position.distance(desired) + 1e-4);
        assert_eq!(after.position.y, 3.0);
    }
}

#[test]
fn test_sampler_acquires_wall_and_clamps_depth() {
    let mut h = Harness::following(Vec3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 1.0, 0.0));
    let wall = h.wall(Vec3::new(0.0, 1.0, -3.0), Vec3::new(4.0, 2.0, 0.25));

    let stats = h.frame();
    assert_eq!(stats.sampled, 1);
    assert_eq!(h.rig().occluder(), Some(wall));
    assert_eq!(h.rig().phase(), OcclusionPhase::OccludedBySight);

    // Closest wall point to the player is z = -2.75, plus 0.3 clearance
    let step = h
        .cameras
        .rig_mut(h.rig)
        .unwrap()
        .update(DT, &h.world, &h.transforms)
        .unwrap();
    assert_relative_eq!(step.adjusted.z, -2.45, epsilon = 1e-4);
    assert_relative_eq!(step.desired.z, -5.0, epsilon = 1e-4);

    h.run(5.0);
    assert_relative_eq!(h.rig().position().z, -2.45, epsilon = 1e-3);
    assert_eq!(h.rig().position().y, 1.0);
    // Desired position is still behind the wall, so the sampler holds
    assert_eq!(h.rig().occluder(), Some(wall));
}

#[test]
fn test_released_once_sight_lines_clear() {
    let mut h = Harness::following(Vec3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 1.0, 0.0));
    let wall = h.wall(Vec3::new(0.0, 1.0, -3.0), Vec3::new(1.0, 2.0, 0.25));

    h.run(2.0);
    assert_eq!(h.rig().occluder(), Some(wall));

    // Step out from behind the narrow wall
    h.move_player(Vec3::new(10.0, 1.0, 0.0));
    h.run(0.25);
    assert_eq!(h.rig().occluder(), None);

    h.run(2.0);
    assert_eq!(h.rig().occluder(), None);
    assert_relative_eq!(h.rig().position().z, -5.0, epsilon = 1e-2);
}

#[test]
fn test_pose_updater_releases_when_outran() {
    let mut h = Harness::following(Vec3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 1.0, 0.0));
    let wall = h.wall(Vec3::new(0.0, 1.0, -3.0), Vec3::new(4.0, 2.0, 0.25));
    h.frame();
    assert_eq!(h.rig().occluder(), Some(wall));

    // Adjusted z = -2.45; the player is now 5.45 ahead of it
    h.move_player(Vec3::new(0.0, 1.0, 3.0));
    let step = h
        .cameras
        .rig_mut(h.rig)
        .unwrap()
        .update(DT, &h.world, &h.transforms)
        .unwrap();

    assert_eq!(step.released, Some(ReleaseReason::OutranOccluder));
    assert_eq!(h.rig().occluder(), None);
}

#[test]
fn test_volume_forces_occlusion_until_exit() {
    let mut h = Harness::following(Vec3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 1.0, 0.0));
    let volume = h.volume(Vec3::new(0.0, 1.0, -5.0), Vec3::new(3.0, 3.0, 2.0));

    h.frame();
    assert_eq!(h.rig().occluder(), Some(volume));
    assert!(h.rig().inside_trigger());
    assert_eq!(h.rig().phase(), OcclusionPhase::OccludedByTrigger);

    // Sight lines are clear the whole time; the sampler must not release
    for _ in 0..180 {
        h.frame();
        assert_eq!(h.rig().occluder(), Some(volume));
        assert!(h.rig().inside_trigger());
    }
    // Volume face nearest the player is z = -3
    assert_relative_eq!(h.rig().position().z, -2.7, epsilon = 1e-3);

    h.world.set_collider_position(volume, [50.0, 1.0, 50.0]).unwrap();
    h.cameras.track_volumes(&mut h.world);
    assert_eq!(h.rig().occluder(), None);
    assert!(!h.rig().inside_trigger());
}

#[test]
fn test_volume_clamp_holds_steady_for_static_player() {
    let config = FollowCameraConfig::new(PLAYER).with_wall_offset(0.45);
    let mut h = Harness::new(config, Vec3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 1.0, 0.0));
    let volume = h.volume(Vec3::new(0.0, 1.0, -5.0), Vec3::new(3.0, 3.0, 2.0));

    let mut phase = h.rig().phase();
    let mut transitions = 0;
    for _ in 0..600 {
        h.frame();
        if h.rig().phase() != phase {
            phase = h.rig().phase();
            transitions += 1;
        }
    }

    assert_eq!(transitions, 1);
    assert_eq!(h.rig().occluder(), Some(volume));
    assert_relative_eq!(h.rig().position().z, -2.55, epsilon = 1e-3);
}

#[test]
fn test_wall_offset_beyond_probe_is_rejected() {
    let config = FollowCameraConfig::new(PLAYER).with_wall_offset(0.6);
    let mut h = Harness::new(config, Vec3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 1.0, 0.0));
    h.volume(Vec3::new(0.0, 1.0, -5.0), Vec3::new(3.0, 3.0, 2.0));

    assert_eq!(h.rig().status(), RigStatus::Inert);
    h.run(1.0);
    assert_eq!(h.rig().phase(), OcclusionPhase::Free);
}

#[test]
fn test_volume_overrides_sight_occluder() {
    let mut h = Harness::following(Vec3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 1.0, 0.0));
    let wall = h.wall(Vec3::new(0.0, 1.0, -3.0), Vec3::new(4.0, 2.0, 0.25));
    h.frame();
    assert_eq!(h.rig().occluder(), Some(wall));

    let volume = h.volume(Vec3::new(0.0, 1.0, -5.0), Vec3::new(1.0, 1.0, 1.0));
    h.cameras.track_volumes(&mut h.world);
    assert_eq!(h.rig().occluder(), Some(volume));
    assert_eq!(
        h.rig().active_occluder().map(|o| o.source),
        Some(OccluderSource::Trigger)
    );

    // Exit clears regardless of the blocked line of sight
    h.world.remove_collider(volume).unwrap();
    h.cameras.track_volumes(&mut h.world);
    assert_eq!(h.rig().occluder(), None);
    assert!(!h.rig().inside_trigger());
}

#[test]
fn test_destroyed_wall_is_released() {
    let mut h = Harness::following(Vec3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 1.0, 0.0));
    let wall = h.wall(Vec3::new(0.0, 1.0, -3.0), Vec3::new(4.0, 2.0, 0.25));
    h.frame();
    assert_eq!(h.rig().occluder(), Some(wall));

    h.world.remove_collider(wall).unwrap();
    let step = h
        .cameras
        .rig_mut(h.rig)
        .unwrap()
        .update(DT, &h.world, &h.transforms)
        .unwrap();

    assert_eq!(step.released, Some(ReleaseReason::SurfaceGone));
    assert_eq!(h.rig().occluder(), None);
    assert_eq!(step.adjusted, step.desired);
}

#[test]
fn test_inert_rig_never_moves() {
    let start = Vec3::new(1.0, 2.0, 3.0);
    let mut h = Harness::new(FollowCameraConfig::default(), start, Vec3::ZERO);
    h.volume(start, Vec3::ONE);

    assert_eq!(h.rig().status(), RigStatus::Inert);
    assert_eq!(h.cameras.scheduler().task_count(), 0);

    for _ in 0..60 {
        let stats = h.frame();
        assert_eq!(stats, FrameStats::default());
    }
    assert_eq!(h.rig().position(), start);
    assert_eq!(h.rig().occluder(), None);
}

#[test]
fn test_dropping_rig_cancels_sampler() {
    let mut scheduler = Scheduler::new();
    let mut rig: CameraRig<ColliderHandle> =
        CameraRig::new(FollowCameraConfig::new(PLAYER), Transform::IDENTITY);
    rig.activate(&mut scheduler).unwrap();
    let task = rig.task_id().unwrap();
    assert!(scheduler.is_scheduled(task));

    drop(rig);
    assert!(!scheduler.is_scheduled(task));
    assert!(scheduler.advance(1.0).is_empty());
}

#[test]
fn test_despawn_cancels_sampler() {
    let mut h = Harness::following(Vec3::new(0.0, 1.0, -5.0), Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(h.cameras.scheduler().task_count(), 1);

    let rig = h.cameras.despawn(h.rig).unwrap();
    assert_eq!(rig.status(), RigStatus::Inactive);
    assert_eq!(h.cameras.scheduler().task_count(), 0);
    assert_eq!(h.cameras.rig_count(), 0);
}

#[test]
fn test_target_forward_depth_axis() {
    let config = FollowCameraConfig::new(PLAYER).with_depth_axis(DepthAxis::TargetForward);
    let mut h = Harness::new(config, Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
    h.transforms
        .set_rotation(PLAYER, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));

    h.run(10.0);
    // Player faces +X, so the camera trails along -X
    assert_relative_eq!(h.rig().position().x, -5.0, epsilon = 1e-3);
    assert_relative_eq!(h.rig().position().z, 0.0, epsilon = 1e-3);
}
