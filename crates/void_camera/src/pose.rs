//! Per-frame pose updater
//!
//! Computes where the camera wants to be and eases it there. The math is split
//! into small free functions so the occlusion correction and the release check
//! can be tested without a scene.

use crate::config::{DepthAxis, FollowCameraConfig, LookAxis};
use crate::occlusion::{OcclusionState, ReleaseReason};
use crate::scene::{OcclusionQuery, Transform};
use glam::{Quat, Vec3};

/// Below this the look direction is treated as degenerate
const MIN_LOOK_LENGTH: f32 = 1e-5;

/// Result of one pose update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseStep {
    /// Unobstructed placement behind the target
    pub desired: Vec3,
    /// Placement after the occluder correction
    pub adjusted: Vec3,
    /// Set when this frame released the occluder
    pub released: Option<ReleaseReason>,
}

/// Look-at rotation from `from` toward `to`, keeping only one axis.
///
/// Returns `None` when the direction is degenerate along the kept axis
/// (target straight above/below for yaw, coincident points for pitch).
pub fn look_rotation(from: Vec3, to: Vec3, axis: LookAxis) -> Option<Quat> {
    let dir = to - from;
    let horizontal = (dir.x * dir.x + dir.z * dir.z).sqrt();

    match axis {
        LookAxis::Yaw => {
            if horizontal < MIN_LOOK_LENGTH {
                return None;
            }
            Some(Quat::from_rotation_y(dir.x.atan2(dir.z)))
        }
        LookAxis::Pitch => {
            if dir.length() < MIN_LOOK_LENGTH {
                return None;
            }
            Some(Quat::from_rotation_x((-dir.y).atan2(horizontal)))
        }
    }
}

/// Horizontal unit direction the camera trails the target along
pub fn depth_axis(axis: DepthAxis, target_rotation: Option<Quat>) -> Vec3 {
    match (axis, target_rotation) {
        (DepthAxis::TargetForward, Some(rotation)) => {
            let forward = rotation * Vec3::Z;
            let flat = Vec3::new(forward.x, 0.0, forward.z);
            if flat.length() < MIN_LOOK_LENGTH {
                Vec3::Z
            } else {
                flat.normalize()
            }
        }
        _ => Vec3::Z,
    }
}

/// Placement `distance` behind the target along `depth`, at the camera's height
pub fn desired_position(target: Vec3, camera_y: f32, depth: Vec3, distance: f32) -> Vec3 {
    Vec3::new(
        target.x - depth.x * distance,
        camera_y,
        target.z - depth.z * distance,
    )
}

/// Replace the depth component of `desired` with the surface point's depth
/// plus `wall_offset`. Height is untouched since `depth` is horizontal.
pub fn clamp_to_surface(desired: Vec3, surface_point: Vec3, depth: Vec3, wall_offset: f32) -> Vec3 {
    let current = desired.dot(depth);
    let clamped = surface_point.dot(depth) + wall_offset;
    desired + depth * (clamped - current)
}

/// Whether the target is farther ahead of `adjusted` than the follow distance
pub fn outran(target: Vec3, adjusted: Vec3, depth: Vec3, distance: f32) -> bool {
    (target - adjusted).dot(depth) > distance
}

/// Interpolation factor for one frame, clamped to `[0, 1]`
pub fn interpolation_factor(dt: f32, speed: f32) -> f32 {
    let t = dt * speed;
    if t.is_finite() {
        t.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Run one pose update.
///
/// Reads the occluder, may release it (outran or surface gone), and moves
/// `camera` a bounded step toward the adjusted placement.
pub fn update_pose<Q: OcclusionQuery>(
    camera: &mut Transform,
    state: &mut OcclusionState<Q::Surface>,
    scene: &Q,
    config: &FollowCameraConfig,
    target: Vec3,
    target_rotation: Option<Quat>,
    dt: f32,
) -> PoseStep {
    if let Some(look) = look_rotation(camera.position, target, config.look_axis) {
        let t = interpolation_factor(dt, config.rotation_speed);
        camera.rotation = camera.rotation.slerp(look, t).normalize();
    }

    let depth = depth_axis(config.depth_axis, target_rotation);
    let desired = desired_position(target, camera.position.y, depth, config.distance);

    let mut released = None;
    let adjusted = match state.occluder() {
        Some(surface) => match scene.closest_surface_point(surface, target) {
            Some(point) => clamp_to_surface(desired, point, depth, config.wall_offset),
            None => {
                state.invalidate();
                released = Some(ReleaseReason::SurfaceGone);
                desired
            }
        },
        None => desired,
    };

    if state.occluder().is_some()
        && outran(target, adjusted, depth, config.distance)
        && state.release(ReleaseReason::OutranOccluder)
    {
        released = Some(ReleaseReason::OutranOccluder);
    }

    let height = camera.position.y;
    let t = interpolation_factor(dt, config.movement_speed);
    let mut position = camera.position.lerp(adjusted, t);
    position.y = height;
    camera.position = position;

    PoseStep {
        desired,
        adjusted,
        released,
    }
}
