//! Periodic line-of-sight sampler
//!
//! Runs at a low fixed rate rather than per frame. A release needs two clear
//! sight lines: camera to target, then desired position to target, so an
//! occluder is not dropped while the camera is still easing out from behind it.

use crate::occlusion::{OcclusionState, ReleaseReason};
use crate::scene::OcclusionQuery;
use glam::Vec3;

/// What a sampler tick decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleOutcome {
    /// A new occluder was acquired from a blocked sight line
    Acquired,
    /// The current occluder was kept
    Held,
    /// The occluder was released after both sight lines came back clear
    Released,
    /// No occluder before or after
    Clear,
}

/// Run one sampler tick.
///
/// `camera` is the camera's current position, `desired` the unobstructed
/// placement from the last pose update. A failed query counts as no hit.
pub fn sample<Q: OcclusionQuery>(
    state: &mut OcclusionState<Q::Surface>,
    scene: &Q,
    camera: Vec3,
    desired: Vec3,
    target: Vec3,
) -> SampleOutcome {
    match scene.line_of_sight(camera, target) {
        Some(hit) => {
            if state.acquire_from_sight(hit.surface) {
                SampleOutcome::Acquired
            } else {
                SampleOutcome::Held
            }
        }
        None if state.inside_trigger() || state.occluder().is_none() => held(state),
        None => {
            if let Some(hit) = scene.line_of_sight(desired, target) {
                log::trace!("Desired position still blocked by {:?}", hit.surface);
                return SampleOutcome::Held;
            }
            if state.release(ReleaseReason::SightClear) {
                SampleOutcome::Released
            } else {
                held(state)
            }
        }
    }
}

fn held<S: Copy + Eq + std::fmt::Debug>(state: &OcclusionState<S>) -> SampleOutcome {
    if state.occluder().is_some() {
        SampleOutcome::Held
    } else {
        SampleOutcome::Clear
    }
}
