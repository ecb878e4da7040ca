//! Follow camera rig
//!
//! A rig owns its configuration, the camera transform, the shared occlusion
//! state and the registration of its sampler task. It exposes three entry
//! points that all mutate through `&mut self`:
//!
//! - [`CameraRig::update`]: pose updater, once per frame
//! - [`CameraRig::run_scheduled`]: sampler tick, when its task is due
//! - [`CameraRig::on_volume_enter`] / [`CameraRig::on_volume_exit`]: listener

use crate::config::FollowCameraConfig;
use crate::error::{CameraError, Result};
use crate::occlusion::{Occluder, OcclusionPhase, OcclusionState};
use crate::pose::{self, PoseStep};
use crate::sampler::{self, SampleOutcome};
use crate::scene::{EntityId, OcclusionQuery, TransformSource, Transform};
use crate::schedule::{Scheduler, TaskGuard, TaskId};
use glam::Vec3;
use std::fmt;

/// Frames between repeated missing-target warnings
const MISSING_TARGET_WARN_FRAMES: u32 = 300;

/// Lifecycle status of a rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RigStatus {
    /// Not yet activated, or deactivated
    Inactive,
    /// Following its target
    Active,
    /// Activation failed on a configuration error; every entry point no-ops
    Inert,
}

/// Third-person follow camera
#[derive(Debug)]
pub struct CameraRig<S> {
    config: FollowCameraConfig,
    transform: Transform,
    state: OcclusionState<S>,
    desired: Vec3,
    status: RigStatus,
    task: Option<TaskGuard>,
    missing_target_frames: u32,
}

impl<S: Copy + Eq + fmt::Debug> CameraRig<S> {
    /// Create an inactive rig with the camera at `transform`
    pub fn new(config: FollowCameraConfig, transform: Transform) -> Self {
        Self {
            config,
            desired: transform.position,
            transform,
            state: OcclusionState::new(),
            status: RigStatus::Inactive,
            task: None,
            missing_target_frames: 0,
        }
    }

    /// Validate the configuration and start the sampler task.
    ///
    /// On a configuration error the error is logged, the rig becomes inert and
    /// the error is returned. Nothing panics.
    pub fn activate(&mut self, scheduler: &mut Scheduler) -> Result<()> {
        if self.status == RigStatus::Active {
            return Err(CameraError::AlreadyActive);
        }

        let task = match self
            .config
            .validate()
            .and_then(|_| scheduler.every(self.config.sample_interval))
        {
            Ok(task) => task,
            Err(e) => {
                log::error!("Follow camera disabled: {}", e);
                self.status = RigStatus::Inert;
                return Err(e);
            }
        };

        log::info!(
            "Follow camera active: target {:?}, distance {}, sampling every {}s",
            self.config.target,
            self.config.distance,
            self.config.sample_interval
        );
        self.task = Some(task);
        self.status = RigStatus::Active;
        self.missing_target_frames = 0;
        Ok(())
    }

    /// Stop the sampler task and forget any occluder
    pub fn deactivate(&mut self) {
        if self.status == RigStatus::Active {
            log::info!("Follow camera deactivated (target {:?})", self.config.target);
        }
        self.task = None;
        self.state.reset();
        self.status = RigStatus::Inactive;
    }

    /// Per-frame pose update.
    ///
    /// Returns `None` when the rig is not active or the target transform
    /// cannot be resolved this frame.
    pub fn update<Q, T>(&mut self, delta_time: f32, scene: &Q, transforms: &T) -> Option<PoseStep>
    where
        Q: OcclusionQuery<Surface = S>,
        T: TransformSource + ?Sized,
    {
        let target = self.active_target()?;
        let Some(target_position) = transforms.world_position(target) else {
            self.warn_missing_target(target);
            return None;
        };
        self.missing_target_frames = 0;

        let step = pose::update_pose(
            &mut self.transform,
            &mut self.state,
            scene,
            &self.config,
            target_position,
            transforms.world_rotation(target),
            delta_time,
        );
        self.desired = step.desired;
        Some(step)
    }

    /// Run one sampler tick now, regardless of the schedule
    pub fn sample_occlusion<Q, T>(&mut self, scene: &Q, transforms: &T) -> Option<SampleOutcome>
    where
        Q: OcclusionQuery<Surface = S>,
        T: TransformSource + ?Sized,
    {
        let target = self.active_target()?;
        let target_position = transforms.world_position(target)?;

        let outcome = sampler::sample(
            &mut self.state,
            scene,
            self.transform.position,
            self.desired,
            target_position,
        );
        log::trace!("Occlusion sample: {:?}", outcome);
        Some(outcome)
    }

    /// Run the sampler if this rig's task is among `fired`
    pub fn run_scheduled<Q, T>(&mut self, fired: &[TaskId], scene: &Q, transforms: &T) -> Option<SampleOutcome>
    where
        Q: OcclusionQuery<Surface = S>,
        T: TransformSource + ?Sized,
    {
        let id = self.task_id()?;
        if fired.contains(&id) {
            self.sample_occlusion(scene, transforms)
        } else {
            None
        }
    }

    /// The camera entered a designated volume
    pub fn on_volume_enter(&mut self, volume: S) {
        if self.status != RigStatus::Active {
            log::trace!("Ignoring volume enter {:?} on {:?} rig", volume, self.status);
            return;
        }
        self.state.enter_volume(volume);
    }

    /// The camera left a designated volume
    pub fn on_volume_exit(&mut self, volume: S) {
        if self.status != RigStatus::Active {
            log::trace!("Ignoring volume exit {:?} on {:?} rig", volume, self.status);
            return;
        }
        self.state.exit_volume(volume);
    }

    // ==================== Accessors ====================

    /// Camera transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Camera position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Configuration
    pub fn config(&self) -> &FollowCameraConfig {
        &self.config
    }

    /// Lifecycle status
    pub fn status(&self) -> RigStatus {
        self.status
    }

    /// Whether the rig is following its target
    pub fn is_active(&self) -> bool {
        self.status == RigStatus::Active
    }

    /// Active occluder surface
    pub fn occluder(&self) -> Option<S> {
        self.state.occluder()
    }

    /// Active occluder with its source
    pub fn active_occluder(&self) -> Option<Occluder<S>> {
        self.state.active()
    }

    /// Whether the camera is inside a designated volume
    pub fn inside_trigger(&self) -> bool {
        self.state.inside_trigger()
    }

    /// Occlusion phase
    pub fn phase(&self) -> OcclusionPhase {
        self.state.phase()
    }

    /// Desired position from the last pose update
    pub fn desired_position(&self) -> Vec3 {
        self.desired
    }

    /// Sampler task id while active
    pub fn task_id(&self) -> Option<TaskId> {
        self.task.as_ref().map(TaskGuard::id)
    }

    fn active_target(&self) -> Option<EntityId> {
        if self.status == RigStatus::Active {
            self.config.target
        } else {
            None
        }
    }

    fn warn_missing_target(&mut self, target: EntityId) {
        if self.missing_target_frames % MISSING_TARGET_WARN_FRAMES == 0 {
            log::warn!(
                "Follow camera target {:?} has no transform; holding pose",
                target
            );
        }
        self.missing_target_frames = self.missing_target_frames.wrapping_add(1);
    }
}
