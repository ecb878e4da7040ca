//! Camera system: owns rigs and the scheduler that drives their samplers

use crate::config::FollowCameraConfig;
use crate::error::{CameraError, Result};
use crate::rig::CameraRig;
use crate::scene::{OcclusionQuery, Transform, TransformSource};
use crate::schedule::Scheduler;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a rig inside a [`CameraSystem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RigId(pub u32);

impl RigId {
    /// Observer id used when tracking this rig's camera point in a collision scene
    pub fn as_observer(self) -> u128 {
        self.0 as u128
    }

    /// Inverse of [`as_observer`](Self::as_observer)
    pub fn from_observer(observer: u128) -> Option<Self> {
        u32::try_from(observer).ok().map(Self)
    }
}

/// Per-frame statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Rigs whose pose was updated
    pub posed: usize,
    /// Sampler ticks run
    pub sampled: usize,
}

/// Owns follow camera rigs and their scheduler
#[derive(Debug)]
pub struct CameraSystem<S> {
    scheduler: Scheduler,
    rigs: BTreeMap<RigId, CameraRig<S>>,
    /// Despawned rigs whose collision scene observers are not yet forgotten
    #[cfg(feature = "rapier")]
    despawned: Vec<RigId>,
    next_id: u32,
}

impl<S: Copy + Eq + fmt::Debug> CameraSystem<S> {
    /// Create an empty camera system
    pub fn new() -> Self {
        Self {
            scheduler: Scheduler::new(),
            rigs: BTreeMap::new(),
            #[cfg(feature = "rapier")]
            despawned: Vec::new(),
            next_id: 0,
        }
    }

    /// Create and activate a rig.
    ///
    /// A configuration error is logged and leaves the rig inert; the rig is
    /// still registered so the host can inspect it.
    pub fn spawn(&mut self, config: FollowCameraConfig, transform: Transform) -> RigId {
        let id = RigId(self.next_id);
        self.next_id += 1;

        let mut rig = CameraRig::new(config, transform);
        if rig.activate(&mut self.scheduler).is_err() {
            log::warn!("Camera rig {:?} spawned inert", id);
        }
        self.rigs.insert(id, rig);
        id
    }

    /// Deactivate and remove a rig.
    ///
    /// With the `rapier` feature, the rig's volume observer is forgotten on the
    /// next `track_volumes`.
    pub fn despawn(&mut self, id: RigId) -> Result<CameraRig<S>> {
        let mut rig = self.rigs.remove(&id).ok_or(CameraError::RigNotFound(id))?;
        rig.deactivate();
        #[cfg(feature = "rapier")]
        self.despawned.push(id);
        Ok(rig)
    }

    /// Take the rigs despawned since the last call
    #[cfg(feature = "rapier")]
    pub(crate) fn take_despawned(&mut self) -> Vec<RigId> {
        std::mem::take(&mut self.despawned)
    }

    /// Get a rig
    pub fn rig(&self, id: RigId) -> Option<&CameraRig<S>> {
        self.rigs.get(&id)
    }

    /// Get a mutable rig
    pub fn rig_mut(&mut self, id: RigId) -> Option<&mut CameraRig<S>> {
        self.rigs.get_mut(&id)
    }

    /// Iterate over all rigs
    pub fn rigs(&self) -> impl Iterator<Item = (RigId, &CameraRig<S>)> {
        self.rigs.iter().map(|(id, rig)| (*id, rig))
    }

    /// Number of rigs
    pub fn rig_count(&self) -> usize {
        self.rigs.len()
    }

    /// The scheduler driving sampler tasks
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Deliver a volume enter to a rig
    pub fn on_volume_enter(&mut self, id: RigId, volume: S) -> Result<()> {
        self.rigs
            .get_mut(&id)
            .ok_or(CameraError::RigNotFound(id))?
            .on_volume_enter(volume);
        Ok(())
    }

    /// Deliver a volume exit to a rig
    pub fn on_volume_exit(&mut self, id: RigId, volume: S) -> Result<()> {
        self.rigs
            .get_mut(&id)
            .ok_or(CameraError::RigNotFound(id))?
            .on_volume_exit(volume);
        Ok(())
    }

    /// Run one frame: pose updates for every rig, then due sampler ticks.
    pub fn update<Q, T>(&mut self, delta_time: f32, scene: &Q, transforms: &T) -> FrameStats
    where
        Q: OcclusionQuery<Surface = S>,
        T: TransformSource + ?Sized,
    {
        let mut stats = FrameStats::default();

        for rig in self.rigs.values_mut() {
            if rig.update(delta_time, scene, transforms).is_some() {
                stats.posed += 1;
            }
        }

        let fired = self.scheduler.advance(delta_time);
        if !fired.is_empty() {
            for rig in self.rigs.values_mut() {
                if rig.run_scheduled(&fired, scene, transforms).is_some() {
                    stats.sampled += 1;
                }
            }
        }

        stats
    }
}

impl<S: Copy + Eq + fmt::Debug> Default for CameraSystem<S> {
    fn default() -> Self {
        Self::new()
    }
}
