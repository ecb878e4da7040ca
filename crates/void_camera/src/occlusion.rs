//! Shared occluder state
//!
//! The trigger listener and the occlusion sampler write this state, the pose
//! updater reads it. All access goes through `&mut self` on the owning rig, so
//! the three never run concurrently.
//!
//! ```text
//!            sampler hit                volume enter
//!   Free ───────────────► BySight ───────────────► ByTrigger
//!    ▲  ◄─────────────────   │                        │
//!    │   sight clear /       │ volume enter           │
//!    │   outran occluder     └────────────────────────┤
//!    └────────────────────────────────────────────────┘
//!                         volume exit
//! ```

use std::fmt;

/// Who set the current occluder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OccluderSource {
    /// Entering a designated camera volume
    Trigger,
    /// A blocked line-of-sight sample
    Sight,
}

/// The surface currently treated as blocking the camera's view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occluder<S> {
    /// Weak handle to the blocking surface
    pub surface: S,
    /// Who set it
    pub source: OccluderSource,
}

/// Observable occlusion phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OcclusionPhase {
    /// No occluder, normal following
    Free,
    /// Pulled in by a designated volume
    OccludedByTrigger,
    /// Pulled in by a blocked line of sight
    OccludedBySight,
}

/// Why an occluder was released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseReason {
    /// The designated volume was exited
    VolumeExit,
    /// Both line-of-sight samples were clear
    SightClear,
    /// The target moved more than the follow distance past the adjusted position
    OutranOccluder,
    /// The surface no longer exists
    SurfaceGone,
}

/// Occluder plus the inside-volume flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcclusionState<S> {
    occluder: Option<Occluder<S>>,
    inside_trigger: bool,
}

impl<S> Default for OcclusionState<S> {
    fn default() -> Self {
        Self {
            occluder: None,
            inside_trigger: false,
        }
    }
}

impl<S: Copy + Eq + fmt::Debug> OcclusionState<S> {
    /// Create a free state
    pub fn new() -> Self {
        Self::default()
    }

    /// The active occluder surface
    pub fn occluder(&self) -> Option<S> {
        self.occluder.map(|o| o.surface)
    }

    /// The active occluder with its source
    pub fn active(&self) -> Option<Occluder<S>> {
        self.occluder
    }

    /// Whether the rig is inside a designated volume
    pub fn inside_trigger(&self) -> bool {
        self.inside_trigger
    }

    /// Current phase
    pub fn phase(&self) -> OcclusionPhase {
        match self.occluder {
            None => OcclusionPhase::Free,
            Some(Occluder { source: OccluderSource::Trigger, .. }) => OcclusionPhase::OccludedByTrigger,
            Some(Occluder { source: OccluderSource::Sight, .. }) => OcclusionPhase::OccludedBySight,
        }
    }

    /// Acquire a surface found by a line-of-sight sample.
    ///
    /// Only takes effect when no occluder is active, so re-detecting the
    /// current surface (or a different one) leaves the state unchanged.
    pub fn acquire_from_sight(&mut self, surface: S) -> bool {
        if self.occluder.is_some() {
            return false;
        }
        log::debug!("Occluder acquired by line of sight: {:?}", surface);
        self.occluder = Some(Occluder {
            surface,
            source: OccluderSource::Sight,
        });
        true
    }

    /// A designated volume was entered. Always takes precedence.
    pub fn enter_volume(&mut self, volume: S) {
        log::debug!("Entered camera volume {:?} (replacing {:?})", volume, self.occluder());
        self.inside_trigger = true;
        self.occluder = Some(Occluder {
            surface: volume,
            source: OccluderSource::Trigger,
        });
    }

    /// A designated volume was exited. Clears the occluder unconditionally.
    pub fn exit_volume(&mut self, volume: S) {
        log::debug!(
            "Exited camera volume {:?}; releasing {:?} ({:?})",
            volume,
            self.occluder(),
            ReleaseReason::VolumeExit
        );
        self.inside_trigger = false;
        self.occluder = None;
    }

    /// Release the occluder for a sampler or pose-updater decision.
    ///
    /// Refused while inside a designated volume: only a volume exit removes
    /// that occlusion. Returns `true` if an occluder was cleared.
    pub fn release(&mut self, reason: ReleaseReason) -> bool {
        if self.inside_trigger {
            return false;
        }
        match self.occluder.take() {
            Some(previous) => {
                log::debug!("Occluder {:?} released ({:?})", previous.surface, reason);
                true
            }
            None => false,
        }
    }

    /// The occluder surface no longer exists.
    ///
    /// A vanished volume cannot contain the rig any more, so a trigger-sourced
    /// occluder also clears the inside flag.
    pub fn invalidate(&mut self) {
        if let Some(previous) = self.occluder.take() {
            log::debug!(
                "Occluder {:?} released ({:?})",
                previous.surface,
                ReleaseReason::SurfaceGone
            );
            if previous.source == OccluderSource::Trigger {
                self.inside_trigger = false;
            }
        }
    }

    /// Return to the free state
    pub fn reset(&mut self) {
        self.occluder = None;
        self.inside_trigger = false;
    }
}
