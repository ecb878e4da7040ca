//! Sensor volume events

use crate::collider::ColliderHandle;

/// Type of volume event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeEventKind {
    /// Observer point entered the sensor volume
    Entered,
    /// Observer point left the sensor volume, or the volume was removed
    Exited,
}

/// An observer crossing a sensor volume boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeEvent {
    /// Observer identifier supplied to `PhysicsWorld::track_observer`
    pub observer: u128,
    /// The sensor collider
    pub volume: ColliderHandle,
    /// Event type
    pub kind: VolumeEventKind,
}

impl VolumeEvent {
    /// Create an enter event
    pub fn entered(observer: u128, volume: ColliderHandle) -> Self {
        Self {
            observer,
            volume,
            kind: VolumeEventKind::Entered,
        }
    }

    /// Create an exit event
    pub fn exited(observer: u128, volume: ColliderHandle) -> Self {
        Self {
            observer,
            volume,
            kind: VolumeEventKind::Exited,
        }
    }

    /// Check if this is an enter event
    pub fn is_entered(&self) -> bool {
        self.kind == VolumeEventKind::Entered
    }

    /// Check if this is an exit event
    pub fn is_exited(&self) -> bool {
        self.kind == VolumeEventKind::Exited
    }
}

/// Collects volume events until drained by the host
#[derive(Debug, Default)]
pub struct EventCollector {
    /// Volume events since the last drain
    pub volume_events: Vec<VolumeEvent>,
}

impl EventCollector {
    /// Create a new event collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event
    pub fn push(&mut self, event: VolumeEvent) {
        log::trace!(
            "volume {:?} {:?} observer {:#x}",
            event.volume,
            event.kind,
            event.observer
        );
        self.volume_events.push(event);
    }

    /// Get volume exit events
    pub fn volume_exits(&self) -> impl Iterator<Item = &VolumeEvent> {
        self.volume_events.iter().filter(|e| e.is_exited())
    }

    /// Take all collected events, in the order they were produced
    pub fn drain(&mut self) -> Vec<VolumeEvent> {
        std::mem::take(&mut self.volume_events)
    }
}
