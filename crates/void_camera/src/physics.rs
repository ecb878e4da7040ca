//! Occlusion queries and volume events from the void_physics collision scene
//!
//! Surfaces are generational [`ColliderHandle`]s: a removed collider stops
//! resolving, so a stale occluder shows up as a failed closest-point query.
//! Every sensor collider in the scene counts as a designated camera volume.
//!
//! The query pipeline must be synced before queries see moved or new
//! colliders. [`CameraSystem::track_volumes`] syncs it as a side effect.

use crate::scene::{OcclusionQuery, SightHit};
use crate::system::{CameraSystem, RigId};
use glam::Vec3;
use void_physics::{ColliderHandle, CollisionGroups, PhysicsWorld, RaycastOptions, VolumeEvent};

impl OcclusionQuery for PhysicsWorld {
    type Surface = ColliderHandle;

    fn line_of_sight(&self, from: Vec3, to: Vec3) -> Option<SightHit<ColliderHandle>> {
        PhysicsOcclusion::new(self).line_of_sight(from, to)
    }

    fn closest_surface_point(&self, surface: ColliderHandle, toward: Vec3) -> Option<Vec3> {
        PhysicsOcclusion::new(self).closest_surface_point(surface, toward)
    }
}

/// Filtered view of a collision scene for line-of-sight tests
pub struct PhysicsOcclusion<'a> {
    world: &'a PhysicsWorld,
    options: RaycastOptions,
}

impl<'a> PhysicsOcclusion<'a> {
    /// Query every collider the world configuration allows
    pub fn new(world: &'a PhysicsWorld) -> Self {
        Self {
            world,
            options: world.default_raycast_options(),
        }
    }

    /// Only hit colliders passing this filter
    pub fn with_filter(mut self, filter: CollisionGroups) -> Self {
        self.options = self.options.with_filter(filter);
        self
    }

    /// Never report this collider (e.g. the target's own body)
    pub fn ignoring(mut self, collider: ColliderHandle) -> Self {
        self.options = self.options.exclude(collider);
        self
    }

    /// The underlying collision scene
    pub fn world(&self) -> &'a PhysicsWorld {
        self.world
    }
}

impl OcclusionQuery for PhysicsOcclusion<'_> {
    type Surface = ColliderHandle;

    fn line_of_sight(&self, from: Vec3, to: Vec3) -> Option<SightHit<ColliderHandle>> {
        self.world
            .query()
            .linecast(from.to_array(), to.to_array(), &self.options)
            .map(|hit| SightHit {
                surface: hit.collider,
                point: Vec3::from(hit.point),
            })
    }

    fn closest_surface_point(&self, surface: ColliderHandle, toward: Vec3) -> Option<Vec3> {
        match self.world.query().closest_point(surface, toward.to_array()) {
            Ok(point) => Some(Vec3::from(point)),
            Err(e) => {
                log::trace!("Closest point query failed: {}", e);
                None
            }
        }
    }
}

impl CameraSystem<ColliderHandle> {
    /// Track every active rig's camera body (a sphere of its probe radius)
    /// through the scene's sensor volumes and deliver the enter/exit events.
    ///
    /// Despawned rigs are forgotten without exit events. Returns events that
    /// did not belong to any rig.
    pub fn track_volumes(&mut self, world: &mut PhysicsWorld) -> Vec<VolumeEvent> {
        for id in self.take_despawned() {
            world.forget_observer(id.as_observer());
        }

        let observers: Vec<(RigId, bool, Vec3, f32)> = self
            .rigs()
            .map(|(id, rig)| (id, rig.is_active(), rig.position(), rig.config().probe_radius))
            .collect();

        for (id, active, position, radius) in observers {
            if active {
                world.track_observer_sphere(id.as_observer(), position.to_array(), radius);
            } else {
                world.forget_observer(id.as_observer());
            }
        }

        let events = world.drain_volume_events();
        self.dispatch_volume_events(&events)
    }

    /// Deliver volume events to the rigs they name.
    ///
    /// Returns events that did not belong to any rig.
    pub fn dispatch_volume_events(&mut self, events: &[VolumeEvent]) -> Vec<VolumeEvent> {
        let mut unhandled = Vec::new();

        for event in events {
            let delivered = match RigId::from_observer(event.observer) {
                Some(id) if event.is_entered() => self.on_volume_enter(id, event.volume).is_ok(),
                Some(id) => self.on_volume_exit(id, event.volume).is_ok(),
                None => false,
            };
            if !delivered {
                unhandled.push(*event);
            }
        }

        unhandled
    }
}
