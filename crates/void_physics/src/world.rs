//! Physics world - collision scene container

use crate::collider::{ColliderDesc, ColliderHandle};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::events::{EventCollector, VolumeEvent};
use crate::query::{PhysicsQuery, RaycastOptions};
use rapier3d::prelude as rapier;
use std::collections::HashMap;

/// The collision scene: colliders, sensor volumes and the query pipeline
pub struct PhysicsWorld {
    /// Configuration
    config: PhysicsConfig,

    /// Island manager (required by Rapier for collider removal)
    islands: rapier::IslandManager,

    /// Query pipeline
    query_pipeline: rapier::QueryPipeline,

    /// Rigid body set (colliders are parentless; kept empty)
    bodies: rapier::RigidBodySet,

    /// Collider set
    colliders: rapier::ColliderSet,

    /// Event collector
    events: EventCollector,

    /// Sensor volumes each observer was inside at its last tracked position
    observers: HashMap<u128, Vec<ColliderHandle>>,

    /// Colliders changed since the query pipeline was last updated
    dirty: bool,
}

impl PhysicsWorld {
    /// Create a new physics world
    pub fn new(config: PhysicsConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("{}; falling back to defaults", e);
                PhysicsConfig::default()
            }
        };

        Self {
            config,
            islands: rapier::IslandManager::new(),
            query_pipeline: rapier::QueryPipeline::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            events: EventCollector::new(),
            observers: HashMap::new(),
            dirty: false,
        }
    }

    /// Get the physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    // ==================== Colliders ====================

    /// Create a collider
    pub fn create_collider(&mut self, desc: ColliderDesc) -> Result<ColliderHandle> {
        let builder = desc.to_rapier_builder()?;
        let handle = ColliderHandle(self.colliders.insert(builder));
        self.dirty = true;

        log::debug!(
            "Created {} collider {:?} at {:?}",
            if desc.is_sensor { "sensor" } else { "solid" },
            handle,
            desc.position
        );
        Ok(handle)
    }

    /// Remove a collider.
    ///
    /// Observers inside a removed sensor receive an exit event.
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> Result<()> {
        self.colliders
            .remove(handle.0, &mut self.islands, &mut self.bodies, true)
            .ok_or(PhysicsError::ColliderNotFound(handle))?;
        self.dirty = true;

        for (observer, inside) in self.observers.iter_mut() {
            if let Some(index) = inside.iter().position(|h| *h == handle) {
                inside.remove(index);
                self.events.push(VolumeEvent::exited(*observer, handle));
            }
        }

        log::debug!("Removed collider {:?}", handle);
        Ok(())
    }

    /// Move a collider
    pub fn set_collider_position(&mut self, handle: ColliderHandle, position: [f32; 3]) -> Result<()> {
        let collider = self
            .colliders
            .get_mut(handle.0)
            .ok_or(PhysicsError::ColliderNotFound(handle))?;
        collider.set_translation(rapier::Vector::new(position[0], position[1], position[2]));
        self.dirty = true;
        Ok(())
    }

    /// Get a collider's world position
    pub fn collider_position(&self, handle: ColliderHandle) -> Result<[f32; 3]> {
        self.colliders
            .get(handle.0)
            .map(|c| {
                let t = c.translation();
                [t.x, t.y, t.z]
            })
            .ok_or(PhysicsError::ColliderNotFound(handle))
    }

    /// Check whether a collider still exists
    pub fn contains_collider(&self, handle: ColliderHandle) -> bool {
        self.colliders.contains(handle.0)
    }

    /// Get number of colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    // ==================== Sensor Volumes ====================

    /// Update an observer point and record enter/exit events for the sensor
    /// volumes it crossed since its last update.
    ///
    /// Exits are recorded before enters, so an observer moving between two
    /// adjoining volumes ends up inside the second one.
    pub fn track_observer(&mut self, observer: u128, point: [f32; 3]) {
        self.track_observer_sphere(observer, point, 0.0);
    }

    /// Like [`track_observer`](Self::track_observer), for an observer with a
    /// spherical extent: touching a volume counts as being inside it.
    pub fn track_observer_sphere(&mut self, observer: u128, center: [f32; 3], radius: f32) {
        self.sync_query_pipeline();

        let current = self.query().volumes_overlapping_sphere(center, radius);
        let previous = self.observers.remove(&observer).unwrap_or_default();

        for handle in previous.iter().filter(|h| !current.contains(h)) {
            self.events.push(VolumeEvent::exited(observer, *handle));
        }
        for handle in current.iter().filter(|h| !previous.contains(h)) {
            self.events.push(VolumeEvent::entered(observer, *handle));
        }

        self.observers.insert(observer, current);
    }

    /// Stop tracking an observer without emitting exit events
    pub fn forget_observer(&mut self, observer: u128) {
        self.observers.remove(&observer);
    }

    /// Sensor volumes the observer was inside at its last tracked position
    pub fn observer_volumes(&self, observer: u128) -> &[ColliderHandle] {
        self.observers.get(&observer).map(Vec::as_slice).unwrap_or(&[])
    }

    // ==================== Queries ====================

    /// Sync the query pipeline with current colliders.
    /// Call this after adding, moving or removing colliders and before querying.
    pub fn sync_query_pipeline(&mut self) {
        if self.dirty {
            self.query_pipeline.update(&self.colliders);
            self.dirty = false;
        }
    }

    /// Whether colliders changed since the last pipeline sync
    pub fn needs_sync(&self) -> bool {
        self.dirty
    }

    /// Get a query interface for raycasting and point queries
    pub fn query(&self) -> PhysicsQuery<'_> {
        PhysicsQuery {
            query_pipeline: &self.query_pipeline,
            colliders: &self.colliders,
            bodies: &self.bodies,
            min_query_length: self.config.min_query_length,
        }
    }

    /// Raycast options derived from the world configuration
    pub fn default_raycast_options(&self) -> RaycastOptions {
        RaycastOptions::default().with_sensors(self.config.queries_hit_sensors)
    }

    // ==================== Events ====================

    /// Get volume events recorded since the last drain
    pub fn volume_events(&self) -> &[VolumeEvent] {
        &self.events.volume_events
    }

    /// Get volume exit events
    pub fn volume_exits(&self) -> impl Iterator<Item = &VolumeEvent> {
        self.events.volume_exits()
    }

    /// Take all recorded volume events
    pub fn drain_volume_events(&mut self) -> Vec<VolumeEvent> {
        self.events.drain()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::ColliderShape;
    use crate::events::VolumeEventKind;
    use approx::assert_relative_eq;

    fn wall_world() -> (PhysicsWorld, ColliderHandle) {
        let mut world = PhysicsWorld::new(PhysicsConfig::default());
        let wall = world
            .create_collider(
                ColliderDesc::new(ColliderShape::cuboid(5.0, 2.0, 0.5)).with_offset(0.0, 1.0, 0.0),
            )
            .unwrap();
        world.sync_query_pipeline();
        (world, wall)
    }

    #[test]
    fn test_create_world() {
        let world = PhysicsWorld::new(PhysicsConfig::default());
        assert_eq!(world.collider_count(), 0);
        assert!(!world.needs_sync());
    }

    #[test]
    fn test_linecast_hits_wall() {
        let (world, wall) = wall_world();

        let hit = world
            .query()
            .linecast([0.0, 1.0, -5.0], [0.0, 1.0, 5.0], &RaycastOptions::default())
            .expect("segment crosses the wall");

        assert_eq!(hit.collider, wall);
        assert_relative_eq!(hit.point[2], -0.5, epsilon = 1e-4);
        assert_relative_eq!(hit.distance, 4.5, epsilon = 1e-4);
    }

    #[test]
    fn test_linecast_stops_at_segment_end() {
        let (world, _) = wall_world();

        // Ends before reaching the wall face at z = -0.5
        let hit = world
            .query()
            .linecast([0.0, 1.0, -5.0], [0.0, 1.0, -1.0], &RaycastOptions::default());
        assert!(hit.is_none());
    }

    #[test]
    fn test_linecast_respects_exclusions() {
        let (world, wall) = wall_world();

        let options = RaycastOptions::default().exclude(wall);
        let hit = world.query().linecast([0.0, 1.0, -5.0], [0.0, 1.0, 5.0], &options);
        assert!(hit.is_none());
    }

    #[test]
    fn test_linecast_ignores_sensors_by_default() {
        let mut world = PhysicsWorld::default();
        let volume = world
            .create_collider(ColliderDesc::sensor(ColliderShape::cuboid(2.0, 2.0, 2.0)))
            .unwrap();
        world.sync_query_pipeline();

        let from = [0.0, 0.0, -5.0];
        let to = [0.0, 0.0, 5.0];
        assert!(world.query().linecast(from, to, &world.default_raycast_options()).is_none());

        let with_sensors = RaycastOptions::default().with_sensors(true);
        let hit = world.query().linecast(from, to, &with_sensors);
        assert_eq!(hit.map(|h| h.collider), Some(volume));
    }

    #[test]
    fn test_closest_point_on_wall() {
        let (world, wall) = wall_world();

        let p = world.query().closest_point(wall, [1.0, 1.0, 4.0]).unwrap();
        assert_relative_eq!(p[0], 1.0, epsilon = 1e-4);
        assert_relative_eq!(p[2], 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_closest_point_after_removal_fails() {
        let (mut world, wall) = wall_world();
        world.remove_collider(wall).unwrap();
        world.sync_query_pipeline();

        assert!(!world.contains_collider(wall));
        assert!(matches!(
            world.query().closest_point(wall, [0.0, 0.0, 0.0]),
            Err(PhysicsError::ColliderNotFound(_))
        ));
    }

    #[test]
    fn test_observer_enter_and_exit() {
        let mut world = PhysicsWorld::default();
        let volume = world
            .create_collider(
                ColliderDesc::sensor(ColliderShape::cuboid(1.0, 1.0, 1.0)).with_offset(0.0, 0.0, 10.0),
            )
            .unwrap();

        world.track_observer(7, [0.0, 0.0, 0.0]);
        assert!(world.drain_volume_events().is_empty());

        world.track_observer(7, [0.0, 0.0, 10.0]);
        let events = world.drain_volume_events();
        assert_eq!(events, vec![VolumeEvent::entered(7, volume)]);
        assert_eq!(world.observer_volumes(7), &[volume]);

        // Staying inside produces nothing
        world.track_observer(7, [0.0, 0.0, 10.5]);
        assert!(world.drain_volume_events().is_empty());

        world.track_observer(7, [0.0, 0.0, 20.0]);
        let events = world.drain_volume_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, VolumeEventKind::Exited);
        assert!(world.observer_volumes(7).is_empty());
    }

    #[test]
    fn test_removing_volume_exits_observer() {
        let mut world = PhysicsWorld::default();
        let volume = world
            .create_collider(ColliderDesc::sensor(ColliderShape::sphere(2.0)))
            .unwrap();

        world.track_observer(1, [0.0, 0.0, 0.0]);
        world.drain_volume_events();

        world.remove_collider(volume).unwrap();
        let exits: Vec<_> = world.volume_exits().copied().collect();
        assert_eq!(exits, vec![VolumeEvent::exited(1, volume)]);
    }

    #[test]
    fn test_sphere_observer_touches_volume() {
        let mut world = PhysicsWorld::default();
        let volume = world
            .create_collider(
                ColliderDesc::sensor(ColliderShape::cuboid(1.0, 1.0, 1.0)).with_offset(0.0, 0.0, 10.0),
            )
            .unwrap();

        // Centre 0.4 outside the face, radius 0.5 reaches in
        world.track_observer_sphere(2, [0.0, 0.0, 8.6], 0.5);
        assert_eq!(world.drain_volume_events(), vec![VolumeEvent::entered(2, volume)]);

        world.track_observer_sphere(2, [0.0, 0.0, 8.0], 0.5);
        assert_eq!(world.drain_volume_events(), vec![VolumeEvent::exited(2, volume)]);
    }

    #[test]
    fn test_solid_colliders_are_not_volumes() {
        let (mut world, _) = wall_world();
        world.track_observer(3, [0.0, 1.0, 0.0]);
        assert!(world.volume_events().is_empty());
    }

    #[test]
    fn test_move_collider() {
        let (mut world, wall) = wall_world();
        world.set_collider_position(wall, [0.0, 1.0, 20.0]).unwrap();
        assert!(world.needs_sync());
        world.sync_query_pipeline();

        assert_eq!(world.collider_position(wall).unwrap(), [0.0, 1.0, 20.0]);
        let hit = world
            .query()
            .linecast([0.0, 1.0, -5.0], [0.0, 1.0, 5.0], &RaycastOptions::default());
        assert!(hit.is_none());
    }
}
