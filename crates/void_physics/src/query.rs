//! Physics queries (raycasting, line of sight, closest point)

use crate::collider::ColliderHandle;
use crate::error::{PhysicsError, Result};
use crate::layers::CollisionGroups;
use rapier3d::parry::shape::Ball;
use rapier3d::prelude as rapier;

/// Result of a raycast query
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// Hit point in world space
    pub point: [f32; 3],
    /// Distance from ray origin
    pub distance: f32,
}

/// Options for raycast queries
#[derive(Debug, Clone)]
pub struct RaycastOptions {
    /// Maximum distance for the ray
    pub max_distance: f32,
    /// Only hit solid colliders (not sensors)
    pub solid_only: bool,
    /// Collision groups filter
    pub filter: CollisionGroups,
    /// Colliders to exclude
    pub exclude: Vec<ColliderHandle>,
}

impl Default for RaycastOptions {
    fn default() -> Self {
        Self {
            max_distance: f32::MAX,
            solid_only: true,
            filter: CollisionGroups::ALL,
            exclude: Vec::new(),
        }
    }
}

impl RaycastOptions {
    /// Set whether to hit sensors
    pub fn with_sensors(mut self, include_sensors: bool) -> Self {
        self.solid_only = !include_sensors;
        self
    }

    /// Set collision filter
    pub fn with_filter(mut self, filter: CollisionGroups) -> Self {
        self.filter = filter;
        self
    }

    /// Add a collider to exclude
    pub fn exclude(mut self, collider: ColliderHandle) -> Self {
        self.exclude.push(collider);
        self
    }
}

/// Query interface for the physics world
pub struct PhysicsQuery<'a> {
    pub(crate) query_pipeline: &'a rapier::QueryPipeline,
    pub(crate) colliders: &'a rapier::ColliderSet,
    pub(crate) bodies: &'a rapier::RigidBodySet,
    pub(crate) min_query_length: f32,
}

impl<'a> PhysicsQuery<'a> {
    /// Cast a ray and get the first hit
    pub fn raycast(
        &self,
        origin: [f32; 3],
        direction: [f32; 3],
        options: &RaycastOptions,
    ) -> Option<RaycastHit> {
        let dir = rapier::Vector::new(direction[0], direction[1], direction[2]);
        let length = dir.norm();
        if length <= f32::EPSILON {
            return None;
        }

        let ray = rapier::Ray::new(
            rapier::Point::new(origin[0], origin[1], origin[2]),
            dir / length,
        );

        let not_excluded = |handle: rapier::ColliderHandle, _: &rapier::Collider| {
            !options.exclude.iter().any(|excluded| excluded.0 == handle)
        };

        let mut filter = rapier::QueryFilter::new()
            .groups(options.filter.to_rapier())
            .predicate(&not_excluded);

        if options.solid_only {
            filter = filter.exclude_sensors();
        }

        let (handle, distance) = self.query_pipeline.cast_ray(
            self.bodies,
            self.colliders,
            &ray,
            options.max_distance,
            true,
            filter,
        )?;

        let point = ray.point_at(distance);

        Some(RaycastHit {
            collider: ColliderHandle(handle),
            point: [point.x, point.y, point.z],
            distance,
        })
    }

    /// Test the segment between two points and return the hit closest to `from`.
    ///
    /// Segments shorter than the configured minimum query length never hit.
    pub fn linecast(
        &self,
        from: [f32; 3],
        to: [f32; 3],
        options: &RaycastOptions,
    ) -> Option<RaycastHit> {
        let delta = [to[0] - from[0], to[1] - from[1], to[2] - from[2]];
        let length = (delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2]).sqrt();
        if !length.is_finite() || length < self.min_query_length {
            return None;
        }

        let options = RaycastOptions {
            max_distance: length.min(options.max_distance),
            ..options.clone()
        };
        self.raycast(from, delta, &options)
    }

    /// Nearest point on a collider's surface (or interior) to a world point.
    ///
    /// A point inside a solid collider is its own closest point.
    pub fn closest_point(&self, collider: ColliderHandle, point: [f32; 3]) -> Result<[f32; 3]> {
        let target = self
            .colliders
            .get(collider.0)
            .ok_or(PhysicsError::ColliderNotFound(collider))?;

        let projection = target.shape().project_point(
            target.position(),
            &rapier::Point::new(point[0], point[1], point[2]),
            true,
        );

        let p = projection.point;
        Ok([p.x, p.y, p.z])
    }

    /// All sensor volumes containing a point
    pub fn volumes_containing(&self, point: [f32; 3]) -> Vec<ColliderHandle> {
        let point = rapier::Point::new(point[0], point[1], point[2]);
        let filter = rapier::QueryFilter::new().exclude_solids();

        let mut volumes = Vec::new();
        self.query_pipeline.intersections_with_point(
            self.bodies,
            self.colliders,
            &point,
            filter,
            |handle| {
                volumes.push(ColliderHandle(handle));
                true // Continue
            },
        );
        volumes
    }

    /// All sensor volumes overlapping a sphere.
    ///
    /// A non-positive radius falls back to [`volumes_containing`](Self::volumes_containing).
    pub fn volumes_overlapping_sphere(&self, center: [f32; 3], radius: f32) -> Vec<ColliderHandle> {
        if radius.is_nan() || radius <= 0.0 {
            return self.volumes_containing(center);
        }

        let position = rapier::Isometry::translation(center[0], center[1], center[2]);
        let ball = Ball::new(radius);
        let filter = rapier::QueryFilter::new().exclude_solids();

        let mut volumes = Vec::new();
        self.query_pipeline.intersections_with_shape(
            self.bodies,
            self.colliders,
            &position,
            &ball,
            filter,
            |handle| {
                volumes.push(ColliderHandle(handle));
                true // Continue
            },
        );
        volumes
    }
}
