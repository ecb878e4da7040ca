//! Host collaborator interfaces
//!
//! The camera never owns scene data. It reads the target's transform through
//! [`TransformSource`] and asks [`OcclusionQuery`] about blocking geometry.
//! Both return `Option` so a failed or inconclusive query is simply "nothing
//! there", never an error the camera has to handle.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a host entity (the follow target)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

/// Position and orientation in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World position
    pub position: Vec3,
    /// World rotation
    pub rotation: Quat,
}

impl Transform {
    /// Identity transform at the origin
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Transform at a position with no rotation
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Set rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Local +Z axis in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A surface blocking a line-of-sight segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SightHit<S> {
    /// The blocking surface
    pub surface: S,
    /// First intersection point along the segment
    pub point: Vec3,
}

/// Collision queries the camera consumes
pub trait OcclusionQuery {
    /// Weak handle to a collision surface. Must stop resolving once the
    /// surface is destroyed.
    type Surface: Copy + Eq + fmt::Debug;

    /// First surface intersecting the segment `from -> to`, if any.
    fn line_of_sight(&self, from: Vec3, to: Vec3) -> Option<SightHit<Self::Surface>>;

    /// Nearest point on `surface` to `toward`.
    ///
    /// Returns `None` when the surface no longer exists or the query fails.
    fn closest_surface_point(&self, surface: Self::Surface, toward: Vec3) -> Option<Vec3>;
}

/// Transform accessors for host entities
pub trait TransformSource {
    /// World position, or `None` if the entity is gone
    fn world_position(&self, entity: EntityId) -> Option<Vec3>;

    /// World rotation, or `None` if the entity is gone
    fn world_rotation(&self, entity: EntityId) -> Option<Quat>;
}

/// Plain entity-to-transform map for hosts without a scene graph
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    transforms: HashMap<EntityId, Transform>,
}

impl TransformRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entity's transform
    pub fn insert(&mut self, entity: EntityId, transform: Transform) {
        self.transforms.insert(entity, transform);
    }

    /// Move an entity. Returns `false` if it is not registered.
    pub fn set_position(&mut self, entity: EntityId, position: Vec3) -> bool {
        match self.transforms.get_mut(&entity) {
            Some(transform) => {
                transform.position = position;
                true
            }
            None => false,
        }
    }

    /// Rotate an entity. Returns `false` if it is not registered.
    pub fn set_rotation(&mut self, entity: EntityId, rotation: Quat) -> bool {
        match self.transforms.get_mut(&entity) {
            Some(transform) => {
                transform.rotation = rotation;
                true
            }
            None => false,
        }
    }

    /// Remove an entity
    pub fn remove(&mut self, entity: EntityId) -> Option<Transform> {
        self.transforms.remove(&entity)
    }

    /// Get an entity's transform
    pub fn get(&self, entity: EntityId) -> Option<&Transform> {
        self.transforms.get(&entity)
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl TransformSource for TransformRegistry {
    fn world_position(&self, entity: EntityId) -> Option<Vec3> {
        self.transforms.get(&entity).map(|t| t.position)
    }

    fn world_rotation(&self, entity: EntityId) -> Option<Quat> {
        self.transforms.get(&entity).map(|t| t.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let mut registry = TransformRegistry::new();
        let player = EntityId(1);
        registry.insert(player, Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));

        assert_eq!(registry.world_position(player), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(registry.world_rotation(player), Some(Quat::IDENTITY));
        assert!(registry.set_position(player, Vec3::ZERO));
        assert_eq!(registry.world_position(player), Some(Vec3::ZERO));

        registry.remove(player);
        assert!(registry.world_position(player).is_none());
        assert!(!registry.set_position(player, Vec3::ONE));
    }

    #[test]
    fn test_forward_axis() {
        let t = Transform::IDENTITY.with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        assert!(t.forward().abs_diff_eq(Vec3::X, 1e-6));
    }
}
