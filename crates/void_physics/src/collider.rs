//! Collider types

use crate::error::{PhysicsError, Result};
use crate::layers::CollisionGroups;
use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Handle to a collider in the physics world.
///
/// Handles are generational: once the collider is removed the handle never
/// resolves again, even if the slot is reused by a new collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub(crate) rapier::ColliderHandle);

impl ColliderHandle {
    /// Get the raw Rapier handle
    pub fn raw(&self) -> rapier::ColliderHandle {
        self.0
    }
}

/// Collision shape type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Sphere with radius
    Sphere {
        radius: f32,
    },
    /// Box with half-extents
    Box {
        half_extents: [f32; 3],
    },
    /// Capsule aligned along Y axis
    CapsuleY {
        half_height: f32,
        radius: f32,
    },
}

impl Default for ColliderShape {
    fn default() -> Self {
        Self::Box {
            half_extents: [0.5, 0.5, 0.5],
        }
    }
}

impl ColliderShape {
    /// Create a sphere shape
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Create a box shape from half-extents
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Box {
            half_extents: [hx, hy, hz],
        }
    }

    /// Create a capsule shape (Y-aligned)
    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::CapsuleY { half_height, radius }
    }

    /// Build a Rapier shared shape.
    ///
    /// Every dimension must be finite; radii and half-extents must be
    /// positive (a capsule's half height may be zero).
    pub(crate) fn to_rapier(&self) -> Result<rapier::SharedShape> {
        let shape = match self {
            Self::Sphere { radius } => {
                positive("sphere radius", *radius)?;
                rapier::SharedShape::ball(*radius)
            }
            Self::Box { half_extents } => {
                for extent in half_extents {
                    positive("box half extent", *extent)?;
                }
                rapier::SharedShape::cuboid(half_extents[0], half_extents[1], half_extents[2])
            }
            Self::CapsuleY { half_height, radius } => {
                positive("capsule radius", *radius)?;
                if !half_height.is_finite() || *half_height < 0.0 {
                    return Err(PhysicsError::ShapeCreationFailed(format!(
                        "capsule half height must be non-negative, got {}",
                        half_height
                    )));
                }
                rapier::SharedShape::capsule_y(*half_height, *radius)
            }
        };
        Ok(shape)
    }
}

fn positive(what: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::ShapeCreationFailed(format!(
            "{} must be positive, got {}",
            what, value
        )))
    }
}

/// Description for creating a collider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderDesc {
    /// Collision shape
    pub shape: ColliderShape,
    /// World position
    pub position: [f32; 3],
    /// Is this a sensor/trigger volume (never blocks queries by default)
    pub is_sensor: bool,
    /// Collision groups
    pub collision_groups: CollisionGroups,
}

impl Default for ColliderDesc {
    fn default() -> Self {
        Self {
            shape: ColliderShape::default(),
            position: [0.0, 0.0, 0.0],
            is_sensor: false,
            collision_groups: CollisionGroups::ALL,
        }
    }
}

impl ColliderDesc {
    /// Create a new collider description with a shape
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            ..Default::default()
        }
    }

    /// Create a sensor (trigger volume)
    pub fn sensor(shape: ColliderShape) -> Self {
        Self {
            shape,
            is_sensor: true,
            ..Default::default()
        }
    }

    /// Set world position
    pub fn with_offset(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = [x, y, z];
        self
    }

    /// Set collision groups
    pub fn with_collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Build a Rapier collider builder
    pub(crate) fn to_rapier_builder(&self) -> Result<rapier::ColliderBuilder> {
        let [x, y, z] = self.position;
        let builder = rapier::ColliderBuilder::new(self.shape.to_rapier()?)
            .translation(rapier::Vector::new(x, y, z))
            .sensor(self.is_sensor)
            .collision_groups(self.collision_groups.to_rapier());

        Ok(builder)
    }
}
