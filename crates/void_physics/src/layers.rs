//! Collision layers and filtering

use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// A collision layer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// Default layer (collides with everything)
    pub const DEFAULT: Self = Self(0);
    /// Player layer
    pub const PLAYER: Self = Self(1);
    /// Trigger/sensor layer
    pub const TRIGGERS: Self = Self(4);
    /// Static environment layer
    pub const ENVIRONMENT: Self = Self(5);
    /// Geometry that is see-through for cameras (foliage, glass)
    pub const CAMERA_TRANSPARENT: Self = Self(7);

    /// Create a custom layer
    pub const fn custom(id: u32) -> Self {
        Self(id)
    }

    /// Get the layer as a bitmask
    pub fn as_mask(&self) -> u32 {
        1 << self.0
    }
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Collision groups for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionGroups {
    /// Which groups this object belongs to (membership)
    pub memberships: u32,
    /// Which groups this object can collide with (filter)
    pub filter: u32,
}

impl CollisionGroups {
    /// Create collision groups that collide with everything
    pub const ALL: Self = Self {
        memberships: u32::MAX,
        filter: u32::MAX,
    };

    /// Create collision groups that collide with nothing
    pub const NONE: Self = Self {
        memberships: 0,
        filter: 0,
    };

    /// Create new collision groups
    pub fn new(memberships: u32, filter: u32) -> Self {
        Self { memberships, filter }
    }

    /// Create from a single layer that collides with specific layers
    pub fn from_layer(layer: CollisionLayer, collides_with: &[CollisionLayer]) -> Self {
        let memberships = layer.as_mask();
        let filter = collides_with.iter().fold(0u32, |acc, l| acc | l.as_mask());
        Self { memberships, filter }
    }

    /// Check if two groups can collide
    pub fn can_collide(&self, other: &CollisionGroups) -> bool {
        (self.memberships & other.filter) != 0 && (other.memberships & self.filter) != 0
    }

    /// Remove a layer from filter
    pub fn remove_filter(mut self, layer: CollisionLayer) -> Self {
        self.filter &= !layer.as_mask();
        self
    }

    /// Convert to Rapier interaction groups
    pub(crate) fn to_rapier(self) -> rapier::InteractionGroups {
        rapier::InteractionGroups::new(
            rapier::Group::from_bits_truncate(self.memberships),
            rapier::Group::from_bits_truncate(self.filter),
        )
    }
}

impl Default for CollisionGroups {
    fn default() -> Self {
        Self::ALL
    }
}
