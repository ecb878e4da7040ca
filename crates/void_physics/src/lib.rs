//! Void Physics - Rapier 3D Collision Scene
//!
//! This crate provides the collision scene consumed by Void Engine cameras.
//! It wraps Rapier 3D colliders without rigid body dynamics: geometry is
//! placed, moved and removed by the host, and queried every frame.
//!
//! # Features
//!
//! - Static collision geometry (spheres, boxes, capsules)
//! - Sensor volumes with enter/exit tracking for observer points
//! - Segment (line of sight) and ray casting
//! - Closest point on a specific collider
//! - Collision layers and filtering
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 PhysicsWorld                     │
//! │  ┌─────────────┐  ┌───────────────┐ ┌─────────┐ │
//! │  │ ColliderSet │  │ QueryPipeline │ │Observers│ │
//! │  └─────────────┘  └───────────────┘ └─────────┘ │
//! └─────────────────────────────────────────────────┘
//!                        │
//!         ┌──────────────┼──────────────┐
//!         ▼              ▼              ▼
//!    ┌──────────┐   ┌──────────┐   ┌───────────┐
//!    │ Linecast │   │ Closest  │   │  Volume   │
//!    │   hits   │   │  point   │   │  events   │
//!    └──────────┘   └──────────┘   └───────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use void_physics::prelude::*;
//!
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default());
//!
//! // A wall and a camera-safe corridor volume
//! let wall = physics.create_collider(
//!     ColliderDesc::new(ColliderShape::cuboid(4.0, 2.0, 0.25)).with_offset(0.0, 1.0, -3.0),
//! )?;
//! physics.create_collider(
//!     ColliderDesc::sensor(ColliderShape::cuboid(1.5, 2.0, 6.0)).with_offset(0.0, 1.0, 10.0),
//! )?;
//! physics.sync_query_pipeline();
//!
//! let hit = physics.query().linecast([0.0, 1.0, -8.0], [0.0, 1.0, 0.0], &RaycastOptions::default());
//! assert_eq!(hit.map(|h| h.collider), Some(wall));
//! ```

pub mod collider;
pub mod config;
pub mod error;
pub mod events;
pub mod layers;
pub mod query;
pub mod world;

pub mod prelude {
    //! Common imports for collision scene functionality
    pub use crate::collider::{ColliderDesc, ColliderHandle, ColliderShape};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::events::{VolumeEvent, VolumeEventKind};
    pub use crate::layers::{CollisionGroups, CollisionLayer};
    pub use crate::query::{PhysicsQuery, RaycastHit, RaycastOptions};
    pub use crate::world::PhysicsWorld;
}

pub use prelude::*;
