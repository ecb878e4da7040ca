//! Void Camera - Third-Person Follow Camera
//!
//! Keeps a camera trailing a target while avoiding walls between the two.
//!
//! # Features
//!
//! - Smoothed yaw-only look-at and positional follow
//! - Occlusion avoidance: the camera pulls in to just in front of a blocking surface
//! - Low-rate line-of-sight sampling with a double check before releasing
//! - Designated volumes that force occlusion while the camera is inside them
//! - Cancellable periodic tasks tied to the rig's lifetime
//!
//! # Architecture
//!
//! ```text
//!                 ┌────────────── CameraRig ──────────────┐
//!  frame dt ────► │ pose updater ──reads──┐               │ ──► Transform
//!                 │                       ▼               │
//!  volume events ►│ listener ──writes─► OcclusionState    │
//!                 │                       ▲               │
//!  scheduler tick►│ sampler ───writes─────┘               │
//!                 └───────────────────────────────────────┘
//!                          │ OcclusionQuery / TransformSource
//!                          ▼
//!                 host scene (void_physics::PhysicsWorld)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use void_camera::prelude::*;
//! use void_physics::{PhysicsWorld, ColliderHandle};
//!
//! let mut world = PhysicsWorld::default();
//! let mut transforms = TransformRegistry::new();
//! let player = EntityId(1);
//! transforms.insert(player, Transform::from_position(Vec3::new(0.0, 0.0, 10.0)));
//!
//! let mut cameras: CameraSystem<ColliderHandle> = CameraSystem::new();
//! let rig = cameras.spawn(
//!     FollowCameraConfig::new(player),
//!     Transform::from_position(Vec3::new(0.0, 2.0, 0.0)),
//! );
//!
//! // Each frame, after moving the player:
//! cameras.track_volumes(&mut world);
//! cameras.update(dt, &world, &transforms);
//! let pose = cameras.rig(rig).map(|r| *r.transform());
//! ```

pub mod config;
pub mod error;
pub mod occlusion;
#[cfg(feature = "rapier")]
pub mod physics;
pub mod pose;
pub mod rig;
pub mod sampler;
pub mod scene;
pub mod schedule;
pub mod system;

pub mod prelude {
    //! Common imports for follow camera functionality
    pub use crate::config::{DepthAxis, FollowCameraConfig, LookAxis};
    pub use crate::error::{CameraError, Result};
    pub use crate::occlusion::{Occluder, OccluderSource, OcclusionPhase, OcclusionState, ReleaseReason};
    #[cfg(feature = "rapier")]
    pub use crate::physics::PhysicsOcclusion;
    pub use crate::pose::PoseStep;
    pub use crate::rig::{CameraRig, RigStatus};
    pub use crate::sampler::SampleOutcome;
    pub use crate::scene::{EntityId, OcclusionQuery, SightHit, Transform, TransformRegistry, TransformSource};
    pub use crate::schedule::{Scheduler, TaskGuard, TaskId};
    pub use crate::system::{CameraSystem, FrameStats, RigId};
    pub use glam::{Quat, Vec3};
}

pub use prelude::*;
