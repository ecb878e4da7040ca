//! Follow camera configuration
//!
//! The configuration is supplied once at construction and validated when the
//! rig activates. It never changes while the rig runs.
//!
//! # Example Config File
//!
//! ```toml
//! target = 1
//! distance = 6.0
//! movement_speed = 4.0
//! rotation_speed = 4.0
//! wall_offset = 0.3
//! sample_interval = 0.1
//! probe_radius = 0.5
//! look_axis = "yaw"         # yaw, pitch
//! depth_axis = "world_z"    # world_z, target_forward
//! ```

use crate::error::{CameraError, Result};
use crate::scene::EntityId;
use serde::{Deserialize, Serialize};

/// Rotation axis kept from the look-at rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookAxis {
    /// Turn left/right toward the target; never tilt
    #[default]
    Yaw,
    /// Tilt up/down toward the target; never turn sideways
    Pitch,
}

/// Direction along which the camera trails the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthAxis {
    /// World +Z: the camera sits at `target.z - distance`
    #[default]
    WorldZ,
    /// The target's local forward, flattened onto the horizontal plane
    TargetForward,
}

/// Follow camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowCameraConfig {
    /// Entity the camera follows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<EntityId>,

    /// Follow distance behind the target along the depth axis
    pub distance: f32,

    /// Position interpolation rate (per second)
    pub movement_speed: f32,

    /// Rotation interpolation rate (per second)
    pub rotation_speed: f32,

    /// Clearance kept between the camera and an occluding surface
    pub wall_offset: f32,

    /// Seconds between line-of-sight samples
    pub sample_interval: f32,

    /// Radius of the camera body when testing overlap with designated volumes
    pub probe_radius: f32,

    /// Rotation axis kept from the look-at rotation
    pub look_axis: LookAxis,

    /// Direction along which the camera trails the target
    pub depth_axis: DepthAxis,
}

impl Default for FollowCameraConfig {
    fn default() -> Self {
        Self {
            target: None,
            distance: 5.0,
            movement_speed: 4.0,
            rotation_speed: 4.0,
            wall_offset: 0.3,
            sample_interval: 0.1,
            probe_radius: 0.5,
            look_axis: LookAxis::Yaw,
            depth_axis: DepthAxis::WorldZ,
        }
    }
}

impl FollowCameraConfig {
    /// Create a configuration following a target with default tuning
    pub fn new(target: EntityId) -> Self {
        Self {
            target: Some(target),
            ..Default::default()
        }
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Set the target
    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the follow distance
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    /// Set movement and rotation speeds
    pub fn with_speeds(mut self, movement: f32, rotation: f32) -> Self {
        self.movement_speed = movement;
        self.rotation_speed = rotation;
        self
    }

    /// Set the wall offset
    pub fn with_wall_offset(mut self, offset: f32) -> Self {
        self.wall_offset = offset;
        self
    }

    /// Set the sampling interval in seconds
    pub fn with_sample_interval(mut self, seconds: f32) -> Self {
        self.sample_interval = seconds;
        self
    }

    /// Set the volume probe radius
    pub fn with_probe_radius(mut self, radius: f32) -> Self {
        self.probe_radius = radius;
        self
    }

    /// Set the look axis
    pub fn with_look_axis(mut self, axis: LookAxis) -> Self {
        self.look_axis = axis;
        self
    }

    /// Set the depth axis
    pub fn with_depth_axis(mut self, axis: DepthAxis) -> Self {
        self.depth_axis = axis;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.target.is_none() {
            return Err(CameraError::MissingTarget);
        }

        non_negative("distance", self.distance)?;
        non_negative("movement_speed", self.movement_speed)?;
        non_negative("rotation_speed", self.rotation_speed)?;
        non_negative("probe_radius", self.probe_radius)?;

        if !self.wall_offset.is_finite() {
            return Err(CameraError::InvalidConfig(format!(
                "wall_offset must be finite, got {}",
                self.wall_offset
            )));
        }
        // A camera clamped outside a volume face must still overlap the volume
        if self.wall_offset >= self.probe_radius {
            return Err(CameraError::InvalidConfig(format!(
                "wall_offset ({}) must be smaller than probe_radius ({})",
                self.wall_offset, self.probe_radius
            )));
        }
        if !self.sample_interval.is_finite() || self.sample_interval <= 0.0 {
            return Err(CameraError::InvalidConfig(format!(
                "sample_interval must be a positive number of seconds, got {}",
                self.sample_interval
            )));
        }
        Ok(())
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CameraError::InvalidConfig(format!(
            "{} must be a non-negative finite number, got {}",
            name, value
        )))
    }
}
