//! Collision scene configuration

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};

/// Collision scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Include sensor colliders in line-of-sight queries by default
    pub queries_hit_sensors: bool,

    /// Segments shorter than this are treated as unobstructed
    pub min_query_length: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            queries_hit_sensors: false,
            min_query_length: 1.0e-4,
        }
    }
}

impl PhysicsConfig {
    /// Set whether queries hit sensors
    pub fn with_sensor_hits(mut self, hit_sensors: bool) -> Self {
        self.queries_hit_sensors = hit_sensors;
        self
    }

    /// Set the minimum query length
    pub fn with_min_query_length(mut self, length: f32) -> Self {
        self.min_query_length = length;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.min_query_length.is_finite() || self.min_query_length < 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "min_query_length must be a non-negative finite number, got {}",
                self.min_query_length
            )));
        }
        Ok(())
    }
}
