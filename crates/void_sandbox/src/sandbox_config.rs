//! Sandbox Configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `VOID_CAMERA_DISTANCE=7.5`
//! 2. Config file: `sandbox.toml` or `config/sandbox.toml`
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! duration = 15.0
//! delta_time = 0.016666
//! player_speed = 3.0
//! log_every = 30
//! gate_lifetime = 12.0
//!
//! [camera]
//! distance = 5.0
//! wall_offset = 0.3
//! look_axis = "yaw"
//!
//! [physics]
//! queries_hit_sensors = false
//! ```

use serde::{Deserialize, Serialize};
use void_camera::{FollowCameraConfig, LookAxis};
use void_physics::PhysicsConfig;

/// Complete sandbox configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Simulated seconds to run
    pub duration: f32,
    /// Fixed frame time
    pub delta_time: f32,
    /// Player walking speed along the corridor (units per second)
    pub player_speed: f32,
    /// Frames between pose log lines
    pub log_every: u32,
    /// Seconds until the corridor gate volume is removed
    pub gate_lifetime: f32,
    /// Follow camera tuning (the target is assigned by the sandbox)
    pub camera: FollowCameraConfig,
    /// Collision scene configuration
    pub physics: PhysicsConfig,
    /// Config file path
    #[serde(skip)]
    pub config_path: Option<String>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            duration: 15.0,
            delta_time: 1.0 / 60.0,
            player_speed: 3.0,
            log_every: 30,
            gate_lifetime: 12.0,
            camera: FollowCameraConfig::default(),
            physics: PhysicsConfig::default(),
            config_path: None,
        }
    }
}

impl SandboxConfig {
    /// Load configuration from all sources
    pub fn load() -> Self {
        let mut config = Self::default();

        for path in &["sandbox.toml", "config/sandbox.toml"] {
            match Self::load_from_file(path) {
                Ok(loaded) => {
                    config = loaded;
                    config.config_path = Some(path.to_string());
                    log::info!("Loaded sandbox config from {}", path);
                    break;
                }
                Err(e) if std::path::Path::new(path).exists() => {
                    log::warn!("Ignoring {}: {}", path, e);
                }
                Err(_) => {}
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Load configuration from a TOML file
    fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Apply `VOID_CAMERA_*` overrides from a variable lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let number = |key: &str| -> Option<f32> {
            let value = lookup(key)?;
            match value.trim().parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    log::warn!("Ignoring {}={:?}: not a number", key, value);
                    None
                }
            }
        };

        if let Some(v) = number("VOID_CAMERA_DISTANCE") {
            self.camera.distance = v;
        }
        if let Some(v) = number("VOID_CAMERA_WALL_OFFSET") {
            self.camera.wall_offset = v;
        }
        if let Some(v) = number("VOID_CAMERA_SAMPLE_INTERVAL") {
            self.camera.sample_interval = v;
        }
        if let Some(v) = number("VOID_CAMERA_DURATION") {
            self.duration = v;
        }
        if let Some(v) = number("VOID_CAMERA_PLAYER_SPEED") {
            self.player_speed = v;
        }

        if let Some(axis) = lookup("VOID_CAMERA_LOOK_AXIS") {
            match axis.trim().to_lowercase().as_str() {
                "yaw" => self.camera.look_axis = LookAxis::Yaw,
                "pitch" => self.camera.look_axis = LookAxis::Pitch,
                other => log::warn!("Unknown look axis: {}", other),
            }
        }
    }

    /// Number of frames to simulate
    pub fn frame_count(&self) -> u32 {
        if self.delta_time > 0.0 && self.duration > 0.0 {
            (self.duration / self.delta_time).ceil() as u32
        } else {
            0
        }
    }
}
