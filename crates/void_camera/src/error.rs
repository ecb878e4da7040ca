//! Error types for the follow camera

use crate::system::RigId;
use thiserror::Error;

/// Follow camera errors
#[derive(Debug, Error)]
pub enum CameraError {
    /// No target entity configured
    #[error("No target assigned to the follow camera")]
    MissingTarget,

    /// Invalid configuration value
    #[error("Invalid camera configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed
    #[error("Failed to parse camera configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Activation requested on a running rig
    #[error("Camera rig is already active")]
    AlreadyActive,

    /// Rig not registered with the camera system
    #[error("Camera rig not found: {0:?}")]
    RigNotFound(RigId),
}

/// Result type for follow camera operations
pub type Result<T> = std::result::Result<T, CameraError>;
