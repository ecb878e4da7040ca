//! Error types for the collision scene

use thiserror::Error;

/// Collision scene errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Collider not found (removed, or handle from another world)
    #[error("Collider not found: {0:?}")]
    ColliderNotFound(crate::collider::ColliderHandle),

    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),

    /// Shape creation failed
    #[error("Failed to create collision shape: {0}")]
    ShapeCreationFailed(String),
}

/// Result type for collision scene operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
