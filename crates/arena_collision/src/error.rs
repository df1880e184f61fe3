//! Collision query errors
//!
//! Ordinary gameplay input never produces an error. These variants cover
//! programmer mistakes that would otherwise leak NaNs into the simulation.

use thiserror::Error;

use crate::foundation::collections::{ColliderHandle, EntityId};
use crate::foundation::math::{is_finite_vec, Vec3};

/// Collision subsystem errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// A position, direction or scalar argument was NaN or infinite
    #[error("Non-finite value for {what}")]
    NonFinite {
        /// Name of the offending argument
        what: &'static str,
    },

    /// A ray length was negative
    #[error("Invalid ray distance: {0}")]
    InvalidDistance(f32),

    /// A ray direction had zero length
    #[error("Ray direction has zero length")]
    ZeroDirection,

    /// Capsule radius or height was negative
    #[error("Invalid capsule: radius {radius}, height {height}")]
    InvalidCapsule {
        /// Capsule radius
        radius: f32,
        /// Capsule height
        height: f32,
    },

    /// A collider was registered with non-finite or inverted bounds
    #[error("Invalid collider bounds: min {min:?}, max {max:?}")]
    InvalidBounds {
        /// Minimum corner
        min: [f32; 3],
        /// Maximum corner
        max: [f32; 3],
    },

    /// The owning entity is not registered
    #[error("Unknown entity: {0:?}")]
    UnknownEntity(EntityId),

    /// The collider handle is stale or was never registered
    #[error("Unknown collider: {0:?}")]
    UnknownCollider(ColliderHandle),
}

/// Result alias for collision queries
pub type Result<T> = std::result::Result<T, CollisionError>;

pub(crate) fn ensure_finite(v: &Vec3, what: &'static str) -> Result<()> {
    if is_finite_vec(v) {
        Ok(())
    } else {
        Err(CollisionError::NonFinite { what })
    }
}

pub(crate) fn ensure_finite_scalar(value: f32, what: &'static str) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CollisionError::NonFinite { what })
    }
}

pub(crate) fn ensure_capsule(radius: f32, height: f32) -> Result<()> {
    ensure_finite_scalar(radius, "radius")?;
    ensure_finite_scalar(height, "height")?;
    if radius < 0.0 || height < 0.0 {
        return Err(CollisionError::InvalidCapsule { radius, height });
    }
    Ok(())
}

pub(crate) fn ensure_distance(value: f32) -> Result<()> {
    ensure_finite_scalar(value, "max distance")?;
    if value < 0.0 {
        return Err(CollisionError::InvalidDistance(value));
    }
    Ok(())
}

/// Validates a ray direction and returns it normalized
pub(crate) fn normalized_direction(direction: &Vec3) -> Result<Vec3> {
    ensure_finite(direction, "direction")?;
    let length = direction.norm();
    if length <= f32::EPSILON {
        return Err(CollisionError::ZeroDirection);
    }
    Ok(direction / length)
}
