//! Ray primitives and hit records

use crate::error::{ensure_finite, normalized_direction, Result};
use crate::foundation::collections::{ColliderHandle, EntityId};
use crate::foundation::math::Vec3;

/// A ray for ray casting, bullets and sight checks
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray, normalizing the direction
    ///
    /// Fails on non-finite input or a zero-length direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Result<Self> {
        ensure_finite(&origin, "origin")?;
        Ok(Self {
            origin,
            direction: normalized_direction(&direction)?,
        })
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray intersection test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// The entity owning that collider
    pub entity: EntityId,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec3,
    /// Whether the owning entity is a combatant
    pub combatant: bool,
}
