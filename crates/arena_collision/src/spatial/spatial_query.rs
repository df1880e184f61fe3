//! Abstract spatial query interface for broad-phase collision detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.2:
//! "Spatial partitioning schemes... allow us to quickly cull out pairs of
//! objects that cannot possibly be colliding."
//!
//! This abstraction allows swapping different spatial partitioning schemes
//! (grid, BVH, etc.) without changing the movement and ray queries.

use crate::foundation::collections::ColliderHandle;
use crate::foundation::math::AABB;

/// Abstract interface for spatial partitioning used in broad-phase collision detection
///
/// Implementations hold handles only; collider data stays with the owner of
/// the handle map. Results are candidates, not confirmed hits.
pub trait SpatialQuery: Send + Sync {
    /// Insert (or re-insert) a collider with its world-space bounds
    ///
    /// Returns false when the bounds are empty and nothing was stored.
    fn insert(&mut self, handle: ColliderHandle, bounds: &AABB) -> bool;

    /// Remove a collider from every cell it occupies
    fn remove(&mut self, handle: ColliderHandle) -> bool;

    /// Candidates whose bounds may overlap the XZ rectangle, deduplicated and unordered
    fn query_range(&self, min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Vec<ColliderHandle>;

    /// Candidates whose bounds may overlap the XZ footprint of `bounds`
    fn query_aabb(&self, bounds: &AABB) -> Vec<ColliderHandle> {
        self.query_range(bounds.min.x, bounds.max.x, bounds.min.z, bounds.max.z)
    }

    /// Clear all colliders from the spatial structure
    fn clear(&mut self);

    /// Get the number of colliders in the structure
    fn len(&self) -> usize;

    /// True when nothing is stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
