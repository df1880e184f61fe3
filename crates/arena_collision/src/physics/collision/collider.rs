//! Registered colliders and the borrowed view queries run against
//!
//! A collider stores world-space bounds computed by its owner (possibly the
//! merged bounds of a nested model) plus a back-reference to the owning
//! entity. Tags are looked up through that reference directly; there is no
//! parent chain to climb.

use crate::foundation::collections::{ColliderHandle, ColliderMap, EntityId, EntityMap};
use crate::foundation::math::AABB;
use crate::physics::collision_tags::ColliderTags;
use crate::spatial::SpatialQuery;

/// A registered collision shape
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    /// World-space bounds
    pub bounds: AABB,
    /// Entity this shape belongs to
    pub owner: EntityId,
}

/// Owning-entity record
#[derive(Debug, Clone, Default)]
pub struct EntityRecord {
    /// Gameplay tags shared by all of the entity's colliders
    pub tags: ColliderTags,
    /// Colliders owned by this entity
    pub colliders: Vec<ColliderHandle>,
}

/// A broad-phase candidate with its resolved owner tags
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Collider handle
    pub handle: ColliderHandle,
    /// Collider data
    pub collider: &'a Collider,
    /// Tags of the owning entity
    pub tags: &'a ColliderTags,
}

/// Read-only view over the spatial index and collider storage
///
/// Movement, ray and spawn queries take this view so they can run against
/// any storage that hands out the three pieces.
#[derive(Clone, Copy)]
pub struct ColliderQuery<'a> {
    index: &'a dyn SpatialQuery,
    colliders: &'a ColliderMap<Collider>,
    entities: &'a EntityMap<EntityRecord>,
}

impl<'a> ColliderQuery<'a> {
    /// Create a view
    pub fn new(
        index: &'a dyn SpatialQuery,
        colliders: &'a ColliderMap<Collider>,
        entities: &'a EntityMap<EntityRecord>,
    ) -> Self {
        Self { index, colliders, entities }
    }

    /// Tags of an entity, if it is registered
    pub fn tags(&self, entity: EntityId) -> Option<&'a ColliderTags> {
        self.entities.get(entity).map(|record| &record.tags)
    }

    /// Broad-phase candidates overlapping the XZ footprint of `area`
    ///
    /// Stale handles and colliders without a registered owner are dropped.
    /// Colliders owned by `ignore` are skipped.
    pub fn candidates(
        &self,
        area: &AABB,
        ignore: Option<EntityId>,
    ) -> impl Iterator<Item = Candidate<'a>> + 'a {
        let colliders = self.colliders;
        let entities = self.entities;
        self.index
            .query_aabb(area)
            .into_iter()
            .filter_map(move |handle| {
                let collider = colliders.get(handle)?;
                if Some(collider.owner) == ignore {
                    return None;
                }
                let tags = &entities.get(collider.owner)?.tags;
                Some(Candidate { handle, collider, tags })
            })
    }

    /// Candidates that take part in solid collision: not ground, not empty
    pub fn solid_candidates(
        &self,
        area: &AABB,
        ignore: Option<EntityId>,
    ) -> impl Iterator<Item = Candidate<'a>> + 'a {
        self.candidates(area, ignore)
            .filter(|c| !c.tags.is_ground() && !c.collider.bounds.is_empty())
    }
}
