//! Test-only collider storage for exercising queries without a full world

use crate::foundation::collections::{ColliderHandle, ColliderMap, EntityId, EntityMap};
use crate::foundation::math::AABB;
use crate::physics::collision::{Collider, ColliderQuery, EntityRecord};
use crate::physics::collision_tags::ColliderTags;
use crate::spatial::{SpatialQuery, WorldIndex};

pub(crate) struct Fixture {
    index: WorldIndex,
    colliders: ColliderMap<Collider>,
    entities: EntityMap<EntityRecord>,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self {
            index: WorldIndex::default(),
            colliders: ColliderMap::with_key(),
            entities: EntityMap::with_key(),
        }
    }

    /// One entity owning one collider
    pub(crate) fn add(&mut self, bounds: AABB, tags: ColliderTags) -> (EntityId, ColliderHandle) {
        let owner = self.entities.insert(EntityRecord { tags, colliders: Vec::new() });
        let handle = self.colliders.insert(Collider { bounds, owner });
        self.entities[owner].colliders.push(handle);
        self.index.insert(handle, &bounds);
        (owner, handle)
    }

    pub(crate) fn view(&self) -> ColliderQuery<'_> {
        ColliderQuery::new(&self.index, &self.colliders, &self.entities)
    }
}
