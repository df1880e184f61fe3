//! Collision world: collider registry plus every gameplay query
//!
//! The world owns the broad-phase index, the collider and entity storage,
//! and one instance of each query service. Gameplay code registers level
//! geometry and agents here and asks movement, bullet, sight and spawn
//! questions through the methods below.

use crate::config::{CollisionConfig, ConfigError};
use crate::error::{CollisionError, Result};
use crate::foundation::collections::{ColliderHandle, ColliderMap, EntityId, EntityMap};
use crate::foundation::math::{Vec3, AABB};
use crate::physics::collision::{Collider, ColliderQuery, EntityRecord, RayHit};
use crate::physics::collision_tags::ColliderTags;
use crate::physics::movement::{CollisionResolver, MovementResult};
use crate::physics::raycast::{BulletHit, Raycaster};
use crate::physics::spawn::{SpawnPlacement, SpawnValidator};
use crate::physics::visibility::VisibilityService;
use crate::spatial::{SpatialQuery, WorldIndex};

/// Collision subsystem entry point
pub struct CollisionWorld {
    config: CollisionConfig,

    /// Broad phase
    index: Box<dyn SpatialQuery>,

    colliders: ColliderMap<Collider>,
    entities: EntityMap<EntityRecord>,

    resolver: CollisionResolver,
    raycaster: Raycaster,
    visibility: VisibilityService,
    spawner: SpawnValidator,
}

impl Default for CollisionWorld {
    fn default() -> Self {
        let config = CollisionConfig::default();
        let index = Box::new(WorldIndex::new(config.grid.clone()));
        Self::from_parts(config, index)
    }
}

impl CollisionWorld {
    /// Create an empty world backed by the uniform grid
    pub fn new(config: CollisionConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let index = Box::new(WorldIndex::new(config.grid.clone()));
        Ok(Self::from_parts(config, index))
    }

    /// Create an empty world with a custom broad phase
    ///
    /// `config.grid` is ignored by indexes other than [`WorldIndex`].
    pub fn with_spatial_query(
        config: CollisionConfig,
        index: Box<dyn SpatialQuery>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, index))
    }

    fn from_parts(config: CollisionConfig, mut index: Box<dyn SpatialQuery>) -> Self {
        index.clear();
        Self {
            resolver: CollisionResolver::new(config.resolver.clone()),
            raycaster: Raycaster::new(),
            visibility: VisibilityService::new(config.raycast.clone()),
            spawner: SpawnValidator::new(config.spawn.clone()),
            colliders: ColliderMap::with_key(),
            entities: EntityMap::with_key(),
            index,
            config,
        }
    }

    /// Configuration the world was built with
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Read-only view for running services directly
    pub fn view(&self) -> ColliderQuery<'_> {
        ColliderQuery::new(self.index.as_ref(), &self.colliders, &self.entities)
    }

    // Registration

    /// Register an entity that can own colliders
    pub fn spawn_entity(&mut self, tags: ColliderTags) -> EntityId {
        let id = self.entities.insert(EntityRecord {
            tags,
            colliders: Vec::new(),
        });
        log::debug!("CollisionWorld: spawned entity {:?} ({:?})", id, self.entities[id].tags);
        id
    }

    /// Remove an entity and all of its colliders
    pub fn despawn_entity(&mut self, entity: EntityId) -> Result<()> {
        let record = self
            .entities
            .remove(entity)
            .ok_or(CollisionError::UnknownEntity(entity))?;

        for handle in &record.colliders {
            self.colliders.remove(*handle);
            self.index.remove(*handle);
        }
        log::debug!(
            "CollisionWorld: despawned entity {:?} with {} colliders",
            entity,
            record.colliders.len()
        );
        Ok(())
    }

    /// Attach a collider with world-space `bounds` to `owner`
    pub fn add_collider(&mut self, owner: EntityId, bounds: AABB) -> Result<ColliderHandle> {
        validate_bounds(&bounds)?;
        let record = self
            .entities
            .get_mut(owner)
            .ok_or(CollisionError::UnknownEntity(owner))?;

        let handle = self.colliders.insert(Collider { bounds, owner });
        record.colliders.push(handle);
        self.index.insert(handle, &bounds);

        log::debug!("CollisionWorld: collider {:?} for {:?} at {:?}", handle, owner, bounds);
        Ok(handle)
    }

    /// Detach and return a collider
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> Result<Collider> {
        let collider = self
            .colliders
            .remove(handle)
            .ok_or(CollisionError::UnknownCollider(handle))?;

        self.index.remove(handle);
        if let Some(record) = self.entities.get_mut(collider.owner) {
            record.colliders.retain(|&h| h != handle);
        }
        log::debug!("CollisionWorld: removed collider {:?}", handle);
        Ok(collider)
    }

    /// Move a collider to new bounds
    pub fn update_collider(&mut self, handle: ColliderHandle, bounds: AABB) -> Result<()> {
        validate_bounds(&bounds)?;
        let collider = self
            .colliders
            .get_mut(handle)
            .ok_or(CollisionError::UnknownCollider(handle))?;

        collider.bounds = bounds;
        self.index.insert(handle, &bounds);
        log::trace!("CollisionWorld: collider {:?} moved to {:?}", handle, bounds);
        Ok(())
    }

    /// Replace an entity's tags
    pub fn set_tags(&mut self, entity: EntityId, tags: ColliderTags) -> Result<()> {
        let record = self
            .entities
            .get_mut(entity)
            .ok_or(CollisionError::UnknownEntity(entity))?;
        record.tags = tags;
        Ok(())
    }

    /// Tags of an entity
    pub fn tags(&self, entity: EntityId) -> Option<&ColliderTags> {
        self.entities.get(entity).map(|record| &record.tags)
    }

    /// A registered collider
    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    /// Colliders owned by an entity
    pub fn colliders_of(&self, entity: EntityId) -> Option<&[ColliderHandle]> {
        self.entities.get(entity).map(|record| record.colliders.as_slice())
    }

    /// Number of registered colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Number of registered entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Drop every entity and collider
    pub fn clear(&mut self) {
        self.index.clear();
        self.colliders.clear();
        self.entities.clear();
        log::debug!("CollisionWorld: cleared");
    }

    /// Rebuild the broad phase from the registered colliders
    pub fn rebuild_index(&mut self) {
        self.index.clear();
        for (handle, collider) in &self.colliders {
            self.index.insert(handle, &collider.bounds);
        }
        log::debug!("CollisionWorld: index rebuilt with {} colliders", self.index.len());
    }

    /// Broad-phase candidates for an XZ rectangle
    pub fn query_range(&self, min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Vec<ColliderHandle> {
        self.index.query_range(min_x, max_x, min_z, max_z)
    }

    // Movement

    /// Resolve a capsule move against the ground and every collider
    pub fn resolve_movement(
        &self,
        current: Vec3,
        proposed: Vec3,
        radius: f32,
        height: f32,
    ) -> Result<MovementResult> {
        self.resolver
            .resolve(&self.view(), current, proposed, radius, height, None)
    }

    /// Resolve a move for an agent that has its own colliders registered
    pub fn resolve_movement_excluding(
        &self,
        agent: EntityId,
        current: Vec3,
        proposed: Vec3,
        radius: f32,
        height: f32,
    ) -> Result<MovementResult> {
        self.resolver
            .resolve(&self.view(), current, proposed, radius, height, Some(agent))
    }

    /// True when a capsule at `position` overlaps no solid collider
    pub fn is_clear(&self, position: Vec3, radius: f32, height: f32) -> Result<bool> {
        self.resolver
            .is_clear(&self.view(), position, radius, height, None)
    }

    /// [`Self::is_clear`] ignoring one entity's colliders
    pub fn is_clear_excluding(
        &self,
        agent: EntityId,
        position: Vec3,
        radius: f32,
        height: f32,
    ) -> Result<bool> {
        self.resolver
            .is_clear(&self.view(), position, radius, height, Some(agent))
    }

    /// Clear spawn position near `desired`
    ///
    /// `max_attempts` of zero uses the configured budget. Never fails on
    /// valid input; a crowded area yields a random nearby position.
    pub fn find_clear_spawn(
        &mut self,
        desired: Vec3,
        radius: f32,
        height: f32,
        max_attempts: u32,
    ) -> Result<Vec3> {
        Ok(self
            .find_spawn_placement(desired, radius, height, max_attempts)?
            .position)
    }

    /// [`Self::find_clear_spawn`] with search details
    pub fn find_spawn_placement(
        &mut self,
        desired: Vec3,
        radius: f32,
        height: f32,
        max_attempts: u32,
    ) -> Result<SpawnPlacement> {
        let view = ColliderQuery::new(self.index.as_ref(), &self.colliders, &self.entities);
        self.spawner.find_clear_spawn(
            &view,
            &self.resolver,
            desired,
            radius,
            height,
            max_attempts,
            None,
        )
    }

    // Rays

    /// Nearest non-ground hit within `max_distance`
    pub fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Result<Option<RayHit>> {
        self.raycaster
            .cast(&self.view(), origin, direction, max_distance, None)
    }

    /// Every non-ground hit within `max_distance`, nearest first
    pub fn cast_ray_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Result<Vec<RayHit>> {
        self.raycaster
            .cast_all(&self.view(), origin, direction, max_distance, None)
    }

    /// Bullet collision along a direction
    pub fn check_bullet_hit(
        &self,
        position: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Result<BulletHit> {
        self.raycaster
            .check_bullet_hit(&self.view(), position, direction, max_distance, None)
    }

    /// Bullet collision ignoring the shooter's colliders
    pub fn check_bullet_hit_excluding(
        &self,
        shooter: EntityId,
        position: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Result<BulletHit> {
        self.raycaster
            .check_bullet_hit(&self.view(), position, direction, max_distance, Some(shooter))
    }

    /// Bullet collision over the segment travelled this frame
    pub fn check_bullet_segment(&self, previous: Vec3, current: Vec3) -> Result<BulletHit> {
        self.raycaster
            .check_bullet_segment(&self.view(), previous, current, None)
    }

    // Sight

    /// True when world geometry does not block the view from `from` to `to`
    pub fn has_line_of_sight(&self, from: Vec3, to: Vec3, eye_height: f32) -> Result<bool> {
        self.visibility
            .has_line_of_sight(&self.view(), from, to, eye_height, None)
    }

    /// [`Self::has_line_of_sight`] ignoring the viewer's colliders
    pub fn has_line_of_sight_excluding(
        &self,
        viewer: EntityId,
        from: Vec3,
        to: Vec3,
        eye_height: f32,
    ) -> Result<bool> {
        self.visibility
            .has_line_of_sight(&self.view(), from, to, eye_height, Some(viewer))
    }

    /// Nearest world hit blocking the view, if any
    pub fn first_sight_blocker(&self, from: Vec3, to: Vec3, eye_height: f32) -> Result<Option<RayHit>> {
        self.visibility
            .first_sight_blocker(&self.view(), from, to, eye_height, None)
    }
}

fn validate_bounds(bounds: &AABB) -> Result<()> {
    if bounds.is_empty() {
        return Err(CollisionError::InvalidBounds {
            min: [bounds.min.x, bounds.min.y, bounds.min.z],
            max: [bounds.max.x, bounds.max.y, bounds.max.z],
        });
    }
    Ok(())
}
