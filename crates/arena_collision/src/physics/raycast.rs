//! Ray casting and bullet collision over broad-phase candidates
//!
//! The broad phase gathers every collider whose footprint meets the XZ
//! bounding rectangle of the ray segment; each candidate then gets a slab
//! test against its bounds. Ground colliders are never hit.

use crate::error::{ensure_distance, ensure_finite, Result};
use crate::foundation::collections::{ColliderHandle, EntityId};
use crate::foundation::math::{Vec3, AABB};
use crate::physics::collision::{ColliderQuery, Ray, RayHit};

/// Outcome of a bullet collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BulletHit {
    /// Nothing in range
    Miss,
    /// The nearest hit belongs to a combatant; damage is applied elsewhere
    Combatant(RayHit),
    /// The bullet struck world geometry
    World(RayHit),
}

impl BulletHit {
    /// True only for world hits (impact effects, bullet removal)
    pub fn hit(&self) -> bool {
        matches!(self, Self::World(_))
    }

    /// Impact point of a world hit
    pub fn point(&self) -> Option<Vec3> {
        self.world_hit().map(|hit| hit.point)
    }

    /// Collider struck by a world hit
    pub fn collider(&self) -> Option<ColliderHandle> {
        self.world_hit().map(|hit| hit.collider)
    }

    /// Distance to the world hit
    pub fn distance(&self) -> Option<f32> {
        self.world_hit().map(|hit| hit.distance)
    }

    fn world_hit(&self) -> Option<&RayHit> {
        match self {
            Self::World(hit) => Some(hit),
            Self::Miss | Self::Combatant(_) => None,
        }
    }
}

/// Nearest-hit and all-hits ray queries
#[derive(Debug, Clone, Copy, Default)]
pub struct Raycaster;

impl Raycaster {
    /// Create a raycaster
    pub fn new() -> Self {
        Self
    }

    /// Nearest hit within `max_distance`
    pub fn cast(
        &self,
        scene: &ColliderQuery<'_>,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore: Option<EntityId>,
    ) -> Result<Option<RayHit>> {
        let ray = Ray::new(origin, direction)?;
        ensure_distance(max_distance)?;
        Ok(self
            .hits(scene, &ray, max_distance, ignore)
            .min_by(|a, b| a.distance.total_cmp(&b.distance)))
    }

    /// Every hit within `max_distance`, nearest first
    pub fn cast_all(
        &self,
        scene: &ColliderQuery<'_>,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore: Option<EntityId>,
    ) -> Result<Vec<RayHit>> {
        let ray = Ray::new(origin, direction)?;
        ensure_distance(max_distance)?;
        let mut hits: Vec<RayHit> = self.hits(scene, &ray, max_distance, ignore).collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        Ok(hits)
    }

    /// Bullet travelling from `position` along `direction`
    ///
    /// Only the nearest hit counts: a combatant in front of a wall shields
    /// the wall.
    pub fn check_bullet_hit(
        &self,
        scene: &ColliderQuery<'_>,
        position: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore: Option<EntityId>,
    ) -> Result<BulletHit> {
        let outcome = match self.cast(scene, position, direction, max_distance, ignore)? {
            None => BulletHit::Miss,
            Some(hit) if hit.combatant => BulletHit::Combatant(hit),
            Some(hit) => BulletHit::World(hit),
        };
        log::trace!("Raycaster: bullet from {position:?} -> {outcome:?}");
        Ok(outcome)
    }

    /// Bullet that moved from `previous` to `current` this frame
    ///
    /// A bullet that did not move cannot hit anything.
    pub fn check_bullet_segment(
        &self,
        scene: &ColliderQuery<'_>,
        previous: Vec3,
        current: Vec3,
        ignore: Option<EntityId>,
    ) -> Result<BulletHit> {
        ensure_finite(&previous, "previous position")?;
        ensure_finite(&current, "current position")?;
        let travel = current - previous;
        let distance = travel.norm();
        if distance <= f32::EPSILON {
            return Ok(BulletHit::Miss);
        }
        self.check_bullet_hit(scene, previous, travel, distance, ignore)
    }

    fn hits<'s>(
        &self,
        scene: &ColliderQuery<'s>,
        ray: &Ray,
        max_distance: f32,
        ignore: Option<EntityId>,
    ) -> impl Iterator<Item = RayHit> + 's {
        let end = ray.point_at(max_distance);
        let area = AABB::new(ray.origin.inf(&end), ray.origin.sup(&end));
        let ray = *ray;

        scene.solid_candidates(&area, ignore).filter_map(move |candidate| {
            let distance = candidate.collider.bounds.intersect_ray(ray.origin, ray.direction)?;
            if distance > max_distance {
                return None;
            }
            Some(RayHit {
                collider: candidate.handle,
                entity: candidate.collider.owner,
                distance,
                point: ray.point_at(distance),
                combatant: candidate.tags.is_combatant(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollisionError;
    use crate::physics::collision_tags::ColliderTags;
    use crate::physics::fixtures::Fixture;
    use approx::assert_relative_eq;

    fn wall_at_x(x: f32) -> AABB {
        AABB::new(Vec3::new(x, 0.0, -5.0), Vec3::new(x + 1.0, 10.0, 5.0))
    }

    #[test]
    fn test_cast_returns_nearest() {
        let mut fixture = Fixture::new();
        fixture.add(wall_at_x(20.0), ColliderTags::world());
        let (_, near) = fixture.add(wall_at_x(10.0), ColliderTags::world());

        let hit = Raycaster::new()
            .cast(&fixture.view(), Vec3::new(0.0, 2.0, 0.0), Vec3::x(), 100.0, None)
            .unwrap()
            .unwrap();
        assert_eq!(hit.collider, near);
        assert_relative_eq!(hit.distance, 10.0);
        assert_relative_eq!(hit.point.x, 10.0);
    }

    #[test]
    fn test_cast_respects_max_distance() {
        let mut fixture = Fixture::new();
        fixture.add(wall_at_x(10.0), ColliderTags::world());

        let hit = Raycaster::new()
            .cast(&fixture.view(), Vec3::new(0.0, 2.0, 0.0), Vec3::x(), 9.5, None)
            .unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_cast_skips_ground() {
        let mut fixture = Fixture::new();
        fixture.add(
            AABB::new(Vec3::new(-100.0, -1.0, -100.0), Vec3::new(100.0, 0.0, 100.0)),
            ColliderTags::ground(),
        );
        let hit = Raycaster::new()
            .cast(&fixture.view(), Vec3::new(0.0, 5.0, 0.0), -Vec3::y(), 50.0, None)
            .unwrap();
        assert!(hit.is_none());
    }

    #[test]
    fn test_cast_all_sorted() {
        let mut fixture = Fixture::new();
        fixture.add(wall_at_x(30.0), ColliderTags::world());
        fixture.add(wall_at_x(10.0), ColliderTags::enemy());
        fixture.add(wall_at_x(20.0), ColliderTags::world());

        let hits = Raycaster::new()
            .cast_all(&fixture.view(), Vec3::new(0.0, 2.0, 0.0), Vec3::x(), 100.0, None)
            .unwrap();
        let distances: Vec<f32> = hits.iter().map(|h| h.distance).collect();
        assert_eq!(distances, vec![10.0, 20.0, 30.0]);
        assert!(hits[0].combatant);
    }

    #[test]
    fn test_bullet_against_team_and_untagged() {
        let origin = Vec3::new(0.0, 2.0, 0.0);

        let mut red = Fixture::new();
        red.add(wall_at_x(10.0), ColliderTags::world().with_team("red"));
        let outcome = Raycaster::new()
            .check_bullet_hit(&red.view(), origin, Vec3::x(), 100.0, None)
            .unwrap();
        assert!(!outcome.hit());
        assert!(matches!(outcome, BulletHit::Combatant(_)));

        let mut plain = Fixture::new();
        let (_, wall) = plain.add(wall_at_x(10.0), ColliderTags::world());
        let outcome = Raycaster::new()
            .check_bullet_hit(&plain.view(), origin, Vec3::x(), 100.0, None)
            .unwrap();
        assert!(outcome.hit());
        assert_eq!(outcome.collider(), Some(wall));
        assert_relative_eq!(outcome.distance().unwrap(), 10.0);
        assert_relative_eq!(outcome.point().unwrap().x, 10.0);
    }

    #[test]
    fn test_bullet_hits_player_without_team_as_world() {
        let mut fixture = Fixture::new();
        let (_, body) = fixture.add(wall_at_x(10.0), ColliderTags::player());
        let outcome = Raycaster::new()
            .check_bullet_hit(&fixture.view(), Vec3::new(0.0, 1.0, 0.0), Vec3::x(), 100.0, None)
            .unwrap();

        assert!(matches!(outcome, BulletHit::World(_)));
        assert_eq!(outcome.collider(), Some(body));
        assert_relative_eq!(outcome.distance().unwrap(), 10.0);
    }

    #[test]
    fn test_bullet_segment() {
        let mut fixture = Fixture::new();
        fixture.add(wall_at_x(10.0), ColliderTags::world());
        let caster = Raycaster::new();
        let view = fixture.view();

        let short = caster
            .check_bullet_segment(&view, Vec3::new(0.0, 2.0, 0.0), Vec3::new(5.0, 2.0, 0.0), None)
            .unwrap();
        assert_eq!(short, BulletHit::Miss);

        let through = caster
            .check_bullet_segment(&view, Vec3::new(5.0, 2.0, 0.0), Vec3::new(15.0, 2.0, 0.0), None)
            .unwrap();
        assert_relative_eq!(through.distance().unwrap(), 5.0);

        let still = caster
            .check_bullet_segment(&view, Vec3::new(5.0, 2.0, 0.0), Vec3::new(5.0, 2.0, 0.0), None)
            .unwrap();
        assert_eq!(still, BulletHit::Miss);
    }

    #[test]
    fn test_rejects_zero_direction() {
        let fixture = Fixture::new();
        let err = Raycaster::new()
            .cast(&fixture.view(), Vec3::zeros(), Vec3::zeros(), 10.0, None)
            .unwrap_err();
        assert_eq!(err, CollisionError::ZeroDirection);
    }
}
