//! Capsule-vs-world movement resolution
//!
//! Agents are approximated by an upright box `radius` wide on X and Z and
//! `height` tall, centered on their position. Each frame the proposed
//! position is clamped to the ground plane, then corrected against every
//! nearby collider in turn:
//!
//! 1. **Landing on top** wins whenever the agent overlaps a collider
//!    horizontally with its feet close to the top, so walking across a roof
//!    never turns into a sideways shove.
//! 2. **Near top while falling** catches fast falls that dipped slightly
//!    past the landing band.
//! 3. **Side collision** pushes the agent out along the shallower horizontal
//!    axis and never touches Y, so jumping and falling continue while
//!    horizontal motion is blocked.
//!
//! Candidates are applied one after another to the evolving position rather
//! than solved together, so deep overlaps between several colliders can
//! depend on candidate order.

use crate::config::ResolverConfig;
use crate::error::{ensure_capsule, ensure_finite, Result};
use crate::foundation::collections::EntityId;
use crate::foundation::math::{Vec3, AABB};
use crate::physics::collision::ColliderQuery;

/// Corrected movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementResult {
    /// Final capsule center
    pub position: Vec3,
    /// True when standing on the ground plane or on top of a collider
    pub on_ground: bool,
}

/// Which rule moved the agent for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contact {
    Landed,
    CaughtFalling,
    PushedX,
    PushedZ,
    None,
}

/// Resolves proposed movement against the ground plane and nearby colliders
#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    config: ResolverConfig,
}

impl CollisionResolver {
    /// Create a resolver with the given thresholds
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a move from `current` to `proposed`
    ///
    /// Colliders owned by `ignore` (usually the moving agent itself) are
    /// skipped. Fails only on non-finite input or a negative capsule.
    pub fn resolve(
        &self,
        scene: &ColliderQuery<'_>,
        current: Vec3,
        proposed: Vec3,
        radius: f32,
        height: f32,
        ignore: Option<EntityId>,
    ) -> Result<MovementResult> {
        ensure_finite(&current, "current position")?;
        ensure_finite(&proposed, "proposed position")?;
        ensure_capsule(radius, height)?;

        let half_height = height * 0.5;
        let moving_down = proposed.y < current.y;
        let mut position = proposed;
        let mut on_ground = false;

        // Ground plane
        if position.y - half_height <= self.config.ground_height {
            position.y = position.y.max(self.config.ground_height + half_height);
            on_ground = true;
        }

        let area = AABB::from_capsule(proposed, radius, height)
            .expanded_xz(self.config.query_padding);

        for candidate in scene.solid_candidates(&area, ignore) {
            let bounds = &candidate.collider.bounds;
            let contact = self.apply(&mut position, bounds, radius, height, moving_down);

            match contact {
                Contact::Landed | Contact::CaughtFalling => on_ground = true,
                Contact::PushedX | Contact::PushedZ | Contact::None => {}
            }

            if contact != Contact::None {
                log::trace!(
                    "CollisionResolver: {:?} against {:?} -> {:?}",
                    contact,
                    candidate.handle,
                    position
                );
            }
        }

        Ok(MovementResult { position, on_ground })
    }

    /// True when the capsule at `position` overlaps no solid collider
    ///
    /// Faces that merely touch do not count as overlap, so an agent standing
    /// exactly on a crate or flush against a wall is clear.
    pub fn is_clear(
        &self,
        scene: &ColliderQuery<'_>,
        position: Vec3,
        radius: f32,
        height: f32,
        ignore: Option<EntityId>,
    ) -> Result<bool> {
        ensure_finite(&position, "position")?;
        ensure_capsule(radius, height)?;

        let agent = AABB::from_capsule(position, radius, height);
        let area = agent.expanded_xz(self.config.query_padding);
        let blocked = scene
            .solid_candidates(&area, ignore)
            .any(|candidate| agent.overlaps_strict(&candidate.collider.bounds));

        Ok(!blocked)
    }

    fn apply(
        &self,
        position: &mut Vec3,
        bounds: &AABB,
        radius: f32,
        height: f32,
        moving_down: bool,
    ) -> Contact {
        let half_height = height * 0.5;
        let agent = AABB::from_capsule(*position, radius, height);
        let feet = position.y - half_height;
        let top = bounds.max.y;
        let distance_to_top = feet - top;
        let horizontal = agent.overlaps_xz(bounds);

        if horizontal
            && distance_to_top.abs() <= self.config.landing_tolerance
            && (moving_down || distance_to_top <= self.config.landing_step)
        {
            position.y = top + half_height;
            return Contact::Landed;
        }

        if !agent.intersects(bounds) {
            return Contact::None;
        }

        // Only reachable when landing_tolerance is narrower than the near-top band
        if moving_down
            && distance_to_top > self.config.near_top_min
            && distance_to_top < self.config.near_top_max
        {
            position.y = top + half_height;
            return Contact::CaughtFalling;
        }

        let overlap_x = agent.max.x.min(bounds.max.x) - agent.min.x.max(bounds.min.x);
        let overlap_z = agent.max.z.min(bounds.max.z) - agent.min.z.max(bounds.min.z);
        let center = bounds.center();

        if overlap_x <= overlap_z {
            position.x = if position.x < center.x {
                bounds.min.x - radius
            } else {
                bounds.max.x + radius
            };
            Contact::PushedX
        } else {
            position.z = if position.z < center.z {
                bounds.min.z - radius
            } else {
                bounds.max.z + radius
            };
            Contact::PushedZ
        }
    }
}
