//! Line-of-sight queries between combatants
//!
//! A sight ray runs from the viewer's eyes to the target's body center and
//! stops at 98% of the distance so the target's own shape never blocks it.
//! Combatants along the ray never block sight; any world geometry in range
//! does, no matter how many combatants stand in front of it.

use crate::config::RaycastConfig;
use crate::error::{ensure_finite, ensure_finite_scalar, Result};
use crate::foundation::collections::EntityId;
use crate::foundation::math::Vec3;
use crate::physics::collision::{ColliderQuery, RayHit};
use crate::physics::raycast::Raycaster;

/// Answers "can A see B" over the collider view
#[derive(Debug, Clone, Default)]
pub struct VisibilityService {
    config: RaycastConfig,
    raycaster: Raycaster,
}

impl VisibilityService {
    /// Create a service with the given sight settings
    pub fn new(config: RaycastConfig) -> Self {
        Self {
            config,
            raycaster: Raycaster::new(),
        }
    }

    /// True when no world geometry lies between the viewer's eyes and the target
    ///
    /// `ignore` drops one entity's colliders from the test, for viewers whose
    /// own body is world-tagged (a turret built into a wall, for example).
    pub fn has_line_of_sight(
        &self,
        scene: &ColliderQuery<'_>,
        from: Vec3,
        to: Vec3,
        eye_height: f32,
        ignore: Option<EntityId>,
    ) -> Result<bool> {
        Ok(self
            .first_sight_blocker(scene, from, to, eye_height, ignore)?
            .is_none())
    }

    /// Nearest world hit blocking the sight line, if any
    pub fn first_sight_blocker(
        &self,
        scene: &ColliderQuery<'_>,
        from: Vec3,
        to: Vec3,
        eye_height: f32,
        ignore: Option<EntityId>,
    ) -> Result<Option<RayHit>> {
        ensure_finite(&from, "viewer position")?;
        ensure_finite(&to, "target position")?;
        ensure_finite_scalar(eye_height, "eye height")?;

        let eye = from + Vec3::new(0.0, eye_height, 0.0);
        let target = to + Vec3::new(0.0, self.config.body_center_offset, 0.0);
        let offset = target - eye;
        let distance = offset.norm();
        if distance <= f32::EPSILON {
            return Ok(None);
        }

        let range = distance * self.config.sight_clip;
        let hits = self.raycaster.cast_all(scene, eye, offset, range, ignore)?;
        let blocker = hits.into_iter().find(|hit| !hit.combatant);

        log::trace!(
            "VisibilityService: {:?} -> {:?} blocked by {:?}",
            eye,
            target,
            blocker.map(|hit| hit.collider)
        );
        Ok(blocker)
    }
}
