//! Spawn point search
//!
//! The desired point is tried first, then concentric rings around it. Every
//! test counts against the attempt budget. When the budget runs out the
//! validator returns a random offset from the desired point instead of
//! failing; the caller asked for a spawn and gets one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SpawnConfig;
use crate::error::{ensure_capsule, ensure_finite, Result};
use crate::foundation::collections::EntityId;
use crate::foundation::math::{constants, Vec3};
use crate::physics::collision::ColliderQuery;
use crate::physics::movement::CollisionResolver;

/// Where a spawn ended up and how it was found
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlacement {
    /// Chosen capsule center
    pub position: Vec3,
    /// Clearance tests performed
    pub attempts: u32,
    /// True when no clear point was found and a random offset was used
    pub fallback: bool,
}

/// Finds a clear spawn point near a desired position
#[derive(Debug, Clone)]
pub struct SpawnValidator {
    config: SpawnConfig,
    rng: StdRng,
}

impl Default for SpawnValidator {
    fn default() -> Self {
        Self::new(SpawnConfig::default())
    }
}

impl SpawnValidator {
    /// Create a validator seeded from `config.seed`
    pub fn new(config: SpawnConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Search settings in use
    pub fn config(&self) -> &SpawnConfig {
        &self.config
    }

    /// Find a clear position for a capsule near `desired`
    ///
    /// `max_attempts` of zero uses the configured budget.
    pub fn find_clear_spawn(
        &mut self,
        scene: &ColliderQuery<'_>,
        resolver: &CollisionResolver,
        desired: Vec3,
        radius: f32,
        height: f32,
        max_attempts: u32,
        ignore: Option<EntityId>,
    ) -> Result<SpawnPlacement> {
        ensure_finite(&desired, "desired position")?;
        ensure_capsule(radius, height)?;

        let budget = if max_attempts == 0 {
            self.config.max_attempts
        } else {
            max_attempts
        };

        let mut attempts = 0;
        for candidate in self.candidates(desired).take(budget as usize) {
            attempts += 1;
            if resolver.is_clear(scene, candidate, radius, height, ignore)? {
                log::trace!("SpawnValidator: clear at {candidate:?} after {attempts} attempts");
                return Ok(SpawnPlacement {
                    position: candidate,
                    attempts,
                    fallback: false,
                });
            }
        }

        let position = self.fallback(desired);
        log::warn!(
            "SpawnValidator: no clear spawn near {desired:?} in {attempts} attempts, using {position:?}"
        );
        Ok(SpawnPlacement {
            position,
            attempts,
            fallback: true,
        })
    }

    /// The desired point followed by each ring sample, nearest ring first
    fn candidates(&self, desired: Vec3) -> impl Iterator<Item = Vec3> {
        let SpawnConfig {
            ring_start,
            ring_step,
            rings,
            angles_per_ring,
            ..
        } = self.config;
        let angle_step = constants::TAU / angles_per_ring.max(1) as f32;

        let ring_points = (0..rings).flat_map(move |ring| {
            let distance = ring_start + ring_step * ring as f32;
            (0..angles_per_ring).map(move |i| {
                let angle = angle_step * i as f32;
                desired + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
            })
        });

        std::iter::once(desired).chain(ring_points)
    }

    fn fallback(&mut self, desired: Vec3) -> Vec3 {
        let near = self.config.ring_start;
        let far = near + self.config.ring_step * self.config.rings as f32;
        let angle = self.rng.gen_range(0.0..constants::TAU);
        let distance = if far > near {
            self.rng.gen_range(near..=far)
        } else {
            near
        };
        desired + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
    }
}
