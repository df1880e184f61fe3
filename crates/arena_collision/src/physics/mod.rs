//! Collision resolution, ray queries, line of sight and spawn search
//!
//! Every service here reads the world through a [`ColliderQuery`] view, so
//! the same code runs against the full [`CollisionWorld`](crate::CollisionWorld)
//! or a bare index in tests.

pub mod collision;
pub mod collision_tags;
pub mod movement;
pub mod raycast;
pub mod spawn;
pub mod visibility;

#[cfg(test)]
pub(crate) mod fixtures;

pub use collision::{Candidate, Collider, ColliderQuery, EntityRecord, Ray, RayHit};
pub use collision_tags::{ColliderTags, TagFlags};
pub use movement::{CollisionResolver, MovementResult};
pub use raycast::{BulletHit, Raycaster};
pub use spawn::{SpawnPlacement, SpawnValidator};
pub use visibility::VisibilityService;
