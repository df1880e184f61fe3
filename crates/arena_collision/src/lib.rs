//! # Arena Collision
//!
//! Collision and visibility queries for an arena shooter.
//!
//! ## Features
//!
//! - **Broad Phase**: Sparse uniform grid over the XZ plane
//! - **Movement**: Upright capsule resolution with landing, step-up and side push
//! - **Rays**: Nearest-hit and all-hits casts, bullet checks with team tags
//! - **Line of Sight**: Eye-to-body sight lines that see past other combatants
//! - **Spawning**: Ring search for a clear position with a seeded fallback
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arena_collision::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     arena_collision::foundation::logging::init();
//!
//!     let config = CollisionConfig::load_from_file("collision.toml").unwrap_or_default();
//!     let mut world = CollisionWorld::new(config)?;
//!
//!     let level = world.spawn_entity(ColliderTags::world());
//!     world.add_collider(level, AABB::new(Vec3::new(10.0, 0.0, -5.0), Vec3::new(11.0, 4.0, 5.0)))?;
//!
//!     let step = world.resolve_movement(Vec3::new(9.0, 0.9, 0.0), Vec3::new(9.8, 0.9, 0.0), 0.5, 1.8)?;
//!     let seen = world.has_line_of_sight(Vec3::zeros(), Vec3::new(20.0, 0.0, 0.0), 1.6)?;
//!     println!("moved to {:?}, target visible: {}", step.position, seen);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod error;
pub mod foundation;
pub mod physics;
pub mod spatial;

mod world;

pub use error::{CollisionError, Result};
pub use world::CollisionWorld;

/// Common imports for collision users
pub mod prelude {
    pub use crate::{
        config::{CollisionConfig, Config, ConfigError},
        error::CollisionError,
        foundation::{
            collections::{ColliderHandle, EntityId},
            math::{Vec3, AABB},
        },
        physics::{
            BulletHit, ColliderTags, MovementResult, RayHit, SpawnPlacement, TagFlags,
        },
        spatial::{SpatialQuery, WorldIndex},
        CollisionWorld,
    };
}
