//! Collision primitives and collider storage
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays and hit records
//! - [`collider`] - Registered colliders, owning-entity records and the
//!   read-only view every query runs against
//!
//! # Key Types
//!
//! - [`Collider`] - World-space bounds plus a back-reference to its owner
//! - [`ColliderQuery`] - Broad-phase index and storage borrowed together
//! - [`Ray`], [`RayHit`] - Ray casting input and output

pub mod primitives;
pub mod collider;

// Re-export commonly used types
pub use primitives::{Ray, RayHit};
pub use collider::{Candidate, Collider, ColliderQuery, EntityRecord};
