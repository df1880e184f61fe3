//! Handle types for stable references
//!
//! Colliders and their owning entities live in slot maps so a handle held by
//! the spatial grid stays valid (or detectably stale) across removals.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to a registered collision shape
    pub struct ColliderHandle;

    /// Stable identifier of the gameplay entity that owns one or more colliders
    pub struct EntityId;
}

/// Handle-based map for colliders
pub type ColliderMap<T> = SlotMap<ColliderHandle, T>;

/// Handle-based map for owning entities
pub type EntityMap<T> = SlotMap<EntityId, T>;
