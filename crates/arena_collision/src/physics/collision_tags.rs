//! Gameplay tags attached to the entity that owns a collider
//!
//! Tags decide how a collider takes part in each query: ground colliders are
//! left to the ground plane, combatants never block sight and absorb bullets
//! through the damage path instead of the world-hit path.

use bitflags::bitflags;

bitflags! {
    /// Boolean tags of an owning entity
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TagFlags: u8 {
        /// Walkable ground geometry, skipped by side collision and rays
        const GROUND = 1 << 0;
        /// Hostile combatant
        const ENEMY = 1 << 1;
        /// Player-controlled combatant
        const PLAYER = 1 << 2;
    }
}

/// Tag set of an owning entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColliderTags {
    /// Boolean tags
    pub flags: TagFlags,
    /// Team name, if the entity fights for one
    pub team: Option<String>,
}

impl ColliderTags {
    /// Untagged world geometry (walls, crates, buildings)
    pub fn world() -> Self {
        Self::default()
    }

    /// Ground geometry
    pub fn ground() -> Self {
        Self { flags: TagFlags::GROUND, team: None }
    }

    /// Enemy combatant
    pub fn enemy() -> Self {
        Self { flags: TagFlags::ENEMY, team: None }
    }

    /// Player combatant
    pub fn player() -> Self {
        Self { flags: TagFlags::PLAYER, team: None }
    }

    /// Assign a team
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Ground colliders are handled by the ground plane and ignored elsewhere
    pub fn is_ground(&self) -> bool {
        self.flags.contains(TagFlags::GROUND)
    }

    /// Enemies and anything fighting for a team
    ///
    /// A player tag alone does not make a combatant; players that can be
    /// shot carry a team.
    pub fn is_combatant(&self) -> bool {
        self.flags.contains(TagFlags::ENEMY) || self.team.is_some()
    }
}
