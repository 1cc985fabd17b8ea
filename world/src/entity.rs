//! Damageable entity record shared by creeps and towers.

use std::collections::BTreeSet;

use creep_defence_core::{BuffKind, EntityId, EntityKind, Vec3};

/// Outcome of applying damage to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DamageOutcome {
    /// The entity was already dead; nothing changed.
    Ignored,
    /// The entity survived the hit.
    Hit {
        /// Health left after the hit.
        remaining: i32,
    },
    /// The hit killed the entity. Reported exactly once per entity.
    Killed,
}

/// Health and identity of a board piece.
#[derive(Clone, Debug)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) kind: EntityKind,
    pub(crate) position: Vec3,
    pub(crate) attack_damage: i32,
    health: i32,
    starting_health: i32,
    alive: bool,
    markers: BTreeSet<BuffKind>,
}

impl Entity {
    pub(crate) fn new(
        id: EntityId,
        kind: EntityKind,
        position: Vec3,
        starting_health: i32,
        attack_damage: i32,
    ) -> Self {
        debug_assert!(
            starting_health > 0,
            "entity {} built with starting health {starting_health}",
            id.get()
        );
        Self {
            id,
            kind,
            position,
            attack_damage,
            health: starting_health,
            starting_health,
            alive: true,
            markers: BTreeSet::new(),
        }
    }

    pub(crate) fn health(&self) -> i32 {
        self.health
    }

    pub(crate) fn starting_health(&self) -> i32 {
        self.starting_health
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive
    }

    /// Subtracts health, transitioning to dead the first time health
    /// reaches zero or below.
    pub(crate) fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(amount);
        if self.health <= 0 {
            self.alive = false;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hit {
                remaining: self.health,
            }
        }
    }

    /// Shows or hides a buff marker. Returns whether the marker changed.
    pub(crate) fn set_marker(&mut self, kind: BuffKind, visible: bool) -> bool {
        if visible {
            self.markers.insert(kind)
        } else {
            self.markers.remove(&kind)
        }
    }

    pub(crate) fn markers(&self) -> impl Iterator<Item = BuffKind> + '_ {
        self.markers.iter().copied()
    }
}
