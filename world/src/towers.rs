//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use creep_defence_core::{EntityId, SocketRef, TowerKind, Vec3};

use crate::entity::Entity;

/// Tower seated in a platform socket.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) entity: Entity,
    pub(crate) kind: TowerKind,
    pub(crate) socket: SocketRef,
    pub(crate) range: f32,
    pub(crate) projectile_speed: f32,
    pub(crate) trigger_range: f32,
    pub(crate) cooldown: Duration,
    pub(crate) heading_degrees: f32,
    pub(crate) last_fired: Option<Duration>,
    pub(crate) kills: u32,
}

impl Tower {
    /// Reports whether the cooldown has strictly elapsed at `now`.
    pub(crate) fn ready(&self, now: Duration) -> bool {
        self.last_fired
            .map_or(true, |fired| now > fired.saturating_add(self.cooldown))
    }

    /// Turns the tower to face the provided point and returns the heading.
    pub(crate) fn face(&mut self, point: Vec3) -> f32 {
        let offset = point - self.entity.position;
        if offset.x != 0.0 || offset.z != 0.0 {
            self.heading_degrees = offset.x.atan2(offset.z).to_degrees();
        }
        self.heading_degrees
    }
}

/// Registry that stores towers keyed by identifier.
#[derive(Debug, Default)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<EntityId, Tower>,
}

impl TowerRegistry {
    pub(crate) fn insert(&mut self, tower: Tower) {
        let _ = self.entries.insert(tower.entity.id, tower);
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Tower> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }
}
