//! Active creep roster in spawn order.

use std::time::Duration;

use creep_defence_core::{CreepKind, EntityId, Vec3, WaveIndex};

use crate::entity::Entity;

/// Creep walking the path.
#[derive(Clone, Debug)]
pub(crate) struct Creep {
    pub(crate) entity: Entity,
    pub(crate) kind: CreepKind,
    pub(crate) wave: WaveIndex,
    pub(crate) movement_speed: f32,
    pub(crate) reward: i64,
    pub(crate) despawn_after: Duration,
    next_waypoint: usize,
}

impl Creep {
    pub(crate) fn new(
        entity: Entity,
        kind: CreepKind,
        wave: WaveIndex,
        movement_speed: f32,
        reward: i64,
        despawn_after: Duration,
    ) -> Self {
        Self {
            entity,
            kind,
            wave,
            movement_speed,
            reward,
            despawn_after,
            next_waypoint: 1,
        }
    }

    /// Walks toward the next waypoints for the provided time.
    ///
    /// Returns `true` once the final waypoint has been reached.
    pub(crate) fn walk(&mut self, path: &[Vec3], dt: Duration, tolerance: f32) -> bool {
        let mut budget = self.movement_speed.max(0.0) * dt.as_secs_f32();

        while let Some(&waypoint) = path.get(self.next_waypoint) {
            let offset = waypoint - self.entity.position;
            let distance = offset.length();

            if distance <= tolerance {
                self.next_waypoint += 1;
                continue;
            }
            if budget <= 0.0 {
                break;
            }
            if budget >= distance {
                self.entity.position = waypoint;
                budget -= distance;
                self.next_waypoint += 1;
            } else {
                self.entity.position += offset / distance * budget;
                budget = 0.0;
            }
        }

        self.next_waypoint >= path.len()
    }
}

/// Creeps currently on the board, in the order they spawned.
#[derive(Debug, Default)]
pub(crate) struct CreepRoster {
    creeps: Vec<Creep>,
}

impl CreepRoster {
    pub(crate) fn insert(&mut self, creep: Creep) {
        self.creeps.push(creep);
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Creep> {
        self.creeps.iter().find(|creep| creep.entity.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Creep> {
        self.creeps.iter_mut().find(|creep| creep.entity.id == id)
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Creep> {
        let index = self.creeps.iter().position(|creep| creep.entity.id == id)?;
        Some(self.creeps.remove(index))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Creep> {
        self.creeps.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Creep> {
        self.creeps.iter_mut()
    }
}
