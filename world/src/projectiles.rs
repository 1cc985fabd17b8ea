//! Projectiles in flight between towers and their targets.

use std::time::Duration;

use creep_defence_core::{BuffKind, EntityId, ProjectileId, Vec3};

/// Transient projectile chasing a target.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) owner: EntityId,
    pub(crate) target: EntityId,
    pub(crate) position: Vec3,
    pub(crate) speed: f32,
    pub(crate) trigger_range: f32,
    pub(crate) damage: i32,
    pub(crate) buff: Option<BuffKind>,
}

/// Result of moving a projectile for one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Flight {
    /// Still travelling.
    Travelling,
    /// Within trigger range of the target.
    Arrived,
}

impl Projectile {
    /// Moves toward the target position without overshooting it.
    pub(crate) fn advance(&mut self, target: Vec3, dt: Duration) -> Flight {
        let offset = target - self.position;
        let distance = offset.length();
        let step = self.speed.max(0.0) * dt.as_secs_f32();

        if step >= distance {
            self.position = target;
        } else if distance > 0.0 {
            self.position += offset / distance * step;
        }

        if self.position.distance(target) < self.trigger_range {
            Flight::Arrived
        } else {
            Flight::Travelling
        }
    }
}

/// Every projectile currently in flight.
#[derive(Debug, Default)]
pub(crate) struct ProjectileField {
    entries: Vec<Projectile>,
    next_id: u32,
}

impl ProjectileField {
    /// Allocates an identifier and launches a projectile.
    pub(crate) fn launch(
        &mut self,
        owner: EntityId,
        target: EntityId,
        position: Vec3,
        speed: f32,
        trigger_range: f32,
        damage: i32,
        buff: Option<BuffKind>,
    ) -> ProjectileId {
        let id = ProjectileId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.entries.push(Projectile {
            id,
            owner,
            target,
            position,
            speed,
            trigger_range,
            damage,
            buff,
        });
        id
    }

    /// Removes every projectile so the caller can resolve them in launch
    /// order and return the survivors.
    pub(crate) fn take(&mut self) -> Vec<Projectile> {
        std::mem::take(&mut self.entries)
    }

    pub(crate) fn restore(&mut self, survivors: Vec<Projectile>) {
        self.entries = survivors;
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.entries.iter()
    }
}
