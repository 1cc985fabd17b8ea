#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns targeting data into aim and firing commands.

use creep_defence_core::{
    Command, EntityId, GameStatus, TowerCooldownSnapshot, TowerCooldownView, TowerTarget,
};

/// Tower combat system that queues aim and firing commands for towers with targets.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::AimTower` for every target and `Command::FireProjectile`
    /// for the towers whose cooldown has elapsed.
    ///
    /// Every aim command precedes every fire command so towers face their
    /// target before launching.
    pub fn handle(
        &mut self,
        status: GameStatus,
        tower_cooldowns: TowerCooldownView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if !status.is_running() {
            return;
        }

        if tower_targets.is_empty() {
            return;
        }

        out.reserve(tower_targets.len());
        for target in tower_targets {
            out.push(Command::AimTower {
                tower: target.tower,
                target: target.creep,
            });
        }

        let cooldowns = tower_cooldowns.into_vec();
        if cooldowns.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in tower_targets {
            if let Some(snapshot) = find_cooldown(&cooldowns, target.tower) {
                if snapshot.ready {
                    self.scratch.push(Command::FireProjectile {
                        tower: target.tower,
                        target: target.creep,
                    });
                }
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn find_cooldown(
    cooldowns: &[TowerCooldownSnapshot],
    tower: EntityId,
) -> Option<&TowerCooldownSnapshot> {
    cooldowns
        .binary_search_by_key(&tower, |snapshot| snapshot.tower)
        .ok()
        .map(|index| &cooldowns[index])
}
