#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use creep_defence_core::{
    CreepView, EntityId, GameStatus, TowerTarget, TowerView, Vec2, Vec3,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    creep_workspace: Vec<CreepCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// Each tower takes the first creep in roster order whose lateral
    /// distance is strictly inside the tower's range. The output buffer is
    /// cleared before populating it with the latest assignments.
    pub fn handle(
        &mut self,
        status: GameStatus,
        towers: &TowerView,
        creeps: &CreepView,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if !status.is_running() {
            return;
        }

        if towers.iter().next().is_none() || creeps.is_empty() {
            return;
        }

        self.prepare_creep_workspace(creeps);

        for tower in towers.iter() {
            let origin = lateral(tower.position);
            let hit = self
                .creep_workspace
                .iter()
                .find(|candidate| origin.distance(candidate.lateral) < tower.range);

            if let Some(candidate) = hit {
                out.push(TowerTarget {
                    tower: tower.id,
                    creep: candidate.id,
                    tower_position: tower.position,
                    creep_position: candidate.position,
                });
            }
        }
    }

    fn prepare_creep_workspace(&mut self, creeps: &CreepView) {
        self.creep_workspace.clear();
        self.creep_workspace.reserve(creeps.len());

        for snapshot in creeps.iter() {
            self.creep_workspace.push(CreepCandidate {
                id: snapshot.id,
                position: snapshot.position,
                lateral: lateral(snapshot.position),
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct CreepCandidate {
    id: EntityId,
    position: Vec3,
    lateral: Vec2,
}

fn lateral(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use creep_defence_core::{
        CreepKind, CreepSnapshot, PlatformId, SocketRef, TowerKind, TowerSnapshot, WaveIndex,
    };

    const RUNNING: GameStatus = GameStatus {
        in_progress: true,
        paused: false,
    };

    fn tower(id: u32, position: Vec3, range: f32) -> TowerSnapshot {
        TowerSnapshot {
            id: EntityId::new(id),
            kind: TowerKind::Cannon,
            socket: SocketRef::new(PlatformId::new(0), id),
            position,
            range,
            health: 10,
            starting_health: 10,
            kills: 0,
        }
    }

    fn creep(id: u32, position: Vec3) -> CreepSnapshot {
        CreepSnapshot {
            id: EntityId::new(id),
            kind: CreepKind::Grunt,
            wave: WaveIndex::new(0),
            health: 5,
            starting_health: 5,
            position,
        }
    }

    fn target_of(towers: Vec<TowerSnapshot>, creeps: Vec<CreepSnapshot>) -> Vec<TowerTarget> {
        let mut system = TowerTargeting::new();
        let mut out = Vec::new();
        system.handle(
            RUNNING,
            &TowerView::from_snapshots(towers),
            &CreepView::from_snapshots(creeps),
            &mut out,
        );
        out
    }

    #[test]
    fn first_creep_in_roster_order_wins_over_nearest() {
        let out = target_of(
            vec![tower(1, Vec3::ZERO, 5.0)],
            vec![
                creep(3, Vec3::new(4.0, 0.0, 0.0)),
                creep(4, Vec3::new(1.0, 0.0, 0.0)),
            ],
        );

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].creep, EntityId::new(3));
    }

    #[test]
    fn height_is_ignored_for_range_checks() {
        let out = target_of(
            vec![tower(1, Vec3::new(0.0, 3.0, 0.0), 2.0)],
            vec![creep(2, Vec3::new(0.0, -40.0, 1.5))],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tower_position, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn creeps_exactly_at_range_are_out_of_range() {
        let out = target_of(
            vec![tower(1, Vec3::ZERO, 3.0)],
            vec![creep(2, Vec3::new(3.0, 0.0, 0.0))],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn every_tower_gets_at_most_one_target() {
        let out = target_of(
            vec![
                tower(1, Vec3::ZERO, 10.0),
                tower(2, Vec3::new(50.0, 0.0, 0.0), 10.0),
                tower(3, Vec3::new(100.0, 0.0, 0.0), 1.0),
            ],
            vec![
                creep(5, Vec3::new(2.0, 0.0, 0.0)),
                creep(6, Vec3::new(48.0, 0.0, 0.0)),
                creep(7, Vec3::new(1.0, 0.0, 1.0)),
            ],
        );

        let pairs: Vec<(u32, u32)> = out
            .iter()
            .map(|target| (target.tower.get(), target.creep.get()))
            .collect();
        assert_eq!(pairs, vec![(1, 5), (2, 6)]);
    }

    #[test]
    fn paused_matches_clear_output() {
        let mut system = TowerTargeting::new();
        let mut out = vec![TowerTarget {
            tower: EntityId::new(99),
            creep: EntityId::new(99),
            tower_position: Vec3::ZERO,
            creep_position: Vec3::ZERO,
        }];

        system.handle(
            GameStatus {
                in_progress: true,
                paused: true,
            },
            &TowerView::from_snapshots(vec![tower(1, Vec3::ZERO, 5.0)]),
            &CreepView::from_snapshots(vec![creep(2, Vec3::ZERO)]),
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn empty_collections_produce_no_targets() {
        assert!(target_of(Vec::new(), vec![creep(1, Vec3::ZERO)]).is_empty());
        assert!(target_of(vec![tower(1, Vec3::ZERO, 5.0)], Vec::new()).is_empty());
    }
}
