use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use creep_defence_core::{
    BoardPick, Command, CreepKind, EntityId, Event, PlatformId, SlotId, SocketRef, TowerKind,
    TowerTarget, Vec3, WaveIndex,
};
use creep_defence_system_tower_targeting::TowerTargeting;
use creep_defence_world::{self as world, query, World};

#[test]
fn deterministic_replay_prefers_roster_order_and_clears_on_pause() {
    let script = scripted_commands();
    let script_len = script.len();
    let first = replay(script.clone());
    let second = replay(script);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.assignments.len(), script_len);

    let spawn_ids: Vec<_> = first
        .events
        .iter()
        .filter_map(|event| match event {
            Event::CreepSpawned { creep, .. } => Some(*creep),
            _ => None,
        })
        .collect();
    assert_eq!(spawn_ids.len(), 2, "expected exactly two spawn events");
    let expected_creep = spawn_ids
        .iter()
        .copied()
        .min()
        .expect("spawn_ids contains entries");

    for before_spawn in &first.assignments[..5] {
        assert!(before_spawn.targets.is_empty());
    }

    for index in 5..8 {
        let snapshot = &first.assignments[index];
        assert_eq!(snapshot.targets.len(), 1, "snapshot {index}");
        assert_eq!(snapshot.targets[0].creep, expected_creep);
    }

    let paused = &first.assignments[8];
    assert!(paused.targets.is_empty(), "pausing must clear targets");
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let mut targeting = TowerTargeting::new();
    let mut current_targets = Vec::new();
    let mut assignments = Vec::new();
    let mut events = Vec::new();

    for command in commands {
        let mut generated = Vec::new();
        world::apply(&mut world, command, &mut generated);
        events.extend(generated);

        targeting.handle(
            query::game_status(&world),
            &query::tower_view(&world),
            &query::creep_view(&world),
            &mut current_targets,
        );

        assignments.push(TargetSnapshot::from(&current_targets));
    }

    ReplayOutcome {
        events,
        assignments,
    }
}

fn scripted_commands() -> Vec<Command> {
    let spawn = Command::SpawnCreep {
        kind: CreepKind::Grunt,
        wave: WaveIndex::new(0),
    };

    vec![
        Command::SetGameInProgress { in_progress: true },
        Command::Select {
            pick: Some(BoardPick::Slot(SlotId::new(0))),
        },
        Command::BuyPlatform,
        Command::Select {
            pick: Some(BoardPick::Socket(SocketRef::new(PlatformId::new(0), 0))),
        },
        Command::BuyTower {
            kind: TowerKind::Cannon,
        },
        spawn.clone(),
        spawn,
        Command::Tick {
            dt: Duration::from_secs(1),
        },
        Command::SetPaused { paused: true },
    ]
}

#[derive(Clone, Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    assignments: Vec<TargetSnapshot>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for event in &self.events {
            format!("{event:?}").hash(&mut hasher);
        }
        self.assignments.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TargetSnapshot {
    targets: Vec<TargetRecord>,
}

impl TargetSnapshot {
    fn from(targets: &[TowerTarget]) -> Self {
        Self {
            targets: targets.iter().map(TargetRecord::from).collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct TargetRecord {
    tower: EntityId,
    creep: EntityId,
    tower_position: HalfUnitPoint,
    creep_position: HalfUnitPoint,
}

impl From<&TowerTarget> for TargetRecord {
    fn from(target: &TowerTarget) -> Self {
        Self {
            tower: target.tower,
            creep: target.creep,
            tower_position: HalfUnitPoint::from(target.tower_position),
            creep_position: HalfUnitPoint::from(target.creep_position),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct HalfUnitPoint {
    x_twice: i32,
    y_twice: i32,
    z_twice: i32,
}

impl From<Vec3> for HalfUnitPoint {
    fn from(point: Vec3) -> Self {
        Self {
            x_twice: to_half_unit(point.x),
            y_twice: to_half_unit(point.y),
            z_twice: to_half_unit(point.z),
        }
    }
}

fn to_half_unit(value: f32) -> i32 {
    (value * 2.0).round() as i32
}
