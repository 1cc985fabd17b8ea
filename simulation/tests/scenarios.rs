use std::time::Duration;

use creep_defence_core::{
    BoardPick, BuffKind, CreepKind, EntityId, Event, GameConfig, PlatformId, RemovalReason, SlotId,
    SocketRef, TowerKind, WaveDefinition, WaveIndex, WavePlaylist, WaveSpawnSpec,
};
use creep_defence_simulation::Simulation;
use creep_defence_world::query;

const STEP: Duration = Duration::from_millis(100);

fn single_wave(kind: CreepKind, count: usize, delay: f32, reward: i64) -> WavePlaylist {
    WavePlaylist {
        inter_wave_delay: 5,
        waves: vec![WaveDefinition {
            status_message: "Incoming".to_owned(),
            reward_amount: reward,
            spawns: (0..count).map(|_| WaveSpawnSpec::new(kind, delay)).collect(),
        }],
    }
}

fn heavy_cannons() -> GameConfig {
    let mut config = GameConfig::default();
    for tower in &mut config.towers {
        if tower.kind == TowerKind::Cannon {
            tower.attack_damage = 100;
        }
    }
    config
}

fn build_cannons(sim: &mut Simulation, sockets: u32, out: &mut Vec<Event>) -> Vec<EntityId> {
    sim.select(Some(BoardPick::Slot(SlotId::new(0))), out);
    sim.buy_platform(out);
    for socket in 0..sockets {
        sim.select(
            Some(BoardPick::Socket(SocketRef::new(PlatformId::new(0), socket))),
            out,
        );
        sim.buy_tower(TowerKind::Cannon, out);
    }
    out.iter()
        .filter_map(|event| match event {
            Event::TowerPurchased { tower, .. } => Some(*tower),
            _ => None,
        })
        .collect()
}

/// Ticks until `done` holds or the simulated time limit passes.
fn run_until(
    sim: &mut Simulation,
    limit: Duration,
    log: &mut Vec<(Duration, Event)>,
    done: impl Fn(&Simulation) -> bool,
) {
    while !done(sim) && query::clock(sim.world()) < limit {
        let mut events = Vec::new();
        sim.tick(STEP, &mut events);
        let clock = query::clock(sim.world());
        log.extend(events.into_iter().map(|event| (clock, event)));
    }
}

#[test]
fn three_spawn_wave_completes_after_every_creep_dies() {
    let mut sim = Simulation::new(
        heavy_cannons(),
        Some(single_wave(CreepKind::Grunt, 3, 1.0, 40)),
    );
    let mut setup = Vec::new();
    sim.start_game(&mut setup);
    let towers = build_cannons(&mut sim, 2, &mut setup);
    assert_eq!(towers.len(), 2);
    let money_after_build = query::player(sim.world()).money;

    let mut log = Vec::new();
    let mut numbers = Vec::new();
    while sim.wave_status_message() != "All waves complete!"
        && query::clock(sim.world()) < Duration::from_secs(60)
    {
        let mut events = Vec::new();
        sim.tick(STEP, &mut events);
        numbers.push(sim.current_wave_number());
        let clock = query::clock(sim.world());
        log.extend(events.into_iter().map(|event| (clock, event)));
    }

    assert_eq!(sim.wave_status_message(), "All waves complete!");
    assert!(numbers.iter().all(|&number| number == 1));

    let spawns: Vec<Duration> = log
        .iter()
        .filter(|(_, event)| matches!(event, Event::CreepSpawned { .. }))
        .map(|(clock, _)| *clock)
        .collect();
    assert_eq!(spawns.len(), 3);
    assert_eq!(spawns[0], Duration::from_secs(11));
    assert!(spawns[2] - spawns[0] >= Duration::from_secs(2));

    let removals: Vec<(Duration, RemovalReason)> = log
        .iter()
        .filter_map(|(clock, event)| match event {
            Event::CreepRemoved { reason, .. } => Some((*clock, *reason)),
            _ => None,
        })
        .collect();
    assert_eq!(removals.len(), 3);
    assert!(removals
        .iter()
        .all(|(_, reason)| *reason == RemovalReason::Killed));

    let rewards: Vec<(Duration, i64)> = log
        .iter()
        .filter_map(|(clock, event)| match event {
            Event::WaveRewardPaid { amount, .. } => Some((*clock, *amount)),
            _ => None,
        })
        .collect();
    assert_eq!(rewards.len(), 1);
    assert_eq!(rewards[0].1, 40);
    assert_eq!(rewards[0].0, removals[2].0, "reward pays in the tick of the last death");

    let kill_rewards: i64 = log
        .iter()
        .filter_map(|(_, event)| match event {
            Event::CreepKilled { reward, .. } => Some(*reward),
            _ => None,
        })
        .sum();
    assert_eq!(
        query::player(sim.world()).money,
        money_after_build + kill_rewards + 40
    );
}

#[test]
fn pausing_does_not_shorten_any_delay() {
    let playlist = single_wave(CreepKind::TankGrunt, 3, 1.0, 10);
    let mut steady = Simulation::new(GameConfig::default(), Some(playlist.clone()));
    let mut paused = Simulation::new(GameConfig::default(), Some(playlist));
    let mut sink = Vec::new();
    steady.start_game(&mut sink);
    paused.start_game(&mut sink);

    let mut steady_spawns = Vec::new();
    let mut paused_spawns = Vec::new();
    let mut frames = 0u32;
    let mut pauses = 0;
    let mut resume_at = None;
    while paused_spawns.len() < 3 && frames < 1_000 {
        frames += 1;

        // Pause once during the countdown and once between spawns.
        let countdown_pause = pauses == 0 && frames == 30;
        let spawn_pause = pauses == 1 && paused_spawns.len() == 1;
        if countdown_pause || spawn_pause {
            paused.set_paused(true, &mut sink);
            pauses += 1;
            resume_at = Some(frames + 50);
        }
        if resume_at == Some(frames) {
            paused.set_paused(false, &mut sink);
            resume_at = None;
        }

        let mut events = Vec::new();
        steady.tick(STEP, &mut events);
        let clock = query::clock(steady.world());
        steady_spawns.extend(
            events
                .iter()
                .filter(|event| matches!(event, Event::CreepSpawned { .. }))
                .map(|_| clock),
        );

        events.clear();
        let before = query::clock(paused.world());
        paused.tick(STEP, &mut events);
        if paused.status().paused {
            assert!(events.is_empty());
            assert_eq!(query::clock(paused.world()), before);
        }
        let clock = query::clock(paused.world());
        paused_spawns.extend(
            events
                .iter()
                .filter(|event| matches!(event, Event::CreepSpawned { .. }))
                .map(|_| clock),
        );
    }

    assert_eq!(pauses, 2);
    assert_eq!(paused_spawns.len(), 3);
    assert_eq!(paused_spawns, steady_spawns[..3].to_vec());
}

#[test]
fn cannon_fires_at_most_once_per_cooldown_with_a_crowd_in_range() {
    let mut sim = Simulation::new(
        GameConfig::default(),
        Some(single_wave(CreepKind::TankGrunt, 8, 0.2, 10)),
    );
    let mut setup = Vec::new();
    sim.start_game(&mut setup);
    let towers = build_cannons(&mut sim, 1, &mut setup);
    let cooldown = query::config(sim.world())
        .tower(TowerKind::Cannon)
        .expect("cannon template")
        .attack_cooldown();

    let mut log = Vec::new();
    run_until(&mut sim, Duration::from_secs(20), &mut log, |_| false);

    let fired: Vec<Duration> = log
        .iter()
        .filter_map(|(clock, event)| match event {
            Event::ProjectileFired { tower, .. } if *tower == towers[0] => Some(*clock),
            _ => None,
        })
        .collect();
    assert!(fired.len() > 3);
    for pair in fired.windows(2) {
        assert!(pair[1] - pair[0] > cooldown);
    }
}

#[test]
fn purchases_follow_the_rules_and_the_match_gate() {
    let mut sim = Simulation::new(GameConfig::default(), None);
    let mut events = Vec::new();

    assert!(!sim.can_buy_platform());
    sim.select(Some(BoardPick::Slot(SlotId::new(1))), &mut events);
    assert!(sim.can_buy_platform());

    sim.buy_platform(&mut events);
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::PlatformPurchased { .. })),
        "nothing is sold before the match starts"
    );

    sim.start_game(&mut events);
    sim.buy_platform(&mut events);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::PlatformPurchased { .. })));
    assert_eq!(query::selection(sim.world()), Default::default());
    assert!(!sim.can_buy_platform());

    sim.select(
        Some(BoardPick::Socket(SocketRef::new(PlatformId::new(0), 0))),
        &mut events,
    );
    assert!(sim.can_buy_tower(TowerKind::Bleed));
    assert!(!sim.can_move_platform());

    sim.select(Some(BoardPick::Platform(PlatformId::new(0))), &mut events);
    sim.select(Some(BoardPick::Slot(SlotId::new(2))), &mut events);
    assert!(sim.can_move_platform());
    sim.move_platform(&mut events);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::PlatformMoved {
            from,
            to,
            ..
        } if *from == SlotId::new(1) && *to == SlotId::new(2)
    )));
}

#[test]
fn terminal_commands_reach_the_world() {
    let mut sim = Simulation::new(GameConfig::default(), None);
    let mut events = Vec::new();

    sim.run_terminal("givemoney 50", &mut events);
    assert!(events.is_empty(), "terminal is gated on a running match");

    sim.start_game(&mut events);
    let before = query::player(sim.world()).money;
    sim.run_terminal("givemoney 50", &mut events);
    assert_eq!(query::player(sim.world()).money, before + 50);
    assert_eq!(sim.terminal().history().len(), 2);
}

#[test]
fn terminal_buffs_bleed_their_target() {
    let mut sim = Simulation::new(
        GameConfig::default(),
        Some(single_wave(CreepKind::TankGrunt, 1, 0.0, 10)),
    );
    let mut events = Vec::new();
    sim.start_game(&mut events);

    let mut log = Vec::new();
    run_until(&mut sim, Duration::from_secs(30), &mut log, |sim| {
        !query::creep_view(sim.world()).is_empty()
    });
    let creep = query::creep_view(sim.world())
        .get(0)
        .copied()
        .expect("creep spawned");

    sim.run_terminal("give_buff creep 0 bleed", &mut events);
    assert!(sim.buffs().is_active(creep.id, BuffKind::Bleed));
    assert_eq!(
        query::buff_markers(sim.world(), creep.id),
        vec![BuffKind::Bleed]
    );

    for _ in 0..10 {
        sim.tick(STEP, &mut events);
    }
    let health = query::creep_view(sim.world())
        .get(0)
        .map(|snapshot| snapshot.health)
        .expect("creep still walking");
    assert_eq!(health, creep.health - 3);
}

#[test]
fn missing_playlist_reports_an_idle_scheduler() {
    let mut sim = Simulation::new(GameConfig::default(), None);
    let mut events = Vec::new();
    sim.start_game(&mut events);
    for _ in 0..200 {
        sim.tick(STEP, &mut events);
    }

    assert_eq!(sim.wave_status_message(), "");
    assert_eq!(sim.current_wave_number(), 0);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::CreepSpawned { .. })));
}

#[test]
fn inert_board_rejects_spawns_without_stopping_the_schedule() {
    let mut sim = Simulation::new(
        GameConfig::inert(),
        Some(single_wave(CreepKind::Grunt, 2, 0.5, 10)),
    );
    let mut events = Vec::new();
    sim.start_game(&mut events);

    let mut log = Vec::new();
    run_until(&mut sim, Duration::from_secs(30), &mut log, |sim| {
        sim.wave_status_message() == "All waves complete!"
    });

    let rejected = log
        .iter()
        .filter(|(_, event)| matches!(event, Event::CreepSpawnRejected { .. }))
        .count();
    assert_eq!(rejected, 2);
    assert_eq!(sim.wave_status_message(), "All waves complete!");
}

#[test]
fn a_leak_that_ends_the_match_pays_no_wave_reward() {
    let mut config = GameConfig::default();
    config.player.starting_health = 1;
    let mut sim = Simulation::new(config, Some(single_wave(CreepKind::Grunt, 1, 0.0, 50)));
    let mut setup = Vec::new();
    sim.start_game(&mut setup);
    let money = query::player(sim.world()).money;

    let mut log = Vec::new();
    run_until(&mut sim, Duration::from_secs(90), &mut log, |sim| {
        !sim.status().in_progress
    });

    assert!(log
        .iter()
        .any(|(_, event)| matches!(event, Event::GameOver)));
    assert!(!sim.status().in_progress);
    assert!(!log
        .iter()
        .any(|(_, event)| matches!(event, Event::WaveRewardPaid { .. })));
    assert_eq!(query::player(sim.world()).money, money);
    assert!(!sim.scheduler().reward_given(WaveIndex::new(0)));
    assert_ne!(sim.wave_status_message(), "All waves complete!");

    let mut after = Vec::new();
    sim.tick(STEP, &mut after);
    assert!(after.is_empty());
}
