use creep_defence_core::{
    BoardPick, BuffKind, Command, CreepKind, EntityId, Event, PlatformId, SlotId, SocketRef,
    TowerKind, WaveIndex,
};
use creep_defence_system_terminal::{format_row, OutputKind, Terminal, TerminalContext};
use creep_defence_world::{self as world, query, World};

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn prepared_world() -> (World, EntityId, EntityId) {
    let mut world = World::new();
    let _ = run(&mut world, Command::SetGameInProgress { in_progress: true });
    let _ = run(
        &mut world,
        Command::Select {
            pick: Some(BoardPick::Slot(SlotId::new(0))),
        },
    );
    let _ = run(&mut world, Command::BuyPlatform);
    let _ = run(
        &mut world,
        Command::Select {
            pick: Some(BoardPick::Socket(SocketRef::new(PlatformId::new(0), 1))),
        },
    );
    let tower = run(
        &mut world,
        Command::BuyTower {
            kind: TowerKind::Bleed,
        },
    )
    .iter()
    .find_map(|event| match event {
        Event::TowerPurchased { tower, .. } => Some(*tower),
        _ => None,
    })
    .expect("tower purchased");
    let creep = run(
        &mut world,
        Command::SpawnCreep {
            kind: CreepKind::FastGrunt,
            wave: WaveIndex::new(0),
        },
    )
    .iter()
    .find_map(|event| match event {
        Event::CreepSpawned { creep, .. } => Some(*creep),
        _ => None,
    })
    .expect("creep spawned");
    (world, tower, creep)
}

fn type_line(terminal: &mut Terminal, world: &World, line: &str) -> Vec<Command> {
    let creeps = query::creep_view(world);
    let towers = query::tower_view(world);
    let context = TerminalContext {
        status: query::game_status(world),
        creeps: &creeps,
        towers: &towers,
    };
    let mut commands = Vec::new();
    terminal.run(line, context, &mut commands);
    commands
}

fn last_line(terminal: &Terminal) -> (OutputKind, String) {
    let line = terminal.output().last().expect("terminal wrote output");
    (line.kind, line.text.clone())
}

#[test]
fn give_money_adjusts_the_balance() {
    let (mut world, _, _) = prepared_world();
    let mut terminal = Terminal::new();
    let before = query::player(&world).money;

    let commands = type_line(&mut terminal, &world, "givemoney 100");
    assert_eq!(commands, vec![Command::AdjustMoney { amount: 100 }]);
    assert_eq!(
        last_line(&terminal),
        (OutputKind::Info, "Giving player $100".to_owned())
    );

    for command in commands {
        let _ = run(&mut world, command);
    }
    assert_eq!(query::player(&world).money, before + 100);
}

#[test]
fn give_health_accepts_its_alias_and_defaults_to_zero() {
    let (world, _, _) = prepared_world();
    let mut terminal = Terminal::new();

    let commands = type_line(&mut terminal, &world, "givehealth");
    assert_eq!(commands, vec![Command::AdjustHealth { amount: 0 }]);

    let commands = type_line(&mut terminal, &world, "give_health -3");
    assert_eq!(commands, vec![Command::AdjustHealth { amount: -3 }]);
}

#[test]
fn unparsable_amounts_report_usage() {
    let (world, _, _) = prepared_world();
    let mut terminal = Terminal::new();

    let commands = type_line(&mut terminal, &world, "give_money lots");
    assert!(commands.is_empty());
    assert_eq!(
        last_line(&terminal),
        (
            OutputKind::Error,
            "'lots' could not be parsed to an integer, Usage: 'givemoney 100'".to_owned()
        )
    );
}

#[test]
fn commands_refuse_to_run_while_paused() {
    let (mut world, _, _) = prepared_world();
    let _ = run(&mut world, Command::SetPaused { paused: true });
    let mut terminal = Terminal::new();

    for line in ["givemoney 5", "give_health 5", "give_buff creep 0 bleed", "list_creeps"] {
        assert!(type_line(&mut terminal, &world, line).is_empty());
        assert_eq!(last_line(&terminal).0, OutputKind::Error, "{line}");
    }
}

#[test]
fn give_buff_targets_creeps_by_roster_index() {
    let (mut world, _, creep) = prepared_world();
    let mut terminal = Terminal::new();

    let commands = type_line(&mut terminal, &world, "give_buff creep 0 bleed");
    assert_eq!(
        commands,
        vec![Command::RequestBuff {
            target: creep,
            kind: BuffKind::Bleed
        }]
    );
    assert_eq!(
        last_line(&terminal),
        (
            OutputKind::Info,
            "Applying buff 'bleed' to creep 'FastGrunt'".to_owned()
        )
    );

    let events = run(&mut world, commands[0].clone());
    assert_eq!(
        events,
        vec![Event::BuffRequested {
            target: creep,
            kind: BuffKind::Bleed
        }]
    );
}

#[test]
fn give_buff_targets_towers_by_platform_and_socket() {
    let (world, tower, _) = prepared_world();
    let mut terminal = Terminal::new();

    let commands = type_line(&mut terminal, &world, "givebuff tower 0,1 bleed");
    assert_eq!(
        commands,
        vec![Command::RequestBuff {
            target: tower,
            kind: BuffKind::Bleed
        }]
    );

    assert!(type_line(&mut terminal, &world, "givebuff tower 0,0 bleed").is_empty());
    assert_eq!(
        last_line(&terminal),
        (OutputKind::Error, "Invalid target, cannot give buff".to_owned())
    );
}

#[test]
fn give_buff_reports_bad_arguments() {
    let (world, _, _) = prepared_world();
    let mut terminal = Terminal::new();

    assert!(type_line(&mut terminal, &world, "give_buff creep 0").is_empty());
    assert_eq!(
        last_line(&terminal).1,
        "Invalid number of arguments, run 'help' for more details"
    );

    assert!(type_line(&mut terminal, &world, "give_buff creep 9 bleed").is_empty());
    let errors: Vec<String> = terminal
        .output()
        .lines()
        .filter(|line| line.kind == OutputKind::Error)
        .map(|line| line.text.clone())
        .collect();
    assert!(errors.contains(&"Creep ID '9' does not exist".to_owned()));
    assert_eq!(last_line(&terminal).1, "Invalid target, cannot give buff");

    assert!(type_line(&mut terminal, &world, "give_buff creep 0 frost").is_empty());
    assert_eq!(last_line(&terminal).1, "Buff 'frost' does not exist");
}

#[test]
fn listings_print_a_header_and_one_row_per_piece() {
    let (world, _, _) = prepared_world();
    let mut terminal = Terminal::new();

    let _ = type_line(&mut terminal, &world, "listcreeps");
    let lines: Vec<_> = terminal.output().lines().cloned().collect();
    assert_eq!(lines[0].kind, OutputKind::InputRecord);
    assert_eq!(
        lines[1].text,
        format_row("Creep Type", "Creep ID", "Creep Health")
    );
    assert_eq!(lines[2].text, format_row("FastGrunt", "0", "6/6"));

    terminal.clear_output();
    let _ = type_line(&mut terminal, &world, "list_tower");
    let rows: Vec<_> = terminal.output().lines().skip(2).cloned().collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].text, format_row("BleedTower", "0", "1"));
}

#[test]
fn help_lists_every_command_and_unknown_names_error() {
    let (world, _, _) = prepared_world();
    let mut terminal = Terminal::new();

    let _ = type_line(&mut terminal, &world, "help");
    let info_rows = terminal
        .output()
        .lines()
        .filter(|line| line.kind == OutputKind::Info)
        .count();
    assert_eq!(info_rows, 6);

    let _ = type_line(&mut terminal, &world, "fly");
    assert_eq!(
        last_line(&terminal),
        (OutputKind::Error, "Command 'fly' does not exist".to_owned())
    );

    let _ = type_line(&mut terminal, &world, "   ");
    let _ = type_line(&mut terminal, &world, "`");
    assert_eq!(terminal.history(), ["help".to_owned(), "fly".to_owned()]);
}
