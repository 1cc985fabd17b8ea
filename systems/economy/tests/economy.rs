use creep_defence_core::{
    BoardPick, BoardSnapshot, Command, EntityId, Event, GameStatus, PlatformId, PlatformSnapshot,
    PlayerSnapshot, PriceList, PurchaseAction, PurchaseError, Selection, SlotId, SlotSnapshot,
    SocketRef, TowerKind, Vec3,
};
use creep_defence_system_economy::{
    can_buy_platform, can_buy_tower, can_move_platform, evaluate_platform_move,
    evaluate_platform_purchase, evaluate_tower_purchase, Economy, PlatformMove, PurchaseContext,
};

/// Two slots, slot 0 carries platform 0 with an occupied and an empty socket.
fn board(max_platforms: u32) -> BoardSnapshot {
    BoardSnapshot {
        slots: vec![
            SlotSnapshot {
                id: SlotId::new(0),
                position: Vec3::ZERO,
                platform: Some(PlatformId::new(0)),
            },
            SlotSnapshot {
                id: SlotId::new(1),
                position: Vec3::new(4.0, 0.0, 0.0),
                platform: None,
            },
        ],
        platforms: vec![PlatformSnapshot {
            id: PlatformId::new(0),
            slot: SlotId::new(0),
            sockets: vec![Some(EntityId::new(9)), None],
        }],
        max_platforms,
    }
}

fn selection(picks: &[BoardPick]) -> Selection {
    picks
        .iter()
        .fold(Selection::default(), |selection, pick| selection.pick(Some(*pick)))
}

fn player(money: i64) -> PlayerSnapshot {
    PlayerSnapshot { money, health: 10 }
}

fn open_slot() -> BoardPick {
    BoardPick::Slot(SlotId::new(1))
}

#[test]
fn platform_purchase_requires_all_three_conditions() {
    let prices = PriceList::default();
    let roomy = board(2);
    let full = board(1);

    let valid = PurchaseContext {
        selection: selection(&[open_slot()]),
        board: &roomy,
        player: player(prices.platform),
        prices: &prices,
    };
    assert!(can_buy_platform(&valid));
    assert_eq!(evaluate_platform_purchase(&valid), Ok(SlotId::new(1)));

    let occupied_slot = PurchaseContext {
        selection: selection(&[BoardPick::Slot(SlotId::new(0))]),
        ..valid
    };
    assert!(!can_buy_platform(&occupied_slot));

    let wrong_kind = PurchaseContext {
        selection: selection(&[BoardPick::Platform(PlatformId::new(0))]),
        ..valid
    };
    assert!(!can_buy_platform(&wrong_kind));

    let at_capacity = PurchaseContext {
        board: &full,
        ..valid
    };
    assert_eq!(
        evaluate_platform_purchase(&at_capacity),
        Err(PurchaseError::CapacityReached)
    );

    let broke = PurchaseContext {
        player: player(prices.platform - 1),
        ..valid
    };
    assert_eq!(
        evaluate_platform_purchase(&broke),
        Err(PurchaseError::InsufficientFunds)
    );
}

#[test]
fn tower_purchase_needs_an_empty_socket_on_a_platform() {
    let prices = PriceList::default();
    let board = board(2);
    let empty_socket = SocketRef::new(PlatformId::new(0), 1);

    let valid = PurchaseContext {
        selection: selection(&[BoardPick::Socket(empty_socket)]),
        board: &board,
        player: player(50),
        prices: &prices,
    };
    assert!(can_buy_tower(&valid, 50));
    assert!(!can_buy_tower(&valid, 51));

    let occupied = PurchaseContext {
        selection: selection(&[BoardPick::Socket(SocketRef::new(PlatformId::new(0), 0))]),
        ..valid
    };
    assert_eq!(
        evaluate_tower_purchase(&occupied, 10),
        Err(PurchaseError::SocketOccupied)
    );

    let dangling = PurchaseContext {
        selection: selection(&[BoardPick::Socket(SocketRef::new(PlatformId::new(4), 0))]),
        ..valid
    };
    assert_eq!(
        evaluate_tower_purchase(&dangling, 10),
        Err(PurchaseError::InvalidSelection)
    );
}

#[test]
fn platform_moves_accept_either_pick_order() {
    let prices = PriceList::default();
    let board = board(2);
    let platform = BoardPick::Platform(PlatformId::new(0));
    let expected = PlatformMove {
        platform: PlatformId::new(0),
        to: SlotId::new(1),
    };

    for picks in [[platform, open_slot()], [open_slot(), platform]] {
        let context = PurchaseContext {
            selection: selection(&picks),
            board: &board,
            player: player(prices.move_platform),
            prices: &prices,
        };
        assert_eq!(evaluate_platform_move(&context), Ok(expected));
    }

    let onto_occupied = PurchaseContext {
        selection: selection(&[platform, BoardPick::Slot(SlotId::new(0))]),
        board: &board,
        player: player(1_000),
        prices: &prices,
    };
    assert!(!can_move_platform(&onto_occupied));

    let broke = PurchaseContext {
        selection: selection(&[platform, open_slot()]),
        board: &board,
        player: player(prices.move_platform - 1),
        prices: &prices,
    };
    assert_eq!(
        evaluate_platform_move(&broke),
        Err(PurchaseError::InsufficientFunds)
    );
}

#[test]
fn economy_only_emits_commands_while_running() {
    let prices = PriceList::default();
    let board = board(2);
    let context = PurchaseContext {
        selection: selection(&[open_slot()]),
        board: &board,
        player: player(1_000),
        prices: &prices,
    };

    let mut economy = Economy::new();
    let mut commands = Vec::new();
    economy.handle(&[], Some(PurchaseAction::BuyPlatform), &context, &mut commands);
    assert!(commands.is_empty(), "no match in progress yet");

    let running = GameStatus {
        in_progress: true,
        paused: false,
    };
    economy.handle(
        &[Event::GameStatusChanged { status: running }],
        Some(PurchaseAction::BuyPlatform),
        &context,
        &mut commands,
    );
    assert_eq!(commands, vec![Command::BuyPlatform]);

    commands.clear();
    economy.handle(
        &[],
        Some(PurchaseAction::BuyTower(TowerKind::Cannon)),
        &context,
        &mut commands,
    );
    assert!(commands.is_empty(), "a slot pick cannot receive a tower");
}
