#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Purchase rules for platforms and towers.
//!
//! The predicates are pure functions of the selection, the board topology and
//! the player's funds. The [`Economy`] system turns purchase requests into
//! world commands, and the world re-validates with the same predicates before
//! it mutates anything.

use creep_defence_core::{
    BoardPick, BoardSnapshot, Command, Event, GameStatus, PlatformId, PlayerSnapshot, PriceList,
    PurchaseAction, PurchaseError, Selection, SlotId, SocketRef,
};
use tracing::debug;

/// Read-only inputs every purchase rule is evaluated against.
#[derive(Clone, Copy, Debug)]
pub struct PurchaseContext<'a> {
    /// Current and previous picks.
    pub selection: Selection,
    /// Board topology.
    pub board: &'a BoardSnapshot,
    /// Player funds and health.
    pub player: PlayerSnapshot,
    /// Prices charged for purchases.
    pub prices: &'a PriceList,
}

/// Platform relocation resolved from the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformMove {
    /// Platform that moves.
    pub platform: PlatformId,
    /// Open slot the platform moves onto.
    pub to: SlotId,
}

/// Validates buying a platform for the current pick.
pub fn evaluate_platform_purchase(context: &PurchaseContext<'_>) -> Result<SlotId, PurchaseError> {
    let slot = match context.selection.current {
        Some(BoardPick::Slot(slot)) if context.board.is_open_slot(slot) => slot,
        _ => return Err(PurchaseError::InvalidSelection),
    };

    let capacity = usize::try_from(context.board.max_platforms).unwrap_or(usize::MAX);
    if context.board.platform_count() >= capacity {
        return Err(PurchaseError::CapacityReached);
    }

    afford(context.player, context.prices.platform)?;
    Ok(slot)
}

/// Validates buying a tower costing `cost` for the current pick.
pub fn evaluate_tower_purchase(
    context: &PurchaseContext<'_>,
    cost: i64,
) -> Result<SocketRef, PurchaseError> {
    let Some(BoardPick::Socket(socket)) = context.selection.current else {
        return Err(PurchaseError::InvalidSelection);
    };

    match context.board.socket(socket) {
        None => return Err(PurchaseError::InvalidSelection),
        Some(Some(_)) => return Err(PurchaseError::SocketOccupied),
        Some(None) => {}
    }

    afford(context.player, cost)?;
    Ok(socket)
}

/// Validates moving a platform between the current and previous picks.
///
/// Either order is accepted: platform then open slot, or open slot then
/// platform.
pub fn evaluate_platform_move(
    context: &PurchaseContext<'_>,
) -> Result<PlatformMove, PurchaseError> {
    let Selection { current, previous } = context.selection;
    let (platform, to) = match (current, previous) {
        (Some(BoardPick::Platform(platform)), Some(BoardPick::Slot(slot)))
        | (Some(BoardPick::Slot(slot)), Some(BoardPick::Platform(platform))) => (platform, slot),
        _ => return Err(PurchaseError::InvalidSelection),
    };

    if context.board.platform(platform).is_none() || !context.board.is_open_slot(to) {
        return Err(PurchaseError::InvalidSelection);
    }

    afford(context.player, context.prices.move_platform)?;
    Ok(PlatformMove { platform, to })
}

/// Reports whether a platform can be bought for the current pick.
#[must_use]
pub fn can_buy_platform(context: &PurchaseContext<'_>) -> bool {
    evaluate_platform_purchase(context).is_ok()
}

/// Reports whether a tower costing `cost` can be bought for the current pick.
#[must_use]
pub fn can_buy_tower(context: &PurchaseContext<'_>, cost: i64) -> bool {
    evaluate_tower_purchase(context, cost).is_ok()
}

/// Reports whether the picked platform can be moved onto the picked slot.
#[must_use]
pub fn can_move_platform(context: &PurchaseContext<'_>) -> bool {
    evaluate_platform_move(context).is_ok()
}

/// Validates any purchase action.
pub fn evaluate(context: &PurchaseContext<'_>, action: PurchaseAction) -> Result<(), PurchaseError> {
    match action {
        PurchaseAction::BuyPlatform => evaluate_platform_purchase(context).map(|_| ()),
        PurchaseAction::BuyTower(kind) => {
            evaluate_tower_purchase(context, context.prices.tower(kind)).map(|_| ())
        }
        PurchaseAction::MovePlatform => evaluate_platform_move(context).map(|_| ()),
    }
}

fn afford(player: PlayerSnapshot, cost: i64) -> Result<(), PurchaseError> {
    if player.money >= cost {
        Ok(())
    } else {
        Err(PurchaseError::InsufficientFunds)
    }
}

/// System that translates purchase requests into world commands.
#[derive(Debug, Default, Clone)]
pub struct Economy {
    status: GameStatus,
}

impl Economy {
    /// Creates a new economy system instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks the match gate from world events without evaluating purchases.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            if let Event::GameStatusChanged { status } = event {
                self.status = *status;
            }
        }
    }

    /// Match gate as last observed.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Consumes world events and a pending request to emit purchase commands.
    ///
    /// Requests that fail validation are dropped with a log line.
    pub fn handle(
        &mut self,
        events: &[Event],
        request: Option<PurchaseAction>,
        context: &PurchaseContext<'_>,
        out: &mut Vec<Command>,
    ) {
        self.observe(events);

        let Some(action) = request else {
            return;
        };

        if !self.status.is_running() {
            debug!(?action, "purchase ignored outside a running match");
            return;
        }

        if let Err(reason) = evaluate(context, action) {
            debug!(?action, ?reason, "purchase request rejected");
            return;
        }

        out.push(match action {
            PurchaseAction::BuyPlatform => Command::BuyPlatform,
            PurchaseAction::BuyTower(kind) => Command::BuyTower { kind },
            PurchaseAction::MovePlatform => Command::MovePlatform,
        });
    }
}
