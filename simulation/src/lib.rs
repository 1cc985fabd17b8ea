#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick orchestration of the world and every gameplay system.
//!
//! The simulation owns the world and feeds it commands produced by the
//! systems in a fixed order. Adapters drive it with [`Simulation::tick`] and
//! the player-facing operations, and observe the resulting events.

mod loading;

use std::time::Duration;

use creep_defence_core::{
    BoardPick, BoardSnapshot, Command, Event, GameConfig, GameStatus, PurchaseAction,
    TowerKind, TowerTarget, WavePlaylist,
};
use creep_defence_system_buffs::BuffEngine;
use creep_defence_system_economy::{
    can_buy_platform, can_buy_tower, can_move_platform, Economy, PurchaseContext,
};
use creep_defence_system_terminal::{Terminal, TerminalContext};
use creep_defence_system_tower_combat::TowerCombat;
use creep_defence_system_tower_targeting::TowerTargeting;
use creep_defence_system_wave_scheduler::{Config as SchedulerConfig, WaveScheduler};
use creep_defence_world::{self as world, query, World};
use tracing::{debug, info};

pub use loading::{
    config_or_inert, load_config, load_playlist, parse_config, playlist_or_none, LoadError,
};

/// World plus every system, advanced together one tick at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    scheduler: WaveScheduler,
    targeting: TowerTargeting,
    combat: TowerCombat,
    buffs: BuffEngine,
    economy: Economy,
    terminal: Terminal,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Creates a simulation from a configuration and an optional playlist.
    #[must_use]
    pub fn new(config: GameConfig, playlist: Option<WavePlaylist>) -> Self {
        Self::with_scheduler(config, SchedulerConfig::new(playlist))
    }

    /// Creates a simulation with explicit scheduler parameters.
    #[must_use]
    pub fn with_scheduler(config: GameConfig, scheduler: SchedulerConfig) -> Self {
        Self {
            world: World::with_config(config),
            scheduler: WaveScheduler::new(scheduler),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            buffs: BuffEngine::new(),
            economy: Economy::new(),
            terminal: Terminal::new(),
            targets: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the wave scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &WaveScheduler {
        &self.scheduler
    }

    /// Read-only access to the buff engine.
    #[must_use]
    pub fn buffs(&self) -> &BuffEngine {
        &self.buffs
    }

    /// Read-only access to the developer terminal.
    #[must_use]
    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    /// Current match gate.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        query::game_status(&self.world)
    }

    /// Banner greeting the player.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Marks the match as in progress and starts the wave playlist.
    pub fn start_game(&mut self, out: &mut Vec<Event>) {
        self.submit(Command::SetGameInProgress { in_progress: true }, out);
        if self.scheduler.start() {
            info!("wave playlist started");
        } else {
            debug!("wave playlist not started");
        }
    }

    /// Pauses or resumes the match.
    pub fn set_paused(&mut self, paused: bool, out: &mut Vec<Event>) {
        self.submit(Command::SetPaused { paused }, out);
    }

    /// Advances the match by `dt`.
    ///
    /// Nothing happens unless the match is in progress and not paused, so
    /// paused frames never count towards any timer. A step that ends the
    /// match stops the rest of the tick.
    pub fn tick(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if !self.status().is_running() {
            return;
        }

        let first = out.len();
        self.submit(Command::Tick { dt }, out);
        if !self.status().is_running() {
            return;
        }
        self.spawn_next_wave_tick(first, out);
        if !self.status().is_running() {
            return;
        }
        self.tick_combat(dt, out);
        if !self.status().is_running() {
            return;
        }
        self.tick_buffs(first, out);
        if !self.status().is_running() {
            return;
        }
        self.pay_wave_rewards(out);
    }

    fn spawn_next_wave_tick(&mut self, first: usize, out: &mut Vec<Event>) {
        self.scheduler.handle(&out[first..], &mut self.commands);
        self.flush(out);
    }

    fn tick_combat(&mut self, dt: Duration, out: &mut Vec<Event>) {
        let status = self.status();
        self.targeting.handle(
            status,
            &query::tower_view(&self.world),
            &query::creep_view(&self.world),
            &mut self.targets,
        );
        self.combat.handle(
            status,
            query::tower_cooldowns(&self.world),
            &self.targets,
            &mut self.commands,
        );
        self.commands.push(Command::AdvanceProjectiles { dt });
        self.flush(out);
    }

    fn tick_buffs(&mut self, first: usize, out: &mut Vec<Event>) {
        let world = &self.world;
        self.buffs.handle(
            &out[first..],
            |id| query::is_alive(world, id),
            &mut self.commands,
        );
        self.flush(out);
    }

    fn pay_wave_rewards(&mut self, out: &mut Vec<Event>) {
        self.scheduler
            .pay_rewards(&query::creep_view(&self.world), &mut self.commands);
        self.flush(out);
    }

    /// Records a new pick on the board.
    pub fn select(&mut self, pick: Option<BoardPick>, out: &mut Vec<Event>) {
        self.submit(Command::Select { pick }, out);
    }

    /// Reports whether the current selection allows buying a platform.
    #[must_use]
    pub fn can_buy_platform(&self) -> bool {
        let board = query::board(&self.world);
        can_buy_platform(&self.purchase_context(&board))
    }

    /// Reports whether the current selection allows buying the tower kind.
    #[must_use]
    pub fn can_buy_tower(&self, kind: TowerKind) -> bool {
        let board = query::board(&self.world);
        let cost = query::config(&self.world).prices.tower(kind);
        can_buy_tower(&self.purchase_context(&board), cost)
    }

    /// Reports whether the current selection allows moving a platform.
    #[must_use]
    pub fn can_move_platform(&self) -> bool {
        let board = query::board(&self.world);
        can_move_platform(&self.purchase_context(&board))
    }

    /// Buys a platform on the selected slot if the rules allow it.
    pub fn buy_platform(&mut self, out: &mut Vec<Event>) {
        self.purchase(PurchaseAction::BuyPlatform, out);
    }

    /// Buys a tower for the selected socket if the rules allow it.
    pub fn buy_tower(&mut self, kind: TowerKind, out: &mut Vec<Event>) {
        self.purchase(PurchaseAction::BuyTower(kind), out);
    }

    /// Moves the selected platform to the selected slot if the rules allow it.
    pub fn move_platform(&mut self, out: &mut Vec<Event>) {
        self.purchase(PurchaseAction::MovePlatform, out);
    }

    fn purchase(&mut self, action: PurchaseAction, out: &mut Vec<Event>) {
        let board = query::board(&self.world);
        let context = PurchaseContext {
            selection: query::selection(&self.world),
            board: &board,
            player: query::player(&self.world),
            prices: &query::config(&self.world).prices,
        };
        self.economy
            .handle(&[], Some(action), &context, &mut self.commands);
        self.flush(out);
    }

    fn purchase_context<'a>(&'a self, board: &'a BoardSnapshot) -> PurchaseContext<'a> {
        PurchaseContext {
            selection: query::selection(&self.world),
            board,
            player: query::player(&self.world),
            prices: &query::config(&self.world).prices,
        }
    }

    /// Runs a developer terminal line and applies the commands it produced.
    pub fn run_terminal(&mut self, line: &str, out: &mut Vec<Event>) {
        let creeps = query::creep_view(&self.world);
        let towers = query::tower_view(&self.world);
        let context = TerminalContext {
            status: self.status(),
            creeps: &creeps,
            towers: &towers,
        };
        let first = out.len();
        self.terminal.run(line, context, &mut self.commands);
        self.flush(out);
        self.tick_buffs(first, out);
    }

    /// Drops the terminal scrollback once an adapter has shown it.
    pub fn clear_terminal_output(&mut self) {
        self.terminal.clear_output();
    }

    /// Message describing wave progress for the HUD.
    #[must_use]
    pub fn wave_status_message(&self) -> String {
        self.scheduler.status_message()
    }

    /// One-based number of the current wave, zero without a playlist.
    #[must_use]
    pub fn current_wave_number(&self) -> u32 {
        self.scheduler.current_wave_number()
    }

    fn submit(&mut self, command: Command, out: &mut Vec<Event>) {
        self.commands.push(command);
        self.flush(out);
    }

    /// Applies every queued command in order and lets the economy observe
    /// the resulting status changes.
    fn flush(&mut self, out: &mut Vec<Event>) {
        let first = out.len();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out);
        }
        self.economy.observe(&out[first..]);
    }
}
