#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Creep Defence.
//!
//! The world owns the creep roster, the towers seated on the board, the
//! projectiles in flight and the player's resources. Every mutation arrives as
//! a [`Command`] through [`apply`], and every observable outcome leaves as an
//! [`Event`].

mod board;
mod entity;
mod player;
mod projectiles;
mod roster;
mod towers;

use std::time::Duration;

use creep_defence_core::{
    BoardSnapshot, BuffKind, Command, CreepKind, DamageSource, EntityId, EntityKind, Event,
    GameConfig, PurchaseAction, PurchaseError, RemovalReason, Selection, TowerKind,
    Vec3, WaveIndex, WELCOME_BANNER,
};
use creep_defence_system_economy::{
    evaluate_platform_move, evaluate_platform_purchase, evaluate_tower_purchase, PurchaseContext,
};
use tracing::{debug, info, warn};

use board::Board;
use entity::{DamageOutcome, Entity};
use player::Player;
use projectiles::{Flight, ProjectileField};
use roster::{Creep, CreepRoster};
use towers::{Tower, TowerRegistry};

/// Represents the authoritative Creep Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    clock: Duration,
    player: Player,
    board: Board,
    creeps: CreepRoster,
    towers: TowerRegistry,
    projectiles: ProjectileField,
    next_entity_id: u32,
}

impl World {
    /// Creates a new world using the built-in configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    /// Creates a new world from the provided configuration.
    ///
    /// The configuration is taken as-is; callers validate it beforehand.
    #[must_use]
    pub fn with_config(config: GameConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            player: Player::new(&config.player),
            board: Board::new(&config.board),
            creeps: CreepRoster::default(),
            towers: TowerRegistry::default(),
            projectiles: ProjectileField::default(),
            clock: Duration::ZERO,
            next_entity_id: 0,
            config,
        }
    }

    fn allocate_entity_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.saturating_add(1);
        id
    }

    fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.creeps
            .get(id)
            .map(|creep| &creep.entity)
            .or_else(|| self.towers.get(id).map(|tower| &tower.entity))
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if let Some(creep) = self.creeps.get_mut(id) {
            return Some(&mut creep.entity);
        }
        self.towers.get_mut(id).map(|tower| &mut tower.entity)
    }

    fn live_position(&self, id: EntityId) -> Option<Vec3> {
        self.entity(id)
            .filter(|entity| entity.is_alive())
            .map(|entity| entity.position)
    }

    fn purchase_context<'a>(&'a self, board: &'a BoardSnapshot) -> PurchaseContext<'a> {
        PurchaseContext {
            selection: self.player.selection,
            board,
            player: self.player.snapshot(),
            prices: &self.config.prices,
        }
    }

    fn advance_creeps(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let tolerance = self.config.board.waypoint_tolerance;
        let mut escaped = Vec::new();
        for creep in self.creeps.iter_mut() {
            if creep.walk(&self.config.board.path, dt, tolerance) {
                escaped.push((creep.entity.id, creep.entity.attack_damage));
            }
        }

        for (creep, damage) in escaped {
            out_events.push(Event::CreepReachedEnd { creep, damage });
            self.player.adjust_health(-damage, out_events);
            self.remove_creep(creep, RemovalReason::ReachedEnd, out_events);
        }
    }

    fn spawn_creep(&mut self, kind: CreepKind, wave: WaveIndex, out_events: &mut Vec<Event>) {
        let Some(&start) = self.config.board.path.first() else {
            warn!(creep = kind.name(), "cannot spawn creep without a path");
            out_events.push(Event::CreepSpawnRejected { kind, wave });
            return;
        };
        let Some(template) = self.config.creep(kind).cloned() else {
            warn!(creep = kind.name(), "no template configured for creep");
            out_events.push(Event::CreepSpawnRejected { kind, wave });
            return;
        };

        let id = self.allocate_entity_id();
        let entity = Entity::new(
            id,
            EntityKind::Creep(kind),
            start,
            template.health,
            template.attack_damage,
        );
        self.creeps.insert(Creep::new(
            entity,
            kind,
            wave,
            template.movement_speed,
            template.reward,
            template.despawn_after(),
        ));
        debug!(creep = id.get(), kind = kind.name(), wave = wave.number(), "creep spawned");
        out_events.push(Event::CreepSpawned {
            creep: id,
            kind,
            wave,
            position: start,
        });
    }

    /// Single exit from the roster for both killed and escaped creeps.
    fn remove_creep(&mut self, id: EntityId, reason: RemovalReason, out_events: &mut Vec<Event>) {
        if let Some(creep) = self.creeps.remove(id) {
            out_events.push(Event::CreepRemoved {
                creep: id,
                wave: creep.wave,
                reason,
            });
        }
    }

    fn damage_entity(
        &mut self,
        target: EntityId,
        amount: i32,
        source: DamageSource,
        out_events: &mut Vec<Event>,
    ) {
        let Some(entity) = self.entity_mut(target) else {
            debug!(target = target.get(), "damage skipped, target is gone");
            return;
        };

        match entity.take_damage(amount) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Hit { remaining } => out_events.push(Event::EntityDamaged {
                target,
                amount,
                remaining,
                source,
            }),
            DamageOutcome::Killed => self.resolve_death(target, source, out_events),
        }
    }

    fn resolve_death(&mut self, target: EntityId, source: DamageSource, out_events: &mut Vec<Event>) {
        let killer = source.attacker();
        if let Some(tower) = killer.and_then(|id| self.towers.get_mut(id)) {
            tower.kills = tower.kills.saturating_add(1);
        }

        if let Some(creep) = self.creeps.get(target) {
            let reward = creep.reward;
            out_events.push(Event::CreepKilled {
                creep: target,
                killer,
                reward,
                despawn_after: creep.despawn_after,
            });
            self.player.adjust_money(reward, out_events);
            self.remove_creep(target, RemovalReason::Killed, out_events);
        } else if let Some(tower) = self.towers.remove(target) {
            self.board.vacate(tower.socket, target);
            info!(tower = target.get(), "tower destroyed");
            out_events.push(Event::TowerDestroyed {
                tower: target,
                socket: tower.socket,
                killer,
            });
        }
    }

    fn request_buff(&self, target: EntityId, kind: BuffKind, out_events: &mut Vec<Event>) {
        if self.live_position(target).is_some() {
            out_events.push(Event::BuffRequested { target, kind });
        } else {
            debug!(target = target.get(), buff = kind.name(), "buff target is not alive");
            out_events.push(Event::BuffRequestRejected { target, kind });
        }
    }

    fn aim_tower(&mut self, tower: EntityId, target: EntityId, out_events: &mut Vec<Event>) {
        let Some(point) = self.live_position(target) else {
            return;
        };
        if let Some(entry) = self.towers.get_mut(tower) {
            let heading_degrees = entry.face(point);
            out_events.push(Event::TowerAimed {
                tower,
                target,
                heading_degrees,
            });
        }
    }

    fn fire_projectile(&mut self, tower: EntityId, target: EntityId, out_events: &mut Vec<Event>) {
        let clock = self.clock;
        let target_alive = self.live_position(target).is_some();
        let muzzle = self.config.board.muzzle_offset;

        let launch = match self.towers.get_mut(tower) {
            Some(entry) if target_alive && entry.entity.is_alive() && entry.ready(clock) => {
                entry.last_fired = Some(clock);
                Some((
                    entry.entity.position + muzzle,
                    entry.projectile_speed,
                    entry.trigger_range,
                    entry.entity.attack_damage,
                    entry.kind.attack_behavior().buff(),
                ))
            }
            _ => None,
        };

        let Some((position, speed, trigger_range, damage, buff)) = launch else {
            out_events.push(Event::FireRejected { tower, target });
            return;
        };

        let projectile = self.projectiles.launch(
            tower,
            target,
            position,
            speed,
            trigger_range,
            damage,
            buff,
        );
        out_events.push(Event::ProjectileFired {
            projectile,
            tower,
            target,
        });
    }

    fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let in_flight = self.projectiles.take();
        let mut survivors = Vec::with_capacity(in_flight.len());

        for mut projectile in in_flight {
            let Some(target_position) = self.live_position(projectile.target) else {
                out_events.push(Event::ProjectileExploded {
                    projectile: projectile.id,
                    position: projectile.position,
                });
                continue;
            };

            match projectile.advance(target_position, dt) {
                Flight::Travelling => survivors.push(projectile),
                Flight::Arrived => {
                    out_events.push(Event::ProjectileImpact {
                        projectile: projectile.id,
                        target: projectile.target,
                        damage: projectile.damage,
                    });
                    self.damage_entity(
                        projectile.target,
                        projectile.damage,
                        DamageSource::Entity(projectile.owner),
                        out_events,
                    );
                    if let Some(buff) = projectile.buff {
                        self.request_buff(projectile.target, buff, out_events);
                    }
                    out_events.push(Event::ProjectileExploded {
                        projectile: projectile.id,
                        position: projectile.position,
                    });
                }
            }
        }

        self.projectiles.restore(survivors);
    }

    fn set_selection(&mut self, selection: Selection, out_events: &mut Vec<Event>) {
        self.player.selection = selection;
        out_events.push(Event::SelectionChanged { selection });
    }

    fn require_match(&self) -> Result<(), PurchaseError> {
        if self.player.status.in_progress {
            Ok(())
        } else {
            Err(PurchaseError::GameNotInProgress)
        }
    }

    fn buy_platform(&mut self, out_events: &mut Vec<Event>) -> Result<(), PurchaseError> {
        self.require_match()?;
        let board = self.board.snapshot();
        let slot = evaluate_platform_purchase(&self.purchase_context(&board))?;
        let platform = self
            .board
            .place_platform(slot)
            .ok_or(PurchaseError::InvalidSelection)?;

        self.player
            .adjust_money(-self.config.prices.platform, out_events);
        info!(platform = platform.get(), slot = slot.get(), "platform purchased");
        out_events.push(Event::PlatformPurchased { platform, slot });
        self.set_selection(Selection::default(), out_events);
        Ok(())
    }

    fn buy_tower(&mut self, kind: TowerKind, out_events: &mut Vec<Event>) -> Result<(), PurchaseError> {
        self.require_match()?;
        let template = self
            .config
            .tower(kind)
            .cloned()
            .ok_or(PurchaseError::UnknownTemplate)?;
        let cost = self.config.prices.tower(kind);
        let board = self.board.snapshot();
        let socket = evaluate_tower_purchase(&self.purchase_context(&board), cost)?;
        let position = self
            .board
            .socket_position(socket)
            .ok_or(PurchaseError::InvalidSelection)?;

        let id = EntityId::new(self.next_entity_id);
        if !self.board.seat_tower(socket, id) {
            return Err(PurchaseError::SocketOccupied);
        }
        let _ = self.allocate_entity_id();
        self.towers.insert(Tower {
            entity: Entity::new(
                id,
                EntityKind::Tower(kind),
                position,
                template.health,
                template.attack_damage,
            ),
            kind,
            socket,
            range: template.range,
            projectile_speed: template.projectile_speed,
            trigger_range: template.trigger_range,
            cooldown: template.attack_cooldown(),
            heading_degrees: 0.0,
            last_fired: None,
            kills: 0,
        });

        self.player.adjust_money(-cost, out_events);
        info!(tower = id.get(), kind = kind.name(), "tower purchased");
        out_events.push(Event::TowerPurchased {
            tower: id,
            kind,
            socket,
        });
        self.set_selection(Selection::default(), out_events);
        Ok(())
    }

    fn move_platform(&mut self, out_events: &mut Vec<Event>) -> Result<(), PurchaseError> {
        self.require_match()?;
        let board = self.board.snapshot();
        let relocation = evaluate_platform_move(&self.purchase_context(&board))?;
        let from = self
            .board
            .move_platform(relocation.platform, relocation.to)
            .ok_or(PurchaseError::InvalidSelection)?;

        for (socket, tower) in self.board.towers_on(relocation.platform) {
            let position = self.board.socket_position(socket);
            if let (Some(position), Some(entry)) = (position, self.towers.get_mut(tower)) {
                entry.entity.position = position;
            }
        }

        self.player
            .adjust_money(-self.config.prices.move_platform, out_events);
        out_events.push(Event::PlatformMoved {
            platform: relocation.platform,
            from,
            to: relocation.to,
        });
        self.set_selection(Selection::default(), out_events);
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn reject_purchase(action: PurchaseAction, reason: PurchaseError, out_events: &mut Vec<Event>) {
    debug!(?action, ?reason, "purchase rejected");
    out_events.push(Event::PurchaseRejected { action, reason });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetGameInProgress { in_progress } => {
            world.player.status.in_progress = in_progress;
            out_events.push(Event::GameStatusChanged {
                status: world.player.status,
            });
        }
        Command::SetPaused { paused } => {
            world.player.status.paused = paused;
            out_events.push(Event::GameStatusChanged {
                status: world.player.status,
            });
        }
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_creeps(dt, out_events);
        }
        Command::SpawnCreep { kind, wave } => world.spawn_creep(kind, wave, out_events),
        Command::AimTower { tower, target } => world.aim_tower(tower, target, out_events),
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events);
        }
        Command::AdvanceProjectiles { dt } => world.advance_projectiles(dt, out_events),
        Command::DamageEntity {
            target,
            amount,
            source,
        } => world.damage_entity(target, amount, source, out_events),
        Command::RequestBuff { target, kind } => world.request_buff(target, kind, out_events),
        Command::ShowBuffEffect {
            target,
            kind,
            visible,
        } => {
            if let Some(entity) = world.entity_mut(target) {
                if entity.set_marker(kind, visible) {
                    out_events.push(Event::BuffEffectChanged {
                        target,
                        kind,
                        visible,
                    });
                }
            }
        }
        Command::AwardWaveReward { wave, amount } => {
            if !world.player.status.in_progress {
                debug!(wave = wave.number(), amount, "wave reward dropped, match over");
                return;
            }
            info!(wave = wave.number(), amount, "wave reward paid");
            world.player.adjust_money(amount, out_events);
            out_events.push(Event::WaveRewardPaid { wave, amount });
        }
        Command::AdjustMoney { amount } => world.player.adjust_money(amount, out_events),
        Command::AdjustHealth { amount } => world.player.adjust_health(amount, out_events),
        Command::Select { pick } => {
            let selection = world.player.selection.pick(pick);
            world.set_selection(selection, out_events);
        }
        Command::BuyPlatform => {
            if let Err(reason) = world.buy_platform(out_events) {
                reject_purchase(PurchaseAction::BuyPlatform, reason, out_events);
            }
        }
        Command::BuyTower { kind } => {
            if let Err(reason) = world.buy_tower(kind, out_events) {
                reject_purchase(PurchaseAction::BuyTower(kind), reason, out_events);
            }
        }
        Command::MovePlatform => {
            if let Err(reason) = world.move_platform(out_events) {
                reject_purchase(PurchaseAction::MovePlatform, reason, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use creep_defence_core::{
        BoardSnapshot, BuffKind, CreepSnapshot, CreepView, EntityId, EntityKind, GameConfig,
        GameStatus, PlayerSnapshot, ProjectileId, Selection, TowerCooldownSnapshot,
        TowerCooldownView, TowerSnapshot, TowerView, Vec3,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was built from.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Simulated time accumulated from ticks.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Current match gate.
    #[must_use]
    pub fn game_status(world: &World) -> GameStatus {
        world.player.status
    }

    /// Player funds and health.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Current and previous picks.
    #[must_use]
    pub fn selection(world: &World) -> Selection {
        world.player.selection
    }

    /// Captures the slots, platforms and sockets of the board.
    #[must_use]
    pub fn board(world: &World) -> BoardSnapshot {
        world.board.snapshot()
    }

    /// Captures a read-only view of the active creep roster.
    #[must_use]
    pub fn creep_view(world: &World) -> CreepView {
        CreepView::from_snapshots(
            world
                .creeps
                .iter()
                .map(|creep| CreepSnapshot {
                    id: creep.entity.id,
                    kind: creep.kind,
                    wave: creep.wave,
                    health: creep.entity.health(),
                    starting_health: creep.entity.starting_health(),
                    position: creep.entity.position,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of every tower on the board.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.entity.id,
                    kind: tower.kind,
                    socket: tower.socket,
                    position: tower.entity.position,
                    range: tower.range,
                    health: tower.entity.health(),
                    starting_health: tower.entity.starting_health(),
                    kills: tower.kills,
                })
                .collect(),
        )
    }

    /// Captures whether each tower may fire at the current clock.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerCooldownSnapshot {
                    tower: tower.entity.id,
                    kind: tower.kind,
                    ready: tower.ready(world.clock),
                })
                .collect(),
        )
    }

    /// Reports whether the entity exists and has not died.
    #[must_use]
    pub fn is_alive(world: &World, id: EntityId) -> bool {
        world.entity(id).is_some_and(|entity| entity.is_alive())
    }

    /// Kind of the entity, if it is still on the board.
    #[must_use]
    pub fn entity_kind(world: &World, id: EntityId) -> Option<EntityKind> {
        world.entity(id).map(|entity| entity.kind)
    }

    /// Heading of a tower in degrees around the vertical axis.
    #[must_use]
    pub fn tower_heading(world: &World, id: EntityId) -> Option<f32> {
        world.towers.get(id).map(|tower| tower.heading_degrees)
    }

    /// Buff markers currently shown on the entity.
    #[must_use]
    pub fn buff_markers(world: &World, id: EntityId) -> Vec<BuffKind> {
        world
            .entity(id)
            .map(|entity| entity.markers().collect())
            .unwrap_or_default()
    }

    /// Captures every projectile in flight in launch order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                owner: projectile.owner,
                target: projectile.target,
                position: projectile.position,
            })
            .collect()
    }

    /// Immutable representation of a projectile in flight.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Identifier of the projectile.
        pub id: ProjectileId,
        /// Tower that fired the projectile.
        pub owner: EntityId,
        /// Entity the projectile chases.
        pub target: EntityId,
        /// Current world position.
        pub position: Vec3,
    }
}
