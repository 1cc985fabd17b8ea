#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Creep Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the simulation systems. Adapters and systems
//! submit [`Command`] values describing desired mutations, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values for systems and presentation layers to react to. Systems consume
//! event streams, query immutable snapshots, and respond exclusively with new
//! command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod config;
mod playlist;

pub use config::{
    BoardLayout, ConfigError, CreepTemplate, GameConfig, PlayerConfig, PriceList, TowerTemplate,
};
pub use glam::{Vec2, Vec3};
pub use playlist::{PlaylistError, WaveDefinition, WavePlaylist, WaveSpawnSpec};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Creep Defence.";

/// Gate toggled by the surrounding application to start and freeze play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GameStatus {
    /// Indicates whether a match is currently being played.
    pub in_progress: bool,
    /// Indicates whether the running match is paused.
    pub paused: bool,
}

impl GameStatus {
    /// Reports whether the simulation should advance this frame.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.in_progress && !self.paused
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts or ends the current match.
    SetGameInProgress {
        /// Whether the match should be considered in progress.
        in_progress: bool,
    },
    /// Pauses or resumes the current match.
    SetPaused {
        /// Whether simulated time should stop advancing.
        paused: bool,
    },
    /// Advances the simulation clock and walks creeps along the path.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a creep of the provided kind enters the path start.
    SpawnCreep {
        /// Template used to build the creep.
        kind: CreepKind,
        /// Wave the creep is attributed to for reward tracking.
        wave: WaveIndex,
    },
    /// Rotates a tower so that it faces the provided target.
    AimTower {
        /// Tower that should turn.
        tower: EntityId,
        /// Entity the tower should face.
        target: EntityId,
    },
    /// Requests that a tower launches a projectile at a target.
    FireProjectile {
        /// Tower attempting to fire.
        tower: EntityId,
        /// Entity the projectile should chase.
        target: EntityId,
    },
    /// Moves every projectile in flight and resolves impacts.
    AdvanceProjectiles {
        /// Duration of simulated time the projectiles travel for.
        dt: Duration,
    },
    /// Deals damage directly to an entity.
    DamageEntity {
        /// Entity receiving the damage.
        target: EntityId,
        /// Amount of health removed from the target.
        amount: i32,
        /// Origin of the damage, used for kill attribution.
        source: DamageSource,
    },
    /// Requests that a buff is attached to a live entity.
    RequestBuff {
        /// Entity the buff should be bound to.
        target: EntityId,
        /// Kind of buff to attach.
        kind: BuffKind,
    },
    /// Toggles the visual marker associated with an active buff.
    ShowBuffEffect {
        /// Entity carrying the buff.
        target: EntityId,
        /// Buff whose marker is toggled.
        kind: BuffKind,
        /// Whether the marker should be shown.
        visible: bool,
    },
    /// Pays the completion reward of a wave to the player.
    AwardWaveReward {
        /// Wave that has been completed.
        wave: WaveIndex,
        /// Money paid out for the wave.
        amount: i64,
    },
    /// Adds (or removes, when negative) money from the player.
    AdjustMoney {
        /// Signed amount applied to the player's funds.
        amount: i64,
    },
    /// Adds (or removes, when negative) health from the player.
    AdjustHealth {
        /// Signed amount applied to the player's health.
        amount: i32,
    },
    /// Records that the player picked a board piece, or picked nothing.
    Select {
        /// Piece picked by the player, if any.
        pick: Option<BoardPick>,
    },
    /// Buys a platform for the currently selected slot.
    BuyPlatform,
    /// Buys a tower for the currently selected socket.
    BuyTower {
        /// Kind of tower to construct.
        kind: TowerKind,
    },
    /// Moves the selected platform onto the selected open slot.
    MovePlatform,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that the match gate changed.
    GameStatusChanged {
        /// Status after processing the command.
        status: GameStatus,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a creep entered the path start.
    CreepSpawned {
        /// Identifier assigned to the creep.
        creep: EntityId,
        /// Template the creep was built from.
        kind: CreepKind,
        /// Wave the creep belongs to.
        wave: WaveIndex,
        /// Position the creep occupies after spawning.
        position: Vec3,
    },
    /// Reports that a spawn request could not be resolved to a template.
    CreepSpawnRejected {
        /// Kind requested by the scheduler.
        kind: CreepKind,
        /// Wave the creep would have belonged to.
        wave: WaveIndex,
    },
    /// Reports that a creep walked off the end of the path.
    CreepReachedEnd {
        /// Creep that escaped.
        creep: EntityId,
        /// Health removed from the player.
        damage: i32,
    },
    /// Confirms that a creep left the active roster.
    CreepRemoved {
        /// Creep that was removed.
        creep: EntityId,
        /// Wave the creep belonged to.
        wave: WaveIndex,
        /// Why the creep left the roster.
        reason: RemovalReason,
    },
    /// Reports a non-fatal hit, suitable for damage feedback.
    EntityDamaged {
        /// Entity that was hit.
        target: EntityId,
        /// Damage applied by the hit.
        amount: i32,
        /// Health remaining after the hit.
        remaining: i32,
        /// Origin of the damage.
        source: DamageSource,
    },
    /// Reports that a creep died.
    CreepKilled {
        /// Creep that died.
        creep: EntityId,
        /// Entity credited with the kill, if any.
        killer: Option<EntityId>,
        /// Money paid to the player for the kill.
        reward: i64,
        /// Delay before the corpse should disappear from view.
        despawn_after: Duration,
    },
    /// Reports that a tower was destroyed and removed from its socket.
    TowerDestroyed {
        /// Tower that was destroyed.
        tower: EntityId,
        /// Socket the tower occupied.
        socket: SocketRef,
        /// Entity credited with the kill, if any.
        killer: Option<EntityId>,
    },
    /// Confirms that a tower turned toward a target.
    TowerAimed {
        /// Tower that turned.
        tower: EntityId,
        /// Entity the tower faces.
        target: EntityId,
        /// Heading around the vertical axis in degrees.
        heading_degrees: f32,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier of the new projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: EntityId,
        /// Entity the projectile chases.
        target: EntityId,
    },
    /// Reports that a fire request was refused.
    FireRejected {
        /// Tower that attempted to fire.
        tower: EntityId,
        /// Entity the tower attempted to shoot.
        target: EntityId,
    },
    /// Reports that a projectile reached its target.
    ProjectileImpact {
        /// Projectile that hit.
        projectile: ProjectileId,
        /// Entity that was hit.
        target: EntityId,
        /// Damage carried by the projectile.
        damage: i32,
    },
    /// Reports that a projectile despawned, optionally with a visual effect.
    ProjectileExploded {
        /// Projectile that despawned.
        projectile: ProjectileId,
        /// Position where the explosion effect should appear.
        position: Vec3,
    },
    /// Confirms that a buff may be attached to a live target.
    BuffRequested {
        /// Entity the buff is bound to.
        target: EntityId,
        /// Kind of buff requested.
        kind: BuffKind,
    },
    /// Reports that a buff request targeted a missing or dead entity.
    BuffRequestRejected {
        /// Entity named by the request.
        target: EntityId,
        /// Kind of buff requested.
        kind: BuffKind,
    },
    /// Reports that a buff marker was shown or hidden.
    BuffEffectChanged {
        /// Entity carrying the marker.
        target: EntityId,
        /// Buff the marker represents.
        kind: BuffKind,
        /// Whether the marker is now visible.
        visible: bool,
    },
    /// Confirms that a wave's completion reward was paid.
    WaveRewardPaid {
        /// Wave that was completed.
        wave: WaveIndex,
        /// Money paid to the player.
        amount: i64,
    },
    /// Reports the player's funds after a change.
    MoneyChanged {
        /// Funds after the change.
        money: i64,
        /// Signed amount that was applied.
        delta: i64,
    },
    /// Reports the player's health after a change.
    HealthChanged {
        /// Health after the change.
        health: i32,
        /// Signed amount that was applied.
        delta: i32,
    },
    /// Announces that the player's health ran out.
    GameOver,
    /// Reports the selection after a pick.
    SelectionChanged {
        /// Current and previous picks.
        selection: Selection,
    },
    /// Confirms that a platform was built on a slot.
    PlatformPurchased {
        /// Identifier allocated to the platform.
        platform: PlatformId,
        /// Slot the platform occupies.
        slot: SlotId,
    },
    /// Confirms that a tower was built in a socket.
    TowerPurchased {
        /// Identifier allocated to the tower.
        tower: EntityId,
        /// Kind of tower built.
        kind: TowerKind,
        /// Socket the tower occupies.
        socket: SocketRef,
    },
    /// Confirms that a platform moved between slots.
    PlatformMoved {
        /// Platform that moved.
        platform: PlatformId,
        /// Slot the platform left.
        from: SlotId,
        /// Slot the platform occupies now.
        to: SlotId,
    },
    /// Reports that a purchase was refused after re-validation.
    PurchaseRejected {
        /// Purchase that was attempted.
        action: PurchaseAction,
        /// Specific reason the purchase failed.
        reason: PurchaseError,
    },
}

/// Unique identifier assigned to a creep or tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a buildable platform slot within the board layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(u32);

impl SlotId {
    /// Creates a new slot identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the slot.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a purchased platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformId(u32);

impl PlatformId {
    /// Creates a new platform identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the platform.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Address of a tower socket on a platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SocketRef {
    platform: PlatformId,
    index: u32,
}

impl SocketRef {
    /// Creates a socket address from a platform and a socket index.
    #[must_use]
    pub const fn new(platform: PlatformId, index: u32) -> Self {
        Self { platform, index }
    }

    /// Platform carrying the socket.
    #[must_use]
    pub const fn platform(&self) -> PlatformId {
        self.platform
    }

    /// Zero-based socket index on the platform.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }
}

/// Zero-based position of a wave within the playlist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveIndex(u32);

impl WaveIndex {
    /// Creates a new wave index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the zero-based index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// One-based wave number shown to players.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.0 + 1
    }
}

/// Creep templates that waves can spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CreepKind {
    /// Baseline creep.
    Grunt,
    /// Quick, fragile creep.
    FastGrunt,
    /// Slow, durable creep.
    TankGrunt,
}

impl CreepKind {
    /// Every creep kind in declaration order.
    pub const ALL: [CreepKind; 3] = [Self::Grunt, Self::FastGrunt, Self::TankGrunt];

    /// Name used for the creep in playlist files and console output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grunt => "Grunt",
            Self::FastGrunt => "FastGrunt",
            Self::TankGrunt => "TankGrunt",
        }
    }

    /// Resolves a playlist name into a creep kind.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Towers that can be bought for platform sockets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Single-shot tower.
    Cannon,
    /// Tower whose projectiles leave a bleed on the target.
    Bleed,
}

impl TowerKind {
    /// Every tower kind in declaration order.
    pub const ALL: [TowerKind; 2] = [Self::Cannon, Self::Bleed];

    /// Display name of the tower.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cannon => "CannonTower",
            Self::Bleed => "BleedTower",
        }
    }

    /// Resolves a display name into a tower kind.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Attack strategy used by towers of this kind.
    #[must_use]
    pub const fn attack_behavior(self) -> AttackBehavior {
        match self {
            Self::Cannon => AttackBehavior::SingleShot,
            Self::Bleed => AttackBehavior::BuffApplicator {
                buff: BuffKind::Bleed,
            },
        }
    }
}

/// Kind of board piece an entity represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Creep walking the path.
    Creep(CreepKind),
    /// Tower seated in a platform socket.
    Tower(TowerKind),
}

impl EntityKind {
    /// Display name of the underlying template.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Creep(kind) => kind.name(),
            Self::Tower(kind) => kind.name(),
        }
    }

    /// Capability tags granted to entities of this kind.
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::Creep(_) => Capabilities::NONE.with(Capability::Targetable),
            Self::Tower(kind) => {
                let base = Capabilities::NONE
                    .with(Capability::Targetable)
                    .with(Capability::DamageDealer);
                match kind.attack_behavior() {
                    AttackBehavior::SingleShot => base,
                    AttackBehavior::BuffApplicator { .. } => base.with(Capability::BuffSource),
                }
            }
        }
    }
}

/// Orthogonal capability tags carried by entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// May be damaged and chosen as a target.
    Targetable,
    /// Deals damage through attacks.
    DamageDealer,
    /// Attaches buffs through attacks.
    BuffSource,
}

impl Capability {
    const fn bit(self) -> u8 {
        match self {
            Self::Targetable => 0b001,
            Self::DamageDealer => 0b010,
            Self::BuffSource => 0b100,
        }
    }
}

/// Set of [`Capability`] tags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u8);

impl Capabilities {
    /// Set without any capability.
    pub const NONE: Self = Self(0);

    /// Returns a copy of the set extended with the provided capability.
    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Self(self.0 | capability.bit())
    }

    /// Reports whether the set contains the provided capability.
    #[must_use]
    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }
}

/// Attack strategies resolved per tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackBehavior {
    /// One projectile dealing the tower's damage on impact.
    SingleShot,
    /// One projectile dealing damage and attaching a buff on impact.
    BuffApplicator {
        /// Buff attached to the target on impact.
        buff: BuffKind,
    },
}

impl AttackBehavior {
    /// Buff carried by projectiles of this behaviour, if any.
    #[must_use]
    pub const fn buff(self) -> Option<BuffKind> {
        match self {
            Self::SingleShot => None,
            Self::BuffApplicator { buff } => Some(buff),
        }
    }
}

/// Timed status effects that can be attached to entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuffKind {
    /// Damage over time.
    Bleed,
}

impl BuffKind {
    /// Every buff kind in declaration order.
    pub const ALL: [BuffKind; 1] = [Self::Bleed];

    /// Name used to request the buff by name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bleed => "bleed",
        }
    }

    /// Resolves a buff name into a buff kind.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Timing and effect parameters of the buff.
    ///
    /// Bleed repeats every 300 ms for 3 s and removes one health point per
    /// repeat.
    #[must_use]
    pub const fn spec(self) -> BuffSpec {
        match self {
            Self::Bleed => BuffSpec {
                repeating: true,
                duration: Duration::from_secs(3),
                repeat_interval: Duration::from_millis(300),
                damage_per_repeat: 1,
            },
        }
    }
}

/// Static parameters describing a buff kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BuffSpec {
    /// Whether the effect runs repeatedly while the buff is active.
    pub repeating: bool,
    /// Total lifetime of the buff.
    pub duration: Duration,
    /// Time between effect applications for repeating buffs.
    pub repeat_interval: Duration,
    /// Damage dealt by each effect application.
    pub damage_per_repeat: i32,
}

/// Origin of damage applied to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// Attack from another entity, credited with the kill.
    Entity(EntityId),
    /// Tick of a buff; no entity is credited.
    Buff(BuffKind),
    /// Developer console.
    Console,
}

impl DamageSource {
    /// Entity credited when this damage kills its target.
    #[must_use]
    pub const fn attacker(self) -> Option<EntityId> {
        match self {
            Self::Entity(id) => Some(id),
            Self::Buff(_) | Self::Console => None,
        }
    }
}

/// Why a creep left the active roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalReason {
    /// The creep's health ran out.
    Killed,
    /// The creep walked off the end of the path.
    ReachedEnd,
}

/// Board piece the player can pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardPick {
    /// Platform slot, open or occupied.
    Slot(SlotId),
    /// Purchased platform.
    Platform(PlatformId),
    /// Tower socket on a platform.
    Socket(SocketRef),
    /// Creep or tower.
    Entity(EntityId),
}

/// The player's current and previous picks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    /// Most recent pick.
    pub current: Option<BoardPick>,
    /// Pick that preceded the current one.
    pub previous: Option<BoardPick>,
}

impl Selection {
    /// Applies a new pick. Picking nothing clears both picks.
    #[must_use]
    pub const fn pick(self, pick: Option<BoardPick>) -> Self {
        match pick {
            Some(_) => Self {
                current: pick,
                previous: self.current,
            },
            None => Self {
                current: None,
                previous: None,
            },
        }
    }
}

/// Purchases the player can attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseAction {
    /// Build a platform on an open slot.
    BuyPlatform,
    /// Build a tower in an empty socket.
    BuyTower(TowerKind),
    /// Move a platform onto an open slot.
    MovePlatform,
}

/// Reasons a purchase may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseError {
    /// Purchases are only allowed while a match is in progress.
    GameNotInProgress,
    /// The selection does not name an eligible board piece.
    InvalidSelection,
    /// The maximum number of platforms has been reached.
    CapacityReached,
    /// The selected socket already holds a tower.
    SocketOccupied,
    /// The player cannot afford the purchase.
    InsufficientFunds,
    /// No template is configured for the requested tower kind.
    UnknownTemplate,
}

/// Computes the distance between two points on the lateral plane.
///
/// The vertical axis is ignored.
#[must_use]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x, a.z).distance(Vec2::new(b.x, b.z))
}

/// Converts a seconds value from a data file into a duration.
///
/// Negative, infinite, and NaN values map to zero.
#[must_use]
pub fn duration_from_secs(seconds: f32) -> Duration {
    Duration::try_from_secs_f32(seconds).unwrap_or(Duration::ZERO)
}

/// Immutable representation of a single creep used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CreepSnapshot {
    /// Identifier assigned to the creep.
    pub id: EntityId,
    /// Template the creep was built from.
    pub kind: CreepKind,
    /// Wave the creep belongs to.
    pub wave: WaveIndex,
    /// Current health.
    pub health: i32,
    /// Health the creep spawned with.
    pub starting_health: i32,
    /// Current world position.
    pub position: Vec3,
}

/// Read-only snapshot of the active creep roster.
#[derive(Clone, Debug, Default)]
pub struct CreepView {
    snapshots: Vec<CreepSnapshot>,
}

impl CreepView {
    /// Creates a view from the provided snapshots, ordered by spawn.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<CreepSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the creeps in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &CreepSnapshot> {
        self.snapshots.iter()
    }

    /// Creep at the provided roster index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CreepSnapshot> {
        self.snapshots.get(index)
    }

    /// Number of creeps on the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Number of live creeps attributed to the provided wave.
    #[must_use]
    pub fn count_in_wave(&self, wave: WaveIndex) -> usize {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.wave == wave)
            .count()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<CreepSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier assigned to the tower.
    pub id: EntityId,
    /// Kind of tower.
    pub kind: TowerKind,
    /// Socket the tower occupies.
    pub socket: SocketRef,
    /// Current world position.
    pub position: Vec3,
    /// Targeting radius on the lateral plane.
    pub range: f32,
    /// Current health.
    pub health: i32,
    /// Health the tower was built with.
    pub starting_health: i32,
    /// Number of creeps the tower has killed.
    pub kills: u32,
}

/// Read-only snapshot describing all towers on the board.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Finds the tower seated in the provided socket.
    #[must_use]
    pub fn in_socket(&self, socket: SocketRef) -> Option<&TowerSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.socket == socket)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Readiness of a tower's attack cooldown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Tower the cooldown belongs to.
    pub tower: EntityId,
    /// Kind of tower.
    pub kind: TowerKind,
    /// Whether the tower may fire this tick.
    pub ready: bool,
}

/// Read-only snapshot of every tower's cooldown.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a cooldown view sorted by tower identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Iterator over the captured cooldowns in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerCooldownSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Target assignment computed for a tower this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: EntityId,
    /// Creep selected as the target.
    pub creep: EntityId,
    /// Tower position used for the range test.
    pub tower_position: Vec3,
    /// Creep position used for the range test.
    pub creep_position: Vec3,
}

/// Snapshot of a single platform slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotSnapshot {
    /// Identifier of the slot.
    pub id: SlotId,
    /// World position of the slot.
    pub position: Vec3,
    /// Platform standing on the slot, if any.
    pub platform: Option<PlatformId>,
}

/// Snapshot of a purchased platform and its sockets.
#[derive(Clone, Debug, PartialEq)]
pub struct PlatformSnapshot {
    /// Identifier of the platform.
    pub id: PlatformId,
    /// Slot the platform stands on.
    pub slot: SlotId,
    /// Tower seated in each socket, in socket order.
    pub sockets: Vec<Option<EntityId>>,
}

/// Read-only snapshot of the buildable board topology.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoardSnapshot {
    /// Every slot in layout order.
    pub slots: Vec<SlotSnapshot>,
    /// Every platform in identifier order.
    pub platforms: Vec<PlatformSnapshot>,
    /// Maximum number of platforms the board accepts.
    pub max_platforms: u32,
}

impl BoardSnapshot {
    /// Reports whether the slot exists and has no platform on it.
    #[must_use]
    pub fn is_open_slot(&self, slot: SlotId) -> bool {
        self.slots
            .iter()
            .any(|candidate| candidate.id == slot && candidate.platform.is_none())
    }

    /// Finds a platform by identifier.
    #[must_use]
    pub fn platform(&self, platform: PlatformId) -> Option<&PlatformSnapshot> {
        self.platforms
            .iter()
            .find(|candidate| candidate.id == platform)
    }

    /// Occupant of a socket: `None` when the socket does not exist.
    #[must_use]
    pub fn socket(&self, socket: SocketRef) -> Option<Option<EntityId>> {
        let platform = self.platform(socket.platform())?;
        let index = usize::try_from(socket.index()).ok()?;
        platform.sockets.get(index).copied()
    }

    /// Number of platforms on the board.
    #[must_use]
    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }
}

/// Snapshot of the player's resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Current funds.
    pub money: i64,
    /// Current health.
    pub health: i32,
}
