//! Tunable game parameters.
//!
//! Every field carries a default so that partial data files only need to
//! override the values they care about.

use std::{collections::BTreeSet, time::Duration};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{duration_from_secs, CreepKind, TowerKind};

/// Complete set of tunable game parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Starting resources of the player.
    pub player: PlayerConfig,
    /// Prices charged for purchases.
    pub prices: PriceList,
    /// Path and buildable slots.
    pub board: BoardLayout,
    /// Creep stats, one entry per kind.
    pub creeps: Vec<CreepTemplate>,
    /// Tower stats, one entry per kind.
    pub towers: Vec<TowerTemplate>,
}

/// Starting resources of the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Funds available when the match starts.
    pub starting_money: i64,
    /// Health available when the match starts.
    pub starting_health: i32,
}

/// Prices charged for purchases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceList {
    /// Cost of a new platform.
    pub platform: i64,
    /// Cost of moving a platform to another slot.
    pub move_platform: i64,
    /// Cost of a cannon tower.
    pub cannon_tower: i64,
    /// Cost of a bleed tower.
    pub bleed_tower: i64,
}

impl PriceList {
    /// Cost of the provided tower kind.
    #[must_use]
    pub const fn tower(&self, kind: TowerKind) -> i64 {
        match kind {
            TowerKind::Cannon => self.cannon_tower,
            TowerKind::Bleed => self.bleed_tower,
        }
    }
}

/// Geometry of the path and buildable slots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardLayout {
    /// Waypoints creeps walk through, start first.
    pub path: Vec<Vec3>,
    /// Positions where platforms may be built.
    pub slots: Vec<Vec3>,
    /// Socket positions relative to a platform's origin.
    pub socket_offsets: Vec<Vec3>,
    /// Maximum number of platforms the player may own.
    pub max_platforms: u32,
    /// Offset from a tower's position where projectiles appear.
    pub muzzle_offset: Vec3,
    /// Distance at which a creep counts as having reached a waypoint.
    pub waypoint_tolerance: f32,
}

/// Stats of one creep kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreepTemplate {
    /// Kind the template describes.
    pub kind: CreepKind,
    /// Starting health.
    pub health: i32,
    /// Player health removed when the creep reaches the end.
    pub attack_damage: i32,
    /// Units travelled per second.
    pub movement_speed: f32,
    /// Money paid to the player when the creep is killed.
    pub reward: i64,
    /// Seconds the corpse lingers before it is removed from view.
    pub despawn_seconds: f32,
}

impl CreepTemplate {
    /// Corpse lifetime as a duration.
    #[must_use]
    pub fn despawn_after(&self) -> Duration {
        duration_from_secs(self.despawn_seconds)
    }
}

/// Stats of one tower kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerTemplate {
    /// Kind the template describes.
    pub kind: TowerKind,
    /// Starting health.
    pub health: i32,
    /// Damage dealt by each projectile.
    pub attack_damage: i32,
    /// Seconds between shots.
    pub attack_cooldown_seconds: f32,
    /// Targeting radius on the lateral plane.
    pub range: f32,
    /// Units travelled per second by projectiles.
    pub projectile_speed: f32,
    /// Distance at which a projectile counts as having hit.
    pub trigger_range: f32,
}

impl TowerTemplate {
    /// Time between shots as a duration.
    #[must_use]
    pub fn attack_cooldown(&self) -> Duration {
        duration_from_secs(self.attack_cooldown_seconds)
    }
}

impl GameConfig {
    /// Stats of the provided creep kind.
    #[must_use]
    pub fn creep(&self, kind: CreepKind) -> Option<&CreepTemplate> {
        self.creeps.iter().find(|template| template.kind == kind)
    }

    /// Stats of the provided tower kind.
    #[must_use]
    pub fn tower(&self, kind: TowerKind) -> Option<&TowerTemplate> {
        self.towers.iter().find(|template| template.kind == kind)
    }

    /// Configuration with no path and no slots, used when the board data is
    /// unusable. Creeps cannot spawn and nothing can be bought.
    #[must_use]
    pub fn inert() -> Self {
        let mut config = Self::default();
        config.board.path.clear();
        config.board.slots.clear();
        config
    }

    /// Checks the configuration for values the world cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.path.len() < 2 {
            return Err(ConfigError::TooFewWaypoints {
                found: self.board.path.len(),
            });
        }
        if self.board.slots.len() < 2 {
            return Err(ConfigError::TooFewSlots {
                found: self.board.slots.len(),
            });
        }
        if self.board.socket_offsets.is_empty() {
            return Err(ConfigError::NoSockets);
        }

        let mut seen = BTreeSet::new();
        for template in &self.creeps {
            if !seen.insert(template.kind.name()) {
                return Err(ConfigError::DuplicateTemplate {
                    name: template.kind.name(),
                });
            }
            if !(template.movement_speed > 0.0) {
                return Err(ConfigError::NonPositive {
                    field: "movement_speed",
                    name: template.kind.name(),
                });
            }
            if template.health <= 0 {
                return Err(ConfigError::NonPositive {
                    field: "health",
                    name: template.kind.name(),
                });
            }
        }

        for template in &self.towers {
            if !seen.insert(template.kind.name()) {
                return Err(ConfigError::DuplicateTemplate {
                    name: template.kind.name(),
                });
            }
            for (field, value) in [
                ("projectile_speed", template.projectile_speed),
                ("range", template.range),
                ("trigger_range", template.trigger_range),
            ] {
                if !(value > 0.0) {
                    return Err(ConfigError::NonPositive {
                        field,
                        name: template.kind.name(),
                    });
                }
            }
            if template.health <= 0 {
                return Err(ConfigError::NonPositive {
                    field: "health",
                    name: template.kind.name(),
                });
            }
        }

        Ok(())
    }
}

/// Problems detected by [`GameConfig::validate`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The path needs a start and an end.
    #[error("board path needs at least 2 waypoints, found {found}")]
    TooFewWaypoints {
        /// Number of waypoints present.
        found: usize,
    },
    /// The board needs at least two slots so platforms can be moved.
    #[error("board needs at least 2 platform slots, found {found}")]
    TooFewSlots {
        /// Number of slots present.
        found: usize,
    },
    /// Platforms need at least one socket.
    #[error("platforms need at least one socket offset")]
    NoSockets,
    /// A kind was described twice.
    #[error("template for {name} is defined more than once")]
    DuplicateTemplate {
        /// Display name of the duplicated kind.
        name: &'static str,
    },
    /// A stat that must be positive was not.
    #[error("{field} of {name} must be positive")]
    NonPositive {
        /// Offending field.
        field: &'static str,
        /// Display name of the template.
        name: &'static str,
    },
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            prices: PriceList::default(),
            board: BoardLayout::default(),
            creeps: vec![
                CreepTemplate {
                    kind: CreepKind::Grunt,
                    health: 10,
                    attack_damage: 1,
                    movement_speed: 2.0,
                    reward: 5,
                    despawn_seconds: 3.0,
                },
                CreepTemplate {
                    kind: CreepKind::FastGrunt,
                    health: 6,
                    attack_damage: 1,
                    movement_speed: 3.5,
                    reward: 4,
                    despawn_seconds: 3.0,
                },
                CreepTemplate {
                    kind: CreepKind::TankGrunt,
                    health: 30,
                    attack_damage: 3,
                    movement_speed: 1.2,
                    reward: 12,
                    despawn_seconds: 3.0,
                },
            ],
            towers: vec![
                TowerTemplate {
                    kind: TowerKind::Cannon,
                    health: 20,
                    attack_damage: 3,
                    attack_cooldown_seconds: 1.0,
                    range: 6.0,
                    projectile_speed: 15.0,
                    trigger_range: 0.3,
                },
                TowerTemplate {
                    kind: TowerKind::Bleed,
                    health: 20,
                    attack_damage: 1,
                    attack_cooldown_seconds: 1.5,
                    range: 5.0,
                    projectile_speed: 12.0,
                    trigger_range: 0.3,
                },
            ],
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            starting_money: 250,
            starting_health: 20,
        }
    }
}

impl Default for PriceList {
    fn default() -> Self {
        Self {
            platform: 100,
            move_platform: 25,
            cannon_tower: 50,
            bleed_tower: 75,
        }
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            path: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 10.0),
                Vec3::new(20.0, 0.0, 10.0),
            ],
            slots: vec![
                Vec3::new(5.0, 0.0, 3.0),
                Vec3::new(13.0, 0.0, 5.0),
                Vec3::new(7.0, 0.0, 7.0),
                Vec3::new(15.0, 0.0, 13.0),
            ],
            socket_offsets: vec![Vec3::new(-0.5, 0.5, 0.0), Vec3::new(0.5, 0.5, 0.0)],
            max_platforms: 3,
            muzzle_offset: Vec3::new(0.0, 1.0, 0.0),
            waypoint_tolerance: 0.1,
        }
    }
}
