//! Wave playlist records loaded from JSON data files.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{duration_from_secs, CreepKind};

/// A single creep entry within a wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveSpawnSpec {
    /// Name of the creep template, resolved with [`CreepKind::from_name`].
    pub creep_kind: String,
    /// Seconds to wait after this spawn before the next one.
    pub delay_before_next: f32,
}

impl WaveSpawnSpec {
    /// Creates a spawn entry for a known creep kind.
    #[must_use]
    pub fn new(kind: CreepKind, delay_before_next: f32) -> Self {
        Self {
            creep_kind: kind.name().to_owned(),
            delay_before_next,
        }
    }

    /// Creep kind named by the entry, if the name is known.
    #[must_use]
    pub fn creep(&self) -> Option<CreepKind> {
        CreepKind::from_name(&self.creep_kind)
    }

    /// Delay following this spawn.
    #[must_use]
    pub fn delay(&self) -> Duration {
        duration_from_secs(self.delay_before_next)
    }
}

/// Ordered spawns that make up one wave.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaveDefinition {
    /// Message shown while the wave is active.
    pub status_message: String,
    /// Money paid once every creep of the wave has left the board.
    pub reward_amount: i64,
    /// Spawns in playlist order.
    pub spawns: Vec<WaveSpawnSpec>,
}

/// Ordered waves plus the pause between them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WavePlaylist {
    /// Whole seconds between the end of one wave and the start of the next.
    pub inter_wave_delay: u32,
    /// Waves in play order.
    pub waves: Vec<WaveDefinition>,
}

impl WavePlaylist {
    /// Parses a playlist from its JSON representation.
    pub fn from_json_str(source: &str) -> Result<Self, PlaylistError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Serialises the playlist as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, PlaylistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Pause between waves.
    #[must_use]
    pub fn inter_wave_delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.inter_wave_delay))
    }

    /// Three-wave playlist used when no data file is supplied.
    #[must_use]
    pub fn builtin() -> Self {
        let wave = |message: &str, reward: i64, spawns: &[(CreepKind, f32)]| WaveDefinition {
            status_message: message.to_owned(),
            reward_amount: reward,
            spawns: spawns
                .iter()
                .map(|&(kind, delay)| WaveSpawnSpec::new(kind, delay))
                .collect(),
        };

        Self {
            inter_wave_delay: 10,
            waves: vec![
                wave(
                    "Wave 1: Grunts approaching",
                    50,
                    &[
                        (CreepKind::Grunt, 1.0),
                        (CreepKind::Grunt, 1.0),
                        (CreepKind::Grunt, 1.0),
                        (CreepKind::Grunt, 1.0),
                        (CreepKind::Grunt, 0.0),
                    ],
                ),
                wave(
                    "Wave 2: Something fast this way comes",
                    75,
                    &[
                        (CreepKind::FastGrunt, 0.5),
                        (CreepKind::FastGrunt, 0.5),
                        (CreepKind::Grunt, 1.0),
                        (CreepKind::FastGrunt, 0.5),
                        (CreepKind::FastGrunt, 0.0),
                    ],
                ),
                wave(
                    "Wave 3: Heavy armour",
                    120,
                    &[
                        (CreepKind::Grunt, 1.0),
                        (CreepKind::TankGrunt, 2.0),
                        (CreepKind::FastGrunt, 0.5),
                        (CreepKind::TankGrunt, 0.0),
                    ],
                ),
            ],
        }
    }
}

/// Errors produced while decoding or encoding a playlist.
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// The JSON document could not be decoded or encoded.
    #[error("malformed wave playlist: {0}")]
    Json(#[from] serde_json::Error),
}
