//! Loading of the game configuration and wave playlist from disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use creep_defence_core::{ConfigError, GameConfig, PlaylistError, WavePlaylist};
use thiserror::Error;
use tracing::{info, warn};

/// Failure to load a configuration or playlist file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration is not valid TOML for a [`GameConfig`].
    #[error("malformed game configuration")]
    Toml(#[from] toml::de::Error),
    /// The configuration decoded but describes an unplayable board.
    #[error("invalid game configuration")]
    Config(#[from] ConfigError),
    /// The playlist is not valid JSON for a [`WavePlaylist`].
    #[error("invalid wave playlist")]
    Playlist(#[from] PlaylistError),
}

/// Decodes and validates a TOML game configuration.
pub fn parse_config(source: &str) -> Result<GameConfig, LoadError> {
    let config: GameConfig = toml::from_str(source)?;
    config.validate()?;
    Ok(config)
}

/// Reads, decodes and validates the TOML game configuration at `path`.
pub fn load_config(path: &Path) -> Result<GameConfig, LoadError> {
    parse_config(&read(path)?)
}

/// Reads and decodes the JSON wave playlist at `path`.
pub fn load_playlist(path: &Path) -> Result<WavePlaylist, LoadError> {
    Ok(WavePlaylist::from_json_str(&read(path)?)?)
}

/// Loads the configuration, falling back to an inert board when it is unusable.
///
/// Without a path the built-in configuration is used.
#[must_use]
pub fn config_or_inert(path: Option<&Path>) -> GameConfig {
    let Some(path) = path else {
        return GameConfig::default();
    };

    match load_config(path) {
        Ok(config) => {
            info!(path = %path.display(), "game configuration loaded");
            config
        }
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error_chain(&error),
                "game configuration unusable, continuing with an inert board"
            );
            GameConfig::inert()
        }
    }
}

/// Loads the playlist, continuing without one when it cannot be read.
#[must_use]
pub fn playlist_or_none(path: &Path) -> Option<WavePlaylist> {
    match load_playlist(path) {
        Ok(playlist) => {
            info!(
                path = %path.display(),
                waves = playlist.waves.len(),
                "wave playlist loaded"
            );
            Some(playlist)
        }
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error_chain(&error),
                "wave playlist unavailable, no waves will spawn"
            );
            None
        }
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Joins an error with its sources for a single log field.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
