use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or loading a game configuration.
///
/// All of them are fatal: no engine is constructed from an invalid config.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("tile count {tile_count} is too small, the board needs more than {min} tiles per side")]
    TileCountTooSmall { tile_count: usize, min: usize },

    #[error("tile count {tile_count} is too large, the board allows at most {max} tiles per side")]
    TileCountTooLarge { tile_count: usize, max: usize },

    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("cell width must be greater than zero")]
    ZeroCellWidth,

    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors raised by a [`Scoreboard`](crate::scoreboard::Scoreboard) backend.
///
/// The engine never propagates these; they are logged and play continues.
#[derive(Error, Debug)]
pub enum ScoreboardError {
    #[error("high score storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored high score {contents:?} is not a valid integer")]
    Corrupt { contents: String },

    #[error("high score storage is unavailable: {message}")]
    Unavailable { message: String },
}

impl ScoreboardError {
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
