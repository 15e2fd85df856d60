use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

use super::state::Position;

/// Cell the snake starts on after every reset
pub const INITIAL_HEAD: Position = Position { x: 10, y: 10 };

/// The board must be strictly larger than this so `INITIAL_HEAD` is on it
pub const MIN_TILE_COUNT: usize = 10;

/// Largest board that still fits a terminal
pub const MAX_TILE_COUNT: usize = 100;

/// Points awarded per food eaten
pub const FOOD_REWARD: u32 = 10;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width and height of the square board, in tiles
    pub tile_count: usize,
    /// Time between two ticks while the game is running
    pub tick_interval_ms: u64,
    /// Terminal columns used to draw one tile
    pub cell_width: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_count: 20,
            tick_interval_ms: 150,
            cell_width: 2,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board size
    pub fn new(tile_count: usize) -> Self {
        Self {
            tile_count,
            ..Default::default()
        }
    }

    /// Load a configuration from a TOML file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_count <= MIN_TILE_COUNT {
            return Err(ConfigError::TileCountTooSmall {
                tile_count: self.tile_count,
                min: MIN_TILE_COUNT,
            });
        }
        if self.tile_count > MAX_TILE_COUNT {
            return Err(ConfigError::TileCountTooLarge {
                tile_count: self.tile_count,
                max: MAX_TILE_COUNT,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.cell_width == 0 {
            return Err(ConfigError::ZeroCellWidth);
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
