//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal host drives it, and tests drive it directly.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::{FOOD_REWARD, GameConfig, INITIAL_HEAD, MAX_TILE_COUNT, MIN_TILE_COUNT};
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome};
pub use state::{CollisionType, GameStatus, Position, Snake};
