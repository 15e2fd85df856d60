//! Grid Snake - a terminal snake game with a persistent high score
//!
//! This library provides:
//! - Core game logic (game module)
//! - High score persistence (scoreboard module)
//! - Board drawing and the ratatui view (render module)
//! - Keyboard mapping (input module)
//! - The interactive terminal host (modes module)

pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod scoreboard;

pub use error::{ConfigError, ScoreboardError};
