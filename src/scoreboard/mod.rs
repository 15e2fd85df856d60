//! High score persistence
//!
//! The engine only talks to the [`Scoreboard`] trait: once at construction to
//! seed the high score, and at game over when the score beats it.

pub mod file;
pub mod memory;

pub use file::FileScoreboard;
pub use memory::MemoryScoreboard;

use crate::error::ScoreboardError;

/// Fixed identifier the high score is stored under
pub const HIGH_SCORE_KEY: &str = "snake_high_score";

pub trait Scoreboard {
    /// Stored high score, 0 when nothing has been stored yet
    fn load(&self) -> Result<u32, ScoreboardError>;

    /// Overwrite the stored high score
    fn persist(&mut self, value: u32) -> Result<(), ScoreboardError>;
}

impl<S: Scoreboard + ?Sized> Scoreboard for Box<S> {
    fn load(&self) -> Result<u32, ScoreboardError> {
        (**self).load()
    }

    fn persist(&mut self, value: u32) -> Result<(), ScoreboardError> {
        (**self).persist(value)
    }
}
