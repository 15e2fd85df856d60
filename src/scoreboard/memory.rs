use super::Scoreboard;
use crate::error::ScoreboardError;

/// In-process scoreboard; nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreboard {
    value: u32,
    writes: usize,
}

impl MemoryScoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u32) -> Self {
        Self { value, writes: 0 }
    }

    /// Number of successful `persist` calls
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Scoreboard for MemoryScoreboard {
    fn load(&self) -> Result<u32, ScoreboardError> {
        Ok(self.value)
    }

    fn persist(&mut self, value: u32) -> Result<(), ScoreboardError> {
        self.value = value;
        self.writes += 1;
        Ok(())
    }
}
