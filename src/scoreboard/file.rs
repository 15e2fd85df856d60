use std::path::{Path, PathBuf};

use tracing::debug;

use super::{HIGH_SCORE_KEY, Scoreboard};
use crate::error::ScoreboardError;

/// Stores the high score as one decimal integer in `<dir>/snake_high_score`
#[derive(Debug, Clone)]
pub struct FileScoreboard {
    path: PathBuf,
}

impl FileScoreboard {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            path: directory.as_ref().join(HIGH_SCORE_KEY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Scoreboard for FileScoreboard {
    fn load(&self) -> Result<u32, ScoreboardError> {
        if !self.path.exists() {
            debug!("No high score stored at {:?}", self.path);
            return Ok(0);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }

        trimmed.parse().map_err(|_| ScoreboardError::Corrupt {
            contents: trimmed.to_string(),
        })
    }

    fn persist(&mut self, value: u32) -> Result<(), ScoreboardError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, format!("{value}\n"))?;
        debug!("High score {} written to {:?}", value, self.path);
        Ok(())
    }
}
