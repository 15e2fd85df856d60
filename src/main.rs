use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::{GameConfig, GameEngine};
use grid_snake::modes::HumanMode;
use grid_snake::scoreboard::{FileScoreboard, MemoryScoreboard, Scoreboard};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake in the terminal, with a high score that sticks")]
struct Cli {
    /// TOML file with game settings; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Board width and height in tiles
    #[arg(long)]
    tile_count: Option<usize>,

    /// Milliseconds between two moves
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Terminal columns per tile
    #[arg(long)]
    cell_width: Option<u16>,

    /// Directory holding the high score file
    #[arg(long, default_value = ".")]
    score_dir: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    no_persist: bool,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal itself is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(tile_count) = self.tile_count {
            config.tile_count = tile_count;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(cell_width) = self.cell_width {
            config.cell_width = cell_width;
        }

        Ok(config)
    }

    fn scoreboard(&self) -> Box<dyn Scoreboard> {
        if self.no_persist {
            Box::new(MemoryScoreboard::new())
        } else {
            Box::new(FileScoreboard::new(&self.score_dir))
        }
    }
}

fn init_logging(path: &Path, debug: bool) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let log_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("grid_snake={},warn", log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path, cli.debug)?;
    }

    let config = cli.game_config()?;
    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, cli.scoreboard(), seed),
        None => GameEngine::new(config, cli.scoreboard()),
    }
    .context("Invalid game configuration")?;

    info!("Starting grid_snake v{}", env!("CARGO_PKG_VERSION"));

    let mut human_mode = HumanMode::new(engine);
    human_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from(["grid_snake", "--tile-count", "25", "--tick-ms", "100"]).unwrap();
        let config = cli.game_config().unwrap();

        assert_eq!(config.tile_count, 25);
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.cell_width, 2);
    }

    #[test]
    fn test_oversized_board_rejected() {
        let cli = Cli::try_parse_from(["grid_snake", "--tile-count", "100000"]).unwrap();
        let config = cli.game_config().unwrap();
        assert!(GameEngine::new(config, cli.scoreboard()).is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["grid_snake"]).unwrap();
        assert_eq!(cli.game_config().unwrap(), GameConfig::default());
        assert!(!cli.no_persist);
        assert_eq!(cli.score_dir, PathBuf::from("."));
    }
}
