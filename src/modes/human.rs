use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::game::{GameEngine, GameStatus};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{GridCanvas, TerminalView, draw};

/// Keyboard-driven game in the terminal
///
/// Ticks, key presses and redraws all run on one task, so the engine is
/// never touched concurrently.
pub struct HumanMode {
    engine: GameEngine,
    canvas: GridCanvas,
    metrics: GameMetrics,
    view: TerminalView,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(engine: GameEngine) -> Self {
        let mut canvas = GridCanvas::new(engine.tile_count(), engine.config().cell_width);
        draw(&mut canvas, &engine);

        Self {
            engine,
            canvas,
            metrics: GameMetrics::new(),
            view: TerminalView::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.engine.config().tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        info!(
            "Game loop started, ticking every {:?}",
            self.engine.config().tick_interval()
        );

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                // Game logic tick, only scheduled while running
                _ = tick_timer.tick(), if self.engine.status() == GameStatus::Running => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.view.render(frame, &self.engine, &self.canvas, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!("Game loop stopped after {} games", self.metrics.games_played);
        Ok(())
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            if self.apply(action) {
                // First tick lands one full period after (re)starting
                tick_timer.reset();
            }
        }
    }

    /// Apply a key action to the engine.
    ///
    /// Returns true when the game just went from stopped to running, which
    /// is when the host restarts its tick timer.
    fn apply(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Steer(direction) => {
                self.engine.set_direction(direction);
            }
            KeyAction::Start => {
                let was_running = self.engine.status() == GameStatus::Running;
                self.engine.start();
                if !was_running && self.engine.status() == GameStatus::Running {
                    self.metrics.on_running();
                    return true;
                }
            }
            KeyAction::Pause => {
                self.engine.pause();
                self.metrics.on_stopped();
            }
            KeyAction::Reset => {
                self.reset_game();
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }

        false
    }

    fn update_game(&mut self) {
        if let Some(outcome) = self.engine.tick() {
            draw(&mut self.canvas, &self.engine);

            if outcome.collided {
                debug!("Fatal move into {:?}", outcome.new_head);
                self.metrics.on_game_over(self.engine.score());
            }
        }
    }

    fn reset_game(&mut self) {
        self.engine.reset();
        self.metrics.on_reset();
        draw(&mut self.canvas, &self.engine);
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
