use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::{Cell, GridCanvas};
use crate::game::{GameEngine, GameStatus};
use crate::metrics::GameMetrics;
use crate::scoreboard::Scoreboard;

/// Terminal layout: stats header, board, controls footer
pub struct TerminalView;

impl TerminalView {
    pub fn new() -> Self {
        Self
    }

    pub fn render<S: Scoreboard>(
        &self,
        frame: &mut Frame,
        engine: &GameEngine<S>,
        canvas: &GridCanvas,
        metrics: &GameMetrics,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(engine, metrics);
        frame.render_widget(stats, chunks[0]);

        // The final board stays visible under the game over panel
        let grid = self.render_grid(canvas, engine.status());
        frame.render_widget(grid, chunks[1]);

        if engine.status() == GameStatus::Over {
            let panel = centered(chunks[1], 44, 9);
            frame.render_widget(Clear, panel);
            frame.render_widget(self.render_game_over(engine), panel);
        }

        let controls = self.render_controls(engine.status());
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, canvas: &GridCanvas, status: GameStatus) -> Paragraph<'_> {
        let lines: Vec<Line> = canvas
            .rows()
            .map(|row| {
                Line::from(
                    row.iter()
                        .map(|&cell| Span::styled(canvas.tile_text(cell), cell_style(cell)))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        let title = match status {
            GameStatus::Idle => " Snake - press Enter to start ",
            GameStatus::Paused => " Snake - paused ",
            GameStatus::Running | GameStatus::Over => " Snake ",
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats<S: Scoreboard>(
        &self,
        engine: &GameEngine<S>,
        metrics: &GameMetrics,
    ) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(engine.score().to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("High score: ", label),
            Span::styled(engine.high_score().to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled(engine.status().label(), status_style(engine.status())),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over<S: Scoreboard>(&self, engine: &GameEngine<S>) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    engine.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        if engine.is_new_high_score() {
            text.push(Line::from(vec![Span::styled(
                "New high score!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]));
        }

        text.extend([
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ]);

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, status: GameStatus) -> Paragraph<'_> {
        let key = Style::default().fg(Color::Cyan);
        let start_hint = if status == GameStatus::Paused {
            " resume | "
        } else {
            " start | "
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", key),
            Span::raw(" or "),
            Span::styled("WASD", key),
            Span::raw(" to move | "),
            Span::styled("Enter", key),
            Span::raw(start_hint),
            Span::styled("P", key),
            Span::raw(" pause | "),
            Span::styled("R", key),
            Span::raw(" reset | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

/// Rect of at most `width × height` in the middle of `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn cell_style(cell: Cell) -> Style {
    match cell {
        Cell::Head => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        Cell::Body => Style::default().fg(Color::Green),
        Cell::Food => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Cell::Empty => Style::default().fg(Color::DarkGray),
    }
}

fn status_style(status: GameStatus) -> Style {
    let color = match status {
        GameStatus::Idle => Color::Gray,
        GameStatus::Running => Color::Green,
        GameStatus::Paused => Color::Yellow,
        GameStatus::Over => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
