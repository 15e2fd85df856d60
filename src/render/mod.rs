//! Drawing the board
//!
//! [`Renderer`] is the drawing surface the game state is pushed into after
//! every tick and reset. [`GridCanvas`] implements it as a cell buffer, and
//! [`TerminalView`] turns that buffer into a ratatui frame.

pub mod canvas;
pub mod renderer;

pub use canvas::{Cell, GridCanvas};
pub use renderer::TerminalView;

use crate::game::{GameEngine, Position, Snake};
use crate::scoreboard::Scoreboard;

pub trait Renderer {
    fn clear(&mut self);

    /// Draw every segment, the head distinguishable from the body
    fn draw_snake(&mut self, snake: &Snake);

    fn draw_food(&mut self, food: Position);
}

/// Redraw the whole board from the engine's current state
pub fn draw<R, S>(renderer: &mut R, engine: &GameEngine<S>)
where
    R: Renderer + ?Sized,
    S: Scoreboard,
{
    renderer.clear();
    renderer.draw_snake(engine.snake());
    renderer.draw_food(engine.food());
}
