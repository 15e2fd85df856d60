use super::Renderer;
use crate::game::{Position, Snake};

/// Content of one board tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Head,
    Body,
    Food,
}

impl Cell {
    pub fn glyph(&self) -> char {
        match self {
            Cell::Empty => '·',
            Cell::Head => '■',
            Cell::Body => '□',
            Cell::Food => '●',
        }
    }
}

/// Square cell buffer of `tile_count × tile_count` tiles
///
/// Each tile is drawn `cell_width` terminal columns wide. Positions off the
/// board, such as the head after a wall hit, are not drawn.
#[derive(Debug, Clone)]
pub struct GridCanvas {
    tile_count: usize,
    cell_width: u16,
    cells: Vec<Cell>,
}

impl GridCanvas {
    pub fn new(tile_count: usize, cell_width: u16) -> Self {
        Self {
            tile_count,
            cell_width: cell_width.max(1),
            cells: vec![Cell::Empty; tile_count * tile_count],
        }
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn cell_width(&self) -> u16 {
        self.cell_width
    }

    /// Cell at `pos`, `None` when off the board
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.tile_count.max(1))
    }

    /// Text of one tile padded to the cell width
    pub fn tile_text(&self, cell: Cell) -> String {
        let mut text = String::with_capacity(self.cell_width as usize * 3);
        text.push(cell.glyph());
        text.extend(std::iter::repeat(' ').take(self.cell_width as usize - 1));
        text
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.is_within(self.tile_count) {
            Some(pos.y as usize * self.tile_count + pos.x as usize)
        } else {
            None
        }
    }

    fn paint(&mut self, pos: Position, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }
}

impl Renderer for GridCanvas {
    fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    fn draw_snake(&mut self, snake: &Snake) {
        for segment in snake.segments().skip(1) {
            self.paint(segment, Cell::Body);
        }
        self.paint(snake.head(), Cell::Head);
    }

    fn draw_food(&mut self, food: Position) {
        self.paint(food, Cell::Food);
    }
}
