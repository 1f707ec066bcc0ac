use crate::config::{MAX_PALETTE_SIZE, MAX_WIDTH, MIN_PALETTE_SIZE, MIN_WIDTH};
use crate::error::EngineError;
use crate::rng::TokenSource;

/// One color from the palette, `0..palette_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(u8);

impl Token {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

/// `None` is the empty marker: no token, awaiting refill.
pub type Cell = Option<Token>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

/// Square token grid stored row-major: `index = row * width + col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a board with every cell empty.
    pub fn empty(width: usize) -> Self {
        Self {
            width,
            cells: vec![None; width * width],
        }
    }

    /// Fills all `width * width` cells with uniform draws from `source`.
    /// Pre-existing matches are left in place.
    pub fn random(
        width: usize,
        palette_size: u8,
        source: &mut dyn TokenSource,
    ) -> Result<Self, EngineError> {
        check_width(width)?;
        if !(MIN_PALETTE_SIZE..=MAX_PALETTE_SIZE).contains(&palette_size) {
            return Err(EngineError::InvalidPalette(palette_size));
        }
        let cells = (0..width * width)
            .map(|_| Some(source.next_token(palette_size)))
            .collect();
        Ok(Self { width, cells })
    }

    pub fn from_cells(
        width: usize,
        palette_size: u8,
        cells: Vec<Cell>,
    ) -> Result<Self, EngineError> {
        check_width(width)?;
        let expected = width * width;
        if cells.len() != expected {
            return Err(EngineError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        for (index, cell) in cells.iter().enumerate() {
            if let Some(token) = cell
                && token.value() >= palette_size
            {
                return Err(EngineError::TokenOutOfPalette {
                    index,
                    token: token.value(),
                    palette_size,
                });
            }
        }
        Ok(Self { width, cells })
    }

    /// Inverse of [`Board::to_array`]: 0=empty, n=token n-1.
    pub fn from_values(width: usize, palette_size: u8, values: &[u8]) -> Result<Self, EngineError> {
        let cells = values
            .iter()
            .map(|&v| v.checked_sub(1).map(Token::new))
            .collect();
        Self::from_cells(width, palette_size, cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns `None` when `index` is off the board.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub(crate) fn set(&mut self, index: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = cell;
        }
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        if a < self.cells.len() && b < self.cells.len() {
            self.cells.swap(a, b);
        }
    }

    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.width, index % self.width)
    }

    /// Orthogonal neighbor of `index`, or `None` if it would leave the grid.
    /// Horizontal moves never wrap into the adjacent row.
    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        if index >= self.cells.len() {
            return None;
        }
        let (row, col) = self.row_col(index);
        let (dr, dc) = direction.delta();
        let r = row as i32 + dr;
        let c = col as i32 + dc;
        if self.in_bounds(r, c) {
            Some(r as usize * self.width + c as usize)
        } else {
            None
        }
    }

    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        Direction::ALL
            .iter()
            .any(|&direction| self.neighbor(a, direction) == Some(b))
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Flat export where 0=empty and n=token n-1.
    pub fn to_array(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|cell| cell.map_or(0, |token| token.value() + 1))
            .collect()
    }

    /// CRC32 of [`Board::to_array`]; changes whenever any cell changes.
    pub fn digest(&self) -> u32 {
        crc32fast::hash(&self.to_array())
    }

    fn in_bounds(&self, row: i32, col: i32) -> bool {
        let width = self.width as i32;
        (0..width).contains(&row) && (0..width).contains(&col)
    }
}

fn check_width(width: usize) -> Result<(), EngineError> {
    if width < MIN_WIDTH {
        return Err(EngineError::WidthTooSmall(width));
    }
    if width > MAX_WIDTH {
        return Err(EngineError::WidthTooLarge(width));
    }
    Ok(())
}

impl Default for Board {
    fn default() -> Self {
        Self::empty(crate::config::DEFAULT_WIDTH)
    }
}
