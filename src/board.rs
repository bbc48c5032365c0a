use crate::types::{COLUMNS, Cell, Color, NUM_CELLS, Position, ROWS};

const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
/// Longest possible walk from a cell before leaving the board.
const MAX_DISTANCE: i32 = (COLUMNS - 1) as i32;

/// 9x7 grid of cells indexed `[col][row]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; ROWS]; COLUMNS],
}

impl Board {
    /// Creates the starting board:
    /// (3,3)=white, (4,4)=white, (4,3)=black, (3,4)=black.
    pub fn new() -> Self {
        let mut cells = [[Cell::Empty; ROWS]; COLUMNS];
        cells[3][3] = Cell::White;
        cells[4][4] = Cell::White;
        cells[4][3] = Cell::Black;
        cells[3][4] = Cell::Black;
        Self { cells }
    }

    pub fn from_cells(cells: [[Cell; ROWS]; COLUMNS]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[[Cell; ROWS]; COLUMNS] {
        &self.cells
    }

    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[pos.col as usize][pos.row as usize]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.col as usize][pos.row as usize] = cell;
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.cell(pos) == Cell::Empty
    }

    /// Number of disks of `color` on the grid.
    pub fn count(&self, color: Color) -> u8 {
        let target = Cell::from(color);
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == target)
            .count() as u8
    }

    pub fn empty_count(&self) -> u8 {
        NUM_CELLS as u8 - self.count(Color::White) - self.count(Color::Black)
    }

    /// Returns whether `color` may place a disk at `pos`.
    ///
    /// The cell must be empty and at least one direction must start with a run
    /// of opposing disks closed by a disk of `color`. Off-board and empty
    /// cells end a direction at any distance.
    pub fn is_cell_playable(&self, pos: Position, color: Color) -> bool {
        if !self.is_empty(pos) {
            return false;
        }
        DIRECTIONS
            .iter()
            .any(|&dir| self.bracket_length(pos, dir, color).is_some_and(|len| len > 0))
    }

    /// All cells playable by `color`, enumerated column-major then row-minor.
    pub fn playable_cells(&self, color: Color) -> Vec<Position> {
        Position::all()
            .filter(|&pos| self.is_cell_playable(pos, color))
            .collect()
    }

    /// Flips every bracketed run around `pos`, which must already hold `color`.
    /// Directions without a closing disk of `color` flip nothing.
    /// Returns the flipped cells, nearest first within each direction.
    pub fn apply_move(&mut self, pos: Position, color: Color) -> Vec<Position> {
        let mut flipped = Vec::new();

        for dir in DIRECTIONS {
            let Some(len) = self.bracket_length(pos, dir, color) else {
                continue;
            };
            for distance in 1..=len as i32 {
                if let Some(target) = offset(pos, dir, distance) {
                    self.set(target, Cell::from(color));
                    flipped.push(target);
                }
            }
        }

        flipped
    }

    /// Places one disk and flips captured disks.
    /// Returns the flipped cells; an illegal placement returns an empty list
    /// and leaves the board unchanged.
    pub fn place(&mut self, pos: Position, color: Color) -> Vec<Position> {
        if !self.is_cell_playable(pos, color) {
            return Vec::new();
        }
        self.set(pos, Cell::from(color));
        self.apply_move(pos, color)
    }

    /// Walks from `pos` along `dir`. Returns how many opposing disks sit
    /// between `pos` and the first disk of `color`, or `None` when the walk
    /// reaches an empty or off-board cell first.
    fn bracket_length(&self, pos: Position, dir: (i32, i32), color: Color) -> Option<usize> {
        let mine = Cell::from(color);
        let theirs = Cell::from(color.opponent());
        let mut alive = true;
        let mut distance = 1;

        while alive && distance <= MAX_DISTANCE {
            let cell = offset(pos, dir, distance).map(|target| self.cell(target));
            match cell {
                Some(cell) if cell == mine => return Some(distance as usize - 1),
                Some(cell) if cell == theirs => distance += 1,
                _ => alive = false,
            }
        }

        None
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn offset(pos: Position, (dc, dr): (i32, i32), distance: i32) -> Option<Position> {
    Position::new(pos.col as i32 + dc * distance, pos.row as i32 + dr * distance)
}
