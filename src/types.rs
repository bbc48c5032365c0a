use serde::{Deserialize, Serialize};

pub const COLUMNS: usize = 9;
pub const ROWS: usize = 7;
pub const NUM_CELLS: usize = COLUMNS * ROWS;

/// Color of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn from_is_white(is_white: bool) -> Self {
        if is_white { Self::White } else { Self::Black }
    }

    pub fn is_white(self) -> bool {
        self == Self::White
    }

    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

/// Content of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    White,
    Black,
}

impl Cell {
    pub fn color(self) -> Option<Color> {
        match self {
            Self::Empty => None,
            Self::White => Some(Color::White),
            Self::Black => Some(Color::Black),
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }
}

/// A board coordinate, always inside the 9x7 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub col: u8,
    pub row: u8,
}

impl Position {
    /// Validates caller-supplied coordinates. Negative or too large values yield `None`.
    pub fn new(col: i32, row: i32) -> Option<Self> {
        if (0..COLUMNS as i32).contains(&col) && (0..ROWS as i32).contains(&row) {
            Some(Self {
                col: col as u8,
                row: row as u8,
            })
        } else {
            None
        }
    }

    /// Column-major, row-minor enumeration of every cell.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..COLUMNS as u8).flat_map(|col| (0..ROWS as u8).map(move |row| Self { col, row }))
    }

    /// `(col, row)` pair, `(-1, -1)` when there is no position.
    pub fn to_pair(position: Option<Self>) -> (i32, i32) {
        position.map_or((-1, -1), |p| (p.col as i32, p.row as i32))
    }
}

/// Plain data snapshot of a game, enough to resume it later.
/// Clocks are owned by the shell and not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Column-major grid: `cells[col][row]`.
    pub cells: [[Cell; ROWS]; COLUMNS],
    pub white_turn: bool,
    pub white_score: u8,
    pub black_score: u8,
    pub is_over: bool,
}

/// Delta returned by a successful move, used by the shell to refresh its view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub played: Position,
    pub color: Color,
    /// Contract: only opposing disks turned to `color`, never `played` itself.
    pub flipped: Vec<Position>,
    /// `true` when the opponent had no legal move and `color` moves again.
    pub opponent_passed: bool,
    pub white_turn: bool,
    pub white_score: u8,
    pub black_score: u8,
    pub is_over: bool,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// `None` on a tie.
    pub winner: Option<Color>,
    pub white_score: u8,
    pub black_score: u8,
}
