use thiserror::Error;

use crate::types::Color;

/// Rejected move or pass. A rejected call never mutates the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("cell ({col}, {row}) is outside the 9x7 board")]
    OutOfBounds { col: i32, row: i32 },

    #[error("game is already over")]
    GameOver,

    #[error("it is not {0:?}'s turn")]
    WrongTurn(Color),

    #[error("illegal move at ({col}, {row})")]
    NotPlayable { col: u8, row: u8 },

    #[error("{0:?} has no legal move")]
    NoLegalMove(Color),

    #[error("cannot pass while a legal move exists")]
    CannotPass,
}

/// Saved game that disagrees with its own grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("stored {color:?} score {stored} does not match the {actual} disks on the grid")]
    ScoreMismatch { color: Color, stored: u8, actual: u8 },

    #[error("stored game-over flag {stored} does not match the grid (expected {actual})")]
    TerminalFlagMismatch { stored: bool, actual: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeightsError {
    #[error("weights data too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("invalid weights magic (expected OWGT)")]
    InvalidMagic,

    #[error("unsupported weights version: expected {expected}, got {actual}")]
    UnsupportedVersion { expected: u32, actual: u32 },

    #[error("weights table has {0} cells, expected 63")]
    CellCountMismatch(u32),

    #[error("CRC32 mismatch: expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch { expected: u32, actual: u32 },

    #[error("weights payload length {0} does not match 63 entries")]
    PayloadLength(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("search depth must be between 1 and {max}, got {depth}")]
    InvalidDepth { depth: u8, max: u8 },

    #[error("search depth must be at most {max}, got {depth}")]
    DepthTooLarge { depth: i32, max: u8 },
}
