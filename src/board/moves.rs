//! Move value types.

use serde::Serialize;

use super::player::Player;

/// A move request from a caller.
///
/// Free-placement games name a cell; gravity games may name just a column
/// and let the engine derive the landing row at apply time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Place a stone on an exact cell.
    Place { row: usize, col: usize },
    /// Drop a stone into a column (gravity mode).
    Drop { col: usize },
}

impl Move {
    pub const fn place(row: usize, col: usize) -> Move {
        Move::Place { row, col }
    }

    pub const fn drop(col: usize) -> Move {
        Move::Drop { col }
    }
}

/// A committed move, as stored in the game history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub row: usize,
    pub col: usize,
    pub player: Player,
}

/// What happened when a move was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The cell the stone landed on.
    pub row: usize,
    pub col: usize,
    pub player: Player,
    /// Winner, if this move ended the game with a win.
    pub winner: Option<Player>,
    /// True if this move filled the board without a winner.
    pub draw: bool,
}

impl MoveOutcome {
    /// True if this move ended the game.
    pub fn terminal(&self) -> bool {
        self.winner.is_some() || self.draw
    }
}

/// Errors raised when applying a move to a live game.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("position ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("position ({row}, {col}) is already occupied")]
    PositionOccupied { row: usize, col: usize },

    #[error("column {col} is full")]
    ColumnFull { col: usize },

    #[error("the game is already over")]
    GameAlreadyOver,

    #[error("it is not that player's turn")]
    InvalidPlayer,
}
