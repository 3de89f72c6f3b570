//! Run-length win detection.

use crate::board::{Board, Player};

/// One of the four scan axes through a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Axis {
    Horizontal,
    Vertical,
    /// Bottom-left to top-right.
    DiagonalUp,
    /// Top-left to bottom-right.
    DiagonalDown,
}

pub const ALL_AXES: [Axis; 4] = [
    Axis::Horizontal,
    Axis::Vertical,
    Axis::DiagonalUp,
    Axis::DiagonalDown,
];

impl Axis {
    /// Unit step (row, col) in the axis's positive direction.
    pub const fn step(self) -> (isize, isize) {
        match self {
            Axis::Horizontal => (0, 1),
            Axis::Vertical => (1, 0),
            Axis::DiagonalUp => (-1, 1),
            Axis::DiagonalDown => (1, 1),
        }
    }
}

/// Counts contiguous same-player stones along one direction from (row, col),
/// excluding the starting cell. Stops at the board edge or a non-matching cell.
pub(crate) fn run_toward(board: &Board, row: usize, col: usize, dr: isize, dc: isize, player: Player) -> usize {
    let mut count = 0;
    let mut r = row as isize + dr;
    let mut c = col as isize + dc;
    while r >= 0 && c >= 0 && (r as usize) < board.rows() && (c as usize) < board.cols() {
        if board.cell(r as usize, c as usize) != Some(player) {
            break;
        }
        count += 1;
        r += dr;
        c += dc;
    }
    count
}

/// Checks whether the stone at (row, col) completes a run of `win_len`.
///
/// Scans the four axes outward in both directions from the given cell and
/// returns the owning player if any axis reaches `win_len`. Returns `None`
/// for an empty cell. Cost is O(win_len) per axis.
pub fn winner_at(board: &Board, row: usize, col: usize, win_len: usize) -> Option<Player> {
    let player = board.cell(row, col)?;
    for axis in ALL_AXES {
        let (dr, dc) = axis.step();
        let run = 1
            + run_toward(board, row, col, dr, dc, player)
            + run_toward(board, row, col, -dr, -dc, player);
        if run >= win_len {
            return Some(player);
        }
    }
    None
}

/// A full board with no winner is a draw. Win detection happens per move, so
/// this only needs the occupancy check.
pub fn is_draw(board: &Board) -> bool {
    board.is_full()
}
