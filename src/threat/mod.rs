//! Tactical pattern analysis.
//!
//! Classifies the threats on a board: open and closed runs one or two stones
//! short of the win length, cells that win immediately, forks the defender
//! cannot answer, and an ordinal threat level for candidate cells. Every
//! function here is pure: board snapshot and player in, data out.
//!
//! A "completion" of a run must be a playable cell, so in gravity mode a
//! cell floating above the current column height does not count as an
//! immediate threat.

use serde::Serialize;

use crate::board::{Board, Player};
use crate::movegen::legal_cells;
use crate::rules::{run_toward, Axis, ALL_AXES};

/// The tactical classes a threat record can carry.
///
/// `OpenThree` and `ClosedFour` generalize to any win length: an open run two
/// short of the win length, and a run one short with a single completion
/// point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThreatKind {
    OpenThree,
    ClosedFour,
    Fork,
    WinningMove,
    BlockingMove,
}

/// One detected threat, recomputed on demand and never stored in live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThreatRecord {
    pub row: usize,
    pub col: usize,
    /// The axis the threat runs along, when it has one; forks span axes.
    pub axis: Option<Axis>,
    pub kind: ThreatKind,
    pub owner: Player,
}

/// Open/closed/dead run tallies indexed by run length (clamped to 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunCounts {
    pub open: [usize; 8],
    pub closed: [usize; 8],
    /// Runs with both flanks blocked. Worthless short of the win length,
    /// but a dead run at the win length is still a finished win.
    pub dead: [usize; 8],
}

/// True if placing `player` at the empty cell (row, col) completes a run of
/// `win_len` on some axis.
pub fn wins_immediately(
    board: &Board,
    row: usize,
    col: usize,
    player: Player,
    win_len: usize,
) -> bool {
    debug_assert!(board.cell(row, col).is_none());
    for axis in ALL_AXES {
        let (dr, dc) = axis.step();
        let run = 1
            + run_toward(board, row, col, dr, dc, player)
            + run_toward(board, row, col, -dr, -dc, player);
        if run >= win_len {
            return true;
        }
    }
    false
}

/// All playable cells where `player` wins immediately, in legal-move order.
pub fn winning_cells(board: &Board, player: Player, win_len: usize) -> Vec<(usize, usize)> {
    legal_cells(board)
        .into_iter()
        .filter(|&(r, c)| wins_immediately(board, r, c, player, win_len))
        .collect()
}

/// All playable cells where `player` must move to stop the opponent winning
/// on their next turn.
pub fn blocking_cells(board: &Board, player: Player, win_len: usize) -> Vec<(usize, usize)> {
    winning_cells(board, player.opponent(), win_len)
}

/// True if `player` already has two or more disjoint immediate winning
/// cells: a single reply cannot block both.
pub fn has_fork(board: &Board, player: Player, win_len: usize) -> bool {
    let mut found = 0;
    for (r, c) in legal_cells(board) {
        if wins_immediately(board, r, c, player, win_len) {
            found += 1;
            if found >= 2 {
                return true;
            }
        }
    }
    false
}

/// True if placing `player` at the playable cell (row, col) leaves them with
/// a fork.
pub fn creates_fork(
    board: &Board,
    row: usize,
    col: usize,
    player: Player,
    win_len: usize,
) -> bool {
    let mut probe = board.clone();
    if probe.set(row, col, Some(player)).is_err() {
        return false;
    }
    has_fork(&probe, player, win_len)
}

/// Walks every maximal same-player run on the board, calling `visit` with
/// the run's start cell, axis, length, and flank openness (empty in-bounds
/// cell on the negative / positive side).
fn scan_runs(
    board: &Board,
    player: Player,
    mut visit: impl FnMut((usize, usize), Axis, usize, bool, bool),
) {
    let flank_empty = |r: isize, c: isize| -> bool {
        r >= 0
            && c >= 0
            && board.in_bounds(r as usize, c as usize)
            && board.cell(r as usize, c as usize).is_none()
    };

    for axis in ALL_AXES {
        let (dr, dc) = axis.step();
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                if board.cell(row, col) != Some(player) {
                    continue;
                }
                // Only start from the first stone of a maximal run.
                let pr = row as isize - dr;
                let pc = col as isize - dc;
                let prev_same = pr >= 0
                    && pc >= 0
                    && board.in_bounds(pr as usize, pc as usize)
                    && board.cell(pr as usize, pc as usize) == Some(player);
                if prev_same {
                    continue;
                }

                let len = 1 + run_toward(board, row, col, dr, dc, player);
                let end_r = row as isize + dr * len as isize;
                let end_c = col as isize + dc * len as isize;
                let open_neg = flank_empty(pr, pc);
                let open_pos = flank_empty(end_r, end_c);
                visit((row, col), axis, len, open_neg, open_pos);
            }
        }
    }
}

/// Tallies open and closed runs per length for `player`.
///
/// A run with both flanks empty and in-bounds is open; with exactly one, it
/// is closed; with neither, it is dead and not counted.
pub fn run_counts(board: &Board, player: Player) -> RunCounts {
    let mut counts = RunCounts::default();
    scan_runs(board, player, |_, _, len, open_neg, open_pos| {
        let len = len.min(7);
        match (open_neg, open_pos) {
            (true, true) => counts.open[len] += 1,
            (true, false) | (false, true) => counts.closed[len] += 1,
            (false, false) => counts.dead[len] += 1,
        }
    });
    counts
}

/// Collects the threat records for `player`: open runs two short of the win
/// length, closed runs one short, immediate winning cells, and forks.
pub fn run_records(board: &Board, player: Player, win_len: usize) -> Vec<ThreatRecord> {
    let mut records = Vec::new();

    scan_runs(board, player, |(row, col), axis, len, open_neg, open_pos| {
        if win_len >= 2 && len == win_len - 2 && open_neg && open_pos {
            records.push(ThreatRecord {
                row,
                col,
                axis: Some(axis),
                kind: ThreatKind::OpenThree,
                owner: player,
            });
        }
        if len == win_len - 1 && (open_neg ^ open_pos) {
            // Single completion point: the open flank.
            let (dr, dc) = axis.step();
            let (cr, cc) = if open_neg {
                (row as isize - dr, col as isize - dc)
            } else {
                (row as isize + dr * len as isize, col as isize + dc * len as isize)
            };
            records.push(ThreatRecord {
                row: cr as usize,
                col: cc as usize,
                axis: Some(axis),
                kind: ThreatKind::ClosedFour,
                owner: player,
            });
        }
    });

    let wins = winning_cells(board, player, win_len);
    let fork = wins.len() >= 2;
    for &(row, col) in &wins {
        records.push(ThreatRecord {
            row,
            col,
            axis: None,
            kind: ThreatKind::WinningMove,
            owner: player,
        });
        if fork {
            records.push(ThreatRecord {
                row,
                col,
                axis: None,
                kind: ThreatKind::Fork,
                owner: player,
            });
        }
    }
    for &(row, col) in &winning_cells(board, player.opponent(), win_len) {
        records.push(ThreatRecord {
            row,
            col,
            axis: None,
            kind: ThreatKind::BlockingMove,
            owner: player,
        });
    }

    records
}

/// True if placing at (row, col) gives `player` an open run of at least
/// `win_len - 2` through that cell.
fn creates_open_run(
    board: &Board,
    row: usize,
    col: usize,
    player: Player,
    win_len: usize,
) -> bool {
    let needed = win_len.saturating_sub(2).max(2);
    for axis in ALL_AXES {
        let (dr, dc) = axis.step();
        let back = run_toward(board, row, col, -dr, -dc, player);
        let fwd = run_toward(board, row, col, dr, dc, player);
        let len = 1 + back + fwd;
        if len < needed {
            continue;
        }
        let neg_r = row as isize - dr * (back as isize + 1);
        let neg_c = col as isize - dc * (back as isize + 1);
        let pos_r = row as isize + dr * (fwd as isize + 1);
        let pos_c = col as isize + dc * (fwd as isize + 1);
        let open = |r: isize, c: isize| {
            r >= 0
                && c >= 0
                && board.in_bounds(r as usize, c as usize)
                && board.cell(r as usize, c as usize).is_none()
        };
        if open(neg_r, neg_c) && open(pos_r, pos_c) {
            return true;
        }
    }
    false
}

/// True if (row, col) touches one of `player`'s stones in its
/// 8-neighborhood.
fn adjacent_to_own_stone(board: &Board, row: usize, col: usize, player: Player) -> bool {
    for dr in -1isize..=1 {
        for dc in -1isize..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let r = row as isize + dr;
            let c = col as isize + dc;
            if r >= 0
                && c >= 0
                && board.in_bounds(r as usize, c as usize)
                && board.cell(r as usize, c as usize) == Some(player)
            {
                return true;
            }
        }
    }
    false
}

/// Ordinal urgency of playing (row, col) for `player`.
///
/// 5 wins immediately, 4 blocks an immediate opponent win, 3 creates a fork,
/// 2 creates an open run, 1 has minor positional value (adjacent to an own
/// stone or near the center), 0 otherwise. Unplayable cells are always 0.
pub fn threat_level(
    board: &Board,
    row: usize,
    col: usize,
    player: Player,
    win_len: usize,
) -> u8 {
    if !board.in_bounds(row, col) || board.cell(row, col).is_some() {
        return 0;
    }
    if board.gravity() && board.drop_row(col) != Some(row) {
        return 0;
    }

    if wins_immediately(board, row, col, player, win_len) {
        return 5;
    }
    if wins_immediately(board, row, col, player.opponent(), win_len) {
        return 4;
    }
    if creates_fork(board, row, col, player, win_len) {
        return 3;
    }
    if creates_open_run(board, row, col, player, win_len) {
        return 2;
    }

    let near_center = row.abs_diff(board.rows() / 2) <= 1 && col.abs_diff(board.cols() / 2) <= 1;
    if adjacent_to_own_stone(board, row, col, player) || near_center {
        return 1;
    }
    0
}
