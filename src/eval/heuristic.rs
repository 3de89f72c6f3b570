//! Heuristic position evaluation.
//!
//! Evaluates a board from one player's perspective as a weighted feature
//! sum: open and closed run counts by length, fork presence, center
//! proximity, and a height penalty in gravity mode. The score is
//! antisymmetric by construction: `evaluate(b, A) == -evaluate(b, B)`.
//! Terminal positions short-circuit to the win magnitude, which dominates
//! any heuristic sum.

use serde::Serialize;

use crate::board::{Board, Player};
use crate::threat::{run_counts, winning_cells};

/// Score of a won position. Every heuristic sum is clamped below this.
pub const WIN_SCORE: i32 = 10_000;

/// Weight for holding two or more simultaneous winning cells.
const FORK_WEIGHT: i32 = 3_000;

/// Run weights indexed by distance to the win length (1 = one stone short).
/// Open runs dwarf closed ones at the same length.
const OPEN_RUN_WEIGHTS: [i32; 4] = [0, 2_000, 400, 50];
const CLOSED_RUN_WEIGHTS: [i32; 4] = [0, 800, 100, 10];

/// Per-stone weight of center proximity.
const CENTER_WEIGHT: i32 = 3;

/// Per-stone penalty for height above the column floor (gravity only).
const HEIGHT_WEIGHT: i32 = 1;

/// Coarse game phase by fill ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Opening,
    Middle,
    Endgame,
}

/// Classifies the phase from the move count: opening below 20% filled,
/// endgame above 80%, middle otherwise.
pub fn classify_phase(move_count: usize, total_cells: usize) -> Phase {
    debug_assert!(total_cells > 0);
    if move_count * 5 < total_cells {
        Phase::Opening
    } else if move_count * 5 > total_cells * 4 {
        Phase::Endgame
    } else {
        Phase::Middle
    }
}

/// Scalar score plus the feature breakdown it came from.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub score: i32,
    pub phase: Phase,
    /// Open runs one and two stones short of the win length, own then
    /// opponent.
    pub own_open_runs: usize,
    pub opp_open_runs: usize,
    pub own_fork: bool,
    pub opp_fork: bool,
    /// Center-proximity differential (own minus opponent).
    pub connectivity: i32,
}

struct SideFeatures {
    has_win: bool,
    run_score: i32,
    open_threats: usize,
    fork: bool,
    center: i32,
    height: i32,
}

fn side_features(board: &Board, player: Player, win_len: usize) -> SideFeatures {
    let counts = run_counts(board, player);

    let mut has_win = false;
    let mut run_score = 0;
    let mut open_threats = 0;
    for len in 1..counts.open.len() {
        let open = counts.open[len];
        let closed = counts.closed[len];
        if len >= win_len && open + closed + counts.dead[len] > 0 {
            has_win = true;
        }
        if len >= win_len {
            continue;
        }
        let gap = win_len - len;
        if gap < OPEN_RUN_WEIGHTS.len() {
            run_score += OPEN_RUN_WEIGHTS[gap] * open as i32;
            run_score += CLOSED_RUN_WEIGHTS[gap] * closed as i32;
            if gap <= 2 {
                open_threats += open;
            }
        }
    }

    let fork = winning_cells(board, player, win_len).len() >= 2;

    let mut center = 0;
    let mut height = 0;
    let max_dist = (board.rows() / 2 + board.cols() / 2) as i32;
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            if board.cell(row, col) != Some(player) {
                continue;
            }
            let dist = row.abs_diff(board.rows() / 2) + col.abs_diff(board.cols() / 2);
            center += max_dist - dist as i32;
            if board.gravity() {
                height += (board.rows() - 1 - row) as i32;
            }
        }
    }

    SideFeatures {
        has_win,
        run_score,
        open_threats,
        fork,
        center,
        height,
    }
}

fn side_score(f: &SideFeatures) -> i32 {
    let mut score = f.run_score;
    if f.fork {
        score += FORK_WEIGHT;
    }
    score += CENTER_WEIGHT * f.center;
    score -= HEIGHT_WEIGHT * f.height;
    score
}

/// Evaluates the board for `player`. Positive favors `player`.
pub fn evaluate(board: &Board, player: Player, win_len: usize) -> i32 {
    let own = side_features(board, player, win_len);
    let opp = side_features(board, player.opponent(), win_len);

    if own.has_win {
        return WIN_SCORE;
    }
    if opp.has_win {
        return -WIN_SCORE;
    }

    (side_score(&own) - side_score(&opp)).clamp(-(WIN_SCORE - 1), WIN_SCORE - 1)
}

/// Evaluates the board and reports the feature breakdown.
pub fn evaluate_detailed(board: &Board, player: Player, win_len: usize) -> EvaluationResult {
    let own = side_features(board, player, win_len);
    let opp = side_features(board, player.opponent(), win_len);

    let score = if own.has_win {
        WIN_SCORE
    } else if opp.has_win {
        -WIN_SCORE
    } else {
        (side_score(&own) - side_score(&opp)).clamp(-(WIN_SCORE - 1), WIN_SCORE - 1)
    };

    EvaluationResult {
        score,
        phase: classify_phase(board.stone_count(), board.cell_count()),
        own_open_runs: own.open_threats,
        opp_open_runs: opp.open_threats,
        own_fork: own.fork,
        opp_fork: opp.fork,
        connectivity: own.center - opp.center,
    }
}
