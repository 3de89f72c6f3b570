//! Iterative-deepening negamax with alpha-beta pruning.
//!
//! Searches a cloned board, never the live one. Each deepening iteration
//! runs to completion or is abandoned wholesale when the deadline or node
//! budget trips; the result always comes from the last finished iteration,
//! so a timeout degrades depth rather than correctness. Wins are scored
//! minus the ply they occur at, which steers the line toward the fastest
//! win and the slowest loss.

use std::io::Write;
use std::time::{Duration, Instant};

use crate::board::{Board, Player};
use crate::eval::{evaluate, WIN_SCORE};
use crate::movegen::{candidate_cells, order_center_out};
use crate::rules::winner_at;

/// Alpha-beta bound beyond any reachable score.
const INF: i32 = WIN_SCORE + 1;

/// How many nodes between deadline checks.
const CHECK_INTERVAL: u64 = 1024;

/// Proximity radius for candidate generation on free-placement boards.
const CANDIDATE_RADIUS: usize = 2;

/// Per-request search bounds. These are difficulty parameters, not global
/// constants.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub movetime: Duration,
    pub node_budget: u64,
}

/// Result of a search: the best landing cell and associated statistics.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult {
    pub best_cell: Option<(usize, usize)>,
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth: u8,
    pub nodes: u64,
}

struct SearchCtx {
    win_len: usize,
    deadline: Instant,
    node_budget: u64,
    nodes: u64,
    stopped: bool,
}

impl SearchCtx {
    #[inline]
    fn tick(&mut self) -> bool {
        self.nodes += 1;
        if self.nodes % CHECK_INTERVAL == 0
            && (self.nodes >= self.node_budget || Instant::now() >= self.deadline)
        {
            self.stopped = true;
        }
        self.stopped
    }
}

/// Searches for the best cell among `root_cells` for `player` to move.
///
/// `info` lines (depth, score, nodes, elapsed) are written to `out` after
/// each completed iteration, following the engine protocol convention.
pub fn search<W: Write>(
    board: &Board,
    player: Player,
    win_len: usize,
    root_cells: &[(usize, usize)],
    limits: &SearchLimits,
    out: &mut W,
) -> SearchResult {
    let start = Instant::now();
    let mut ctx = SearchCtx {
        win_len,
        deadline: start + limits.movetime,
        node_budget: limits.node_budget,
        nodes: 0,
        stopped: false,
    };

    let mut scratch = board.clone();
    let mut roots = root_cells.to_vec();
    order_center_out(&scratch, &mut roots);

    let mut result = SearchResult {
        best_cell: roots.first().copied(),
        score: 0,
        depth: 0,
        nodes: 0,
    };

    for depth in 1..=limits.max_depth {
        let mut iter_best: Option<(usize, usize)> = None;
        let mut iter_score = -INF;
        let mut alpha = -INF;

        for &(row, col) in &roots {
            scratch.set(row, col, Some(player)).ok();
            let score = if winner_at(&scratch, row, col, win_len).is_some() {
                WIN_SCORE
            } else if depth == 1 {
                evaluate(&scratch, player, win_len)
            } else {
                -negamax(
                    &mut ctx,
                    &mut scratch,
                    player.opponent(),
                    depth - 1,
                    1,
                    -INF,
                    -alpha,
                )
            };
            scratch.set(row, col, None).ok();

            if ctx.stopped {
                break;
            }
            if score > iter_score {
                iter_score = score;
                iter_best = Some((row, col));
                alpha = alpha.max(score);
            }
        }

        if ctx.stopped {
            break;
        }

        result = SearchResult {
            best_cell: iter_best,
            score: iter_score,
            depth,
            nodes: ctx.nodes,
        };
        let _ = writeln!(
            out,
            "info depth {} score {} nodes {} time {}",
            depth,
            iter_score,
            ctx.nodes,
            start.elapsed().as_millis()
        );

        // A forced win needs no deeper confirmation.
        if iter_score >= WIN_SCORE - limits.max_depth as i32 {
            break;
        }
    }

    result.nodes = ctx.nodes;
    result
}

/// Negamax over moves for `player`; returns the score from `player`'s
/// perspective. `board` is mutated and restored in place.
fn negamax(
    ctx: &mut SearchCtx,
    board: &mut Board,
    player: Player,
    depth: u8,
    ply: u8,
    mut alpha: i32,
    beta: i32,
) -> i32 {
    if ctx.tick() {
        return 0;
    }
    if board.is_full() {
        return 0;
    }

    let mut cells = candidate_cells(board, CANDIDATE_RADIUS);
    order_center_out(board, &mut cells);

    let mut best = -INF;
    for (row, col) in cells {
        board.set(row, col, Some(player)).ok();
        let score = if winner_at(board, row, col, ctx.win_len).is_some() {
            WIN_SCORE - ply as i32
        } else if depth <= 1 {
            evaluate(board, player, ctx.win_len)
        } else {
            -negamax(ctx, board, player.opponent(), depth - 1, ply + 1, -beta, -alpha)
        };
        board.set(row, col, None).ok();

        if ctx.stopped {
            return best.max(score);
        }
        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }
    best
}
