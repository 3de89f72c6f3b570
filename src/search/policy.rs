//! The move-selection pipeline.
//!
//! Every decision request walks the same ordered stages:
//!
//! 1. **Win**: take any move that wins on the spot.
//! 2. **Block**: occupy the cell where the opponent would otherwise win.
//! 3. **Safety filter**: drop moves that hand the opponent an immediate
//!    winning reply, unless every move does.
//! 4. **Strategy**: pick among the survivors with the tier's backend —
//!    weighted random, playout sampling, or alpha-beta search.
//!
//! The ordering is a correctness contract, not a tuning choice: stages 1
//! and 2 make forced tactics exact at every tier, and only stage 4 is
//! heuristic. All stages work on clones or probe-and-restore; the caller's
//! board is never mutated.

use std::io::Write;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::Rng;

use crate::board::{Board, Player};
use crate::movegen::legal_cells;
use crate::threat::{threat_level, winning_cells, wins_immediately};

use super::minimax::{self, SearchLimits};
use super::playout;

/// Error raised when a move is requested on a board with no legal moves.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("no legal moves available")]
    NoLegalMoves,
}

/// The strategic backend a difficulty tier runs after the forced stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Weighted random choice; the attack/defense ratio is the tier's
    /// personality.
    Weighted { attack: f64, defense: f64 },
    /// Fixed number of random playouts per candidate.
    Playout { simulations: u32 },
    /// Bounded alpha-beta with a per-request deadline.
    Minimax { depth: u8, movetime_ms: u64 },
}

/// A named difficulty tier. Depth, time, and simulation counts live here,
/// never in global constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    pub name: &'static str,
    pub strategy: Strategy,
}

impl Difficulty {
    pub const fn easy() -> Difficulty {
        Difficulty {
            name: "easy",
            strategy: Strategy::Weighted {
                attack: 1.0,
                defense: 1.0,
            },
        }
    }

    pub const fn aggressive() -> Difficulty {
        Difficulty {
            name: "aggressive",
            strategy: Strategy::Weighted {
                attack: 1.7,
                defense: 0.5,
            },
        }
    }

    pub const fn defensive() -> Difficulty {
        Difficulty {
            name: "defensive",
            strategy: Strategy::Weighted {
                attack: 0.5,
                defense: 1.7,
            },
        }
    }

    pub const fn medium() -> Difficulty {
        Difficulty {
            name: "medium",
            strategy: Strategy::Playout { simulations: 64 },
        }
    }

    pub const fn hard() -> Difficulty {
        Difficulty {
            name: "hard",
            strategy: Strategy::Minimax {
                depth: 7,
                movetime_ms: 1_000,
            },
        }
    }

    /// Looks a tier up by protocol name.
    pub fn from_name(name: &str) -> Option<Difficulty> {
        match name {
            "easy" => Some(Difficulty::easy()),
            "aggressive" => Some(Difficulty::aggressive()),
            "defensive" => Some(Difficulty::defensive()),
            "medium" => Some(Difficulty::medium()),
            "hard" => Some(Difficulty::hard()),
            _ => None,
        }
    }

    pub const ALL_NAMES: [&'static str; 5] =
        ["easy", "aggressive", "defensive", "medium", "hard"];
}

/// Stage 1: the lowest-indexed move that wins immediately, if any.
pub(crate) fn stage_win(
    board: &Board,
    player: Player,
    win_len: usize,
    legal: &[(usize, usize)],
) -> Option<(usize, usize)> {
    legal
        .iter()
        .copied()
        .find(|&(r, c)| wins_immediately(board, r, c, player, win_len))
}

/// Stage 2: the cell the opponent must not be allowed to take.
///
/// With two or more independent opponent wins the position is already lost;
/// the pipeline blocks the cell with the highest threat level for the mover
/// and plays on. That limitation is deliberate (see DESIGN.md).
pub(crate) fn stage_block(
    board: &Board,
    player: Player,
    win_len: usize,
) -> Option<(usize, usize)> {
    let threats = winning_cells(board, player.opponent(), win_len);
    match threats.len() {
        0 => None,
        1 => Some(threats[0]),
        _ => threats
            .iter()
            .copied()
            .max_by_key(|&(r, c)| (threat_level(board, r, c, player, win_len), usize::MAX - (r * board.cols() + c))),
    }
}

/// Stage 3: moves that do not hand the opponent an immediate winning
/// reply. Falls back to the full set when everything loses.
pub(crate) fn filter_safe(
    board: &Board,
    player: Player,
    win_len: usize,
    legal: &[(usize, usize)],
) -> Vec<(usize, usize)> {
    let opponent = player.opponent();
    let safe: Vec<(usize, usize)> = legal
        .iter()
        .copied()
        .filter(|&(r, c)| {
            let mut probe = board.clone();
            probe.set(r, c, Some(player)).ok();
            winning_cells(&probe, opponent, win_len).is_empty()
        })
        .collect();
    if safe.is_empty() {
        legal.to_vec()
    } else {
        safe
    }
}

/// Stage 4a: weighted random selection.
///
/// Each candidate's weight blends its offensive value (threat level for the
/// mover) and defensive value (threat level the opponent would get from the
/// same cell) through the tier's attack/defense ratio.
fn weighted_choice(
    board: &Board,
    player: Player,
    win_len: usize,
    candidates: &[(usize, usize)],
    attack: f64,
    defense: f64,
    rng: &mut SmallRng,
) -> (usize, usize) {
    let weights: Vec<f64> = candidates
        .iter()
        .map(|&(r, c)| {
            let own = threat_level(board, r, c, player, win_len) as f64;
            let opp = threat_level(board, r, c, player.opponent(), win_len) as f64;
            1.0 + attack * own * own + defense * opp * opp
        })
        .collect();

    let total: f64 = weights.iter().sum();
    let mut roll = rng.gen::<f64>() * total;
    for (i, w) in weights.iter().enumerate() {
        roll -= w;
        if roll <= 0.0 {
            return candidates[i];
        }
    }
    candidates[candidates.len() - 1]
}

/// Runs the full pipeline and returns the chosen landing cell.
///
/// Search diagnostics (`info` lines) go to `out`; pass `std::io::sink()`
/// when they are unwanted. The board is read-only throughout.
pub fn choose_move<W: Write>(
    board: &Board,
    player: Player,
    win_len: usize,
    difficulty: &Difficulty,
    rng: &mut SmallRng,
    out: &mut W,
) -> Result<(usize, usize), EngineError> {
    let legal = legal_cells(board);
    if legal.is_empty() {
        return Err(EngineError::NoLegalMoves);
    }

    if let Some(cell) = stage_win(board, player, win_len, &legal) {
        return Ok(cell);
    }
    if let Some(cell) = stage_block(board, player, win_len) {
        return Ok(cell);
    }

    let candidates = filter_safe(board, player, win_len, &legal);
    debug_assert!(!candidates.is_empty());

    let cell = match difficulty.strategy {
        Strategy::Weighted { attack, defense } => {
            weighted_choice(board, player, win_len, &candidates, attack, defense, rng)
        }
        Strategy::Playout { simulations } => {
            playout::best_by_playouts(board, player, win_len, &candidates, simulations, rng)
                .unwrap_or(candidates[0])
        }
        Strategy::Minimax { depth, movetime_ms } => {
            let limits = SearchLimits {
                max_depth: depth,
                movetime: Duration::from_millis(movetime_ms),
                node_budget: u64::MAX,
            };
            minimax::search(board, player, win_len, &candidates, &limits, out)
                .best_cell
                .unwrap_or(candidates[0])
        }
    };

    Ok(cell)
}
