//! Position evaluation.
//!
//! Scores a board position from a given player's perspective, considering
//! run structure, fork presence, center control, and stone height in
//! gravity mode.

pub(crate) mod heuristic;

pub use heuristic::{classify_phase, evaluate, evaluate_detailed, EvaluationResult, Phase, WIN_SCORE};
