//! Move selection.
//!
//! `policy` is the decision pipeline every move request goes through;
//! `minimax` and `playout` are the strategy backends it dispatches to.

pub mod minimax;
pub mod playout;
pub mod policy;

pub use minimax::{search, SearchLimits, SearchResult};
pub use playout::best_by_playouts;
pub use policy::{choose_move, Difficulty, EngineError, Strategy};
