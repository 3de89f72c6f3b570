//! Board representation and game-state types.
//!
//! Contains the grid store, player identity, move value types, and the
//! `GameState` orchestrator that owns a live board.

pub mod grid;
pub mod moves;
pub mod player;
pub mod state;

pub use grid::{Board, ConfigError, OutOfBounds};
pub use moves::{Move, MoveError, MoveOutcome, MoveRecord};
pub use player::{Player, ALL_PLAYERS};
pub use state::{GameState, PositionReport};
