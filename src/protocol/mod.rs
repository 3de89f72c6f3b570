//! LGI protocol handling.
//!
//! This module implements parsing and serialization for the LGI (Line Game
//! Interface) protocol, including GFEN position encoding, move text, and
//! the command parser for the main loop.

pub mod gfen;
pub mod parser;

pub use gfen::{encode_gfen, parse_gfen, parse_setup, GfenError};
pub use parser::{encode_move_text, parse_command, parse_move_text, Command, GoParams, MoveTextError};
