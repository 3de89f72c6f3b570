//! LGI command parser.
//!
//! Parses incoming LGI protocol commands from raw text into structured
//! `Command` variants that the engine main loop can dispatch on. Move text
//! lives here too: a move is a column letter followed by a 1-based row
//! number counted from the bottom edge (`d1` is the bottom of the fourth
//! column), and in gravity games a bare column letter means "drop here".

use crate::board::Move;

/// Search constraints passed with the `go` command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoParams {
    pub movetime: Option<u64>,
    pub depth: Option<u32>,
}

/// A parsed server-to-engine LGI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initialize the LGI protocol handshake.
    Lgi,

    /// Synchronization ping; engine must reply `readyok`.
    IsReady,

    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },

    /// Start a fresh game: `newgame [connect4|gomoku|<rows>x<cols>:<win>:<mode>]`.
    NewGame { setup: Option<String> },

    /// Set the board position from a GFEN string.
    Position { gfen: String },

    /// Play one or more moves in order: `play d1 e1`.
    Play { moves: Vec<String> },

    /// Retract the last move.
    Undo,

    /// Begin choosing a move, with optional search constraints.
    Go(GoParams),

    /// Emit a structured analysis of the current position.
    Analyze,

    /// Print the board for a human reader.
    Show,

    /// Terminate the engine process.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines or unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging to stderr.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let first = *tokens.first()?;

    match first {
        "lgi" => Some(Command::Lgi),
        "isready" => Some(Command::IsReady),
        "undo" => Some(Command::Undo),
        "analyze" => Some(Command::Analyze),
        "show" => Some(Command::Show),
        "quit" => Some(Command::Quit),

        "newgame" => Some(Command::NewGame {
            setup: tokens.get(1).map(|s| s.to_string()),
        }),
        "setoption" => parse_setoption(&tokens),
        "position" => parse_position(&tokens),
        "play" => parse_play(&tokens),
        "go" => parse_go(&tokens),

        other => {
            eprintln!("unknown command: {}", other);
            None
        }
    }
}

/// Parses `setoption name <id> [value <x>]`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 3 || tokens[1] != "name" {
        eprintln!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let value_idx = tokens.iter().position(|&t| t == "value");
    let (name, value) = match value_idx {
        Some(vi) => {
            let name_parts = &tokens[2..vi];
            let value_parts = &tokens[vi + 1..];
            if name_parts.is_empty() {
                eprintln!("malformed setoption: empty name");
                return None;
            }
            let value = if value_parts.is_empty() {
                None
            } else {
                Some(value_parts.join(" "))
            };
            (name_parts.join(" "), value)
        }
        None => (tokens[2..].join(" "), None),
    };

    Some(Command::SetOption { name, value })
}

/// Parses `position <gfen>`.
fn parse_position(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 2 {
        eprintln!("malformed position: expected 'position <gfen>'");
        return None;
    }
    Some(Command::Position {
        gfen: tokens[1].to_string(),
    })
}

/// Parses `play <move> [<move> ...]`.
fn parse_play(tokens: &[&str]) -> Option<Command> {
    if tokens.len() < 2 {
        eprintln!("malformed play: expected 'play <move> [<move> ...]'");
        return None;
    }
    Some(Command::Play {
        moves: tokens[1..].iter().map(|s| s.to_string()).collect(),
    })
}

/// Parses `go [movetime <ms>] [depth <n>]`.
fn parse_go(tokens: &[&str]) -> Option<Command> {
    let mut params = GoParams::default();
    let mut i = 1;

    while i < tokens.len() {
        match tokens[i] {
            "movetime" => {
                i += 1;
                if i < tokens.len() {
                    match tokens[i].parse::<u64>() {
                        Ok(v) => params.movetime = Some(v),
                        Err(_) => eprintln!("invalid movetime value: '{}'", tokens[i]),
                    }
                }
            }
            "depth" => {
                i += 1;
                if i < tokens.len() {
                    match tokens[i].parse::<u32>() {
                        Ok(v) => params.depth = Some(v),
                        Err(_) => eprintln!("invalid depth value: '{}'", tokens[i]),
                    }
                }
            }
            other => {
                eprintln!("unknown go parameter: '{}'", other);
            }
        }
        i += 1;
    }

    Some(Command::Go(params))
}

/// Errors raised when decoding move text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MoveTextError {
    #[error("empty move text")]
    Empty,

    #[error("invalid column letter: '{0}'")]
    BadColumn(char),

    #[error("invalid row number: '{0}'")]
    BadRow(String),

    #[error("row {0} is outside a board with {1} rows")]
    RowOutOfRange(usize, usize),
}

/// Decodes move text against a board of `rows` rows.
///
/// `d3` names the cell three up from the bottom of column d; a bare `d`
/// is a gravity drop into that column.
pub fn parse_move_text(s: &str, rows: usize) -> Result<Move, MoveTextError> {
    let mut chars = s.chars();
    let col_char = chars.next().ok_or(MoveTextError::Empty)?;
    if !col_char.is_ascii_lowercase() {
        return Err(MoveTextError::BadColumn(col_char));
    }
    let col = (col_char as u8 - b'a') as usize;

    let rest = chars.as_str();
    if rest.is_empty() {
        return Ok(Move::drop(col));
    }

    let bottom_row: usize = rest
        .parse()
        .map_err(|_| MoveTextError::BadRow(rest.to_string()))?;
    if bottom_row == 0 || bottom_row > rows {
        return Err(MoveTextError::RowOutOfRange(bottom_row, rows));
    }

    Ok(Move::place(rows - bottom_row, col))
}

/// Encodes a landing cell as move text.
pub fn encode_move_text(row: usize, col: usize, rows: usize) -> String {
    let col_char = (b'a' + col as u8) as char;
    format!("{}{}", col_char, rows - row)
}
