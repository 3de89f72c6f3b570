//! GFEN (grid FEN) encoding and decoding.
//!
//! GFEN is a compact single-line notation for a full game position,
//! inspired by chess FEN.
//!
//! Format: `<rows>x<cols>:<win_len>:<mode>/<row>/.../<row>/<side>`
//!
//! `mode` is `g` (gravity) or `f` (free placement). Rows are listed top to
//! bottom; within a row, `x` and `o` are stones and a decimal number is a
//! run of empty cells. The final section is the side to move.
//!
//! The empty connect-four position is `6x7:4:g/7/7/7/7/7/7/x`.

use crate::board::{Board, GameState, Player};

/// Errors that can occur during GFEN parsing.
#[derive(Debug, thiserror::Error)]
pub enum GfenError {
    #[error("expected header, {0} rows, and side to move, got {1} sections")]
    WrongSectionCount(usize, usize),

    #[error("invalid header: '{0}'")]
    InvalidHeader(String),

    #[error("invalid dimensions: '{0}'")]
    InvalidDimensions(String),

    #[error("invalid win length: '{0}'")]
    InvalidWinLength(String),

    #[error("invalid mode character: '{0}'")]
    InvalidMode(String),

    #[error("invalid character '{0}' in row {1}")]
    InvalidRowChar(char, usize),

    #[error("row {row} describes {got} cells, expected {expected}")]
    WrongRowWidth {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("invalid side to move: '{0}'")]
    InvalidSide(String),

    #[error("gravity position has a floating stone at ({0}, {1})")]
    FloatingStone(usize, usize),

    #[error("board rejected the position: {0}")]
    BadPosition(#[from] crate::board::ConfigError),
}

/// Parses a bare board setup such as "6x7:4:g" into
/// `(rows, cols, win_len, gravity)`. This is the GFEN header without any
/// position payload; `newgame` accepts it directly.
pub fn parse_setup(s: &str) -> Result<(usize, usize, usize, bool), GfenError> {
    parse_header(s)
}

/// Parses the header section (e.g. "6x7:4:g").
fn parse_header(s: &str) -> Result<(usize, usize, usize, bool), GfenError> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return Err(GfenError::InvalidHeader(s.to_string()));
    }

    let (rows_str, cols_str) = parts[0]
        .split_once('x')
        .ok_or_else(|| GfenError::InvalidDimensions(parts[0].to_string()))?;
    let rows: usize = rows_str
        .parse()
        .map_err(|_| GfenError::InvalidDimensions(parts[0].to_string()))?;
    let cols: usize = cols_str
        .parse()
        .map_err(|_| GfenError::InvalidDimensions(parts[0].to_string()))?;

    let win_len: usize = parts[1]
        .parse()
        .map_err(|_| GfenError::InvalidWinLength(parts[1].to_string()))?;

    let gravity = match parts[2] {
        "g" => true,
        "f" => false,
        other => return Err(GfenError::InvalidMode(other.to_string())),
    };

    Ok((rows, cols, win_len, gravity))
}

/// Parses one row section into the board.
fn parse_row(s: &str, row: usize, board: &mut Board) -> Result<(), GfenError> {
    let cols = board.cols();
    let mut col = 0usize;
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(digit) = c.to_digit(10) {
            let mut run = digit as usize;
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                run = run * 10 + d as usize;
                chars.next();
            }
            col += run;
            continue;
        }
        let stone = match c {
            'x' => Some(Player::A),
            'o' => Some(Player::B),
            other => return Err(GfenError::InvalidRowChar(other, row)),
        };

        if col >= cols {
            return Err(GfenError::WrongRowWidth {
                row,
                got: col + 1,
                expected: cols,
            });
        }
        // In-bounds by the check above.
        let _ = board.set(row, col, stone);
        col += 1;
    }

    if col != cols {
        return Err(GfenError::WrongRowWidth {
            row,
            got: col,
            expected: cols,
        });
    }

    Ok(())
}

/// Parses a GFEN string into a ready-to-play game.
pub fn parse_gfen(s: &str) -> Result<GameState, GfenError> {
    let sections: Vec<&str> = s.split('/').collect();
    if sections.len() < 3 {
        return Err(GfenError::WrongSectionCount(0, sections.len()));
    }

    let (rows, cols, win_len, gravity) = parse_header(sections[0])?;
    if sections.len() != rows + 2 {
        return Err(GfenError::WrongSectionCount(rows, sections.len()));
    }

    let mut board = Board::new(rows, cols, gravity)?;
    for (i, row_str) in sections[1..=rows].iter().enumerate() {
        parse_row(row_str, i, &mut board)?;
    }

    if gravity {
        // Every stone must rest on the bottom edge or another stone.
        for row in 0..rows.saturating_sub(1) {
            for col in 0..cols {
                if board.cell(row, col).is_some() && board.cell(row + 1, col).is_none() {
                    return Err(GfenError::FloatingStone(row, col));
                }
            }
        }
    }

    let side_str = *sections.last().unwrap_or(&"");
    let mut side_chars = side_str.chars();
    let side = side_chars
        .next()
        .filter(|_| side_chars.as_str().is_empty())
        .and_then(Player::from_protocol_char)
        .ok_or_else(|| GfenError::InvalidSide(side_str.to_string()))?;

    Ok(GameState::from_position(board, win_len, side)?)
}

/// Encodes a game into a canonical GFEN string.
///
/// Empty runs always use the shortest decimal form, so encoding is
/// deterministic and stable under reparsing.
pub fn encode_gfen(game: &GameState) -> String {
    let board = game.board();
    let mut result = String::with_capacity(board.cell_count() + 16);

    result.push_str(&format!(
        "{}x{}:{}:{}",
        board.rows(),
        board.cols(),
        game.win_len(),
        if board.gravity() { 'g' } else { 'f' }
    ));

    for row in 0..board.rows() {
        result.push('/');
        let mut empty_run = 0usize;
        for col in 0..board.cols() {
            match board.cell(row, col) {
                None => empty_run += 1,
                Some(player) => {
                    if empty_run > 0 {
                        result.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    result.push(player.protocol_char());
                }
            }
        }
        if empty_run > 0 {
            result.push_str(&empty_run.to_string());
        }
    }

    result.push('/');
    result.push(game.current_player().protocol_char());
    result
}
