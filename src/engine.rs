//! Engine state management.
//!
//! Holds the current game, engine options, and the random source, and runs
//! the move-selection pipeline for the `go` command.

use std::collections::HashMap;
use std::io::Write;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::GameState;
use crate::protocol::gfen::{encode_gfen, parse_gfen, parse_setup};
use crate::protocol::parser::{encode_move_text, parse_move_text, GoParams};
use crate::search::{Difficulty, Strategy};

/// Default search time in milliseconds for the hard tier.
const DEFAULT_MOVETIME_MS: u64 = 1000;

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub game: Option<GameState>,
    pub options: HashMap<String, String>,
    rng: SmallRng,
}

impl Engine {
    /// Creates a new engine with no game in progress.
    pub fn new() -> Self {
        Engine {
            game: None,
            options: HashMap::new(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Starts a fresh game. `setup` may be a preset name (`connect4`,
    /// `gomoku`) or a bare GFEN header such as `8x8:4:g`; the default is
    /// connect4. Returns an error message on failure.
    pub fn new_game(&mut self, setup: Option<&str>) -> Result<(), String> {
        let (rows, cols, win_len, gravity) = match setup {
            None | Some("connect4") => (6, 7, 4, true),
            Some("gomoku") => (15, 15, 5, false),
            Some(header) => {
                parse_setup(header).map_err(|e| format!("failed to parse setup: {}", e))?
            }
        };
        let game = GameState::new(rows, cols, win_len, gravity)
            .map_err(|e| format!("failed to start game: {}", e))?;
        self.game = Some(game);
        Ok(())
    }

    /// Sets the current position from a GFEN string.
    /// Returns an error message on failure.
    pub fn set_position(&mut self, gfen: &str) -> Result<(), String> {
        match parse_gfen(gfen) {
            Ok(game) => {
                self.game = Some(game);
                Ok(())
            }
            Err(e) => Err(format!("failed to parse GFEN: {}", e)),
        }
    }

    /// Plays moves in order. Stops at the first bad move, leaving the
    /// moves before it applied.
    pub fn play(&mut self, moves: &[String]) -> Result<(), String> {
        let game = self.game.as_mut().ok_or("play: no game in progress")?;
        for text in moves {
            let mv = parse_move_text(text, game.board().rows())
                .map_err(|e| format!("bad move '{}': {}", text, e))?;
            game.apply_move(mv)
                .map_err(|e| format!("illegal move '{}': {}", text, e))?;
        }
        Ok(())
    }

    /// Retracts the last move. Returns an error message when there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Result<(), String> {
        let game = self.game.as_mut().ok_or("undo: no game in progress")?;
        game.undo_move()
            .map(|_| ())
            .ok_or_else(|| "undo: no moves to retract".to_string())
    }

    /// Sets an engine option. `Seed` reseeds the random source on the spot.
    pub fn set_option(&mut self, name: String, value: Option<String>) {
        if name == "Seed" {
            if let Some(seed) = value.as_deref().and_then(|v| v.parse::<u64>().ok()) {
                self.rng = SmallRng::seed_from_u64(seed);
            }
        }
        self.options.insert(name, value.unwrap_or_default());
    }

    /// Returns the configured difficulty tier (default hard).
    fn difficulty(&self) -> Difficulty {
        self.options
            .get("Difficulty")
            .and_then(|v| Difficulty::from_name(v))
            .unwrap_or_else(Difficulty::hard)
    }

    /// Returns the configured search time from options, or the default.
    fn movetime_ms(&self) -> u64 {
        self.options
            .get("SearchTime")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_MOVETIME_MS)
    }

    /// Handles the LGI handshake: writes id, options, protocol_version,
    /// and lgiok.
    pub fn handle_lgi<W: Write>(&self, out: &mut W) {
        writeln!(out, "id name gridlock").unwrap();
        writeln!(out, "id author gridlock").unwrap();
        writeln!(
            out,
            "option name SearchTime type spin default 1000 min 10 max 60000"
        )
        .unwrap();
        writeln!(
            out,
            "option name Difficulty type combo default hard var easy var aggressive var defensive var medium var hard"
        )
        .unwrap();
        writeln!(out, "option name Seed type string default <empty>").unwrap();
        writeln!(out, "protocol_version 1").unwrap();
        writeln!(out, "lgiok").unwrap();
        out.flush().unwrap();
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) {
        writeln!(out, "readyok").unwrap();
        out.flush().unwrap();
    }

    /// Handles the `go` command: runs the pipeline for the side to move
    /// and writes a `bestmove` line. `info` lines from search come first.
    pub fn handle_go<W: Write>(&mut self, params: &GoParams, out: &mut W) {
        let game = match &self.game {
            Some(g) => g,
            None => {
                eprintln!("go: no game in progress");
                return;
            }
        };

        if game.is_game_over() {
            writeln!(out, "bestmove none").unwrap();
            out.flush().unwrap();
            return;
        }

        let mut difficulty = self.difficulty();
        if let Strategy::Minimax { depth, .. } = difficulty.strategy {
            // go parameters override the configured budget for one request.
            difficulty.strategy = Strategy::Minimax {
                depth: params.depth.map(|d| d.min(u8::MAX as u32) as u8).unwrap_or(depth),
                movetime_ms: params.movetime.unwrap_or_else(|| self.movetime_ms()),
            };
        }

        match game.choose_move_with(&difficulty, &mut self.rng, out) {
            Ok((row, col)) => {
                let text = encode_move_text(row, col, game.board().rows());
                writeln!(out, "bestmove {}", text).unwrap();
            }
            Err(e) => {
                eprintln!("go: {}", e);
                writeln!(out, "bestmove none").unwrap();
            }
        }
        out.flush().unwrap();
    }

    /// Handles the `analyze` command: one JSON line for the current
    /// position.
    pub fn handle_analyze<W: Write>(&self, out: &mut W) {
        let game = match &self.game {
            Some(g) => g,
            None => {
                eprintln!("analyze: no game in progress");
                return;
            }
        };
        match serde_json::to_string(&game.analyze_position()) {
            Ok(json) => {
                writeln!(out, "analysis {}", json).unwrap();
            }
            Err(e) => eprintln!("analyze: {}", e),
        }
        out.flush().unwrap();
    }

    /// Handles the `show` command: a human-readable board with the GFEN
    /// line underneath.
    pub fn handle_show<W: Write>(&self, out: &mut W) {
        let game = match &self.game {
            Some(g) => g,
            None => {
                eprintln!("show: no game in progress");
                return;
            }
        };
        let board = game.board();

        for row in 0..board.rows() {
            write!(out, "{:>3} ", board.rows() - row).unwrap();
            for col in 0..board.cols() {
                let c = match board.cell(row, col) {
                    Some(player) => player.protocol_char(),
                    None => '.',
                };
                write!(out, "{} ", c).unwrap();
            }
            writeln!(out).unwrap();
        }
        write!(out, "    ").unwrap();
        for col in 0..board.cols() {
            write!(out, "{} ", (b'a' + col as u8) as char).unwrap();
        }
        writeln!(out).unwrap();

        if let Some(winner) = game.winner() {
            writeln!(out, "result: {} wins", winner.protocol_char()).unwrap();
        } else if game.is_draw() {
            writeln!(out, "result: draw").unwrap();
        } else {
            writeln!(out, "side to move: {}", game.current_player().protocol_char()).unwrap();
        }
        writeln!(out, "gfen: {}", encode_gfen(game)).unwrap();
        out.flush().unwrap();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Player;

    #[test]
    fn new_engine_has_no_state() {
        let engine = Engine::new();
        assert!(engine.game.is_none());
        assert!(engine.options.is_empty());
    }

    #[test]
    fn new_game_presets() {
        let mut engine = Engine::new();
        engine.new_game(None).unwrap();
        let game = engine.game.as_ref().unwrap();
        assert_eq!((game.board().rows(), game.board().cols()), (6, 7));
        assert!(game.board().gravity());

        engine.new_game(Some("gomoku")).unwrap();
        let game = engine.game.as_ref().unwrap();
        assert_eq!(game.board().rows(), 15);
        assert!(!game.board().gravity());

        engine.new_game(Some("8x8:4:g")).unwrap();
        let game = engine.game.as_ref().unwrap();
        assert_eq!((game.board().rows(), game.board().cols()), (8, 8));

        assert!(engine.new_game(Some("bogus")).is_err());
    }

    #[test]
    fn set_position_valid_gfen() {
        let mut engine = Engine::new();
        assert!(engine.set_position("6x7:4:g/7/7/7/7/7/3xo2/x").is_ok());
        let game = engine.game.as_ref().unwrap();
        assert_eq!(game.board().stone_count(), 2);
        assert_eq!(game.current_player(), Player::A);
    }

    #[test]
    fn set_position_invalid_gfen() {
        let mut engine = Engine::new();
        assert!(engine.set_position("garbage").is_err());
        assert!(engine.game.is_none());
    }

    #[test]
    fn play_applies_moves_in_order() {
        let mut engine = Engine::new();
        engine.new_game(None).unwrap();
        engine.play(&["d".to_string(), "e".to_string()]).unwrap();
        let game = engine.game.as_ref().unwrap();
        assert_eq!(game.move_count(), 2);
        assert_eq!(game.board().cell(5, 3), Some(Player::A));
        assert_eq!(game.board().cell(5, 4), Some(Player::B));
    }

    #[test]
    fn play_rejects_bad_move_text() {
        let mut engine = Engine::new();
        engine.new_game(None).unwrap();
        assert!(engine.play(&["Z9".to_string()]).is_err());
        assert!(engine.play(&["d9".to_string()]).is_err());
    }

    #[test]
    fn undo_retracts_last_move() {
        let mut engine = Engine::new();
        engine.new_game(None).unwrap();
        assert!(engine.undo().is_err());
        engine.play(&["d".to_string()]).unwrap();
        engine.undo().unwrap();
        assert_eq!(engine.game.as_ref().unwrap().move_count(), 0);
    }

    #[test]
    fn set_option_stores_value() {
        let mut engine = Engine::new();
        engine.set_option("Difficulty".to_string(), Some("easy".to_string()));
        assert_eq!(engine.options.get("Difficulty"), Some(&"easy".to_string()));
        assert_eq!(engine.difficulty().name, "easy");
    }

    #[test]
    fn seed_option_makes_runs_reproducible() {
        let run = || {
            let mut engine = Engine::new();
            engine.set_option("Seed".to_string(), Some("42".to_string()));
            engine.set_option("Difficulty".to_string(), Some("easy".to_string()));
            engine.new_game(None).unwrap();
            let mut out = Vec::new();
            engine.handle_go(&GoParams::default(), &mut out);
            String::from_utf8(out).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn handle_lgi_outputs_handshake() {
        let engine = Engine::new();
        let mut output = Vec::new();
        engine.handle_lgi(&mut output);

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("id name gridlock"));
        assert!(output_str.contains("option name Difficulty"));
        assert!(output_str.contains("protocol_version 1"));
        assert!(output_str.ends_with("lgiok\n"));
    }

    #[test]
    fn handle_isready_outputs_readyok() {
        let engine = Engine::new();
        let mut output = Vec::new();
        engine.handle_isready(&mut output);
        assert_eq!(String::from_utf8(output).unwrap().trim(), "readyok");
    }

    #[test]
    fn handle_go_outputs_bestmove() {
        let mut engine = Engine::new();
        engine.set_option("SearchTime".to_string(), Some("50".to_string()));
        engine.new_game(None).unwrap();

        let mut output = Vec::new();
        engine.handle_go(&GoParams::default(), &mut output);

        let output_str = String::from_utf8(output).unwrap();
        let bestmove_line = output_str
            .lines()
            .find(|l| l.starts_with("bestmove "))
            .expect("output should contain bestmove");
        assert_ne!(bestmove_line, "bestmove none");
    }

    #[test]
    fn handle_go_takes_the_winning_move() {
        let mut engine = Engine::new();
        engine.set_position("6x7:4:g/7/7/7/7/7/oxxx3/x").unwrap();

        let mut output = Vec::new();
        engine.handle_go(&GoParams::default(), &mut output);

        let output_str = String::from_utf8(output).unwrap();
        // A completes the floor three at e1.
        assert!(output_str.lines().any(|l| l == "bestmove e1"), "{}", output_str);
    }

    #[test]
    fn handle_go_on_finished_game_says_none() {
        let mut engine = Engine::new();
        engine.set_position("6x7:4:g/7/7/7/7/7/xxxx3/o").unwrap();

        let mut output = Vec::new();
        engine.handle_go(&GoParams::default(), &mut output);
        assert!(String::from_utf8(output).unwrap().contains("bestmove none"));
    }

    #[test]
    fn handle_analyze_outputs_json() {
        let mut engine = Engine::new();
        engine.set_position("6x7:4:g/7/7/7/7/7/3xo2/x").unwrap();

        let mut output = Vec::new();
        engine.handle_analyze(&mut output);

        let output_str = String::from_utf8(output).unwrap();
        let json = output_str.strip_prefix("analysis ").unwrap().trim();
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["side_to_move"], "x");
        assert_eq!(value["move_count"], 0);
        assert!(value["evaluation"]["score"].is_i64());
    }

    #[test]
    fn handle_show_renders_board() {
        let mut engine = Engine::new();
        engine.set_position("6x7:4:g/7/7/7/7/7/3xo2/x").unwrap();

        let mut output = Vec::new();
        engine.handle_show(&mut output);

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("x o"));
        assert!(output_str.contains("a b c d e f g"));
        assert!(output_str.contains("side to move: x"));
        assert!(output_str.contains("gfen: 6x7:4:g/7/7/7/7/7/3xo2/x"));
    }
}
