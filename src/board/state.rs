//! Game session state.
//!
//! `GameState` owns a board plus everything the board does not know:
//! whose turn it is, the win length, the move history, and the terminal
//! status. It is the only type that mutates a live game; the analysis
//! layers below it (threats, evaluation, move choice) borrow the board
//! read-only and are safe to call at any time without disturbing play.

use std::io::Write;

use rand::rngs::SmallRng;
use serde::Serialize;

use crate::eval::{evaluate, evaluate_detailed, EvaluationResult};
use crate::movegen::legal_cells;
use crate::rules::{is_draw, winner_at};
use crate::search::{choose_move, Difficulty, EngineError};
use crate::threat::{blocking_cells, run_records, threat_level, winning_cells, ThreatRecord};

use super::grid::{Board, ConfigError};
use super::moves::{Move, MoveError, MoveOutcome, MoveRecord};
use super::player::Player;

/// A point-in-time analysis of the current position, from the side to
/// move's perspective. Serialized as-is on the `analyze` command.
#[derive(Debug, Serialize)]
pub struct PositionReport {
    pub side_to_move: Player,
    pub move_count: usize,
    pub evaluation: EvaluationResult,
    pub winning_moves: Vec<(usize, usize)>,
    pub blocking_moves: Vec<(usize, usize)>,
    pub threats: Vec<ThreatRecord>,
}

/// A full game in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    board: Board,
    win_len: usize,
    current_player: Player,
    starting_player: Player,
    history: Vec<MoveRecord>,
    winner: Option<Player>,
    game_over: bool,
}

impl GameState {
    /// Starts a fresh game. Fails if the dimensions are degenerate or the
    /// win length cannot fit on the board.
    pub fn new(
        rows: usize,
        cols: usize,
        win_len: usize,
        gravity: bool,
    ) -> Result<GameState, ConfigError> {
        let board = Board::new(rows, cols, gravity)?;
        if win_len < 2 || (win_len > rows && win_len > cols) {
            return Err(ConfigError::InvalidWinLength { win_len, rows, cols });
        }
        Ok(GameState {
            board,
            win_len,
            current_player: Player::A,
            starting_player: Player::A,
            history: Vec::new(),
            winner: None,
            game_over: false,
        })
    }

    /// Rebuilds a game from a known board position.
    ///
    /// Used by position parsing: the history is empty, so `undo_move`
    /// cannot reach back past the given position.
    pub fn from_position(
        board: Board,
        win_len: usize,
        side_to_move: Player,
    ) -> Result<GameState, ConfigError> {
        let (rows, cols) = (board.rows(), board.cols());
        if win_len < 2 || (win_len > rows && win_len > cols) {
            return Err(ConfigError::InvalidWinLength { win_len, rows, cols });
        }
        let mut state = GameState {
            board,
            win_len,
            current_player: side_to_move,
            starting_player: side_to_move,
            history: Vec::new(),
            winner: None,
            game_over: false,
        };
        state.detect_terminal();
        Ok(state)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn win_len(&self) -> usize {
        self.win_len
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_draw(&self) -> bool {
        self.game_over && self.winner.is_none()
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// All cells the side to move may play, row-major. Empty once the game
    /// is over.
    pub fn legal_moves(&self) -> Vec<(usize, usize)> {
        if self.game_over {
            return Vec::new();
        }
        legal_cells(&self.board)
    }

    /// Row-major byte snapshot of the board (0 empty, 1 and 2 per player).
    pub fn snapshot(&self) -> Vec<u8> {
        self.board.snapshot()
    }

    /// Plays a move for the side to move. On success the turn passes to
    /// the opponent and the outcome reports the landing cell plus any
    /// terminal result.
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveOutcome, MoveError> {
        if self.game_over {
            return Err(MoveError::GameAlreadyOver);
        }
        let (row, col) = self.resolve_cell(mv)?;
        let player = self.current_player;

        // resolve_cell has already bounds-checked the cell.
        self.board
            .set(row, col, Some(player))
            .map_err(|e| MoveError::OutOfBounds { row: e.row, col: e.col })?;
        self.history.push(MoveRecord { row, col, player });

        let winner = winner_at(&self.board, row, col, self.win_len);
        let draw = winner.is_none() && is_draw(&self.board);
        if winner.is_some() || draw {
            self.winner = winner;
            self.game_over = true;
        } else {
            self.current_player = player.opponent();
        }

        Ok(MoveOutcome { row, col, player, winner, draw })
    }

    /// Plays a move on behalf of a specific player, failing if it is not
    /// that player's turn. Callers that track sides themselves use this to
    /// catch desync instead of silently playing for the wrong side.
    pub fn apply_move_as(&mut self, player: Player, mv: Move) -> Result<MoveOutcome, MoveError> {
        if !self.game_over && player != self.current_player {
            return Err(MoveError::InvalidPlayer);
        }
        self.apply_move(mv)
    }

    /// Retracts the last move, including one that ended the game. Returns
    /// the retracted record, or `None` on an empty history.
    pub fn undo_move(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        // set(None) cannot fail on a cell that held a stone we placed.
        let _ = self.board.set(record.row, record.col, None);
        self.winner = None;
        self.game_over = false;
        self.current_player = record.player;
        Some(record)
    }

    /// Clears the board and restarts with the same starting player.
    pub fn reset(&mut self) {
        let starter = self.starting_player;
        self.reset_with_starting_player(starter);
    }

    /// Clears the board and restarts with the given player to move first.
    pub fn reset_with_starting_player(&mut self, starter: Player) {
        self.board.clear();
        self.history.clear();
        self.winner = None;
        self.game_over = false;
        self.starting_player = starter;
        self.current_player = starter;
    }

    /// Cells where `player` wins immediately. Read-only.
    pub fn winning_moves(&self, player: Player) -> Vec<(usize, usize)> {
        if self.game_over {
            return Vec::new();
        }
        winning_cells(&self.board, player, self.win_len)
    }

    /// Cells `player` must occupy to stop an immediate opponent win.
    pub fn blocking_moves(&self, player: Player) -> Vec<(usize, usize)> {
        if self.game_over {
            return Vec::new();
        }
        blocking_cells(&self.board, player, self.win_len)
    }

    /// Threat level (0 to 5) of placing `player`'s stone on a cell.
    pub fn threat_level(&self, row: usize, col: usize, player: Player) -> u8 {
        threat_level(&self.board, row, col, player, self.win_len)
    }

    /// Static score of the position for `player`.
    pub fn evaluate_position(&self, player: Player) -> i32 {
        evaluate(&self.board, player, self.win_len)
    }

    /// Full structured analysis of the position for the side to move.
    pub fn analyze_position(&self) -> PositionReport {
        let player = self.current_player;
        let mut threats = run_records(&self.board, player, self.win_len);
        threats.extend(run_records(&self.board, player.opponent(), self.win_len));
        PositionReport {
            side_to_move: player,
            move_count: self.history.len(),
            evaluation: evaluate_detailed(&self.board, player, self.win_len),
            winning_moves: self.winning_moves(player),
            blocking_moves: self.blocking_moves(player),
            threats,
        }
    }

    /// Picks a move for the side to move at the given difficulty without
    /// playing it. The state is left untouched.
    pub fn choose_move(
        &self,
        difficulty: &Difficulty,
        rng: &mut SmallRng,
    ) -> Result<(usize, usize), EngineError> {
        self.choose_move_with(difficulty, rng, &mut std::io::sink())
    }

    /// Like [`choose_move`](GameState::choose_move), streaming search
    /// diagnostics to `out`.
    pub fn choose_move_with<W: Write>(
        &self,
        difficulty: &Difficulty,
        rng: &mut SmallRng,
        out: &mut W,
    ) -> Result<(usize, usize), EngineError> {
        if self.game_over {
            return Err(EngineError::NoLegalMoves);
        }
        choose_move(
            &self.board,
            self.current_player,
            self.win_len,
            difficulty,
            rng,
            out,
        )
    }

    /// Resolves a move request to a concrete cell without mutating the
    /// board.
    fn resolve_cell(&self, mv: Move) -> Result<(usize, usize), MoveError> {
        match mv {
            Move::Drop { col } => {
                if !self.board.gravity() {
                    // On free boards a bare column is meaningless.
                    return Err(MoveError::OutOfBounds { row: usize::MAX, col });
                }
                if col >= self.board.cols() {
                    return Err(MoveError::OutOfBounds { row: 0, col });
                }
                self.board
                    .drop_row(col)
                    .map(|row| (row, col))
                    .ok_or(MoveError::ColumnFull { col })
            }
            Move::Place { row, col } => {
                if !self.board.in_bounds(row, col) {
                    return Err(MoveError::OutOfBounds { row, col });
                }
                if !self.board.is_empty_cell(row, col) {
                    return Err(MoveError::PositionOccupied { row, col });
                }
                if self.board.gravity() {
                    // Gravity accepts an explicit cell only if it is where
                    // the stone would land anyway.
                    match self.board.drop_row(col) {
                        Some(landing) if landing == row => Ok((row, col)),
                        Some(_) => Err(MoveError::PositionOccupied { row, col }),
                        None => Err(MoveError::ColumnFull { col }),
                    }
                } else {
                    Ok((row, col))
                }
            }
        }
    }

    /// Recomputes terminal status from scratch; only needed when a game is
    /// built from an arbitrary position rather than move by move.
    fn detect_terminal(&mut self) {
        for row in 0..self.board.rows() {
            for col in 0..self.board.cols() {
                if let Some(winner) = winner_at(&self.board, row, col, self.win_len) {
                    self.winner = Some(winner);
                    self.game_over = true;
                    return;
                }
            }
        }
        if is_draw(&self.board) {
            self.game_over = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn new_game_validates_win_length() {
        assert!(GameState::new(6, 7, 4, true).is_ok());
        assert!(GameState::new(3, 3, 1, false).is_err());
        assert!(GameState::new(3, 3, 4, false).is_err());
        // A win length that fits only one dimension is fine.
        assert!(GameState::new(3, 9, 5, false).is_ok());
    }

    #[test]
    fn turns_alternate_and_history_grows() {
        let mut game = GameState::new(6, 7, 4, true).unwrap();
        assert_eq!(game.current_player(), Player::A);
        let out = game.apply_move(Move::drop(3)).unwrap();
        assert_eq!((out.row, out.col, out.player), (5, 3, Player::A));
        assert_eq!(game.current_player(), Player::B);
        game.apply_move(Move::drop(3)).unwrap();
        assert_eq!(game.current_player(), Player::A);
        assert_eq!(game.move_count(), 2);
    }

    #[test]
    fn gravity_rejects_floating_place() {
        let mut game = GameState::new(6, 7, 4, true).unwrap();
        let err = game.apply_move(Move::place(3, 0)).unwrap_err();
        assert_eq!(err, MoveError::PositionOccupied { row: 3, col: 0 });
        // The landing cell itself is accepted.
        assert!(game.apply_move(Move::place(5, 0)).is_ok());
    }

    #[test]
    fn apply_move_as_checks_the_turn() {
        let mut game = GameState::new(6, 7, 4, true).unwrap();
        assert_eq!(
            game.apply_move_as(Player::B, Move::drop(3)).unwrap_err(),
            MoveError::InvalidPlayer
        );
        assert!(game.apply_move_as(Player::A, Move::drop(3)).is_ok());
        assert!(game.apply_move_as(Player::B, Move::drop(3)).is_ok());
    }

    #[test]
    fn drop_rejected_on_free_board() {
        let mut game = GameState::new(15, 15, 5, false).unwrap();
        assert!(game.apply_move(Move::drop(7)).is_err());
        assert!(game.apply_move(Move::place(7, 7)).is_ok());
    }

    #[test]
    fn winning_move_ends_the_game() {
        let mut game = GameState::new(6, 7, 4, true).unwrap();
        for col in [0, 6, 1, 6, 2, 6] {
            game.apply_move(Move::drop(col)).unwrap();
        }
        let out = game.apply_move(Move::drop(3)).unwrap();
        assert_eq!(out.winner, Some(Player::A));
        assert!(out.terminal());
        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(Player::A));
        assert!(game.legal_moves().is_empty());
        assert_eq!(
            game.apply_move(Move::drop(4)).unwrap_err(),
            MoveError::GameAlreadyOver
        );
    }

    #[test]
    fn draw_on_full_board_without_winner() {
        // A 1x3 free board fills in three plies with no three-in-a-row.
        let mut game = GameState::new(1, 3, 3, false).unwrap();
        game.apply_move(Move::place(0, 0)).unwrap(); // A
        game.apply_move(Move::place(0, 1)).unwrap(); // B
        let out = game.apply_move(Move::place(0, 2)).unwrap(); // A
        assert!(out.draw);
        assert!(game.is_draw());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn undo_restores_exact_state() {
        let mut game = GameState::new(6, 7, 4, true).unwrap();
        game.apply_move(Move::drop(3)).unwrap();
        let before = game.clone();
        game.apply_move(Move::drop(4)).unwrap();
        let record = game.undo_move().unwrap();
        assert_eq!((record.row, record.col, record.player), (5, 4, Player::B));
        assert_eq!(game, before);
    }

    #[test]
    fn undo_reopens_a_finished_game() {
        let mut game = GameState::new(6, 7, 4, true).unwrap();
        for col in [0, 6, 1, 6, 2, 6, 3] {
            game.apply_move(Move::drop(col)).unwrap();
        }
        assert!(game.is_game_over());
        game.undo_move().unwrap();
        assert!(!game.is_game_over());
        assert_eq!(game.winner(), None);
        assert_eq!(game.current_player(), Player::A);
    }

    #[test]
    fn undo_on_empty_history_returns_none() {
        let mut game = GameState::new(6, 7, 4, true).unwrap();
        assert!(game.undo_move().is_none());
    }

    #[test]
    fn reset_with_starting_player_flips_first_mover() {
        let mut game = GameState::new(6, 7, 4, true).unwrap();
        game.apply_move(Move::drop(0)).unwrap();
        game.reset_with_starting_player(Player::B);
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.current_player(), Player::B);
        assert!(game.board().stone_count() == 0);
        game.apply_move(Move::drop(0)).unwrap();
        game.reset();
        assert_eq!(game.current_player(), Player::B);
    }

    #[test]
    fn advisory_queries_do_not_mutate() {
        let mut game = GameState::new(6, 7, 4, true).unwrap();
        for col in [3, 3, 2, 2, 4] {
            game.apply_move(Move::drop(col)).unwrap();
        }
        let before = game.clone();
        let first = game.analyze_position();
        let _ = game.winning_moves(Player::A);
        let _ = game.blocking_moves(Player::B);
        let _ = game.evaluate_position(Player::B);
        let _ = game.threat_level(5, 5, Player::A);
        let mut rng = SmallRng::seed_from_u64(9);
        let _ = game.choose_move(&Difficulty::hard(), &mut rng);
        assert_eq!(game, before);
        // Repeated analysis of an unchanged position is identical.
        let second = game.analyze_position();
        assert_eq!(first.evaluation.score, second.evaluation.score);
        assert_eq!(first.winning_moves, second.winning_moves);
        assert_eq!(first.threats.len(), second.threats.len());
    }

    #[test]
    fn from_position_detects_existing_win() {
        let mut board = Board::new(6, 7, true).unwrap();
        for col in 0..4 {
            board.set(5, col, Some(Player::A)).unwrap();
        }
        let game = GameState::from_position(board, 4, Player::B).unwrap();
        assert!(game.is_game_over());
        assert_eq!(game.winner(), Some(Player::A));
    }
}
