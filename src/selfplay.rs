//! Arena self-play between difficulty tiers.
//!
//! Plays full games between two configured tiers, alternating the starting
//! player so neither side keeps the first-move advantage, and records each
//! game as one JSON line for offline analysis.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::board::{GameState, Player};
use crate::movegen::cell_to_move;
use crate::protocol::parser::encode_move_text;
use crate::search::{Difficulty, Strategy};

/// Configuration for an arena run.
#[derive(Clone)]
pub struct ArenaConfig {
    /// Number of games to play.
    pub games: usize,
    /// Board setup: `connect4`, `gomoku`, or a GFEN header like `8x8:4:g`.
    pub setup: String,
    /// Tier playing the `x` stones.
    pub tier_a: Difficulty,
    /// Tier playing the `o` stones.
    pub tier_b: Difficulty,
    /// Time budget per move for search-backed tiers (milliseconds).
    pub movetime_ms: u64,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            games: 10,
            setup: "connect4".to_string(),
            tier_a: Difficulty::hard(),
            tier_b: Difficulty::medium(),
            movetime_ms: 200,
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

/// A complete arena game record, one JSON line in the output.
#[derive(Clone, Serialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    pub tier_a: &'static str,
    pub tier_b: &'static str,
    /// Which side moved first.
    pub starter: Player,
    /// Moves in order, as move text.
    pub moves: Vec<String>,
    /// The winning side, if any.
    pub winner: Option<Player>,
    pub draw: bool,
    pub plies: usize,
    pub duration_ms: u64,
}

/// Builds a fresh game from the configured setup string.
fn new_game(config: &ArenaConfig) -> Result<GameState, String> {
    let (rows, cols, win_len, gravity) = match config.setup.as_str() {
        "connect4" => (6, 7, 4, true),
        "gomoku" => (15, 15, 5, false),
        header => crate::protocol::gfen::parse_setup(header)
            .map_err(|e| format!("bad setup '{}': {}", header, e))?,
    };
    GameState::new(rows, cols, win_len, gravity).map_err(|e| e.to_string())
}

/// Caps a search-backed tier's deadline at the arena's per-move budget.
fn with_movetime(tier: Difficulty, movetime_ms: u64) -> Difficulty {
    let mut tier = tier;
    if let Strategy::Minimax { depth, .. } = tier.strategy {
        tier.strategy = Strategy::Minimax { depth, movetime_ms };
    }
    tier
}

/// Plays a single arena game and returns the game record.
pub fn play_game(
    config: &ArenaConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, String> {
    let mut game = new_game(config)?;

    // Alternate the starting player between games.
    let starter = if game_id % 2 == 0 { Player::A } else { Player::B };
    game.reset_with_starting_player(starter);

    let tier_a = with_movetime(config.tier_a, config.movetime_ms);
    let tier_b = with_movetime(config.tier_b, config.movetime_ms);

    let rows = game.board().rows();
    let mut moves = Vec::new();
    let start = Instant::now();

    while !game.is_game_over() {
        let side = game.current_player();
        let tier = match side {
            Player::A => &tier_a,
            Player::B => &tier_b,
        };
        let (row, col) = game.choose_move(tier, rng).map_err(|e| e.to_string())?;
        let mv = cell_to_move(game.board(), row, col);
        game.apply_move_as(side, mv).map_err(|e| e.to_string())?;
        moves.push(encode_move_text(row, col, rows));
    }

    Ok(GameRecord {
        game_id,
        tier_a: config.tier_a.name,
        tier_b: config.tier_b.name,
        starter,
        plies: moves.len(),
        moves,
        winner: game.winner(),
        draw: game.is_draw(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Runs the arena, producing all game records.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_arena(config: &ArenaConfig) -> Result<Vec<GameRecord>, String> {
    let mut games = Vec::with_capacity(config.games);
    run_arena_with_callback(config, |game| {
        games.push(game);
    })?;
    Ok(games)
}

/// Runs the arena, calling `on_game` with each completed game record so the
/// caller can stream records to disk instead of holding them all.
pub fn run_arena_with_callback<F>(config: &ArenaConfig, on_game: F) -> Result<(), String>
where
    F: FnMut(GameRecord) + Send,
{
    if config.threads > 1 {
        run_arena_parallel(config, on_game)
    } else {
        run_arena_sequential(config, on_game)
    }
}

fn report_game(game: &GameRecord, done: usize, total: usize) {
    let outcome = match game.winner {
        Some(Player::A) => format!("{} (x) wins", game.tier_a),
        Some(Player::B) => format!("{} (o) wins", game.tier_b),
        None => "draw".to_string(),
    };
    eprintln!(
        "Game {}/{}: {} in {} plies ({}ms)",
        done, total, outcome, game.plies, game.duration_ms
    );
}

/// Sequential arena: plays games one at a time.
fn run_arena_sequential<F>(config: &ArenaConfig, mut on_game: F) -> Result<(), String>
where
    F: FnMut(GameRecord),
{
    let mut rng = if config.seed != 0 {
        SmallRng::seed_from_u64(config.seed)
    } else {
        SmallRng::from_entropy()
    };

    for i in 0..config.games {
        let game = play_game(config, i, &mut rng)?;
        if !config.quiet {
            report_game(&game, i + 1, config.games);
        }
        on_game(game);
    }
    Ok(())
}

/// Parallel arena: plays games concurrently using rayon, delivering
/// completed games to the callback over a channel.
fn run_arena_parallel<F>(config: &ArenaConfig, mut on_game: F) -> Result<(), String>
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<Result<GameRecord, String>>();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|e| format!("failed to build thread pool: {}", e))?;

    let config_clone = config.clone();
    let handle = std::thread::spawn(move || {
        pool.install(|| {
            (0..config_clone.games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    let mut rng = if config_clone.seed != 0 {
                        SmallRng::seed_from_u64(config_clone.seed.wrapping_add(i as u64))
                    } else {
                        SmallRng::from_entropy()
                    };
                    let result = play_game(&config_clone, i, &mut rng);
                    if let (Ok(game), false) = (&result, config_clone.quiet) {
                        let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        report_game(game, n, config_clone.games);
                    }
                    let _ = tx.send(result);
                });
        });
    });

    let mut first_error = None;
    for result in rx {
        match result {
            Ok(game) => on_game(game),
            Err(e) => first_error = first_error.or(Some(e)),
        }
    }

    if handle.join().is_err() {
        return Err("arena worker thread panicked".to_string());
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Prints a summary of arena results to stderr.
pub fn print_summary(config: &ArenaConfig, games: &[GameRecord]) {
    let total = games.len();
    let a_wins = games.iter().filter(|g| g.winner == Some(Player::A)).count();
    let b_wins = games.iter().filter(|g| g.winner == Some(Player::B)).count();
    let draws = total - a_wins - b_wins;
    let total_plies: usize = games.iter().map(|g| g.plies).sum();

    eprintln!("=== Arena Summary ===");
    eprintln!("Games: {}", total);
    eprintln!(
        "Avg plies/game: {:.1}",
        total_plies as f64 / total.max(1) as f64
    );
    eprintln!(
        "{} (x): {} ({:.1}%)",
        config.tier_a.name,
        a_wins,
        100.0 * a_wins as f64 / total.max(1) as f64
    );
    eprintln!(
        "{} (o): {} ({:.1}%)",
        config.tier_b.name,
        b_wins,
        100.0 * b_wins as f64 / total.max(1) as f64
    );
    eprintln!("draws: {}", draws);
}
