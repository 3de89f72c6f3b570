//! Arena CLI.
//!
//! Plays games between two difficulty tiers and outputs one JSON record
//! per game.
//!
//! Usage:
//!   cargo run --release --bin arena -- [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --mode M        connect4, gomoku, or a setup like 8x8:4:g (default: connect4)
//!   --tier-a NAME   Tier for the x stones (default: hard)
//!   --tier-b NAME   Tier for the o stones (default: medium)
//!   --movetime MS   Search time per move in ms (default: 200)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --output FILE   Output file path (default: stdout)
//!   --quiet         Suppress progress and summary output

use std::env;
use std::fs::File;
use std::io::{self, BufWriter};
use std::time::Instant;

use gridlock::search::Difficulty;
use gridlock::selfplay::{self, ArenaConfig};

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = ArenaConfig::default();
    let mut output_path: Option<String> = None;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                config.games = args[i].parse().expect("invalid --games value");
            }
            "--mode" => {
                i += 1;
                config.setup = args[i].clone();
            }
            "--tier-a" => {
                i += 1;
                config.tier_a = parse_tier(&args[i]);
            }
            "--tier-b" => {
                i += 1;
                config.tier_b = parse_tier(&args[i]);
            }
            "--movetime" => {
                i += 1;
                config.movetime_ms = args[i].parse().expect("invalid --movetime value");
            }
            "--threads" => {
                i += 1;
                config.threads = args[i].parse().expect("invalid --threads value");
            }
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("invalid --seed value");
            }
            "--output" => {
                i += 1;
                output_path = Some(args[i].clone());
            }
            "--quiet" => {
                quiet = true;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    config.quiet = quiet;

    if !quiet {
        eprintln!(
            "Arena: {} games of {}, {} (x) vs {} (o), {}ms/move, {} threads",
            config.games,
            config.setup,
            config.tier_a.name,
            config.tier_b.name,
            config.movetime_ms,
            config.threads
        );
    }

    let start = Instant::now();
    let games = match selfplay::run_arena(&config) {
        Ok(games) => games,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    if !quiet {
        eprintln!(
            "Completed {} games in {:.1}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        selfplay::print_summary(&config, &games);
    }

    match output_path {
        Some(path) => {
            let file = File::create(&path).expect("failed to create output file");
            let mut writer = BufWriter::new(file);
            selfplay::write_jsonl(&games, &mut writer).expect("failed to write output");
            if !quiet {
                eprintln!("Wrote {} games to {}", games.len(), path);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            selfplay::write_jsonl(&games, &mut writer).expect("failed to write output");
        }
    }
}

fn parse_tier(name: &str) -> Difficulty {
    match Difficulty::from_name(name) {
        Some(tier) => tier,
        None => {
            eprintln!(
                "Unknown tier '{}'; expected one of: {}",
                name,
                Difficulty::ALL_NAMES.join(", ")
            );
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: arena [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N        Number of games to play (default: 10)");
    eprintln!("  --mode M         connect4, gomoku, or a setup like 8x8:4:g (default: connect4)");
    eprintln!("  --tier-a NAME    Tier for the x stones (default: hard)");
    eprintln!("  --tier-b NAME    Tier for the o stones (default: medium)");
    eprintln!("  --movetime MS    Search time per move in ms (default: 200)");
    eprintln!("  --threads N      Number of parallel threads (default: 4)");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --output FILE    Output file path (default: stdout)");
    eprintln!("  --quiet          Suppress progress and summary output");
    eprintln!("  --help           Show this help");
}
