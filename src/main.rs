//! Gridlock -- a connection-game engine implementing the LGI protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout,
//! following the LGI (Line Game Interface) convention.

use std::io::{self, BufRead};

use gridlock::engine::Engine;
use gridlock::protocol::parser::{parse_command, Command};

/// Runs the main LGI protocol loop, reading commands from stdin
/// and writing responses to stdout.
fn main() {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::Lgi => {
                engine.handle_lgi(&mut out);
            }
            Command::IsReady => {
                engine.handle_isready(&mut out);
            }
            Command::SetOption { name, value } => {
                engine.set_option(name, value);
            }
            Command::NewGame { setup } => {
                if let Err(e) = engine.new_game(setup.as_deref()) {
                    eprintln!("{}", e);
                }
            }
            Command::Position { gfen } => {
                if let Err(e) = engine.set_position(&gfen) {
                    eprintln!("{}", e);
                }
            }
            Command::Play { moves } => {
                if let Err(e) = engine.play(&moves) {
                    eprintln!("{}", e);
                }
            }
            Command::Undo => {
                if let Err(e) = engine.undo() {
                    eprintln!("{}", e);
                }
            }
            Command::Go(params) => {
                engine.handle_go(&params, &mut out);
            }
            Command::Analyze => {
                engine.handle_analyze(&mut out);
            }
            Command::Show => {
                engine.handle_show(&mut out);
            }
            Command::Quit => {
                break;
            }
        }
    }
}
