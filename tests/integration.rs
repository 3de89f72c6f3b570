//! Integration tests for the gridlock engine binary.
//!
//! Tests the full LGI protocol session flow by spawning the engine process,
//! sending commands via stdin, and verifying stdout responses.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

/// Sends a sequence of commands to the engine and collects stdout lines.
fn run_engine(commands: &[&str]) -> Vec<String> {
    let exe = env!("CARGO_BIN_EXE_gridlock");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start gridlock");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for cmd in commands {
        writeln!(stdin, "{}", cmd).unwrap();
    }
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    assert!(status.success());
    lines
}

/// A position where x has three on the floor and wins at e1.
const X_WINS_AT_E1: &str = "6x7:4:g/7/7/7/7/7/oxxx3/x";

/// A position where o threatens e1 and x must block there.
const X_MUST_BLOCK_E1: &str = "6x7:4:g/7/7/7/7/7/xooo2x/x";

#[test]
fn lgi_handshake_with_protocol_version() {
    let lines = run_engine(&["lgi", "quit"]);

    assert!(lines.iter().any(|l| l == "id name gridlock"));
    assert!(lines.iter().any(|l| l == "id author gridlock"));
    assert!(lines.iter().any(|l| l == "protocol_version 1"));
    assert!(lines.iter().any(|l| l == "lgiok"));

    // lgiok must close the handshake
    let lgiok_idx = lines.iter().position(|l| l == "lgiok").unwrap();
    let proto_idx = lines.iter().position(|l| l == "protocol_version 1").unwrap();
    assert!(proto_idx < lgiok_idx, "protocol_version must appear before lgiok");
}

#[test]
fn lgi_handshake_includes_options() {
    let lines = run_engine(&["lgi", "quit"]);

    let option_lines: Vec<&String> = lines.iter().filter(|l| l.starts_with("option ")).collect();
    assert!(!option_lines.is_empty(), "handshake should include option declarations");

    for opt in &option_lines {
        assert!(opt.contains("type "), "option line missing type: {}", opt);
    }
    assert!(option_lines.iter().any(|l| l.contains("name Difficulty")));
    assert!(option_lines.iter().any(|l| l.contains("name SearchTime")));
}

#[test]
fn isready_response() {
    let lines = run_engine(&["isready", "quit"]);
    assert!(lines.contains(&"readyok".to_string()));
}

#[test]
fn unknown_commands_are_ignored() {
    let lines = run_engine(&["foobar", "nonsense", "quit"]);
    assert!(lines.is_empty());
}

#[test]
fn empty_lines_are_ignored() {
    let lines = run_engine(&["", "  ", "isready", "quit"]);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0], "readyok");
}

#[test]
fn full_handshake_then_isready() {
    let lines = run_engine(&["lgi", "isready", "quit"]);

    assert!(lines.iter().any(|l| l == "id name gridlock"));
    assert!(lines.iter().any(|l| l == "lgiok"));
    assert!(lines.last() == Some(&"readyok".to_string()));
}

#[test]
fn setoption_then_isready() {
    let lines = run_engine(&[
        "lgi",
        "setoption name Difficulty value medium",
        "setoption name SearchTime value 50",
        "isready",
        "quit",
    ]);

    // setoption produces no output; isready still answers
    assert!(lines.last() == Some(&"readyok".to_string()));
}

#[test]
fn newgame_go_produces_bestmove() {
    let lines = run_engine(&[
        "lgi",
        "isready",
        "newgame",
        "go movetime 100",
        "quit",
    ]);

    let bestmoves: Vec<&String> = lines.iter().filter(|l| l.starts_with("bestmove ")).collect();
    assert_eq!(bestmoves.len(), 1, "expected exactly one bestmove response");
    assert_ne!(bestmoves[0].as_str(), "bestmove none");
}

#[test]
fn go_emits_info_lines_at_hard_tier() {
    let lines = run_engine(&[
        "lgi",
        "isready",
        "newgame",
        "play d e",
        "go movetime 100",
        "quit",
    ]);

    // The hard tier searches and reports depth/score/node counts.
    let info_lines: Vec<&String> = lines.iter().filter(|l| l.starts_with("info ")).collect();
    assert!(!info_lines.is_empty(), "expected info lines before bestmove");
    for info in &info_lines {
        assert!(info.contains("depth "), "info line missing depth: {}", info);
        assert!(info.contains("nodes "), "info line missing nodes: {}", info);
    }

    // info lines come before the bestmove line.
    let best_idx = lines.iter().position(|l| l.starts_with("bestmove ")).unwrap();
    let info_idx = lines.iter().position(|l| l.starts_with("info ")).unwrap();
    assert!(info_idx < best_idx);
}

#[test]
fn go_takes_the_winning_move_at_every_tier() {
    for tier in ["easy", "aggressive", "defensive", "medium", "hard"] {
        let lines = run_engine(&[
            "lgi",
            "isready",
            &format!("setoption name Difficulty value {}", tier),
            &format!("position {}", X_WINS_AT_E1),
            "go movetime 100",
            "quit",
        ]);

        assert!(
            lines.iter().any(|l| l == "bestmove e1"),
            "tier {} missed the win: {:?}",
            tier,
            lines
        );
    }
}

#[test]
fn go_blocks_the_forced_loss_at_every_tier() {
    for tier in ["easy", "aggressive", "defensive", "medium", "hard"] {
        let lines = run_engine(&[
            "lgi",
            "isready",
            &format!("setoption name Difficulty value {}", tier),
            &format!("position {}", X_MUST_BLOCK_E1),
            "go movetime 100",
            "quit",
        ]);

        assert!(
            lines.iter().any(|l| l == "bestmove e1"),
            "tier {} failed to block: {:?}",
            tier,
            lines
        );
    }
}

#[test]
fn play_then_show_renders_position() {
    let lines = run_engine(&[
        "lgi",
        "isready",
        "newgame",
        "play d e d",
        "show",
        "quit",
    ]);

    assert!(lines.iter().any(|l| l.contains("side to move: o")));
    assert!(lines.iter().any(|l| l.starts_with("gfen: 6x7:4:g/")));
}

#[test]
fn undo_retracts_a_move() {
    let lines = run_engine(&[
        "lgi",
        "isready",
        "newgame",
        "play d",
        "undo",
        "show",
        "quit",
    ]);

    assert!(lines.iter().any(|l| l == "gfen: 6x7:4:g/7/7/7/7/7/7/x"));
}

#[test]
fn analyze_outputs_json() {
    let lines = run_engine(&[
        "lgi",
        "isready",
        &format!("position {}", X_MUST_BLOCK_E1),
        "analyze",
        "quit",
    ]);

    let analysis = lines
        .iter()
        .find(|l| l.starts_with("analysis "))
        .expect("expected an analysis line");
    let json: serde_json::Value =
        serde_json::from_str(analysis.strip_prefix("analysis ").unwrap()).unwrap();
    assert_eq!(json["side_to_move"], "x");
    // o threatens e1 = cell (5, 4).
    assert!(json["blocking_moves"]
        .as_array()
        .unwrap()
        .iter()
        .any(|cell| cell[0] == 5 && cell[1] == 4));
}

#[test]
fn go_on_finished_game_answers_none() {
    let lines = run_engine(&[
        "lgi",
        "isready",
        "position 6x7:4:g/7/7/7/7/7/xxxx3/o",
        "go",
        "quit",
    ]);

    assert!(lines.iter().any(|l| l == "bestmove none"));
}

#[test]
fn gomoku_session_plays_and_answers() {
    let lines = run_engine(&[
        "lgi",
        "isready",
        "newgame gomoku",
        "play h8 i9",
        "go movetime 100",
        "quit",
    ]);

    let bestmoves: Vec<&String> = lines.iter().filter(|l| l.starts_with("bestmove ")).collect();
    assert_eq!(bestmoves.len(), 1);
    assert_ne!(bestmoves[0].as_str(), "bestmove none");
}

#[test]
fn malformed_position_does_not_crash() {
    let lines = run_engine(&[
        "lgi",
        "isready",
        "position garbage_gfen",
        "isready",
        "quit",
    ]);

    let readyok_count = lines.iter().filter(|l| *l == "readyok").count();
    assert_eq!(readyok_count, 2, "engine should respond to both isready commands");
}

#[test]
fn illegal_move_does_not_crash() {
    let lines = run_engine(&[
        "lgi",
        "isready",
        "newgame",
        "play z9",
        "play d d d d d d d",
        "isready",
        "quit",
    ]);

    let readyok_count = lines.iter().filter(|l| *l == "readyok").count();
    assert_eq!(readyok_count, 2);
}

#[test]
fn eof_exits_cleanly() {
    // No quit command; just close stdin
    let lines = run_engine(&["lgi", "isready"]);

    assert!(lines.iter().any(|l| l == "lgiok"));
    assert!(lines.iter().any(|l| l == "readyok"));
}

#[test]
fn seeded_sessions_are_reproducible() {
    let session = || {
        run_engine(&[
            "setoption name Seed value 42",
            "setoption name Difficulty value easy",
            "newgame",
            "go",
            "quit",
        ])
    };
    assert_eq!(session(), session());
}

#[test]
fn minimal_session() {
    let lines = run_engine(&[
        "lgi",
        "isready",
        "newgame",
        "play d",
        "go movetime 100",
        "quit",
    ]);

    assert!(lines.iter().any(|l| l == "id name gridlock"));
    assert!(lines.iter().any(|l| l == "lgiok"));
    assert!(lines.iter().any(|l| l == "readyok"));
    assert!(lines.iter().any(|l| l.starts_with("bestmove ")));
}
