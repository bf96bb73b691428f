//! End-to-end protocol checks against the real binary over stdin/stdout.

use std::io::Write;
use std::process::{Command, Stdio};

/// Runs the engine binary, feeds it `input`, and returns everything it printed.
fn run_engine(input: &str) -> String {
    let mut child = Command::new(env!("CARGO_BIN_EXE_corvid"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("engine binary should start");

    child
        .stdin
        .as_mut()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("engine accepts input");

    let output = child.wait_with_output().expect("engine exits");
    String::from_utf8(output.stdout).expect("engine output is UTF-8")
}

#[test]
fn test_handshake() {
    let output = run_engine("uci\nisready\nquit\n");
    assert!(output.contains("id name"));
    assert!(output.contains("id author"));
    assert!(output.contains("uciok"));
    assert!(output.contains("readyok"));
}

#[test]
fn test_go_movetime_prints_one_bestmove() {
    let output = run_engine("position startpos moves e2e4 e7e5\ngo movetime 100\nquit\n");
    assert_eq!(output.matches("bestmove").count(), 1);
    assert!(output.contains("info depth 1"));

    // The bestmove line is a legal-looking move string.
    let bestmove = output
        .lines()
        .find(|line| line.starts_with("bestmove"))
        .expect("bestmove line exists");
    let mv = bestmove.split_whitespace().nth(1).expect("move after bestmove");
    assert!(mv.len() == 4 || mv.len() == 5, "unexpected move {mv:?}");
}

#[test]
fn test_mate_in_one_is_reported() {
    let output = run_engine("position fen 6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1\ngo depth 5\nquit\n");
    assert!(output.contains("bestmove a1a8"));
    assert!(output.contains("score mate 1"));
}

#[test]
fn test_unknown_commands_are_ignored() {
    let output = run_engine("xyzzy\nisready\nquit\n");
    assert!(output.contains("readyok"));
}
