//! Console Tests
//!
//! Drives the console through `handle_line` and `run_with`, capturing output.

use std::io::{self, Cursor, Write};

use ben_chess::console::Console;
use ben_chess::core::board::ChessBoard;
use ben_chess::core::piece::Color;
use ben_chess::engine::search::EvaluatorConfig;

fn console() -> Console {
    Console::with_config(EvaluatorConfig {
        depth: 1,
        seed: Some(17),
    })
}

/// Accepts everything except progress dashes
struct NoProgressWriter(Vec<u8>);

impl Write for NoProgressWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf == b"-" {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        }
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn send(console: &mut Console, line: &str) -> (bool, String) {
    let mut out = Vec::new();
    let keep_going = console.handle_line(line, &mut out).unwrap();
    (keep_going, String::from_utf8(out).unwrap())
}

#[test]
fn test_console_plays_move() {
    let mut console = console();
    let (keep_going, out) = send(&mut console, "e2-e4");
    assert!(keep_going);
    assert!(out.contains("Board layout code:"));
    assert!(out.contains("[P]"));
    assert_eq!(console.board().side_to_move(), Color::Black);
}

#[test]
fn test_console_rejects_illegal_move() {
    let mut console = console();
    let (_, out) = send(&mut console, "e2-e5");
    assert!(out.contains("e2-e5 is not a valid move"));
    assert_eq!(*console.board(), ChessBoard::new_game());

    let (_, out) = send(&mut console, "e2e4");
    assert!(out.contains("invalid move text"));
}

#[test]
fn test_console_engine_move() {
    let mut console = console();
    let (_, out) = send(&mut console, "");
    assert!(out.contains("Engine plays"));
    assert_eq!(console.board().side_to_move(), Color::Black);
}

#[test]
fn test_console_key_command() {
    let board = ChessBoard::new_game().play("d2-d4").unwrap();
    let key = board.unique_key();

    let mut console = console();
    let (_, out) = send(&mut console, &format!("key {key}"));
    assert!(out.contains(&key));
    assert_eq!(console.board().grid(), board.grid());
    assert_eq!(console.board().side_to_move(), Color::White);

    let (_, out) = send(&mut console, "key K3");
    assert!(out.contains("invalid board key"));
}

#[test]
fn test_console_key_keeps_spaces() {
    let mut console = console();
    send(&mut console, "key y DK");
    let king = console.board().piece_at("h1".parse().unwrap());
    assert!(king.is_some());
    assert_eq!(console.board().unique_key(), "y DK");
}

#[test]
fn test_console_moves_and_perft() {
    let mut console = console();
    let (_, out) = send(&mut console, "moves");
    assert!(out.starts_with("20 legal moves:"));
    assert!(out.contains("g1-f3"));

    let (_, out) = send(&mut console, "perft 2");
    assert!(out.contains("Nodes: 400"));

    let (_, out) = send(&mut console, "divide 1");
    assert_eq!(out.lines().filter(|l| l.ends_with(": 1")).count(), 20);
}

#[test]
fn test_console_depth() {
    let mut console = console();
    let (_, out) = send(&mut console, "depth 3");
    assert!(out.contains("Search depth set to 3"));
    assert_eq!(console.evaluator().config().depth, 3);

    let (_, out) = send(&mut console, "depth 0");
    assert!(out.contains("Invalid depth"));
    assert_eq!(console.evaluator().config().depth, 3);
}

#[test]
fn test_console_reports_checkmate() {
    let mut console = console();
    let mut last = String::new();
    for mv in ["f2-f3", "e7-e5", "g2-g4", "d8-h4"] {
        last = send(&mut console, mv).1;
    }
    assert!(last.contains("Checkmate, black wins"));

    let (_, out) = send(&mut console, "");
    assert!(out.contains("Checkmate, black wins"));
    assert!(!out.contains("Engine plays"));
}

#[test]
fn test_console_reports_check() {
    let mut console = console();
    let mut last = String::new();
    for mv in ["e2-e4", "f7-f6", "f1-c4", "a7-a6", "c4-g8", "a6-a5", "d1-h5"] {
        last = send(&mut console, mv).1;
    }
    assert!(last.contains("Check! black to move"));
}

#[test]
fn test_console_new_and_quit() {
    let mut console = console();
    send(&mut console, "e2-e4");
    send(&mut console, "new");
    assert_eq!(*console.board(), ChessBoard::new_game());

    let (keep_going, _) = send(&mut console, "quit");
    assert!(!keep_going);
}

#[test]
fn test_console_run_with_script() {
    let mut console = console();
    let input = Cursor::new("e2-e4\ne7-e5\nquit\ng1-f3\n");
    let mut out = Vec::new();
    console.run_with(input, &mut out).unwrap();

    // Lines after quit are never read
    assert_eq!(console.board().side_to_move(), Color::White);
    assert!(console.board().piece_at("g1".parse().unwrap()).is_some());
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("   a  b  c  d  e  f  g  h\n"));
}

#[test]
fn test_console_progress_write_error_is_returned() {
    let mut console = console();
    let mut out = NoProgressWriter(Vec::new());
    let err = console.handle_line("", &mut out).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert_eq!(*console.board(), ChessBoard::new_game());
}
