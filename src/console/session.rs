use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, info};

use crate::core::board::ChessBoard;
use crate::core::coordinate::Coordinate;
use crate::engine::perft::{divide, perft};
use crate::engine::search::{Evaluator, EvaluatorConfig};

const PROGRESS_WIDTH: usize = 40;

pub struct Console {
    board: Rc<ChessBoard>,
    evaluator: Evaluator,
}

impl Console {
    pub fn new() -> Self {
        Self::with_config(EvaluatorConfig::default())
    }

    pub fn with_config(config: EvaluatorConfig) -> Self {
        Console {
            board: Rc::new(ChessBoard::new_game()),
            evaluator: Evaluator::new(config),
        }
    }

    /// Current position (for tests).
    pub fn board(&self) -> &ChessBoard {
        &self.board
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Read commands from stdin until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        self.run_with(stdin.lock(), &mut stdout)
    }

    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        self.cmd_display(out)?;
        for line in input.lines() {
            let line = line?;
            if !self.handle_line(&line, out)? {
                break;
            }
            out.flush()?;
        }
        Ok(())
    }

    /// Handle one input line. Returns `false` once the session should end.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<bool> {
        let raw = line.trim_end_matches(['\r', '\n']);

        // Keys may carry significant spaces, so take the rest of the line verbatim
        if let Some(key) = raw.trim_start().strip_prefix("key ") {
            self.cmd_key(key, out)?;
            return Ok(true);
        }

        let parts: Vec<&str> = raw.split_whitespace().collect();
        match parts.as_slice() {
            [] => self.cmd_engine_move(out)?,
            ["quit" | "exit"] => return Ok(false),
            ["new"] => self.cmd_new(out)?,
            ["d" | "display"] => self.cmd_display(out)?,
            ["moves"] => self.cmd_moves(out)?,
            ["eval"] => writeln!(out, "Board value: {}", self.board.board_value())?,
            ["depth", n] => self.cmd_depth(n, out)?,
            ["perft", n] => self.cmd_perft(n, false, out)?,
            ["divide", n] => self.cmd_perft(n, true, out)?,
            [mv] => self.cmd_play(mv, out)?,
            _ => writeln!(out, "Unknown command: {}", raw.trim())?,
        }
        Ok(true)
    }

    fn cmd_engine_move<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let depth = self.evaluator.config().depth;
        let start = Instant::now();
        let mut drawn = 0;
        let mut write_error = None;

        write!(out, "Thinking [")?;
        let best = self.evaluator.get_best_move_with_progress(&self.board, depth, &mut |current, total| {
            let filled = current * PROGRESS_WIDTH / total.max(1);
            while write_error.is_none() && drawn < filled {
                if let Err(e) = write!(out, "-") {
                    write_error = Some(e);
                }
                drawn += 1;
            }
        });
        if let Some(e) = write_error {
            return Err(e);
        }
        writeln!(out, "]")?;

        let Some(mv) = best else {
            return self.report_status(out);
        };
        let stats = self.evaluator.stats();
        info!(
            %mv,
            leaves = stats.leaves,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "engine move"
        );

        match self.board.play_move(&mv) {
            Ok(next) => {
                self.board = next;
                writeln!(out, "Engine plays {mv}")?;
                self.show_after_move(Some(mv.target), out)
            }
            Err(e) => writeln!(out, "{e}"),
        }
    }

    fn cmd_play<W: Write>(&mut self, text: &str, out: &mut W) -> io::Result<()> {
        match self.board.play(text) {
            Ok(next) => {
                debug!(mv = text, "move played");
                self.board = next;
                let target = text.get(3..5).and_then(Coordinate::from_algebraic);
                self.show_after_move(target, out)
            }
            Err(e) => writeln!(out, "{e}"),
        }
    }

    fn cmd_new<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.board = Rc::new(ChessBoard::new_game());
        self.cmd_display(out)
    }

    fn cmd_key<W: Write>(&mut self, key: &str, out: &mut W) -> io::Result<()> {
        match ChessBoard::from_unique_key(key) {
            Ok(board) => {
                self.board = Rc::new(board);
                self.cmd_display(out)
            }
            Err(e) => writeln!(out, "{e}"),
        }
    }

    fn cmd_display<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", render(&self.board, None))?;
        writeln!(out, "Board layout code: {}", self.board.unique_key())?;
        writeln!(out, "{} to move", self.board.side_to_move())
    }

    fn cmd_moves<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let moves: Vec<String> = self.board.valid_moves().iter().map(ToString::to_string).collect();
        writeln!(out, "{} legal moves: {}", moves.len(), moves.join(" "))
    }

    fn cmd_depth<W: Write>(&mut self, n: &str, out: &mut W) -> io::Result<()> {
        match n.parse::<u32>() {
            Ok(depth) if depth > 0 => {
                self.evaluator.set_depth(depth);
                writeln!(out, "Search depth set to {depth}")
            }
            _ => writeln!(out, "Invalid depth: {n}"),
        }
    }

    fn cmd_perft<W: Write>(&self, n: &str, split: bool, out: &mut W) -> io::Result<()> {
        let Ok(depth) = n.parse::<u32>() else {
            return writeln!(out, "Invalid depth: {n}");
        };
        let start = Instant::now();
        let nodes = if split {
            let counts = divide(&self.board, depth);
            for (mv, count) in &counts {
                writeln!(out, "{mv}: {count}")?;
            }
            counts.iter().map(|(_, count)| count).sum()
        } else {
            perft(&self.board, depth)
        };
        let elapsed = start.elapsed();
        let nps = if elapsed.as_millis() > 0 { nodes as u128 * 1000 / elapsed.as_millis() } else { 0 };
        writeln!(out, "Nodes: {} ({} ms, {} nps)", nodes, elapsed.as_millis(), nps)
    }

    fn show_after_move<W: Write>(&self, highlight: Option<Coordinate>, out: &mut W) -> io::Result<()> {
        write!(out, "{}", render(&self.board, highlight))?;
        writeln!(out, "Board layout code: {}", self.board.unique_key())?;
        self.report_status(out)
    }

    fn report_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let side = self.board.side_to_move();
        if self.board.has_legal_moves() {
            if self.board.is_check() {
                writeln!(out, "Check! {side} to move")?;
            }
            return Ok(());
        }
        if self.board.is_check() {
            writeln!(out, "Checkmate, {} wins", !side)
        } else {
            writeln!(out, "Stalemate")
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// Diagram of `board` with file and rank labels. Empty squares show as `.`;
/// the `highlight` square is bracketed.
pub fn render(board: &ChessBoard, highlight: Option<Coordinate>) -> String {
    let mut s = String::from("   a  b  c  d  e  f  g  h\n");
    for row in 0..8u8 {
        let rank = 8 - row;
        s.push_str(&format!("{rank} "));
        for col in 0..8u8 {
            let Some(sq) = Coordinate::new(row, col) else {
                continue;
            };
            let c = board.piece_at(sq).map_or('.', |p| p.to_char());
            if highlight == Some(sq) {
                s.push_str(&format!("[{c}]"));
            } else {
                s.push_str(&format!(" {c} "));
            }
        }
        s.push_str(&format!(" {rank}\n"));
    }
    s.push_str("   a  b  c  d  e  f  g  h\n");
    s
}
