//! Cross-checks legal move generation against shakmaty over random games.

use std::rc::Rc;

use ben_chess::core::board::{CastleRole, ChessBoard};
use ben_chess::core::coordinate::Coordinate;
use ben_chess::core::piece::{ChessPiece, Color, PieceKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shakmaty::{fen::Fen, CastlingMode, Chess, Position};

fn castling_field(board: &ChessBoard) -> String {
    let mut field = String::new();
    for (color, row, letters) in [(Color::White, 7, ['K', 'Q']), (Color::Black, 0, ['k', 'q'])] {
        let at = |col: u8| Coordinate::new(row, col).and_then(|sq| board.piece_at(sq));
        if at(4) != Some(ChessPiece::new(PieceKind::King, color))
            || board.has_moved(color, CastleRole::King)
        {
            continue;
        }
        let rook = Some(ChessPiece::new(PieceKind::Rook, color));
        if at(7) == rook && !board.has_moved(color, CastleRole::KingsRook) {
            field.push(letters[0]);
        }
        if at(0) == rook && !board.has_moved(color, CastleRole::QueensRook) {
            field.push(letters[1]);
        }
    }
    if field.is_empty() {
        field.push('-');
    }
    field
}

fn to_fen(board: &ChessBoard) -> String {
    let ranks: Vec<String> = board
        .grid()
        .iter()
        .map(|row| {
            let mut rank = String::new();
            let mut empty = 0;
            for square in row {
                match square {
                    None => empty += 1,
                    Some(piece) => {
                        if empty > 0 {
                            rank.push_str(&empty.to_string());
                            empty = 0;
                        }
                        rank.push(piece.to_char());
                    }
                }
            }
            if empty > 0 {
                rank.push_str(&empty.to_string());
            }
            rank
        })
        .collect();

    let side = if board.is_blacks_turn() { "b" } else { "w" };
    let ep = match board.en_passant_file() {
        Some(file) => {
            let rank = if board.is_blacks_turn() { '3' } else { '6' };
            format!("{}{}", (b'a' + file) as char, rank)
        }
        None => "-".to_string(),
    };
    format!("{} {} {} {} 0 1", ranks.join("/"), side, castling_field(board), ep)
}

fn oracle(board: &ChessBoard) -> Chess {
    let fen: Fen = to_fen(board).parse().unwrap();
    fen.into_position(CastlingMode::Standard).unwrap()
}

#[test]
fn test_fen_of_new_game() {
    assert_eq!(
        to_fen(&ChessBoard::new_game()),
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    );
}

#[test]
fn test_legal_move_counts_match_over_random_games() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _game in 0..30 {
        let mut board = Rc::new(ChessBoard::new_game());
        for _ply in 0..120 {
            let ours = board.valid_moves();
            let pos = oracle(&board);
            assert_eq!(
                ours.len(),
                pos.legal_moves().len(),
                "move count differs for {}",
                to_fen(&board)
            );
            assert_eq!(board.is_check(), pos.is_check(), "check differs for {}", to_fen(&board));
            if ours.is_empty() {
                break;
            }
            let mv = ours[rng.random_range(0..ours.len())];
            board = board.play_move(&mv).unwrap();
        }
    }
}
