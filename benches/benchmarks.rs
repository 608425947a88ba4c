use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chess_rooms::board::Board;
use chess_rooms::coverage::CoverageTracker;
use chess_rooms::game::Game;
use chess_rooms::movegen::pseudo_legal_moves;
use chess_rooms::types::{Color, Piece, PieceKind, Position};

fn pos(s: &str) -> Position {
    Position::from_algebraic(s).unwrap()
}

fn new_game() -> Game {
    Game::new("host".to_string(), "guest".to_string())
}

/// Open position with long sliding rays, where the simulate/undo loop is at
/// its most expensive.
fn midgame() -> Game {
    let mut game = new_game();
    for (from, to) in [
        ("e2", "e4"),
        ("e7", "e5"),
        ("g1", "f3"),
        ("b8", "c6"),
        ("f1", "c4"),
        ("f8", "c5"),
        ("d2", "d3"),
        ("g8", "f6"),
    ] {
        game.player_move(pos(from), pos(to)).unwrap();
    }
    game
}

pub fn bench_pseudo_legal_queen(c: &mut Criterion) {
    let mut board = Board::empty();
    board.set(pos("d4"), Some(Piece::new(PieceKind::Queen, Color::White)));
    c.bench_function("pseudo legal moves for open queen", |b| {
        b.iter(|| pseudo_legal_moves(black_box(&board), black_box(pos("d4"))))
    });
}

pub fn bench_coverage_recompute(c: &mut Criterion) {
    let board = Board::new();
    let mut coverage = CoverageTracker::new(&board);
    c.bench_function("coverage recompute from start", |b| {
        b.iter(|| coverage.recompute(black_box(&board)))
    });
}

pub fn bench_legal_moves_from_start(c: &mut Criterion) {
    let mut game = new_game();
    c.bench_function("legal moves for white from start", |b| {
        b.iter(|| game.legal_moves_for_side(black_box(Color::White)))
    });
}

pub fn bench_legal_moves_midgame(c: &mut Criterion) {
    let mut game = midgame();
    c.bench_function("legal moves for white in open midgame", |b| {
        b.iter(|| game.legal_moves_for_side(black_box(Color::White)))
    });
}

pub fn bench_checkmate_search(c: &mut Criterion) {
    let mut game = new_game();
    for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
        game.player_move(pos(from), pos(to)).unwrap();
    }
    c.bench_function("checkmate detection after fools mate", |b| {
        b.iter(|| game.is_checkmate(black_box(Color::White)))
    });
}

criterion_group!(
    benches,
    bench_pseudo_legal_queen,
    bench_coverage_recompute,
    bench_legal_moves_from_start,
    bench_legal_moves_midgame,
    bench_checkmate_search,
);
criterion_main!(benches);
