use itertools::iproduct;

use crate::types::{Color, Piece, PieceKind, Position};

/// Back rank piece order across columns 0-7 for both sides.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The 8x8 grid. Pure storage and queries, no rule knowledge: anything that
/// needs the movement rules lives in `movegen` and `game`.
///
/// Invariant: at most one piece per cell and exactly one king per side while
/// a game is in progress. The legality simulation in `game` temporarily
/// removes captured pieces but always restores them before returning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Standard starting setup: pawns on rows 1 and 6, back ranks on rows 0
    /// and 7. Side is derived from the row a piece starts on.
    pub fn new() -> Board {
        let mut board = Board::empty();
        for (row, col) in iproduct!(0..8u8, 0..8u8) {
            let kind = match row {
                1 | 6 => PieceKind::Pawn,
                0 | 7 => BACK_RANK[col as usize],
                _ => continue,
            };
            // rows 0 and 1 are Black's, 6 and 7 White's
            let color = Color::from_starting_row(row).unwrap();
            board.set(Position::new(row, col), Some(Piece::new(kind, color)));
        }
        board
    }

    /// An empty board, for building custom positions in tests.
    pub fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.squares[pos.row as usize][pos.col as usize]
    }

    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        self.squares[pos.row as usize][pos.col as usize] = piece;
    }

    /// Move whatever occupies `from` into `to`, overwriting any occupant
    /// there, and empty `from`. Unconditional: no legality check of any kind.
    pub fn relocate(&mut self, from: Position, to: Position) {
        let piece = self.get(from);
        self.set(to, piece);
        self.set(from, None);
    }

    /// Locations of every piece of `side`, scanned row-major. Callers must
    /// not rely on the order beyond it being deterministic.
    pub fn pieces_of(&self, side: Color) -> Vec<Position> {
        iproduct!(0..8u8, 0..8u8)
            .map(|(row, col)| Position::new(row, col))
            .filter(|pos| self.get(*pos).is_some_and(|p| p.color == side))
            .collect()
    }

    /// Location of `side`'s king. Panics if the king is missing: that means
    /// a move application or an aborted simulation corrupted the board, and
    /// there is no way to recover.
    pub fn find_king(&self, side: Color) -> Position {
        iproduct!(0..8u8, 0..8u8)
            .map(|(row, col)| Position::new(row, col))
            .find(|pos| {
                self.get(*pos)
                    .is_some_and(|p| p.kind == PieceKind::King && p.color == side)
            })
            .unwrap_or_else(|| panic!("invariant violated: no {} king on the board", side.to_human()))
    }

    /// The board reduced to what a client needs to draw it: each occupied
    /// cell as its kind and side.
    pub fn snapshot(&self) -> [[Option<(PieceKind, Color)>; 8]; 8] {
        let mut cells = [[None; 8]; 8];
        for (row, col) in iproduct!(0..8usize, 0..8usize) {
            cells[row][col] = self.squares[row][col].map(|p| (p.kind, p.color));
        }
        cells
    }

    pub fn draw_to_terminal(&self) {
        for row in 0..8u8 {
            let mut line = format!("{} ", 8 - row);
            for col in 0..8u8 {
                match self.get(Position::new(row, col)) {
                    Some(piece) => line.push_str(piece.to_symbol()),
                    None => line.push('.'),
                }
                line.push(' ');
            }
            println!("{line}");
        }
        println!("  a b c d e f g h");
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
