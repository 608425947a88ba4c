use once_cell::sync::Lazy;

use crate::types::{Color, PieceKind};

/// Movement delta table, one fixed ordered vector list per piece kind. Pure
/// data: whether a vector may be applied repeatedly is the kind's sliding
/// classification (`PieceKind::is_sliding`), and whether an individual
/// application is valid is `movegen`'s job.
///
/// Deltas are `(d_row, d_col)`. White pawns move toward row 0, Black pawns
/// toward row 7. The king's `(0, 2)` and `(0, -2)` entries are the castling
/// leaps; they are single bounded steps, never iterated.
pub struct MovementCatalog {
    pawn_white: Vec<(i8, i8)>,
    pawn_black: Vec<(i8, i8)>,
    knight: Vec<(i8, i8)>,
    bishop: Vec<(i8, i8)>,
    rook: Vec<(i8, i8)>,
    queen: Vec<(i8, i8)>,
    king: Vec<(i8, i8)>,
}

pub static CATALOG: Lazy<MovementCatalog> = Lazy::new(MovementCatalog::new);

impl MovementCatalog {
    fn new() -> Self {
        let rook = vec![(1, 0), (-1, 0), (0, 1), (0, -1)];
        let bishop = vec![(1, 1), (1, -1), (-1, 1), (-1, -1)];
        let queen = rook.iter().chain(bishop.iter()).copied().collect();
        Self {
            pawn_white: vec![(-1, 0), (-2, 0), (-1, 1), (-1, -1)],
            pawn_black: vec![(1, 0), (2, 0), (1, 1), (1, -1)],
            knight: vec![
                (2, 1),
                (2, -1),
                (-2, 1),
                (-2, -1),
                (1, 2),
                (1, -2),
                (-1, 2),
                (-1, -2),
            ],
            bishop,
            rook,
            queen,
            king: vec![
                (1, 0),
                (-1, 0),
                (0, 1),
                (0, -1),
                (1, 1),
                (1, -1),
                (-1, 1),
                (-1, -1),
                (0, 2),
                (0, -2),
            ],
        }
    }

    pub fn vectors(&self, kind: PieceKind, color: Color) -> &[(i8, i8)] {
        match kind {
            PieceKind::Pawn => match color {
                Color::White => &self.pawn_white,
                Color::Black => &self.pawn_black,
            },
            PieceKind::Knight => &self.knight,
            PieceKind::Bishop => &self.bishop,
            PieceKind::Rook => &self.rook,
            PieceKind::Queen => &self.queen,
            PieceKind::King => &self.king,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_counts() {
        for color in [Color::White, Color::Black] {
            assert_eq!(CATALOG.vectors(PieceKind::Pawn, color).len(), 4);
            assert_eq!(CATALOG.vectors(PieceKind::Knight, color).len(), 8);
            assert_eq!(CATALOG.vectors(PieceKind::Bishop, color).len(), 4);
            assert_eq!(CATALOG.vectors(PieceKind::Rook, color).len(), 4);
            assert_eq!(CATALOG.vectors(PieceKind::Queen, color).len(), 8);
            assert_eq!(CATALOG.vectors(PieceKind::King, color).len(), 10);
        }
    }

    #[test]
    fn test_queen_is_rook_plus_bishop() {
        let queen = CATALOG.vectors(PieceKind::Queen, Color::White);
        for v in CATALOG.vectors(PieceKind::Rook, Color::White) {
            assert!(queen.contains(v));
        }
        for v in CATALOG.vectors(PieceKind::Bishop, Color::White) {
            assert!(queen.contains(v));
        }
    }

    #[test]
    fn test_pawn_direction_per_side() {
        // White advances toward row 0, Black toward row 7
        assert!(CATALOG
            .vectors(PieceKind::Pawn, Color::White)
            .iter()
            .all(|(dr, _)| *dr < 0));
        assert!(CATALOG
            .vectors(PieceKind::Pawn, Color::Black)
            .iter()
            .all(|(dr, _)| *dr > 0));
    }

    #[test]
    fn test_king_includes_castling_leaps() {
        let king = CATALOG.vectors(PieceKind::King, Color::White);
        assert!(king.contains(&(0, 2)));
        assert!(king.contains(&(0, -2)));
    }
}
