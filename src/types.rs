use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn other_color(&self) -> Color {
        if *self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Index into per-side arrays (coverage sets are stored `[white, black]`).
    pub fn index(&self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    /// Which side a piece on `row` belongs to at game start. Rows 0 and 1 are
    /// Black's back rank and pawns, rows 6 and 7 are White's.
    pub fn from_starting_row(row: u8) -> Option<Color> {
        match row {
            0 | 1 => Some(Color::Black),
            6 | 7 => Some(Color::White),
            _ => None,
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// Is the piece a sliding piece (one which can move multiple squares in a
    /// given direction)
    pub fn is_sliding(&self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen)
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

/// A square on the board. `(0, 0)` is White's far corner (Black's queenside
/// rook at game start); `row` grows toward White, `col` grows kingside.
/// In algebraic terms `(0, 0)` is a8 and `(7, 7)` is h1.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParsePositionError {
    #[error("square must be 2 characters, got {0}")]
    BadLength(usize),
    #[error("invalid file character '{0}', expected 'a'-'h'")]
    BadFile(char),
    #[error("invalid rank character '{0}', expected '1'-'8'")]
    BadRank(char),
}

impl Position {
    pub fn new(row: u8, col: u8) -> Position {
        debug_assert!(row <= 7 && col <= 7);
        Position { row, col }
    }

    /// The square reached by applying `(d_row, d_col)`, or `None` if it falls
    /// off the board.
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Position> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Parse coordinate algebraic, e.g. "e2" -> (6, 4).
    pub fn from_algebraic(s: &str) -> Result<Position, ParsePositionError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return Err(ParsePositionError::BadLength(chars.len()));
        }
        let file = chars[0];
        let rank = chars[1];
        if !('a'..='h').contains(&file) {
            return Err(ParsePositionError::BadFile(file));
        }
        if !('1'..='8').contains(&rank) {
            return Err(ParsePositionError::BadRank(rank));
        }
        Ok(Position {
            row: 7 - (rank as u8 - b'1'),
            col: file as u8 - b'a',
        })
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", (b'a' + self.col) as char, 8 - self.row)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    /// Tracked for the pieces whose first-move status affects legality: the
    /// pawn double-step and castling rights. Flipped to true when a move is
    /// committed by `Game::player_move`, never by simulation.
    pub has_moved: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece {
            color,
            kind,
            has_moved: false,
        }
    }

    pub fn to_symbol(&self) -> &str {
        let is_white = self.color == Color::White;
        match self.kind {
            PieceKind::Pawn => {
                if is_white {
                    "♙"
                } else {
                    "♟"
                }
            }
            PieceKind::Rook => {
                if is_white {
                    "♖"
                } else {
                    "♜"
                }
            }
            PieceKind::Knight => {
                if is_white {
                    "♘"
                } else {
                    "♞"
                }
            }
            PieceKind::Bishop => {
                if is_white {
                    "♗"
                } else {
                    "♝"
                }
            }
            PieceKind::Queen => {
                if is_white {
                    "♕"
                } else {
                    "♛"
                }
            }
            PieceKind::King => {
                if is_white {
                    "♔"
                } else {
                    "♚"
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveFlag {
    Regular,
    CastleKingside,
    CastleQueenside,
}

impl MoveFlag {
    pub fn is_castle(&self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub flag: MoveFlag,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            flag: MoveFlag::Regular,
        }
    }

    pub fn to_human(&self) -> String {
        match self.flag {
            MoveFlag::CastleKingside => "castles kingside".to_string(),
            MoveFlag::CastleQueenside => "castles queenside".to_string(),
            MoveFlag::Regular => format!("{} to {}", self.from, self.to),
        }
    }
}

/// Rule violations reported back to the caller. Neither variant leaves any
/// engine state mutated. A missing king is not represented here: that is an
/// internal invariant violation and panics instead (corrupted engine state
/// is not recoverable).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Position, to: Position },
    #[error("the game has already ended")]
    GameAlreadyEnded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_color() {
        assert_eq!(Color::White, Color::Black.other_color());
        assert_eq!(Color::Black, Color::White.other_color());
    }

    #[test]
    fn test_color_from_starting_row() {
        assert_eq!(Color::from_starting_row(0), Some(Color::Black));
        assert_eq!(Color::from_starting_row(1), Some(Color::Black));
        assert_eq!(Color::from_starting_row(6), Some(Color::White));
        assert_eq!(Color::from_starting_row(7), Some(Color::White));
        assert_eq!(Color::from_starting_row(3), None);
    }

    #[test]
    fn test_is_sliding() {
        assert!(!PieceKind::Pawn.is_sliding());
        assert!(PieceKind::Rook.is_sliding());
        assert!(PieceKind::Bishop.is_sliding());
        assert!(!PieceKind::Knight.is_sliding());
        assert!(PieceKind::Queen.is_sliding());
        assert!(!PieceKind::King.is_sliding());
    }

    #[test]
    fn test_position_from_algebraic() {
        assert_eq!(Position::from_algebraic("a8"), Ok(Position::new(0, 0)));
        assert_eq!(Position::from_algebraic("h1"), Ok(Position::new(7, 7)));
        assert_eq!(Position::from_algebraic("e2"), Ok(Position::new(6, 4)));
        assert_eq!(
            Position::from_algebraic("e22"),
            Err(ParsePositionError::BadLength(3))
        );
        assert_eq!(
            Position::from_algebraic("i3"),
            Err(ParsePositionError::BadFile('i'))
        );
        assert_eq!(
            Position::from_algebraic("a9"),
            Err(ParsePositionError::BadRank('9'))
        );
    }

    #[test]
    fn test_position_to_algebraic_roundtrip() {
        for row in 0..8 {
            for col in 0..8 {
                let pos = Position::new(row, col);
                assert_eq!(Position::from_algebraic(&pos.to_algebraic()), Ok(pos));
            }
        }
    }

    #[test]
    fn test_offset_stays_in_bounds() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, -1), None);
        assert_eq!(corner.offset(1, 2), Some(Position::new(1, 2)));
        let other = Position::new(7, 7);
        assert_eq!(other.offset(1, 0), None);
        assert_eq!(other.offset(0, 1), None);
    }
}
