use crate::board::Board;
use crate::catalog::CATALOG;
use crate::types::{Move, MoveFlag, Piece, PieceKind, Position};

/// All pseudo-legal moves for the piece at `position`: bounds, occupancy and
/// piece-shape rules are respected, king safety is not (that is the legality
/// filter's job in `game`). Returns an empty list for an empty square.
///
/// Output order is deterministic: catalog vector order, and within a sliding
/// vector, ray order outward from the piece. Tests rely on this.
pub fn pseudo_legal_moves(board: &Board, position: Position) -> Vec<Move> {
    let Some(piece) = board.get(position) else {
        return Vec::new();
    };

    let mut moves = Vec::new();
    for &delta in CATALOG.vectors(piece.kind, piece.color) {
        if piece.kind.is_sliding() {
            // walk the ray until it leaves the board or hits a piece; an
            // enemy occupant is the last included square on the ray
            let mut current = position;
            while let Some((to, flag)) = valid_destination(board, &piece, current, delta) {
                moves.push(Move {
                    from: position,
                    to,
                    flag,
                });
                if board.get(to).is_some() {
                    break;
                }
                current = to;
            }
        } else if let Some((to, flag)) = valid_destination(board, &piece, position, delta) {
            moves.push(Move {
                from: position,
                to,
                flag,
            });
        }
    }
    moves
}

/// Validate a single application of `delta` from `from` for `piece`. Applied
/// uniformly to every candidate square: bounds first, then own-side
/// occupancy, then the pawn and castling special cases.
fn valid_destination(
    board: &Board,
    piece: &Piece,
    from: Position,
    delta: (i8, i8),
) -> Option<(Position, MoveFlag)> {
    let (d_row, d_col) = delta;
    let to = from.offset(d_row, d_col)?;

    let occupant = board.get(to);
    if occupant.is_some_and(|p| p.color == piece.color) {
        return None;
    }

    if piece.kind == PieceKind::Pawn {
        // double-step only as the pawn's first move
        if d_row.abs() == 2 && piece.has_moved {
            return None;
        }
        // diagonal steps are capture-only, straight steps never capture
        if d_col != 0 && occupant.is_none() {
            return None;
        }
        if d_col == 0 && occupant.is_some() {
            return None;
        }
    }

    if piece.kind == PieceKind::King && d_col.abs() == 2 {
        return castling_destination(board, piece, from, d_col).map(|flag| (to, flag));
    }

    Some((to, MoveFlag::Regular))
}

/// Preconditions for the king's +-2 column leap: neither the king nor the
/// matching corner rook has moved, the rook is actually there, and the
/// squares between them are empty. Whether the king's path is attacked is
/// checked later against the opponent's coverage set, because coverage is
/// itself built from pseudo-legal generation and must not recurse into it.
fn castling_destination(
    board: &Board,
    piece: &Piece,
    from: Position,
    d_col: i8,
) -> Option<MoveFlag> {
    if piece.has_moved {
        return None;
    }
    let (rook_col, flag) = if d_col > 0 {
        (7, MoveFlag::CastleKingside)
    } else {
        (0, MoveFlag::CastleQueenside)
    };
    let rook_home = Position::new(from.row, rook_col);
    let rook = board.get(rook_home)?;
    if rook.kind != PieceKind::Rook || rook.color != piece.color || rook.has_moved {
        return None;
    }
    let between = if d_col > 0 { 5..7u8 } else { 1..4u8 };
    for col in between {
        if board.get(Position::new(from.row, col)).is_some() {
            return None;
        }
    }
    Some(flag)
}
