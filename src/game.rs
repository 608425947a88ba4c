use chrono::prelude::*;

use crate::board::Board;
use crate::coverage::CoverageTracker;
use crate::movegen::pseudo_legal_moves;
use crate::types::{Color, Move, MoveError, MoveFlag, Position};

/// Turn state machine. There is no "check" state: check is a derived query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    AwaitingMove(Color),
    /// Terminal; carries the winner.
    Checkmate(Color),
}

/// Legal destinations of one piece, keyed by where it stands. Produced per
/// side for the checkmate search and for transmission to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceMoves {
    pub position: Position,
    pub moves: Vec<Move>,
}

/// What a committed move did, for mirroring on the opponent's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub mv: Move,
    /// The rook relocation performed as the second half of castling.
    pub rook_shift: Option<(Position, Position)>,
    /// Whether the opponent is now in check.
    pub check: bool,
    /// Set when the move delivered checkmate.
    pub winner: Option<Color>,
}

/// One match: the board, both players' identities and the cached coverage
/// sets. All operations are synchronous and the struct is not internally
/// synchronized; the session layer must serialize calls per match.
pub struct Game {
    board: Board,
    coverage: CoverageTracker,
    state: GameState,
    white: String,
    black: String,
    started_at: DateTime<Local>,
}

impl Game {
    /// The host plays White, the joining player Black.
    pub fn new(white: String, black: String) -> Self {
        Game::from_board(Board::new(), white, black)
    }

    /// Start a match from an arbitrary position, White to move. Both kings
    /// must be on `board`.
    pub fn from_board(board: Board, white: String, black: String) -> Self {
        let coverage = CoverageTracker::new(&board);
        Self {
            board,
            coverage,
            state: GameState::AwaitingMove(Color::White),
            white,
            black,
            started_at: Local::now(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn coverage(&self) -> &CoverageTracker {
        &self.coverage
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn side_to_move(&self) -> Option<Color> {
        match self.state {
            GameState::AwaitingMove(side) => Some(side),
            GameState::Checkmate(_) => None,
        }
    }

    pub fn player_name(&self, side: Color) -> &str {
        match side {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn side_of(&self, name: &str) -> Option<Color> {
        if name == self.white {
            Some(Color::White)
        } else if name == self.black {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Unconditional relocation plus a full coverage rebuild for both sides.
    /// No legality validation here: this is the shared mutation primitive of
    /// committed moves and legality simulation alike.
    pub fn move_piece(&mut self, from: Position, to: Position) {
        self.board.relocate(from, to);
        self.coverage.recompute(&self.board);
    }

    pub fn is_in_check(&self, side: Color) -> bool {
        let king = self.board.find_king(side);
        self.coverage.covers(side.other_color(), king)
    }

    /// Legal moves of the piece at `position`: pseudo-legal moves minus those
    /// that would leave the mover's own king attacked, and minus castling
    /// attempts out of or through check. Empty for an empty square.
    pub fn legal_moves(&mut self, position: Position) -> Vec<Move> {
        let Some(piece) = self.board.get(position) else {
            return Vec::new();
        };
        let side = piece.color;

        let mut legal = Vec::new();
        for mv in pseudo_legal_moves(&self.board, position) {
            if mv.flag.is_castle() && !self.castle_path_safe(side, &mv) {
                continue;
            }
            if self.causes_self_check(side, mv.from, mv.to) {
                continue;
            }
            legal.push(mv);
        }
        legal
    }

    /// One entry per piece `side` owns, each with its legal destinations.
    pub fn legal_moves_for_side(&mut self, side: Color) -> Vec<PieceMoves> {
        self.board
            .pieces_of(side)
            .into_iter()
            .map(|position| PieceMoves {
                moves: self.legal_moves(position),
                position,
            })
            .collect()
    }

    /// No-legal-move detection. Only meaningful after `is_in_check(side)`
    /// has returned true: a side with no legal moves and no check would also
    /// report true here, so `player_move` guards the call accordingly.
    pub fn is_checkmate(&mut self, side: Color) -> bool {
        let king = self.board.find_king(side);
        if !self.legal_moves(king).is_empty() {
            return false;
        }
        self.legal_moves_for_side(side)
            .iter()
            .all(|piece_moves| piece_moves.moves.is_empty())
    }

    /// Validate and commit a move for the side to move. On any rejection the
    /// game is left untouched.
    pub fn player_move(&mut self, from: Position, to: Position) -> Result<MoveOutcome, MoveError> {
        let side = match self.state {
            GameState::Checkmate(_) => return Err(MoveError::GameAlreadyEnded),
            GameState::AwaitingMove(side) => side,
        };
        let piece = self
            .board
            .get(from)
            .ok_or(MoveError::IllegalMove { from, to })?;
        if piece.color != side {
            return Err(MoveError::IllegalMove { from, to });
        }
        let mv = self
            .legal_moves(from)
            .into_iter()
            .find(|m| m.to == to)
            .ok_or(MoveError::IllegalMove { from, to })?;

        self.move_piece(from, to);
        self.mark_moved(to);

        let rook_shift = match mv.flag {
            MoveFlag::CastleKingside => {
                Some((Position::new(from.row, 7), Position::new(from.row, 5)))
            }
            MoveFlag::CastleQueenside => {
                Some((Position::new(from.row, 0), Position::new(from.row, 3)))
            }
            MoveFlag::Regular => None,
        };
        if let Some((rook_from, rook_to)) = rook_shift {
            self.move_piece(rook_from, rook_to);
            self.mark_moved(rook_to);
        }
        // has_moved flips change pawn double-steps and castling rights, so
        // coverage is rebuilt once more after them
        self.coverage.recompute(&self.board);

        let opponent = side.other_color();
        let check = self.is_in_check(opponent);
        let winner = if check && self.is_checkmate(opponent) {
            Some(side)
        } else {
            None
        };
        self.state = match winner {
            Some(w) => GameState::Checkmate(w),
            None => GameState::AwaitingMove(opponent),
        };

        Ok(MoveOutcome {
            mv,
            rook_shift,
            check,
            winner,
        })
    }

    fn mark_moved(&mut self, pos: Position) {
        if let Some(mut piece) = self.board.get(pos) {
            piece.has_moved = true;
            self.board.set(pos, Some(piece));
        }
    }

    /// Castling may not start from check and the king may not pass through a
    /// covered square. `mv.from` is the king's current square; the transit
    /// square is the one the rook ends up on.
    fn castle_path_safe(&self, side: Color, mv: &Move) -> bool {
        let enemy = side.other_color();
        if self.coverage.covers(enemy, mv.from) {
            return false;
        }
        let transit_col = if mv.to.col > mv.from.col { 5 } else { 3 };
        !self
            .coverage
            .covers(enemy, Position::new(mv.from.row, transit_col))
    }

    /// Simulate `from -> to` and report whether it leaves `side`'s own king
    /// attacked. The undo half runs unconditionally after the query: between
    /// the two relocations the board is in a transient rule-violating state
    /// which nothing else may observe.
    fn causes_self_check(&mut self, side: Color, from: Position, to: Position) -> bool {
        let captured = self.board.get(to);

        self.board.relocate(from, to);
        self.coverage.recompute(&self.board);
        let exposes_king = self.is_in_check(side);

        self.board.relocate(to, from);
        self.board.set(to, captured);
        self.coverage.recompute(&self.board);

        exposes_king
    }
}
