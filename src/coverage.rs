use std::collections::HashSet;

use crate::board::Board;
use crate::movegen::pseudo_legal_moves;
use crate::types::{Color, Position};

/// Per-side sets of covered squares: everything reachable by pseudo-legal
/// generation from the board's current physical state. Used only to answer
/// king-safety queries, so it deliberately counts squares a piece could not
/// legally move to (a pinned piece still covers its targets).
///
/// This is a derived cache. Every board mutation, including the throwaway
/// ones in legality simulation, must be followed by `recompute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageTracker {
    sets: [HashSet<Position>; 2],
}

impl CoverageTracker {
    pub fn new(board: &Board) -> Self {
        let mut tracker = Self {
            sets: [HashSet::new(), HashSet::new()],
        };
        tracker.recompute(board);
        tracker
    }

    /// Rebuild both sides' sets from scratch.
    pub fn recompute(&mut self, board: &Board) {
        for side in [Color::White, Color::Black] {
            self.sets[side.index()] = board
                .pieces_of(side)
                .into_iter()
                .flat_map(|pos| pseudo_legal_moves(board, pos))
                .map(|m| m.to)
                .collect();
        }
    }

    pub fn covers(&self, side: Color, square: Position) -> bool {
        self.sets[side.index()].contains(&square)
    }

    pub fn squares_of(&self, side: Color) -> &HashSet<Position> {
        &self.sets[side.index()]
    }
}
