//! Board state after a candidate placement.
//!
//! [`PlacementAnalysis`] locks a block into a copy of the board, clears the
//! completed rows and keeps the resulting [`BoardAnalysis`], so evaluators
//! see both the line clears and the surface that the placement leaves behind.

use duelris_engine::{Block, Board};

use crate::board_analysis::BoardAnalysis;

#[derive(Debug)]
pub struct PlacementAnalysis {
    placement: Block,
    cleared_lines: usize,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    /// Simulates locking `placement` at its own position on `before_placement`.
    ///
    /// # Panics
    ///
    /// Panics if `placement` does not fit the board.
    #[must_use]
    pub fn from_board(before_placement: &Board, placement: Block) -> Self {
        let mut board = before_placement.clone();
        board.lock(&placement, placement.x(), placement.y());
        let cleared_lines = board.clear_full_rows().len();

        Self {
            placement,
            cleared_lines,
            board_analysis: BoardAnalysis::new(board),
        }
    }

    #[must_use]
    pub fn placement(&self) -> &Block {
        &self.placement
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }

    /// Board after the lock and line clear.
    #[must_use]
    pub fn board(&self) -> &Board {
        self.board_analysis.board()
    }
}
