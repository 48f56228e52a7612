use std::{cell::OnceCell, iter};

use duelris_engine::Board;

/// Lazily computed surface metrics of a board.
///
/// Each metric is computed on first access and cached, so evaluators only
/// pay for the metrics they read.
#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    column_heights: OnceCell<[u8; Board::WIDTH]>,
    column_occupied_cells: OnceCell<[u8; Board::WIDTH]>,
    max_height: OnceCell<u8>,
    total_height: OnceCell<u32>,
    num_holes: OnceCell<u32>,
    surface_bumpiness: OnceCell<u32>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        Self::new(board.clone())
    }

    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            max_height: OnceCell::new(),
            total_height: OnceCell::new(),
            num_holes: OnceCell::new(),
            surface_bumpiness: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Height of each column measured from the floor to its topmost filled cell.
    #[must_use]
    pub fn column_heights(&self) -> &[u8; Board::WIDTH] {
        self.column_heights.get_or_init(|| {
            let mut column_heights = [0; Board::WIDTH];
            for (x, h) in iter::zip(Board::X_RANGE, &mut column_heights) {
                *h = u8::try_from(self.board.column_height(x)).unwrap_or(u8::MAX);
            }
            column_heights
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[u8; Board::WIDTH] {
        self.column_occupied_cells.get_or_init(|| {
            let mut column_occupied_cells = [0; Board::WIDTH];
            for row in self.board.rows() {
                for (cell, o) in iter::zip(row.cells(), &mut column_occupied_cells) {
                    if cell.is_filled() {
                        *o += 1;
                    }
                }
            }
            column_occupied_cells
        })
    }

    #[must_use]
    pub fn max_height(&self) -> u8 {
        *self
            .max_height
            .get_or_init(|| self.column_heights().iter().copied().max().unwrap_or(0))
    }

    /// Sum of all column heights (aggregate height).
    #[must_use]
    pub fn total_height(&self) -> u32 {
        *self
            .total_height
            .get_or_init(|| self.column_heights().iter().copied().map(u32::from).sum())
    }

    /// Empty cells with at least one filled cell above them in the same column.
    #[must_use]
    pub fn num_holes(&self) -> u32 {
        *self.num_holes.get_or_init(|| {
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .map(|(h, occ)| u32::from(h - occ))
                .sum()
        })
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn surface_bumpiness(&self) -> u32 {
        *self.surface_bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| {
                    let left = i32::from(w[0]);
                    let right = i32::from(w[1]);
                    (right - left).unsigned_abs()
                })
                .sum()
        })
    }
}
