use std::ops::Range;

use super::{
    block::{Block, BlockKind},
    garbage::GarbageBatch,
};

const WIDTH: usize = 10;
const HEIGHT: usize = 20;

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Locked cell of a regular block.
    Block(BlockKind),
    /// Locked item cell; clearing its row triggers the item effect.
    Item,
    /// Cell of a garbage row received from the opponent.
    Garbage,
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_filled(self) -> bool {
        !self.is_empty()
    }
}

/// A single row of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardRow {
    cells: [Cell; WIDTH],
}

impl BoardRow {
    pub const EMPTY: Self = Self {
        cells: [Cell::Empty; WIDTH],
    };

    /// A garbage row with a single empty cell at `gap`.
    fn garbage(gap: usize) -> Self {
        let mut row = Self {
            cells: [Cell::Garbage; WIDTH],
        };
        row.cells[gap] = Cell::Empty;
        row
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell; WIDTH] {
        &self.cells
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|c| c.is_filled())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    #[must_use]
    pub fn contains_item(&self) -> bool {
        self.cells.contains(&Cell::Item)
    }
}

/// The fixed-size playing field of one player.
///
/// The grid is [`Board::WIDTH`] columns by [`Board::HEIGHT`] rows with row 0
/// at the top. Cells change only through [`lock`](Self::lock),
/// [`clear_full_rows`](Self::clear_full_rows) and
/// [`insert_garbage_rows`](Self::insert_garbage_rows); every other method is
/// a pure query, so the AI and the rotation system can try placements on a
/// shared reference.
///
/// # Example
///
/// ```
/// use duelris_engine::{Block, BlockKind, Board};
///
/// let mut board = Board::EMPTY;
/// let block = Block::new(BlockKind::I).dropped(&board);
/// assert!(board.can_place(block.x(), block.y(), &block));
///
/// board.lock(&block, block.x(), block.y());
/// assert_eq!(board.column_height(0), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = WIDTH;
    pub const HEIGHT: usize = HEIGHT;
    pub const X_RANGE: Range<usize> = 0..WIDTH;

    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; HEIGHT],
    };

    #[must_use]
    pub fn row(&self, y: usize) -> &BoardRow {
        &self.rows[y]
    }

    /// Returns an iterator over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y].cells[x]
    }

    /// Returns whether `(x, y)` is filled or outside the grid.
    #[must_use]
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) if x < WIDTH && y < HEIGHT => self.rows[y].cells[x].is_filled(),
            _ => true,
        }
    }

    /// Checks whether `block`'s shape fits with its bounding box at `(x, y)`.
    ///
    /// The block's own position is ignored, which lets callers test
    /// arbitrary offsets without constructing moved blocks.
    #[must_use]
    pub fn can_place(&self, x: i32, y: i32, block: &Block) -> bool {
        block.board_cells().all(|(cx, cy)| {
            !self.is_blocked(cx - block.x() + x, cy - block.y() + y)
        })
    }

    /// Checks whether `block` fits at its own position.
    #[must_use]
    pub fn fits(&self, block: &Block) -> bool {
        self.can_place(block.x(), block.y(), block)
    }

    /// Writes the block's cells into the grid with its bounding box at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the placement is not valid according to [`Self::can_place`].
    pub fn lock(&mut self, block: &Block, x: i32, y: i32) {
        assert!(
            self.can_place(x, y, block),
            "locking {:?} at ({x}, {y}) overlaps the stack or leaves the board",
            block.kind()
        );
        let placed = block.moved(x - block.x(), y - block.y());
        for ((cx, cy), (_, is_item)) in placed.board_cells().zip(block.cells()) {
            let cx = usize::try_from(cx).expect("column checked by can_place");
            let cy = usize::try_from(cy).expect("row checked by can_place");
            self.rows[cy].cells[cx] = if is_item {
                Cell::Item
            } else {
                Cell::Block(block.kind())
            };
        }
    }

    /// Removes every full row and lets the rows above fall into place.
    ///
    /// Returns the indices of the removed rows in top-to-bottom order, as
    /// they were numbered before the collapse.
    pub fn clear_full_rows(&mut self) -> Vec<usize> {
        let cleared: Vec<usize> = (0..HEIGHT).filter(|&y| self.rows[y].is_filled()).collect();
        if cleared.is_empty() {
            return cleared;
        }

        let mut count = 0;
        for y in (0..HEIGHT).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BoardRow::EMPTY);
        cleared
    }

    /// Pushes the stack up and fills the bottom rows with garbage.
    ///
    /// Rows pushed past the top are discarded. The batch's first gap becomes
    /// the upper of the inserted rows.
    ///
    /// # Panics
    ///
    /// Panics if the batch is taller than the board.
    pub fn insert_garbage_rows(&mut self, batch: &GarbageBatch) {
        let count = batch.len();
        assert!(
            count <= HEIGHT,
            "garbage batch of {count} rows exceeds board height {HEIGHT}"
        );
        if count == 0 {
            return;
        }
        self.rows.copy_within(count.., 0);
        for (row, &gap) in self.rows[HEIGHT - count..].iter_mut().zip(batch.gaps()) {
            *row = BoardRow::garbage(gap);
        }
    }

    /// Height of column `x` measured from the floor (0 for an empty column).
    #[must_use]
    pub fn column_height(&self, x: usize) -> usize {
        self.rows
            .iter()
            .position(|row| row.cells[x].is_filled())
            .map_or(0, |top| HEIGHT - top)
    }

    /// Creates a board from ASCII art for testing.
    ///
    /// `#` is a block cell, `*` an item cell, `G` garbage and `.` empty.
    /// Rows are given top to bottom and aligned to the floor, so the last
    /// line of the art is row 19.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= HEIGHT,
            "at most {HEIGHT} rows are allowed, got {}",
            lines.len()
        );

        let top = HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<Cell> = line
                .chars()
                .filter_map(|ch| match ch {
                    '.' => Some(Cell::Empty),
                    '#' => Some(Cell::Block(BlockKind::I)),
                    '*' => Some(Cell::Item),
                    'G' => Some(Cell::Garbage),
                    _ => None,
                })
                .collect();
            assert_eq!(
                cells.len(),
                WIDTH,
                "Each row must have exactly {WIDTH} cells, got {} at row {i}",
                cells.len(),
            );
            board.rows[top + i].cells.copy_from_slice(&cells);
        }
        board
    }
}
