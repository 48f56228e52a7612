use std::iter;

use duelris_engine::{Block, Board, Cell};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::CellDisplay;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling_block: Option<Block>,
    flash_rows: &'a [usize],
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling_block: None,
            flash_rows: &[],
            block: None,
        }
    }

    pub fn falling_block(self, block: Block) -> Self {
        Self {
            falling_block: Some(block),
            ..self
        }
    }

    /// Rows highlighted as just cleared.
    pub fn flash_rows(self, rows: &'a [usize]) -> Self {
        Self {
            flash_rows: rows,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        10 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        20 * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    /// Board cells with the falling block drawn on top.
    fn composed_cells(&self) -> [[Cell; Board::WIDTH]; Board::HEIGHT] {
        let mut cells = [[Cell::Empty; Board::WIDTH]; Board::HEIGHT];
        for (row, board_row) in iter::zip(&mut cells, self.board.rows()) {
            *row = *board_row.cells();
        }
        if let Some(block) = self.falling_block {
            let cell_positions = block.cells().map(|((dx, dy), is_item)| {
                let x = usize::try_from(block.x()).ok()?.checked_add(dx)?;
                let y = usize::try_from(block.y()).ok()?.checked_add(dy)?;
                Some((x, y, is_item))
            });
            for (x, y, is_item) in cell_positions.flatten() {
                if x < Board::WIDTH && y < Board::HEIGHT {
                    cells[y][x] = if is_item {
                        Cell::Item
                    } else {
                        Cell::Block(block.kind())
                    };
                }
            }
        }
        cells
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..Board::WIDTH).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..Board::HEIGHT).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<{ Board::HEIGHT }>(&vertical)
            .into_iter()
            .map(|row| row.layout::<{ Board::WIDTH }>(&horizontal));

        for (y, (grid_row, row)) in iter::zip(grid_cells, self.composed_cells()).enumerate() {
            let flash = self.flash_rows.contains(&y);
            for (grid_cell, cell) in iter::zip(grid_row, row) {
                let display = if flash {
                    CellDisplay::flash()
                } else {
                    CellDisplay::from_cell(cell, true)
                };
                display.render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use duelris_engine::{BlockKind, Rotation};

    use super::*;

    #[test]
    fn test_falling_block_overlays_board() {
        let board = Board::from_ascii(
            "
            ##########
            ",
        );
        let block = Block::at(BlockKind::O, Rotation::default(), 4, 17);
        let cells = BoardDisplay::new(&board).falling_block(block).composed_cells();

        assert_eq!(cells[17][4], Cell::Block(BlockKind::O));
        assert_eq!(cells[18][5], Cell::Block(BlockKind::O));
        assert_eq!(cells[17][3], Cell::Empty);
        assert!(cells[19].iter().all(|cell| cell.is_filled()));
    }

    #[test]
    fn test_cells_outside_board_are_skipped() {
        let block = Block::at(BlockKind::I, Rotation::default(), -2, -1);
        let cells = BoardDisplay::new(&Board::EMPTY)
            .falling_block(block)
            .composed_cells();
        assert!(cells.iter().flatten().all(|cell| cell.is_empty()));
    }
}
