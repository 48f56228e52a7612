use duelris_engine::{Block, Cell};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// Preview of a block in its spawn orientation, item cell included.
#[derive(Debug, Default)]
pub struct NextBlockDisplay<'a> {
    next: Option<Block>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> NextBlockDisplay<'a> {
    pub fn new() -> Self {
        Self {
            next: None,
            block: None,
        }
    }

    pub fn preview(self, block: Block) -> Self {
        Self {
            next: Some(block),
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
        4 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for NextBlockDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &NextBlockDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(next) = self.next else {
            return;
        };
        let (width, height) = (next.width(), next.height());
        let block_area = area.centered(
            Constraint::Length(u16::try_from(width).unwrap_or(4) * CellDisplay::width()),
            Constraint::Length(u16::try_from(height).unwrap_or(2) * CellDisplay::height()),
        );

        let horizontal = Layout::horizontal((0..width).map(|_| Constraint::Length(CellDisplay::width())))
            .flex(Flex::Center);
        let vertical = Layout::vertical((0..height).map(|_| Constraint::Length(CellDisplay::height())));
        let grid_rows = block_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal))
            .collect::<Vec<_>>();

        for ((x, y), is_item) in next.cells() {
            let cell = if is_item {
                Cell::Item
            } else {
                Cell::Block(next.kind())
            };
            if let Some(&grid_cell) = grid_rows.get(y).and_then(|row| row.get(x)) {
                CellDisplay::from_cell(cell, false).render(grid_cell, buf);
            }
        }
    }
}
