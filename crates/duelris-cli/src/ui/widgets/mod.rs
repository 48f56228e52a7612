use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_display::*, next_block_display::*, player_display::*,
    player_stats_display::*,
};

mod board_display;
mod cell_display;
mod next_block_display;
mod player_display;
mod player_stats_display;

mod color {
    use duelris_engine::BlockKind;
    use ratatui::style::Color;

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(80, 80, 80);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    pub const fn block(kind: BlockKind) -> Color {
        match kind {
            BlockKind::I => Color::Rgb(0, 255, 255),
            BlockKind::O => YELLOW,
            BlockKind::S => GREEN,
            BlockKind::Z => RED,
            BlockKind::J => Color::Rgb(0, 0, 255),
            BlockKind::L => Color::Rgb(255, 127, 0),
            BlockKind::T => Color::Rgb(255, 0, 255),
        }
    }
}

pub mod style {
    use duelris_engine::BlockKind;
    use ratatui::style::{Color, Modifier, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn solid(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = solid(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const GARBAGE: Style = solid(color::DARK_GRAY);
    pub const ITEM: Style = fg_bg(color::BLACK, color::WHITE).add_modifier(Modifier::BOLD);
    /// Rows cleared in the last few hundred milliseconds.
    pub const FLASH: Style = solid(color::WHITE);
    pub const DOUBLE_SCORE: Style = fg_bg(color::YELLOW, color::BLACK).add_modifier(Modifier::BOLD);

    pub const PAUSED_BANNER: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const WIN_BANNER: Style = fg_bg(color::BLACK, color::GREEN);
    pub const LOSE_BANNER: Style = fg_bg(color::WHITE, color::RED);

    pub const fn block(kind: BlockKind) -> Style {
        solid(color::block(kind))
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
