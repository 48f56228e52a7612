use duelris_engine::GameEngine;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, NextBlockDisplay, PlayerStatsDisplay, color, style};

/// What a player's panel shows on top of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    Playing,
    Paused,
    /// The block could not spawn or was buried by garbage; the battle may still be deciding.
    ToppedOut,
    Won,
    Lost,
}

impl PlayerStatus {
    fn border_color(self) -> Color {
        match self {
            PlayerStatus::Playing => color::WHITE,
            PlayerStatus::Paused => color::YELLOW,
            PlayerStatus::ToppedOut | PlayerStatus::Lost => color::RED,
            PlayerStatus::Won => color::GREEN,
        }
    }

    fn popup(self) -> Option<(&'static str, Style)> {
        match self {
            PlayerStatus::Playing => None,
            PlayerStatus::Paused => Some(("PAUSED", style::PAUSED_BANNER)),
            PlayerStatus::ToppedOut => Some(("GAME OVER", style::LOSE_BANNER)),
            PlayerStatus::Won => Some(("WIN!", style::WIN_BANNER)),
            PlayerStatus::Lost => Some(("LOSE", style::LOSE_BANNER)),
        }
    }
}

/// Board, next block and statistics of one player.
#[derive(Debug)]
pub struct PlayerDisplay<'a> {
    engine: &'a GameEngine,
    title: String,
    status: PlayerStatus,
    flash_rows: &'a [usize],
    horizontal_padding: u16,
}

impl<'a> PlayerDisplay<'a> {
    pub fn new(engine: &'a GameEngine, title: impl Into<String>) -> Self {
        Self {
            engine,
            title: title.into(),
            status: PlayerStatus::Playing,
            flash_rows: &[],
            horizontal_padding: 1,
        }
    }

    pub fn status(self, status: PlayerStatus) -> Self {
        Self { status, ..self }
    }

    pub fn flash_rows(self, rows: &'a [usize]) -> Self {
        Self {
            flash_rows: rows,
            ..self
        }
    }
}

impl Widget for PlayerDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PlayerDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = self.status.border_color();
        let block_padding = Padding::horizontal(self.horizontal_padding);

        let mut game_board = BoardDisplay::new(self.engine.board())
            .flash_rows(self.flash_rows)
            .block(
                Block::bordered()
                    .title(Line::from(self.title.as_str()).centered())
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        if !self.engine.is_game_over() {
            game_board = game_board.falling_block(*self.engine.current_block());
        }
        let next_panel = NextBlockDisplay::new()
            .preview(*self.engine.next_block())
            .block(
                Block::bordered()
                    .title(Line::from("NEXT").centered())
                    .padding(block_padding)
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let stats = PlayerStatsDisplay::new(self.engine).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [board_column, side_column] = Layout::horizontal([
            Constraint::Length(game_board.width()),
            Constraint::Length(u16::max(next_panel.width(), stats.width())),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(board_column);
        let [next_area, stats_area] = Layout::vertical([
            Constraint::Length(next_panel.height()),
            Constraint::Length(stats.height()),
        ])
        .spacing(1)
        .areas(side_column);
        let next_area = next_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(next_panel.width())]).flex(Flex::Start),
        )[0];

        let board_width = game_board.width();
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);
        stats.render(stats_area, buf);

        if let Some((text, style)) = self.status.popup() {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area = board_area.centered(Constraint::Length(board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
