//! Minimal terminal runtime: a tick/render/input event loop driving an [`App`].

use crossterm::event::Event;
use ratatui::Frame;

pub use self::runner::Tui;

mod event_loop;
mod runner;

/// Application driven by [`Tui::run`].
pub trait App {
    /// Called once before the first event. Configure tick and frame rates here.
    fn init(&mut self, tui: &mut Tui);

    fn should_exit(&self) -> bool;

    /// Handles key input, resize and other terminal events.
    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances application state (called on each tick).
    fn update(&mut self, tui: &mut Tui);
}
