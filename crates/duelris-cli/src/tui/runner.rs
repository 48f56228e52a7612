use std::time::Duration;

use crate::tui::{
    App,
    event_loop::{EventLoop, TuiEvent},
};

/// Terminal runtime executing an [`App`].
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
}

impl Tui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of [`App::update`] calls per second.
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.events
            .set_tick_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    /// Caps redraws to `rate` frames per second.
    pub fn set_frame_rate(&mut self, rate: f64) {
        self.events
            .set_frame_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    /// Runs `app` in the alternate screen until [`App::should_exit`] returns true.
    ///
    /// The terminal is restored even when the loop fails.
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => app.update(&mut self),
                    TuiEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                    TuiEvent::Terminal(event) => app.handle_event(&mut self, event),
                }
            }
            Ok(())
        })
    }
}
