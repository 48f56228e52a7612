use std::time::{Duration, Instant};

use crossterm::event::{self, Event};

/// Events delivered to the runner.
#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    Tick,
    Render,
    Terminal(Event),
}

/// Produces tick and render events at fixed intervals, interleaved with terminal input.
///
/// An unset interval never fires. Input marks the screen dirty so it is
/// redrawn on the next render slot even without a tick in between.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    frame_interval: Option<Duration>,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            tick_interval: None,
            frame_interval: None,
            last_tick: now,
            last_render: now,
            dirty: true,
        }
    }
}

impl EventLoop {
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(super) fn set_frame_interval(&mut self, interval: Option<Duration>) {
        self.frame_interval = interval;
    }

    /// Blocks until the next tick or render slot, or until terminal input arrives.
    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= interval
            {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            let render_due = match self.frame_interval {
                Some(interval) => self.dirty && now.duration_since(self.last_render) >= interval,
                None => self.dirty,
            };
            if render_due {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render = self
            .frame_interval
            .filter(|_| self.dirty)
            .map(|interval| self.last_render + interval);
        let next = [next_tick, next_render].into_iter().flatten().min()?;
        Some(next.saturating_duration_since(now))
    }
}
