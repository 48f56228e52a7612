use std::time::Duration;

/// A repeating deadline driven by an external clock.
///
/// The timer never fires on its own: the owner asks for
/// [`deadline`](Self::deadline) and calls [`fire`](Self::fire) once the clock
/// has reached it. Stopping clears the deadline, so nothing is due afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    interval: Duration,
    deadline: Option<Duration>,
}

impl IntervalTimer {
    /// Creates a stopped timer.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        assert!(!interval.is_zero(), "timer interval must be positive");
        Self {
            interval,
            deadline: None,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// (Re)starts the timer so it is next due one full interval after `now`.
    pub fn start(&mut self, now: Duration) {
        self.deadline = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns the deadline if it has been reached at `now`.
    #[must_use]
    pub fn due(&self, now: Duration) -> Option<Duration> {
        self.deadline.filter(|deadline| *deadline <= now)
    }

    /// Consumes one firing and schedules the next one an interval later.
    pub fn fire(&mut self) {
        if let Some(deadline) = &mut self.deadline {
            *deadline += self.interval;
        }
    }
}
