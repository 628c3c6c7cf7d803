use std::time::{Duration, Instant};

/// Period between recomputations of the current section.
pub const SCROLL_TICK: Duration = Duration::from_millis(250);

/// Coalesces bursts of scroll activity into at most one recomputation per
/// tick period: a single pending flag, latest-wins. Time is passed in by
/// the caller so the schedule is deterministic under test.
#[derive(Debug)]
pub struct ScrollDebouncer {
    scrolled: bool,
    last_tick: Instant,
}

impl ScrollDebouncer {
    pub fn new(now: Instant) -> Self {
        Self {
            scrolled: false,
            last_tick: now,
        }
    }

    /// Record scroll activity. Idempotent; called from every scroll input.
    pub fn notify(&mut self) {
        self.scrolled = true;
    }

    pub fn pending(&self) -> bool {
        self.scrolled
    }

    /// Advance the period boundary when due. Returns true when a full
    /// period has elapsed and scroll activity was pending; the flag is
    /// cleared either way once the boundary advances.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_tick) < SCROLL_TICK {
            return false;
        }
        self.last_tick = now;
        std::mem::take(&mut self.scrolled)
    }

    /// Time remaining until the next boundary, for poll timeouts.
    pub fn until_next_tick(&self, now: Instant) -> Duration {
        SCROLL_TICK.saturating_sub(now.duration_since(self.last_tick))
    }
}
