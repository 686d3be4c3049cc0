use std::cell::Cell;
use std::rc::Rc;

/// Source of "now" in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Settable clock shared between a chart and whoever drives it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.set(now);
    }

    pub fn advance(&self, ms: i64) -> i64 {
        let next = self.now.get() + ms;
        self.now.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1_000);
        let handle = clock.clone();

        handle.advance(250);
        assert_eq!(clock.now_ms(), 1_250);
        clock.set(5);
        assert_eq!(handle.now_ms(), 5);
    }
}
