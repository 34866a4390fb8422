//! Leading-edge debounce for user-triggered navigation.
//!
//! The first call in a burst goes through. Every call, accepted or not,
//! restarts the quiet window, so a burst of taps only navigates once.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::scheduler::Clock;

pub struct Debounce {
    clock: Rc<dyn Clock>,
    window: Duration,
    last_attempt: Cell<Option<Instant>>,
}

impl Debounce {
    pub fn new(clock: Rc<dyn Clock>, window: Duration) -> Self {
        Self {
            clock,
            window,
            last_attempt: Cell::new(None),
        }
    }

    /// Records an attempt and returns whether it may proceed.
    pub fn attempt(&self) -> bool {
        let now = self.clock.now();
        let previous = self.last_attempt.replace(Some(now));
        match previous {
            Some(last) => now.duration_since(last) >= self.window,
            None => true,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
