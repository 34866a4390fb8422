//! # Frames and Time
//!
//! Everything runs on the UI thread. The only suspension points are "after
//! the next animation frame" and "after some time has passed", and both are
//! explicit here so that hosts and tests drive them deterministically.
//!
//! - `FrameScheduler`: callbacks queued for the next frame, flushed by the
//!   host once per vsync via `run_frame()`.
//! - `Clock`: monotonic time source, used by debouncing.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::debug;

type FrameCallback = Box<dyn FnOnce()>;

#[derive(Clone, Default)]
pub struct FrameScheduler {
    queue: Rc<RefCell<Vec<FrameCallback>>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `callback` when the host flushes the next frame.
    pub fn request_frame(&self, callback: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push(Box::new(callback));
    }

    /// Runs every callback queued before this call. Callbacks queued while
    /// running wait for the following frame. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        let count = due.len();
        for callback in due {
            callback();
        }
        if count > 0 {
            debug!("Ran {count} frame callbacks");
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

pub trait Clock {
    fn now(&self) -> Instant;
}

/// The wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
pub struct ManualClock {
    start: Instant,
    offset: Cell<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.offset.get()
    }
}
