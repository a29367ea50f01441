//! Activity tracker.
//!
//! Every command surface request, read-only status polls included, calls
//! [`ActivityTracker::touch`].  The power governor asks
//! [`ActivityTracker::is_active`] each cycle; a client that keeps polling
//! the dashboard therefore keeps the node in HighPerformance.
//!
//! The timestamp is a `u32` millisecond counter compared with
//! `wrapping_sub`, so it survives the ~49 day rollover as long as the idle
//! timeout is shorter than half of that.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::app::ports::MonotonicClock;

pub struct ActivityTracker<C> {
    clock: C,
    last_activity_ms: AtomicU32,
    idle_timeout_ms: u32,
}

impl<C: MonotonicClock> ActivityTracker<C> {
    /// Boot counts as activity: the tracker starts touched.
    pub fn new(clock: C, idle_timeout_ms: u32) -> Self {
        let now = clock.now_ms();
        Self {
            clock,
            last_activity_ms: AtomicU32::new(now),
            idle_timeout_ms,
        }
    }

    pub fn touch(&self) {
        self.last_activity_ms
            .store(self.clock.now_ms(), Ordering::Relaxed);
    }

    /// `true` while less than the idle timeout has elapsed since the last touch.
    pub fn is_active(&self) -> bool {
        self.idle_for_ms() < self.idle_timeout_ms
    }

    pub fn idle_for_ms(&self) -> u32 {
        let last = self.last_activity_ms.load(Ordering::Relaxed);
        self.clock.now_ms().wrapping_sub(last)
    }

    pub fn idle_timeout_ms(&self) -> u32 {
        self.idle_timeout_ms
    }
}
