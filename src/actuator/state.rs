//! Shared actuator state cell.
//!
//! One boolean behind a critical-section mutex, plus the wake signal the
//! actuation driver sleeps on.
//!
//! ```text
//!  HTTP control ──┐                         ┌──────────────────┐
//!                 ├─▶ write(v) ─▶ [lock] ──▶│ changed?         │
//!  Serial '0'/'1' ┘               [unlock]  │  yes: signal()   │──▶ driver wakes
//!                                           │  no:  nothing    │
//!                                           └──────────────────┘
//! ```
//!
//! The lock only covers the compare-and-set.  The wake is posted after it
//! is released, so signal delivery can never run while a writer holds
//! anything the driver needs.
//!
//! The signal has a single pending slot: several writes before the driver
//! runs collapse into one wake, and a write that lands while the driver is
//! applying re-arms the slot so the driver makes at least one more pass.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

pub struct ActuatorState {
    active: Mutex<CriticalSectionRawMutex, Cell<bool>>,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for ActuatorState {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorState {
    /// New cell, inactive, no wake pending.
    pub const fn new() -> Self {
        Self {
            active: Mutex::new(Cell::new(false)),
            wake: Signal::new(),
        }
    }

    pub fn read(&self) -> bool {
        self.active.lock(Cell::get)
    }

    /// Store `value`.  Returns `true` (and posts one wake) only if the
    /// stored value changed.
    pub fn write(&self, value: bool) -> bool {
        let changed = self.active.lock(|cell| {
            if cell.get() == value {
                false
            } else {
                cell.set(value);
                true
            }
        });
        if changed {
            self.wake.signal(());
        }
        changed
    }

    /// Park until a wake is pending, consuming it.
    pub async fn wait_wake(&self) {
        self.wake.wait().await;
    }

    /// Consume a pending wake without waiting.
    pub fn take_wake(&self) -> bool {
        self.wake.try_take().is_some()
    }

    pub fn wake_pending(&self) -> bool {
        self.wake.signaled()
    }
}
