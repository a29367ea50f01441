//! Actuation driver: the only writer of the relay GPIO.
//!
//! ```text
//!            start()                 wake
//!   ─────▶ [drive to state] ─▶ Dormant ───▶ Applying
//!                                 ▲            │ re-read state,
//!                                 └────────────┘ write pin if it differs
//! ```
//!
//! While dormant the task is parked inside `block_on`; it holds no timer
//! and takes no time slice.  `Applying` re-reads the state instead of
//! trusting whatever value caused the wake, so a burst of toggles that
//! collapsed into one wake still ends with the pin on the latest value.

use std::sync::Arc;

use embedded_hal::digital::OutputPin;
use log::{debug, warn};

use super::state::ActuatorState;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    Dormant,
    Applying,
}

pub struct ActuationDriver<P, S> {
    state: Arc<ActuatorState>,
    pin: P,
    sink: S,
    phase: DriverPhase,
    /// Level last written to the pin; `None` before `start`.
    applied: Option<bool>,
    applications: u32,
}

impl<P: OutputPin, S: EventSink> ActuationDriver<P, S> {
    pub fn new(state: Arc<ActuatorState>, pin: P, sink: S) -> Self {
        Self {
            state,
            pin,
            sink,
            phase: DriverPhase::Dormant,
            applied: None,
            applications: 0,
        }
    }

    /// Drive the pin to the current state.  Any wake already pending stays
    /// pending and is handled by the first pass of [`run`](Self::run).
    pub fn start(&mut self) {
        let active = self.state.read();
        self.drive(active);
        self.sink.emit(&AppEvent::Started { active });
    }

    /// One `Applying` pass.  Returns `true` if the pin was written.
    pub fn apply(&mut self) -> bool {
        self.phase = DriverPhase::Applying;
        let active = self.state.read();
        let written = if self.applied == Some(active) {
            debug!("Relay: wake coalesced, output already {}", level(active));
            self.sink.emit(&AppEvent::WakeCoalesced { active });
            false
        } else {
            self.drive(active);
            self.sink.emit(&AppEvent::ActuatorApplied { active });
            true
        };
        self.phase = DriverPhase::Dormant;
        written
    }

    /// Consume a pending wake, if any, and apply it.  Never blocks.
    pub fn poll_once(&mut self) -> bool {
        self.state.take_wake() && self.apply()
    }

    /// Task body: park until woken, apply, repeat.
    pub async fn run(mut self) {
        loop {
            self.state.wait_wake().await;
            self.apply();
        }
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    pub fn applied(&self) -> Option<bool> {
        self.applied
    }

    /// Number of physical writes since construction (startup included).
    pub fn applications(&self) -> u32 {
        self.applications
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }

    fn drive(&mut self, active: bool) {
        let result = if active {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if let Err(e) = result {
            warn!("Relay: GPIO write failed ({:?})", e);
        }
        self.applied = Some(active);
        self.applications += 1;
    }
}

fn level(active: bool) -> &'static str {
    if active { "HIGH" } else { "LOW" }
}

// ── Thread spawn ─────────────────────────────────────────────

/// Spawn the driver as the highest-priority task.
///
/// Performs the startup write on the calling thread so the relay matches
/// the state before any command surface is up.
pub fn spawn<P, S>(mut driver: ActuationDriver<P, S>) -> std::io::Result<std::thread::JoinHandle<()>>
where
    P: OutputPin + Send + 'static,
    S: EventSink + Send + 'static,
{
    driver.start();
    crate::drivers::task_pin::spawn_on_core(
        crate::drivers::task_pin::Core::App,
        crate::drivers::task_pin::PRIORITY_ACTUATION,
        4,
        "relay-drv\0",
        move || futures_lite::future::block_on(driver.run()),
    )
}
