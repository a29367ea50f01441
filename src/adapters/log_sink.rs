//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! One line per event, prefixed with a fixed tag so the console can be
//! grepped by subsystem.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { active } => {
                info!("START | relay={}", on_off(*active));
            }
            AppEvent::ActuatorApplied { active } => {
                info!("RELAY | applied {}", on_off(*active));
            }
            AppEvent::WakeCoalesced { active } => {
                debug!("RELAY | wake coalesced, output already {}", on_off(*active));
            }
            AppEvent::StateRequested { origin, active } => {
                info!("CTRL | {:?} -> {}", origin, on_off(*active));
            }
            AppEvent::ControlRejected { origin, reason } => {
                warn!("CTRL | {:?} rejected: {}", origin, reason);
            }
            AppEvent::PowerTransition {
                from,
                to,
                cpu_mhz,
                poll_interval_ms,
            } => {
                info!(
                    "POWER | {:?} -> {:?} | cpu={}MHz poll={}ms",
                    from, to, cpu_mhz, poll_interval_ms
                );
            }
            AppEvent::NetworkUp(mode) => {
                info!("NET | up as {:?}", mode);
            }
        }
    }
}

fn on_off(active: bool) -> &'static str {
    if active { "ON" } else { "OFF" }
}
