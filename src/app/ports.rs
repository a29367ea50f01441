//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ domain (state, driver, governor, surfaces)
//! ```
//!
//! Driven adapters (clocks, serial, status info, event sinks) implement these
//! traits.  The domain consumes them via generics, so it never touches
//! hardware directly.  The relay output is the one exception: it uses
//! [`embedded_hal::digital::OutputPin`] directly since that already is the
//! portable boundary for a GPIO.

use std::sync::Arc;

use crate::error::ClockError;

// ───────────────────────────────────────────────────────────────
// Monotonic clock (driven adapter: hardware timer → domain)
// ───────────────────────────────────────────────────────────────

/// Millisecond monotonic time since boot.
///
/// Wraps after ~49 days; consumers compare with `wrapping_sub`.
pub trait MonotonicClock: Send + Sync {
    fn now_ms(&self) -> u32;
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for Arc<T> {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

// ───────────────────────────────────────────────────────────────
// CPU clock port (driven adapter: domain → power manager)
// ───────────────────────────────────────────────────────────────

/// Applies a CPU frequency.
pub trait CpuClockPort {
    fn set_cpu_frequency_mhz(&mut self, mhz: u32) -> Result<(), ClockError>;

    /// Last successfully applied frequency, if any.
    fn cpu_frequency_mhz(&self) -> Option<u32>;
}

// ───────────────────────────────────────────────────────────────
// Serial port (driven adapter: UART → serial command surface)
// ───────────────────────────────────────────────────────────────

/// Non-blocking byte source.
pub trait SerialPort {
    /// Next pending byte, or `None` if nothing is buffered.
    fn read_byte(&mut self) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Node info port (driven adapter: system → status surface)
// ───────────────────────────────────────────────────────────────

/// Wall time text used before time sync completes.
pub const TIME_PLACEHOLDER: &str = "--:--:--";

/// Read-only facts reported by `/api/status`.
pub trait NodeInfoPort: Send + Sync {
    /// Local wall time as `HH:MM:SS`, `None` until time sync succeeds.
    fn local_time(&self) -> Option<heapless::String<16>>;

    /// Seconds since boot.
    fn uptime_secs(&self) -> u64;

    /// Station RSSI in dBm, `None` when not associated.
    fn rssi(&self) -> Option<i8>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from configuration parsing and validation.
#[derive(Debug)]
pub enum ConfigError {
    /// Document failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Corrupted => Self::Config("corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}
