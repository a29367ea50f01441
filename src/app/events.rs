//! Outbound application events.
//!
//! The domain emits these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide what to do with them: log to
//! serial today, something else tomorrow.

use crate::adapters::wifi::NetworkMode;
use crate::error::ValidationError;
use crate::power::PowerProfile;

/// Which command surface originated a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Http,
    Serial,
}

/// Structured events emitted by the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The actuation driver drove the output at startup.
    Started { active: bool },

    /// The relay output was physically written.
    ActuatorApplied { active: bool },

    /// A wake arrived but the output already matched the state.
    WakeCoalesced { active: bool },

    /// A surface changed the logical actuator state.
    StateRequested { origin: Origin, active: bool },

    /// A control request was rejected; no state was touched.
    ControlRejected { origin: Origin, reason: ValidationError },

    /// The governor applied a new power profile.
    PowerTransition {
        from: PowerProfile,
        to: PowerProfile,
        cpu_mhz: u32,
        poll_interval_ms: u32,
    },

    /// Network bring-up finished.
    NetworkUp(NetworkMode),
}
