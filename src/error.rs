//! Unified error types for the hazard-node firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! boot path and the task loops uniform.  All variants are `Copy` so they
//! can be passed between tasks and into log records without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A control request was malformed.
    Validation(ValidationError),
    /// A communication subsystem failed.
    Comms(CommsError),
    /// The CPU clock could not be reconfigured.
    Clock(ClockError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "validation: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Clock(e) => write!(f, "clock: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Rejection reasons for a control request.  Never mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The `state` parameter was absent.
    MissingState,
    /// The `state` parameter was present but not a boolean token.
    InvalidState,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingState => write!(f, "missing state parameter"),
            Self::InvalidState => write!(f, "state must be 0 or 1"),
        }
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    WifiJoinFailed,
    AccessPointFailed,
    HttpBindFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::WifiJoinFailed => write!(f, "WiFi join failed"),
            Self::AccessPointFailed => write!(f, "access point start failed"),
            Self::HttpBindFailed => write!(f, "HTTP listener bind failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Clock errors
// ---------------------------------------------------------------------------

/// Failures from [`CpuClockPort`](crate::app::ports::CpuClockPort).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// Dynamic frequency scaling is not compiled into this image.
    Unsupported(i32),
    /// The requested frequency was rejected by the power manager.
    Rejected(i32),
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(rc) => write!(f, "frequency scaling unsupported (rc={rc})"),
            Self::Rejected(rc) => write!(f, "frequency rejected (rc={rc})"),
        }
    }
}

impl From<ClockError> for Error {
    fn from(e: ClockError) -> Self {
        Self::Clock(e)
    }
}
