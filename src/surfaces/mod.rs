//! Command surfaces: every external channel that can read or change the
//! relay.  Both are equally privileged; the state cell's lock is the only
//! ordering between them.

pub mod control;
pub mod serial;

pub use control::{ControlSurface, StatusReport, parse_state};
pub use serial::SerialListener;
