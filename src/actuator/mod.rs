//! Relay actuation: the shared state cell and the task that mirrors it onto
//! the GPIO.

pub mod driver;
pub mod state;

pub use driver::{ActuationDriver, DriverPhase};
pub use state::ActuatorState;
