//! Application core: pure domain contracts, zero I/O.
//!
//! The port traits in [`ports`] and the events in [`events`] are the only
//! things the state cell, actuation driver, power governor and command
//! surfaces know about the outside world, keeping them testable without
//! real peripherals.

pub mod events;
pub mod ports;
