//! Output drivers, hardware initialisation, and task spawning helpers.

pub mod hw_init;
pub mod output;
pub mod status_led;
pub mod task_pin;
