//! GPIO / peripheral pin assignments for the hazard-node board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Relay (hazard actuator)
// ---------------------------------------------------------------------------

/// Digital output driving the relay coil transistor. HIGH = active.
pub const RELAY_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Status indicator
// ---------------------------------------------------------------------------

/// Connectivity LED. HIGH = joined to the configured network as a station.
pub const STATUS_LED_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Serial console (command surface)
// ---------------------------------------------------------------------------

/// UART port shared with the boot console.
pub const CONSOLE_UART: i32 = 0;
/// Console baud rate. Matches the bootloader so one monitor session covers both.
pub const CONSOLE_BAUD: u32 = 115_200;
/// RX ring buffer for the UART driver. Must exceed the hardware FIFO (128 B).
pub const CONSOLE_RX_BUFFER: i32 = 256;

/// All push-pull outputs, driven low during `hw_init`.
pub const OUTPUT_PINS: [i32; 2] = [RELAY_GPIO, STATUS_LED_GPIO];
