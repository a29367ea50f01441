//! Console UART adapter for the serial command surface.
//!
//! - **`target_os = "espidf"`**: non-blocking `uart_read_bytes` on the
//!   driver installed by `hw_init`.
//! - **all other targets**: an in-memory receive queue fed by tests.

#[cfg(not(target_os = "espidf"))]
use std::collections::VecDeque;

use crate::app::ports::SerialPort;

pub struct UartSerial {
    #[cfg(target_os = "espidf")]
    port: i32,
    #[cfg(not(target_os = "espidf"))]
    rx: VecDeque<u8>,
}

impl UartSerial {
    #[cfg(target_os = "espidf")]
    pub fn console() -> Self {
        Self {
            port: crate::pins::CONSOLE_UART,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn console() -> Self {
        Self { rx: VecDeque::new() }
    }

    /// Simulation: queue bytes as if they arrived on the wire.
    #[cfg(not(target_os = "espidf"))]
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }
}

impl SerialPort for UartSerial {
    #[cfg(target_os = "espidf")]
    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = 0u8;
        // SAFETY: the driver was installed in hw_init; zero ticks means the
        // call returns immediately with whatever is buffered.
        let n = unsafe {
            esp_idf_svc::sys::uart_read_bytes(
                self.port,
                core::ptr::from_mut(&mut byte).cast(),
                1,
                0,
            )
        };
        (n == 1).then_some(byte)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}
