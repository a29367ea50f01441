//! Serial command surface.
//!
//! Single-byte protocol: `'1'` switches the relay on, `'0'` switches it
//! off.  Line endings and every other byte are dropped without a word.
//! Polled at a fixed low rate; each poll drains whatever is buffered.

use std::time::Duration;

use log::info;

use super::control::ControlSurface;
use crate::app::events::Origin;
use crate::app::ports::{EventSink, MonotonicClock, NodeInfoPort, SerialPort};

/// Map one byte to a requested relay state.
pub fn decode(byte: u8) -> Option<bool> {
    match byte {
        b'1' => Some(true),
        b'0' => Some(false),
        _ => None,
    }
}

pub struct SerialListener<P, C, I, S> {
    port: P,
    surface: ControlSurface<C, I>,
    sink: S,
    poll_interval: Duration,
}

impl<P, C, I, S> SerialListener<P, C, I, S>
where
    P: SerialPort,
    C: MonotonicClock,
    I: NodeInfoPort,
    S: EventSink,
{
    pub fn new(port: P, surface: ControlSurface<C, I>, sink: S, poll_interval_ms: u32) -> Self {
        Self {
            port,
            surface,
            sink,
            poll_interval: Duration::from_millis(u64::from(poll_interval_ms)),
        }
    }

    /// Drain the port.  Returns the number of commands acted on.
    pub fn poll_once(&mut self) -> usize {
        let mut handled = 0;
        while let Some(byte) = self.port.read_byte() {
            if let Some(requested) = decode(byte) {
                self.surface.control(requested, Origin::Serial, &mut self.sink);
                handled += 1;
            }
        }
        handled
    }

    pub fn run(mut self) {
        info!("Serial: listening ('1' = on, '0' = off)");
        loop {
            self.poll_once();
            std::thread::sleep(self.poll_interval);
        }
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }
}

/// Spawn the listener at command-surface priority.
pub fn spawn<P, C, I, S>(
    listener: SerialListener<P, C, I, S>,
) -> std::io::Result<std::thread::JoinHandle<()>>
where
    P: SerialPort + Send + 'static,
    C: MonotonicClock + 'static,
    I: NodeInfoPort + 'static,
    S: EventSink + Send + 'static,
{
    crate::drivers::task_pin::spawn_on_core(
        crate::drivers::task_pin::Core::Pro,
        crate::drivers::task_pin::PRIORITY_SURFACE,
        4,
        "serial-cmd\0",
        move || listener.run(),
    )
}
