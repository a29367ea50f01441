//! Connectivity status LED.
//!
//! Lit while joined to the configured network as a station; dark in
//! access-point fallback. Purely informational, never read by core logic.

use embedded_hal::digital::{OutputPin, PinState};

use crate::adapters::wifi::NetworkMode;

pub struct StatusLed<P> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, lit: false }
    }

    pub fn show(&mut self, mode: NetworkMode) {
        let lit = mode == NetworkMode::Station;
        if self.pin.set_state(PinState::from(lit)).is_err() {
            log::warn!("LED: status write failed");
            return;
        }
        self.lit = lit;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
