//! Push-pull GPIO output behind `embedded_hal::digital::OutputPin`.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the level register via `hw_init::gpio_write`.
//! On host/test: tracks the level in-memory only.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

use crate::drivers::hw_init;
use crate::pins;

/// One configured output pin. Owned by exactly one task.
pub struct GpioOutput {
    gpio: i32,
    high: bool,
}

impl GpioOutput {
    /// Wrap a pin already configured by `hw_init` (and therefore low).
    pub fn new(gpio: i32) -> Self {
        Self { gpio, high: false }
    }

    pub fn relay() -> Self {
        Self::new(pins::RELAY_GPIO)
    }

    pub fn status_led() -> Self {
        Self::new(pins::STATUS_LED_GPIO)
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    fn write(&mut self, high: bool) {
        hw_init::gpio_write(self.gpio, high);
        self.high = high;
    }
}

impl ErrorType for GpioOutput {
    type Error = Infallible;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true);
        Ok(())
    }
}

impl StatefulOutputPin for GpioOutput {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}
