//! CPU frequency adapter.
//!
//! Implements [`CpuClockPort`] via ESP-IDF's power manager. Min and max
//! are pinned to the same value so the frequency is fixed until the next
//! profile change; light sleep stays off so the relay task wakes promptly.
//!
//! Requires `CONFIG_PM_ENABLE` in sdkconfig; without it every apply fails
//! with [`ClockError::Unsupported`] and the governor keeps retrying.

use log::info;

use crate::app::ports::CpuClockPort;
use crate::error::ClockError;

#[derive(Debug, Default)]
pub struct EspCpuClock {
    current_mhz: Option<u32>,
    /// Simulation: frequencies the sim power manager refuses.
    #[cfg(not(target_os = "espidf"))]
    rejected_mhz: Vec<u32>,
}

impl EspCpuClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(target_os = "espidf")]
    fn platform_apply(&mut self, mhz: u32) -> Result<(), ClockError> {
        use esp_idf_svc::sys::*;

        let cfg = esp_pm_config_t {
            max_freq_mhz: mhz as i32,
            min_freq_mhz: mhz as i32,
            light_sleep_enable: false,
        };
        // SAFETY: esp_pm_configure copies the struct before returning.
        let ret = unsafe { esp_pm_configure(core::ptr::from_ref(&cfg).cast()) };
        if ret == ESP_OK as i32 {
            Ok(())
        } else if ret == ESP_ERR_NOT_SUPPORTED as i32 {
            Err(ClockError::Unsupported(ret))
        } else {
            Err(ClockError::Rejected(ret))
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_apply(&mut self, mhz: u32) -> Result<(), ClockError> {
        if self.rejected_mhz.contains(&mhz) {
            return Err(ClockError::Rejected(-1));
        }
        Ok(())
    }

    /// Simulation: make the next applies of `mhz` fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn reject(&mut self, mhz: u32) {
        self.rejected_mhz.push(mhz);
    }

    /// Simulation: accept `mhz` again.
    #[cfg(not(target_os = "espidf"))]
    pub fn accept(&mut self, mhz: u32) {
        self.rejected_mhz.retain(|&m| m != mhz);
    }
}

impl CpuClockPort for EspCpuClock {
    fn set_cpu_frequency_mhz(&mut self, mhz: u32) -> Result<(), ClockError> {
        self.platform_apply(mhz)?;
        self.current_mhz = Some(mhz);
        info!("Clock: CPU at {} MHz", mhz);
        Ok(())
    }

    fn cpu_frequency_mhz(&self) -> Option<u32> {
        self.current_mhz
    }
}
