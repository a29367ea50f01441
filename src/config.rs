//! System configuration parameters
//!
//! All tunable parameters for the hazard node.  Nothing is persisted; a
//! build may bake a JSON override in through `HAZARD_NODE_CONFIG`.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Clock and cadence bundle for one power profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileParams {
    /// CPU frequency in MHz.
    pub cpu_mhz: u32,
    /// Power governor poll interval in milliseconds.
    pub poll_interval_ms: u32,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Power ---
    /// Window after the last request during which the node stays in
    /// HighPerformance.
    pub idle_timeout_ms: u32,
    pub high_performance: ProfileParams,
    pub low_power: ProfileParams,

    // --- Command surfaces ---
    /// Serial listener poll period (milliseconds)
    pub serial_poll_interval_ms: u32,
    /// Dispatch loop yield between requests (milliseconds)
    pub dispatch_yield_ms: u32,
    /// Per-connection read timeout (milliseconds)
    pub request_timeout_ms: u32,
    pub http_port: u16,

    // --- Connectivity ---
    /// Station join attempts before falling back to AP-only.
    pub wifi_join_attempts: u8,
    pub wifi_retry_delay_ms: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 30_000,
            high_performance: ProfileParams {
                cpu_mhz: 240,
                poll_interval_ms: 100,
            },
            low_power: ProfileParams {
                cpu_mhz: 80,
                poll_interval_ms: 500,
            },

            serial_poll_interval_ms: 100,
            dispatch_yield_ms: 2,
            request_timeout_ms: 2_000,
            http_port: 80,

            wifi_join_attempts: 20,
            wifi_retry_delay_ms: 500,
        }
    }
}

impl NodeConfig {
    /// Range-check every field.  Rejects, never clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("idle_timeout_ms must be > 0"));
        }
        if self.high_performance.poll_interval_ms == 0 || self.low_power.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll intervals must be > 0"));
        }
        if self.low_power.cpu_mhz == 0 || self.low_power.cpu_mhz >= self.high_performance.cpu_mhz {
            return Err(ConfigError::ValidationFailed(
                "low_power.cpu_mhz must be > 0 and below high_performance.cpu_mhz",
            ));
        }
        if self.low_power.poll_interval_ms <= self.high_performance.poll_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "low_power.poll_interval_ms must exceed high_performance.poll_interval_ms",
            ));
        }
        if self.serial_poll_interval_ms == 0
            || self.dispatch_yield_ms == 0
            || self.request_timeout_ms == 0
        {
            return Err(ConfigError::ValidationFailed("task periods must be > 0"));
        }
        if self.wifi_join_attempts == 0 {
            return Err(ConfigError::ValidationFailed("wifi_join_attempts must be > 0"));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build-time override if present and valid, defaults otherwise.
    pub fn load() -> Self {
        match option_env!("HAZARD_NODE_CONFIG") {
            Some(json) => Self::from_json(json).unwrap_or_else(|e| {
                warn!("HAZARD_NODE_CONFIG rejected ({}), using defaults", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}
