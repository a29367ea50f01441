//! Node status facts for `/api/status`.
//!
//! Implements [`NodeInfoPort`] on top of [`SystemClock`] and the WiFi
//! driver's station record.

use std::sync::Arc;

use crate::adapters::time::SystemClock;
use crate::app::ports::NodeInfoPort;

pub struct SystemStatus {
    clock: Arc<SystemClock>,
}

impl SystemStatus {
    pub fn new(clock: Arc<SystemClock>) -> Self {
        Self { clock }
    }
}

impl NodeInfoPort for SystemStatus {
    fn local_time(&self) -> Option<heapless::String<16>> {
        self.clock.local_time()
    }

    fn uptime_secs(&self) -> u64 {
        self.clock.uptime_secs()
    }

    fn rssi(&self) -> Option<i8> {
        crate::adapters::wifi::station_rssi()
    }
}
