//! Hazard-node Firmware: Main Entry Point
//!
//! Four tasks share one relay state cell:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  GpioOutput   LogEventSink   EspCpuClock   SystemClock         │
//! │  (relay pin)  (EventSink)    (CpuClock)    (MonotonicClock)    │
//! │  UartSerial   WifiAdapter    SystemStatus  TcpRequestSource    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │   relay-drv (pri 5)   power-gov (pri 4)                        │
//! │        ▲ wake               │ reads state + activity           │
//! │        │                    ▼                                  │
//! │   ActuatorState ◀── serial-cmd (pri 2) ── main: DispatchLoop (2)│
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::EspSntp;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use hazardnode::activity::ActivityTracker;
use hazardnode::actuator::{self, ActuationDriver, ActuatorState};
use hazardnode::adapters::cpu_clock::EspCpuClock;
use hazardnode::adapters::log_sink::LogEventSink;
use hazardnode::adapters::status::SystemStatus;
use hazardnode::adapters::time::SystemClock;
use hazardnode::adapters::uart::UartSerial;
use hazardnode::adapters::wifi::{self, NetworkMode, WifiAdapter, WifiCredentials};
use hazardnode::app::events::AppEvent;
use hazardnode::app::ports::EventSink;
use hazardnode::config::NodeConfig;
use hazardnode::drivers::{hw_init, task_pin};
use hazardnode::drivers::output::GpioOutput;
use hazardnode::drivers::status_led::StatusLed;
use hazardnode::error::Error;
use hazardnode::net::{DispatchLoop, Router, TcpRequestSource};
use hazardnode::power::{self, PowerGovernor, PowerTask, ProfileTable};
use hazardnode::surfaces::{self, ControlSurface, SerialListener};

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Hazard Node v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config + peripherals ───────────────────────────────
    let config = NodeConfig::load();
    info!(
        "Config: idle={}ms hp={}MHz/{}ms lp={}MHz/{}ms",
        config.idle_timeout_ms,
        config.high_performance.cpu_mhz,
        config.high_performance.poll_interval_ms,
        config.low_power.cpu_mhz,
        config.low_power.poll_interval_ms,
    );
    hw_init::init_peripherals()?;

    // ── 3. Shared state ───────────────────────────────────────
    let clock = Arc::new(SystemClock::new());
    let state = Arc::new(ActuatorState::new());
    let activity = Arc::new(ActivityTracker::new(clock.clone(), config.idle_timeout_ms));
    let node_info = Arc::new(SystemStatus::new(clock.clone()));
    let surface = ControlSurface::new(state.clone(), activity.clone(), node_info);

    // ── 4. Relay driver first, so the output is defined before any surface ──
    actuator::driver::spawn(ActuationDriver::new(
        state.clone(),
        GpioOutput::relay(),
        LogEventSink::new(),
    ))?;

    // ── 5. Power governor ─────────────────────────────────────
    let governor = PowerGovernor::new(EspCpuClock::new(), ProfileTable::from_config(&config));
    power::spawn(PowerTask::new(
        governor,
        state.clone(),
        activity.clone(),
        LogEventSink::new(),
    ))?;

    // ── 6. Network ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let esp_wifi = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?;
    let mut wifi_adapter = WifiAdapter::new(BlockingWifi::wrap(esp_wifi, sysloop)?);

    let station = WifiCredentials::station_from_env();
    let access_point = WifiCredentials::access_point_from_env().map_err(Error::from)?;
    let mode = wifi::bring_up(
        &mut wifi_adapter,
        station.as_ref().map_err(|e| *e),
        &access_point,
        config.wifi_join_attempts,
        config.wifi_retry_delay_ms,
    )
    .map_err(Error::from)?;

    let mut net_sink = LogEventSink::new();
    net_sink.emit(&AppEvent::NetworkUp(mode));
    StatusLed::new(GpioOutput::status_led()).show(mode);

    // Held for the life of main; dropping it stops the service.
    let _sntp = if mode == NetworkMode::Station {
        match EspSntp::new_default() {
            Ok(sntp) => Some(sntp),
            Err(e) => {
                warn!("SNTP start failed ({}), time stays unsynced", e);
                None
            }
        }
    } else {
        None
    };

    // ── 7. Serial command surface ─────────────────────────────
    surfaces::serial::spawn(SerialListener::new(
        UartSerial::console(),
        surface.clone(),
        LogEventSink::new(),
        config.serial_poll_interval_ms,
    ))?;

    // ── 8. HTTP dispatch on the main task ─────────────────────
    task_pin::set_current_priority(task_pin::PRIORITY_DISPATCH);
    let source = TcpRequestSource::bind(config.http_port, config.request_timeout_ms)
        .map_err(Error::from)?;
    let router = Router::new(surface, LogEventSink::new());
    DispatchLoop::new(source, router, config.dispatch_yield_ms).run();

    Ok(())
}
