//! Core-pinned thread spawning for ESP32 dual-core.
//!
//! Wraps `esp_pthread_set_cfg()` so that `std::thread::spawn` creates a
//! FreeRTOS task pinned to a specific CPU core with explicit priority
//! and stack size. On non-ESP targets, falls back to plain thread spawn.
//!
//! # ESP-IDF Threading Model
//!
//! ESP-IDF implements `std::thread` via pthreads, which are thin wrappers
//! around FreeRTOS tasks. `esp_pthread_set_cfg()` sets thread-local
//! configuration that applies to the *next* `pthread_create()` call from
//! the calling thread. The config→spawn pair must not be interleaved with
//! other thread creation on the same thread.
//!
//! # Priorities
//!
//! | Task          | Priority | Core |
//! |---------------|----------|------|
//! | relay driver  | 5        | App  |
//! | power governor| 4        | App  |
//! | serial surface| 2        | Pro  |
//! | dispatch loop | 2        | main |

use std::io;
use std::thread::JoinHandle;

/// Actuation driver: preempts everything else in the application.
pub const PRIORITY_ACTUATION: u8 = 5;
/// Power governor: below the driver, above the command surfaces.
pub const PRIORITY_POWER: u8 = 4;
/// Serial listener and other command surfaces.
pub const PRIORITY_SURFACE: u8 = 2;
/// HTTP dispatch loop, run on the main task once boot finishes.
pub const PRIORITY_DISPATCH: u8 = PRIORITY_SURFACE;

/// CPU core identifiers for the ESP32 Xtensa dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU): protocol stacks (WiFi, lwIP).
    Pro = 0,
    /// Core 1 (APP_CPU): relay and power logic.
    App = 1,
}

/// Spawn a thread pinned to a specific core with explicit priority and stack.
///
/// The `name` parameter must be a null-terminated string (e.g. `"relay-drv\0"`).
#[cfg(target_os = "espidf")]
pub fn spawn_on_core(
    core: Core,
    priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = core as i32;
        cfg.prio = i32::from(priority);
        cfg.stack_size = (stack_kb * 1024) as i32;
        cfg.thread_name = name.as_ptr() as *const _;
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
    }

    let display_name = name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        display_name,
        core,
        priority,
        stack_kb
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .spawn(f)
}

/// Simulation fallback: ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_on_core(
    _core: Core,
    _priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    let display_name = name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' (sim, no core pinning, stack={}KB)",
        display_name,
        stack_kb
    );

    // Host test harness threads need more headroom than FreeRTOS tasks.
    std::thread::Builder::new()
        .name(display_name.into())
        .stack_size(stack_kb.max(64) * 1024)
        .spawn(f)
}

/// Re-prioritise the calling task.
#[cfg(target_os = "espidf")]
pub fn set_current_priority(priority: u8) {
    // Null handle targets the calling task.
    unsafe { esp_idf_sys::vTaskPrioritySet(core::ptr::null_mut(), u32::from(priority)) };
    log::info!("Main task priority set to {}", priority);
}

/// Simulation fallback: host threads have no settable priority.
#[cfg(not(target_os = "espidf"))]
pub fn set_current_priority(priority: u8) {
    log::debug!("Main task priority {} ignored (sim)", priority);
}
