//! Power governor: two-profile CPU clock and cadence control.
//!
//! ```text
//!                 dashboard active  OR  relay engaged
//!   ┌──────────┐ ─────────────────────────────────────▶ ┌─────────────────┐
//!   │ LowPower │                                        │ HighPerformance │
//!   │  80 MHz  │ ◀───────────────────────────────────── │     240 MHz     │
//!   │  500 ms  │   idle >= timeout  AND  relay off      │     100 ms      │
//!   └──────────┘                                        └─────────────────┘
//! ```
//!
//! The decision is recomputed from scratch every cycle; there is no
//! hysteresis band.  Clock changes are edge-triggered: the port is only
//! called when the decided profile differs from the applied one.  The
//! task sleeps for the poll interval of the profile it just decided, so
//! its own cadence follows its output.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::activity::ActivityTracker;
use crate::actuator::ActuatorState;
use crate::app::events::AppEvent;
use crate::app::ports::{CpuClockPort, EventSink, MonotonicClock};
use crate::config::{NodeConfig, ProfileParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerProfile {
    LowPower,
    HighPerformance,
}

/// Pure decision rule.
pub fn decide(dashboard_active: bool, actuator_engaged: bool) -> PowerProfile {
    if dashboard_active || actuator_engaged {
        PowerProfile::HighPerformance
    } else {
        PowerProfile::LowPower
    }
}

/// Parameters for both profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileTable {
    pub high_performance: ProfileParams,
    pub low_power: ProfileParams,
}

impl ProfileTable {
    pub fn from_config(config: &NodeConfig) -> Self {
        Self {
            high_performance: config.high_performance,
            low_power: config.low_power,
        }
    }

    pub fn params(&self, profile: PowerProfile) -> ProfileParams {
        match profile {
            PowerProfile::HighPerformance => self.high_performance,
            PowerProfile::LowPower => self.low_power,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Governor
// ═══════════════════════════════════════════════════════════════

/// Owns the applied profile and the clock port.
pub struct PowerGovernor<K> {
    clock_ctl: K,
    table: ProfileTable,
    applied: PowerProfile,
    transitions: u32,
}

impl<K: CpuClockPort> PowerGovernor<K> {
    /// Starts in LowPower without touching the clock; the first
    /// evaluation applies whatever profile is due.
    pub fn new(clock_ctl: K, table: ProfileTable) -> Self {
        Self {
            clock_ctl,
            table,
            applied: PowerProfile::LowPower,
            transitions: 0,
        }
    }

    /// One evaluation.  Returns the poll interval of the decided profile.
    pub fn evaluate(
        &mut self,
        dashboard_active: bool,
        actuator_engaged: bool,
        sink: &mut impl EventSink,
    ) -> u32 {
        let target = decide(dashboard_active, actuator_engaged);
        let params = self.table.params(target);

        if target != self.applied {
            match self.clock_ctl.set_cpu_frequency_mhz(params.cpu_mhz) {
                Ok(()) => {
                    let from = self.applied;
                    self.applied = target;
                    self.transitions += 1;
                    sink.emit(&AppEvent::PowerTransition {
                        from,
                        to: target,
                        cpu_mhz: params.cpu_mhz,
                        poll_interval_ms: params.poll_interval_ms,
                    });
                }
                Err(e) => {
                    // Left unrecorded so the next cycle retries.
                    warn!("Power: {:?} apply failed ({})", target, e);
                }
            }
        }

        params.poll_interval_ms
    }

    pub fn applied(&self) -> PowerProfile {
        self.applied
    }

    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    pub fn clock_ctl(&self) -> &K {
        &self.clock_ctl
    }
}

// ═══════════════════════════════════════════════════════════════
//  Periodic task
// ═══════════════════════════════════════════════════════════════

/// Samples the tracker and the relay state and feeds the governor.
pub struct PowerTask<K, C, S> {
    governor: PowerGovernor<K>,
    state: Arc<ActuatorState>,
    activity: Arc<ActivityTracker<C>>,
    sink: S,
}

impl<K, C, S> PowerTask<K, C, S>
where
    K: CpuClockPort,
    C: MonotonicClock,
    S: EventSink,
{
    pub fn new(
        governor: PowerGovernor<K>,
        state: Arc<ActuatorState>,
        activity: Arc<ActivityTracker<C>>,
        sink: S,
    ) -> Self {
        Self {
            governor,
            state,
            activity,
            sink,
        }
    }

    /// Steps 1–4 of a cycle.  Returns the sleep before the next one.
    pub fn cycle(&mut self) -> u32 {
        let dashboard_active = self.activity.is_active();
        let actuator_engaged = self.state.read();
        self.governor
            .evaluate(dashboard_active, actuator_engaged, &mut self.sink)
    }

    pub fn run(mut self) {
        info!(
            "Power: governor running (idle timeout {} ms)",
            self.activity.idle_timeout_ms()
        );
        loop {
            let sleep_ms = self.cycle();
            std::thread::sleep(Duration::from_millis(u64::from(sleep_ms)));
        }
    }

    pub fn governor(&self) -> &PowerGovernor<K> {
        &self.governor
    }
}

/// Spawn the governor below the actuation driver.
pub fn spawn<K, C, S>(task: PowerTask<K, C, S>) -> std::io::Result<std::thread::JoinHandle<()>>
where
    K: CpuClockPort + Send + 'static,
    C: MonotonicClock + 'static,
    S: EventSink + Send + 'static,
{
    crate::drivers::task_pin::spawn_on_core(
        crate::drivers::task_pin::Core::App,
        crate::drivers::task_pin::PRIORITY_POWER,
        4,
        "power-gov\0",
        move || task.run(),
    )
}
