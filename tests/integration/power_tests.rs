//! Power governor tests driven through the periodic task with a manual
//! clock, so idle windows are exact.

use std::sync::Arc;

use hazardnode::activity::ActivityTracker;
use hazardnode::actuator::ActuatorState;
use hazardnode::app::events::AppEvent;
use hazardnode::config::NodeConfig;
use hazardnode::net::{HttpRequest, Router};
use hazardnode::power::{PowerGovernor, PowerProfile, PowerTask, ProfileTable};
use hazardnode::surfaces::ControlSurface;

use crate::mock_hw::{ManualClock, RecordingCpuClock, RecordingSink, StaticInfo};

struct Rig {
    clock: Arc<ManualClock>,
    state: Arc<ActuatorState>,
    activity: Arc<ActivityTracker<Arc<ManualClock>>>,
    cpu: RecordingCpuClock,
    sink: RecordingSink,
    task: PowerTask<RecordingCpuClock, Arc<ManualClock>, RecordingSink>,
}

fn rig(idle_timeout_ms: u32) -> Rig {
    let clock = ManualClock::at(0);
    let state = Arc::new(ActuatorState::new());
    let activity = Arc::new(ActivityTracker::new(clock.clone(), idle_timeout_ms));
    let cpu = RecordingCpuClock::new();
    let sink = RecordingSink::new();
    let governor = PowerGovernor::new(cpu.clone(), ProfileTable::from_config(&NodeConfig::default()));
    let task = PowerTask::new(governor, state.clone(), activity.clone(), sink.clone());
    Rig {
        clock,
        state,
        activity,
        cpu,
        sink,
        task,
    }
}

fn transitions(sink: &RecordingSink) -> usize {
    sink.count(|e| matches!(e, AppEvent::PowerTransition { .. }))
}

#[test]
fn boot_counts_as_activity() {
    let mut r = rig(5);
    assert_eq!(r.task.cycle(), 100);
    assert_eq!(r.task.governor().applied(), PowerProfile::HighPerformance);
    assert_eq!(r.cpu.applied(), vec![240]);
}

#[test]
fn idle_and_off_converges_to_low_power() {
    let mut r = rig(5);
    r.task.cycle();

    r.clock.set(6);
    assert_eq!(r.task.cycle(), 500);
    assert_eq!(r.task.governor().applied(), PowerProfile::LowPower);
    assert_eq!(r.cpu.applied(), vec![240, 80]);
    assert_eq!(
        r.sink.events().last(),
        Some(&AppEvent::PowerTransition {
            from: PowerProfile::HighPerformance,
            to: PowerProfile::LowPower,
            cpu_mhz: 80,
            poll_interval_ms: 500,
        })
    );
}

#[test]
fn idle_boundary_is_exclusive() {
    let mut r = rig(5);
    r.clock.set(4);
    assert!(r.activity.is_active());
    assert_eq!(r.task.cycle(), 100);

    r.clock.set(5);
    assert!(!r.activity.is_active());
    assert_eq!(r.task.cycle(), 500);
}

#[test]
fn engaged_relay_holds_high_performance_while_idle() {
    let mut r = rig(5);
    r.state.write(true);
    r.task.cycle();

    r.clock.set(10_000);
    for _ in 0..20 {
        assert_eq!(r.task.cycle(), 100);
    }
    assert_eq!(transitions(&r.sink), 1);

    r.state.write(false);
    assert_eq!(r.task.cycle(), 500);
    assert_eq!(transitions(&r.sink), 2);
}

#[test]
fn dashboard_request_escalates_on_next_cycle() {
    let mut r = rig(5);
    r.clock.set(100);
    assert_eq!(r.task.cycle(), 500);
    assert_eq!(r.task.governor().applied(), PowerProfile::LowPower);

    let surface = ControlSurface::new(r.state.clone(), r.activity.clone(), StaticInfo::synced());
    let mut router = Router::new(surface, RecordingSink::new());
    router.handle(&HttpRequest::get("/api/status"));

    assert_eq!(r.task.cycle(), 100);
    assert_eq!(r.task.governor().applied(), PowerProfile::HighPerformance);
}

#[test]
fn steady_state_never_reapplies() {
    let mut r = rig(30_000);
    for t in 0..50 {
        r.clock.set(t * 100);
        r.task.cycle();
    }
    assert_eq!(r.cpu.applied(), vec![240]);
    assert_eq!(transitions(&r.sink), 1);
}

#[test]
fn initial_idle_off_needs_no_clock_change() {
    let mut r = rig(5);
    r.clock.set(50);
    assert_eq!(r.task.cycle(), 500);
    assert!(r.cpu.applied().is_empty());
    assert_eq!(transitions(&r.sink), 0);
}
