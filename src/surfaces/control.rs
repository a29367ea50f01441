//! Network control/status surface.
//!
//! Transport-agnostic: the HTTP router parses the request and calls in
//! here.  Every call touches the activity tracker first, whether it reads,
//! writes, or gets rejected.

use std::sync::Arc;

use log::info;
use serde::Serialize;

use crate::activity::ActivityTracker;
use crate::actuator::ActuatorState;
use crate::app::events::{AppEvent, Origin};
use crate::app::ports::{EventSink, MonotonicClock, NodeInfoPort, TIME_PLACEHOLDER};
use crate::error::ValidationError;

/// Body of `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub time: heapless::String<16>,
    pub uptime: u64,
    pub rssi: i32,
    pub relay: bool,
}

/// Parse the `state` query value.  Accepts `0`/`1` and `false`/`true`.
pub fn parse_state(raw: Option<&str>) -> Result<bool, ValidationError> {
    match raw.map(str::trim) {
        None => Err(ValidationError::MissingState),
        Some("1" | "true") => Ok(true),
        Some("0" | "false") => Ok(false),
        Some(_) => Err(ValidationError::InvalidState),
    }
}

/// Shared handle onto the state cell, the tracker and the node facts.
/// Cheap to clone; both surfaces hold one.
pub struct ControlSurface<C, I> {
    state: Arc<ActuatorState>,
    activity: Arc<ActivityTracker<C>>,
    info: Arc<I>,
}

impl<C, I> Clone for ControlSurface<C, I> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            activity: self.activity.clone(),
            info: self.info.clone(),
        }
    }
}

impl<C: MonotonicClock, I: NodeInfoPort> ControlSurface<C, I> {
    pub fn new(state: Arc<ActuatorState>, activity: Arc<ActivityTracker<C>>, info: Arc<I>) -> Self {
        Self {
            state,
            activity,
            info,
        }
    }

    /// Read-only snapshot.  Still counts as activity.
    pub fn status(&self) -> StatusReport {
        self.activity.touch();

        let time = self
            .info
            .local_time()
            .unwrap_or_else(|| heapless::String::try_from(TIME_PLACEHOLDER).unwrap_or_default());

        StatusReport {
            time,
            uptime: self.info.uptime_secs(),
            rssi: self.info.rssi().map_or(0, i32::from),
            relay: self.state.read(),
        }
    }

    /// Request a relay state.  Returns whether the logical state changed.
    pub fn control(&self, requested: bool, origin: Origin, sink: &mut impl EventSink) -> bool {
        self.activity.touch();
        let changed = self.state.write(requested);
        if changed {
            info!("Control: {:?} set relay {}", origin, if requested { "ON" } else { "OFF" });
            sink.emit(&AppEvent::StateRequested {
                origin,
                active: requested,
            });
        }
        changed
    }

    /// `control` with the raw `state` parameter.  A rejected request still
    /// touches the tracker but never the state.
    pub fn control_raw(
        &self,
        raw_state: Option<&str>,
        origin: Origin,
        sink: &mut impl EventSink,
    ) -> Result<bool, ValidationError> {
        match parse_state(raw_state) {
            Ok(requested) => Ok(self.control(requested, origin, sink)),
            Err(reason) => {
                self.activity.touch();
                sink.emit(&AppEvent::ControlRejected { origin, reason });
                Err(reason)
            }
        }
    }

    /// Touch the tracker without reading or writing anything.
    pub fn touch(&self) {
        self.activity.touch();
    }
}
