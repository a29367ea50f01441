//! HTTP surface tests: routing, status JSON, control validation, and a
//! loopback round-trip through the real TCP request source.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use hazardnode::activity::ActivityTracker;
use hazardnode::actuator::ActuatorState;
use hazardnode::app::events::{AppEvent, Origin};
use hazardnode::error::ValidationError;
use hazardnode::net::{DispatchLoop, HttpRequest, Router, TcpRequestSource};
use hazardnode::surfaces::ControlSurface;

use crate::mock_hw::{ManualClock, RecordingSink, StaticInfo};

const IDLE_TIMEOUT_MS: u32 = 30_000;

struct Node {
    clock: Arc<ManualClock>,
    state: Arc<ActuatorState>,
    activity: Arc<ActivityTracker<Arc<ManualClock>>>,
    sink: RecordingSink,
    router: Router<Arc<ManualClock>, StaticInfo, RecordingSink>,
}

fn node_with(info: Arc<StaticInfo>) -> Node {
    let clock = ManualClock::at(1_000);
    let state = Arc::new(ActuatorState::new());
    let activity = Arc::new(ActivityTracker::new(clock.clone(), IDLE_TIMEOUT_MS));
    let surface = ControlSurface::new(state.clone(), activity.clone(), info);
    let sink = RecordingSink::new();
    let router = Router::new(surface, sink.clone());
    Node {
        clock,
        state,
        activity,
        sink,
        router,
    }
}

fn node() -> Node {
    node_with(StaticInfo::synced())
}

// ── Status ────────────────────────────────────────────────────

#[test]
fn status_reports_exact_json() {
    let mut n = node();
    let resp = n.router.handle(&HttpRequest::get("/api/status"));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.content_type, "application/json");
    assert_eq!(
        resp.body,
        r#"{"time":"12:00:01","uptime":42,"rssi":-61,"relay":false}"#
    );
}

#[test]
fn status_before_sync_uses_placeholders() {
    let mut n = node_with(StaticInfo::unsynced());
    n.state.write(true);
    let resp = n.router.handle(&HttpRequest::get("/api/status"));
    assert_eq!(
        resp.body,
        r#"{"time":"--:--:--","uptime":3,"rssi":0,"relay":true}"#
    );
}

#[test]
fn status_never_changes_state() {
    let mut n = node();
    for _ in 0..5 {
        n.router.handle(&HttpRequest::get("/api/status"));
    }
    assert!(!n.state.read());
    assert!(!n.state.wake_pending());
    assert!(n.sink.events().is_empty());
}

// ── Control ───────────────────────────────────────────────────

#[test]
fn control_on_sets_state_and_posts_wake() {
    let mut n = node();
    let resp = n.router.handle(&HttpRequest::get("/api/control?state=1"));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "OK");
    assert!(n.state.read());
    assert!(n.state.wake_pending());
    assert_eq!(
        n.sink.events(),
        vec![AppEvent::StateRequested {
            origin: Origin::Http,
            active: true
        }]
    );
}

#[test]
fn repeating_current_value_posts_no_wake() {
    let mut n = node();
    n.router.handle(&HttpRequest::get("/api/control?state=1"));
    assert!(n.state.take_wake());

    let resp = n.router.handle(&HttpRequest::get("/api/control?state=1"));
    assert_eq!(resp.status, 200);
    assert!(n.state.read());
    assert!(!n.state.wake_pending());
}

#[test]
fn missing_state_is_rejected_without_touching_relay() {
    let mut n = node();
    let resp = n.router.handle(&HttpRequest::get("/api/control"));
    assert_eq!(resp.status, 400);
    assert_eq!(resp.body, "Bad Request");
    assert!(!n.state.read());
    assert!(!n.state.wake_pending());
    assert_eq!(
        n.sink.events(),
        vec![AppEvent::ControlRejected {
            origin: Origin::Http,
            reason: ValidationError::MissingState
        }]
    );
}

#[test]
fn unparseable_state_is_rejected() {
    let mut n = node();
    for target in ["/api/control?state=2", "/api/control?state=", "/api/control?state=on"] {
        let resp = n.router.handle(&HttpRequest::get(target));
        assert_eq!(resp.status, 400, "{target}");
    }
    assert!(!n.state.read());
    assert_eq!(
        n.sink.count(|e| matches!(
            e,
            AppEvent::ControlRejected {
                reason: ValidationError::InvalidState,
                ..
            }
        )),
        3
    );
}

#[test]
fn status_reflects_accepted_control() {
    let mut n = node();
    assert_eq!(n.router.handle(&HttpRequest::get("/api/control?state=1")).status, 200);
    let resp = n.router.handle(&HttpRequest::get("/api/status"));
    assert!(resp.body.ends_with(r#""relay":true}"#), "{}", resp.body);
}

#[test]
fn control_off_after_on() {
    let mut n = node();
    n.router.handle(&HttpRequest::get("/api/control?state=1"));
    n.router.handle(&HttpRequest::get("/api/control?x=9&state=0"));
    assert!(!n.state.read());
}

// ── Activity ──────────────────────────────────────────────────

#[test]
fn every_route_counts_as_activity() {
    let mut n = node();
    for target in ["/", "/api/status", "/api/control", "/api/control?state=1"] {
        n.clock.advance(IDLE_TIMEOUT_MS + 1);
        assert!(!n.activity.is_active(), "idle before {target}");
        n.router.handle(&HttpRequest::get(target));
        assert!(n.activity.is_active(), "active after {target}");
    }
}

#[test]
fn unknown_routes_do_not_count_as_activity() {
    let mut n = node();
    n.clock.advance(IDLE_TIMEOUT_MS + 1);
    assert_eq!(n.router.handle(&HttpRequest::get("/favicon.ico")).status, 404);
    assert!(!n.activity.is_active());
}

// ── Routing ───────────────────────────────────────────────────

#[test]
fn dashboard_is_served_at_root() {
    let mut n = node();
    let resp = n.router.handle(&HttpRequest::get("/"));
    assert_eq!(resp.status, 200);
    assert!(resp.content_type.starts_with("text/html"));
    assert!(resp.body.contains("/api/status"));
}

#[test]
fn non_get_is_not_allowed() {
    let mut n = node();
    let req = HttpRequest {
        method: "POST".into(),
        path: "/api/control".into(),
        query: "state=1".into(),
    };
    assert_eq!(n.router.handle(&req).status, 405);
    assert!(!n.state.read());
}

// ── TCP loopback ──────────────────────────────────────────────

fn loopback_source() -> (TcpRequestSource, SocketAddr) {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let source = TcpRequestSource::bind_addr(addr, 2_000).unwrap();
    let addr = source.local_addr().unwrap();
    (source, addr)
}

fn send_raw(addr: SocketAddr, raw: &'static [u8]) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(raw).unwrap();
        let mut out = String::new();
        stream.read_to_string(&mut out).unwrap();
        out
    })
}

#[test]
fn tcp_control_round_trip() {
    let n = node();
    let state = n.state.clone();
    let (source, addr) = loopback_source();
    let mut dispatch = DispatchLoop::new(source, n.router, 0);

    let client = send_raw(addr, b"GET /api/control?state=1 HTTP/1.1\r\nHost: node\r\n\r\n");

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut status = None;
    while status.is_none() && Instant::now() < deadline {
        status = dispatch.service_once();
        thread::sleep(Duration::from_millis(1));
    }

    assert_eq!(status, Some(200));
    let reply = client.join().unwrap();
    assert!(reply.starts_with("HTTP/1.1 200 OK\r\n"), "{reply}");
    assert!(reply.ends_with("\r\n\r\nOK"), "{reply}");
    assert!(state.read());
}

#[test]
fn tcp_malformed_head_gets_400() {
    let n = node();
    let state = n.state.clone();
    let (source, addr) = loopback_source();
    let mut dispatch = DispatchLoop::new(source, n.router, 0);

    let client = send_raw(addr, b"HELLO\r\n\r\n");

    let deadline = Instant::now() + Duration::from_secs(5);
    while !client.is_finished() && Instant::now() < deadline {
        assert_eq!(dispatch.service_once(), None);
        thread::sleep(Duration::from_millis(1));
    }

    let reply = client.join().unwrap();
    assert!(reply.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{reply}");
    assert!(!state.read());
}

#[test]
fn idle_listener_yields_nothing() {
    let n = node();
    let (source, _) = loopback_source();
    let mut dispatch = DispatchLoop::new(source, n.router, 0);
    assert_eq!(dispatch.service_once(), None);
}

#[test]
fn trickling_client_is_cut_off_at_request_timeout() {
    let n = node();
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let source = TcpRequestSource::bind_addr(addr, 200).unwrap();
    let addr = source.local_addr().unwrap();
    let mut dispatch = DispatchLoop::new(source, n.router, 0);

    // One byte every 50 ms keeps each read under the timeout but never
    // completes the head.
    let client = thread::spawn(move || {
        let mut stream = TcpStream::connect(addr).unwrap();
        for b in b"GET /api/status HTTP/1.1\r\nX-Pad: aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".iter() {
            if stream.write_all(&[*b]).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(50));
        }
    });

    let accept_deadline = Instant::now() + Duration::from_secs(5);
    let mut blocked = Duration::ZERO;
    while Instant::now() < accept_deadline {
        let started = Instant::now();
        let status = dispatch.service_once();
        let spent = started.elapsed();
        assert_eq!(status, None);
        if spent >= Duration::from_millis(150) {
            blocked = spent;
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }

    assert!(blocked >= Duration::from_millis(150), "connection never read");
    assert!(blocked < Duration::from_millis(1_000), "held for {blocked:?}");
    client.join().unwrap();
}
