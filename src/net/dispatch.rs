//! Dispatch loop.  Services the HTTP surface one request at a time.
//!
//! ```text
//!   loop {
//!       poll_request()  ──▶ none pending? skip
//!       route + respond
//!       sleep(yield)    ──▶ lets the driver, governor and serial task run
//!   }
//! ```
//!
//! Accept is non-blocking and reading a request head is bounded by one
//! request timeout in total, so one iteration never blocks indefinitely.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::http::{HttpRequest, HttpResponse, MAX_REQUEST_HEAD, head_complete};
use super::router::Router;
use crate::app::ports::{EventSink, MonotonicClock, NodeInfoPort};
use crate::error::CommsError;

/// Source of pending requests plus the channel to answer each one.
pub trait RequestSource {
    type Responder: Write;

    /// Next pending request, if any.  Must not block indefinitely.
    fn poll_request(&mut self) -> Option<(HttpRequest, Self::Responder)>;
}

// ── TCP source ───────────────────────────────────────────────

/// Non-blocking `std::net` listener.  Runs on ESP-IDF (lwIP) and on the host.
pub struct TcpRequestSource {
    listener: TcpListener,
    read_timeout: Duration,
}

impl TcpRequestSource {
    pub fn bind(port: u16, read_timeout_ms: u32) -> Result<Self, CommsError> {
        Self::bind_addr(SocketAddr::from(([0, 0, 0, 0], port)), read_timeout_ms)
    }

    pub fn bind_addr(addr: SocketAddr, read_timeout_ms: u32) -> Result<Self, CommsError> {
        let listener = TcpListener::bind(addr).map_err(|e| {
            warn!("HTTP: bind {} failed: {}", addr, e);
            CommsError::HttpBindFailed
        })?;
        listener
            .set_nonblocking(true)
            .map_err(|_| CommsError::HttpBindFailed)?;
        info!("HTTP: listening on {}", addr);
        Ok(Self {
            listener,
            read_timeout: Duration::from_millis(u64::from(read_timeout_ms)),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Read until the head terminator, EOF, or the buffer fills.  The
    /// request timeout bounds the whole head, not each `read`.
    fn read_head(&self, stream: &mut TcpStream) -> io::Result<Vec<u8>> {
        stream.set_nonblocking(false)?;
        let deadline = Instant::now() + self.read_timeout;

        let mut buf = vec![0u8; MAX_REQUEST_HEAD];
        let mut total = 0;
        while total < MAX_REQUEST_HEAD {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "request head deadline passed",
                ));
            }
            stream.set_read_timeout(Some(remaining))?;
            let n = stream.read(&mut buf[total..])?;
            if n == 0 {
                break;
            }
            total += n;
            if head_complete(&buf[..total]) {
                break;
            }
        }
        buf.truncate(total);
        Ok(buf)
    }
}

impl RequestSource for TcpRequestSource {
    type Responder = TcpStream;

    fn poll_request(&mut self) -> Option<(HttpRequest, TcpStream)> {
        let (mut stream, peer) = match self.listener.accept() {
            Ok(conn) => conn,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return None,
            Err(e) => {
                warn!("HTTP: accept failed: {}", e);
                return None;
            }
        };

        let head = match self.read_head(&mut stream) {
            Ok(head) if !head.is_empty() => head,
            Ok(_) => {
                debug!("HTTP: {} closed without a request", peer);
                return None;
            }
            Err(e) => {
                warn!("HTTP: read from {} failed: {}", peer, e);
                return None;
            }
        };

        match HttpRequest::parse(&head) {
            Ok(req) => Some((req, stream)),
            Err(e) => {
                debug!("HTTP: malformed request from {} ({:?})", peer, e);
                if let Err(e) = HttpResponse::bad_request().write_to(&mut stream) {
                    warn!("HTTP: write to {} failed: {}", peer, e);
                }
                None
            }
        }
    }
}

// ── Loop ─────────────────────────────────────────────────────

pub struct DispatchLoop<R, C, I, S> {
    source: R,
    router: Router<C, I, S>,
    yield_for: Duration,
}

impl<R, C, I, S> DispatchLoop<R, C, I, S>
where
    R: RequestSource,
    C: MonotonicClock,
    I: NodeInfoPort,
    S: EventSink,
{
    pub fn new(source: R, router: Router<C, I, S>, yield_ms: u32) -> Self {
        Self {
            source,
            router,
            yield_for: Duration::from_millis(u64::from(yield_ms)),
        }
    }

    /// Service at most one pending request.  Returns the response status
    /// if one was handled.
    pub fn service_once(&mut self) -> Option<u16> {
        let (req, mut responder) = self.source.poll_request()?;
        let resp = self.router.handle(&req);
        debug!("HTTP: {} {} -> {}", req.method, req.path, resp.status);
        if let Err(e) = resp.write_to(&mut responder) {
            warn!("HTTP: response write failed: {}", e);
        }
        Some(resp.status)
    }

    pub fn run(mut self) {
        info!("Dispatch: loop running (yield {:?})", self.yield_for);
        loop {
            self.service_once();
            std::thread::sleep(self.yield_for);
        }
    }
}
