//! HTTP surface: request parsing, routing, and the dispatch loop.
//!
//! ```text
//! ┌───────────────────┐   ┌─────────┐   ┌──────────────────┐
//! │ TcpRequestSource  │──▶│ Router  │──▶│ ControlSurface   │
//! │ (non-blocking)    │◀──│         │◀──│ status / control │
//! └───────────────────┘   └─────────┘   └──────────────────┘
//!          ▲
//!          └── DispatchLoop: one request per iteration, then yield
//! ```

pub mod dashboard;
pub mod dispatch;
pub mod http;
pub mod router;

pub use dispatch::{DispatchLoop, RequestSource, TcpRequestSource};
pub use http::{HttpRequest, HttpResponse};
pub use router::Router;
