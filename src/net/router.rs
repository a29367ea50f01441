//! Route table for the HTTP surface.
//!
//! | Method | Path           | Handler                         |
//! |--------|----------------|---------------------------------|
//! | GET    | `/`            | dashboard page                  |
//! | GET    | `/api/status`  | [`ControlSurface::status`]      |
//! | GET    | `/api/control` | [`ControlSurface::control_raw`] |

use log::warn;

use super::dashboard::DASHBOARD_HTML;
use super::http::{HttpRequest, HttpResponse};
use crate::app::events::Origin;
use crate::app::ports::{EventSink, MonotonicClock, NodeInfoPort};
use crate::surfaces::ControlSurface;

pub struct Router<C, I, S> {
    surface: ControlSurface<C, I>,
    sink: S,
}

impl<C, I, S> Router<C, I, S>
where
    C: MonotonicClock,
    I: NodeInfoPort,
    S: EventSink,
{
    pub fn new(surface: ControlSurface<C, I>, sink: S) -> Self {
        Self { surface, sink }
    }

    pub fn handle(&mut self, req: &HttpRequest) -> HttpResponse {
        if req.method != "GET" {
            return HttpResponse::method_not_allowed();
        }

        match req.path.as_str() {
            "/" => {
                self.surface.touch();
                HttpResponse::html(DASHBOARD_HTML)
            }
            "/api/status" => {
                let report = self.surface.status();
                match serde_json::to_string(&report) {
                    Ok(body) => HttpResponse::json(body),
                    Err(e) => {
                        warn!("HTTP: status serialization failed: {}", e);
                        HttpResponse::internal_error()
                    }
                }
            }
            "/api/control" => {
                match self
                    .surface
                    .control_raw(req.query_param("state"), Origin::Http, &mut self.sink)
                {
                    Ok(_) => HttpResponse::ok(),
                    Err(_) => HttpResponse::bad_request(),
                }
            }
            _ => HttpResponse::not_found(),
        }
    }
}
