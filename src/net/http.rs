//! Minimal HTTP/1.x request-head parsing and response framing.
//!
//! Enough for three GET routes with a query string: no bodies, no
//! chunking, no keep-alive.  Every response closes the connection.

use std::io::{self, Write};

/// Largest request head accepted; anything longer is rejected.
pub const MAX_REQUEST_HEAD: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    /// Raw query string without the leading `?`; empty when absent.
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    NotUtf8,
    Incomplete,
    BadRequestLine,
}

impl HttpRequest {
    /// Build a GET request from a target such as `/api/control?state=1`.
    pub fn get(target: &str) -> Self {
        let (path, query) = split_target(target);
        Self {
            method: "GET".into(),
            path: path.into(),
            query: query.into(),
        }
    }

    /// Parse the request line out of a buffered head.  Headers are skipped.
    pub fn parse(head: &[u8]) -> Result<Self, ParseError> {
        let text = core::str::from_utf8(head).map_err(|_| ParseError::NotUtf8)?;
        if !text.contains("\r\n\r\n") && !text.contains("\n\n") {
            return Err(ParseError::Incomplete);
        }

        let request_line = text.lines().next().unwrap_or("");
        let mut parts = request_line.split_whitespace();
        let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseError::BadRequestLine);
        };
        if !version.starts_with("HTTP/1.") || !target.starts_with('/') {
            return Err(ParseError::BadRequestLine);
        }

        let (path, query) = split_target(target);
        Ok(Self {
            method: method.into(),
            path: path.into(),
            query: query.into(),
        })
    }

    /// First value for `key` in the query string.  A bare key yields `""`.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        query_param(&self.query, key)
    }
}

fn split_target(target: &str) -> (&str, &str) {
    match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    }
}

pub fn query_param<'q>(query: &'q str, key: &str) -> Option<&'q str> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| match pair.split_once('=') {
            Some((k, v)) if k == key => Some(v),
            None if pair == key => Some(""),
            _ => None,
        })
}

/// True once `buf` holds a complete request head.
pub fn head_complete(buf: &[u8]) -> bool {
    buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.windows(2).any(|w| w == b"\n\n")
}

// ── Response ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.into(),
        }
    }

    pub fn json(body: String) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body,
        }
    }

    pub fn html(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: body.into(),
        }
    }

    pub fn ok() -> Self {
        Self::text(200, "OK")
    }

    pub fn bad_request() -> Self {
        Self::text(400, "Bad Request")
    }

    pub fn not_found() -> Self {
        Self::text(404, "Not Found")
    }

    pub fn method_not_allowed() -> Self {
        Self::text(405, "Method Not Allowed")
    }

    pub fn internal_error() -> Self {
        Self::text(500, "Internal Server Error")
    }

    pub fn write_to(&self, w: &mut impl Write) -> io::Result<()> {
        write!(
            w,
            "HTTP/1.1 {} {}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n",
            self.status,
            reason(self.status),
            self.content_type,
            self.body.len(),
        )?;
        w.write_all(self.body.as_bytes())?;
        w.flush()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    }
}
