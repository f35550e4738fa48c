/**
 * Transport layer: how requests reach the intake service.
 *
 * - `Transport`: the capability the client depends on, one request in,
 *   one response (or `TransportError`) out
 * - `http`: the default `ureq`-backed implementation
 * - `gate`: per-host connection ceiling used by the default transport
 * - `bounded`: deadline enforcement for transports that cannot honour it
 *
 * Tests and custom integrations substitute their own `Transport` via
 * `Config::transport`.
 */
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::TransportError;

pub mod bounded;
pub mod gate;
pub mod http;

pub use http::HttpTransport;

// ---------------------------------------------------------------------------
// Request / Response
// ---------------------------------------------------------------------------

/**
 * A fully built outbound `POST` request.
 *
 * Every intake endpoint takes a `POST`, so there is no method field.
 * Requests are immutable once handed to a transport. `deadline` plays the
 * role of a cancellation context: when set, the call must not outlive it.
 */
#[derive(Debug, Clone)]
pub struct Request {
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub deadline: Option<Instant>,
}

impl Request {
    /// Creates a bodyless `POST` with no headers and no deadline.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            body: Vec::new(),
            deadline: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /**
     * Bounds the call to `timeout` from now.
     *
     * `None` and a zero duration both leave the call unbounded.
     */
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.deadline = timeout
            .filter(|t| !t.is_zero())
            .map(|t| Instant::now() + t);
        self
    }

    /**
     * Time left before the deadline.
     *
     * `None` if there is no deadline, `Some(Duration::ZERO)` once it
     * has passed.
     */
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

/// A raw response as returned by a transport.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
    pub headers: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/**
 * Executes a single request.
 *
 * Implementations must be shareable between threads; the client calls
 * `send` concurrently from every thread that submits data.
 */
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the response, whatever its status code.
    fn send(&self, request: Request) -> Result<Response, TransportError>;

    /**
     * Whether `send` itself returns by `request.deadline`.
     *
     * When `false` (the default) the client enforces the deadline around
     * the call instead.
     */
    fn enforces_deadline(&self) -> bool {
        false
    }
}
