/*!
 * POGR Core: the session and request-dispatch engine.
 *
 * This crate resolves credentials, tracks the session lifecycle, builds
 * and sends requests, and interprets the intake's response envelopes.
 * End users should depend on the `pogr` facade crate instead, which
 * re-exports everything and adds environment-based configuration.
 *
 * # Module structure
 *
 * - `protocol/`: what we send: constants, payload types, envelopes
 * - `transport/`: how we deliver: transport trait, `ureq` transport,
 *   per-host gate, deadline enforcement
 * - `session`: the `(session_id, initialized)` pair behind a `RwLock`
 * - `auth`: credential priority
 * - `client`: one method per intake endpoint
 * - `config`, `error`
 */

mod auth;
mod client;
mod config;
mod error;
mod protocol;
mod session;
pub mod transport;

#[cfg(test)]
mod testing;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use auth::{resolve as resolve_auth, AuthMethod};
pub use client::Client;
pub use config::{Config, PoolConfig};
pub use error::{Error, Result, TransportError};
pub use protocol::constants::{DEFAULT_BASE_URL, SDK_VERSION, VALID_TAGS};
pub use protocol::types::{validate_tag, Event, Log, Metrics, MonitorSample, Severity, Tags};
pub use session::{SessionSnapshot, SessionState};
pub use transport::{HttpTransport, Request, Response, Transport};

/// Re-exported so callers can build payloads without a direct dependency.
pub use serde_json::{json, Value};
