/**
 * Client configuration.
 *
 * Supplied once to `Client::new()` and never mutated afterwards. All
 * fields have defaults via `Default`, so callers set only what they use:
 *
 * ```ignore
 * let client = pogr_core::Client::new(pogr_core::Config {
 *     client_key: "CLIENT".into(),
 *     build_key: "BUILD".into(),
 *     timeout: Some(Duration::from_secs(30)),
 *     enable_connection_pool: true,
 *     ..Default::default()
 * });
 * ```
 */
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::protocol::constants::DEFAULT_BASE_URL;
use crate::transport::Transport;

// ---------------------------------------------------------------------------
// PoolConfig
// ---------------------------------------------------------------------------

/// Connection-pool tuning for the default transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Idle connections kept across all hosts.
    pub max_idle_conns: usize,

    /// Idle connections kept per host.
    pub max_idle_conns_per_host: usize,

    /// Concurrent in-flight requests per host. `0` disables the ceiling.
    pub max_conns_per_host: usize,

    /// How long an idle connection may sit in the pool.
    pub idle_conn_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_conns: 100,
            max_idle_conns_per_host: 100,
            max_conns_per_host: 100,
            idle_conn_timeout: Duration::from_secs(90),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct Config {
    /// Client key; with `build_key`, used for init calls and as the
    /// lowest-priority submission credential.
    pub client_key: String,
    pub build_key: String,

    /// Access/secret key pair for stateless submissions.
    pub access_key: String,
    pub secret_key: String,

    /// Intake base URL. Empty means `DEFAULT_BASE_URL`.
    pub base_url: String,

    /// Upper bound on every call. `None` leaves calls unbounded.
    pub timeout: Option<Duration>,

    pub enable_connection_pool: bool,

    /// Pool tuning; `None` uses `PoolConfig::default()` when pooling is on.
    pub pool: Option<PoolConfig>,

    /// Replaces the default `HttpTransport`.
    pub transport: Option<Arc<dyn Transport>>,
}

impl Config {
    /// The base URL requests are built against, without a trailing slash.
    pub fn resolved_base_url(&self) -> &str {
        let url = self.base_url.trim_end_matches('/');
        if url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            url
        }
    }

    pub fn has_access_key_auth(&self) -> bool {
        !self.access_key.is_empty() && !self.secret_key.is_empty()
    }

    pub fn has_client_key_auth(&self) -> bool {
        !self.client_key.is_empty() && !self.build_key.is_empty()
    }

    /// Human-readable summary with secrets redacted.
    pub fn describe(&self) -> String {
        format!(
            "POGR SDK Configuration:\n\
             BaseURL: {}\n\
             ClientKey: {}\n\
             BuildKey: {}\n\
             AccessKey: {}\n\
             SecretKey: {}\n\
             Connection Pool Enabled: {}\n\
             Timeout: {}",
            self.resolved_base_url(),
            redact(&self.client_key),
            redact(&self.build_key),
            redact(&self.access_key),
            redact(&self.secret_key),
            self.enable_connection_pool,
            self.timeout
                .map(|t| format!("{t:?}"))
                .unwrap_or_else(|| "none".into()),
        )
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_key", &redact(&self.client_key))
            .field("build_key", &redact(&self.build_key))
            .field("access_key", &redact(&self.access_key))
            .field("secret_key", &redact(&self.secret_key))
            .field("base_url", &self.resolved_base_url())
            .field("timeout", &self.timeout)
            .field("enable_connection_pool", &self.enable_connection_pool)
            .field("pool", &self.pool)
            .field("transport", &self.transport.as_ref().map(|_| "custom"))
            .finish()
    }
}

/// Keeps the last four characters of a credential, masks the rest.
fn redact(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return "<unset>".into();
    }
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}
