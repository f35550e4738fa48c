/**
 * POGR: Rust SDK for the POGR telemetry intake.
 *
 * This is the crate users should depend on. It re-exports the core
 * client and adds configuration from environment variables.
 *
 * # Quick start
 *
 * ```ignore
 * fn main() -> pogr::Result<()> {
 *     let client = pogr::Client::new(pogr::Config {
 *         client_key: "CLIENT".into(),
 *         build_key: "BUILD".into(),
 *         timeout: Some(std::time::Duration::from_secs(30)),
 *         enable_connection_pool: true,
 *         ..Default::default()
 *     });
 *
 *     client.init_with_user_jwt("USER_JWT")?;
 *     client.send_data(&pogr::json!({"score": 42}), None)?;
 *     client.end_session()
 * }
 * ```
 *
 * # From the environment
 *
 * ```ignore
 * let client = pogr::Client::new(pogr::config_from_env());
 * ```
 */
use std::env;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Re-exports from pogr_core: the public surface area
// ---------------------------------------------------------------------------

pub use pogr_core::{
    json, resolve_auth, validate_tag, AuthMethod, Client, Config, Error, Event, HttpTransport,
    Log, Metrics, MonitorSample, PoolConfig, Request, Response, Result, SessionSnapshot, Severity,
    Tags, Transport, TransportError, Value, DEFAULT_BASE_URL, SDK_VERSION, VALID_TAGS,
};

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

pub const ENV_CLIENT_ID: &str = "POGR_CLIENT_ID";
pub const ENV_BUILD_ID: &str = "POGR_BUILD_ID";
pub const ENV_ACCESS_KEY: &str = "POGR_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "POGR_SECRET_KEY";
pub const ENV_BASE_URL: &str = "POGR_BASE_URL";
/// Older name for `POGR_BASE_URL`, read when the former is unset.
pub const ENV_INTAKE_BASE_URL: &str = "INTAKE_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "POGR_TIMEOUT_MS";

/**
 * Builds a `Config` from the process environment.
 *
 * Unset variables leave the corresponding field at its default. Pooling
 * is enabled. An unparsable `POGR_TIMEOUT_MS` is ignored with a warning.
 */
pub fn config_from_env() -> Config {
    config_from(|key| env::var(key).ok())
}

/*
 * Split out so tests can feed a fixed map instead of mutating the real
 * process environment.
 */
fn config_from(lookup: impl Fn(&str) -> Option<String>) -> Config {
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    let timeout = get(ENV_TIMEOUT_MS).and_then(|raw| match raw.parse::<u64>() {
        Ok(0) => None,
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "ignoring invalid {ENV_TIMEOUT_MS}");
            None
        }
    });

    Config {
        client_key: get(ENV_CLIENT_ID).unwrap_or_default(),
        build_key: get(ENV_BUILD_ID).unwrap_or_default(),
        access_key: get(ENV_ACCESS_KEY).unwrap_or_default(),
        secret_key: get(ENV_SECRET_KEY).unwrap_or_default(),
        base_url: get(ENV_BASE_URL)
            .or_else(|| get(ENV_INTAKE_BASE_URL))
            .unwrap_or_default(),
        timeout,
        enable_connection_pool: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config_from(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_reads_credentials_and_timeout() {
        let config = config_with(&[
            (ENV_CLIENT_ID, "ck"),
            (ENV_BUILD_ID, "bk"),
            (ENV_ACCESS_KEY, "ak"),
            (ENV_SECRET_KEY, "sk"),
            (ENV_TIMEOUT_MS, "1500"),
        ]);

        assert_eq!(config.client_key, "ck");
        assert_eq!(config.build_key, "bk");
        assert_eq!(config.access_key, "ak");
        assert_eq!(config.secret_key, "sk");
        assert_eq!(config.timeout, Some(Duration::from_millis(1500)));
        assert!(config.enable_connection_pool);
        assert_eq!(config.resolved_base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_fallback_order() {
        let config = config_with(&[(ENV_INTAKE_BASE_URL, "http://legacy")]);
        assert_eq!(config.base_url, "http://legacy");

        let config = config_with(&[
            (ENV_BASE_URL, "http://primary"),
            (ENV_INTAKE_BASE_URL, "http://legacy"),
        ]);
        assert_eq!(config.base_url, "http://primary");
    }

    #[test]
    fn test_invalid_or_zero_timeout_is_ignored() {
        assert_eq!(config_with(&[(ENV_TIMEOUT_MS, "soon")]).timeout, None);
        assert_eq!(config_with(&[(ENV_TIMEOUT_MS, "0")]).timeout, None);
    }
}
