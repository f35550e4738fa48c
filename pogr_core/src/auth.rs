/**
 * Authentication resolution.
 *
 * Chooses the credential attached to a submission, in strict priority:
 * 1. an active session id → `INTAKE_SESSION_ID`
 * 2. a complete access/secret pair → `ACCESS_KEY` + `SECRET_KEY`
 * 3. a complete client/build pair → `POGR_CLIENT` + `POGR_BUILD`
 *
 * Session auth always wins once a session exists, whatever static
 * credentials are also configured. Resolution is pure: same inputs,
 * same answer.
 */
use std::collections::HashMap;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::protocol::constants::{
    HEADER_ACCESS_KEY, HEADER_BUILD_KEY, HEADER_CLIENT_KEY, HEADER_SECRET_KEY, HEADER_SESSION_ID,
};
use crate::session::SessionSnapshot;

/// The credential chosen for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod<'a> {
    Session(&'a str),
    AccessKey { access_key: &'a str, secret_key: &'a str },
    ClientKey { client_key: &'a str, build_key: &'a str },
}

impl AuthMethod<'_> {
    /// Short name for logs. Never includes credential material.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthMethod::Session(_) => "session",
            AuthMethod::AccessKey { .. } => "access_key",
            AuthMethod::ClientKey { .. } => "client_key",
        }
    }

    pub fn headers(&self) -> HashMap<String, String> {
        let pairs = match *self {
            AuthMethod::Session(id) => vec![(HEADER_SESSION_ID, id)],
            AuthMethod::AccessKey { access_key, secret_key } => {
                vec![(HEADER_ACCESS_KEY, access_key), (HEADER_SECRET_KEY, secret_key)]
            }
            AuthMethod::ClientKey { client_key, build_key } => {
                vec![(HEADER_CLIENT_KEY, client_key), (HEADER_BUILD_KEY, build_key)]
            }
        };

        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/**
 * Picks the highest-priority credential available.
 *
 * # Returns
 * * `Ok(AuthMethod)` borrowed from `session` or `config`.
 * * `Err(Error::NoAuthMethodAvailable)`: the request must not be sent.
 */
pub fn resolve<'a>(session: &'a SessionSnapshot, config: &'a Config) -> Result<AuthMethod<'a>> {
    if let Some(id) = session.active_id() {
        return Ok(AuthMethod::Session(id));
    }

    if config.has_access_key_auth() {
        return Ok(AuthMethod::AccessKey {
            access_key: &config.access_key,
            secret_key: &config.secret_key,
        });
    }

    if config.has_client_key_auth() {
        return Ok(AuthMethod::ClientKey {
            client_key: &config.client_key,
            build_key: &config.build_key,
        });
    }

    Err(Error::NoAuthMethodAvailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> Config {
        Config {
            client_key: "ck".into(),
            build_key: "bk".into(),
            access_key: "ak".into(),
            secret_key: "sk".into(),
            ..Default::default()
        }
    }

    fn session(id: &str) -> SessionSnapshot {
        SessionSnapshot {
            session_id: id.into(),
            initialized: !id.is_empty(),
        }
    }

    #[test]
    fn test_session_beats_every_static_credential() {
        let config = full_config();
        let snap = session("sess-9");

        let method = resolve(&snap, &config).unwrap();
        assert_eq!(method, AuthMethod::Session("sess-9"));

        let headers = method.headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[HEADER_SESSION_ID], "sess-9");
    }

    #[test]
    fn test_access_key_beats_client_key() {
        let config = full_config();
        let snap = SessionSnapshot::default();

        let headers = resolve(&snap, &config).unwrap().headers();
        assert_eq!(headers[HEADER_ACCESS_KEY], "ak");
        assert_eq!(headers[HEADER_SECRET_KEY], "sk");
        assert!(!headers.contains_key(HEADER_CLIENT_KEY));
    }

    /**
     * A half-configured access pair falls through to client/build keys.
     */
    #[test]
    fn test_incomplete_access_pair_falls_through() {
        let config = Config {
            secret_key: String::new(),
            ..full_config()
        };
        let snap = SessionSnapshot::default();

        assert_eq!(resolve(&snap, &config).unwrap().kind(), "client_key");
    }

    #[test]
    fn test_nothing_configured() {
        let config = Config {
            client_key: "ck".into(),
            access_key: "ak".into(),
            ..Default::default()
        };
        let snap = SessionSnapshot::default();

        assert!(matches!(resolve(&snap, &config), Err(Error::NoAuthMethodAvailable)));
    }
}
