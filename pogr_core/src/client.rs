/**
 * The intake client: owns the configuration, the transport, and the
 * session state, and exposes one method per remote capability.
 *
 * Lifecycle:
 * 1. `Client::new(config)` builds (or adopts) the transport. No network
 *    traffic happens yet; the session starts uninitialized.
 * 2. One of the `init_with_*` calls obtains a session id from `/init`
 *    using the client/build keys. From then on every submission
 *    authenticates with the session.
 * 3. `end_session()` tells the intake the session is over and returns
 *    the client to the uninitialized state.
 *
 * Submissions work without a session too, falling back to the
 * access/secret or client/build pair (see `auth::resolve`).
 *
 * Each `Client` has its own independent session. Share one across
 * threads with `Arc<Client>`; every method takes `&self`.
 */
use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::auth;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::protocol::constants::{
    CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_BUILD_KEY, HEADER_CLIENT_KEY,
    HEADER_CONTENT_TYPE, HEADER_SESSION_ID, PATH_DATA, PATH_END, PATH_EVENT, PATH_INIT, PATH_LOGS,
    PATH_METRICS, PATH_MONITOR, QUERY_STEAM_TICKET,
};
use crate::protocol::envelope;
use crate::protocol::types::{
    self, AssociationPayload, DataPayload, Event, Log, Metrics, MonitorSample, Tags,
};
use crate::session::{SessionSnapshot, SessionState};
use crate::transport::{bounded, HttpTransport, Request, Response, Transport};

pub struct Client {
    config: Config,
    transport: Arc<dyn Transport>,
    session: SessionState,
}

impl Client {
    /**
     * Creates a client from `config`.
     *
     * Uses `config.transport` when provided, otherwise an `HttpTransport`
     * built from the timeout and pool settings.
     */
    pub fn new(config: Config) -> Self {
        let transport = match &config.transport {
            Some(transport) => Arc::clone(transport),
            None => Arc::new(HttpTransport::new(&config)) as Arc<dyn Transport>,
        };

        Self {
            config,
            transport,
            session: SessionState::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Session management
    // -----------------------------------------------------------------------

    /// Starts a session for the user identified by `user_jwt`.
    pub fn init_with_user_jwt(&self, user_jwt: &str) -> Result<String> {
        let request = self
            .request(PATH_INIT)
            .headers(self.init_headers())
            .header(HEADER_AUTHORIZATION, format!("Bearer {user_jwt}"))
            .header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);

        self.establish(request, "jwt")
    }

    /// Starts a session bound to an existing association id.
    pub fn init_with_association_id(&self, association_id: &str) -> Result<String> {
        let body = serde_json::to_vec(&AssociationPayload { association_id })
            .map_err(Error::Encode)?;

        let request = self
            .request(PATH_INIT)
            .headers(self.init_headers())
            .header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(body);

        self.establish(request, "association_id")
    }

    /// Starts a session from a Steam authentication ticket.
    pub fn init_with_steam_ticket(&self, steam_ticket: &str) -> Result<String> {
        let url = format!(
            "{}{}?{}={}",
            self.config.resolved_base_url(),
            PATH_INIT,
            QUERY_STEAM_TICKET,
            urlencoding::encode(steam_ticket)
        );

        let request = Request::post(url)
            .headers(self.init_headers())
            .timeout(self.config.timeout);

        self.establish(request, "steam_ticket")
    }

    /**
     * Ends the active session.
     *
     * Fails with `Error::NoActiveSession` without touching the network if
     * no session is active. On any failure the session is left as it was.
     * On success the session is cleared, unless a concurrent `init_*`
     * already replaced it with a newer one.
     */
    pub fn end_session(&self) -> Result<()> {
        let snapshot = self.session.get();
        let session_id = snapshot.active_id().ok_or(Error::NoActiveSession)?;

        let request = self
            .request(PATH_END)
            .header(HEADER_SESSION_ID, session_id);

        let response = self.dispatch(request, "session")?;
        envelope::generic(&response)?;

        if self.session.clear_if(session_id) {
            tracing::info!("intake session ended");
        } else {
            tracing::debug!("session replaced while ending; keeping the newer one");
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Submissions
    // -----------------------------------------------------------------------

    /// Sends arbitrary JSON data, optionally tagged. Returns the data id.
    pub fn send_data(&self, data: &Value, tags: Option<&Tags>) -> Result<String> {
        self.submit(PATH_DATA, &DataPayload { data, tags })
    }

    pub fn send_event(&self, event: &Event) -> Result<String> {
        self.submit(PATH_EVENT, event)
    }

    pub fn send_log(&self, log: &Log) -> Result<String> {
        self.submit(PATH_LOGS, log)
    }

    pub fn send_metrics(&self, metrics: &Metrics) -> Result<String> {
        self.submit(PATH_METRICS, metrics)
    }

    pub fn send_monitor_data(&self, sample: &MonitorSample) -> Result<String> {
        self.submit(PATH_MONITOR, sample)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn is_initialized(&self) -> bool {
        self.session.is_initialized()
    }

    /// The active session id, or an empty string.
    pub fn session_id(&self) -> String {
        self.session.session_id()
    }

    /// Both halves of the session state, read together.
    pub fn session(&self) -> SessionSnapshot {
        self.session.get()
    }

    /// See [`types::validate_tag`].
    pub fn validate_tag(&self, key: &str) -> bool {
        types::validate_tag(key)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Redacted, human-readable configuration summary.
    pub fn print_config(&self) -> String {
        self.config.describe()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// A `POST` to `path` bounded by the configured timeout.
    fn request(&self, path: &str) -> Request {
        Request::post(format!("{}{}", self.config.resolved_base_url(), path))
            .timeout(self.config.timeout)
    }

    /*
     * Init calls always carry the static client/build keys; there is no
     * session to authenticate with yet.
     */
    fn init_headers(&self) -> HashMap<String, String> {
        if !self.config.has_client_key_auth() {
            tracing::warn!("initializing a session without a complete client/build key pair");
        }

        HashMap::from([
            (HEADER_CLIENT_KEY.to_string(), self.config.client_key.clone()),
            (HEADER_BUILD_KEY.to_string(), self.config.build_key.clone()),
        ])
    }

    fn establish(&self, request: Request, flow: &'static str) -> Result<String> {
        let response = self.dispatch(request, "client_key")?;
        let session_id = envelope::session_id(&response)?;

        self.session.set(session_id.as_str(), true);
        tracing::info!(flow, "intake session established");
        Ok(session_id)
    }

    /**
     * Shared path for every submission endpoint.
     *
     * 1. Serialize the payload.
     * 2. Resolve auth from a single session read; the lock is released
     *    before any I/O.
     * 3. Dispatch and decode the data-family envelope.
     */
    fn submit<T: Serialize + ?Sized>(&self, path: &str, payload: &T) -> Result<String> {
        let body = serde_json::to_vec(payload).map_err(Error::Encode)?;

        let snapshot = self.session.get();
        let method = auth::resolve(&snapshot, &self.config)?;

        let request = self
            .request(path)
            .headers(method.headers())
            .header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(body);

        let response = self.dispatch(request, method.kind())?;
        envelope::data_id(&response)
    }

    fn dispatch(&self, request: Request, auth: &'static str) -> Result<Response> {
        let path = request
            .url
            .strip_prefix(self.config.resolved_base_url())
            .unwrap_or(request.url.as_str())
            .to_string();

        tracing::debug!(%path, auth, "dispatching intake request");

        bounded::send(&self.transport, request).map_err(|e| {
            tracing::warn!(%path, error = %e, "intake request failed");
            Error::from(e)
        })
    }
}
