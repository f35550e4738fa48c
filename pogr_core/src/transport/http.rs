/*!
 * Default HTTP transport.
 *
 * Uses `ureq`: a pure-Rust blocking HTTP client with no async runtime.
 * Calls happen on the caller's own thread, so blocking I/O is the
 * natural fit.
 *
 * Design decisions:
 * - **Pooled connections**: the agent keeps idle keep-alive connections
 *   per `PoolConfig`; with pooling disabled no idle connection is kept.
 * - **Per-host ceiling**: in-flight requests per host are capped by a
 *   `HostGate` when pooling is enabled.
 * - **Deadline-aware**: the request's remaining deadline becomes the
 *   per-call global timeout, covering connect, write and read.
 * - **Status is data**: non-2xx responses are returned, not raised, so
 *   the envelope layer can read the server's error message.
 */

use std::collections::HashMap;
use std::time::Duration;

use ureq::http::Uri;
use ureq::typestate::WithBody;
use ureq::{Agent, RequestBuilder};

use super::gate::HostGate;
use super::{Request, Response, Transport};
use crate::config::{Config, PoolConfig};
use crate::error::TransportError;
use crate::protocol::constants::SDK_VERSION;

/// Connect timeout applied when no overall timeout is configured.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/**
 * Thin wrapper around `ureq::Agent` delivering requests to the intake
 * service.
 *
 * One instance is created per `Client` and shared by every thread that
 * uses that client.
 */
pub struct HttpTransport {
    agent: Agent,
    gate: Option<HostGate>,
}

impl HttpTransport {
    /**
     * Builds the agent from the client configuration.
     *
     * - A positive `timeout` becomes the agent-wide global timeout; zero
     *   means none.
     * - With `enable_connection_pool`, `pool` (or `PoolConfig::default()`)
     *   sizes the idle pool and the per-host ceiling.
     * - Without it, idle connections are not retained.
     */
    pub fn new(config: &Config) -> Self {
        let pool = if config.enable_connection_pool {
            Some(config.pool.clone().unwrap_or_default())
        } else {
            None
        };

        let idle = pool.as_ref().map(|p| p.max_idle_conns).unwrap_or(0);
        let idle_per_host = pool.as_ref().map(|p| p.max_idle_conns_per_host).unwrap_or(0);
        let idle_age = pool
            .as_ref()
            .map(|p| p.idle_conn_timeout)
            .unwrap_or_else(|| PoolConfig::default().idle_conn_timeout);

        let agent: Agent = Agent::config_builder()
            .timeout_connect(Some(DEFAULT_CONNECT_TIMEOUT))
            .timeout_global(config.timeout.filter(|t| !t.is_zero()))
            .max_idle_connections(idle)
            .max_idle_connections_per_host(idle_per_host)
            .max_idle_age(idle_age)
            .http_status_as_error(false)
            .build()
            .into();

        let gate = pool
            .filter(|p| p.max_conns_per_host > 0)
            .map(|p| HostGate::new(p.max_conns_per_host));

        tracing::debug!(
            pooled = config.enable_connection_pool,
            idle,
            idle_per_host,
            "built default HTTP transport"
        );

        Self { agent, gate }
    }

    /* Applies headers and the per-call timeout. */
    fn prepare(
        &self,
        mut builder: RequestBuilder<WithBody>,
        request: &Request,
        timeout: Option<Duration>,
    ) -> RequestBuilder<WithBody> {
        builder = builder.header("User-Agent", SDK_VERSION);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        match timeout {
            Some(t) => builder.config().timeout_global(Some(t)).build(),
            None => builder,
        }
    }

    fn execute(
        &self,
        request: &Request,
        timeout: Option<Duration>,
    ) -> Result<Response, TransportError> {
        let builder = self.prepare(self.agent.post(&request.url), request, timeout);
        let result = if request.body.is_empty() {
            builder.send_empty()
        } else {
            builder.send(&request.body[..])
        };

        let response = result.map_err(map_error)?;
        let status = response.status().as_u16();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers
                    .entry(name.as_str().to_string())
                    .or_insert_with(|| value.to_string());
            }
        }

        let body = response.into_body().read_to_vec().map_err(|e| match e {
            ureq::Error::Timeout(_) => TransportError::Timeout,
            other => TransportError::Body(other.to_string()),
        })?;

        Ok(Response { status, body, headers })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> Result<Response, TransportError> {
        let timeout = request.remaining();
        if timeout == Some(Duration::ZERO) {
            return Err(TransportError::Timeout);
        }

        let _permit = match &self.gate {
            Some(gate) => Some(gate.acquire(&host_of(&request.url)?, request.deadline)?),
            None => None,
        };

        /* Time spent waiting for a permit counts against the deadline. */
        let timeout = match request.remaining() {
            Some(left) if left.is_zero() => return Err(TransportError::Timeout),
            other => other.or(timeout),
        };

        self.execute(&request, timeout)
    }

    fn enforces_deadline(&self) -> bool {
        true
    }
}

fn host_of(url: &str) -> Result<String, TransportError> {
    let uri: Uri = url
        .parse()
        .map_err(|e| TransportError::Request(format!("invalid URL {url}: {e}")))?;

    uri.authority()
        .map(|a| a.as_str().to_string())
        .ok_or_else(|| TransportError::Request(format!("URL has no host: {url}")))
}

fn map_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => TransportError::Timeout,
        ureq::Error::Io(e) => TransportError::Connect(e.to_string()),
        ureq::Error::HostNotFound => TransportError::Connect("host not found".into()),
        ureq::Error::ConnectionFailed => TransportError::Connect("connection failed".into()),
        other => TransportError::Request(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /**
     * Spawns a one-shot HTTP server. It captures the raw request head
     * and body, then answers with `reply` (or nothing, if `None`).
     */
    fn serve_once(reply: Option<&'static str>) -> (String, mpsc::Receiver<(String, Vec<u8>)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                head.push_str(&line);
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();
            let _ = tx.send((head, body));

            let mut stream = stream;
            match reply {
                Some(body) => {
                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nX-Test: yes\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    stream.write_all(response.as_bytes()).unwrap();
                }
                None => thread::sleep(Duration::from_secs(5)),
            }
        });

        (addr, rx)
    }

    #[test]
    fn test_post_roundtrip_against_local_server() {
        let (base, rx) = serve_once(Some(r#"{"success":true}"#));
        let transport = HttpTransport::new(&Config {
            enable_connection_pool: true,
            ..Default::default()
        });

        let request = Request::post(format!("{base}/data"))
            .header("ACCESS_KEY", "ak")
            .body(br#"{"data":1}"#.to_vec())
            .timeout(Some(Duration::from_secs(5)));

        let response = transport.send(request).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, br#"{"success":true}"#);
        assert_eq!(response.headers.get("x-test").map(String::as_str), Some("yes"));

        let (head, body) = rx.recv().unwrap();
        assert!(head.starts_with("POST /data HTTP/1.1"));
        assert!(head.to_ascii_lowercase().contains("access_key: ak"));
        assert_eq!(body, br#"{"data":1}"#);
    }

    #[test]
    fn test_zero_timeout_does_not_bound_calls() {
        let (base, rx) = serve_once(Some(r#"{"success":true}"#));
        let config = Config {
            timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        let transport = HttpTransport::new(&config);

        let request = Request::post(format!("{base}/end")).timeout(config.timeout);
        let response = transport.send(request).unwrap();

        assert_eq!(response.status, 200);
        let (head, body) = rx.recv().unwrap();
        assert!(head.starts_with("POST /end HTTP/1.1"));
        assert!(body.is_empty());
    }

    #[test]
    fn test_deadline_bounds_read() {
        let (base, _rx) = serve_once(None);
        let transport = HttpTransport::new(&Config::default());

        let started = std::time::Instant::now();
        let request = Request::post(format!("{base}/data")).timeout(Some(Duration::from_millis(200)));
        let result = transport.send(request);

        assert!(matches!(result, Err(TransportError::Timeout)), "{result:?}");
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_connection_refused_is_connect_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport = HttpTransport::new(&Config::default());

        let result = transport.send(Request::post(format!("http://127.0.0.1:{port}/data")));
        assert!(matches!(result, Err(TransportError::Connect(_))), "{result:?}");
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://api.pogr.io/v1/intake/data").unwrap(), "api.pogr.io");
        assert_eq!(host_of("http://127.0.0.1:8080/x").unwrap(), "127.0.0.1:8080");
        assert!(host_of("not a url").is_err());
    }
}
