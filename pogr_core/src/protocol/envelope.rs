/**
 * Response envelope interpretation.
 *
 * Every endpoint answers with the same wrapper:
 * ```json
 * { "success": true, "error": null, "payload": { ... } }
 * ```
 * The payload shape is not tagged on the wire; the call site knows which
 * family it is reading (init, data, or generic).
 *
 * Checks run in a fixed order, each yielding a distinct error:
 * 1. body is not a well-formed envelope → `Error::Decode`
 * 2. `success == false` → `Error::Rejected` carrying the server message
 * 3. status outside 2xx → `Error::UnexpectedStatus`
 * 4. success payload lacks its identifier → `Error::MissingPayload`
 */
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::transport::Response;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,

    #[serde(default)]
    error: Option<String>,

    payload: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdPayload {
    #[serde(default, alias = "id")]
    data_id: Option<String>,
}

/// Decodes an init response and returns the issued session id.
pub(crate) fn session_id(response: &Response) -> Result<String> {
    let payload: Option<SessionPayload> = open(response)?;
    non_empty(payload.and_then(|p| p.session_id), response.status, "session_id")
}

/// Decodes a submission response and returns the stored record's id.
pub(crate) fn data_id(response: &Response) -> Result<String> {
    let payload: Option<IdPayload> = open(response)?;
    non_empty(payload.and_then(|p| p.data_id), response.status, "data_id")
}

/// Decodes a response that carries no payload.
pub(crate) fn generic(response: &Response) -> Result<()> {
    open::<IgnoredAny>(response).map(|_| ())
}

fn open<T: DeserializeOwned>(response: &Response) -> Result<Option<T>> {
    let status = response.status;

    let envelope: Envelope<T> = serde_json::from_slice(&response.body)
        .map_err(|source| Error::Decode { status, source })?;

    if !envelope.success {
        let message = envelope.error.unwrap_or_default();
        tracing::warn!(status, %message, "intake rejected request");
        return Err(Error::Rejected { status, message });
    }

    if !(200..300).contains(&status) {
        tracing::warn!(status, "intake answered with unexpected status");
        return Err(Error::UnexpectedStatus { status });
    }

    Ok(envelope.payload)
}

fn non_empty(value: Option<String>, status: u16, field: &'static str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::MissingPayload { status, field }),
    }
}
