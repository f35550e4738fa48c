//! Error types for the intake client.

use thiserror::Error;

/**
 * Failures raised by a `Transport` before any response was obtained.
 *
 * Kept separate from `Error` so custom transports only have to speak
 * about the network, never about envelopes or sessions.
 */
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request's deadline passed before a response arrived.
    #[error("request timed out")]
    Timeout,

    /// DNS, TCP or TLS failure while reaching the host.
    #[error("failed to connect: {0}")]
    Connect(String),

    /// The request could not be built or written.
    #[error("failed to send request: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Too many earlier calls are still stuck in the transport.
    #[error("{outstanding} earlier requests are still stuck in the transport")]
    Saturated { outstanding: usize },
}

/// Intake client error.
#[derive(Debug, Error)]
pub enum Error {
    /// `end_session` was called while no session is active.
    #[error("no active session")]
    NoActiveSession,

    /// Neither a session nor a complete static credential pair is available.
    #[error("no valid authentication method available")]
    NoAuthMethodAvailable,

    #[error("failed to execute request: {0}")]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body is not a well-formed envelope.
    #[error("failed to decode response (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope reported success but lacks the expected payload field.
    #[error("response (HTTP {status}) is missing `{field}`")]
    MissingPayload { status: u16, field: &'static str },

    /// The envelope reported `success: false`.
    #[error("request rejected: {message}")]
    Rejected { status: u16, message: String },

    /// A well-formed, successful envelope arrived with a non-2xx status.
    #[error("unexpected status code: {status}")]
    UnexpectedStatus { status: u16 },
}

impl Error {
    /// `true` if the call was aborted by its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(TransportError::Timeout))
    }

    /// `true` if the intake answered with `success: false`.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::Rejected { .. })
    }

    /// The server-supplied message, if this is an application rejection.
    pub fn rejection_message(&self) -> Option<&str> {
        match self {
            Error::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Result type for intake operations
pub type Result<T> = std::result::Result<T, Error>;
