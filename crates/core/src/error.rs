//! Client error taxonomy and mutation acknowledgments.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the client's data-access operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Failure of a data-access operation.
///
/// Remote failures never panic or propagate as exceptions; operations catch
/// gateway failures at their boundary and return one of these. Local-first
/// operations stay available even when every remote call fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The remote endpoint is still set to the reserved placeholder.
    #[error("remote endpoint is not configured")]
    Unconfigured,

    /// Registration hit an existing account with the same email.
    #[error("email is already registered")]
    DuplicateAccount,

    /// No account matched the email/password pair, locally or remotely.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Transport-level failure (DNS, connection reset, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The per-call deadline expired and the request was cancelled.
    #[error("request timed out")]
    Timeout,

    /// The remote answered with a non-success HTTP status.
    #[error("remote returned HTTP {0}")]
    Http(u16),

    /// The body was HTTP-ok but not in the expected structured format.
    ///
    /// Most mutations downgrade this to an implicit success per their call
    /// policy; it only surfaces where a parsed body is required.
    #[error("unexpected response body: {0}")]
    Parse(String),

    /// A queued delivery was dropped after exceeding the retry limit.
    #[error("dropped after retry limit")]
    RetryExhausted,

    /// The local durable store failed; fatal to the operation.
    #[error("local store failure: {0}")]
    Store(String),
}

impl ClientError {
    pub fn network(cause: impl Into<String>) -> Self {
        Self::Network(cause.into())
    }

    pub fn parse(cause: impl Into<String>) -> Self {
        Self::Parse(cause.into())
    }

    pub fn store(cause: impl Into<String>) -> Self {
        Self::Store(cause.into())
    }
}

/// Acknowledgment of a remote mutation.
///
/// `verified` distinguishes a confirmed remote outcome (parsed `success`
/// envelope) from an optimistic one: opaque dispatches and
/// unparseable-but-HTTP-ok bodies report success without the remote ever
/// confirming the mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
    pub verified: bool,
}

impl Ack {
    /// The remote confirmed the outcome in a parsed envelope.
    pub fn confirmed(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            verified: true,
        }
    }

    /// Success reported without a confirming body (implicit success or
    /// fire-and-forget dispatch).
    pub fn unverified(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            verified: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unverified_ack_reports_success() {
        let ack = Ack::unverified("dispatched");
        assert!(ack.success);
        assert!(!ack.verified);
    }

    #[test]
    fn confirmed_ack_carries_remote_verdict() {
        let ack = Ack::confirmed(false, "out of stock");
        assert!(!ack.success);
        assert!(ack.verified);
    }

    #[test]
    fn errors_render_without_internals() {
        assert_eq!(
            ClientError::Unconfigured.to_string(),
            "remote endpoint is not configured"
        );
        assert_eq!(ClientError::Http(502).to_string(), "remote returned HTTP 502");
    }
}
