//! Error types for the Waypoint discovery client.

use std::time::Duration;

/// Transport-level errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// IO error from the underlying transport
    #[error("io error: {0}")]
    Io(std::sync::Arc<std::io::Error>),

    /// Failed to connect a socket to the remote endpoint
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Failed to hand the message to the transport
    #[error("send failed: {0}")]
    Send(String),

    /// Failed while waiting for the reply
    #[error("receive failed: {0}")]
    Receive(String),

    /// Channel was closed before a reply arrived
    #[error("channel closed")]
    ChannelClosed,
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(std::sync::Arc::new(e))
    }
}

/// Codec errors for envelope encoding and decoding.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CodecError {
    /// Envelope could not be serialized
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Payload is not valid JSON or not a JSON object
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Payload is a JSON object but lacks a required member
    #[error("missing field: {0}")]
    MissingField(&'static str),
}

/// Why a single resolution attempt was abandoned.
///
/// These never reach the caller: the resolution engine logs them and
/// moves on to the next attempt.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AttemptError {
    /// The round-trip channel failed before a reply arrived
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// No reply within the per-attempt deadline
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// A reply arrived but was not a well-formed envelope
    #[error("decode error: {0}")]
    Decode(#[from] CodecError),
}

/// Terminal errors surfaced by `whereis`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Every attempt ended in a timeout, transport error, or decode error.
    #[error("not able to contact {host} after {attempts} attempts")]
    ExhaustedRetries {
        /// Registry host that was queried
        host: String,
        /// Number of attempts made
        attempts: u32,
    },
}

impl ResolveError {
    /// Create an exhausted-retries error.
    #[must_use]
    pub fn exhausted(host: impl Into<String>, attempts: u32) -> Self {
        Self::ExhaustedRetries {
            host: host.into(),
            attempts,
        }
    }

    /// Registry host the failed resolution was addressed to.
    #[must_use]
    pub fn host(&self) -> &str {
        match self {
            Self::ExhaustedRetries { host, .. } => host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResolveError::exhausted("registry1", 3);
        assert_eq!(
            err.to_string(),
            "not able to contact registry1 after 3 attempts"
        );
        assert_eq!(err.host(), "registry1");
    }

    #[test]
    fn test_attempt_error_from() {
        let err: AttemptError = TransportError::ChannelClosed.into();
        assert!(matches!(err, AttemptError::Transport(TransportError::ChannelClosed)));

        let err: AttemptError = CodecError::MissingField("result").into();
        assert_eq!(err.to_string(), "decode error: missing field: result");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::from(io);
        assert!(matches!(err, TransportError::Io(_)));
        assert!(err.to_string().contains("refused"));
    }
}
