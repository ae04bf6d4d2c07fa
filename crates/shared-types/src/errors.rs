//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// Errors raised while decoding addresses, hashes, amounts or identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input was not valid hex.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded bytes had the wrong length.
    #[error("Invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    /// Input was not a base-10 integer.
    #[error("Invalid decimal amount: {0}")]
    InvalidDecimal(String),

    /// Unknown network name.
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),
}

/// Failure talking to a remote collaborator (execution client, mirror, ...).
///
/// Every variant names the endpoint that was attempted. Transport errors are
/// never retried by the component that observed them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The endpoint could not be reached.
    #[error("{endpoint} unreachable: {reason}")]
    Unreachable { endpoint: String, reason: String },

    /// The call did not complete before its deadline.
    #[error("{endpoint} timed out after {after_ms}ms")]
    Timeout { endpoint: String, after_ms: u64 },

    /// The endpoint answered with a non-success HTTP status.
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    /// The endpoint answered with a JSON-RPC error object.
    #[error("{endpoint} returned RPC error: {message}")]
    Rpc { endpoint: String, message: String },

    /// The response body could not be decoded.
    #[error("{endpoint} returned an undecodable response: {reason}")]
    Decode { endpoint: String, reason: String },
}

impl TransportError {
    /// Whether a later attempt against the same endpoint may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Unreachable { .. }
                | TransportError::Timeout { .. }
                | TransportError::Status { .. }
        )
    }

    /// The endpoint this error was observed on.
    pub fn endpoint(&self) -> &str {
        match self {
            TransportError::Unreachable { endpoint, .. }
            | TransportError::Timeout { endpoint, .. }
            | TransportError::Status { endpoint, .. }
            | TransportError::Rpc { endpoint, .. }
            | TransportError::Decode { endpoint, .. } => endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_retryable() {
        let err = TransportError::Timeout {
            endpoint: "http://ec:8545".to_string(),
            after_ms: 500,
        };
        assert!(err.is_retryable());
        assert!(err.to_string().contains("500ms"));
        assert_eq!(err.endpoint(), "http://ec:8545");
    }

    #[test]
    fn test_decode_is_not_retryable() {
        let err = TransportError::Decode {
            endpoint: "ec".to_string(),
            reason: "bad json".to_string(),
        };
        assert!(!err.is_retryable());
    }
}
