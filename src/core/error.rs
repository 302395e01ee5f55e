//! Error types for the verdictbridge library.
//!
//! This module provides structured, typed errors for all failure scenarios.
//! The library never panics; all errors are returned as `Result` values.
//! Callers match on the variant to decide between retrying later, fixing
//! credentials, or giving up on the file.

use std::time::Duration;
use thiserror::Error;

/// The main error type for verdict operations.
///
/// Variants fall into four families: authentication failures (fix the
/// credentials before retrying), service-communication failures (transport
/// errors and unexpected HTTP statuses, retryable later), malformed
/// responses (fatal for the call), and local I/O failures.
#[derive(Debug, Error)]
pub enum VerdictError {
    /// The identity provider rejected the credentials.
    ///
    /// Retrying with the same credentials will not help.
    #[error("authentication failed: {reason}")]
    Authentication {
        /// OAuth error description reported by the identity provider.
        reason: String,
    },

    /// A transport-level failure: connection refused, DNS, timeout.
    #[error("request to '{endpoint}' failed: {source}")]
    Transport {
        /// The endpoint that could not be reached.
        endpoint: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The service replied with an HTTP status the protocol does not define.
    #[error("unexpected HTTP response code {status} from '{endpoint}'")]
    UnexpectedStatus {
        /// The endpoint that produced the status.
        endpoint: String,
        /// The offending status code.
        status: u16,
    },

    /// A response body was present but was not the JSON the protocol expects.
    #[error("malformed response from '{endpoint}': {details}")]
    MalformedResponse {
        /// The endpoint that produced the body.
        endpoint: String,
        /// What was wrong with the body.
        details: String,
    },

    /// An I/O error occurred while reading local file content.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found at the specified path.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },

    /// A string is not a valid SHA-256 hex digest.
    #[error("invalid SHA-256 hash '{input}'")]
    InvalidHash {
        /// The rejected input.
        input: String,
    },

    /// Analysis was still pending when the poll budget ran out.
    #[error("no verdict for {sha256} after {elapsed:?}")]
    PollTimeout {
        /// Hash whose report never became terminal.
        sha256: String,
        /// How long the client polled before giving up.
        elapsed: Duration,
    },

    /// The client was misconfigured or could not be constructed.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl VerdictError {
    /// Returns `true` if this error is recoverable (can be retried later).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::UnexpectedStatus { .. } | Self::PollTimeout { .. }
        )
    }

    /// Returns `true` if the credentials must be fixed before retrying.
    pub fn requires_new_credentials(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns the remote endpoint involved, if this error carries one.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::UnexpectedStatus { endpoint, .. }
            | Self::MalformedResponse { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    /// Creates an `Authentication` error.
    pub fn authentication(reason: impl Into<String>) -> Self {
        Self::Authentication {
            reason: reason.into(),
        }
    }

    /// Creates an `UnexpectedStatus` error.
    pub fn unexpected_status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::UnexpectedStatus {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Creates a `MalformedResponse` error.
    pub fn malformed_response(endpoint: impl Into<String>, details: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            details: details.into(),
        }
    }

    /// Creates an `InvalidHash` error.
    pub fn invalid_hash(input: impl Into<String>) -> Self {
        Self::InvalidHash {
            input: input.into(),
        }
    }

    /// Creates a `Configuration` error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// A specialized `Result` type for verdict operations.
pub type VerdictResult<T> = Result<T, VerdictError>;
