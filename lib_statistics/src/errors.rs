//! # Error Taxonomy
//!
//! Every failure a stream can terminate with is collected in
//! [`StatisticsError`]. The three upstream failure sources (transport fault,
//! HTTP status rejection, payload decode) all surface on the same channel —
//! the stream's terminal item — and none of them is retried internally.
//! Retry and backoff are entirely the caller's responsibility.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use thiserror::Error;

/// A network-level failure that occurred before any HTTP status existed.
///
/// Produced by the `Transport` implementation: DNS resolution, connection
/// establishment, TLS, or a torn connection mid-response. The originating
/// error is preserved as the `source` for diagnostics.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportFault {
    /// Human-readable description of the fault.
    message: String,
    /// The underlying error, when one is available.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportFault {
    /// Creates a fault from a bare message, without an underlying cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a fault wrapping an underlying error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<reqwest::Error> for TransportFault {
    fn from(error: reqwest::Error) -> Self {
        Self::with_source("http request failed before a response was received", error)
    }
}

/// The terminal error delivered by any stream in this library.
#[derive(Debug, Error)]
pub enum StatisticsError {
    /// The transport failed before any HTTP status was available.
    #[error("network transport failed")]
    Transport(#[source] TransportFault),

    /// The server answered with a status outside the 2xx range.
    #[error("server answered with HTTP status {0}")]
    Status(u16),

    /// The response payload did not match the expected shape.
    /// The serde cause is preserved for diagnostics.
    #[error("response payload did not match the expected shape")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be serialized.
    #[error("request body could not be serialized")]
    Encode(#[source] serde_json::Error),

    /// The data request's address does not end in area and table segments,
    /// so no descriptor address could be derived from it.
    #[error("request address does not end in area and table segments")]
    BadRequestShape,

    /// The base URL and path did not combine into a parseable URL.
    #[error("request address could not be parsed")]
    InvalidAddress(#[source] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_decode_preserves_cause() {
        // 1. Force a serde failure
        let cause = serde_json::from_str::<u32>("not json").unwrap_err();

        // 2. Wrap it the way the decoding stage does
        let error = StatisticsError::Decode(cause);

        // 3. The underlying cause must remain reachable for diagnostics
        assert!(error.source().is_some());
    }

    #[test]
    fn test_transport_fault_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        let fault = TransportFault::with_source("socket torn down", io);
        assert!(fault.source().is_some());
        assert_eq!(fault.to_string(), "socket torn down");
    }
}
