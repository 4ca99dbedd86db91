//! # Transport Layer
//!
//! This module provides the boundary between the reactive engine and the
//! actual network. A [`Transport`] performs exactly one HTTP exchange and
//! reports back the payload bytes plus the numeric status; everything above
//! it (validation, decoding, delivery) lives in the stream engine.
//!
//! The production implementation, [`HttpTransport`], is a thin wrapper
//! around `reqwest`. Tests substitute their own `Transport` to drive the
//! engine without touching the network.
//!
//! Cancellation contract: dropping the future returned by [`Transport::send`]
//! must abort the exchange where the underlying client supports it
//! (`reqwest` does), or at worst abandon its eventual result.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use bytes::Bytes;
use futures_util::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use url::Url;

use crate::errors::{StatisticsError, TransportFault};

/// # Exchange
///
/// One HTTP request/response round trip. An exchange is owned by exactly one
/// stream instance and is never reused.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// The HTTP verb.
    pub method: Method,
    /// The absolute target URL.
    pub url: Url,
    /// An optional JSON request body.
    pub body: Option<Bytes>,
}

impl Exchange {
    /// Creates a GET exchange without a body.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            body: None,
        }
    }

    /// Creates a POST exchange, optionally carrying a JSON body.
    pub fn post(url: Url, body: Option<Bytes>) -> Self {
        Self {
            method: Method::POST,
            url,
            body,
        }
    }
}

/// # Raw Response
///
/// The transport-level result of an exchange: payload bytes plus the numeric
/// HTTP status, before any validation or decoding has happened.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The numeric HTTP status code.
    pub status: u16,
    /// The raw response body.
    pub payload: Bytes,
}

/// # Transport Collaborator
///
/// Performs a single, cancellable HTTP exchange. Implementations must not
/// retry: retry policy is explicitly the caller's concern.
pub trait Transport: Send + Sync {
    /// Executes the exchange, resolving to the raw payload and status, or to
    /// a [`TransportFault`] if the network failed before a status existed.
    fn send(&self, exchange: Exchange) -> BoxFuture<'static, Result<RawResponse, TransportFault>>;
}

/// # HTTP Transport
///
/// The `reqwest`-backed production [`Transport`]. The inner client is cheap
/// to clone (it is an `Arc` internally) and is reused across exchanges for
/// connection reuse.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    /// The underlying reqwest client.
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport around an existing `reqwest` client, allowing the
    /// caller to control timeouts, proxies, or TLS settings.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn send(&self, exchange: Exchange) -> BoxFuture<'static, Result<RawResponse, TransportFault>> {
        let client = self.client.clone();
        Box::pin(async move {
            // 1. Assemble the request from the exchange description
            let mut request = client.request(exchange.method, exchange.url);
            if let Some(body) = exchange.body {
                request = request.header(CONTENT_TYPE, "application/json").body(body);
            }

            // 2. Execute and capture the status before consuming the body
            let response = request.send().await.map_err(TransportFault::from)?;
            let status = response.status().as_u16();

            // 3. Pull the full payload; a torn connection here is still a
            //    transport fault, not a status error
            let payload = response.bytes().await.map_err(TransportFault::from)?;

            Ok(RawResponse { status, payload })
        })
    }
}

/// Validates a raw transport result, accepting only 2xx statuses.
///
/// This is a pure function with no side effects: a passing status yields the
/// payload untouched, anything else becomes [`StatisticsError::Status`]
/// tagged with the numeric code.
pub fn validate(response: RawResponse) -> Result<Bytes, StatisticsError> {
    if (200..=299).contains(&response.status) {
        Ok(response.payload)
    } else {
        Err(StatisticsError::Status(response.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16) -> RawResponse {
        RawResponse {
            status,
            payload: Bytes::from_static(b"{}"),
        }
    }

    #[test]
    fn test_validate_accepts_2xx() {
        assert!(validate(raw(200)).is_ok());
        assert!(validate(raw(204)).is_ok());
        assert!(validate(raw(299)).is_ok());
    }

    #[test]
    fn test_validate_rejects_outside_2xx_with_status() {
        // A 404 must surface as Status(404), not a generic fault
        match validate(raw(404)) {
            Err(StatisticsError::Status(code)) => assert_eq!(code, 404),
            other => panic!("expected Status(404), got {:?}", other.map(|_| ())),
        }
        assert!(matches!(
            validate(raw(500)),
            Err(StatisticsError::Status(500))
        ));
        assert!(matches!(
            validate(raw(199)),
            Err(StatisticsError::Status(199))
        ));
    }
}
