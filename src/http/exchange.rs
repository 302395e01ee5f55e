//! Single authenticated request/response cycles.
//!
//! `HttpExchange` performs one HTTP round trip and surfaces the status code,
//! the `Location` header, and the parsed JSON body (if any) uniformly.
//! Every call builds a fresh, fully-specified request; no builder state is
//! shared across calls.

use std::time::Duration;

use reqwest::header::LOCATION;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::core::error::{VerdictError, VerdictResult};

/// User agent sent on every request, identifying the SDK and its version.
pub(crate) const USER_AGENT: &str = concat!("verdictbridge/", env!("CARGO_PKG_VERSION"));

/// A thin wrapper around a pooled HTTP client.
///
/// `reqwest::Client` is an `Arc` around a connection pool, so cloning an
/// exchange is cheap and concurrent in-flight requests through the same
/// exchange are safe. This is the transport-sharing choice the crate
/// documents: one pool per client instance, shared by all operations.
#[derive(Debug, Clone)]
pub struct HttpExchange {
    client: reqwest::Client,
}

impl HttpExchange {
    /// Creates an exchange with the SDK user agent and the given timeout.
    pub fn new(timeout: Duration) -> VerdictResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                VerdictError::configuration(format!("failed to create HTTP client: {e}"))
            })?;
        Ok(Self { client })
    }

    /// Starts building a GET request.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    /// Starts building a POST request.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url)
    }

    /// Executes one request and captures status, `Location`, and JSON body.
    ///
    /// # Errors
    ///
    /// - `Transport` for connection, DNS, or timeout failures.
    /// - `MalformedResponse` if a non-empty body is not valid JSON. An empty
    ///   body is valid and yields a reply without a body value.
    pub async fn execute(&self, request: RequestBuilder) -> VerdictResult<ServiceReply> {
        let request = request.build().map_err(|e| {
            VerdictError::configuration(format!("failed to build request: {e}"))
        })?;
        let endpoint = request.url().to_string();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| VerdictError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let text = response
            .text()
            .await
            .map_err(|source| VerdictError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let body = if text.is_empty() {
            None
        } else {
            let value = serde_json::from_str(&text).map_err(|e| {
                VerdictError::malformed_response(&endpoint, format!("invalid JSON: {e}"))
            })?;
            Some(value)
        };

        Ok(ServiceReply {
            endpoint,
            status,
            location,
            body,
        })
    }
}

/// The outcome of one request: status code, `Location` header, parsed body.
#[derive(Debug)]
pub struct ServiceReply {
    endpoint: String,
    status: StatusCode,
    location: Option<String>,
    body: Option<serde_json::Value>,
}

impl ServiceReply {
    /// Returns the HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the endpoint the reply came from.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the `Location` response header, if present.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns `true` if the response body carried a given JSON field.
    pub fn has_field(&self, field: &str) -> bool {
        self.body
            .as_ref()
            .map(|v| v.get(field).is_some())
            .unwrap_or(false)
    }

    /// Returns a string field from the JSON body, if present.
    pub fn field_str(&self, field: &str) -> Option<&str> {
        self.body.as_ref()?.get(field)?.as_str()
    }

    /// Deserializes the JSON body into the expected shape.
    ///
    /// # Errors
    ///
    /// Returns `MalformedResponse` if the body is absent or does not match.
    pub fn json<T: DeserializeOwned>(&self) -> VerdictResult<T> {
        let body = self.body.clone().ok_or_else(|| {
            VerdictError::malformed_response(&self.endpoint, "empty response body")
        })?;
        serde_json::from_value(body).map_err(|e| {
            VerdictError::malformed_response(&self.endpoint, format!("unexpected shape: {e}"))
        })
    }
}
