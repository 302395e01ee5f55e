//! The verdict client: hash lookup, streamed upload, and report polling.
//!
//! [`VerdictClient`] owns the public scanning contract. A scan either yields
//! a [`VerdictReport`] or fails with an explicit [`VerdictError`]; there is
//! no partial terminal state. The flow for a file is hash-first: compute the
//! SHA-256 locally, ask the service for a report, and only upload the
//! content when the service has never seen the hash.

pub mod config;

use std::path::Path;
use std::time::Instant;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::Deserialize;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use crate::auth::credentials::Credentials;
use crate::auth::token_cache::TokenCache;
use crate::core::error::{VerdictError, VerdictResult};
use crate::core::hash::Sha256;
use crate::core::report::{Verdict, VerdictReport};
use crate::http::exchange::HttpExchange;

pub use config::VerdictConfig;

/// Body of a completed (HTTP 200) report response.
#[derive(Debug, Deserialize)]
struct ReportBody {
    sha256: Option<String>,
    #[serde(default)]
    verdict: Verdict,
}

/// An authenticated client for a file-reputation service.
///
/// All operations are async and complete their network round trips before
/// returning; the client spawns no background tasks. One pooled HTTP
/// transport is shared by report lookups, uploads, and token fetches, and
/// supports concurrent in-flight requests, so a single client instance can
/// be used from multiple tasks. The only mutable state is the cached access
/// token inside [`TokenCache`].
///
/// An in-progress poll can be aborted externally by dropping the future or
/// racing it with `tokio::time::timeout`; the built-in bound is
/// [`VerdictConfig::max_poll_time`].
///
/// # Examples
///
/// ```rust,ignore
/// use verdictbridge::{Credentials, VerdictClient, VerdictConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = Credentials::new(
///         std::env::var("CLIENT_ID")?,
///         std::env::var("CLIENT_SECRET")?,
///         std::env::var("TOKEN_URL")?,
///     );
///     let client = VerdictClient::new(
///         VerdictConfig::new(std::env::var("VAAS_URL")?),
///         credentials,
///     )?;
///
///     let report = client.for_file("eicar.com").await?;
///     println!("{report}");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct VerdictClient {
    config: VerdictConfig,
    exchange: HttpExchange,
    token_cache: TokenCache,
}

impl VerdictClient {
    /// Creates a client for the configured service endpoint.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the base URL is invalid or the HTTP
    /// transport cannot be constructed.
    pub fn new(config: VerdictConfig, credentials: Credentials) -> VerdictResult<Self> {
        url::Url::parse(&config.base_url).map_err(|e| {
            VerdictError::configuration(format!("invalid base URL '{}': {e}", config.base_url))
        })?;
        let exchange = HttpExchange::new(config.timeout)?;
        let token_cache = TokenCache::new(credentials, exchange.clone());
        Ok(Self {
            config,
            exchange,
            token_cache,
        })
    }

    /// Returns the report for the file at the given path.
    ///
    /// The file is hashed locally first. If the service already knows the
    /// hash the report comes back without any upload; otherwise the file is
    /// uploaded and the resulting hash is polled until analysis completes.
    ///
    /// # Errors
    ///
    /// `FileNotFound` / `Io` for local read failures, otherwise any error
    /// from [`Self::for_sha256`] or [`Self::for_stream`].
    pub async fn for_file(&self, path: impl AsRef<Path>) -> VerdictResult<VerdictReport> {
        let path = path.as_ref();
        let sha256 = Sha256::of_file(path).await?;

        let report = self.for_sha256(&sha256).await?;
        if report.verdict() != Verdict::Unknown {
            return Ok(report);
        }

        tracing::debug!(%sha256, "content unknown to the service, uploading");
        let file = tokio::fs::File::open(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VerdictError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                VerdictError::Io(e)
            }
        })?;
        let content_length = file.metadata().await?.len();
        self.for_stream(file, content_length).await
    }

    /// Uploads a byte stream of known length and returns its report.
    ///
    /// The reader is consumed by the upload; the hash is derived from the
    /// resource location the service assigns, then polled for a verdict.
    pub async fn for_stream<R>(
        &self,
        reader: R,
        content_length: u64,
    ) -> VerdictResult<VerdictReport>
    where
        R: AsyncRead + Send + 'static,
    {
        let location = self.upload(reader, content_length).await?;
        let segment = last_path_segment(&location);
        let sha256 = segment.parse::<Sha256>().map_err(|_| {
            VerdictError::malformed_response(
                &location,
                format!("upload location does not end in a SHA-256 hash: '{segment}'"),
            )
        })?;
        self.for_sha256(&sha256).await
    }

    /// Returns the report for a content hash, polling while analysis runs.
    ///
    /// The report endpoint's status code drives the state machine:
    ///
    /// - `404` - the service has never seen this content; an `Unknown`
    ///   report is returned immediately.
    /// - `200` - analysis complete; the verdict is returned.
    /// - `202` - analysis pending; the client sleeps (capped exponential
    ///   backoff), refreshes its token if needed, and asks again.
    ///
    /// # Errors
    ///
    /// `PollTimeout` once [`VerdictConfig::max_poll_time`] is exhausted,
    /// `UnexpectedStatus` for any other status code, plus token and
    /// transport errors.
    pub async fn for_sha256(&self, sha256: &Sha256) -> VerdictResult<VerdictReport> {
        let endpoint = format!("{}/files/{}/report", self.config.base_url, sha256);
        let started = Instant::now();
        let mut delay = self.config.poll_interval;

        loop {
            // Token is re-checked every iteration; it may have expired
            // while we were waiting on a pending analysis.
            let token = self.token_cache.get_access_token().await?;

            let reply = self
                .exchange
                .execute(self.exchange.get(&endpoint).bearer_auth(&token))
                .await?;

            match reply.status().as_u16() {
                200 => {
                    let body: ReportBody = reply.json()?;
                    if let Some(reported) = &body.sha256 {
                        if reported != sha256.as_str() {
                            tracing::warn!(
                                requested = %sha256,
                                reported = %reported,
                                "report body carries a different hash than requested"
                            );
                        }
                    }
                    return Ok(VerdictReport::new(sha256.clone(), body.verdict));
                }
                404 => {
                    return Ok(VerdictReport::new(sha256.clone(), Verdict::Unknown));
                }
                202 => {
                    let elapsed = started.elapsed();
                    if elapsed >= self.config.max_poll_time {
                        return Err(VerdictError::PollTimeout {
                            sha256: sha256.to_string(),
                            elapsed,
                        });
                    }
                    tracing::debug!(%sha256, delay_ms = delay.as_millis() as u64, "analysis pending");
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(self.config.max_poll_interval);
                }
                status => {
                    return Err(VerdictError::unexpected_status(&endpoint, status));
                }
            }
        }
    }

    /// Uploads a byte stream and returns the URL of the created resource.
    ///
    /// Issues an authenticated `POST {base}/files` with
    /// `Content-Type: application/octet-stream`, an explicit content length,
    /// and the reader as a streamed body. The final path segment of the
    /// returned location is the content's SHA-256.
    ///
    /// # Errors
    ///
    /// `UnexpectedStatus` for anything but `201 Created`, and
    /// `MalformedResponse` if the 201 reply lacks a `Location` header.
    pub async fn upload<R>(&self, reader: R, content_length: u64) -> VerdictResult<String>
    where
        R: AsyncRead + Send + 'static,
    {
        let token = self.token_cache.get_access_token().await?;
        let endpoint = format!("{}/files", self.config.base_url);

        let request = self
            .exchange
            .post(&endpoint)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONTENT_LENGTH, content_length)
            .body(reqwest::Body::wrap_stream(ReaderStream::new(reader)));
        let reply = self.exchange.execute(request).await?;

        if reply.status().as_u16() != 201 {
            return Err(VerdictError::unexpected_status(
                &endpoint,
                reply.status().as_u16(),
            ));
        }

        let location = reply.location().ok_or_else(|| {
            VerdictError::malformed_response(&endpoint, "no Location header in 201 response")
        })?;
        tracing::debug!(location, bytes = content_length, "upload accepted");
        Ok(self.resolve_location(location))
    }

    /// Resolves a `Location` header value against the service base URL.
    fn resolve_location(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            location.to_owned()
        } else {
            format!("{}{}", self.config.base_url, location)
        }
    }
}

/// Returns the final path segment of a URL or path.
fn last_path_segment(url: &str) -> &str {
    url.trim_end_matches('/').rsplit('/').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn report_path(sha256: &str) -> String {
        format!("/files/{sha256}/report")
    }

    async fn mount_token_endpoint(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "test-token",
                "expires_in": 3600
            })))
            .mount(server)
            .await;
    }

    fn test_client(server: &MockServer) -> VerdictClient {
        let config = VerdictConfig::new(server.uri())
            .with_poll_interval(Duration::from_millis(10))
            .with_max_poll_interval(Duration::from_millis(40));
        let credentials =
            Credentials::new("test-client", "test-secret", format!("{}/token", server.uri()));
        VerdictClient::new(config, credentials).unwrap()
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(last_path_segment("/files/abc123"), "abc123");
        assert_eq!(
            last_path_segment("https://gateway.example.com/files/abc123"),
            "abc123"
        );
        assert_eq!(last_path_segment("abc123"), "abc123");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let credentials = Credentials::new("id", "secret", "https://idp.example/token");
        let err =
            VerdictClient::new(VerdictConfig::new("not a url"), credentials).unwrap_err();
        assert!(matches!(err, VerdictError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_for_sha256_unknown_hash_returns_immediately() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server).await;
        Mock::given(method("GET"))
            .and(path(report_path(EMPTY_SHA256)))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let sha256: Sha256 = EMPTY_SHA256.parse().unwrap();
        let report = client.for_sha256(&sha256).await.unwrap();

        assert_eq!(report.verdict(), Verdict::Unknown);
        assert_eq!(report.sha256(), &sha256);
    }

    #[tokio::test]
    async fn test_for_sha256_polls_until_complete() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server).await;
        // Pending twice, then a completed report
        Mock::given(method("GET"))
            .and(path(report_path(EMPTY_SHA256)))
            .respond_with(ResponseTemplate::new(202))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(report_path(EMPTY_SHA256)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sha256": EMPTY_SHA256,
                "verdict": "Clean"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let report = client
            .for_sha256(&EMPTY_SHA256.parse().unwrap())
            .await
            .unwrap();
        assert_eq!(report.verdict(), Verdict::Clean);
    }

    #[tokio::test]
    async fn test_for_sha256_poll_budget_is_bounded() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server).await;
        Mock::given(method("GET"))
            .and(path(report_path(EMPTY_SHA256)))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let config = VerdictConfig::new(server.uri())
            .with_poll_interval(Duration::from_millis(10))
            .with_max_poll_time(Duration::from_millis(50));
        let credentials =
            Credentials::new("test-client", "test-secret", format!("{}/token", server.uri()));
        let client = VerdictClient::new(config, credentials).unwrap();

        let err = client
            .for_sha256(&EMPTY_SHA256.parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, VerdictError::PollTimeout { .. }));
    }

    #[tokio::test]
    async fn test_for_sha256_unexpected_status_is_an_error() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server).await;
        Mock::given(method("GET"))
            .and(path(report_path(EMPTY_SHA256)))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .for_sha256(&EMPTY_SHA256.parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VerdictError::UnexpectedStatus { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_upload_returns_resource_location() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server).await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .and(header("content-type", "application/octet-stream"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_bytes(b"sample bytes".to_vec()))
            .respond_with(
                ResponseTemplate::new(201).insert_header("Location", "/files/abc123"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let location = client
            .upload(&b"sample bytes"[..], 12)
            .await
            .unwrap();
        assert!(location.ends_with("/files/abc123"));
        assert_eq!(last_path_segment(&location), "abc123");
    }

    #[tokio::test]
    async fn test_upload_without_location_header_is_malformed() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server).await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.upload(&b"data"[..], 4).await.unwrap_err();
        assert!(matches!(err, VerdictError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_upload_rejected_status_is_an_error() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server).await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(ResponseTemplate::new(413))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.upload(&b"data"[..], 4).await.unwrap_err();
        assert!(matches!(
            err,
            VerdictError::UnexpectedStatus { status: 413, .. }
        ));
    }

    #[tokio::test]
    async fn test_for_stream_polls_hash_from_location() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server).await;

        let data = b"streamed sample";
        let sha256 = Sha256::of_bytes(data);
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("Location", format!("/files/{sha256}").as_str()),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(report_path(sha256.as_str())))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sha256": sha256.as_str(),
                "verdict": "Malicious"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let report = client
            .for_stream(&data[..], data.len() as u64)
            .await
            .unwrap();
        assert_eq!(report.verdict(), Verdict::Malicious);
        assert_eq!(report.sha256(), &sha256);
    }

    #[tokio::test]
    async fn test_for_stream_rejects_non_hash_location() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server).await;
        Mock::given(method("POST"))
            .and(path("/files"))
            .respond_with(
                ResponseTemplate::new(201).insert_header("Location", "/files/not-a-hash"),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.for_stream(&b"data"[..], 4).await.unwrap_err();
        assert!(matches!(err, VerdictError::MalformedResponse { .. }));
    }
}
