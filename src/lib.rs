//! # Verdictbridge
//!
//! An async client for file-reputation ("verdict") services: given a file or
//! its SHA-256 hash, the client authenticates, looks the content up, uploads
//! it if the service has never seen it, and returns a classification.
//!
//! ## Overview
//!
//! Verdictbridge handles the full authenticated request lifecycle:
//!
//! - Obtain OAuth2 bearer tokens via the client-credentials grant, reusing
//!   a cached token until it expires
//! - Hash files with streaming SHA-256 so content the service already knows
//!   is never uploaded
//! - Upload unknown content as a streamed request body of known length
//! - Poll the report endpoint with capped exponential backoff while the
//!   service analyzes the submission
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use verdictbridge::{Credentials, Verdict, VerdictClient, VerdictConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::new(
//!         "my-client-id",
//!         "my-client-secret",
//!         "https://idp.example.com/token",
//!     );
//!     let client = VerdictClient::new(
//!         VerdictConfig::new("https://gateway.example.com"),
//!         credentials,
//!     )?;
//!
//!     let report = client.for_file("suspicious.exe").await?;
//!     if report.verdict() == Verdict::Malicious {
//!         println!("do not run this: {report}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a [`VerdictError`] variant callers can match on:
//! authentication failures require new credentials, transport failures and
//! unexpected statuses are retryable later ([`VerdictError::is_recoverable`]),
//! malformed responses and local I/O failures are fatal for the call.
//!
//! ## Architecture
//!
//! - **Core**: content hashes, verdicts, reports, and error types
//! - **Auth**: credentials and the mutex-guarded token cache
//! - **Http**: single request/response cycles over a pooled transport
//! - **Client**: the scan state machine (hash, lookup, upload, poll)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod core;
pub mod http;

// Re-export commonly used types at the crate root
pub use crate::auth::{Credentials, TokenCache};
pub use crate::client::{VerdictClient, VerdictConfig};
pub use crate::core::{Sha256, Verdict, VerdictError, VerdictReport, VerdictResult};
pub use crate::http::{HttpExchange, ServiceReply};
