//! OAuth2 token acquisition and time-based reuse.
//!
//! The verdict service authenticates every request with a short-lived bearer
//! token from an OIDC identity provider. Fetching one per request would
//! roughly double the request count, so the cache returns the previous token
//! for as long as it is valid and only goes to the network after expiry.

use std::time::{Duration, Instant};

use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::auth::credentials::Credentials;
use crate::core::error::{VerdictError, VerdictResult};
use crate::http::exchange::HttpExchange;

/// A bearer token together with the instant it stops being valid.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Success shape of the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Obtains bearer tokens via the client-credentials grant, reusing a cached
/// token until it expires.
///
/// Safe for concurrent use: the check-then-fetch sequence runs under a
/// single async mutex, so at most one token fetch is in flight per instance
/// and concurrent callers observe either the old valid token or the fully
/// refreshed one, never a torn state.
#[derive(Debug)]
pub struct TokenCache {
    credentials: Credentials,
    exchange: HttpExchange,
    state: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Creates a cache in the "absent" state; the first call always fetches.
    pub fn new(credentials: Credentials, exchange: HttpExchange) -> Self {
        Self {
            credentials,
            exchange,
            state: Mutex::new(None),
        }
    }

    /// Returns a valid access token, fetching a new one only when necessary.
    ///
    /// # Errors
    ///
    /// - `Authentication` if the identity provider replies 401 or the body
    ///   carries an OAuth `error` field. Not retryable with the same
    ///   credentials.
    /// - `UnexpectedStatus` for any other non-200 reply (transient).
    /// - `Transport` / `MalformedResponse` per [`HttpExchange::execute`].
    pub async fn get_access_token(&self) -> VerdictResult<String> {
        let mut state = self.state.lock().await;

        let now = Instant::now();
        if let Some(cached) = state.as_ref() {
            if now < cached.expires_at {
                tracing::trace!("reusing cached access token");
                return Ok(cached.access_token.clone());
            }
        }

        let request = self
            .exchange
            .post(self.credentials.token_url())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.client_id()),
                (
                    "client_secret",
                    self.credentials.client_secret().expose_secret(),
                ),
            ]);
        let reply = self.exchange.execute(request).await?;

        let status = reply.status().as_u16();
        if status == 401 || reply.has_field("error") {
            let reason = reply
                .field_str("error_description")
                .or_else(|| reply.field_str("error"))
                .unwrap_or("unknown error")
                .to_owned();
            return Err(VerdictError::authentication(reason));
        }
        if status != 200 {
            return Err(VerdictError::unexpected_status(reply.endpoint(), status));
        }

        let token: TokenResponse = reply.json()?;
        tracing::debug!(expires_in = token.expires_in, "fetched new access token");
        *state = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: now + Duration::from_secs(token.expires_in),
        });

        Ok(token.access_token)
    }
}
