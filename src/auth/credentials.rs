//! Client credentials for the identity provider.

use secrecy::SecretString;

/// OAuth2 client credentials plus the token endpoint they are valid for.
///
/// Immutable for the lifetime of a client instance. The secret is kept
/// behind [`secrecy::SecretString`] so it is redacted from debug output
/// and zeroized on drop.
#[derive(Debug, Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: SecretString,
    token_url: String,
}

impl Credentials {
    /// Creates credentials for a client-credentials grant.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            token_url: token_url.into(),
        }
    }

    /// Returns the client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the guarded client secret.
    pub fn client_secret(&self) -> &SecretString {
        &self.client_secret
    }

    /// Returns the token endpoint URL.
    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}
