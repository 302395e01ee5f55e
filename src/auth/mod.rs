//! Authentication against the identity provider.
//!
//! - [`credentials`] - Client id, guarded secret, and token endpoint
//! - [`token_cache`] - Client-credentials grant with time-based token reuse

pub mod credentials;
pub mod token_cache;

pub use credentials::Credentials;
pub use token_cache::TokenCache;
