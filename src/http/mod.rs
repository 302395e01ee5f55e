//! HTTP plumbing shared by the token cache and the verdict client.

pub mod exchange;

pub use exchange::{HttpExchange, ServiceReply};
