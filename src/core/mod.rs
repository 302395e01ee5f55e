//! Core types for the verdictbridge library.
//!
//! - [`error`] - Structured error types
//! - [`hash`] - SHA-256 content identifiers and streaming digests
//! - [`report`] - Verdicts and analysis reports

pub mod error;
pub mod hash;
pub mod report;

// Re-export commonly used types at the core level
pub use error::{VerdictError, VerdictResult};
pub use hash::Sha256;
pub use report::{Verdict, VerdictReport};
