//! SHA-256 content identifiers.
//!
//! The verdict service addresses file content by its SHA-256 digest, both as
//! the cache key for lookups and as the path segment identifying a report
//! resource. This module provides the `Sha256` newtype plus streaming digest
//! computation that never loads a whole file into memory.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use sha2::{Digest, Sha256 as Sha256Digest};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::core::error::{VerdictError, VerdictResult};

/// Read buffer size for streaming digests.
const CHUNK_SIZE: usize = 64 * 1024;

/// A validated SHA-256 content hash: 64 lowercase hex characters.
///
/// Identical byte content always yields an identical hash regardless of
/// path, filesystem, or platform.
///
/// # Examples
///
/// ```rust
/// use verdictbridge::Sha256;
///
/// let hash = Sha256::of_bytes(b"");
/// assert_eq!(
///     hash.as_str(),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256(String);

impl Sha256 {
    /// Computes the hash of an in-memory byte slice.
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut digest = Sha256Digest::new();
        digest.update(data);
        Self(hex::encode(digest.finalize()))
    }

    /// Computes the hash of a file by streaming it in fixed-size chunks.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the path does not exist, or `Io` for any
    /// other read failure.
    pub async fn of_file(path: impl AsRef<Path>) -> VerdictResult<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VerdictError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                VerdictError::Io(e)
            }
        })?;
        Self::of_reader(file).await
    }

    /// Computes the hash of an async byte stream in a single pass.
    pub async fn of_reader<R: AsyncRead + Unpin>(mut reader: R) -> VerdictResult<Self> {
        let mut digest = Sha256Digest::new();
        let mut buffer = vec![0u8; CHUNK_SIZE];
        loop {
            let bytes_read = reader.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            digest.update(&buffer[..bytes_read]);
        }
        Ok(Self(hex::encode(digest.finalize())))
    }

    /// Returns the hash as a lowercase hex string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Sha256 {
    type Err = VerdictError;

    /// Parses a 64-character hex digest; uppercase input is normalized.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 64 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(VerdictError::invalid_hash(s));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl fmt::Display for Sha256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Sha256 {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn test_hash_of_empty_input() {
        assert_eq!(Sha256::of_bytes(b"").as_str(), EMPTY_SHA256);
    }

    #[test]
    fn test_hash_deterministic() {
        let data = b"test data for hashing";
        assert_eq!(Sha256::of_bytes(data), Sha256::of_bytes(data));
        assert_ne!(Sha256::of_bytes(b"data1"), Sha256::of_bytes(b"data2"));
    }

    #[tokio::test]
    async fn test_hash_file_matches_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"streamed content").unwrap();

        let from_file = Sha256::of_file(file.path()).await.unwrap();
        assert_eq!(from_file, Sha256::of_bytes(b"streamed content"));
    }

    #[tokio::test]
    async fn test_hash_missing_file() {
        let err = Sha256::of_file("/no/such/file").await.unwrap_err();
        assert!(matches!(err, VerdictError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_hash_reader_spans_chunks() {
        let data = vec![0xabu8; CHUNK_SIZE * 2 + 17];
        let from_reader = Sha256::of_reader(data.as_slice()).await.unwrap();
        assert_eq!(from_reader, Sha256::of_bytes(&data));
    }

    #[test]
    fn test_parse_valid_hash() {
        let parsed: Sha256 = EMPTY_SHA256.parse().unwrap();
        assert_eq!(parsed.as_str(), EMPTY_SHA256);
    }

    #[test]
    fn test_parse_normalizes_case() {
        let parsed: Sha256 = EMPTY_SHA256.to_ascii_uppercase().parse().unwrap();
        assert_eq!(parsed.as_str(), EMPTY_SHA256);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc123".parse::<Sha256>().is_err());
        assert!("g".repeat(64).parse::<Sha256>().is_err());
        assert!("".parse::<Sha256>().is_err());
    }
}
