//! Verdicts and analysis reports.
//!
//! A `VerdictReport` is the immutable end product of a scan: the content
//! hash together with the service's classification. Reports are constructed
//! only by the client after a terminal server response.

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::core::hash::Sha256;

/// The service's classification of a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// No malicious content found.
    Clean,
    /// Malicious content found.
    Malicious,
    /// Potentially unwanted content found.
    Pup,
    /// The service has no opinion on this content.
    ///
    /// This covers both "never seen this hash" (a 404 from the report
    /// endpoint) and reports whose verdict string is unrecognized or absent.
    #[default]
    Unknown,
}

impl Verdict {
    /// Maps a wire verdict string; anything unrecognized is `Unknown`.
    fn from_wire(raw: &str) -> Self {
        match raw {
            "Clean" => Self::Clean,
            "Malicious" => Self::Malicious,
            "Pup" => Self::Pup,
            _ => Self::Unknown,
        }
    }

    /// Returns the canonical wire name of the verdict.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "Clean",
            Self::Malicious => "Malicious",
            Self::Pup => "Pup",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

/// An analysis report for a file: its content hash and verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictReport {
    sha256: Sha256,
    verdict: Verdict,
}

impl VerdictReport {
    /// Constructs a report from a terminal server response.
    ///
    /// The hash is always the one that was looked up or derived from the
    /// upload location, never an unchecked value from a response body.
    pub(crate) fn new(sha256: Sha256, verdict: Verdict) -> Self {
        Self { sha256, verdict }
    }

    /// Returns the content hash the report is about.
    pub fn sha256(&self) -> &Sha256 {
        &self.sha256
    }

    /// Returns the verdict.
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }
}

impl fmt::Display for VerdictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256: {} verdict: {}", self.sha256, self.verdict)
    }
}
