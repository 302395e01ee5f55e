//! Verdict client configuration.

use std::time::Duration;

/// Configuration for a [`VerdictClient`](crate::client::VerdictClient).
///
/// The poll settings pace the wait for asynchronous analysis: the interval
/// starts at `poll_interval`, doubles after every pending response up to
/// `max_poll_interval`, and the whole wait is bounded by `max_poll_time`.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use verdictbridge::VerdictConfig;
///
/// let config = VerdictConfig::new("https://gateway.example.com")
///     .with_timeout(Duration::from_secs(30))
///     .with_max_poll_time(Duration::from_secs(120));
/// ```
#[derive(Debug, Clone)]
pub struct VerdictConfig {
    /// Base URL of the verdict service, without a trailing slash.
    pub base_url: String,

    /// Timeout for each individual HTTP request.
    pub timeout: Duration,

    /// Initial delay between report polls while analysis is pending.
    pub poll_interval: Duration,

    /// Upper bound for the exponentially growing poll delay.
    pub max_poll_interval: Duration,

    /// Maximum total time to wait for a terminal report.
    pub max_poll_time: Duration,
}

impl VerdictConfig {
    /// Creates a configuration for the given service endpoint.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
            max_poll_interval: Duration::from_secs(10),
            max_poll_time: Duration::from_secs(300),
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the initial polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the cap for the polling interval.
    pub fn with_max_poll_interval(mut self, interval: Duration) -> Self {
        self.max_poll_interval = interval;
        self
    }

    /// Sets the maximum total time to wait for a verdict.
    pub fn with_max_poll_time(mut self, max: Duration) -> Self {
        self.max_poll_time = max;
        self
    }
}
