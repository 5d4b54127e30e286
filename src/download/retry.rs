//! Single re-attempt policy for gateway failures.
//!
//! GameBanana's download endpoint sits behind a CDN that occasionally answers
//! with a gateway error. A run may re-attempt the download once after a
//! short delay; everything else fails immediately.
//!
//! ```
//! use modfetch_core::download::{DownloadError, FailureType, RetryDecision, RetryPolicy, classify_error};
//!
//! let policy = RetryPolicy::single_retry();
//! let error = DownloadError::http_status("https://gamebanana.com/dl/1", 503);
//!
//! assert_eq!(classify_error(&error), FailureType::Transient);
//! assert!(matches!(policy.should_retry(FailureType::Transient, 1), RetryDecision::Retry { .. }));
//! assert!(matches!(policy.should_retry(FailureType::Transient, 2), RetryDecision::DoNotRetry { .. }));
//! ```

use std::time::Duration;

use rand::Rng;
use tracing::{debug, instrument};

use super::DownloadError;

/// Upper bound on attempts, including the first one.
pub const MAX_ATTEMPTS: u32 = 2;

/// Delay before the re-attempt.
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Maximum jitter added to the delay.
const MAX_JITTER_MS: u64 = 500;

/// Classification of download failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Gateway error or dropped connection; may succeed on a second try.
    Transient,
    /// Anything else (4xx, missing length, disk errors, truncated body).
    Permanent,
}

/// Decision on whether to re-attempt a failed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Re-attempt after `delay`.
    Retry {
        /// How long to wait first.
        delay: Duration,
        /// Attempt number about to start (1-indexed).
        attempt: u32,
    },
    /// Give up.
    DoNotRetry {
        /// Human-readable reason.
        reason: String,
    },
}

/// How many times a download may be attempted.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    /// A single attempt.
    fn default() -> Self {
        Self::no_retry()
    }
}

impl RetryPolicy {
    /// One attempt, no re-attempt.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            delay: RETRY_DELAY,
        }
    }

    /// One attempt plus one re-attempt on transient failures.
    #[must_use]
    pub fn single_retry() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            delay: RETRY_DELAY,
        }
    }

    /// Overrides the delay before the re-attempt.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the maximum number of attempts configured.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decides what to do after attempt number `attempt` (1-indexed) failed.
    #[instrument(level = "debug", skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        if failure_type == FailureType::Permanent {
            return RetryDecision::DoNotRetry {
                reason: "permanent failure".to_string(),
            };
        }
        if attempt >= self.max_attempts {
            return RetryDecision::DoNotRetry {
                reason: format!("gave up after {attempt} attempt(s)"),
            };
        }

        let delay = self.delay + jitter(self.delay);
        debug!(?delay, next_attempt = attempt + 1, "scheduling re-attempt");
        RetryDecision::Retry {
            delay,
            attempt: attempt + 1,
        }
    }
}

fn jitter(delay: Duration) -> Duration {
    if delay.is_zero() {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=MAX_JITTER_MS))
}

/// Classifies a download error for retry purposes.
#[must_use]
pub fn classify_error(error: &DownloadError) -> FailureType {
    match error {
        DownloadError::HttpStatus {
            status: 502..=504, ..
        }
        | DownloadError::Network { .. } => FailureType::Transient,
        _ => FailureType::Permanent,
    }
}
