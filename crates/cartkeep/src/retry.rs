//! Retry policy for persistence writes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Fixed delay between retries.
    Fixed {
        /// Delay in milliseconds.
        delay_ms: u64,
    },
    /// Exponential backoff with base and max.
    Exponential {
        /// Initial delay in milliseconds.
        base_ms: u64,
        /// Maximum delay in milliseconds.
        max_ms: u64,
    },
}

impl BackoffStrategy {
    /// Calculate delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fixed { delay_ms } => Duration::from_millis(*delay_ms),
            Self::Exponential { base_ms, max_ms } => {
                let multiplier = 2u64.saturating_pow(attempt);
                let delay = base_ms.saturating_mul(multiplier);
                Duration::from_millis(delay.min(*max_ms))
            }
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base_ms: 50,
            max_ms: 500,
        }
    }
}

/// How often a failed cart write is retried before it is given up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first write.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff strategy.
    #[serde(default)]
    pub backoff: BackoffStrategy,
}

fn default_max_attempts() -> u32 {
    2
}

impl RetryPolicy {
    /// Create a new retry policy with the default backoff.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: BackoffStrategy::default(),
        }
    }

    /// Create a policy with no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            backoff: BackoffStrategy::None,
        }
    }

    /// Set backoff strategy.
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    /// Whether another attempt is allowed after `attempt` retries.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.delay_for_attempt(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(default_max_attempts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_backoff_caps() {
        let backoff = BackoffStrategy::Exponential {
            base_ms: 100,
            max_ms: 1000,
        };

        assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(backoff.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(backoff.delay_for_attempt(3), Duration::from_millis(800));
        assert_eq!(backoff.delay_for_attempt(4), Duration::from_millis(1000));
        assert_eq!(backoff.delay_for_attempt(60), Duration::from_millis(1000));
    }

    #[test]
    fn test_fixed_backoff() {
        let backoff = BackoffStrategy::Fixed { delay_ms: 10 };
        assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(10));
        assert_eq!(backoff.delay_for_attempt(5), Duration::from_millis(10));
    }

    #[test]
    fn test_should_retry() {
        let policy = RetryPolicy::new(2);
        assert!(policy.should_retry(0));
        assert!(policy.should_retry(1));
        assert!(!policy.should_retry(2));

        assert!(!RetryPolicy::none().should_retry(0));
    }

    #[test]
    fn test_backoff_serde_shape() {
        let policy: RetryPolicy = serde_json::from_str(
            r#"{"max_attempts":3,"backoff":{"strategy":"fixed","delay_ms":5}}"#,
        )
        .unwrap();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff, BackoffStrategy::Fixed { delay_ms: 5 });
    }
}
