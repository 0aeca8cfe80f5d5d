//! Retry policy for upstream requests
//!
//! The registry is slow and sits behind an anti-bot layer that occasionally
//! swaps a JSON payload for an HTML challenge page. A harvest is a multi-hour
//! batch job, so the default policy retries forever on a fixed delay; bounded
//! policies exist for tests and for operators who prefer to skip stuck schools.

use crate::config::{BackoffStrategy, RetryConfig};
use std::time::Duration;

/// How long to wait before retry number `n` (1-based)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Same delay before every retry
    Fixed(Duration),

    /// `base * multiplier^(n-1)`, capped at `max`
    Exponential {
        base: Duration,
        max: Duration,
        multiplier: f64,
    },
}

impl Backoff {
    /// Delay before the given retry (1 = first retry)
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential {
                base,
                max,
                multiplier,
            } => {
                let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
                let millis = base.as_millis() as f64 * multiplier.powi(exponent);
                if !millis.is_finite() || millis >= max.as_millis() as f64 {
                    max
                } else {
                    Duration::from_millis(millis as u64)
                }
            }
        }
    }
}

/// Bounded or unbounded retry policy with a pluggable backoff
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts allowed per request; `None` never gives up
    pub max_attempts: Option<u32>,

    /// Delay schedule between attempts
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded(Backoff::Fixed(Duration::from_millis(500)))
    }
}

impl RetryPolicy {
    /// Retries until the request succeeds
    pub fn unbounded(backoff: Backoff) -> Self {
        Self {
            max_attempts: None,
            backoff,
        }
    }

    /// Gives up after `max_attempts` attempts in total
    pub fn bounded(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
            backoff,
        }
    }

    /// Builds the policy described by the `[retry]` config section
    pub fn from_config(config: &RetryConfig) -> Self {
        let base = Duration::from_millis(config.backoff_ms);
        let backoff = match config.strategy {
            BackoffStrategy::Fixed => Backoff::Fixed(base),
            BackoffStrategy::Exponential => Backoff::Exponential {
                base,
                max: Duration::from_millis(config.max_backoff_ms),
                multiplier: 2.0,
            },
        };

        Self {
            max_attempts: config.max_attempts,
            backoff,
        }
    }

    /// Whether another attempt may follow `attempts_made` failed attempts
    pub fn allows_retry(&self, attempts_made: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempts_made < max,
            None => true,
        }
    }

    /// Delay to sleep after `attempts_made` failed attempts
    pub fn delay_after(&self, attempts_made: u32) -> Duration {
        self.backoff.delay(attempts_made)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none()
    }
}
