//! Deterministic exponential backoff schedule.

use std::time::Duration;

use super::policy::RetryPolicy;

/// Multiplier applied to the delay after each failed attempt.
pub const GROWTH_FACTOR: u32 = 2;

/// Maps a 1-based attempt index to the delay that follows it.
///
/// `delay(n) = min(initial * 2^(n-1), max)`. No jitter: the same policy always
/// yields the same schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffSchedule {
    initial: Duration,
    max: Duration,
}

impl BackoffSchedule {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max }
    }

    /// Delay to wait after attempt `attempt` fails. Attempt 0 is treated as 1.
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let multiplier = GROWTH_FACTOR.checked_pow(exponent).unwrap_or(u32::MAX);
        self.initial.saturating_mul(multiplier).min(self.max)
    }
}

impl From<&RetryPolicy> for BackoffSchedule {
    fn from(policy: &RetryPolicy) -> Self {
        Self::new(policy.initial_delay, policy.max_delay)
    }
}
