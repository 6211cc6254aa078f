//! Retry with exponential backoff for remote calls

use std::time::Duration;

use crate::error::ApiError;

/// Something that can block the caller for a while.
///
/// Production code sleeps the thread; tests record the requested delays.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, delay: Duration);
}

/// Blocks the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Bounded retry policy: `max_attempts` calls in total, doubling delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay after the `attempt`-th failure (1-based): base, 2·base, 4·base, ...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds, fails non-retryably, or attempts run out.
    ///
    /// Returns the last error on exhaustion; nothing is swallowed.
    pub fn execute<T>(
        &self,
        label: &str,
        sleeper: &dyn Sleeper,
        mut op: impl FnMut() -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match op() {
                Ok(v) => return Ok(v),
                Err(e) if attempt < max_attempts && e.is_retryable() => {
                    let delay = self.delay_for(attempt);
                    log::warn!(
                        "{label}: attempt {attempt}/{max_attempts} failed: {e}, retrying in {delay:?}"
                    );
                    sleeper.sleep(delay);
                }
                Err(e) => {
                    log::debug!("{label}: giving up after {attempt} attempt(s): {e}");
                    return Err(e);
                }
            }
        }
    }
}
