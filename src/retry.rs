use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tracing::warn;

/// Fixed-delay retry policy. No jitter, no backoff: the stats service is
/// flaky under load but recovers quickly, so a short constant pause is
/// enough.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds or `max_attempts` failures accumulate. A
    /// success returns immediately; the terminal error names the operation
    /// and the number of attempts made.
    pub fn run<T>(&self, label: &str, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let mut last_err = None;
        for attempt in 1..=self.max_attempts {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) => {
                    warn!(
                        "{label}: attempt {attempt}/{} failed: {err:#}",
                        self.max_attempts
                    );
                    last_err = Some(err);
                    if attempt < self.max_attempts {
                        thread::sleep(self.delay);
                    }
                }
            }
        }
        let last = last_err.unwrap_or_else(|| anyhow!("no attempts made"));
        Err(anyhow!(
            "{label} failed after {} attempts: {last:#}",
            self.max_attempts
        ))
    }
}
