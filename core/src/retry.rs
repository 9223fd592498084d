//! Bounded retry with jittered exponential backoff.
//!
//! RULE: Only DependencyFailure errors are retried. Validation and
//! overflow errors return on the first attempt.
//! RULE: Jitter comes from a seeded PCG stream, so a given seed always
//! produces the same delays.

use crate::error::GenResult;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub seed: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            seed: 0x5eed,
        }
    }
}

impl RetryPolicy {
    /// No waiting between attempts. For tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Un-jittered delay before retry number `retry` (0-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.min(16)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Every delay `run` would sleep for, given enough failures.
    pub fn delays(&self) -> Vec<Duration> {
        let mut rng = Pcg64Mcg::seed_from_u64(self.seed);
        (0..self.max_attempts.saturating_sub(1))
            .map(|retry| jitter(&mut rng, self.backoff(retry)))
            .collect()
    }

    pub fn run<T, F>(&self, mut op: F) -> GenResult<T>
    where
        F: FnMut(u32) -> GenResult<T>,
    {
        let mut rng = Pcg64Mcg::seed_from_u64(self.seed);
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    let delay = jitter(&mut rng, self.backoff(attempt - 1));
                    log::warn!(
                        "attempt {attempt}/{attempts} failed, retrying in {}ms: {e}",
                        delay.as_millis()
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Scale by a factor in [0.5, 1.0).
fn jitter(rng: &mut Pcg64Mcg, delay: Duration) -> Duration {
    delay.mul_f64(rng.gen_range(0.5..1.0))
}
