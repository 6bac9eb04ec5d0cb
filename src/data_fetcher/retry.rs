//! Bounded exponential backoff around fallible async operations

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How often and how patiently a failing operation is retried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        use crate::constants::retry;
        RetryPolicy {
            max_retries: retry::MAX_RETRIES,
            initial_delay: Duration::from_secs_f64(retry::INITIAL_DELAY_SECONDS),
            backoff_factor: retry::BACKOFF_FACTOR,
        }
    }
}

impl RetryPolicy {
    /// A policy that tries exactly once.
    pub fn no_retry() -> Self {
        RetryPolicy {
            max_retries: 0,
            initial_delay: Duration::ZERO,
            backoff_factor: 1.0,
        }
    }

    /// Delays slept between attempts when every attempt fails, in order.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        let mut delay = self.initial_delay;
        (0..self.max_retries).map(move |_| {
            let current = delay;
            delay = Duration::try_from_secs_f64(delay.as_secs_f64() * self.backoff_factor)
                .unwrap_or(Duration::MAX);
            current
        })
    }

    /// Runs `operation` until it succeeds or the retries are exhausted.
    ///
    /// The operation is invoked at most `max_retries + 1` times. Between
    /// attempts the task sleeps for the current delay, which starts at
    /// `initial_delay` and is multiplied by `backoff_factor` after each
    /// sleep. The last error is returned when every attempt fails; a success
    /// value is passed through untouched.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut delays = self.delays();
        let mut attempt = 1u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    let Some(delay) = delays.next() else {
                        return Err(error);
                    };
                    warn!(
                        "{label} failed: {error}. Retrying in {:?} (attempt {}/{})",
                        delay,
                        attempt,
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::time::Instant;

    fn policy(max_retries: u32, initial_secs: u64, factor: f64) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_secs(initial_secs),
            backoff_factor: factor,
        }
    }

    #[test]
    fn test_delays_form_geometric_series() {
        let delays: Vec<_> = policy(4, 32, 2.0).delays().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(32),
                Duration::from_secs(64),
                Duration::from_secs(128),
                Duration::from_secs(256),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_k_failures_with_geometric_wait() {
        let attempts = Cell::new(0u32);
        let started = Instant::now();

        let result: Result<&str, String> = policy(4, 32, 2.0)
            .run("box score", || {
                let n = attempts.get() + 1;
                attempts.set(n);
                async move {
                    if n <= 3 {
                        Err(format!("attempt {n} failed"))
                    } else {
                        Ok("rows")
                    }
                }
            })
            .await;

        assert_eq!(result, Ok("rows"));
        assert_eq!(attempts.get(), 4);
        // 32 + 64 + 128
        assert_eq!(started.elapsed(), Duration::from_secs(224));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_makes_n_plus_one_attempts() {
        let attempts = Cell::new(0u32);

        let result: Result<(), String> = policy(3, 1, 2.0)
            .run("shot chart", || {
                let n = attempts.get() + 1;
                attempts.set(n);
                async move { Err(format!("failure {n}")) }
            })
            .await;

        assert_eq!(attempts.get(), 4);
        assert_eq!(result, Err("failure 4".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_does_not_sleep() {
        let started = Instant::now();
        let result: Result<u32, String> = policy(4, 32, 2.0)
            .run("play by play", || async { Ok(7) })
            .await;
        assert_eq!(result, Ok(7));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_no_retry_policy_tries_once() {
        let attempts = Cell::new(0u32);
        let result: Result<(), &str> = RetryPolicy::no_retry()
            .run("schedule", || {
                attempts.set(attempts.get() + 1);
                async { Err("down") }
            })
            .await;
        assert_eq!(result, Err("down"));
        assert_eq!(attempts.get(), 1);
    }
}
