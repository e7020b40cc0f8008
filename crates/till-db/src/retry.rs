//! # Retry With Backoff
//!
//! Re-runs an operation while it fails with a transient error.
//!
//! Checkout commits are the only caller today: a stock CAS that lost a race,
//! or SQLite refusing a writer with BUSY, rolls the whole unit back and the
//! next attempt re-reads fresh stock.
//!
//! ```text
//! attempt 1 ──✗ transient──► sleep 20ms ──► attempt 2 ──✗──► sleep 40ms ──► attempt 3
//!     │                                        │                              │
//!     ✓ Ok                                     ✗ permanent → return Err       ✗ → return Err
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

// =============================================================================
// Configuration
// =============================================================================

#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(20),
            max_delay: Duration::from_millis(500),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Default backoff with a custom attempt budget (at least one attempt).
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        let grown = Duration::from_millis((delay.as_millis() as f64 * self.multiplier) as u64);
        grown.min(self.max_delay)
    }
}

// =============================================================================
// Retry Loop
// =============================================================================

/// Distinguishes errors worth retrying from permanent ones.
pub trait IsTransient {
    fn is_transient(&self) -> bool;
}

/// Runs `operation` until it succeeds, fails permanently, or the attempt
/// budget is spent. The closure receives the 1-based attempt number.
pub async fn retry_on_transient<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display + IsTransient,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay;

    loop {
        attempt += 1;

        match operation(attempt).await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(error) => {
                if !error.is_transient() {
                    return Err(error);
                }

                if attempt >= config.max_attempts {
                    tracing::error!(
                        attempt,
                        error = %error,
                        "Operation failed after all retries"
                    );
                    return Err(error);
                }

                tracing::warn!(
                    attempt,
                    error = %error,
                    delay_ms = delay.as_millis() as u64,
                    "Transient failure, retrying after delay"
                );

                sleep(delay).await;
                delay = config.next_delay(delay);
            }
        }
    }
}
