//! Backoff intervals and simulated work latency.
//!
//! Two kinds of waits, both always taken *outside* any lock:
//! - a fixed backoff when funds or stock are insufficient, throttling
//!   retry pressure on the agent's own loop and on its peers;
//! - a bounded random delay standing in for extraction/assembly time.

use std::time::Duration;

use rand::Rng;

/// Wait intervals for one agent's run loop.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Wait after an iteration blocked on insufficient funds.
    pub funds_backoff: Duration,
    /// Wait after an ordering/restock round, successful or not.
    pub order_backoff: Duration,
    /// Upper bound of the random production/assembly delay.
    pub max_work_delay: Duration,
}

impl Pacing {
    /// Production-run pacing.
    pub const fn standard() -> Self {
        Self {
            funds_backoff: Duration::from_millis(100),
            order_backoff: Duration::from_millis(500),
            max_work_delay: Duration::from_millis(1000),
        }
    }

    /// Near-zero waits for tests, keeping the same code paths.
    pub const fn fast() -> Self {
        Self {
            funds_backoff: Duration::from_millis(1),
            order_backoff: Duration::from_millis(1),
            max_work_delay: Duration::from_millis(2),
        }
    }

    /// Draw a random work delay in `[1ms, max_work_delay]`.
    pub fn work_delay(&self) -> Duration {
        let max_ms = u64::try_from(self.max_work_delay.as_millis()).unwrap_or(u64::MAX);
        if max_ms <= 1 {
            return self.max_work_delay;
        }
        Duration::from_millis(rand::rng().random_range(1..=max_ms))
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_delay_is_bounded() {
        let pacing = Pacing::standard();
        for _ in 0..100 {
            let delay = pacing.work_delay();
            assert!(delay >= Duration::from_millis(1));
            assert!(delay <= pacing.max_work_delay);
        }
    }

    #[test]
    fn fast_pacing_work_delay_is_tiny() {
        let pacing = Pacing::fast();
        assert!(pacing.work_delay() <= Duration::from_millis(2));
    }
}
