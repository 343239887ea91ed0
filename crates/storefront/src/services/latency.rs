//! Simulated API latency.
//!
//! Mock operations (signup, login, order placement, profile update) wait a
//! fixed delay so the UI shows its loading states the way it would against
//! a real API. The wait is not cancellable.

use std::time::Duration;

/// Fixed delay applied to mock operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency(Duration);

impl SimulatedLatency {
    /// No delay, for tests.
    pub const NONE: Self = Self(Duration::ZERO);

    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self(delay)
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.0
    }

    /// Sleep for the configured delay.
    pub async fn wait(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_wait_sleeps_for_delay() {
        let latency = SimulatedLatency::new(Duration::from_millis(300));
        let started = tokio::time::Instant::now();
        latency.wait().await;
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_none_returns_immediately() {
        SimulatedLatency::NONE.wait().await;
        assert_eq!(SimulatedLatency::NONE.delay(), Duration::ZERO);
    }
}
