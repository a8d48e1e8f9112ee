//! Wait strategies for rate limiting
//!
//! The harvester issues one request at a time and pauses between them. The
//! pause is a strategy object so tests can run without real delays.

use std::future::Future;
use std::time::Duration;

/// Pause policy applied between consecutive requests
pub trait WaitStrategy {
    fn wait(&self) -> impl Future<Output = ()> + Send;
}

/// Sleeps for a fixed duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }
}

impl WaitStrategy for FixedDelay {
    async fn wait(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

/// Returns immediately
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDelay;

impl WaitStrategy for NoDelay {
    async fn wait(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_fixed_delay_constructors() {
        assert_eq!(
            FixedDelay::from_millis(1500),
            FixedDelay(Duration::from_secs(1) + Duration::from_millis(500))
        );
    }

    #[tokio::test]
    async fn test_fixed_delay_sleeps() {
        let start = Instant::now();
        FixedDelay::from_millis(20).wait().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_zero_delay_returns_immediately() {
        let start = Instant::now();
        FixedDelay::from_millis(0).wait().await;
        NoDelay.wait().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
