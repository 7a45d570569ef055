//! Delay collaborator used between navigations.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::infrastructure::config::ScrapingConfig;

#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps for a uniformly random duration within inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomDelay {
    min: Duration,
    max: Duration,
}

impl RandomDelay {
    /// Bounds are swapped if given in the wrong order.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max { Self { min, max } } else { Self { min: max, max: min } }
    }

    pub fn from_config(config: &ScrapingConfig) -> Self {
        Self::new(
            Duration::from_secs(config.min_delay_secs),
            Duration::from_secs(config.max_delay_secs),
        )
    }

    pub fn next_delay(&self) -> Duration {
        let min_ms = u64::try_from(self.min.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.max.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(fastrand::u64(min_ms..=max_ms))
    }
}

#[async_trait]
impl Pacer for RandomDelay {
    async fn pause(&self) {
        let delay = self.next_delay();
        debug!("Pausing {:?} before next navigation", delay);
        tokio::time::sleep(delay).await;
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Pacer for NoDelay {
    async fn pause(&self) {}
}
