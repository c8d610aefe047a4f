//! Courtesy delay before each fetch.

use rand::Rng;
use std::time::Duration;

/// Uniformly random delay between `min` and `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub min: Duration,
    pub max: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(2),
            max: Duration::from_secs(5),
        }
    }
}

impl Pacing {
    /// Build a pacing range. Returns `None` when `min > max`.
    pub fn new(min: Duration, max: Duration) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    /// No delay at all.
    pub fn disabled() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.max.is_zero()
    }

    /// Sample a delay from the range.
    pub fn sample(&self) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }

    /// Sleep for a sampled delay. Yields to the runtime while waiting.
    pub async fn wait(&self) {
        if self.is_disabled() {
            return;
        }
        let delay = self.sample();
        tracing::debug!(delay_ms = delay.as_millis() as u64, "pacing before fetch");
        tokio::time::sleep(delay).await;
    }
}
