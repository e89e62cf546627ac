//! Simulated round-trip delay for save operations.

use std::time::Duration;

use tracing::debug;

/// A fixed artificial delay awaited before a write is applied.
///
/// There is no cancellation: once a save starts waiting it always completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency(Duration);

impl Latency {
    pub fn new(delay: Duration) -> Self {
        Self(delay)
    }

    pub fn none() -> Self {
        Self(Duration::ZERO)
    }

    /// Wait out the configured delay. Returns immediately when it is zero.
    pub async fn wait(&self) {
        if self.0.is_zero() {
            return;
        }
        debug!("simulating {:?} save latency", self.0);
        tokio::time::sleep(self.0).await;
    }
}
