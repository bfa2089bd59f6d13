//! Fire-and-forget saga scheduling.

use domain::Order;

use crate::config::BackendConfig;

/// Schedules saga execution for an accepted order.
///
/// Implementations must return without waiting for the workflow: the
/// intake endpoint's latency is independent of downstream systems.
pub trait SagaSpawner: Send + Sync {
    /// Queues the order for background processing.
    fn spawn_saga(&self, order: Order) -> Result<(), String>;
}

/// Spawns each saga as an independent tokio task.
pub struct TokioSagaSpawner {
    backends: BackendConfig,
}

impl TokioSagaSpawner {
    /// Creates a spawner that hands each order to [`crate::workflow::process_order`].
    pub fn new(backends: BackendConfig) -> Self {
        Self { backends }
    }
}

impl SagaSpawner for TokioSagaSpawner {
    fn spawn_saga(&self, order: Order) -> Result<(), String> {
        let backends = self.backends.clone();
        tokio::spawn(crate::workflow::process_order(backends, order));
        Ok(())
    }
}
