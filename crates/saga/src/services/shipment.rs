//! Shipment dispatch port and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;
use domain::OrderItem;

use crate::error::ShipmentError;

/// Port for publishing shipment instructions to the warehouse.
#[async_trait]
pub trait ShipmentGateway: Send + Sync {
    /// Publishes a shipment instruction for the order.
    async fn send_shipment(
        &self,
        order_id: &OrderId,
        items: &[OrderItem],
    ) -> Result<(), ShipmentError>;

    /// Releases the underlying broker connection.
    ///
    /// The orchestrator calls this on every exit path; implementations
    /// must tolerate being closed without a prior publish.
    async fn close(&self);
}

#[derive(Debug, Default)]
struct InMemoryShipmentState {
    fail_on_send: bool,
    sent: Vec<(OrderId, Vec<OrderItem>)>,
    closed: bool,
}

/// In-memory shipment gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShipmentGateway {
    state: Arc<RwLock<InMemoryShipmentState>>,
}

impl InMemoryShipmentGateway {
    /// Creates a new in-memory shipment gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes publish calls fail as if the broker were unavailable.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Number of instructions published.
    pub fn sent_count(&self) -> usize {
        self.state.read().unwrap().sent.len()
    }

    /// The most recently published instruction.
    pub fn last_shipment(&self) -> Option<(OrderId, Vec<OrderItem>)> {
        self.state.read().unwrap().sent.last().cloned()
    }

    /// Returns true once `close` has been called.
    pub fn was_closed(&self) -> bool {
        self.state.read().unwrap().closed
    }
}

#[async_trait]
impl ShipmentGateway for InMemoryShipmentGateway {
    async fn send_shipment(
        &self,
        order_id: &OrderId,
        items: &[OrderItem],
    ) -> Result<(), ShipmentError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_send {
            return Err(ShipmentError::Connect(
                "broker unavailable".to_string(),
            ));
        }

        state.sent.push((order_id.clone(), items.to_vec()));
        Ok(())
    }

    async fn close(&self) {
        self.state.write().unwrap().closed = true;
    }
}
