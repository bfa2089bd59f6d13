//! Inventory service port and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;
use domain::OrderItem;

use crate::error::InventoryError;

/// Outcome of a reservation attempt as reported by the inventory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    /// All items reserved.
    Reserved,
    /// At least one item has insufficient stock.
    OutOfStock,
    /// At least one SKU is unknown to the inventory service.
    ItemNotFound,
    /// A status value this client does not recognize.
    Other(i32),
}

/// Result of a reservation call.
#[derive(Debug, Clone)]
pub struct Reservation {
    /// The reservation ID assigned by the inventory service.
    pub reservation_id: String,
    /// Whether the reservation was committed.
    pub status: ReservationStatus,
}

/// Port for inventory reservation operations.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Reserves stock for the given order items.
    async fn reserve_items(
        &self,
        order_id: &OrderId,
        items: &[OrderItem],
    ) -> Result<Reservation, InventoryError>;

    /// Releases whatever was reserved for the order (compensation).
    ///
    /// A failure here must not be swallowed: the caller logs it at the
    /// highest severity and escalates.
    async fn release_items(&self, order_id: &OrderId) -> Result<(), InventoryError>;
}

#[derive(Debug)]
struct InMemoryInventoryState {
    reserve_status: ReservationStatus,
    fail_on_reserve: bool,
    fail_on_release: bool,
    next_id: u32,
    reserved: Vec<(OrderId, Vec<OrderItem>)>,
    released: Vec<OrderId>,
}

impl Default for InMemoryInventoryState {
    fn default() -> Self {
        Self {
            reserve_status: ReservationStatus::Reserved,
            fail_on_reserve: false,
            fail_on_release: false,
            next_id: 0,
            reserved: Vec::new(),
            released: Vec::new(),
        }
    }
}

/// In-memory inventory service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryService {
    state: Arc<RwLock<InMemoryInventoryState>>,
}

impl InMemoryInventoryService {
    /// Creates a new in-memory inventory service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status returned by subsequent reserve calls.
    pub fn set_reserve_status(&self, status: ReservationStatus) {
        self.state.write().unwrap().reserve_status = status;
    }

    /// Makes reserve calls fail at the RPC level.
    pub fn set_fail_on_reserve(&self, fail: bool) {
        self.state.write().unwrap().fail_on_reserve = fail;
    }

    /// Makes release calls fail at the RPC level.
    pub fn set_fail_on_release(&self, fail: bool) {
        self.state.write().unwrap().fail_on_release = fail;
    }

    /// Number of reserve calls that reached the service.
    pub fn reserve_calls(&self) -> usize {
        self.state.read().unwrap().reserved.len()
    }

    /// Number of release calls that reached the service.
    pub fn release_calls(&self) -> usize {
        self.state.read().unwrap().released.len()
    }

    /// Items passed to the most recent reserve call.
    pub fn last_reserved_items(&self) -> Option<Vec<OrderItem>> {
        self.state
            .read()
            .unwrap()
            .reserved
            .last()
            .map(|(_, items)| items.clone())
    }

    /// Orders for which a release was requested.
    pub fn released_orders(&self) -> Vec<OrderId> {
        self.state.read().unwrap().released.clone()
    }
}

#[async_trait]
impl InventoryService for InMemoryInventoryService {
    async fn reserve_items(
        &self,
        order_id: &OrderId,
        items: &[OrderItem],
    ) -> Result<Reservation, InventoryError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_reserve {
            return Err(InventoryError::Rpc {
                code: "Unavailable".to_string(),
                message: "inventory service unreachable".to_string(),
            });
        }

        state.next_id += 1;
        let reservation_id = format!("RES-{:04}", state.next_id);
        state.reserved.push((order_id.clone(), items.to_vec()));

        Ok(Reservation {
            reservation_id,
            status: state.reserve_status,
        })
    }

    async fn release_items(&self, order_id: &OrderId) -> Result<(), InventoryError> {
        let mut state = self.state.write().unwrap();
        state.released.push(order_id.clone());

        if state.fail_on_release {
            return Err(InventoryError::Rpc {
                code: "Internal".to_string(),
                message: "release failed".to_string(),
            });
        }
        Ok(())
    }
}
