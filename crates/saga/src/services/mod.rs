//! Service ports the orchestrator depends on, plus in-memory fakes for tests.

pub mod inventory;
pub mod payment;
pub mod shipment;

pub use inventory::{
    InMemoryInventoryService, InventoryService, Reservation, ReservationStatus,
};
pub use payment::{ChargeOutcome, ChargeResult, InMemoryPaymentGateway, PaymentGateway};
pub use shipment::{InMemoryShipmentGateway, ShipmentGateway};
