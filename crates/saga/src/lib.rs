//! Saga orchestration for order integration.
//!
//! Drives each accepted order through three downstream systems in strict
//! sequence (reserve inventory, charge payment, dispatch to the warehouse)
//! and runs the compensating release when payment fails after a successful
//! reservation. Consistency comes from compensation, not atomicity: there
//! is no durable saga store and no two-phase commit.
//!
//! The orchestrator only knows the three service ports defined in
//! [`services`]; protocol adapters implement them elsewhere.

pub mod error;
pub mod orchestrator;
pub mod services;
pub mod state;
pub mod steps;

pub use error::{InventoryError, PaymentError, ShipmentError};
pub use orchestrator::{SagaOrchestrator, SagaReport};
pub use services::{
    ChargeOutcome, ChargeResult, InMemoryInventoryService, InMemoryPaymentGateway,
    InMemoryShipmentGateway, InventoryService, PaymentGateway, Reservation, ReservationStatus,
    ShipmentGateway,
};
pub use state::SagaState;
