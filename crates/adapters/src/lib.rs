//! Protocol adapters for the three downstream systems.
//!
//! Implements the saga's service ports against the real transports:
//! gRPC for inventory, HTTP for payment, AMQP for warehouse dispatch.
//! Also hosts the long-lived warehouse status listener.

pub mod consumer;
pub mod inventory;
pub mod payment;
pub mod shipment;

/// Generated gRPC bindings for the inventory service contract.
pub mod proto {
    tonic::include_proto!("inventory.v1");
}

pub use consumer::StatusListener;
pub use inventory::GrpcInventoryClient;
pub use payment::HttpPaymentGateway;
pub use shipment::AmqpShipmentGateway;
