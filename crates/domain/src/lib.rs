//! Domain layer for the order integration service.
//!
//! Holds the order wire model with its validation rules, the shipment
//! instruction published to the warehouse queue, and the parser for
//! inbound warehouse status updates. Everything here is transport-agnostic;
//! the protocol adapters live elsewhere.

pub mod error;
pub mod order;
pub mod shipment;
pub mod status;

pub use error::{OrderError, StatusError};
pub use order::{Order, OrderItem};
pub use shipment::{ShipmentInstruction, ShippingAddress};
pub use status::StatusUpdate;
