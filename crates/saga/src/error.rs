//! Adapter error taxonomy.
//!
//! Each downstream system gets its own error enum so the orchestrator can
//! map failure kinds to saga outcomes without inspecting message strings.

use thiserror::Error;

/// Errors from the inventory reservation service.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The endpoint could not be resolved or the channel could not be set up.
    #[error("inventory service unreachable: {0}")]
    Connect(String),

    /// The RPC itself failed; carries the underlying status code and details.
    #[error("inventory rpc failed ({code}): {message}")]
    Rpc { code: String, message: String },
}

/// Errors from the payment service.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP 402: the charge was rejected by the payment provider.
    #[error("payment declined: {detail}")]
    Declined { detail: String },

    /// Any other non-2xx response.
    #[error("payment service returned HTTP {status}: {detail}")]
    Http { status: u16, detail: String },

    /// The request timed out; the charge outcome is unknown on our side.
    #[error("payment request timed out: {0}")]
    Timeout(String),

    /// The service could not be reached at all.
    #[error("payment service unreachable: {0}")]
    Connect(String),

    /// A 2xx response whose body could not be decoded.
    #[error("payment response could not be decoded: {0}")]
    Decode(String),
}

impl PaymentError {
    /// Returns true for failures where the charge may in fact have
    /// succeeded on the payment side.
    pub fn is_transport(&self) -> bool {
        matches!(self, PaymentError::Timeout(_) | PaymentError::Connect(_))
    }

    /// Returns true if the provider definitively rejected the charge.
    pub fn is_declined(&self) -> bool {
        matches!(self, PaymentError::Declined { .. })
    }
}

/// Errors from the warehouse shipment queue.
#[derive(Debug, Error)]
pub enum ShipmentError {
    /// Broker connection or channel setup failed.
    #[error("broker connection failed: {0}")]
    Connect(String),

    /// The publish itself failed.
    #[error("publish to shipment queue failed: {0}")]
    Publish(String),

    /// The instruction could not be serialized.
    #[error("shipment instruction could not be encoded: {0}")]
    Encode(String),
}
