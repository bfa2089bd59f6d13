//! Domain error types.

use thiserror::Error;

/// Validation errors for an incoming order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    /// The order ID is missing or empty.
    #[error("orderId must not be empty")]
    MissingOrderId,

    /// The payment token is missing or empty.
    #[error("paymentToken must not be empty")]
    MissingPaymentToken,

    /// The total amount is negative or not a finite number.
    #[error("totalAmount must be a non-negative amount, got {0}")]
    InvalidAmount(f64),

    /// The currency is not a 3-letter ISO 4217 code.
    #[error("currency must be a 3-letter ISO 4217 code, got {0:?}")]
    InvalidCurrency(String),

    /// The order contains no items.
    #[error("order must contain at least one item")]
    NoItems,

    /// An item has an empty SKU.
    #[error("item {index} has an empty sku")]
    EmptySku { index: usize },

    /// An item quantity is zero.
    #[error("item {sku:?} has quantity 0, expected a positive quantity")]
    InvalidQuantity { sku: String },
}

/// Errors raised while parsing a warehouse status update.
#[derive(Debug, Error)]
pub enum StatusError {
    /// The payload is not valid JSON.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is valid JSON but not an object.
    #[error("status payload is not a JSON object")]
    NotAnObject,
}
