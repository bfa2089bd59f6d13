//! The order wire model as received from the OMS.

use common::OrderId;
use serde::{Deserialize, Serialize};

use crate::error::OrderError;

/// A single order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Stock keeping unit.
    pub sku: String,
    /// Number of units ordered.
    pub quantity: u32,
}

/// A newly accepted order handed over by the OMS.
///
/// This struct doubles as the JSON wire format of the intake endpoint;
/// field names follow the OMS contract (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Identity of the order across all services.
    pub order_id: OrderId,
    /// Opaque payment token issued upstream.
    pub payment_token: String,
    /// Total in major currency units (e.g. 149.99 EUR).
    pub total_amount: f64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Ordered items; sequence order is preserved downstream.
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Validates the order against the intake contract.
    ///
    /// Any order that reaches the saga has passed this check; the
    /// downstream adapters rely on it.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.order_id.is_empty() {
            return Err(OrderError::MissingOrderId);
        }
        if self.payment_token.is_empty() {
            return Err(OrderError::MissingPaymentToken);
        }
        if !self.total_amount.is_finite() || self.total_amount < 0.0 {
            return Err(OrderError::InvalidAmount(self.total_amount));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(OrderError::InvalidCurrency(self.currency.clone()));
        }
        if self.items.is_empty() {
            return Err(OrderError::NoItems);
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.sku.is_empty() {
                return Err(OrderError::EmptySku { index });
            }
            if item.quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    sku: item.sku.clone(),
                });
            }
        }
        Ok(())
    }

    /// Converts the total amount to integer minor units (cents).
    ///
    /// Multiplies in f64 and truncates toward zero, matching the payment
    /// contract: 149.99 becomes 14999, and 149.995 also becomes 14999.
    pub fn amount_cents(&self) -> i64 {
        (self.total_amount * 100.0) as i64
    }
}
