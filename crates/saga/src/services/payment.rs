//! Payment service port and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;
use serde::Deserialize;

use crate::error::PaymentError;

/// A captured charge as reported by the payment service.
///
/// Doubles as the deserialization target for the service's 2xx response
/// body; only `transactionId` is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeResult {
    /// Transaction ID for audit logging.
    pub transaction_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
}

/// Port for payment capture.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Captures a charge for the order.
    ///
    /// `amount_cents` is the order total in integer minor units.
    async fn create_charge(
        &self,
        order_id: &OrderId,
        token: &str,
        amount_cents: i64,
        currency: &str,
    ) -> Result<ChargeResult, PaymentError>;
}

/// Scripted outcome for the in-memory gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeOutcome {
    #[default]
    Succeed,
    Declined,
    Timeout,
    ServerError,
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    outcome: ChargeOutcome,
    next_id: u32,
    charges: Vec<RecordedCharge>,
}

/// A charge attempt as seen by the in-memory gateway.
#[derive(Debug, Clone)]
pub struct RecordedCharge {
    pub order_id: OrderId,
    pub token: String,
    pub amount_cents: i64,
    pub currency: String,
}

/// In-memory payment gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentGateway {
    /// Creates a new in-memory payment gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the outcome of subsequent charge calls.
    pub fn set_outcome(&self, outcome: ChargeOutcome) {
        self.state.write().unwrap().outcome = outcome;
    }

    /// Number of charge attempts, including failed ones.
    pub fn charge_calls(&self) -> usize {
        self.state.read().unwrap().charges.len()
    }

    /// The most recent charge attempt.
    pub fn last_charge(&self) -> Option<RecordedCharge> {
        self.state.read().unwrap().charges.last().cloned()
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn create_charge(
        &self,
        order_id: &OrderId,
        token: &str,
        amount_cents: i64,
        currency: &str,
    ) -> Result<ChargeResult, PaymentError> {
        let mut state = self.state.write().unwrap();
        state.charges.push(RecordedCharge {
            order_id: order_id.clone(),
            token: token.to_string(),
            amount_cents,
            currency: currency.to_string(),
        });

        match state.outcome {
            ChargeOutcome::Succeed => {
                state.next_id += 1;
                Ok(ChargeResult {
                    transaction_id: format!("tx-{:04}", state.next_id),
                    status: "succeeded".to_string(),
                    created_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                })
            }
            ChargeOutcome::Declined => Err(PaymentError::Declined {
                detail: "payment_declined".to_string(),
            }),
            ChargeOutcome::Timeout => {
                Err(PaymentError::Timeout("read timed out after 8s".to_string()))
            }
            ChargeOutcome::ServerError => Err(PaymentError::Http {
                status: 500,
                detail: "internal error".to_string(),
            }),
        }
    }
}
