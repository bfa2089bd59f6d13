//! HTTP client for the payment service.

use std::time::Duration;

use async_trait::async_trait;
use common::OrderId;
use reqwest::StatusCode;
use saga::error::PaymentError;
use saga::services::payment::{ChargeResult, PaymentGateway};
use serde::Serialize;
use uuid::Uuid;

/// Connect timeout; must stay below the payment service's own deadline.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Overall request timeout covering the response read.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

const CHARGES_PATH: &str = "/v2/charges";
const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChargeRequest<'a> {
    amount: i64,
    currency: &'a str,
    payment_token: &'a str,
    reference_id: &'a str,
}

/// Payment adapter over a pooled reqwest client.
///
/// Every charge carries a fresh UUIDv4 `Idempotency-Key`. This
/// orchestrator never retries a charge, but the key leaves room for a
/// safe retry with the same key by a future caller.
pub struct HttpPaymentGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPaymentGateway {
    /// Builds a gateway with the production timeouts.
    pub fn new(base_url: &str) -> Result<Self, PaymentError> {
        Self::with_timeouts(base_url, CONNECT_TIMEOUT, REQUEST_TIMEOUT)
    }

    /// Builds a gateway with custom timeouts.
    pub fn with_timeouts(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, PaymentError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| PaymentError::Connect(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn transport_error(e: reqwest::Error) -> PaymentError {
    if e.is_connect() {
        PaymentError::Connect(e.to_string())
    } else if e.is_timeout() {
        PaymentError::Timeout(e.to_string())
    } else {
        PaymentError::Connect(e.to_string())
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    #[tracing::instrument(skip(self, token), fields(%order_id))]
    async fn create_charge(
        &self,
        order_id: &OrderId,
        token: &str,
        amount_cents: i64,
        currency: &str,
    ) -> Result<ChargeResult, PaymentError> {
        let idempotency_key = Uuid::new_v4().to_string();
        let body = ChargeRequest {
            amount: amount_cents,
            currency,
            payment_token: token,
            reference_id: order_id.as_str(),
        };

        let response = self
            .http
            .post(format!("{}{CHARGES_PATH}", self.base_url))
            .header(IDEMPOTENCY_KEY_HEADER, &idempotency_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(%order_id, error = %e, "payment request failed in transport, charge outcome unknown");
                transport_error(e)
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<ChargeResult>()
                .await
                .map_err(|e| PaymentError::Decode(e.to_string()));
        }

        let detail = response.text().await.unwrap_or_default();
        if status == StatusCode::PAYMENT_REQUIRED {
            tracing::warn!(%order_id, %detail, "payment declined");
            Err(PaymentError::Declined { detail })
        } else {
            tracing::error!(%order_id, status = status.as_u16(), %detail, "payment service returned an error");
            Err(PaymentError::Http {
                status: status.as_u16(),
                detail,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let gateway = HttpPaymentGateway::new("http://payment_service:8001/").unwrap();
        assert_eq!(gateway.base_url, "http://payment_service:8001");
    }

    #[test]
    fn test_charge_request_wire_format() {
        let body = ChargeRequest {
            amount: 14999,
            currency: "EUR",
            payment_token: "tok_ok",
            reference_id: "o1",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["amount"], 14999);
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["paymentToken"], "tok_ok");
        assert_eq!(json["referenceId"], "o1");
    }
}
