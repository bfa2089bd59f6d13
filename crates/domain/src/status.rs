//! Inbound warehouse status updates.

use serde_json::Value;

use crate::error::StatusError;

/// Fallback for status updates that omit `orderId` or `status`.
const UNKNOWN: &str = "UNKNOWN";

/// A status update consumed from `wms.status.updates`.
///
/// The warehouse sends free-form JSON objects; only `orderId` and `status`
/// are recognized, everything else is kept in `payload` for logging.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub order_id: String,
    pub status: String,
    /// The full payload as received.
    pub payload: Value,
}

impl StatusUpdate {
    /// Parses a raw message body.
    ///
    /// Returns an error for anything that is not a JSON object; such
    /// messages are rejected without requeue by the consumer.
    pub fn parse(body: &[u8]) -> Result<Self, StatusError> {
        let payload: Value = serde_json::from_slice(body)?;
        if !payload.is_object() {
            return Err(StatusError::NotAnObject);
        }

        let field = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN)
                .to_string()
        };

        Ok(Self {
            order_id: field("orderId"),
            status: field("status"),
            payload,
        })
    }
}
