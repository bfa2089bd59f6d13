//! Shipment instructions published to the warehouse queue.

use chrono::Utc;
use common::OrderId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::order::OrderItem;

/// Delivery address attached to a shipment instruction.
///
/// The OMS contract does not yet carry address data, so instructions go
/// out with placeholder values until the address source is wired up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub street: String,
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self {
            name: "Max Mustermann".to_string(),
            street: "Testweg 1".to_string(),
        }
    }
}

/// The message published to `wms.orders.new` for each shipped order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentInstruction {
    /// Fresh per-publish identifier, distinct from any retry identity.
    pub instruction_id: String,
    /// The order this instruction belongs to.
    pub order_id: OrderId,
    /// UTC timestamp in ISO-8601 with `Z` suffix.
    pub instruction_timestamp: String,
    /// Items in the exact order they appeared on the order.
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
}

impl ShipmentInstruction {
    /// Builds a new instruction for the given order and items.
    pub fn new(order_id: &OrderId, items: &[OrderItem]) -> Self {
        Self {
            instruction_id: Uuid::new_v4().to_string(),
            order_id: order_id.clone(),
            instruction_timestamp: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            items: items.to_vec(),
            shipping_address: ShippingAddress::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<OrderItem> {
        vec![
            OrderItem {
                sku: "A".to_string(),
                quantity: 2,
            },
            OrderItem {
                sku: "B".to_string(),
                quantity: 1,
            },
        ]
    }

    #[test]
    fn test_instruction_ids_are_fresh() {
        let order_id = OrderId::new("o1");
        let a = ShipmentInstruction::new(&order_id, &items());
        let b = ShipmentInstruction::new(&order_id, &items());
        assert_ne!(a.instruction_id, b.instruction_id);
        assert!(Uuid::parse_str(&a.instruction_id).is_ok());
    }

    #[test]
    fn test_timestamp_is_utc_with_z_suffix() {
        let instruction = ShipmentInstruction::new(&OrderId::new("o1"), &items());
        assert!(instruction.instruction_timestamp.ends_with('Z'));
        assert!(
            chrono::DateTime::parse_from_rfc3339(&instruction.instruction_timestamp).is_ok(),
            "timestamp {:?} should be RFC 3339",
            instruction.instruction_timestamp
        );
    }

    #[test]
    fn test_item_order_preserved() {
        let instruction = ShipmentInstruction::new(&OrderId::new("o1"), &items());
        let skus: Vec<&str> = instruction.items.iter().map(|i| i.sku.as_str()).collect();
        assert_eq!(skus, ["A", "B"]);
    }

    #[test]
    fn test_wire_format() {
        let instruction = ShipmentInstruction::new(&OrderId::new("o1"), &items());
        let json = serde_json::to_value(&instruction).unwrap();
        assert_eq!(json["orderId"], "o1");
        assert!(json["instructionId"].is_string());
        assert!(json["instructionTimestamp"].is_string());
        assert_eq!(json["items"][0]["sku"], "A");
        assert_eq!(json["shippingAddress"]["name"], "Max Mustermann");
    }
}
