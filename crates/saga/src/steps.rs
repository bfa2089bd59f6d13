//! Saga step identifiers used in logs and metrics labels.

/// Step name: reserve stock with the inventory service.
pub const STEP_RESERVE: &str = "reserve_inventory";

/// Step name: capture the charge with the payment service.
pub const STEP_CHARGE: &str = "charge_payment";

/// Step name: publish the shipment instruction to the warehouse queue.
pub const STEP_SHIP: &str = "send_shipment";
