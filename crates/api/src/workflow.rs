//! Glue between the intake port and the saga orchestrator.

use adapters::{AmqpShipmentGateway, GrpcInventoryClient, HttpPaymentGateway};
use domain::Order;
use saga::SagaOrchestrator;

use crate::config::BackendConfig;

/// Runs the full order workflow as a background task.
///
/// Builds one adapter per downstream system for this saga alone, so no
/// connection state is shared across concurrently running orders.
pub async fn process_order(backends: BackendConfig, order: Order) {
    let order_id = order.order_id.clone();

    let inventory = match GrpcInventoryClient::new(&backends.inventory_url) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(%order_id, error = %e, "inventory client setup failed, workflow aborted");
            return;
        }
    };
    let payment = match HttpPaymentGateway::new(&backends.payment_url) {
        Ok(gateway) => gateway,
        Err(e) => {
            tracing::error!(%order_id, error = %e, "payment gateway setup failed, workflow aborted");
            return;
        }
    };
    let shipment = AmqpShipmentGateway::new(backends.amqp_uri());

    let report = SagaOrchestrator::new(inventory, payment, shipment)
        .run(&order)
        .await;

    tracing::info!(%order_id, state = %report.state, "order workflow finished");
}
