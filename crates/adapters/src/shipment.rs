//! AMQP publisher for warehouse shipment instructions.

use async_trait::async_trait;
use common::OrderId;
use domain::{OrderItem, ShipmentInstruction};
use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use saga::error::ShipmentError;
use saga::services::shipment::ShipmentGateway;
use tokio::sync::Mutex;

/// Queue receiving new shipment instructions.
pub const SHIPMENT_QUEUE: &str = "wms.orders.new";

/// AMQP `delivery_mode` marking a message persistent.
const PERSISTENT: u8 = 2;

struct BrokerLink {
    connection: Connection,
    channel: Channel,
}

impl BrokerLink {
    async fn connect(uri: &str) -> Result<Self, ShipmentError> {
        let connection = Connection::connect(uri, ConnectionProperties::default())
            .await
            .map_err(|e| ShipmentError::Connect(e.to_string()))?;
        let channel = connection
            .create_channel()
            .await
            .map_err(|e| ShipmentError::Connect(e.to_string()))?;
        channel
            .queue_declare(
                SHIPMENT_QUEUE,
                QueueDeclareOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| ShipmentError::Connect(e.to_string()))?;

        tracing::info!(queue = SHIPMENT_QUEUE, "shipment gateway connected to broker");
        Ok(Self {
            connection,
            channel,
        })
    }
}

/// Shipment adapter owning one broker connection and channel.
///
/// The connection is established on the first publish and re-established
/// on demand if the broker closed it in between. The channel is guarded
/// by a mutex: brokers do not permit concurrent publishes on one channel.
pub struct AmqpShipmentGateway {
    uri: String,
    link: Mutex<Option<BrokerLink>>,
}

impl AmqpShipmentGateway {
    /// Creates a gateway for the given AMQP URI. No I/O happens here.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            link: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ShipmentGateway for AmqpShipmentGateway {
    #[tracing::instrument(skip(self, items), fields(%order_id))]
    async fn send_shipment(
        &self,
        order_id: &OrderId,
        items: &[OrderItem],
    ) -> Result<(), ShipmentError> {
        let instruction = ShipmentInstruction::new(order_id, items);
        let payload =
            serde_json::to_vec(&instruction).map_err(|e| ShipmentError::Encode(e.to_string()))?;

        let mut guard = self.link.lock().await;
        let link = match &mut *guard {
            Some(link) if link.connection.status().connected() => link,
            slot => slot.insert(BrokerLink::connect(&self.uri).await?),
        };

        link.channel
            .basic_publish(
                "",
                SHIPMENT_QUEUE,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default().with_delivery_mode(PERSISTENT),
            )
            .await
            .map_err(|e| ShipmentError::Publish(e.to_string()))?
            .await
            .map_err(|e| ShipmentError::Publish(e.to_string()))?;

        metrics::counter!("shipment_instructions_published_total").increment(1);
        tracing::info!(
            %order_id,
            instruction_id = %instruction.instruction_id,
            "shipment instruction published"
        );
        Ok(())
    }

    async fn close(&self) {
        if let Some(link) = self.link.lock().await.take() {
            if let Err(e) = link.connection.close(200, "shipment gateway closed").await {
                tracing::debug!(error = %e, "broker connection close failed");
            }
        }
    }
}
