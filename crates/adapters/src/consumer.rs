//! Long-lived consumer for warehouse status updates.

use std::time::Duration;

use domain::StatusUpdate;
use futures_util::StreamExt;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Connection, ConnectionProperties};

/// Queue carrying warehouse status updates.
pub const STATUS_QUEUE: &str = "wms.status.updates";

/// Back-off before reconnecting after a broker failure.
const RECONNECT_DELAY: Duration = Duration::from_secs(10);

/// What to do with a delivered message body.
#[derive(Debug, PartialEq, Eq)]
enum Disposition {
    /// Body parsed: log it and ack.
    Ack,
    /// Body is not a JSON object: nack without requeue (DLQ).
    DeadLetter,
}

fn classify(body: &[u8]) -> (Disposition, Option<StatusUpdate>) {
    match StatusUpdate::parse(body) {
        Ok(update) => (Disposition::Ack, Some(update)),
        Err(e) => {
            tracing::error!(error = %e, "discarding malformed status message");
            (Disposition::DeadLetter, None)
        }
    }
}

/// Consumes `wms.status.updates` for the life of the process.
///
/// Runs in its own task, independent of the intake port and all sagas,
/// and shares no state with them. The loop never terminates on its own:
/// any broker failure is answered with a delayed reconnect.
pub struct StatusListener {
    uri: String,
}

impl StatusListener {
    /// Creates a listener for the given AMQP URI. No I/O happens here.
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// Runs the consume loop forever. Spawn this on its own task.
    pub async fn run(self) {
        tracing::info!("warehouse status listener starting");
        loop {
            match self.consume().await {
                Ok(()) => {
                    tracing::warn!(
                        "status consumer stream ended, reconnecting in {}s",
                        RECONNECT_DELAY.as_secs()
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "status consumer lost broker connection, reconnecting in {}s",
                        RECONNECT_DELAY.as_secs()
                    );
                }
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }

    /// One connection lifetime: consume until the stream ends or errors.
    async fn consume(&self) -> Result<(), lapin::Error> {
        let connection = Connection::connect(&self.uri, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel
            .queue_declare(
                STATUS_QUEUE,
                QueueDeclareOptions::default(),
                FieldTable::default(),
            )
            .await?;

        let mut consumer = channel
            .basic_consume(
                STATUS_QUEUE,
                "order-integration-status",
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        tracing::info!(queue = STATUS_QUEUE, "status listener active");

        while let Some(delivery) = consumer.next().await {
            let delivery = delivery?;
            match classify(&delivery.data) {
                (Disposition::Ack, Some(update)) => {
                    metrics::counter!("wms_status_updates_total").increment(1);
                    tracing::info!(
                        order_id = %update.order_id,
                        status = %update.status,
                        payload = %update.payload,
                        "warehouse status update"
                    );
                    delivery.ack(BasicAckOptions::default()).await?;
                }
                _ => {
                    metrics::counter!("wms_status_rejected_total").increment(1);
                    delivery
                        .nack(BasicNackOptions {
                            requeue: false,
                            ..BasicNackOptions::default()
                        })
                        .await?;
                }
            }
        }

        Ok(())
    }
}
