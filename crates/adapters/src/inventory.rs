//! gRPC client for the inventory reservation service.

use std::time::Duration;

use async_trait::async_trait;
use common::OrderId;
use domain::OrderItem;
use saga::error::InventoryError;
use saga::services::inventory::{InventoryService, Reservation, ReservationStatus};
use tonic::transport::{Channel, Endpoint};

use crate::proto;
use crate::proto::inventory_service_client::InventoryServiceClient;

/// Deadline applied to every inventory RPC, including connect.
const RPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Inventory adapter over a single logical gRPC channel.
///
/// Cheap to construct per saga: the channel connects lazily on the first
/// call and is torn down on drop. Calls are bounded by [`RPC_TIMEOUT`].
pub struct GrpcInventoryClient {
    client: InventoryServiceClient<Channel>,
}

impl GrpcInventoryClient {
    /// Builds a client for the given endpoint.
    ///
    /// A bare `host:port` is accepted; the scheme defaults to `http://`.
    pub fn new(url: &str) -> Result<Self, InventoryError> {
        let url = if url.contains("://") {
            url.to_string()
        } else {
            format!("http://{url}")
        };

        let endpoint = Endpoint::from_shared(url)
            .map_err(|e| InventoryError::Connect(e.to_string()))?
            .connect_timeout(RPC_TIMEOUT)
            .timeout(RPC_TIMEOUT);

        Ok(Self {
            client: InventoryServiceClient::new(endpoint.connect_lazy()),
        })
    }
}

fn rpc_error(status: tonic::Status) -> InventoryError {
    InventoryError::Rpc {
        code: format!("{:?}", status.code()),
        message: status.message().to_string(),
    }
}

fn map_status(code: i32) -> ReservationStatus {
    match proto::ReservationStatus::try_from(code) {
        Ok(proto::ReservationStatus::Reserved) => ReservationStatus::Reserved,
        Ok(proto::ReservationStatus::OutOfStock) => ReservationStatus::OutOfStock,
        Ok(proto::ReservationStatus::ItemNotFound) => ReservationStatus::ItemNotFound,
        Ok(proto::ReservationStatus::Unspecified) | Err(_) => ReservationStatus::Other(code),
    }
}

#[async_trait]
impl InventoryService for GrpcInventoryClient {
    #[tracing::instrument(skip(self, items), fields(%order_id))]
    async fn reserve_items(
        &self,
        order_id: &OrderId,
        items: &[OrderItem],
    ) -> Result<Reservation, InventoryError> {
        let request = proto::ReserveItemsRequest {
            order_id: order_id.to_string(),
            items: items
                .iter()
                .map(|item| proto::Item {
                    sku: item.sku.clone(),
                    quantity: item.quantity,
                })
                .collect(),
        };

        let response = self
            .client
            .clone()
            .reserve_items(request)
            .await
            .map_err(|status| {
                tracing::error!(%order_id, code = ?status.code(), details = status.message(), "inventory ReserveItems rpc failed");
                rpc_error(status)
            })?
            .into_inner();

        Ok(Reservation {
            reservation_id: response.reservation_id,
            status: map_status(response.status),
        })
    }

    #[tracing::instrument(skip(self), fields(%order_id))]
    async fn release_items(&self, order_id: &OrderId) -> Result<(), InventoryError> {
        tracing::info!(%order_id, "compensation: sending ReleaseItems");

        let request = proto::ReleaseItemsRequest {
            order_id: order_id.to_string(),
        };

        self.client
            .clone()
            .release_items(request)
            .await
            .map_err(|status| {
                tracing::error!(%order_id, code = ?status.code(), details = status.message(), "inventory ReleaseItems rpc failed");
                rpc_error(status)
            })?;

        Ok(())
    }
}
