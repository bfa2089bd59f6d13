//! Integration tests for the gRPC inventory client against an in-process server.

use std::sync::{Arc, Mutex};

use adapters::GrpcInventoryClient;
use adapters::proto::inventory_service_server::{
    InventoryService as InventoryRpc, InventoryServiceServer,
};
use adapters::proto::{
    ReleaseItemsRequest, ReleaseItemsResponse, ReservationStatus as ProtoStatus,
    ReserveItemsRequest, ReserveItemsResponse,
};
use common::OrderId;
use domain::OrderItem;
use saga::services::inventory::{InventoryService, ReservationStatus};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

/// Mock inventory service keyed on magic SKU substrings.
#[derive(Default)]
struct MockInventory {
    released: Arc<Mutex<Vec<String>>>,
}

#[tonic::async_trait]
impl InventoryRpc for MockInventory {
    async fn reserve_items(
        &self,
        request: Request<ReserveItemsRequest>,
    ) -> Result<Response<ReserveItemsResponse>, Status> {
        let request = request.into_inner();

        if request.items.iter().any(|i| i.sku.contains("RPC-FAIL")) {
            return Err(Status::internal("simulated backend failure"));
        }

        let status = if request.items.iter().any(|i| i.sku.contains("OUT-OF-STOCK")) {
            ProtoStatus::OutOfStock
        } else if request.items.iter().any(|i| i.sku.contains("NOT-FOUND")) {
            ProtoStatus::ItemNotFound
        } else if request.items.iter().any(|i| i.sku.contains("WEIRD")) {
            ProtoStatus::Unspecified
        } else {
            ProtoStatus::Reserved
        };

        Ok(Response::new(ReserveItemsResponse {
            reservation_id: format!("res-{}", request.order_id),
            status: status as i32,
        }))
    }

    async fn release_items(
        &self,
        request: Request<ReleaseItemsRequest>,
    ) -> Result<Response<ReleaseItemsResponse>, Status> {
        self.released
            .lock()
            .unwrap()
            .push(request.into_inner().order_id);
        Ok(Response::new(ReleaseItemsResponse { success: true }))
    }
}

async fn spawn_server() -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let released = Arc::new(Mutex::new(Vec::new()));
    let service = MockInventory {
        released: released.clone(),
    };

    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(InventoryServiceServer::new(service))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    (format!("http://{addr}"), released)
}

fn item(sku: &str, quantity: u32) -> OrderItem {
    OrderItem {
        sku: sku.to_string(),
        quantity,
    }
}

#[tokio::test]
async fn test_reserve_items_success() {
    let (url, _) = spawn_server().await;
    let client = GrpcInventoryClient::new(&url).unwrap();

    let reservation = client
        .reserve_items(&OrderId::new("o1"), &[item("A", 2)])
        .await
        .unwrap();

    assert_eq!(reservation.status, ReservationStatus::Reserved);
    assert_eq!(reservation.reservation_id, "res-o1");
}

#[tokio::test]
async fn test_out_of_stock_status_mapped() {
    let (url, _) = spawn_server().await;
    let client = GrpcInventoryClient::new(&url).unwrap();

    let reservation = client
        .reserve_items(&OrderId::new("o2"), &[item("OUT-OF-STOCK-1", 1)])
        .await
        .unwrap();

    assert_eq!(reservation.status, ReservationStatus::OutOfStock);
}

#[tokio::test]
async fn test_item_not_found_status_mapped() {
    let (url, _) = spawn_server().await;
    let client = GrpcInventoryClient::new(&url).unwrap();

    let reservation = client
        .reserve_items(&OrderId::new("o3"), &[item("SKU-NOT-FOUND", 1)])
        .await
        .unwrap();

    assert_eq!(reservation.status, ReservationStatus::ItemNotFound);
}

#[tokio::test]
async fn test_unrecognized_status_mapped_to_other() {
    let (url, _) = spawn_server().await;
    let client = GrpcInventoryClient::new(&url).unwrap();

    let reservation = client
        .reserve_items(&OrderId::new("o4"), &[item("WEIRD", 1)])
        .await
        .unwrap();

    assert_eq!(reservation.status, ReservationStatus::Other(0));
}

#[tokio::test]
async fn test_rpc_error_carries_code_and_details() {
    let (url, _) = spawn_server().await;
    let client = GrpcInventoryClient::new(&url).unwrap();

    let error = client
        .reserve_items(&OrderId::new("o5"), &[item("RPC-FAIL", 1)])
        .await
        .unwrap_err();

    match error {
        saga::InventoryError::Rpc { code, message } => {
            assert_eq!(code, "Internal");
            assert!(message.contains("simulated backend failure"));
        }
        other => panic!("expected rpc error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_release_items_reaches_service() {
    let (url, released) = spawn_server().await;
    let client = GrpcInventoryClient::new(&url).unwrap();

    client.release_items(&OrderId::new("o6")).await.unwrap();

    assert_eq!(released.lock().unwrap().as_slice(), ["o6"]);
}

#[tokio::test]
async fn test_unreachable_server_surfaces_rpc_error() {
    // Bind and drop a listener to get a port with nothing behind it.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GrpcInventoryClient::new(&format!("http://{addr}")).unwrap();
    let result = client
        .reserve_items(&OrderId::new("o7"), &[item("A", 1)])
        .await;

    assert!(matches!(result, Err(saga::InventoryError::Rpc { .. })));
}
