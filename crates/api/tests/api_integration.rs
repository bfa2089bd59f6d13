//! Integration tests for the intake API server.

use std::sync::{Arc, Mutex, OnceLock};

use api::routes::orders::AppState;
use api::spawner::SagaSpawner;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain::Order;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

/// Records submitted orders instead of running sagas.
#[derive(Default, Clone)]
struct RecordingSpawner {
    orders: Arc<Mutex<Vec<Order>>>,
}

impl SagaSpawner for RecordingSpawner {
    fn spawn_saga(&self, order: Order) -> Result<(), String> {
        self.orders.lock().unwrap().push(order);
        Ok(())
    }
}

/// Fails every scheduling attempt.
struct FailingSpawner;

impl SagaSpawner for FailingSpawner {
    fn spawn_saga(&self, _order: Order) -> Result<(), String> {
        Err("task queue unavailable".to_string())
    }
}

fn setup() -> (axum::Router, RecordingSpawner) {
    let spawner = RecordingSpawner::default();
    let state = Arc::new(AppState {
        spawner: spawner.clone(),
    });
    (api::create_app(state, get_metrics_handle()), spawner)
}

fn order_json() -> serde_json::Value {
    serde_json::json!({
        "orderId": "o1",
        "paymentToken": "tok_ok",
        "totalAmount": 149.99,
        "currency": "EUR",
        "items": [{"sku": "A", "quantity": 2}]
    })
}

fn post_order(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/orders")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_submit_order_accepted() {
    let (app, spawner) = setup();

    let response = app.oneshot(post_order(&order_json())).await.unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = response_json(response).await;
    assert_eq!(json["processingId"], "proc-o1");
    assert_eq!(json["orderId"], "o1");
    assert_eq!(json["status"], "Processing accepted");

    let orders = spawner.orders.lock().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order_id.as_str(), "o1");
    assert_eq!(orders[0].items[0].sku, "A");
}

#[tokio::test]
async fn test_submit_empty_items_rejected() {
    let (app, spawner) = setup();

    let mut body = order_json();
    body["items"] = serde_json::json!([]);
    let response = app.oneshot(post_order(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = response_json(response).await;
    assert!(
        json["detail"].as_str().unwrap().contains("at least one item"),
        "unexpected detail: {json}"
    );
    assert!(spawner.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_zero_quantity_rejected() {
    let (app, spawner) = setup();

    let mut body = order_json();
    body["items"][0]["quantity"] = serde_json::json!(0);
    let response = app.oneshot(post_order(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(spawner.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_empty_order_id_rejected() {
    let (app, spawner) = setup();

    let mut body = order_json();
    body["orderId"] = serde_json::json!("");
    let response = app.oneshot(post_order(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(spawner.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_missing_field_rejected() {
    let (app, spawner) = setup();

    let mut body = order_json();
    body.as_object_mut().unwrap().remove("orderId");
    let response = app.oneshot(post_order(&body)).await.unwrap();

    assert!(response.status().is_client_error());
    assert!(spawner.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_malformed_json_rejected() {
    let (app, spawner) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/orders")
                .header("content-type", "application/json")
                .body(Body::from("not-json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert!(spawner.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_scheduling_failure_returns_500_detail() {
    let state = Arc::new(AppState {
        spawner: FailingSpawner,
    });
    let app = api::create_app(state, get_metrics_handle());

    let response = app.oneshot(post_order(&order_json())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert_eq!(
        json["detail"],
        "Internal server error while accepting order."
    );
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
