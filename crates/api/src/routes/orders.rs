//! The order intake endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use domain::Order;
use serde::Serialize;

use crate::error::ApiError;
use crate::spawner::SagaSpawner;

/// Shared application state accessible from all handlers.
pub struct AppState<W: SagaSpawner> {
    pub spawner: W,
}

/// Response body for an accepted order (202).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAccepted {
    pub processing_id: String,
    pub order_id: String,
    pub status: &'static str,
}

/// POST /v1/orders — accept a new order from the OMS.
///
/// Validates the payload, schedules the saga in the background and
/// returns immediately. The caller learns nothing about the eventual
/// outcome here; that is observable via logs and status updates only.
#[tracing::instrument(skip(state, order), fields(order_id = %order.order_id))]
pub async fn submit<W: SagaSpawner>(
    State(state): State<Arc<AppState<W>>>,
    Json(order): Json<Order>,
) -> Result<(StatusCode, Json<OrderAccepted>), ApiError> {
    order.validate()?;

    tracing::info!(order_id = %order.order_id, "new order received from OMS");
    metrics::counter!("orders_accepted_total").increment(1);

    let processing_id = format!("proc-{}", order.order_id);
    let order_id = order.order_id.to_string();

    state
        .spawner
        .spawn_saga(order)
        .map_err(ApiError::Internal)?;

    tracing::info!(%order_id, %processing_id, "accepted for background processing");

    Ok((
        StatusCode::ACCEPTED,
        Json(OrderAccepted {
            processing_id,
            order_id,
            status: "Processing accepted",
        }),
    ))
}
