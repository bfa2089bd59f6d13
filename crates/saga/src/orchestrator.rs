//! The saga orchestrator.
//!
//! Runs one order through reserve → charge → ship and performs the
//! compensating release when payment fails after a committed reservation.

use common::OrderId;
use domain::Order;
use serde::Serialize;

use crate::error::PaymentError;
use crate::services::inventory::{InventoryService, ReservationStatus};
use crate::services::payment::PaymentGateway;
use crate::services::shipment::ShipmentGateway;
use crate::state::SagaState;
use crate::steps;

/// Terminal record of a saga run.
///
/// The orchestrator holds no state beyond this; external identifiers are
/// remembered only long enough to log them.
#[derive(Debug, Clone, Serialize)]
pub struct SagaReport {
    pub order_id: OrderId,
    /// Terminal state: `Done`, `Cancelled` or `AlertManual`.
    pub state: SagaState,
    /// Transaction ID of a captured charge, if payment committed.
    pub transaction_id: Option<String>,
    /// Human-readable cause when the saga did not complete.
    pub failure: Option<String>,
}

/// Orchestrates a single order's saga across the three downstream systems.
///
/// One orchestrator instance is built per order; it owns its adapters and
/// releases the shipment gateway's connection on every exit path. Steps
/// run strictly in sequence; the only compensating action is releasing
/// the inventory reservation after a payment failure.
pub struct SagaOrchestrator<I, P, S>
where
    I: InventoryService,
    P: PaymentGateway,
    S: ShipmentGateway,
{
    inventory: I,
    payment: P,
    shipment: S,
}

impl<I, P, S> SagaOrchestrator<I, P, S>
where
    I: InventoryService,
    P: PaymentGateway,
    S: ShipmentGateway,
{
    /// Creates an orchestrator from the three service ports.
    pub fn new(inventory: I, payment: P, shipment: S) -> Self {
        Self {
            inventory,
            payment,
            shipment,
        }
    }

    /// Executes the saga for one validated order.
    ///
    /// Never fails as such: every outcome, including "operator must
    /// intervene", is a terminal state in the returned report.
    #[tracing::instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn run(self, order: &Order) -> SagaReport {
        metrics::counter!("saga_executions_total").increment(1);
        let started = std::time::Instant::now();

        let report = self.execute(order).await;
        self.shipment.close().await;

        let duration = started.elapsed().as_secs_f64();
        metrics::histogram!("saga_duration_seconds").record(duration);
        match report.state {
            SagaState::Done => {
                metrics::counter!("saga_completed").increment(1);
                tracing::info!(order_id = %report.order_id, duration, "saga completed successfully");
            }
            SagaState::Cancelled => {
                metrics::counter!("saga_cancelled").increment(1);
                tracing::warn!(
                    order_id = %report.order_id,
                    reason = report.failure.as_deref().unwrap_or("unknown"),
                    "saga cancelled"
                );
            }
            SagaState::AlertManual => {
                metrics::counter!("saga_manual_alerts_total").increment(1);
                tracing::error!(
                    order_id = %report.order_id,
                    reason = report.failure.as_deref().unwrap_or("unknown"),
                    "saga requires manual intervention"
                );
            }
            _ => {}
        }

        report
    }

    async fn execute(&self, order: &Order) -> SagaReport {
        let order_id = &order.order_id;
        let mut state = SagaState::Start;

        // Step 1: reserve inventory
        Self::transition(order_id, &mut state, SagaState::Reserving);
        tracing::info!(%order_id, step = steps::STEP_RESERVE, "saga step started");

        let reservation = match self.inventory.reserve_items(order_id, &order.items).await {
            Ok(reservation) => reservation,
            Err(e) => {
                // First step: nothing committed yet, nothing to compensate.
                tracing::error!(%order_id, step = steps::STEP_RESERVE, error = %e, "inventory call failed, aborting");
                return Self::finish(order_id, &mut state, SagaState::Cancelled, None, e.to_string());
            }
        };

        match reservation.status {
            ReservationStatus::Reserved => {
                tracing::info!(%order_id, reservation_id = %reservation.reservation_id, "inventory reserved");
                Self::transition(order_id, &mut state, SagaState::Reserved);
            }
            ReservationStatus::OutOfStock => {
                tracing::warn!(%order_id, "cancelled: items out of stock");
                return Self::finish(
                    order_id,
                    &mut state,
                    SagaState::Cancelled,
                    None,
                    "out of stock".to_string(),
                );
            }
            ReservationStatus::ItemNotFound => {
                tracing::error!(%order_id, "cancelled: sku unknown to inventory service");
                return Self::finish(
                    order_id,
                    &mut state,
                    SagaState::Cancelled,
                    None,
                    "item not found".to_string(),
                );
            }
            ReservationStatus::Other(code) => {
                tracing::error!(%order_id, status = code, "cancelled: unknown inventory status");
                return Self::finish(
                    order_id,
                    &mut state,
                    SagaState::Cancelled,
                    None,
                    format!("unknown inventory status {code}"),
                );
            }
        }

        // Step 2: charge payment
        let amount_cents = order.amount_cents();
        Self::transition(order_id, &mut state, SagaState::Charging);
        tracing::info!(
            %order_id,
            step = steps::STEP_CHARGE,
            amount_cents,
            currency = %order.currency,
            "saga step started"
        );

        let charge = match self
            .payment
            .create_charge(order_id, &order.payment_token, amount_cents, &order.currency)
            .await
        {
            Ok(charge) => charge,
            Err(e) => return self.compensate(order_id, &mut state, e).await,
        };
        tracing::info!(%order_id, transaction_id = %charge.transaction_id, "payment captured");
        Self::transition(order_id, &mut state, SagaState::Charged);

        // Step 3: dispatch to warehouse
        Self::transition(order_id, &mut state, SagaState::Shipping);
        tracing::info!(%order_id, step = steps::STEP_SHIP, "saga step started");

        if let Err(e) = self.shipment.send_shipment(order_id, &order.items).await {
            // Payment stays captured; no automatic reversal at this edge.
            tracing::error!(
                %order_id,
                step = steps::STEP_SHIP,
                transaction_id = %charge.transaction_id,
                error = %e,
                "payment captured but shipment dispatch failed, manual intervention required"
            );
            return Self::finish(
                order_id,
                &mut state,
                SagaState::AlertManual,
                Some(charge.transaction_id),
                format!("shipment dispatch failed: {e}"),
            );
        }

        Self::transition(order_id, &mut state, SagaState::Done);
        SagaReport {
            order_id: order_id.clone(),
            state,
            transaction_id: Some(charge.transaction_id),
            failure: None,
        }
    }

    /// Releases the reservation after a payment failure.
    ///
    /// Transport failures are released too even though the charge may have
    /// landed on the payment side; the idempotency key would make a retry
    /// safe, but this orchestrator does not retry.
    async fn compensate(
        &self,
        order_id: &OrderId,
        state: &mut SagaState,
        cause: PaymentError,
    ) -> SagaReport {
        if cause.is_declined() {
            tracing::warn!(%order_id, step = steps::STEP_CHARGE, error = %cause, "payment declined, compensating");
        } else if cause.is_transport() {
            tracing::error!(%order_id, step = steps::STEP_CHARGE, error = %cause, "payment outcome unknown, compensating");
        } else {
            tracing::error!(%order_id, step = steps::STEP_CHARGE, error = %cause, "payment failed, compensating");
        }

        Self::transition(order_id, state, SagaState::Compensating);
        match self.inventory.release_items(order_id).await {
            Ok(()) => {
                tracing::info!(%order_id, "reservation released, order cancelled");
                Self::finish(order_id, state, SagaState::Cancelled, None, cause.to_string())
            }
            Err(release_err) => {
                tracing::error!(
                    %order_id,
                    error = %release_err,
                    "COMPENSATION FAILED, reservation may be dangling, manual action required"
                );
                Self::finish(
                    order_id,
                    state,
                    SagaState::AlertManual,
                    None,
                    format!("{cause}; release failed: {release_err}"),
                )
            }
        }
    }

    fn transition(order_id: &OrderId, state: &mut SagaState, next: SagaState) {
        tracing::debug!(%order_id, from = %state, to = %next, "saga state transition");
        *state = next;
    }

    fn finish(
        order_id: &OrderId,
        state: &mut SagaState,
        terminal: SagaState,
        transaction_id: Option<String>,
        failure: String,
    ) -> SagaReport {
        Self::transition(order_id, state, terminal);
        SagaReport {
            order_id: order_id.clone(),
            state: *state,
            transaction_id,
            failure: Some(failure),
        }
    }
}
