//! Saga state machine.

use serde::{Deserialize, Serialize};

/// The state of one order's saga.
///
/// State transitions:
/// ```text
/// Start ──► Reserving ──► Reserved ──► Charging ──► Charged ──► Shipping ──► Done
///               │                          │                        │
///               │                          ▼                        ▼
///               └──► Cancelled      Compensating ──► Cancelled   AlertManual
///                                          │
///                                          └──► AlertManual
/// ```
///
/// `Cancelled` from `Reserving` needs no compensation (nothing was
/// committed). `AlertManual` means automated reconciliation is not
/// possible and an operator must intervene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SagaState {
    /// Saga has not issued any call yet.
    #[default]
    Start,

    /// Reservation request in flight.
    Reserving,

    /// Inventory committed a reservation.
    Reserved,

    /// Charge request in flight.
    Charging,

    /// Payment captured the charge.
    Charged,

    /// Shipment instruction being published.
    Shipping,

    /// A committed reservation is being released after a payment failure.
    Compensating,

    /// All three steps committed (terminal).
    Done,

    /// Saga stopped with no committed state left behind (terminal).
    Cancelled,

    /// Committed state could not be reconciled automatically (terminal).
    AlertManual,
}

impl SagaState {
    /// Returns true if no further transitions can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SagaState::Done | SagaState::Cancelled | SagaState::AlertManual
        )
    }

    /// Returns true if an operator has to intervene.
    pub fn requires_manual_action(&self) -> bool {
        matches!(self, SagaState::AlertManual)
    }

    /// Returns the state name as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaState::Start => "START",
            SagaState::Reserving => "RESERVING",
            SagaState::Reserved => "RESERVED",
            SagaState::Charging => "CHARGING",
            SagaState::Charged => "CHARGED",
            SagaState::Shipping => "SHIPPING",
            SagaState::Compensating => "COMPENSATING",
            SagaState::Done => "DONE",
            SagaState::Cancelled => "CANCELLED",
            SagaState::AlertManual => "ALERT_MANUAL",
        }
    }
}

impl std::fmt::Display for SagaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
