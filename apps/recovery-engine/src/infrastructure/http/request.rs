//! HTTP request DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::recovery::{FailureReason, PositionState, RawRecoveryInput, to_decimal};

/// Request to compute a single recovery goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryRequest {
    /// Shares currently held.
    pub current_quantity: i64,
    /// Weighted-average cost per share.
    pub average_price: f64,
    /// Latest market price per share.
    pub current_price: f64,
    /// Projected rise from the current price, in percent.
    pub target_rise: f64,
    /// Profit over cost basis at the projected price, in percent.
    pub target_profit: f64,
}

impl From<RecoveryRequest> for RawRecoveryInput {
    fn from(request: RecoveryRequest) -> Self {
        Self {
            current_quantity: request.current_quantity,
            average_price: request.average_price,
            current_price: request.current_price,
            target_rise: request.target_rise,
            target_profit: request.target_profit,
        }
    }
}

/// Request to evaluate the break-even and target-profit scenarios.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPlanRequest {
    /// Shares currently held.
    pub current_quantity: i64,
    /// Weighted-average cost per share.
    pub average_price: f64,
    /// Latest market price per share.
    pub current_price: f64,
    /// Percentage points added to the break-even rise (configured default
    /// when absent).
    #[serde(default)]
    pub profit_margin: Option<f64>,
    /// Profit target, in percent (configured default when absent).
    #[serde(default)]
    pub target_profit: Option<f64>,
}

/// Parsed plan request.
pub(crate) struct PlanInputs {
    pub position: PositionState,
    pub profit_margin: Option<Decimal>,
    pub target_profit: Option<Decimal>,
}

impl RecoveryPlanRequest {
    pub(crate) fn parse(&self) -> Result<PlanInputs, FailureReason> {
        Ok(PlanInputs {
            position: PositionState::from_raw(
                self.current_quantity,
                self.average_price,
                self.current_price,
            )?,
            profit_margin: self.profit_margin.map(to_decimal).transpose()?,
            target_profit: self.target_profit.map(to_decimal).transpose()?,
        })
    }
}
