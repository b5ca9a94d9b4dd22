//! HTTP response DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::recovery::{FailureReason, RecoveryPlan, RecoveryResult, Scenario};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Outcome of a single recovery goal.
///
/// Numeric fields are present only on success; `failureReason` only on
/// failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryResponse {
    /// Whether a feasible purchase exists.
    pub success: bool,
    /// Additional whole shares to buy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty_to_buy: Option<u64>,
    /// Cost of the purchase, in cents precision.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub investment_required: Option<Decimal>,
    /// Average cost after the purchase.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub new_average_price: Option<Decimal>,
    /// Why the goal is infeasible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<FailureReason>,
}

impl From<RecoveryResult> for RecoveryResponse {
    fn from(result: RecoveryResult) -> Self {
        match result {
            RecoveryResult::Success(success) => Self {
                success: true,
                qty_to_buy: Some(success.qty_to_buy),
                investment_required: Some(success.investment_required.amount()),
                new_average_price: Some(success.new_average_price.amount()),
                failure_reason: None,
            },
            RecoveryResult::Failure { reason } => Self {
                success: false,
                qty_to_buy: None,
                investment_required: None,
                new_average_price: None,
                failure_reason: Some(reason),
            },
        }
    }
}

/// One scenario of a recovery plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResponse {
    /// Rise evaluated, in percent (absent when it could not be derived).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub target_rise: Option<Decimal>,
    /// Profit evaluated, in percent.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub target_profit: Option<Decimal>,
    /// Outcome.
    pub result: RecoveryResponse,
}

impl From<Scenario> for ScenarioResponse {
    fn from(scenario: Scenario) -> Self {
        Self {
            target_rise: scenario.goal.map(|g| g.target_rise.round_dp(4)),
            target_profit: scenario.goal.map(|g| g.target_profit),
            result: scenario.result.into(),
        }
    }
}

/// Response from plan evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPlanResponse {
    /// Recover to the average cost.
    pub break_even: ScenarioResponse,
    /// Break-even rise plus margin, with a profit target.
    pub target_profit: ScenarioResponse,
}

impl From<RecoveryPlan> for RecoveryPlanResponse {
    fn from(plan: RecoveryPlan) -> Self {
        Self {
            break_even: plan.break_even.into(),
            target_profit: plan.target_profit.into(),
        }
    }
}
