//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API over the recovery calculator. Infeasible goals are
//! part of the result, so every well-formed request answers 200.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::domain::recovery::{
    RawRecoveryInput, RecoveryCalculator, RecoveryPlan, RecoveryPlanner, RecoveryResult, Scenario,
};
use crate::observability::record_recovery;

use super::request::{RecoveryPlanRequest, RecoveryRequest};
use super::response::{HealthResponse, RecoveryPlanResponse, RecoveryResponse};

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Calculator for custom goals.
    pub calculator: RecoveryCalculator,
    /// Planner for the break-even and target-profit scenarios.
    pub planner: RecoveryPlanner,
    /// Application version.
    pub version: String,
}

impl AppState {
    /// Create state with the given planner, sharing its calculator settings.
    #[must_use]
    pub fn new(calculator: RecoveryCalculator, planner: RecoveryPlanner, version: &str) -> Self {
        Self {
            calculator,
            planner,
            version: version.to_string(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/recovery", post(compute_recovery))
        .route("/api/v1/recovery/plan", post(plan_recovery))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Single-goal endpoint.
async fn compute_recovery(
    State(state): State<AppState>,
    Json(request): Json<RecoveryRequest>,
) -> impl IntoResponse {
    let input = RawRecoveryInput::from(request);
    let result = state.calculator.compute_raw(&input);
    record_recovery("custom", &result);

    if let Some(reason) = result.failure_reason() {
        tracing::info!(
            reason = reason.code(),
            quantity = input.current_quantity,
            "recovery goal infeasible"
        );
    }

    (StatusCode::OK, Json(RecoveryResponse::from(result)))
}

/// Break-even and target-profit scenarios endpoint.
async fn plan_recovery(
    State(state): State<AppState>,
    Json(request): Json<RecoveryPlanRequest>,
) -> impl IntoResponse {
    let plan = match request.parse() {
        Ok(inputs) => {
            state
                .planner
                .plan(&inputs.position, inputs.profit_margin, inputs.target_profit)
        }
        Err(reason) => {
            tracing::info!(reason = reason.code(), "recovery plan request rejected");
            let failed = Scenario {
                goal: None,
                result: RecoveryResult::failure(reason),
            };
            RecoveryPlan {
                break_even: failed,
                target_profit: failed,
            }
        }
    };

    record_recovery("break_even", &plan.break_even.result);
    record_recovery("target_profit", &plan.target_profit.result);

    (StatusCode::OK, Json(RecoveryPlanResponse::from(plan)))
}
