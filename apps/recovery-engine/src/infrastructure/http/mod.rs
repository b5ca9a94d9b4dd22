//! HTTP adapter.

mod controller;
mod request;
mod response;

pub use controller::{AppState, create_router};
pub use request::{RecoveryPlanRequest, RecoveryRequest};
pub use response::{HealthResponse, RecoveryPlanResponse, RecoveryResponse, ScenarioResponse};
