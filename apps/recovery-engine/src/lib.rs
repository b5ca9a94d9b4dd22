// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Recovery Engine - Rust Core Library
//!
//! Averaging-down calculator for underwater stock positions.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: pure computation with no I/O
//!   - `recovery`: position and goal inputs, the solver, tagged outcomes,
//!     break-even and target-profit plans
//!   - `shared`: `Money` rounded to cents
//!
//! - **Infrastructure**: adapters
//!   - `http`: Axum REST API over the calculator
//!
//! - **Ambient**: `config` (YAML with env interpolation), `telemetry`
//!   (tracing + optional OTLP), `observability` (Prometheus metrics)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Configuration loading and validation.
pub mod config;

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Prometheus metrics.
pub mod observability;

/// Tracing subscriber and OpenTelemetry setup.
pub mod telemetry;

pub use config::{Config, ConfigError, load_config};
pub use domain::recovery::{
    FailureReason, PositionState, RawRecoveryInput, RecoveryCalculator, RecoveryGoal,
    RecoveryPlan, RecoveryPlanner, RecoveryResult, RecoverySuccess,
};
pub use domain::shared::Money;
pub use infrastructure::http::{AppState, create_router};
