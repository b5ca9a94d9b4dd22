//! Observability module for metrics.
//!
//! Tracing setup lives in [`crate::telemetry`].

mod metrics;

pub use self::metrics::{
    MetricsConfig, MetricsError, RECOVERY_COMPUTATIONS, RECOVERY_INVESTMENT, RECOVERY_QTY_TO_BUY,
    init_metrics, record_recovery,
};
