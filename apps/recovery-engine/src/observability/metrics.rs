//! Prometheus metrics for the recovery engine.
//!
//! # Example
//!
//! ```ignore
//! use recovery_engine::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_recovery("custom", &result);
//! ```

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use rust_decimal::prelude::ToPrimitive;
use std::net::{Ipv4Addr, SocketAddr};

use crate::domain::recovery::RecoveryResult;

/// Counter of recovery computations, labelled by shape and outcome.
pub const RECOVERY_COMPUTATIONS: &str = "recovery_computations_total";

/// Histogram of share counts for successful computations.
pub const RECOVERY_QTY_TO_BUY: &str = "recovery_qty_to_buy";

/// Histogram of required investment for successful computations.
pub const RECOVERY_INVESTMENT: &str = "recovery_investment_required";

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for share counts.
    pub quantity_buckets: Vec<f64>,
    /// Histogram buckets for investment amounts.
    pub investment_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self::with_addr(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9090)))
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            // 0 (already at target) up to 100k shares
            quantity_buckets: vec![
                0.0, 1.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 10_000.0, 100_000.0,
            ],
            investment_buckets: vec![
                0.0, 100.0, 1000.0, 5000.0, 10_000.0, 50_000.0, 100_000.0, 1_000_000.0,
            ],
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets_for_metric(
            Matcher::Full(RECOVERY_QTY_TO_BUY.to_string()),
            &config.quantity_buckets,
        )
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .set_buckets_for_metric(
            Matcher::Full(RECOVERY_INVESTMENT.to_string()),
            &config.investment_buckets,
        )
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Record a recovery computation.
///
/// # Arguments
///
/// * `shape` - Call shape (e.g., "custom", "break_even", "target_profit")
/// * `result` - The computed outcome
pub fn record_recovery(shape: &'static str, result: &RecoveryResult) {
    counter!(
        RECOVERY_COMPUTATIONS,
        "shape" => shape,
        "outcome" => result.outcome_label()
    )
    .increment(1);

    if let Some(success) = result.success() {
        histogram!(RECOVERY_QTY_TO_BUY, "shape" => shape).record(success.qty_to_buy as f64);
        if let Some(investment) = success.investment_required.amount().to_f64() {
            histogram!(RECOVERY_INVESTMENT, "shape" => shape).record(investment);
        }
    }
}
