//! Recovery Engine Binary
//!
//! Serves the averaging-down calculator over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin recovery-engine
//! ```
//!
//! # Environment Variables
//!
//! - `RECOVERY_CONFIG`: Path to the YAML config (default: config.yaml)
//! - `RUST_LOG`: Log filter (default: `observability.logging.level`)
//!
//! Values in the config file may reference `${VAR}` or `${VAR:-default}`.

use std::net::SocketAddr;

use anyhow::Context;
use recovery_engine::config::{Config, load_config};
use recovery_engine::domain::recovery::{RecoveryCalculator, RecoveryPlanner};
use recovery_engine::infrastructure::http::{AppState, create_router};
use recovery_engine::observability::{MetricsConfig, init_metrics};
use recovery_engine::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path = std::env::var("RECOVERY_CONFIG").ok();
    let config = load_config(config_path.as_deref()).context("failed to load configuration")?;

    let _telemetry = init_telemetry(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Recovery Engine"
    );

    if config.observability.metrics.enabled {
        let metrics_addr = SocketAddr::from((
            bind_ip(&config)?,
            config.observability.metrics.port,
        ));
        init_metrics(&MetricsConfig::with_addr(metrics_addr))?;
    }

    let calculator = RecoveryCalculator::with_config(config.recovery.calculator_config()?);
    let planner = RecoveryPlanner::new(calculator, config.recovery.plan_defaults()?);
    tracing::info!(
        profit_margin = %planner.defaults().profit_margin,
        target_profit = %planner.defaults().target_profit,
        "Recovery plan defaults"
    );

    let state = AppState::new(calculator, planner, env!("CARGO_PKG_VERSION"));
    let app = create_router(state);

    let http_addr = SocketAddr::from((bind_ip(&config)?, config.server.http_port));
    let listener = TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    tracing::info!(%http_addr, "HTTP server listening");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /api/v1/recovery");
    tracing::info!("  POST /api/v1/recovery/plan");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Recovery Engine stopped");
    Ok(())
}

fn bind_ip(config: &Config) -> anyhow::Result<std::net::IpAddr> {
    config
        .server
        .bind_address
        .parse()
        .with_context(|| format!("invalid bind address '{}'", config.server.bind_address))
}

/// Load `.env` from the working directory or the nearest ancestor.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
