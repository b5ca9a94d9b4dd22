//! Tracing Setup
//!
//! Console logging through `tracing-subscriber`, optionally exporting spans
//! over OTLP.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives; falls back to `observability.logging.level`
//! - `observability.logging.format`: `json` or `pretty`
//! - `observability.otel.enabled`: export spans to `observability.otel.endpoint`
//!
//! # Usage
//!
//! ```rust,ignore
//! use recovery_engine::telemetry::init_telemetry;
//!
//! let _guard = init_telemetry(&config.observability);
//! ```

use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LoggingConfig, ObservabilityConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Guard that shuts down the tracer provider on drop.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether spans are exported over OTLP.
    #[must_use]
    pub const fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Error shutting down tracer provider: {e:?}");
        }
    }
}

/// Initialize tracing, with OTLP export when enabled.
///
/// Returns a guard that will shut down the tracer provider when dropped.
///
/// # Panics
///
/// Panics if a global tracing subscriber is already installed.
#[must_use]
pub fn init_telemetry(config: &ObservabilityConfig) -> TelemetryGuard {
    let env_filter = env_filter(&config.logging);
    let fmt_layer = fmt_layer(&config.logging);

    if !config.otel.enabled {
        Registry::default().with(fmt_layer).with(env_filter).init();
        tracing::info!("OpenTelemetry disabled, using console logging only");
        return TelemetryGuard { provider: None };
    }

    let endpoint = &config.otel.endpoint;
    let service_name = &config.otel.service_name;

    let exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
    {
        Ok(exp) => exp,
        Err(e) => {
            Registry::default().with(fmt_layer).with(env_filter).init();
            tracing::warn!(error = ?e, "Failed to create OTLP exporter, falling back to console logging");
            return TelemetryGuard { provider: None };
        }
    };

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    let tracer = provider.tracer(service_name.clone());
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    Registry::default()
        .with(fmt_layer)
        .with(otel_layer)
        .with(env_filter)
        .init();

    tracing::info!(
        service_name = %service_name,
        endpoint = %endpoint,
        "OpenTelemetry initialized"
    );

    TelemetryGuard {
        provider: Some(provider),
    }
}

/// `RUST_LOG` when set, the configured level otherwise.
fn env_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
}

fn fmt_layer(logging: &LoggingConfig) -> BoxedLayer {
    if logging.format == "pretty" {
        tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed()
    }
}
