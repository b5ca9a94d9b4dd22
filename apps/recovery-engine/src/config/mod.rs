//! Configuration module for the recovery engine.
//!
//! Loads YAML configuration with environment variable interpolation and
//! validates it before any component starts.
//!
//! # Usage
//!
//! ```rust,ignore
//! use recovery_engine::config::load_config;
//!
//! // Load from default path (config.yaml), defaults when absent
//! let config = load_config(None)?;
//!
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod observability;
mod recovery;
mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use observability::{LOG_FORMATS, LoggingConfig, MetricsSettings, ObservabilityConfig, OtelConfig};
pub use recovery::RecoveryConfig;
pub use server::ServerConfig;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Recovery plan defaults.
    #[serde(default)]
    pub recovery: RecoveryConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// A missing file yields the defaults; an unreadable or invalid file is an
/// error.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path, "Config file not found, using defaults");
            let config = Config::default();
            validate_config(&config)?;
            return Ok(config);
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_string(),
                source: e,
            });
        }
    };

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let metrics = &config.observability.metrics;
    if metrics.enabled && metrics.port == config.server.http_port {
        return Err(ConfigError::ValidationError(
            "http_port and metrics.port must be different".to_string(),
        ));
    }

    let format = config.observability.logging.format.as_str();
    if !LOG_FORMATS.contains(&format) {
        return Err(ConfigError::ValidationError(format!(
            "logging.format must be one of: {LOG_FORMATS:?}"
        )));
    }

    let recovery = &config.recovery;
    if !recovery.default_profit_margin.is_finite() || recovery.default_profit_margin < 0.0 {
        return Err(ConfigError::ValidationError(
            "recovery.default_profit_margin must be a non-negative number".to_string(),
        ));
    }

    if !recovery.default_target_profit.is_finite() || recovery.default_target_profit < 0.0 {
        return Err(ConfigError::ValidationError(
            "recovery.default_target_profit must be a non-negative number".to_string(),
        ));
    }

    if let Some(epsilon) = recovery.epsilon
        && (!epsilon.is_finite() || epsilon < 0.0)
    {
        return Err(ConfigError::ValidationError(
            "recovery.epsilon must be a non-negative number".to_string(),
        ));
    }

    Ok(())
}
