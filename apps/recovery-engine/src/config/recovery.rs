//! Defaults for recovery plans.

use serde::{Deserialize, Serialize};

use crate::domain::recovery::{PlanDefaults, RecoveryCalculatorConfig, to_decimal};

use super::ConfigError;

/// Recovery plan defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Percentage points added to the break-even rise for the
    /// target-profit scenario.
    #[serde(default = "default_profit_margin")]
    pub default_profit_margin: f64,
    /// Profit over cost basis for the target-profit scenario, in percent.
    #[serde(default = "default_target_profit")]
    pub default_target_profit: f64,
    /// Solver tolerance; unset keeps the built-in `1e-12`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f64>,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            default_profit_margin: default_profit_margin(),
            default_target_profit: default_target_profit(),
            epsilon: None,
        }
    }
}

impl RecoveryConfig {
    /// Convert to planner defaults.
    pub fn plan_defaults(&self) -> Result<PlanDefaults, ConfigError> {
        let profit_margin = to_decimal(self.default_profit_margin).map_err(|_| {
            ConfigError::ValidationError("recovery.default_profit_margin must be finite".into())
        })?;
        let target_profit = to_decimal(self.default_target_profit).map_err(|_| {
            ConfigError::ValidationError("recovery.default_target_profit must be finite".into())
        })?;
        Ok(PlanDefaults {
            profit_margin,
            target_profit,
        })
    }

    /// Convert to solver settings.
    pub fn calculator_config(&self) -> Result<RecoveryCalculatorConfig, ConfigError> {
        let Some(epsilon) = self.epsilon else {
            return Ok(RecoveryCalculatorConfig::default());
        };
        let epsilon = to_decimal(epsilon).map_err(|_| {
            ConfigError::ValidationError("recovery.epsilon must be finite".into())
        })?;
        Ok(RecoveryCalculatorConfig { epsilon })
    }
}

const fn default_profit_margin() -> f64 {
    10.0
}

const fn default_target_profit() -> f64 {
    5.0
}
