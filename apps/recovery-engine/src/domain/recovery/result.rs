//! Outcome types for recovery calculations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::shared::Money;

/// Why a recovery goal cannot be met.
///
/// Serialized with the variant name (`"NonPositiveRise"`, ...), which is the
/// tag hosting layers surface to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum FailureReason {
    /// The projected price move is zero or negative.
    #[error("the target rise must be greater than zero")]
    NonPositiveRise,
    /// No non-negative share count reaches the goal at the projected price.
    #[error("the goal cannot be reached by buying at the current price")]
    Unsolvable,
    /// There is no existing position to average down.
    #[error("there is no existing position to recover")]
    NoExistingPosition,
    /// An input was non-finite, out of range, or outside its domain.
    #[error("the inputs are invalid or out of range")]
    InvalidInput,
}

impl FailureReason {
    /// Stable snake_case code, used as a metrics label.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NonPositiveRise => "non_positive_rise",
            Self::Unsolvable => "unsolvable",
            Self::NoExistingPosition => "no_existing_position",
            Self::InvalidInput => "invalid_input",
        }
    }
}

/// A feasible purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverySuccess {
    /// Additional whole shares to buy at the current price.
    pub qty_to_buy: u64,
    /// `qty_to_buy * current_price`, rounded half-up to cents.
    pub investment_required: Money,
    /// Weighted average cost after the purchase, rounded half-up to cents.
    pub new_average_price: Money,
}

impl RecoverySuccess {
    /// True when the existing position already meets the goal.
    #[must_use]
    pub const fn is_already_at_target(&self) -> bool {
        self.qty_to_buy == 0
    }
}

/// Result of a single recovery calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecoveryResult {
    /// A non-negative whole share count meets the goal.
    Success(RecoverySuccess),
    /// The goal is infeasible for the given inputs.
    Failure {
        /// Why the goal is infeasible.
        reason: FailureReason,
    },
}

impl RecoveryResult {
    /// Build a failed result.
    #[must_use]
    pub const fn failure(reason: FailureReason) -> Self {
        Self::Failure { reason }
    }

    /// Whether a feasible purchase exists.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The purchase, if feasible.
    #[must_use]
    pub const fn success(&self) -> Option<&RecoverySuccess> {
        match self {
            Self::Success(success) => Some(success),
            Self::Failure { .. } => None,
        }
    }

    /// The failure reason, if infeasible.
    #[must_use]
    pub const fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::Success(_) => None,
            Self::Failure { reason } => Some(*reason),
        }
    }

    /// Label for logs and metrics: `already_at_target`, `purchase` or the
    /// failure code.
    #[must_use]
    pub const fn outcome_label(&self) -> &'static str {
        match self {
            Self::Success(success) if success.is_already_at_target() => "already_at_target",
            Self::Success(_) => "purchase",
            Self::Failure { reason } => reason.code(),
        }
    }

    /// Convert into a `Result` for callers that propagate with `?`.
    pub const fn into_result(self) -> Result<RecoverySuccess, FailureReason> {
        match self {
            Self::Success(success) => Ok(success),
            Self::Failure { reason } => Err(reason),
        }
    }
}

impl From<Result<RecoverySuccess, FailureReason>> for RecoveryResult {
    fn from(value: Result<RecoverySuccess, FailureReason>) -> Self {
        match value {
            Ok(success) => Self::Success(success),
            Err(reason) => Self::failure(reason),
        }
    }
}
