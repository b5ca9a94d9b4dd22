//! Break-even and target-profit scenarios for one position.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::calculator::RecoveryCalculator;
use super::position::{PositionState, RecoveryGoal};
use super::result::{FailureReason, RecoveryResult};

/// Defaults for the target-profit scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDefaults {
    /// Percentage points added to the break-even rise.
    pub profit_margin: Decimal,
    /// Profit over cost basis, in percent.
    pub target_profit: Decimal,
}

impl Default for PlanDefaults {
    fn default() -> Self {
        Self {
            profit_margin: dec!(10),
            target_profit: dec!(5),
        }
    }
}

/// One evaluated goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// The goal that was evaluated, absent when it could not be derived
    /// from the position.
    pub goal: Option<RecoveryGoal>,
    /// Outcome for the goal.
    pub result: RecoveryResult,
}

/// Both standard scenarios for a position. The two are computed
/// independently and need not agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryPlan {
    /// Recover to the average cost, zero profit.
    pub break_even: Scenario,
    /// Break-even rise plus a margin, with a profit target.
    pub target_profit: Scenario,
}

/// Evaluates recovery plans with configured defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryPlanner {
    calculator: RecoveryCalculator,
    defaults: PlanDefaults,
}

impl RecoveryPlanner {
    /// Create a planner.
    #[must_use]
    pub const fn new(calculator: RecoveryCalculator, defaults: PlanDefaults) -> Self {
        Self {
            calculator,
            defaults,
        }
    }

    /// Configured defaults.
    #[must_use]
    pub const fn defaults(&self) -> &PlanDefaults {
        &self.defaults
    }

    /// Evaluate both scenarios. `None` overrides fall back to the defaults.
    pub fn plan(
        &self,
        position: &PositionState,
        profit_margin: Option<Decimal>,
        target_profit: Option<Decimal>,
    ) -> RecoveryPlan {
        let margin = profit_margin.unwrap_or(self.defaults.profit_margin);
        let profit = target_profit.unwrap_or(self.defaults.target_profit);

        let plan = RecoveryPlan {
            break_even: self.scenario(position, RecoveryGoal::break_even(position)),
            target_profit: self.scenario(
                position,
                RecoveryGoal::with_margin(position, margin, profit),
            ),
        };

        tracing::debug!(
            break_even = plan.break_even.result.outcome_label(),
            target_profit = plan.target_profit.result.outcome_label(),
            %margin,
            %profit,
            "recovery plan evaluated"
        );

        plan
    }

    fn scenario(
        &self,
        position: &PositionState,
        goal: Result<RecoveryGoal, FailureReason>,
    ) -> Scenario {
        match goal {
            Ok(goal) => Scenario {
                goal: Some(goal),
                result: self.calculator.compute(position, &goal),
            },
            Err(reason) => Scenario {
                goal: None,
                result: RecoveryResult::failure(reason),
            },
        }
    }
}
