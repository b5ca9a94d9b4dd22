//! Position recovery (averaging down).
//!
//! Given an underwater position, find the whole number of shares to buy at
//! the current price so that, after a projected rise, the position breaks
//! even or reaches a target profit.
//!
//! # Example
//!
//! ```rust
//! use recovery_engine::domain::recovery::{PositionState, RecoveryCalculator, RecoveryGoal};
//! use rust_decimal_macros::dec;
//!
//! let calculator = RecoveryCalculator::default();
//! let position = PositionState::new(100, dec!(10), dec!(5));
//! let goal = RecoveryGoal::new(dec!(50), dec!(10));
//!
//! let success = calculator.compute(&position, &goal).into_result()?;
//! assert_eq!(success.qty_to_buy, 175);
//! # Ok::<(), recovery_engine::domain::recovery::FailureReason>(())
//! ```

mod calculator;
mod plan;
mod position;
mod result;

pub use calculator::{DEFAULT_EPSILON, RecoveryCalculator, RecoveryCalculatorConfig};
pub use plan::{PlanDefaults, RecoveryPlan, RecoveryPlanner, Scenario};
pub use position::{PositionState, RawRecoveryInput, RecoveryGoal, to_decimal};
pub use result::{FailureReason, RecoveryResult, RecoverySuccess};
