//! Averaging-down solver.
//!
//! Buying `x` shares at price `p` on top of `n` shares averaging `a` meets a
//! goal of profit `g` at projected price `f` when
//!
//! ```text
//! (n + x) * f >= (n*a + x*p) * (1 + g)
//! ```
//!
//! which is linear in `x`:
//!
//! ```text
//! x * (f - p*(1+g)) >= n * (a*(1+g) - f)
//! ```
//!
//! The right-hand side is the shortfall of the existing position. A
//! non-positive shortfall needs no purchase; otherwise each new share closes
//! `f - p*(1+g)` of it, which must be positive.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

use super::position::{PositionState, RawRecoveryInput, RecoveryGoal};
use super::result::{FailureReason, RecoveryResult, RecoverySuccess};
use crate::domain::shared::Money;

/// Default tolerance below which the per-share gain is treated as zero.
pub const DEFAULT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 12);

/// Configuration for the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryCalculatorConfig {
    /// Per-share gains at or below this magnitude are unsolvable, and
    /// quotients this close to a whole number snap to it.
    pub epsilon: Decimal,
}

impl Default for RecoveryCalculatorConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Stateless averaging-down calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryCalculator {
    config: RecoveryCalculatorConfig,
}

impl RecoveryCalculator {
    /// Create a calculator with custom configuration.
    #[must_use]
    pub const fn with_config(config: RecoveryCalculatorConfig) -> Self {
        Self { config }
    }

    /// Solve for the shares to buy so that `position` meets `goal`.
    ///
    /// Checks run in this order, first match wins:
    /// 1. `NoExistingPosition` when no shares are held
    /// 2. `InvalidInput` for prices or profit outside their domain
    /// 3. `NonPositiveRise` when the rise is zero or negative
    /// 4. `Unsolvable` when new shares cannot close the shortfall
    ///
    /// A position that already meets the goal is a success with zero shares.
    pub fn compute(&self, position: &PositionState, goal: &RecoveryGoal) -> RecoveryResult {
        let result = RecoveryResult::from(self.solve(position, goal));

        tracing::debug!(
            current_quantity = position.current_quantity,
            average_price = %position.average_price,
            current_price = %position.current_price,
            target_rise = %goal.target_rise,
            target_profit = %goal.target_profit,
            outcome = result.outcome_label(),
            "recovery computed"
        );

        result
    }

    /// Same as [`compute`](Self::compute) for unvalidated float inputs.
    pub fn compute_raw(&self, input: &RawRecoveryInput) -> RecoveryResult {
        match input.parse() {
            Ok((position, goal)) => self.compute(&position, &goal),
            Err(reason) => {
                tracing::debug!(?input, "rejected recovery input");
                RecoveryResult::failure(reason)
            }
        }
    }

    /// Break-even call shape: recover to the average cost with zero profit.
    pub fn break_even(&self, position: &PositionState) -> RecoveryResult {
        match RecoveryGoal::break_even(position) {
            Ok(goal) => self.compute(position, &goal),
            Err(reason) => RecoveryResult::failure(reason),
        }
    }

    /// Target-profit call shape: break-even rise plus `margin` points,
    /// requiring `profit` percent.
    pub fn target_profit(
        &self,
        position: &PositionState,
        margin: Decimal,
        profit: Decimal,
    ) -> RecoveryResult {
        match RecoveryGoal::with_margin(position, margin, profit) {
            Ok(goal) => self.compute(position, &goal),
            Err(reason) => RecoveryResult::failure(reason),
        }
    }

    fn solve(
        &self,
        position: &PositionState,
        goal: &RecoveryGoal,
    ) -> Result<RecoverySuccess, FailureReason> {
        if position.current_quantity == 0 {
            return Err(FailureReason::NoExistingPosition);
        }
        position.validate()?;
        goal.validate()?;
        if goal.target_rise <= Decimal::ZERO {
            return Err(FailureReason::NonPositiveRise);
        }

        let held = Decimal::from(position.current_quantity);
        let price = position.current_price;
        let profit_factor = goal.profit_factor().ok_or(FailureReason::InvalidInput)?;
        let future_price = goal
            .project_price(price)
            .ok_or(FailureReason::InvalidInput)?;

        let gain_per_share = price
            .checked_mul(profit_factor)
            .and_then(|required| future_price.checked_sub(required))
            .ok_or(FailureReason::InvalidInput)?;
        if gain_per_share.abs() <= self.config.epsilon {
            return Err(FailureReason::Unsolvable);
        }

        let shortfall = position
            .average_price
            .checked_mul(profit_factor)
            .and_then(|required| required.checked_sub(future_price))
            .and_then(|per_share| per_share.checked_mul(held))
            .ok_or(FailureReason::InvalidInput)?;
        if shortfall <= Decimal::ZERO {
            return Self::settle(position, 0);
        }
        // A negative quotient here is not "already above target": each new
        // share widens the shortfall, so no purchase can meet the goal.
        if gain_per_share < Decimal::ZERO {
            return Err(FailureReason::Unsolvable);
        }

        let exact = shortfall
            .checked_div(gain_per_share)
            .ok_or(FailureReason::Unsolvable)?;
        let qty_to_buy = self
            .whole_shares(exact)
            .ok_or(FailureReason::Unsolvable)?;

        Self::settle(position, qty_to_buy)
    }

    /// Round up to whole shares. Quotients within epsilon of an integer are
    /// division residue and snap to it.
    fn whole_shares(&self, exact: Decimal) -> Option<u64> {
        let nearest = exact.round();
        let shares = if (exact - nearest).abs() <= self.config.epsilon {
            nearest
        } else {
            exact.ceil()
        };
        shares.max(Decimal::ZERO).to_u64()
    }

    fn settle(
        position: &PositionState,
        qty_to_buy: u64,
    ) -> Result<RecoverySuccess, FailureReason> {
        let investment = Money::new(position.current_price)
            .checked_times(qty_to_buy)
            .ok_or(FailureReason::InvalidInput)?;
        let total_cost = position
            .cost_basis()
            .map(Money::new)
            .and_then(|basis| basis.checked_add(investment))
            .ok_or(FailureReason::InvalidInput)?;
        let total_shares = position
            .current_quantity
            .checked_add(qty_to_buy)
            .ok_or(FailureReason::InvalidInput)?;
        let new_average = total_cost
            .amount()
            .checked_div(Decimal::from(total_shares))
            .ok_or(FailureReason::InvalidInput)?;

        Ok(RecoverySuccess {
            qty_to_buy,
            investment_required: investment.round_to_cents(),
            new_average_price: Money::new(new_average).round_to_cents(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn position(qty: u64, average: Decimal, price: Decimal) -> PositionState {
        PositionState::new(qty, average, price)
    }

    fn goal(rise: Decimal, profit: Decimal) -> RecoveryGoal {
        RecoveryGoal::new(rise, profit)
    }

    fn expect_success(result: RecoveryResult) -> RecoverySuccess {
        match result {
            RecoveryResult::Success(success) => success,
            RecoveryResult::Failure { reason } => panic!("expected success, got {reason:?}"),
        }
    }

    #[test]
    fn existing_position_at_break_even_needs_no_purchase() {
        let calculator = RecoveryCalculator::default();
        let result = calculator.compute(
            &position(100, dec!(10.00), dec!(8.00)),
            &goal(dec!(25), dec!(0)),
        );

        let success = expect_success(result);
        assert_eq!(success.qty_to_buy, 0);
        assert!(success.is_already_at_target());
        assert_eq!(success.investment_required, Money::ZERO);
        assert_eq!(success.new_average_price.amount(), dec!(10.00));
        assert!(success.new_average_price.amount() <= dec!(8.00) * dec!(1.25));
    }

    #[test_case(dec!(0), dec!(100), dec!(500.00), dec!(7.50) ; "break even at projected price")]
    #[test_case(dec!(5), dec!(134), dec!(670.00), dec!(7.14) ; "fractional quotient rounds up")]
    #[test_case(dec!(10), dec!(175), dec!(875.00), dec!(6.82) ; "ten percent profit")]
    #[test_case(dec!(20), dec!(300), dec!(1500.00), dec!(6.25) ; "twenty percent profit")]
    fn purchases_for_half_price_position(
        profit: Decimal,
        qty: Decimal,
        investment: Decimal,
        new_average: Decimal,
    ) {
        let calculator = RecoveryCalculator::default();
        let result = calculator.compute(
            &position(100, dec!(10), dec!(5)),
            &goal(dec!(50), profit),
        );

        let success = expect_success(result);
        assert_eq!(Decimal::from(success.qty_to_buy), qty);
        assert_eq!(success.investment_required.amount(), investment);
        assert_eq!(success.new_average_price.amount(), new_average);
    }

    #[test]
    fn rounded_quantity_is_the_minimum_that_meets_the_goal() {
        let calculator = RecoveryCalculator::default();
        let held = position(100, dec!(10), dec!(5));
        let target = goal(dec!(50), dec!(5));
        let qty = expect_success(calculator.compute(&held, &target)).qty_to_buy;

        let meets = |x: u64| {
            let x = Decimal::from(x);
            (dec!(100) + x) * dec!(7.5) >= (dec!(1000) + x * dec!(5)) * dec!(1.05)
        };
        assert!(meets(qty));
        assert!(!meets(qty - 1));
    }

    #[test]
    fn position_above_target_needs_no_purchase() {
        let calculator = RecoveryCalculator::default();
        let result = calculator.compute(
            &position(100, dec!(10), dec!(12)),
            &goal(dec!(10), dec!(5)),
        );

        let success = expect_success(result);
        assert_eq!(success.qty_to_buy, 0);
        assert_eq!(success.new_average_price.amount(), dec!(10.00));
    }

    #[test_case(dec!(0) ; "zero rise")]
    #[test_case(dec!(-5) ; "negative rise")]
    fn non_positive_rise_fails(rise: Decimal) {
        let calculator = RecoveryCalculator::default();
        let result = calculator.compute(&position(100, dec!(10), dec!(8)), &goal(rise, dec!(0)));
        assert_eq!(result.failure_reason(), Some(FailureReason::NonPositiveRise));
    }

    #[test_case(dec!(25), dec!(0) ; "break even goal")]
    #[test_case(dec!(-5), dec!(0) ; "negative rise")]
    #[test_case(dec!(0), dec!(10) ; "zero rise")]
    fn empty_position_fails_regardless_of_goal(rise: Decimal, profit: Decimal) {
        let calculator = RecoveryCalculator::default();
        let result = calculator.compute(&position(0, dec!(10), dec!(8)), &goal(rise, profit));
        assert_eq!(
            result.failure_reason(),
            Some(FailureReason::NoExistingPosition)
        );
    }

    #[test]
    fn rise_equal_to_profit_is_unsolvable() {
        let calculator = RecoveryCalculator::default();
        let result = calculator.compute(
            &position(100, dec!(10), dec!(5)),
            &goal(dec!(50), dec!(50)),
        );
        assert_eq!(result.failure_reason(), Some(FailureReason::Unsolvable));
    }

    #[test]
    fn profit_beyond_rise_with_shortfall_is_unsolvable() {
        let calculator = RecoveryCalculator::default();
        let result = calculator.compute(
            &position(100, dec!(10), dec!(5)),
            &goal(dec!(50), dec!(60)),
        );
        assert_eq!(result.failure_reason(), Some(FailureReason::Unsolvable));
    }

    #[test]
    fn profit_beyond_rise_without_shortfall_needs_no_purchase() {
        let calculator = RecoveryCalculator::default();
        let result = calculator.compute(
            &position(100, dec!(5), dec!(10)),
            &goal(dec!(50), dec!(60)),
        );
        assert_eq!(expect_success(result).qty_to_buy, 0);
    }

    #[test]
    fn zero_current_price_is_unsolvable() {
        let calculator = RecoveryCalculator::default();
        let result = calculator.compute(
            &position(100, dec!(10), dec!(0)),
            &goal(dec!(10), dec!(0)),
        );
        assert_eq!(result.failure_reason(), Some(FailureReason::Unsolvable));
    }

    #[test_case(dec!(0), dec!(8), dec!(0) ; "zero average price")]
    #[test_case(dec!(10), dec!(-8), dec!(0) ; "negative current price")]
    #[test_case(dec!(10), dec!(8), dec!(-1) ; "negative profit")]
    fn out_of_domain_inputs_are_invalid(average: Decimal, price: Decimal, profit: Decimal) {
        let calculator = RecoveryCalculator::default();
        let result = calculator.compute(&position(100, average, price), &goal(dec!(25), profit));
        assert_eq!(result.failure_reason(), Some(FailureReason::InvalidInput));
    }

    #[test]
    fn overflow_is_invalid_not_a_panic() {
        let calculator = RecoveryCalculator::default();
        let result = calculator.compute(
            &position(u64::MAX, Decimal::MAX, dec!(1)),
            &goal(dec!(20), dec!(10)),
        );
        assert_eq!(result.failure_reason(), Some(FailureReason::InvalidInput));
    }

    #[test]
    fn raw_non_finite_input_is_invalid() {
        let calculator = RecoveryCalculator::default();
        let input = RawRecoveryInput {
            current_quantity: 100,
            average_price: f64::NAN,
            current_price: 8.0,
            target_rise: 25.0,
            target_profit: 0.0,
        };
        assert_eq!(
            calculator.compute_raw(&input).failure_reason(),
            Some(FailureReason::InvalidInput)
        );
    }

    #[test]
    fn raw_input_matches_decimal_input() {
        let calculator = RecoveryCalculator::default();
        let input = RawRecoveryInput {
            current_quantity: 100,
            average_price: 10.0,
            current_price: 5.0,
            target_rise: 50.0,
            target_profit: 10.0,
        };
        assert_eq!(
            calculator.compute_raw(&input),
            calculator.compute(&position(100, dec!(10), dec!(5)), &goal(dec!(50), dec!(10)))
        );
    }

    #[test]
    fn break_even_shape_needs_no_purchase() {
        let calculator = RecoveryCalculator::default();
        let success = expect_success(calculator.break_even(&position(100, dec!(10), dec!(3))));
        assert_eq!(success.qty_to_buy, 0);
        assert_eq!(success.new_average_price.amount(), dec!(10.00));
    }

    #[test]
    fn break_even_shape_above_average_has_no_rise() {
        let calculator = RecoveryCalculator::default();
        let result = calculator.break_even(&position(100, dec!(10), dec!(12)));
        assert_eq!(result.failure_reason(), Some(FailureReason::NonPositiveRise));
    }

    #[test]
    fn target_profit_shape_on_deep_drawdown() {
        let calculator = RecoveryCalculator::default();
        let result = calculator.target_profit(&position(100, dec!(10), dec!(2)), dec!(10), dec!(5));

        let success = expect_success(result);
        assert_eq!(success.qty_to_buy, 4);
        assert_eq!(success.investment_required.amount(), dec!(8.00));
        assert_eq!(success.new_average_price.amount(), dec!(9.69));
    }

    #[test]
    fn target_profit_shape_on_shallow_drawdown_needs_no_purchase() {
        let calculator = RecoveryCalculator::default();
        let result = calculator.target_profit(&position(100, dec!(10), dec!(8)), dec!(10), dec!(5));
        assert_eq!(expect_success(result).qty_to_buy, 0);
    }

    #[test]
    fn wider_epsilon_rejects_small_gains() {
        let calculator = RecoveryCalculator::with_config(RecoveryCalculatorConfig {
            epsilon: dec!(0.5),
        });
        // gain per share = 5 * (1.10 - 1.05) = 0.25
        let result = calculator.compute(
            &position(100, dec!(10), dec!(5)),
            &goal(dec!(10), dec!(5)),
        );
        assert_eq!(result.failure_reason(), Some(FailureReason::Unsolvable));
    }

    fn cents(range: std::ops::Range<i64>) -> impl Strategy<Value = Decimal> {
        range.prop_map(|c| Decimal::new(c, 2))
    }

    proptest! {
        #[test]
        fn break_even_holds_within_a_cent(
            qty in 1u64..100_000,
            average in cents(100..100_000),
            discount in 1i64..99,
        ) {
            let price = (average * Decimal::new(100 - discount, 2)).round_dp(2);
            prop_assume!(price > Decimal::ZERO && price < average);

            let rise = (average - price) / price * Decimal::ONE_HUNDRED;
            let target = goal(rise, Decimal::ZERO);
            let calculator = RecoveryCalculator::default();
            let result = calculator.compute(&position(qty, average, price), &target);

            let success = expect_success(result);
            let future = target.project_price(price).unwrap();
            prop_assert!(success.new_average_price.amount() <= future + dec!(0.01));
        }

        #[test]
        fn more_profit_never_needs_fewer_shares(
            qty in 1u64..10_000,
            average in cents(1_000..50_000),
            price in cents(100..1_000),
            rise in 1i64..300,
            low in 0i64..100,
            extra in 0i64..100,
        ) {
            let calculator = RecoveryCalculator::default();
            let held = position(qty, average, price);
            let rise = Decimal::from(rise);
            let lower = calculator.compute(&held, &goal(rise, Decimal::from(low)));
            let higher = calculator.compute(&held, &goal(rise, Decimal::from(low + extra)));

            if let (Some(lower), Some(higher)) = (lower.success(), higher.success()) {
                prop_assert!(higher.qty_to_buy >= lower.qty_to_buy);
            }
        }

        #[test]
        fn investment_is_quantity_times_price(
            qty in 1u64..10_000,
            average in cents(1_000..50_000),
            price in cents(1..1_000),
            rise in 1i64..500,
            profit in 0i64..50,
        ) {
            let calculator = RecoveryCalculator::default();
            let held = position(qty, average, price);
            let target = goal(Decimal::from(rise), Decimal::from(profit));
            let first = calculator.compute(&held, &target);
            let second = calculator.compute(&held, &target);
            prop_assert_eq!(first, second);

            if let Some(success) = first.success() {
                let expected = (price * Decimal::from(success.qty_to_buy))
                    .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
                prop_assert_eq!(success.investment_required.amount(), expected);
            }
        }
    }
}
