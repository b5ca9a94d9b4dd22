//! Position and goal inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::result::FailureReason;

/// An existing long position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionState {
    /// Shares currently held.
    pub current_quantity: u64,
    /// Weighted-average cost per share. Must be positive.
    pub average_price: Decimal,
    /// Latest market price per share. Must not be negative.
    pub current_price: Decimal,
}

impl PositionState {
    /// Create a position.
    #[must_use]
    pub const fn new(current_quantity: u64, average_price: Decimal, current_price: Decimal) -> Self {
        Self {
            current_quantity,
            average_price,
            current_price,
        }
    }

    /// Convert unvalidated numbers, rejecting negative quantities and
    /// non-representable prices.
    pub fn from_raw(
        current_quantity: i64,
        average_price: f64,
        current_price: f64,
    ) -> Result<Self, FailureReason> {
        let current_quantity =
            u64::try_from(current_quantity).map_err(|_| FailureReason::InvalidInput)?;
        Ok(Self::new(
            current_quantity,
            to_decimal(average_price)?,
            to_decimal(current_price)?,
        ))
    }

    /// Check the price domain.
    pub fn validate(&self) -> Result<(), FailureReason> {
        if self.average_price <= Decimal::ZERO || self.current_price < Decimal::ZERO {
            return Err(FailureReason::InvalidInput);
        }
        Ok(())
    }

    /// Total cost basis (`quantity * average_price`), `None` on overflow.
    #[must_use]
    pub fn cost_basis(&self) -> Option<Decimal> {
        Decimal::from(self.current_quantity).checked_mul(self.average_price)
    }
}

/// What the position should achieve after a projected price move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryGoal {
    /// Projected move from the current price, in percent (`12.5` = +12.5%).
    pub target_rise: Decimal,
    /// Profit over total cost basis at the projected price, in percent.
    /// Zero means break-even.
    pub target_profit: Decimal,
}

impl RecoveryGoal {
    /// Create a goal.
    #[must_use]
    pub const fn new(target_rise: Decimal, target_profit: Decimal) -> Self {
        Self {
            target_rise,
            target_profit,
        }
    }

    /// Break-even goal: the rise that carries the current price back to the
    /// average cost, with zero profit.
    pub fn break_even(position: &PositionState) -> Result<Self, FailureReason> {
        if position.current_quantity == 0 {
            return Err(FailureReason::NoExistingPosition);
        }
        position.validate()?;
        if position.current_price.is_zero() {
            return Err(FailureReason::Unsolvable);
        }

        let target_rise = position
            .average_price
            .checked_sub(position.current_price)
            .and_then(|drop| drop.checked_div(position.current_price))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or(FailureReason::InvalidInput)?;

        Ok(Self::new(target_rise, Decimal::ZERO))
    }

    /// Target-profit goal: the break-even rise plus `margin` percentage
    /// points, requiring `profit` percent over cost basis.
    pub fn with_margin(
        position: &PositionState,
        margin: Decimal,
        profit: Decimal,
    ) -> Result<Self, FailureReason> {
        if margin < Decimal::ZERO || profit < Decimal::ZERO {
            return Err(FailureReason::InvalidInput);
        }
        let break_even = Self::break_even(position)?;
        let target_rise = break_even
            .target_rise
            .checked_add(margin)
            .ok_or(FailureReason::InvalidInput)?;

        Ok(Self::new(target_rise, profit))
    }

    /// Check the profit domain. The rise is checked by the solver since a
    /// non-positive rise has its own failure reason.
    pub fn validate(&self) -> Result<(), FailureReason> {
        if self.target_profit < Decimal::ZERO {
            return Err(FailureReason::InvalidInput);
        }
        Ok(())
    }

    /// `1 + target_rise/100`.
    #[must_use]
    pub fn rise_factor(&self) -> Option<Decimal> {
        percent_factor(self.target_rise)
    }

    /// `1 + target_profit/100`.
    #[must_use]
    pub fn profit_factor(&self) -> Option<Decimal> {
        percent_factor(self.target_profit)
    }

    /// Price after the projected rise.
    #[must_use]
    pub fn project_price(&self, current_price: Decimal) -> Option<Decimal> {
        self.rise_factor()?.checked_mul(current_price)
    }
}

fn percent_factor(percent: Decimal) -> Option<Decimal> {
    percent
        .checked_div(Decimal::ONE_HUNDRED)?
        .checked_add(Decimal::ONE)
}

/// Unvalidated inputs as they arrive from JSON or a form.
///
/// Conversion rejects non-finite numbers, negative quantities and values
/// that do not fit a `Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawRecoveryInput {
    /// Shares currently held.
    pub current_quantity: i64,
    /// Weighted-average cost per share.
    pub average_price: f64,
    /// Latest market price per share.
    pub current_price: f64,
    /// Projected rise, in percent.
    pub target_rise: f64,
    /// Target profit, in percent.
    pub target_profit: f64,
}

impl RawRecoveryInput {
    /// Convert the position fields.
    pub fn position(&self) -> Result<PositionState, FailureReason> {
        PositionState::from_raw(self.current_quantity, self.average_price, self.current_price)
    }

    /// Convert the goal fields.
    pub fn goal(&self) -> Result<RecoveryGoal, FailureReason> {
        Ok(RecoveryGoal::new(
            to_decimal(self.target_rise)?,
            to_decimal(self.target_profit)?,
        ))
    }

    /// Convert both halves.
    pub fn parse(&self) -> Result<(PositionState, RecoveryGoal), FailureReason> {
        Ok((self.position()?, self.goal()?))
    }
}

/// Convert a float into a `Decimal`, rejecting NaN, infinities and values
/// beyond the `Decimal` range.
pub fn to_decimal(value: f64) -> Result<Decimal, FailureReason> {
    if !value.is_finite() {
        return Err(FailureReason::InvalidInput);
    }
    Decimal::try_from(value).map_err(|_| FailureReason::InvalidInput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn raw() -> RawRecoveryInput {
        RawRecoveryInput {
            current_quantity: 100,
            average_price: 10.0,
            current_price: 8.0,
            target_rise: 25.0,
            target_profit: 0.0,
        }
    }

    #[test]
    fn raw_input_converts() {
        let (position, goal) = raw().parse().unwrap();
        assert_eq!(position, PositionState::new(100, dec!(10), dec!(8)));
        assert_eq!(goal, RecoveryGoal::new(dec!(25), dec!(0)));
    }

    #[test_case(f64::NAN ; "nan")]
    #[test_case(f64::INFINITY ; "positive infinity")]
    #[test_case(f64::NEG_INFINITY ; "negative infinity")]
    #[test_case(1e40 ; "beyond decimal range")]
    fn non_representable_floats_are_invalid(value: f64) {
        assert_eq!(to_decimal(value), Err(FailureReason::InvalidInput));

        let mut input = raw();
        input.current_price = value;
        assert_eq!(input.parse(), Err(FailureReason::InvalidInput));

        let mut input = raw();
        input.target_profit = value;
        assert_eq!(input.parse(), Err(FailureReason::InvalidInput));
    }

    #[test]
    fn negative_quantity_is_invalid() {
        let mut input = raw();
        input.current_quantity = -1;
        assert_eq!(input.position(), Err(FailureReason::InvalidInput));
    }

    #[test_case(dec!(0), dec!(8) ; "zero average price")]
    #[test_case(dec!(-1), dec!(8) ; "negative average price")]
    #[test_case(dec!(10), dec!(-0.01) ; "negative current price")]
    fn position_domain_is_checked(average_price: Decimal, current_price: Decimal) {
        let position = PositionState::new(10, average_price, current_price);
        assert_eq!(position.validate(), Err(FailureReason::InvalidInput));
    }

    #[test]
    fn zero_current_price_is_valid() {
        assert!(PositionState::new(10, dec!(10), dec!(0)).validate().is_ok());
    }

    #[test]
    fn cost_basis() {
        let position = PositionState::new(100, dec!(10.50), dec!(8));
        assert_eq!(position.cost_basis(), Some(dec!(1050)));
    }

    #[test]
    fn negative_profit_is_invalid() {
        let goal = RecoveryGoal::new(dec!(10), dec!(-1));
        assert_eq!(goal.validate(), Err(FailureReason::InvalidInput));
    }

    #[test]
    fn project_price_applies_rise() {
        let goal = RecoveryGoal::new(dec!(25), dec!(0));
        assert_eq!(goal.project_price(dec!(8)), Some(dec!(10)));
        assert_eq!(goal.profit_factor(), Some(dec!(1)));
    }

    #[test]
    fn break_even_rise_returns_price_to_average() {
        let position = PositionState::new(100, dec!(10), dec!(8));
        let goal = RecoveryGoal::break_even(&position).unwrap();
        assert_eq!(goal.target_rise, dec!(25));
        assert_eq!(goal.target_profit, Decimal::ZERO);
        assert_eq!(goal.project_price(dec!(8)), Some(dec!(10)));
    }

    #[test]
    fn break_even_rise_is_negative_above_average() {
        let position = PositionState::new(100, dec!(10), dec!(12.5));
        let goal = RecoveryGoal::break_even(&position).unwrap();
        assert_eq!(goal.target_rise, dec!(-20));
    }

    #[test]
    fn break_even_without_position() {
        let position = PositionState::new(0, dec!(10), dec!(8));
        assert_eq!(
            RecoveryGoal::break_even(&position),
            Err(FailureReason::NoExistingPosition)
        );
    }

    #[test]
    fn break_even_at_zero_price_is_unsolvable() {
        let position = PositionState::new(5, dec!(10), dec!(0));
        assert_eq!(
            RecoveryGoal::break_even(&position),
            Err(FailureReason::Unsolvable)
        );
    }

    #[test]
    fn margin_is_added_to_break_even_rise() {
        let position = PositionState::new(100, dec!(10), dec!(2));
        let goal = RecoveryGoal::with_margin(&position, dec!(10), dec!(5)).unwrap();
        assert_eq!(goal, RecoveryGoal::new(dec!(410), dec!(5)));
    }

    #[test]
    fn negative_margin_is_invalid() {
        let position = PositionState::new(100, dec!(10), dec!(2));
        assert_eq!(
            RecoveryGoal::with_margin(&position, dec!(-1), dec!(5)),
            Err(FailureReason::InvalidInput)
        );
    }
}
