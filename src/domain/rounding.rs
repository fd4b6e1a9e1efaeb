use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Finest granularity a policy may round to.
pub const MIN_GRANULARITY: Decimal = dec!(0.0001);

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Closest multiple; halves round away from zero.
    Nearest,
    Up,
    Down,
}

/// Rounding applied to the proposal of items whose final price came from `rule_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundingPolicy {
    pub id: String,
    pub rule_id: String,
    pub round_to: Decimal,
    pub mode: RoundingMode,
}

impl RoundingPolicy {
    pub fn new(
        id: impl Into<String>,
        rule_id: impl Into<String>,
        round_to: Decimal,
        mode: RoundingMode,
    ) -> Self {
        Self {
            id: id.into(),
            rule_id: rule_id.into(),
            round_to,
            mode,
        }
    }
}

/// Rounds `price` to a multiple of the policy granularity.
///
/// A non-positive granularity leaves the price untouched, as does any
/// granularity whose multiples overflow the decimal range.
pub fn round_price(price: Decimal, policy: &RoundingPolicy) -> Decimal {
    if policy.round_to <= Decimal::ZERO {
        return price;
    }
    let Some(units) = price.checked_div(policy.round_to) else {
        tracing::debug!(policy = %policy.id, %price, "rounding overflowed, price kept");
        return price;
    };
    let units = match policy.mode {
        RoundingMode::Nearest => {
            units.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        }
        RoundingMode::Up => units.ceil(),
        RoundingMode::Down => units.floor(),
    };
    units.checked_mul(policy.round_to).unwrap_or(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn policy(mode: RoundingMode) -> RoundingPolicy {
        RoundingPolicy::new("p", "r", dec!(1000), mode)
    }

    #[test]
    fn test_round_up_scenario() {
        assert_eq!(
            round_price(dec!(874910.84), &policy(RoundingMode::Up)),
            dec!(875000)
        );
    }

    #[test]
    fn test_round_modes() {
        let price = dec!(1316140.3125);
        assert_eq!(round_price(price, &policy(RoundingMode::Nearest)), dec!(1316000));
        assert_eq!(round_price(price, &policy(RoundingMode::Up)), dec!(1317000));
        assert_eq!(round_price(price, &policy(RoundingMode::Down)), dec!(1316000));
        assert_eq!(round_price(dec!(2500), &policy(RoundingMode::Nearest)), dec!(3000));
    }

    #[test]
    fn test_exact_multiple_is_unchanged() {
        for mode in [RoundingMode::Nearest, RoundingMode::Up, RoundingMode::Down] {
            assert_eq!(round_price(dec!(760000), &policy(mode)), dec!(760000));
        }
    }

    #[test]
    fn test_round_is_idempotent() {
        for mode in [RoundingMode::Nearest, RoundingMode::Up, RoundingMode::Down] {
            let once = round_price(dec!(817851.442914), &policy(mode));
            assert_eq!(round_price(once, &policy(mode)), once);
        }
    }

    #[test]
    fn test_non_positive_granularity_passes_through() {
        let zero = RoundingPolicy::new("p", "r", dec!(0), RoundingMode::Up);
        assert_eq!(round_price(dec!(12.5), &zero), dec!(12.5));
    }

    #[test]
    fn test_overflowing_granularity_passes_through() {
        let tiny = RoundingPolicy::new("p", "r", Decimal::new(1, 28), RoundingMode::Up);
        assert_eq!(round_price(dec!(874910), &tiny), dec!(874910));
        assert_eq!(round_price(Decimal::MAX, &policy(RoundingMode::Up)), Decimal::MAX);
    }
}
