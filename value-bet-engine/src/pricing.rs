//! Fair-price and expected-value calculations.

use rust_decimal::Decimal;

/// Outward value reported when a probability has no realistic fair price.
pub const FAIR_ODDS_SENTINEL: Decimal = Decimal::from_parts(999, 0, 0, false, 0);

/// Break-even decimal odds for `probability`.
///
/// Formula: `1 / probability`
///
/// Returns `None` outside the open interval `(0, 1)`.
pub fn fair_odds(probability: Decimal) -> Option<Decimal> {
    if probability <= Decimal::ZERO || probability >= Decimal::ONE {
        return None;
    }
    Some(Decimal::ONE / probability)
}

/// [`fair_odds`] with the out-of-domain case mapped to [`FAIR_ODDS_SENTINEL`].
pub fn fair_odds_or_sentinel(probability: Decimal) -> Decimal {
    fair_odds(probability).unwrap_or(FAIR_ODDS_SENTINEL)
}

/// Expected return per unit staked at `odds` under the model's `probability`.
///
/// Formula: `p * (odds - 1) - (1 - p)`
pub fn expected_value(probability: Decimal, odds: Decimal) -> Decimal {
    probability * (odds - Decimal::ONE) - (Decimal::ONE - probability)
}

/// Value of a price relative to the fair price: `odds / fair_odds - 1`.
///
/// # Panics
/// If `fair_odds` is zero. Prices produced by [`fair_odds`] are always above one.
pub fn value(odds: Decimal, fair_odds: Decimal) -> Decimal {
    odds / fair_odds - Decimal::ONE
}
