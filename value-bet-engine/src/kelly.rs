//! Fractional Kelly stake sizing with confidence scaling and a hard cap.
//!
//! Kelly formula: f* = (bp - q) / b
//! where:
//!   b = net odds (odds - 1)
//!   p = model win probability
//!   q = 1 - p
//!
//! The full Kelly fraction is scaled by the configured conservatism factor and
//! by the model's confidence, then capped at the per-bet stake limit.

use crate::config::EngineConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Recommended stake for a single bet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct KellyStake {
    /// Fraction of bankroll to stake (after scaling and cap)
    pub fraction: Decimal,
    /// Stake in bankroll units: `fraction * bankroll`
    pub amount: Decimal,
}

impl KellyStake {
    /// No stake.
    pub const ZERO: Self = Self {
        fraction: Decimal::ZERO,
        amount: Decimal::ZERO,
    };
}

/// Stake sizer bound to the engine's risk parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KellySizer {
    /// Fractional Kelly multiplier (0.25 = quarter-Kelly)
    pub max_kelly_fraction: Decimal,
    /// Hard cap on the staked fraction of bankroll
    pub max_stake_per_bet: Decimal,
}

impl KellySizer {
    pub fn new(max_kelly_fraction: Decimal, max_stake_per_bet: Decimal) -> Self {
        Self {
            max_kelly_fraction,
            max_stake_per_bet,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_kelly_fraction, config.max_stake_per_bet)
    }

    /// Edge of a bet at decimal `odds`: `(odds - 1) * p - (1 - p)`.
    pub fn edge(probability: Decimal, odds: Decimal) -> Decimal {
        (odds - Decimal::ONE) * probability - (Decimal::ONE - probability)
    }

    /// Unbounded full-Kelly fraction, or `None` when there is no positive edge
    /// or the odds pay nothing (`odds <= 1`).
    pub fn full_kelly(probability: Decimal, odds: Decimal) -> Option<Decimal> {
        let net_odds = odds - Decimal::ONE;
        let edge = Self::edge(probability, odds);

        if edge <= Decimal::ZERO || net_odds <= Decimal::ZERO {
            return None;
        }

        Some(edge / net_odds)
    }

    /// Size a stake for a bet at `odds` given the model `probability`.
    ///
    /// # Returns
    /// `None` if there is no positive edge (the outward `(0, 0)` case), otherwise
    /// the capped fraction and the corresponding amount of `bankroll`.
    pub fn stake(
        &self,
        probability: Decimal,
        odds: Decimal,
        confidence: Decimal,
        bankroll: Decimal,
    ) -> Option<KellyStake> {
        let full = Self::full_kelly(probability, odds)?;

        let adjusted = full * self.max_kelly_fraction * confidence;
        let fraction = adjusted.min(self.max_stake_per_bet);

        if fraction <= Decimal::ZERO {
            return None;
        }

        Some(KellyStake {
            fraction,
            amount: fraction * bankroll,
        })
    }
}
