//! Configuration types for the value bet engine.

use crate::{bookmaker::BookmakerProfiles, error::EngineError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Bankroll assumed when a batch does not supply one.
pub const DEFAULT_BANKROLL: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Tuning parameters for value bet detection and stake sizing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum value (edge over fair odds) to emit a candidate (e.g., 0.02 = 2%)
    pub min_value_threshold: Decimal,
    /// Minimum model confidence to emit a candidate
    pub min_confidence: Decimal,
    /// Fractional Kelly multiplier (0.25 = quarter-Kelly)
    pub max_kelly_fraction: Decimal,
    /// Hard cap on stake as a fraction of bankroll
    pub max_stake_per_bet: Decimal,
    /// Bookmaker margin profiles
    pub bookmakers: BookmakerProfiles,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_value_threshold: Decimal::new(2, 2), // 2%
            min_confidence: Decimal::new(60, 2),     // 60%
            max_kelly_fraction: Decimal::new(25, 2), // quarter-Kelly
            max_stake_per_bet: Decimal::new(5, 2),   // 5% of bankroll
            bookmakers: BookmakerProfiles::default(),
        }
    }
}

impl EngineConfig {
    /// Create from environment variables, falling back to defaults.
    ///
    /// Reads:
    /// - `VALUE_BET_MIN_VALUE` (default: 0.02)
    /// - `VALUE_BET_MIN_CONFIDENCE` (default: 0.60)
    /// - `VALUE_BET_KELLY_FRACTION` (default: 0.25)
    /// - `VALUE_BET_MAX_STAKE` (default: 0.05)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_value_threshold: env_decimal("VALUE_BET_MIN_VALUE", defaults.min_value_threshold),
            min_confidence: env_decimal("VALUE_BET_MIN_CONFIDENCE", defaults.min_confidence),
            max_kelly_fraction: env_decimal("VALUE_BET_KELLY_FRACTION", defaults.max_kelly_fraction),
            max_stake_per_bet: env_decimal("VALUE_BET_MAX_STAKE", defaults.max_stake_per_bet),
            bookmakers: defaults.bookmakers,
        }
    }

    /// Check that every parameter lies in its meaningful range.
    pub fn validate(&self) -> Result<(), EngineError> {
        let unit_interval = Decimal::ZERO..=Decimal::ONE;

        if !unit_interval.contains(&self.min_confidence) {
            return Err(EngineError::InvalidConfig(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.max_kelly_fraction <= Decimal::ZERO || self.max_kelly_fraction > Decimal::ONE {
            return Err(EngineError::InvalidConfig(format!(
                "max_kelly_fraction must be within (0, 1], got {}",
                self.max_kelly_fraction
            )));
        }
        if self.max_stake_per_bet <= Decimal::ZERO || self.max_stake_per_bet > Decimal::ONE {
            return Err(EngineError::InvalidConfig(format!(
                "max_stake_per_bet must be within (0, 1], got {}",
                self.max_stake_per_bet
            )));
        }
        Ok(())
    }
}

fn env_decimal(key: &str, default: Decimal) -> Decimal {
    match std::env::var(key) {
        Ok(raw) => Decimal::from_str(raw.trim()).unwrap_or_else(|e| {
            warn!(key, %raw, %e, %default, "Invalid decimal in environment, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.min_value_threshold, dec!(0.02));
        assert_eq!(config.min_confidence, dec!(0.60));
        assert_eq!(config.max_kelly_fraction, dec!(0.25));
        assert_eq!(config.max_stake_per_bet, dec!(0.05));
        assert!(config.bookmakers.contains("pinnacle"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = EngineConfig::default();
        config.min_confidence = dec!(1.5);
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.max_kelly_fraction = dec!(0);
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.max_stake_per_bet = dec!(-0.01);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_config_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"min_value_threshold": 0.05, "min_confidence": 0.7}"#).unwrap();
        assert_eq!(config.min_value_threshold, dec!(0.05));
        assert_eq!(config.min_confidence, dec!(0.7));
        assert_eq!(config.max_kelly_fraction, dec!(0.25));
        assert_eq!(config.bookmakers, BookmakerProfiles::default());
    }

    #[test]
    fn test_env_decimal_falls_back_on_garbage() {
        std::env::set_var("VALUE_BET_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_decimal("VALUE_BET_TEST_GARBAGE", dec!(0.02)), dec!(0.02));
        std::env::set_var("VALUE_BET_TEST_VALID", " 0.035 ");
        assert_eq!(env_decimal("VALUE_BET_TEST_VALID", dec!(0.02)), dec!(0.035));
        assert_eq!(env_decimal("VALUE_BET_TEST_UNSET", dec!(0.1)), dec!(0.1));
    }
}
