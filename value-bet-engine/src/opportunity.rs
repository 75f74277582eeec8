//! Detected value bets and their display-ready form.

use crate::outcome::Outcome;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A bet whose bias-adjusted market price beats the model's fair price.
///
/// Produced fresh by each detection run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValueBetCandidate {
    pub match_id: SmolStr,
    pub home_team: String,
    pub away_team: String,
    pub outcome: Outcome,
    /// Model probability of the outcome
    pub probability: Decimal,
    /// Best raw odds quoted across bookmakers
    pub market_odds: Decimal,
    /// Break-even odds implied by the model probability
    pub fair_odds: Decimal,
    /// Adjusted odds over fair odds, minus one
    pub value: Decimal,
    /// Recommended fraction of bankroll
    pub kelly_stake: Decimal,
    /// Recommended stake in bankroll units
    pub stake_amount: Decimal,
    /// Expected return per unit staked at the adjusted odds
    pub expected_value: Decimal,
    pub confidence: Decimal,
    /// Bookmaker offering `market_odds`
    pub bookmaker: SmolStr,
    pub created_at: DateTime<Utc>,
}

impl ValueBetCandidate {
    /// Combined desirability: `value * confidence * (1 + expected_value)`.
    pub fn score(&self) -> Decimal {
        self.value * self.confidence * (Decimal::ONE + self.expected_value)
    }

    /// Flatten into the rounded, display-ready record.
    pub fn to_record(&self) -> ValueBetRecord {
        let hundred = Decimal::ONE_HUNDRED;
        let value_pct = (self.value * hundred).round_dp(1);
        let kelly_pct = (self.kelly_stake * hundred).round_dp(2);
        let sign = if value_pct.is_sign_negative() { "" } else { "+" };

        ValueBetRecord {
            match_id: self.match_id.clone(),
            home_team: self.home_team.clone(),
            away_team: self.away_team.clone(),
            outcome: self.outcome,
            probability: self.probability.round_dp(4),
            market_odds: self.market_odds,
            fair_odds: self.fair_odds.round_dp(2),
            value: self.value.round_dp(4),
            value_percent: format!("{sign}{value_pct:.1}%"),
            kelly_stake: short_percent(kelly_pct),
            expected_value: self.expected_value.round_dp(4),
            confidence: self.confidence.round_dp(2),
            bookmaker: self.bookmaker.clone(),
            timestamp: self.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

/// Percentage without trailing zeros, keeping one decimal place (`5.0%`, `2.62%`).
fn short_percent(pct: Decimal) -> String {
    let pct = pct.normalize();
    if pct.scale() == 0 {
        format!("{pct}.0%")
    } else {
        format!("{pct}%")
    }
}

/// Flat, rounded view of a [`ValueBetCandidate`] for display and transport.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ValueBetRecord {
    pub match_id: SmolStr,
    pub home_team: String,
    pub away_team: String,
    pub outcome: Outcome,
    #[serde(with = "rust_decimal::serde::float")]
    pub probability: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub market_odds: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fair_odds: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    /// e.g. `"+18.7%"`
    pub value_percent: String,
    /// e.g. `"2.45%"`
    pub kelly_stake: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub expected_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub confidence: Decimal,
    pub bookmaker: SmolStr,
    /// RFC 3339 / ISO-8601 creation time
    pub timestamp: String,
}

/// Total recommended stake across `candidates`, in bankroll units.
pub fn total_stake<'a>(candidates: impl IntoIterator<Item = &'a ValueBetCandidate>) -> Decimal {
    candidates
        .into_iter()
        .map(|candidate| candidate.stake_amount)
        .sum()
}
