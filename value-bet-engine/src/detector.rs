//! Value bet detection across model predictions and bookmaker quotes.

use crate::{
    config::EngineConfig,
    error::EngineError,
    input::DetectionBatch,
    kelly::KellySizer,
    market::MarketBook,
    opportunity::ValueBetCandidate,
    outcome::Outcome,
    prediction::PredictionInput,
    pricing, rank,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Why an outcome did not produce a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Probability outside (0, 1), so there is no fair price
    NoFairPrice,
    /// No bookmaker quotes the outcome, or the best quote is unusable
    NoMarketPrice,
    BelowValueThreshold,
    BelowConfidenceThreshold,
    /// Kelly sizing found no positive stake
    NoStake,
}

/// Counters for a single detection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DetectionStats {
    pub predictions: usize,
    /// Outcomes with a model probability that were evaluated
    pub outcomes_evaluated: usize,
    pub candidates: usize,
    pub no_fair_price: usize,
    pub no_market_price: usize,
    pub below_value_threshold: usize,
    pub below_confidence_threshold: usize,
    pub no_stake: usize,
}

impl DetectionStats {
    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::NoFairPrice => self.no_fair_price += 1,
            SkipReason::NoMarketPrice => self.no_market_price += 1,
            SkipReason::BelowValueThreshold => self.below_value_threshold += 1,
            SkipReason::BelowConfidenceThreshold => self.below_confidence_threshold += 1,
            SkipReason::NoStake => self.no_stake += 1,
        }
    }

    /// Total outcomes that were evaluated but filtered out.
    pub fn skipped(&self) -> usize {
        self.no_fair_price
            + self.no_market_price
            + self.below_value_threshold
            + self.below_confidence_threshold
            + self.no_stake
    }
}

/// Value bet detection engine.
///
/// Holds only immutable configuration, so a single instance can be shared
/// across threads and invoked concurrently.
#[derive(Debug, Clone)]
pub struct ValueBetEngine {
    config: EngineConfig,
    sizer: KellySizer,
}

impl Default for ValueBetEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            sizer: KellySizer::from_config(&config),
            config,
        }
    }
}

impl ValueBetEngine {
    /// Create an engine after validating `config`.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            sizer: KellySizer::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sizer(&self) -> &KellySizer {
        &self.sizer
    }

    /// Detect and rank value bets, stamping candidates with the current time.
    pub fn detect(
        &self,
        predictions: &[PredictionInput],
        market: &MarketBook,
        bankroll: Decimal,
    ) -> Vec<ValueBetCandidate> {
        self.detect_at(predictions, market, bankroll, Utc::now())
    }

    /// Detect and rank value bets, stamping candidates with `now`.
    pub fn detect_at(
        &self,
        predictions: &[PredictionInput],
        market: &MarketBook,
        bankroll: Decimal,
        now: DateTime<Utc>,
    ) -> Vec<ValueBetCandidate> {
        self.detect_with_stats(predictions, market, bankroll, now).0
    }

    /// Detect over an already validated untyped batch.
    pub fn detect_batch(&self, batch: &DetectionBatch) -> Vec<ValueBetCandidate> {
        self.detect(&batch.predictions, &batch.market, batch.bankroll)
    }

    /// Detect and rank value bets, also returning per-run counters.
    pub fn detect_with_stats(
        &self,
        predictions: &[PredictionInput],
        market: &MarketBook,
        bankroll: Decimal,
        now: DateTime<Utc>,
    ) -> (Vec<ValueBetCandidate>, DetectionStats) {
        let mut stats = DetectionStats {
            predictions: predictions.len(),
            ..Default::default()
        };
        let mut candidates = Vec::new();

        for prediction in predictions {
            let (home_team, away_team) = prediction.teams();

            for outcome in Outcome::ALL {
                let Some(probability) = prediction.probability(outcome) else {
                    continue;
                };
                stats.outcomes_evaluated += 1;

                match self.evaluate(prediction, outcome, probability, market, bankroll) {
                    Ok(evaluated) => {
                        candidates.push(ValueBetCandidate {
                            match_id: prediction.match_id.clone(),
                            home_team: home_team.clone(),
                            away_team: away_team.clone(),
                            outcome,
                            probability,
                            market_odds: evaluated.market_odds,
                            fair_odds: evaluated.fair_odds,
                            value: evaluated.value,
                            kelly_stake: evaluated.kelly_fraction,
                            stake_amount: evaluated.stake_amount,
                            expected_value: evaluated.expected_value,
                            confidence: prediction.confidence,
                            bookmaker: evaluated.bookmaker,
                            created_at: now,
                        });
                        stats.candidates += 1;
                    }
                    Err(reason) => {
                        debug!(
                            match_id = %prediction.match_id,
                            %outcome,
                            ?reason,
                            "Outcome skipped"
                        );
                        stats.record_skip(reason);
                    }
                }
            }
        }

        let ranked = rank::rank(candidates);

        info!(
            value_bets = ranked.len(),
            matches = stats.predictions,
            outcomes = stats.outcomes_evaluated,
            skipped = stats.skipped(),
            "Value bet detection complete"
        );

        (ranked, stats)
    }

    /// Run the pricing pipeline for one outcome of one prediction.
    fn evaluate(
        &self,
        prediction: &PredictionInput,
        outcome: Outcome,
        probability: Decimal,
        market: &MarketBook,
        bankroll: Decimal,
    ) -> Result<EvaluatedOutcome, SkipReason> {
        let fair_odds = pricing::fair_odds(probability).ok_or(SkipReason::NoFairPrice)?;

        let best = market
            .best_quote(&prediction.match_id, outcome)
            .filter(|quote| quote.odds > Decimal::ONE)
            .ok_or(SkipReason::NoMarketPrice)?;

        let adjusted_odds = self
            .config
            .bookmakers
            .adjust(best.odds, &best.bookmaker, outcome)
            .ok_or(SkipReason::NoMarketPrice)?;

        let value = pricing::value(adjusted_odds, fair_odds);

        if value < self.config.min_value_threshold {
            return Err(SkipReason::BelowValueThreshold);
        }
        if prediction.confidence < self.config.min_confidence {
            return Err(SkipReason::BelowConfidenceThreshold);
        }

        let stake = self
            .sizer
            .stake(probability, adjusted_odds, prediction.confidence, bankroll)
            .ok_or(SkipReason::NoStake)?;

        Ok(EvaluatedOutcome {
            market_odds: best.odds,
            bookmaker: best.bookmaker.clone(),
            fair_odds,
            value,
            kelly_fraction: stake.fraction,
            stake_amount: stake.amount,
            expected_value: pricing::expected_value(probability, adjusted_odds),
        })
    }
}

struct EvaluatedOutcome {
    market_odds: Decimal,
    bookmaker: smol_str::SmolStr,
    fair_odds: Decimal,
    value: Decimal,
    kelly_fraction: Decimal,
    stake_amount: Decimal,
    expected_value: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MarketQuote;
    use rust_decimal_macros::dec;

    fn prediction(match_id: &str, home: Decimal, draw: Decimal, away: Decimal, confidence: Decimal) -> PredictionInput {
        PredictionInput::new(
            match_id,
            Some(format!("{match_id} home vs {match_id} away")),
            [(Outcome::Home, home), (Outcome::Draw, draw), (Outcome::Away, away)],
            confidence,
        )
    }

    fn quote(match_id: &str, bookmaker: &str, outcome: Outcome, odds: Decimal) -> MarketQuote {
        MarketQuote::new(match_id.into(), bookmaker.into(), outcome, odds)
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_735_732_800, 0).unwrap()
    }

    #[test]
    fn test_home_value_detected() {
        let engine = ValueBetEngine::default();
        let predictions = vec![prediction("m1", dec!(0.52), dec!(0.25), dec!(0.23), dec!(0.72))];
        let market: MarketBook = vec![quote("m1", "pinnacle", Outcome::Home, dec!(2.30))]
            .into_iter()
            .collect();

        let (bets, stats) = engine.detect_with_stats(&predictions, &market, dec!(1000), now());

        assert_eq!(bets.len(), 1);
        let bet = &bets[0];
        assert_eq!(bet.outcome, Outcome::Home);
        assert_eq!(bet.bookmaker.as_str(), "pinnacle");
        assert_eq!(bet.market_odds, dec!(2.30));
        assert_eq!(bet.home_team, "m1 home");
        assert_eq!(bet.away_team, "m1 away");
        assert_eq!(bet.value.round_dp(3), dec!(0.187));
        // full Kelly ~0.1456, scaled by 0.25 * 0.72, below the 5% cap
        assert_eq!(bet.kelly_stake.round_dp(4), dec!(0.0262));
        assert_eq!(bet.stake_amount.round_dp(2), dec!(26.20));
        assert_eq!(bet.expected_value.round_dp(4), dec!(0.1866));
        assert_eq!(bet.created_at, now());

        assert_eq!(stats.outcomes_evaluated, 3);
        assert_eq!(stats.candidates, 1);
        assert_eq!(stats.no_market_price, 2);
    }

    #[test]
    fn test_low_confidence_filtered() {
        let engine = ValueBetEngine::default();
        let predictions = vec![prediction("m1", dec!(0.52), dec!(0.25), dec!(0.23), dec!(0.5))];
        let market: MarketBook = vec![quote("m1", "pinnacle", Outcome::Home, dec!(2.30))]
            .into_iter()
            .collect();

        let (bets, stats) = engine.detect_with_stats(&predictions, &market, dec!(1000), now());
        assert!(bets.is_empty());
        assert_eq!(stats.below_confidence_threshold, 1);
    }

    #[test]
    fn test_below_value_threshold_filtered() {
        let engine = ValueBetEngine::default();
        // Fair odds 2.0, adjusted 2.05 / 1.05 < 2.0
        let predictions = vec![prediction("m1", dec!(0.3), dec!(0.5), dec!(0.2), dec!(0.9))];
        let market: MarketBook = vec![quote("m1", "generic", Outcome::Draw, dec!(2.05))]
            .into_iter()
            .collect();

        let (bets, stats) = engine.detect_with_stats(&predictions, &market, dec!(1000), now());
        assert!(bets.is_empty());
        assert_eq!(stats.below_value_threshold, 1);
    }

    #[test]
    fn test_odds_of_one_skipped() {
        let engine = ValueBetEngine::default();
        let predictions = vec![prediction("m1", dec!(0.52), dec!(0.25), dec!(0.23), dec!(0.9))];
        let market: MarketBook = vec![quote("m1", "pinnacle", Outcome::Away, dec!(1.0))]
            .into_iter()
            .collect();

        let (bets, stats) = engine.detect_with_stats(&predictions, &market, dec!(1000), now());
        assert!(bets.is_empty());
        assert_eq!(stats.no_market_price, 3);
    }

    #[test]
    fn test_degenerate_probability_skipped() {
        let engine = ValueBetEngine::default();
        let predictions = vec![prediction("m1", dec!(1), dec!(0), dec!(0), dec!(0.9))];
        let market: MarketBook = vec![
            quote("m1", "pinnacle", Outcome::Home, dec!(1.5)),
            quote("m1", "pinnacle", Outcome::Draw, dec!(9.0)),
            quote("m1", "pinnacle", Outcome::Away, dec!(15.0)),
        ]
        .into_iter()
        .collect();

        let (bets, stats) = engine.detect_with_stats(&predictions, &market, dec!(1000), now());
        assert!(bets.is_empty());
        assert_eq!(stats.no_fair_price, 3);
    }

    #[test]
    fn test_missing_outcome_not_evaluated() {
        let engine = ValueBetEngine::default();
        let predictions = vec![PredictionInput::new(
            "m1",
            None,
            [(Outcome::Away, dec!(0.4))],
            dec!(0.8),
        )];
        let market: MarketBook = vec![
            quote("m1", "bet365", Outcome::Home, dec!(5.0)),
            quote("m1", "bet365", Outcome::Away, dec!(3.0)),
        ]
        .into_iter()
        .collect();

        let (bets, stats) = engine.detect_with_stats(&predictions, &market, dec!(1000), now());
        assert_eq!(stats.outcomes_evaluated, 1);
        assert_eq!(bets.len(), 1);
        assert_eq!(bets[0].outcome, Outcome::Away);
        assert_eq!(bets[0].home_team, "Home");
        assert_eq!(bets[0].away_team, "Away");
    }

    #[test]
    fn test_best_bookmaker_selected_before_adjustment() {
        let engine = ValueBetEngine::default();
        let predictions = vec![PredictionInput::new("m1", None, [(Outcome::Away, dec!(0.4))], dec!(0.8))];
        // Highest raw odds wins even if another bookmaker would adjust higher
        let market: MarketBook = vec![
            quote("m1", "pinnacle", Outcome::Away, dec!(3.00)),
            quote("m1", "unknown_book", Outcome::Away, dec!(3.05)),
        ]
        .into_iter()
        .collect();

        let bets = engine.detect_at(&predictions, &market, dec!(1000), now());
        assert_eq!(bets[0].bookmaker.as_str(), "unknown_book");
        assert_eq!(bets[0].market_odds, dec!(3.05));
    }

    #[test]
    fn test_overflowing_quote_skipped() {
        let engine = ValueBetEngine::default();
        let predictions = vec![PredictionInput::new("m1", None, [(Outcome::Home, dec!(0.5))], dec!(0.9))];
        let market: MarketBook = vec![quote("m1", "pinnacle", Outcome::Home, Decimal::MAX)]
            .into_iter()
            .collect();

        let (bets, stats) = engine.detect_with_stats(&predictions, &market, dec!(1000), now());
        assert!(bets.is_empty());
        assert_eq!(stats.no_market_price, 1);
    }

    #[test]
    fn test_config_with_marginless_profile_rejected() {
        let json = r#"{
            "bookmakers": {
                "generic": {"overround": 1.05, "reliability": 0.85},
                "tiny": {"overround": 1e-22, "reliability": 0.5}
            }
        }"#;
        assert!(serde_json::from_str::<EngineConfig>(json).is_err());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EngineConfig {
            max_stake_per_bet: dec!(2),
            ..Default::default()
        };
        assert!(matches!(
            ValueBetEngine::new(config),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}
