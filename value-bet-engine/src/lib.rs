//! Value Bet Detection and Stake Sizing Engine
//!
//! This crate compares model-produced outcome probabilities against odds quoted
//! by multiple bookmakers, flags outcomes whose bias-adjusted price beats the
//! model's fair price by a configured margin, sizes a stake with a bounded
//! fractional Kelly criterion, and ranks the resulting candidates.
//!
//! The engine is a pure, synchronous computation. It performs no I/O and holds
//! only immutable configuration, so one [`ValueBetEngine`] can serve concurrent
//! callers without locking.
//!
//! # Key Components
//!
//! - [`ValueBetEngine`]: Detection pipeline over a batch of predictions
//! - [`EngineConfig`]: Value/confidence thresholds and risk limits
//! - [`BookmakerProfiles`]: Bookmaker margins and the bias adjuster
//! - [`KellySizer`]: Fractional Kelly stake sizing with a hard cap
//! - [`MarketBook`]: Bookmaker quotes grouped by match
//! - [`ValueBetCandidate`]: A detected value bet, convertible to a [`ValueBetRecord`]
//! - [`DetectionBatch`]: Validation of untyped JSON input
//!
//! # Example
//!
//! ```rust
//! use value_bet_engine::{
//!     EngineConfig, MarketBook, MarketQuote, Outcome, PredictionInput, ValueBetEngine,
//! };
//! use rust_decimal_macros::dec;
//!
//! let engine = ValueBetEngine::new(EngineConfig::default()).unwrap();
//!
//! let predictions = vec![PredictionInput::new(
//!     "match_1",
//!     Some("Juventus vs Inter".to_string()),
//!     [
//!         (Outcome::Home, dec!(0.52)),
//!         (Outcome::Draw, dec!(0.25)),
//!         (Outcome::Away, dec!(0.23)),
//!     ],
//!     dec!(0.72),
//! )];
//!
//! let market: MarketBook = vec![MarketQuote::new(
//!     "match_1".into(),
//!     "pinnacle".into(),
//!     Outcome::Home,
//!     dec!(2.30),
//! )]
//! .into_iter()
//! .collect();
//!
//! let bets = engine.detect(&predictions, &market, dec!(1000));
//! assert_eq!(bets.len(), 1);
//! assert_eq!(bets[0].home_team, "Juventus");
//! ```
//!
//! # Pricing Model
//!
//! ```text
//! fair_odds      = 1 / p
//! adjusted_odds  = best_odds / overround        (* 1.01 for home)
//! value          = adjusted_odds / fair_odds - 1
//! kelly_fraction = min(((b*p - q) / b) * kelly_multiplier * confidence, max_stake)
//! expected_value = p * (adjusted_odds - 1) - (1 - p)
//! score          = value * confidence * (1 + expected_value)
//! ```

pub mod bookmaker;
pub mod config;
pub mod detector;
pub mod error;
pub mod input;
pub mod kelly;
pub mod market;
pub mod opportunity;
pub mod outcome;
pub mod prediction;
pub mod pricing;
pub mod rank;

// Re-exports for convenience
pub use bookmaker::{BookmakerProfile, BookmakerProfiles};
pub use config::{EngineConfig, DEFAULT_BANKROLL};
pub use detector::{DetectionStats, SkipReason, ValueBetEngine};
pub use error::EngineError;
pub use input::DetectionBatch;
pub use kelly::{KellySizer, KellyStake};
pub use market::{MarketBook, MarketQuote};
pub use opportunity::{ValueBetCandidate, ValueBetRecord};
pub use outcome::Outcome;
pub use prediction::PredictionInput;
pub use rank::rank;
