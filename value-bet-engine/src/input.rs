//! Parsing of untyped detection batches.
//!
//! Accepts the loosely structured JSON produced by upstream collaborators:
//!
//! ```text
//! {
//!   "predictions": [
//!     {"match_id": "m1", "match_name": "A vs B",
//!      "probabilities": {"home": 0.52, "draw": 0.25, "away": 0.23},
//!      "confidence": 0.72}
//!   ],
//!   "market": {"m1": {"pinnacle": {"home": 2.30}}},
//!   "bankroll": 1000
//! }
//! ```
//!
//! Entries with missing fields are skipped. Values of the wrong type are collected
//! and reported together as one [`EngineError::Validation`].

use crate::{
    config::DEFAULT_BANKROLL,
    error::EngineError,
    market::{MarketBook, MarketQuote},
    outcome::Outcome,
    prediction::PredictionInput,
};
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use smol_str::SmolStr;
use std::str::FromStr;
use tracing::debug;

/// Confidence assumed for predictions that do not report one.
pub const DEFAULT_CONFIDENCE: Decimal = Decimal::from_parts(5, 0, 0, false, 1); // 0.5

/// A validated detection request.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionBatch {
    pub predictions: Vec<PredictionInput>,
    pub market: MarketBook,
    pub bankroll: Decimal,
}

impl DetectionBatch {
    /// Parse and validate a batch from JSON text.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let value: Value = serde_json::from_str(json).map_err(|e| EngineError::Validation {
            issues: vec![format!("malformed JSON: {e}")],
        })?;
        Self::from_value(&value)
    }

    /// Validate an already decoded JSON value.
    pub fn from_value(value: &Value) -> Result<Self, EngineError> {
        let mut issues = Vec::new();

        let Some(root) = value.as_object() else {
            return Err(EngineError::Validation {
                issues: vec![format!("batch: expected an object, got {}", type_name(value))],
            });
        };

        let predictions = match root.get("predictions") {
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| parse_prediction(index, entry, &mut issues))
                .collect(),
            Some(other) => {
                issues.push(format!("predictions: expected an array, got {}", type_name(other)));
                Vec::new()
            }
            None => {
                issues.push("predictions: missing".to_string());
                Vec::new()
            }
        };

        let market = match root.get("market") {
            Some(Value::Object(matches)) => parse_market(matches, &mut issues),
            Some(Value::Null) | None => MarketBook::new(),
            Some(other) => {
                issues.push(format!("market: expected an object, got {}", type_name(other)));
                MarketBook::new()
            }
        };

        let bankroll = match root.get("bankroll") {
            Some(Value::Null) | None => DEFAULT_BANKROLL,
            Some(value) => match decimal_field("bankroll", value, &mut issues) {
                Some(bankroll) if bankroll < Decimal::ZERO => {
                    issues.push(format!("bankroll: must be non-negative, got {bankroll}"));
                    DEFAULT_BANKROLL
                }
                Some(bankroll) => bankroll,
                None => DEFAULT_BANKROLL,
            },
        };

        EngineError::check_issues(issues)?;

        Ok(Self {
            predictions,
            market,
            bankroll,
        })
    }
}

fn parse_prediction(index: usize, entry: &Value, issues: &mut Vec<String>) -> Option<PredictionInput> {
    let path = format!("predictions[{index}]");

    let Some(fields) = entry.as_object() else {
        issues.push(format!("{path}: expected an object, got {}", type_name(entry)));
        return None;
    };

    let match_id = match fields.get("match_id") {
        Some(Value::String(id)) => Some(SmolStr::new(id)),
        Some(Value::Number(id)) if id.is_i64() || id.is_u64() => Some(SmolStr::new(id.to_string())),
        Some(Value::Null) | None => None,
        Some(other) => {
            issues.push(format!("{path}.match_id: expected a string, got {}", type_name(other)));
            None
        }
    };

    let match_name = match fields.get("match_name") {
        Some(Value::String(name)) => Some(name.clone()),
        Some(Value::Null) | None => None,
        Some(other) => {
            issues.push(format!("{path}.match_name: expected a string, got {}", type_name(other)));
            None
        }
    };

    let probabilities = match fields.get("probabilities") {
        Some(Value::Object(labels)) => Some(
            labels
                .iter()
                .filter_map(|(label, value)| {
                    // Only 1X2 outcomes are priced
                    let outcome = Outcome::from_str(label).ok()?;
                    let probability =
                        decimal_field(&format!("{path}.probabilities.{label}"), value, issues)?;
                    Some((outcome, probability))
                })
                .collect::<Vec<_>>(),
        ),
        Some(Value::Null) | None => None,
        Some(other) => {
            issues.push(format!(
                "{path}.probabilities: expected an object, got {}",
                type_name(other)
            ));
            None
        }
    };

    let confidence = match fields.get("confidence") {
        Some(Value::Null) | None => Some(DEFAULT_CONFIDENCE),
        Some(value) => match decimal_field(&format!("{path}.confidence"), value, issues) {
            Some(confidence) if confidence < Decimal::ZERO || confidence > Decimal::ONE => {
                issues.push(format!("{path}.confidence: must be within [0, 1], got {confidence}"));
                None
            }
            confidence => confidence,
        },
    };

    match (match_id, probabilities, confidence) {
        (Some(match_id), Some(probabilities), Some(confidence)) => Some(PredictionInput::new(
            match_id,
            match_name,
            probabilities,
            confidence,
        )),
        (match_id, probabilities, _) => {
            if match_id.is_none() || probabilities.is_none() {
                debug!(%path, "Skipping prediction with missing fields");
            }
            None
        }
    }
}

fn parse_market(matches: &Map<String, Value>, issues: &mut Vec<String>) -> MarketBook {
    let mut book = MarketBook::new();

    for (match_id, bookmakers) in matches {
        let Some(bookmakers) = bookmakers.as_object() else {
            issues.push(format!(
                "market.{match_id}: expected an object, got {}",
                type_name(bookmakers)
            ));
            continue;
        };

        for (bookmaker, outcomes) in bookmakers {
            let Some(outcomes) = outcomes.as_object() else {
                issues.push(format!(
                    "market.{match_id}.{bookmaker}: expected an object, got {}",
                    type_name(outcomes)
                ));
                continue;
            };

            for (label, odds) in outcomes {
                let Ok(outcome) = Outcome::from_str(label) else {
                    continue;
                };
                let path = format!("market.{match_id}.{bookmaker}.{label}");
                if let Some(odds) = decimal_field(&path, odds, issues) {
                    book.insert(MarketQuote::new(
                        SmolStr::new(match_id),
                        SmolStr::new(bookmaker),
                        outcome,
                        odds,
                    ));
                }
            }
        }
    }

    book
}

fn decimal_field(path: &str, value: &Value, issues: &mut Vec<String>) -> Option<Decimal> {
    let Value::Number(number) = value else {
        issues.push(format!("{path}: expected a number, got {}", type_name(value)));
        return None;
    };

    match number_to_decimal(number) {
        Some(decimal) => Some(decimal),
        None => {
            issues.push(format!("{path}: {number} is not representable as a decimal"));
            None
        }
    }
}

fn number_to_decimal(number: &Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
