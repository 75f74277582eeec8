//! Model output for a single match.

use crate::outcome::Outcome;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Separator between home and away team in a match display name.
pub const TEAM_SEPARATOR: &str = " vs ";

/// Placeholder team names used when the display name cannot be split.
pub const DEFAULT_HOME_TEAM: &str = "Home";
pub const DEFAULT_AWAY_TEAM: &str = "Away";

/// Outcome probabilities and confidence produced by the prediction model.
///
/// Probabilities are evaluated independently and are not renormalised.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictionInput {
    pub match_id: SmolStr,
    /// Display name such as `"Juventus vs Inter"`
    #[serde(default)]
    pub match_name: Option<String>,
    pub probabilities: IndexMap<Outcome, Decimal>,
    /// Model confidence in [0, 1]
    pub confidence: Decimal,
}

impl PredictionInput {
    pub fn new(
        match_id: impl Into<SmolStr>,
        match_name: Option<String>,
        probabilities: impl IntoIterator<Item = (Outcome, Decimal)>,
        confidence: Decimal,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            match_name,
            probabilities: probabilities.into_iter().collect(),
            confidence,
        }
    }

    /// Model probability for `outcome`, if the model produced one.
    pub fn probability(&self, outcome: Outcome) -> Option<Decimal> {
        self.probabilities.get(&outcome).copied()
    }

    /// Home and away team names derived from the display name.
    pub fn teams(&self) -> (String, String) {
        split_teams(self.match_name.as_deref())
    }
}

/// Split `"Home vs Away"` into team names, using placeholders when the name has
/// fewer than two parts.
pub fn split_teams(match_name: Option<&str>) -> (String, String) {
    let parts: Vec<&str> = match_name
        .map(|name| name.split(TEAM_SEPARATOR).collect())
        .unwrap_or_default();

    match parts.as_slice() {
        [home, away, ..] => (home.to_string(), away.to_string()),
        _ => (DEFAULT_HOME_TEAM.to_string(), DEFAULT_AWAY_TEAM.to_string()),
    }
}
