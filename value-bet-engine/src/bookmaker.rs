//! Bookmaker margin profiles and the bias adjustment applied to quoted odds.
//!
//! Uses rust_decimal for exact precision in odds arithmetic.

use crate::{error::EngineError, outcome::Outcome};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Identifier of the fallback profile used for unrecognised bookmakers.
pub const GENERIC_BOOKMAKER: &str = "generic";

/// Multiplicative correction applied to home odds, countering the market's
/// systematic underpricing of home advantage.
pub const HOME_BIAS_CORRECTION: Decimal = Decimal::from_parts(101, 0, 0, false, 2); // 1.01

/// Margin characteristics of a single bookmaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BookmakerProfile {
    /// Multiplicative margin factor baked into quoted odds (e.g. 1.018 = 1.8%)
    pub overround: Decimal,
    /// Historical reliability weighting (not used in scoring)
    pub reliability: Decimal,
}

impl BookmakerProfile {
    pub fn new(overround: Decimal, reliability: Decimal) -> Self {
        Self {
            overround,
            reliability,
        }
    }
}

/// Immutable table of bookmaker profiles, always containing [`GENERIC_BOOKMAKER`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(
    try_from = "IndexMap<SmolStr, BookmakerProfile>",
    into = "IndexMap<SmolStr, BookmakerProfile>"
)]
pub struct BookmakerProfiles {
    profiles: IndexMap<SmolStr, BookmakerProfile>,
}

impl Default for BookmakerProfiles {
    fn default() -> Self {
        let profiles = [
            ("pinnacle", BookmakerProfile::new(Decimal::new(1018, 3), Decimal::new(95, 2))),
            ("bet365", BookmakerProfile::new(Decimal::new(1042, 3), Decimal::new(90, 2))),
            ("williamhill", BookmakerProfile::new(Decimal::new(1045, 3), Decimal::new(88, 2))),
            (GENERIC_BOOKMAKER, BookmakerProfile::new(Decimal::new(105, 2), Decimal::new(85, 2))),
        ]
        .into_iter()
        .map(|(id, profile)| (SmolStr::new(id), profile))
        .collect();

        Self { profiles }
    }
}

impl BookmakerProfiles {
    /// Build a table from explicit profiles.
    ///
    /// Fails if any overround does not exceed one or if no `generic` profile
    /// is supplied.
    pub fn new<Id>(profiles: impl IntoIterator<Item = (Id, BookmakerProfile)>) -> Result<Self, EngineError>
    where
        Id: Into<SmolStr>,
    {
        let profiles: IndexMap<SmolStr, BookmakerProfile> = profiles
            .into_iter()
            .map(|(id, profile)| (id.into(), profile))
            .collect();

        if let Some((id, _)) = profiles
            .iter()
            .find(|(_, profile)| profile.overround <= Decimal::ONE)
        {
            return Err(EngineError::InvalidConfig(format!(
                "bookmaker {id} must have an overround above 1"
            )));
        }

        if !profiles.contains_key(GENERIC_BOOKMAKER) {
            return Err(EngineError::InvalidConfig(format!(
                "bookmaker profiles must include a '{GENERIC_BOOKMAKER}' fallback"
            )));
        }

        Ok(Self { profiles })
    }

    /// Profile for `bookmaker`, falling back to the generic profile.
    pub fn profile(&self, bookmaker: &str) -> &BookmakerProfile {
        self.profiles
            .get(bookmaker)
            .or_else(|| self.profiles.get(GENERIC_BOOKMAKER))
            .unwrap_or(&GENERIC_FALLBACK)
    }

    /// Check whether a dedicated profile exists for `bookmaker`.
    pub fn contains(&self, bookmaker: &str) -> bool {
        self.profiles.contains_key(bookmaker)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &BookmakerProfile)> {
        self.profiles.iter()
    }

    /// Strip the bookmaker's margin from `raw_odds` and correct for home bias.
    ///
    /// Formula: `raw_odds / overround`, then `* 1.01` for [`Outcome::Home`].
    ///
    /// Returns `None` if the adjusted price overflows [`Decimal`].
    pub fn adjust(&self, raw_odds: Decimal, bookmaker: &str, outcome: Outcome) -> Option<Decimal> {
        let adjusted = raw_odds.checked_div(self.profile(bookmaker).overround)?;

        match outcome {
            Outcome::Home => adjusted.checked_mul(HOME_BIAS_CORRECTION),
            Outcome::Draw | Outcome::Away => Some(adjusted),
        }
    }
}

// Every constructor guarantees a generic entry, so this is never returned in practice.
const GENERIC_FALLBACK: BookmakerProfile = BookmakerProfile {
    overround: Decimal::from_parts(105, 0, 0, false, 2),
    reliability: Decimal::from_parts(85, 0, 0, false, 2),
};

impl TryFrom<IndexMap<SmolStr, BookmakerProfile>> for BookmakerProfiles {
    type Error = EngineError;

    fn try_from(profiles: IndexMap<SmolStr, BookmakerProfile>) -> Result<Self, Self::Error> {
        Self::new(profiles)
    }
}

impl From<BookmakerProfiles> for IndexMap<SmolStr, BookmakerProfile> {
    fn from(table: BookmakerProfiles) -> Self {
        table.profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_profiles() {
        let table = BookmakerProfiles::default();
        assert_eq!(table.profile("pinnacle").overround, dec!(1.018));
        assert_eq!(table.profile("bet365").overround, dec!(1.042));
        assert_eq!(table.profile("williamhill").overround, dec!(1.045));
        assert_eq!(table.profile("generic").overround, dec!(1.05));
        assert_eq!(table.profile("generic").reliability, dec!(0.85));
    }

    #[test]
    fn test_unknown_bookmaker_uses_generic() {
        let table = BookmakerProfiles::default();
        assert!(!table.contains("unibet"));
        assert_eq!(table.profile("unibet"), table.profile(GENERIC_BOOKMAKER));
    }

    #[test]
    fn test_adjust_generic_away_has_no_home_correction() {
        let table = BookmakerProfiles::default();
        let adjusted = table.adjust(dec!(3.15), "generic", Outcome::Away).unwrap();
        assert_eq!(adjusted, dec!(3.15) / dec!(1.05));
        assert_eq!(adjusted, dec!(3));
    }

    #[test]
    fn test_adjust_draw_has_no_home_correction() {
        let table = BookmakerProfiles::default();
        let adjusted = table.adjust(dec!(3.40), "bet365", Outcome::Draw).unwrap();
        assert_eq!(adjusted, dec!(3.40) / dec!(1.042));
    }

    #[test]
    fn test_adjust_home_applies_correction() {
        let table = BookmakerProfiles::default();
        let adjusted = table.adjust(dec!(2.30), "pinnacle", Outcome::Home).unwrap();
        assert_eq!(adjusted, dec!(2.30) / dec!(1.018) * dec!(1.01));
        // ~2.2819
        assert_eq!(adjusted.round_dp(4), dec!(2.2819));
    }

    #[test]
    fn test_new_rejects_overround_not_above_one() {
        for overround in [dec!(0), Decimal::new(1, 22), dec!(0.98), dec!(1)] {
            let result = BookmakerProfiles::new([
                ("generic", BookmakerProfile::new(dec!(1.05), dec!(0.85))),
                ("broken", BookmakerProfile::new(overround, dec!(0.5))),
            ]);
            assert!(
                matches!(result, Err(EngineError::InvalidConfig(_))),
                "overround {overround} should be rejected"
            );
        }
    }

    #[test]
    fn test_deserialize_rejects_tiny_overround() {
        let json = r#"{
            "generic": {"overround": 1.05, "reliability": 0.85},
            "tiny": {"overround": 1e-22, "reliability": 0.5}
        }"#;
        assert!(serde_json::from_str::<BookmakerProfiles>(json).is_err());
    }

    #[test]
    fn test_adjust_overflow_is_none() {
        let table = BookmakerProfiles::default();
        assert_eq!(table.adjust(Decimal::MAX, "pinnacle", Outcome::Home), None);
        assert!(table.adjust(Decimal::MAX, "pinnacle", Outcome::Away).is_some());
    }

    #[test]
    fn test_new_requires_generic_profile() {
        let result = BookmakerProfiles::new([(
            "pinnacle",
            BookmakerProfile::new(dec!(1.018), dec!(0.95)),
        )]);
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_deserialize_validates_table() {
        let json = r#"{"generic": {"overround": 1.06, "reliability": 0.8}}"#;
        let table: BookmakerProfiles = serde_json::from_str(json).unwrap();
        assert_eq!(table.profile("anything").overround, dec!(1.06));

        let missing_generic = r#"{"pinnacle": {"overround": 1.02, "reliability": 0.9}}"#;
        assert!(serde_json::from_str::<BookmakerProfiles>(missing_generic).is_err());
    }
}
