//! Bookmaker quotes grouped by match.

use crate::outcome::Outcome;
use derive_more::Constructor;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A single bookmaker's decimal odds for one outcome of one match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Constructor)]
pub struct MarketQuote {
    pub match_id: SmolStr,
    pub bookmaker: SmolStr,
    pub outcome: Outcome,
    pub odds: Decimal,
}

/// Nested wire shape: `match_id -> bookmaker -> outcome -> odds`.
pub type NestedOdds = IndexMap<SmolStr, IndexMap<SmolStr, IndexMap<Outcome, Decimal>>>;

/// All market quotes for a detection run, grouped by match in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "NestedOdds", into = "NestedOdds")]
pub struct MarketBook {
    matches: IndexMap<SmolStr, Vec<MarketQuote>>,
}

impl MarketBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a quote. Quotes for the same match keep their insertion order.
    pub fn insert(&mut self, quote: MarketQuote) {
        self.matches
            .entry(quote.match_id.clone())
            .or_default()
            .push(quote);
    }

    /// All quotes for `match_id`, empty if the match is unknown.
    pub fn quotes_for(&self, match_id: &str) -> &[MarketQuote] {
        self.matches
            .get(match_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Highest quoted odds for `outcome` of `match_id`.
    ///
    /// Ties resolve to the first quote seen.
    pub fn best_quote(&self, match_id: &str, outcome: Outcome) -> Option<&MarketQuote> {
        self.quotes_for(match_id)
            .iter()
            .filter(|quote| quote.outcome == outcome)
            .fold(None, |best: Option<&MarketQuote>, quote| match best {
                Some(current) if current.odds >= quote.odds => Some(current),
                _ => Some(quote),
            })
    }

    pub fn num_matches(&self) -> usize {
        self.matches.len()
    }

    pub fn num_quotes(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl FromIterator<MarketQuote> for MarketBook {
    fn from_iter<I: IntoIterator<Item = MarketQuote>>(iter: I) -> Self {
        let mut book = Self::new();
        iter.into_iter().for_each(|quote| book.insert(quote));
        book
    }
}

impl From<NestedOdds> for MarketBook {
    fn from(nested: NestedOdds) -> Self {
        nested
            .into_iter()
            .flat_map(|(match_id, bookmakers)| {
                bookmakers.into_iter().flat_map(move |(bookmaker, outcomes)| {
                    let match_id = match_id.clone();
                    outcomes.into_iter().map(move |(outcome, odds)| {
                        MarketQuote::new(match_id.clone(), bookmaker.clone(), outcome, odds)
                    })
                })
            })
            .collect()
    }
}

impl From<MarketBook> for NestedOdds {
    fn from(book: MarketBook) -> Self {
        let mut nested = NestedOdds::new();
        for quote in book.matches.into_values().flatten() {
            nested
                .entry(quote.match_id)
                .or_default()
                .entry(quote.bookmaker)
                .or_default()
                .insert(quote.outcome, quote.odds);
        }
        nested
    }
}
