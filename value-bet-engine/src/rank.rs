//! Ordering of detected value bets.

use crate::opportunity::ValueBetCandidate;

/// Order candidates by [`ValueBetCandidate::score`], best first.
///
/// The sort is stable: equal scores keep their input order.
pub fn rank(mut candidates: Vec<ValueBetCandidate>) -> Vec<ValueBetCandidate> {
    candidates.sort_by_cached_key(|candidate| std::cmp::Reverse(candidate.score()));
    candidates
}
