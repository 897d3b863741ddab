//! Weighted relevance scoring of catalog products against a recipient profile.

mod calculator;
pub mod tags;

pub use calculator::{ProductScorer, ProfileSignals, ScoreBreakdown, ScoredProduct, ScoringWeights};
pub use tags::count_tag_matches;

pub(crate) use calculator::sort_best_first;

/// Products below this relevance never reach the AI oracle.
pub const MIN_CANDIDATE_RELEVANCE: f64 = 10.0;

/// Rating assumed for products that have none.
pub const DEFAULT_RATING: f64 = 5.0;

pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    relationship: 25.0,
    age: 15.0,
    personality: 20.0,
    occasion: 15.0,
    budget_exact: 30.0,
    budget_in_range: 20.0,
    tag_per_match: 5.0,
    tag_cap: 20.0,
    rating_multiplier: 2.0,
    jitter_max: 3.0,
};
