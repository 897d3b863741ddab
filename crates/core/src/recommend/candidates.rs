use crate::budget::price_matches_label;
use crate::domain::product::Product;
use crate::domain::quiz::RecommendationRequest;
use crate::scoring::{
    sort_best_first, ProductScorer, ProfileSignals, ScoredProduct, MIN_CANDIDATE_RELEVANCE,
};

use super::MAX_AI_CANDIDATES;

/// Catalog entries worth sending to the oracle: available, inside the
/// requested budget, with enough profile relevance. Best-first.
pub fn select_candidates(
    products: &[Product],
    request: &RecommendationRequest,
    scorer: &ProductScorer,
) -> Vec<ScoredProduct> {
    let signals = ProfileSignals::from(request);
    let eligible = products
        .iter()
        .filter(|product| product.is_available())
        .filter(|product| price_matches_label(product.price, &request.profile.budget));

    let mut scored: Vec<ScoredProduct> = eligible
        .map(|product| scorer.score_product(product, &signals))
        .filter(|scored| scored.breakdown.relevance() >= MIN_CANDIDATE_RELEVANCE)
        .collect();

    sort_best_first(&mut scored);
    scored.truncate(MAX_AI_CANDIDATES);
    scored
}

/// Exact name first, then case-insensitive containment in either direction.
pub fn match_by_name<'a>(name: &str, products: &'a [Product]) -> Option<&'a Product> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    if let Some(exact) = products.iter().find(|product| product.name == name) {
        return Some(exact);
    }

    let wanted = name.to_lowercase();
    products.iter().find(|product| {
        let candidate = product.name.trim().to_lowercase();
        !candidate.is_empty() && (candidate.contains(&wanted) || wanted.contains(&candidate))
    })
}
