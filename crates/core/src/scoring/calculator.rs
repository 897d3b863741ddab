use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;

use super::{count_tag_matches, DEFAULT_RATING, DEFAULT_WEIGHTS};
use crate::budget::price_matches_label;
use crate::domain::product::Product;
use crate::domain::quiz::RecommendationRequest;
use crate::random::{FixedRandom, RandomSource, ThreadRandom};

/// Points awarded per signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub relationship: f64,
    pub age: f64,
    pub personality: f64,
    pub occasion: f64,
    /// Product's budget label equals the requested bracket.
    pub budget_exact: f64,
    /// Labels differ but the price falls inside the requested bracket.
    pub budget_in_range: f64,
    pub tag_per_match: f64,
    pub tag_cap: f64,
    pub rating_multiplier: f64,
    /// Upper bound of the tie-breaking jitter.
    pub jitter_max: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

/// Borrowed view of whatever profile fields a caller has. Missing fields
/// simply earn no points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSignals<'a> {
    pub relationship: Option<&'a str>,
    pub age: Option<&'a str>,
    pub personality: Option<&'a str>,
    pub occasion: Option<&'a str>,
    pub budget: Option<&'a str>,
    pub tags: Vec<&'a str>,
}

impl<'a> From<&'a RecommendationRequest> for ProfileSignals<'a> {
    fn from(request: &'a RecommendationRequest) -> Self {
        let profile = &request.profile;
        Self {
            relationship: Some(profile.relationship.as_str()),
            age: Some(profile.age.as_str()),
            personality: Some(profile.personality.as_str()),
            occasion: Some(profile.occasion.as_str()),
            budget: Some(profile.budget.as_str()),
            tags: request.user_tags(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub relationship: f64,
    pub age: f64,
    pub personality: f64,
    pub occasion: f64,
    pub budget: f64,
    pub tags: f64,
    pub rating: f64,
    pub jitter: f64,
}

impl ScoreBreakdown {
    /// Profile-match points only: no budget, rating or jitter.
    pub fn relevance(&self) -> f64 {
        self.relationship + self.age + self.personality + self.occasion + self.tags
    }

    pub fn total(&self) -> f64 {
        let total = self.relevance() + self.budget + self.rating + self.jitter;
        (total * 100.0).round() / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredProduct {
    pub product: Product,
    pub breakdown: ScoreBreakdown,
    pub score: f64,
}

#[derive(Clone)]
pub struct ProductScorer {
    weights: ScoringWeights,
    random: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for ProductScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductScorer").field("weights", &self.weights).finish_non_exhaustive()
    }
}

impl Default for ProductScorer {
    fn default() -> Self {
        Self::new(Arc::new(ThreadRandom))
    }
}

impl ProductScorer {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { weights: ScoringWeights::default(), random }
    }

    /// Scorer with jitter disabled; identical inputs give identical scores.
    pub fn deterministic() -> Self {
        Self::new(Arc::new(FixedRandom(0.0)))
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn breakdown(&self, product: &Product, signals: &ProfileSignals<'_>) -> ScoreBreakdown {
        let weights = &self.weights;
        let member = |wanted: Option<&str>, set: &[String], points: f64| match wanted {
            Some(value) if set.iter().any(|entry| entry == value) => points,
            _ => 0.0,
        };

        let budget = match signals.budget {
            Some(label) if product.budget_range.as_deref() == Some(label) => weights.budget_exact,
            Some(label) if price_matches_label(product.price, label) => weights.budget_in_range,
            _ => 0.0,
        };

        let matches = count_tag_matches(&signals.tags, &product.emotional_tags);
        let tags = (matches as f64 * weights.tag_per_match).min(weights.tag_cap);

        let rating = product
            .rating
            .filter(|rating| rating.is_finite())
            .unwrap_or(DEFAULT_RATING)
            .max(0.0);

        ScoreBreakdown {
            relationship: member(signals.relationship, &product.relationship_types, weights.relationship),
            age: member(signals.age, &product.age_range, weights.age),
            personality: member(signals.personality, &product.personality_match, weights.personality),
            occasion: member(signals.occasion, &product.occasion_tags, weights.occasion),
            budget,
            tags,
            rating: rating * weights.rating_multiplier,
            jitter: self.random.next_unit() * weights.jitter_max,
        }
    }

    pub fn score(&self, product: &Product, signals: &ProfileSignals<'_>) -> f64 {
        self.breakdown(product, signals).total()
    }

    pub fn score_product(&self, product: &Product, signals: &ProfileSignals<'_>) -> ScoredProduct {
        let breakdown = self.breakdown(product, signals);
        ScoredProduct { product: product.clone(), score: breakdown.total(), breakdown }
    }

    /// Scores every product and returns them best-first, truncated to `limit`.
    pub fn rank<'p, I>(&self, products: I, signals: &ProfileSignals<'_>, limit: usize) -> Vec<ScoredProduct>
    where
        I: IntoIterator<Item = &'p Product>,
    {
        let mut scored: Vec<ScoredProduct> =
            products.into_iter().map(|product| self.score_product(product, signals)).collect();
        sort_best_first(&mut scored);
        scored.truncate(limit);
        scored
    }
}

/// Descending score, ties broken by catalog priority.
pub(crate) fn sort_best_first(scored: &mut [ScoredProduct]) {
    scored.sort_by(|left, right| {
        right
            .score
            .partial_cmp(&left.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| right.product.priority.cmp(&left.product.priority))
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use super::{ProductScorer, ProfileSignals};
    use crate::domain::product::Product;
    use crate::domain::quiz::{RecipientProfile, RecommendationRequest};
    use crate::random::FixedRandom;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn profile(relationship: &str, personality: &str, budget: &str) -> RecommendationRequest {
        RecommendationRequest::new(RecipientProfile {
            relationship: relationship.to_string(),
            personality: personality.to_string(),
            budget: budget.to_string(),
            ..RecipientProfile::default()
        })
    }

    #[test]
    fn full_profile_match_scores_every_signal() {
        let mut product = Product::new("p-1", "Kit Pintura", Decimal::new(12_990, 2));
        product.relationship_types = strings(&["Mãe/Pai"]);
        product.personality_match = strings(&["Criativa e artística"]);
        product.budget_range = Some("R$ 51 - R$ 150".to_string());

        let request = profile("Mãe/Pai", "Criativa e artística", "R$ 51 - R$ 150");
        let signals = ProfileSignals::from(&request);
        let breakdown = ProductScorer::deterministic().breakdown(&product, &signals);

        assert_eq!(breakdown.relationship, 25.0);
        assert_eq!(breakdown.personality, 20.0);
        assert_eq!(breakdown.budget, 30.0);
        assert_eq!(breakdown.rating, 10.0);
        assert!(breakdown.total() >= 75.0);
    }

    #[test]
    fn price_inside_bracket_earns_partial_budget_points() {
        let mut product = Product::new("p-2", "Caneca", Decimal::new(7990, 2));
        product.budget_range = Some("Até R$ 50".to_string());

        let request = profile("Amigo(a)", "Calma e reflexiva", "R$ 51 - R$ 150");
        let breakdown =
            ProductScorer::deterministic().breakdown(&product, &ProfileSignals::from(&request));

        assert_eq!(breakdown.budget, 20.0);
    }

    #[test]
    fn tag_points_are_capped() {
        let mut product = Product::new("p-3", "Cesta", Decimal::from(90));
        product.emotional_tags =
            strings(&["amor", "carinho", "amor e carinho", "moda", "beleza", "útil"]);

        let request = profile("Amigo(a)", "Calma e reflexiva", "R$ 51 - R$ 150")
            .with_emotional("Amor e carinho");
        let breakdown =
            ProductScorer::deterministic().breakdown(&product, &ProfileSignals::from(&request));

        assert_eq!(breakdown.tags, 20.0);
    }

    #[test]
    fn scores_are_non_negative_even_with_bad_ratings() {
        let mut product = Product::new("p-4", "Quebrado", Decimal::from(9_999));
        product.rating = Some(f64::NAN);
        let empty = ProfileSignals::default();

        let scorer = ProductScorer::new(Arc::new(FixedRandom(0.99)));
        let score = scorer.score(&product, &empty);
        assert!(score.is_finite());
        assert!(score >= 10.0);

        product.rating = Some(-4.0);
        assert!(scorer.score(&product, &empty) >= 0.0);
    }

    #[test]
    fn jitter_stays_below_three_points() {
        let product = Product::new("p-5", "Livro", Decimal::from(40));
        let signals = ProfileSignals::default();

        let calm = ProductScorer::deterministic().score(&product, &signals);
        let jittered = ProductScorer::new(Arc::new(FixedRandom(1.0))).score(&product, &signals);

        assert!(jittered > calm);
        assert!(jittered - calm <= 3.0);
    }

    #[test]
    fn rank_orders_best_first_and_truncates() {
        let mut strong = Product::new("strong", "Forte", Decimal::from(100));
        strong.relationship_types = strings(&["Amigo(a)"]);
        let weak = Product::new("weak", "Fraco", Decimal::from(100));
        let mut middle = Product::new("middle", "Médio", Decimal::from(100));
        middle.age_range = strings(&["26-35 anos"]);

        let request = RecommendationRequest::new(RecipientProfile::default());
        let catalog = [weak, middle, strong];
        let ranked =
            ProductScorer::deterministic().rank(&catalog, &ProfileSignals::from(&request), 2);

        let ids: Vec<&str> = ranked.iter().map(|entry| entry.product.id.as_str()).collect();
        assert_eq!(ids, vec!["strong", "middle"]);
    }
}
