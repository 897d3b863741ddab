pub mod budget;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod explanation;
pub mod random;
pub mod recommend;
pub mod scoring;
pub mod seo;
pub mod sitemap;
pub mod slug;

pub use budget::{price_matches_label, BudgetBracket};
pub use catalog::{CatalogError, ProductCatalog, StaticCatalog};
pub use domain::product::{GiftRecommendation, Product, ProductId, StockStatus};
pub use domain::questions::{Question, QuestionId, QuestionOption, QUESTIONS};
pub use domain::quiz::{QuizAnswer, QuizAnswers, RecipientProfile, RecommendationRequest};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use explanation::{EmotionalMotivation, ExplanationGenerator};
pub use random::{RandomSource, ThreadRandom};
pub use recommend::{
    RecommendationSelector, RecommendationStrategy, Selection, ShowMore, Stage, StrategyError,
};
pub use scoring::{ProductScorer, ProfileSignals, ScoringWeights};
pub use seo::SeoPage;
pub use sitemap::SitemapBuilder;
pub use slug::{ProfileSlug, SlugCodec, SlugError};
