use std::sync::Arc;

use presente_agent::{AiStrategy, LlmClient};
use presente_core::catalog::ProductCatalog;
use presente_core::explanation::ExplanationGenerator;
use presente_core::recommend::{CatalogRanking, LocalFallbackStrategy, RecommendationSelector};
use presente_core::scoring::ProductScorer;
use presente_core::sitemap::SitemapBuilder;
use presente_core::slug::SlugCodec;
use presente_supabase::{RemoteScoringStrategy, SupabaseClient};
use url::Url;

/// Everything a request handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub selector: Arc<RecommendationSelector>,
    pub ai: Arc<AiStrategy>,
    pub remote: Arc<RemoteScoringStrategy>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub ranking: Arc<CatalogRanking>,
    pub slugs: SlugCodec,
    pub sitemap: SitemapBuilder,
    pub site_url: Url,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("stages", &self.selector.stages())
            .field("site_url", &self.site_url.as_str())
            .finish_non_exhaustive()
    }
}

/// The parts `AppState` is wired from.
pub struct StateParts {
    pub catalog: Arc<dyn ProductCatalog>,
    pub oracle: Option<Arc<dyn LlmClient>>,
    pub supabase: Option<SupabaseClient>,
    pub scorer: ProductScorer,
    pub explainer: ExplanationGenerator,
    pub site_url: Url,
}

impl AppState {
    pub fn new(parts: StateParts) -> Self {
        let StateParts { catalog, oracle, supabase, scorer, explainer, site_url } = parts;

        let ai = Arc::new(AiStrategy::new(oracle, catalog.clone(), scorer.clone(), explainer.clone()));
        let remote = Arc::new(RemoteScoringStrategy::new(supabase));
        let selector = RecommendationSelector::new(LocalFallbackStrategy::builtin(scorer.clone()))
            .with_strategy(ai.clone())
            .with_strategy(remote.clone());

        Self {
            selector: Arc::new(selector),
            ai,
            remote,
            catalog,
            ranking: Arc::new(CatalogRanking::new(scorer, explainer)),
            slugs: SlugCodec::default(),
            sitemap: SitemapBuilder::default(),
            site_url,
        }
    }
}
