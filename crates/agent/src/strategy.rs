use std::sync::Arc;

use async_trait::async_trait;
use presente_core::catalog::ProductCatalog;
use presente_core::domain::product::{GiftRecommendation, Product};
use presente_core::domain::quiz::{RecipientProfile, RecommendationRequest};
use presente_core::explanation::ExplanationGenerator;
use presente_core::recommend::{
    select_candidates, RecommendationStrategy, Stage, StrategyError, MAX_AI_CANDIDATES,
    MAX_RECOMMENDATIONS, MIN_RECOMMENDATIONS,
};
use presente_core::scoring::ProductScorer;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::llm::LlmClient;
use crate::parse::{parse_ranked_list, RankedList};
use crate::prompt::build_prompt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AiStatus {
    pub configured: bool,
    pub model: Option<String>,
    pub max_candidates: usize,
}

/// First tier: asks the oracle to pick from the best-scoring catalog entries.
pub struct AiStrategy {
    client: Option<Arc<dyn LlmClient>>,
    catalog: Arc<dyn ProductCatalog>,
    scorer: ProductScorer,
    explainer: ExplanationGenerator,
}

impl std::fmt::Debug for AiStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiStrategy").field("status", &self.status()).finish_non_exhaustive()
    }
}

impl AiStrategy {
    pub fn new(
        client: Option<Arc<dyn LlmClient>>,
        catalog: Arc<dyn ProductCatalog>,
        scorer: ProductScorer,
        explainer: ExplanationGenerator,
    ) -> Self {
        Self { client, catalog, scorer, explainer }
    }

    pub fn status(&self) -> AiStatus {
        AiStatus {
            configured: self.client.is_some(),
            model: self.client.as_ref().map(|client| client.model().to_string()),
            max_candidates: MAX_AI_CANDIDATES,
        }
    }

    /// Sends a fixed two-product sample to the oracle and returns the names
    /// it picked.
    pub async fn self_test(&self) -> Result<Vec<String>, StrategyError> {
        let client = self.client.as_ref().ok_or(StrategyError::NotConfigured)?;
        let (request, products) = sample();
        let prompt = build_prompt(&request, &products);

        let content = client
            .complete(&prompt)
            .await
            .map_err(|error| StrategyError::Unavailable(format!("{error:#}")))?;
        let list = parse_ranked_list(&content, &products);
        if list.choices.is_empty() {
            return Err(StrategyError::Malformed("no sample product recognised".to_string()));
        }
        Ok(list.choices.iter().map(|choice| choice.product.name.clone()).collect())
    }

    fn to_recommendations(&self, list: &RankedList<'_>) -> Vec<GiftRecommendation> {
        list.choices
            .iter()
            .map(|choice| GiftRecommendation::from_product(choice.product, choice.reason.clone()))
            .collect()
    }

    /// Tops a short oracle answer up with the next best candidates.
    fn backfill(
        &self,
        picked: &mut Vec<GiftRecommendation>,
        candidates: &[Product],
        request: &RecommendationRequest,
    ) {
        let emotional = request.emotional.as_deref();
        for product in candidates.iter().take(MIN_RECOMMENDATIONS) {
            if picked.len() >= MAX_RECOMMENDATIONS {
                break;
            }
            if picked.iter().any(|existing| existing.name == product.name) {
                continue;
            }
            let explanation = self.explainer.generate(&product.name, emotional);
            picked.push(GiftRecommendation::from_product(product, explanation));
        }
    }
}

#[async_trait]
impl RecommendationStrategy for AiStrategy {
    fn stage(&self) -> Stage {
        Stage::TryAi
    }

    fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    fn backfill_below(&self) -> Option<usize> {
        Some(MIN_RECOMMENDATIONS)
    }

    async fn attempt(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<GiftRecommendation>, StrategyError> {
        let client = self.client.as_ref().ok_or(StrategyError::NotConfigured)?;

        let products = self
            .catalog
            .active_products()
            .await
            .map_err(|error| StrategyError::Unavailable(error.to_string()))?;
        let candidates: Vec<Product> = select_candidates(&products, request, &self.scorer)
            .into_iter()
            .map(|scored| scored.product)
            .collect();
        if candidates.is_empty() {
            return Err(StrategyError::NoCandidates);
        }

        let prompt = build_prompt(request, &candidates);
        let content = client
            .complete(&prompt)
            .await
            .map_err(|error| StrategyError::Unavailable(format!("{error:#}")))?;

        let list = parse_ranked_list(&content, &candidates);
        let mut picked = self.to_recommendations(&list);
        if picked.is_empty() {
            return Err(StrategyError::Malformed(
                "oracle named none of the submitted products".to_string(),
            ));
        }
        let matched = picked.len();
        if matched < MIN_RECOMMENDATIONS {
            self.backfill(&mut picked, &candidates, request);
            debug!(
                event_name = "oracle.choices.backfilled",
                matched,
                total = picked.len(),
                "short oracle answer topped up from candidates"
            );
        }

        info!(
            event_name = "oracle.choices.accepted",
            model = client.model(),
            candidates = candidates.len(),
            matched,
            mode = ?list.mode,
            "oracle recommendations accepted"
        );
        Ok(picked)
    }
}

fn sample() -> (RecommendationRequest, Vec<Product>) {
    let request = RecommendationRequest::new(RecipientProfile {
        relationship: "Mãe/Pai".to_string(),
        age: "51-65 anos".to_string(),
        personality: "Criativa e artística".to_string(),
        occasion: "Aniversário".to_string(),
        budget: "R$ 51 - R$ 150".to_string(),
        interests: vec!["Leitura e cultura".to_string(), "Culinária e gastronomia".to_string()],
    })
    .with_emotional("Amor e carinho");

    let mut spa = Product::new("sample-1", "Kit Spa Relaxante Casa", Decimal::new(8990, 2));
    spa.emotional_tags = vec!["relaxamento".to_string(), "autocuidado".to_string()];
    spa.personality_match = vec!["Calma e reflexiva".to_string()];
    spa.source = Some("amazon".to_string());

    let mut book = Product::new("sample-2", "Livro de Receitas Gourmet", Decimal::new(4590, 2));
    book.emotional_tags = vec!["criatividade".to_string(), "culinária".to_string()];
    book.personality_match = vec!["Criativa e artística".to_string()];
    book.source = Some("amazon".to_string());

    (request, vec![spa, book])
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use presente_core::catalog::StaticCatalog;
    use presente_core::domain::product::Product;
    use presente_core::domain::quiz::{RecipientProfile, RecommendationRequest};
    use presente_core::explanation::ExplanationGenerator;
    use presente_core::recommend::{RecommendationStrategy, StrategyError};
    use presente_core::scoring::ProductScorer;
    use rust_decimal::Decimal;

    use super::AiStrategy;
    use crate::llm::{ChatPrompt, LlmClient};

    struct CannedOracle {
        answer: Result<String, String>,
        prompts: AtomicUsize,
    }

    impl CannedOracle {
        fn answering(answer: &str) -> Arc<Self> {
            Arc::new(Self { answer: Ok(answer.to_string()), prompts: AtomicUsize::new(0) })
        }

        fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self { answer: Err(reason.to_string()), prompts: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl LlmClient for CannedOracle {
        fn model(&self) -> &str {
            "sonar"
        }

        async fn complete(&self, _prompt: &ChatPrompt) -> Result<String> {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            self.answer.clone().map_err(|reason| anyhow!(reason))
        }
    }

    fn product(id: &str, name: &str) -> Product {
        let mut product = Product::new(id, name, Decimal::from(100));
        product.relationship_types = vec!["Mãe/Pai".to_string()];
        product
    }

    fn catalog() -> Arc<StaticCatalog> {
        Arc::new(StaticCatalog::new(vec![
            product("p1", "Caneca Azul"),
            product("p2", "Vaso de Suculentas"),
            product("p3", "Kit Chá da Tarde"),
            product("p4", "Álbum de Fotos"),
        ]))
    }

    fn strategy(oracle: Option<Arc<CannedOracle>>) -> AiStrategy {
        AiStrategy::new(
            oracle.map(|oracle| oracle as Arc<dyn LlmClient>),
            catalog(),
            ProductScorer::deterministic(),
            ExplanationGenerator::default(),
        )
    }

    fn request() -> RecommendationRequest {
        RecommendationRequest::new(RecipientProfile {
            relationship: "Mãe/Pai".to_string(),
            ..RecipientProfile::default()
        })
    }

    #[tokio::test]
    async fn unconfigured_oracle_is_disabled() {
        let ai = strategy(None);
        assert!(!ai.is_enabled());
        assert!(!ai.status().configured);
        assert_eq!(ai.attempt(&request()).await, Err(StrategyError::NotConfigured));
    }

    #[tokio::test]
    async fn three_matches_are_returned_with_oracle_reasons() {
        let oracle = CannedOracle::answering(
            r#"[{"product":"Álbum de Fotos","reason":"Memórias."},{"product":"Caneca Azul","reason":"Café."},{"product":"Kit Chá da Tarde","reason":"Chá."}]"#,
        );
        let ai = strategy(Some(oracle.clone()));

        let picks = ai.attempt(&request()).await.expect("oracle answer");

        assert_eq!(oracle.prompts.load(Ordering::SeqCst), 1);
        assert_eq!(picks.len(), 3);
        assert_eq!(picks[0].name, "Álbum de Fotos");
        assert_eq!(picks[0].emotional_explanation, "Memórias.");
        assert_eq!(picks[0].id, "p4");
        assert_eq!(picks[0].price, "R$ 100,00");
    }

    #[tokio::test]
    async fn short_answer_is_topped_up_from_candidates() {
        let oracle = CannedOracle::answering(r#"[{"product":"Vaso de Suculentas","reason":"Vida."}]"#);
        let ai = strategy(Some(oracle));

        let picks = ai.attempt(&request()).await.expect("oracle answer");
        let names: Vec<&str> = picks.iter().map(|pick| pick.name.as_str()).collect();

        assert_eq!(names, vec!["Vaso de Suculentas", "Caneca Azul", "Kit Chá da Tarde"]);
        assert_eq!(picks[0].emotional_explanation, "Vida.");
        assert!(picks[1].emotional_explanation.contains("Caneca Azul"));
    }

    #[tokio::test]
    async fn oracle_failure_is_reported_as_unavailable() {
        let ai = strategy(Some(CannedOracle::failing("HTTP 503")));
        let error = ai.attempt(&request()).await.expect_err("oracle down");
        assert_eq!(error, StrategyError::Unavailable("HTTP 503".to_string()));
    }

    #[tokio::test]
    async fn unrecognised_answer_is_malformed() {
        let ai = strategy(Some(CannedOracle::answering("Não encontrei nada adequado.")));
        let error = ai.attempt(&request()).await.expect_err("nothing matched");
        assert!(matches!(error, StrategyError::Malformed(_)));
    }

    #[tokio::test]
    async fn no_relevant_candidates_skips_the_oracle() {
        let oracle = CannedOracle::answering("[]");
        let ai = strategy(Some(oracle.clone()));
        let unrelated = RecommendationRequest::new(RecipientProfile {
            relationship: "Colega de trabalho".to_string(),
            interests: Vec::new(),
            ..RecipientProfile::default()
        });

        assert_eq!(ai.attempt(&unrelated).await, Err(StrategyError::NoCandidates));
        assert_eq!(oracle.prompts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn self_test_reports_recognised_sample_names() {
        let oracle = CannedOracle::answering(
            r#"[{"product":"Livro de Receitas Gourmet","reason":"Criatividade na cozinha."}]"#,
        );
        let ai = strategy(Some(oracle));
        assert_eq!(ai.self_test().await, Ok(vec!["Livro de Receitas Gourmet".to_string()]));
    }
}
