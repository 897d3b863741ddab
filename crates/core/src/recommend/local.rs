use std::cmp::Ordering;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{RecommendationStrategy, Stage, StrategyError, LOCAL_RESULT_LIMIT};
use crate::domain::product::{GiftRecommendation, Product};
use crate::domain::quiz::RecommendationRequest;
use crate::scoring::{ProductScorer, ProfileSignals};

/// A fallback product with its hand-written explanation.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalItem {
    pub product: Product,
    pub explanation: String,
}

struct Seed {
    id: &'static str,
    name: &'static str,
    price_cents: i64,
    image: &'static str,
    description: &'static str,
    explanation: &'static str,
    link: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "local-1",
        name: "Kit de Cuidados Spa em Casa",
        price_cents: 8990,
        image: "https://images.pexels.com/photos/3188799/pexels-photo-3188799.jpeg?auto=compress&cs=tinysrgb&w=400",
        description: "Kit completo com óleos essenciais, velas aromáticas e produtos para um spa relaxante em casa.",
        explanation: "Este presente demonstra que você se preocupa com o bem-estar e relaxamento dela. É um convite para ela se cuidar e ter momentos especiais de autocuidado.",
        link: "https://amazon.com.br/kit-spa-casa",
        category: "bem-estar",
        tags: &["bem-estar", "cuidado", "autocuidado"],
    },
    Seed {
        id: "local-2",
        name: "Smartwatch Fitness",
        price_cents: 29900,
        image: "https://images.pexels.com/photos/393047/pexels-photo-393047.jpeg?auto=compress&cs=tinysrgb&w=400",
        description: "Smartwatch com monitoramento de saúde, GPS e resistência à água para acompanhar atividades físicas.",
        explanation: "Mostra que você apoia os objetivos de saúde dela e quer fazer parte da jornada de bem-estar. É um presente que diz \"eu acredito em você\".",
        link: "https://amazon.com.br/smartwatch-fitness",
        category: "tecnologia",
        tags: &["tecnologia", "fitness", "apoio"],
    },
    Seed {
        id: "local-3",
        name: "Livro de Receitas Gourmet",
        price_cents: 4590,
        image: "https://images.pexels.com/photos/1391653/pexels-photo-1391653.jpeg?auto=compress&cs=tinysrgb&w=400",
        description: "Livro com receitas sofisticadas e fáceis de fazer, perfeito para quem gosta de cozinhar.",
        explanation: "Reconhece e valoriza o talento culinário dela. É um presente que incentiva a criatividade e promete momentos deliciosos juntos.",
        link: "https://amazon.com.br/livro-receitas-gourmet",
        category: "culinaria",
        tags: &["culinária", "gastronomia", "leitura"],
    },
    Seed {
        id: "local-4",
        name: "Kit de Maquiagem Profissional",
        price_cents: 15990,
        image: "https://images.pexels.com/photos/2533266/pexels-photo-2533266.jpeg?auto=compress&cs=tinysrgb&w=400",
        description: "Kit completo com pincéis, paleta de cores e produtos de alta qualidade.",
        explanation: "Este presente celebra a beleza única dela e oferece ferramentas para expressar sua criatividade. Mostra que você valoriza sua autoestima e confiança.",
        link: "https://amazon.com.br/kit-maquiagem-profissional",
        category: "beleza",
        tags: &["beleza", "moda"],
    },
    Seed {
        id: "local-5",
        name: "Planta Suculenta Decorativa",
        price_cents: 3590,
        image: "https://images.pexels.com/photos/1084199/pexels-photo-1084199.jpeg?auto=compress&cs=tinysrgb&w=400",
        description: "Conjunto de suculentas em vasos decorativos, perfeito para decorar qualquer ambiente.",
        explanation: "Um presente que cresce e floresce como o carinho entre vocês. Representa vida, cuidado e a beleza das coisas simples.",
        link: "https://amazon.com.br/plantas-suculentas",
        category: "decoracao",
        tags: &["decoração", "carinho"],
    },
    Seed {
        id: "local-6",
        name: "Fone de Ouvido Bluetooth Premium",
        price_cents: 19990,
        image: "https://images.pexels.com/photos/3394650/pexels-photo-3394650.jpeg?auto=compress&cs=tinysrgb&w=400",
        description: "Fone wireless com cancelamento de ruído e qualidade de som excepcional.",
        explanation: "Para momentos de música e relaxamento. Este presente mostra que você valoriza os momentos de paz e prazer dela.",
        link: "https://amazon.com.br/fone-bluetooth-premium",
        category: "tecnologia",
        tags: &["tecnologia", "gadgets", "diversão"],
    },
];

impl Seed {
    fn to_item(&self) -> LocalItem {
        let mut product = Product::new(self.id, self.name, Decimal::new(self.price_cents, 2));
        product.description = self.description.to_string();
        product.image_url = Some(self.image.to_string());
        product.affiliate_link = self.link.to_string();
        product.category = Some(self.category.to_string());
        product.emotional_tags = self.tags.iter().map(|tag| tag.to_string()).collect();
        LocalItem { product, explanation: self.explanation.to_string() }
    }
}

/// Last tier: a short fixed list ranked with the regular scorer. Never fails.
#[derive(Clone, Debug)]
pub struct LocalFallbackStrategy {
    items: Vec<LocalItem>,
    scorer: ProductScorer,
    limit: usize,
}

impl LocalFallbackStrategy {
    pub fn new(items: Vec<LocalItem>, scorer: ProductScorer) -> Self {
        Self { items, scorer, limit: LOCAL_RESULT_LIMIT }
    }

    pub fn builtin(scorer: ProductScorer) -> Self {
        Self::new(SEEDS.iter().map(Seed::to_item).collect(), scorer)
    }

    pub fn items(&self) -> &[LocalItem] {
        &self.items
    }

    pub fn rank(&self, request: &RecommendationRequest) -> Vec<GiftRecommendation> {
        let signals = ProfileSignals::from(request);
        let mut scored: Vec<(f64, &LocalItem)> = self
            .items
            .iter()
            .map(|item| (self.scorer.score(&item.product, &signals), item))
            .collect();
        scored.sort_by(|left, right| right.0.partial_cmp(&left.0).unwrap_or(Ordering::Equal));

        scored
            .into_iter()
            .take(self.limit)
            .map(|(_, item)| GiftRecommendation::from_product(&item.product, item.explanation.clone()))
            .collect()
    }
}

#[async_trait]
impl RecommendationStrategy for LocalFallbackStrategy {
    fn stage(&self) -> Stage {
        Stage::UseLocalFallback
    }

    async fn attempt(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<GiftRecommendation>, StrategyError> {
        Ok(self.rank(request))
    }
}

#[cfg(test)]
mod tests {
    use super::LocalFallbackStrategy;
    use crate::domain::quiz::{RecipientProfile, RecommendationRequest};
    use crate::scoring::ProductScorer;

    #[test]
    fn builtin_list_has_six_items() {
        let strategy = LocalFallbackStrategy::builtin(ProductScorer::deterministic());
        assert_eq!(strategy.items().len(), 6);
    }

    #[test]
    fn returns_top_three_by_score() {
        let strategy = LocalFallbackStrategy::builtin(ProductScorer::deterministic());
        let request = RecommendationRequest::new(RecipientProfile {
            budget: "R$ 151 - R$ 300".to_string(),
            interests: vec!["Tecnologia e gadgets".to_string()],
            ..RecipientProfile::default()
        });

        let picks = strategy.rank(&request);
        let names: Vec<&str> = picks.iter().map(|pick| pick.name.as_str()).collect();

        assert_eq!(picks.len(), 3);
        assert_eq!(names[0], "Fone de Ouvido Bluetooth Premium");
        assert_eq!(names[1], "Smartwatch Fitness");
        assert_eq!(picks[0].price, "R$ 199,90");
        assert_eq!(picks[0].category, "tecnologia");
    }
}
