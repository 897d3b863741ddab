//! Wire contract of the remote scoring endpoint, and the catalog ranking
//! service that answers it.

use serde::{Deserialize, Serialize};

use super::REMOTE_RESULT_LIMIT;
use crate::domain::product::{
    format_price, process_image_url, GiftRecommendation, Product, DEFAULT_CATEGORY,
    DEFAULT_IMAGE_URL,
};
use crate::domain::quiz::RecommendationRequest;
use crate::errors::DomainError;
use crate::explanation::ExplanationGenerator;
use crate::scoring::{ProductScorer, ProfileSignals};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteScoringRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surprise: Option<String>,
}

impl From<&RecommendationRequest> for RemoteScoringRequest {
    fn from(request: &RecommendationRequest) -> Self {
        let profile = &request.profile;
        Self {
            relationship: Some(profile.relationship.clone()),
            age: Some(profile.age.clone()),
            personality: Some(profile.personality.clone()),
            interests: profile.interests.clone(),
            occasion: Some(profile.occasion.clone()),
            budget: Some(profile.budget.clone()),
            emotional: request.emotional.clone(),
            surprise: request.surprise.clone(),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

impl RemoteScoringRequest {
    pub fn signals(&self) -> ProfileSignals<'_> {
        ProfileSignals {
            relationship: present(&self.relationship),
            age: present(&self.age),
            personality: present(&self.personality),
            occasion: present(&self.occasion),
            budget: present(&self.budget),
            tags: self
                .interests
                .iter()
                .map(String::as_str)
                .chain(self.emotional.as_deref())
                .chain(self.surprise.as_deref())
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if present(&self.relationship).is_none() {
            return Err(DomainError::MissingField("relationship"));
        }
        if present(&self.budget).is_none() {
            return Err(DomainError::MissingField("budget"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteStatus {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecommendation {
    pub id: String,
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub affiliate_link: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub emotional_explanation: String,
    #[serde(default)]
    pub match_score: f64,
}

impl From<RemoteRecommendation> for GiftRecommendation {
    fn from(value: RemoteRecommendation) -> Self {
        Self {
            id: value.id,
            name: value.name,
            price: value.price,
            image: process_image_url(value.image_url.as_deref()),
            description: value.description.unwrap_or_default(),
            emotional_explanation: value.emotional_explanation,
            affiliate_link: value.affiliate_link,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteScoringResponse {
    pub status: RemoteStatus,
    #[serde(default)]
    pub recommendations: Vec<RemoteRecommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl RemoteScoringResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: RemoteStatus::Error,
            recommendations: Vec::new(),
            message: Some(message.into()),
            count: None,
        }
    }
}

/// Scores the full available catalog without a relevance cutoff and returns
/// the top entries with explanations.
#[derive(Clone, Debug, Default)]
pub struct CatalogRanking {
    scorer: ProductScorer,
    explainer: ExplanationGenerator,
}

impl CatalogRanking {
    pub fn new(scorer: ProductScorer, explainer: ExplanationGenerator) -> Self {
        Self { scorer, explainer }
    }

    pub fn rank(
        &self,
        products: &[Product],
        request: &RemoteScoringRequest,
    ) -> Result<RemoteScoringResponse, DomainError> {
        request.validate()?;

        let available: Vec<&Product> = products.iter().filter(|product| product.is_available()).collect();
        if available.is_empty() {
            return Ok(RemoteScoringResponse {
                status: RemoteStatus::Success,
                recommendations: Vec::new(),
                message: Some("No products available".to_string()),
                count: Some(0),
            });
        }

        let signals = request.signals();
        let ranked = self.scorer.rank(available, &signals, REMOTE_RESULT_LIMIT);
        let recommendations: Vec<RemoteRecommendation> = ranked
            .into_iter()
            .map(|scored| {
                let product = scored.product;
                RemoteRecommendation {
                    emotional_explanation: self
                        .explainer
                        .generate(&product.name, request.emotional.as_deref()),
                    id: product.id.0,
                    price: format_price(product.price),
                    image_url: Some(product.image_url.unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string())),
                    affiliate_link: product.affiliate_link,
                    description: Some(product.description),
                    match_score: scored.score,
                    name: product.name,
                }
            })
            .collect();

        Ok(RemoteScoringResponse {
            status: RemoteStatus::Success,
            count: Some(recommendations.len()),
            recommendations,
            message: None,
        })
    }
}
