use async_trait::async_trait;
use presente_core::domain::product::GiftRecommendation;
use presente_core::domain::quiz::RecommendationRequest;
use presente_core::recommend::{
    RecommendationStrategy, RemoteScoringRequest, RemoteScoringResponse, RemoteStatus, Stage,
    StrategyError,
};
use tracing::debug;

use crate::client::{SupabaseClient, SCORING_FUNCTION_PATH};

/// Second tier: the hosted `generate-recommendations` function. Its list is
/// used as-is.
#[derive(Clone, Debug)]
pub struct RemoteScoringStrategy {
    client: Option<SupabaseClient>,
}

impl RemoteScoringStrategy {
    pub fn new(client: Option<SupabaseClient>) -> Self {
        Self { client }
    }

    pub async fn fetch(
        &self,
        payload: &RemoteScoringRequest,
    ) -> Result<RemoteScoringResponse, StrategyError> {
        let client = self.client.as_ref().ok_or(StrategyError::NotConfigured)?;
        let url = client
            .endpoint(SCORING_FUNCTION_PATH)
            .map_err(|error| StrategyError::Unavailable(error.to_string()))?;

        let response = client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|error| StrategyError::Unavailable(error.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(StrategyError::Unavailable(format!("HTTP error! status: {}", status.as_u16())));
        }

        response
            .json::<RemoteScoringResponse>()
            .await
            .map_err(|error| StrategyError::Malformed(error.to_string()))
    }
}

#[async_trait]
impl RecommendationStrategy for RemoteScoringStrategy {
    fn stage(&self) -> Stage {
        Stage::TryRemoteScoring
    }

    fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    async fn attempt(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<GiftRecommendation>, StrategyError> {
        let response = self.fetch(&RemoteScoringRequest::from(request)).await?;
        if response.status == RemoteStatus::Error {
            let message = response.message.unwrap_or_else(|| "remote scoring failed".to_string());
            return Err(StrategyError::Rejected(message));
        }

        debug!(
            event_name = "remote_scoring.response.received",
            count = response.recommendations.len(),
            "remote scoring answered"
        );
        Ok(response.recommendations.into_iter().map(GiftRecommendation::from).collect())
    }
}
