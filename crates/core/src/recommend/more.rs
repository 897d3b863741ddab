use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::RecommendationSelector;
use crate::domain::product::GiftRecommendation;
use crate::domain::quiz::RecommendationRequest;

pub const MAX_EXTRA_RELOADS: u8 = 2;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ShowMoreError {
    #[error("reload limit of {limit} reached")]
    LimitReached { limit: u8 },
}

/// "Show more" bookkeeping: re-runs selection and keeps only items whose ids
/// have not been shown yet, at most twice per result page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowMore {
    shown_ids: Vec<String>,
    reloads: u8,
}

impl ShowMore {
    pub fn new(initial: &[GiftRecommendation]) -> Self {
        Self { shown_ids: initial.iter().map(|item| item.id.clone()).collect(), reloads: 0 }
    }

    /// Rebuilds state carried by a stateless client between requests.
    pub fn resume(shown_ids: Vec<String>, reloads: u8) -> Self {
        Self { shown_ids, reloads }
    }

    pub fn reloads(&self) -> u8 {
        self.reloads
    }

    pub fn shown_ids(&self) -> &[String] {
        &self.shown_ids
    }

    pub fn can_load_more(&self) -> bool {
        self.reloads < MAX_EXTRA_RELOADS
    }

    /// Counts one reload and returns the unseen part of `fresh`.
    pub fn absorb(
        &mut self,
        fresh: Vec<GiftRecommendation>,
    ) -> Result<Vec<GiftRecommendation>, ShowMoreError> {
        if !self.can_load_more() {
            return Err(ShowMoreError::LimitReached { limit: MAX_EXTRA_RELOADS });
        }
        self.reloads += 1;

        let mut added = Vec::new();
        for item in fresh {
            if self.shown_ids.iter().any(|id| *id == item.id) {
                continue;
            }
            self.shown_ids.push(item.id.clone());
            added.push(item);
        }
        Ok(added)
    }

    pub async fn load_more(
        &mut self,
        selector: &RecommendationSelector,
        request: &RecommendationRequest,
    ) -> Result<Vec<GiftRecommendation>, ShowMoreError> {
        if !self.can_load_more() {
            return Err(ShowMoreError::LimitReached { limit: MAX_EXTRA_RELOADS });
        }
        let selection = selector.recommend(request).await;
        self.absorb(selection.recommendations)
    }
}
