use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{LocalFallbackStrategy, RecommendationStrategy, Stage, MAX_RECOMMENDATIONS};
use crate::domain::product::GiftRecommendation;
use crate::domain::quiz::RecommendationRequest;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Skipped,
    Failed { reason: String },
    Empty,
    /// Accepted, but short enough that later stages were asked to top it up.
    Partial { count: usize },
    Selected { count: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageAttempt {
    pub stage: Stage,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub recommendations: Vec<GiftRecommendation>,
    /// Stage that contributed the first results, or `Done` if nothing did.
    pub source: Stage,
    pub attempts: Vec<StageAttempt>,
}

/// Runs strategies in stage order until one yields a usable result.
#[derive(Clone)]
pub struct RecommendationSelector {
    strategies: Vec<Arc<dyn RecommendationStrategy>>,
}

impl std::fmt::Debug for RecommendationSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stages: Vec<Stage> = self.strategies.iter().map(|strategy| strategy.stage()).collect();
        f.debug_struct("RecommendationSelector").field("stages", &stages).finish()
    }
}

impl RecommendationSelector {
    /// Every chain ends with the local fallback.
    pub fn new(local: LocalFallbackStrategy) -> Self {
        Self { strategies: vec![Arc::new(local)] }
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn RecommendationStrategy>) -> Self {
        self.strategies.push(strategy);
        self.strategies.sort_by_key(|strategy| strategy.stage());
        self
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.strategies.iter().map(|strategy| strategy.stage()).collect()
    }

    pub async fn recommend(&self, request: &RecommendationRequest) -> Selection {
        let mut merged: Vec<GiftRecommendation> = Vec::new();
        let mut source = Stage::Done;
        let mut attempts = Vec::with_capacity(self.strategies.len());
        // Set once a stage comes back short; later stages keep topping up
        // until the merged list reaches it.
        let mut backfill_to: Option<usize> = None;

        for strategy in &self.strategies {
            let stage = strategy.stage();

            if !strategy.is_enabled() {
                debug!(event_name = "recommend.stage.skipped", stage = %stage, "stage disabled");
                attempts.push(StageAttempt { stage, outcome: AttemptOutcome::Skipped });
                continue;
            }

            let mut found = match strategy.attempt(request).await {
                Ok(found) => found,
                Err(error) => {
                    warn!(
                        event_name = "recommend.stage.failed",
                        stage = %stage,
                        error = %error,
                        "stage failed, falling through"
                    );
                    attempts.push(StageAttempt {
                        stage,
                        outcome: AttemptOutcome::Failed { reason: error.to_string() },
                    });
                    continue;
                }
            };

            if found.is_empty() {
                debug!(
                    event_name = "recommend.stage.empty",
                    stage = %stage,
                    "stage returned nothing"
                );
                attempts.push(StageAttempt { stage, outcome: AttemptOutcome::Empty });
                continue;
            }

            let count = if merged.is_empty() {
                source = stage;
                found.truncate(MAX_RECOMMENDATIONS);
                merged = found;
                merged.len()
            } else {
                merge_unique_by_name(&mut merged, found, MAX_RECOMMENDATIONS)
            };

            if let Some(minimum) = strategy.backfill_below() {
                if merged.len() < minimum {
                    backfill_to = Some(backfill_to.map_or(minimum, |current| current.max(minimum)));
                }
            }

            if backfill_to.is_some_and(|minimum| merged.len() < minimum) {
                debug!(
                    event_name = "recommend.stage.partial",
                    stage = %stage,
                    count = merged.len(),
                    "topping up from later stages"
                );
                attempts.push(StageAttempt { stage, outcome: AttemptOutcome::Partial { count } });
                continue;
            }

            info!(event_name = "recommend.stage.selected", stage = %stage, count, "stage accepted");
            attempts.push(StageAttempt { stage, outcome: AttemptOutcome::Selected { count } });
            break;
        }

        info!(
            event_name = "recommend.selection.completed",
            source = %source,
            count = merged.len(),
            "recommendations selected"
        );

        Selection { recommendations: merged, source, attempts }
    }
}

/// Appends items whose names are not yet present, up to `limit`. Returns how
/// many were added.
fn merge_unique_by_name(
    merged: &mut Vec<GiftRecommendation>,
    incoming: Vec<GiftRecommendation>,
    limit: usize,
) -> usize {
    let before = merged.len();
    for item in incoming {
        if merged.len() >= limit {
            break;
        }
        if merged.iter().any(|existing| existing.name == item.name) {
            continue;
        }
        merged.push(item);
    }
    merged.len() - before
}
