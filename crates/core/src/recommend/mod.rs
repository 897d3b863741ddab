//! Recommendation selection: an ordered list of strategies tried until one
//! produces results.

mod candidates;
mod local;
mod more;
mod ranking;
mod selector;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::product::GiftRecommendation;
use crate::domain::quiz::RecommendationRequest;

pub use candidates::{match_by_name, select_candidates};
pub use local::{LocalFallbackStrategy, LocalItem};
pub use more::{ShowMore, ShowMoreError, MAX_EXTRA_RELOADS};
pub use ranking::{
    CatalogRanking, RemoteRecommendation, RemoteScoringRequest, RemoteScoringResponse,
    RemoteStatus,
};
pub use selector::{AttemptOutcome, RecommendationSelector, Selection, StageAttempt};

/// Results below this count from the AI stage are topped up from later stages.
pub const MIN_RECOMMENDATIONS: usize = 3;
pub const MAX_RECOMMENDATIONS: usize = 5;
/// Catalog entries offered to the oracle per request.
pub const MAX_AI_CANDIDATES: usize = 15;
/// Items the remote scorer and catalog ranking service return.
pub const REMOTE_RESULT_LIMIT: usize = 5;
/// Items the local fallback returns.
pub const LOCAL_RESULT_LIMIT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    TryAi,
    TryRemoteScoring,
    UseLocalFallback,
    Done,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TryAi => "try_ai",
            Self::TryRemoteScoring => "try_remote_scoring",
            Self::UseLocalFallback => "use_local_fallback",
            Self::Done => "done",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::TryAi => Self::TryRemoteScoring,
            Self::TryRemoteScoring => Self::UseLocalFallback,
            Self::UseLocalFallback | Self::Done => Self::Done,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StrategyError {
    #[error("strategy is not configured")]
    NotConfigured,
    #[error("no catalog products qualified")]
    NoCandidates,
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    #[error("upstream returned a malformed response: {0}")]
    Malformed(String),
    #[error("upstream rejected the request: {0}")]
    Rejected(String),
}

/// One tier of the fallback chain.
#[async_trait]
pub trait RecommendationStrategy: Send + Sync {
    fn stage(&self) -> Stage;

    /// Disabled strategies are skipped without being attempted.
    fn is_enabled(&self) -> bool {
        true
    }

    /// When set, a non-empty result shorter than this keeps the chain going
    /// so later stages can top it up.
    fn backfill_below(&self) -> Option<usize> {
        None
    }

    async fn attempt(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<GiftRecommendation>, StrategyError>;
}
