use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use presente_core::recommend::RecommendationStrategy;
use serde::Serialize;

use crate::state::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub oracle: HealthCheck,
    pub remote_scoring: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

/// Only the catalog can degrade the service; the AI and remote tiers are
/// optional and the local fallback always answers.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = match state.catalog.active_products().await {
        Ok(products) => HealthCheck {
            status: "ready",
            detail: format!("{} active products", products.len()),
        },
        Err(error) => HealthCheck { status: "degraded", detail: error.to_string() },
    };
    let ready = catalog.status == "ready";

    let ai = state.ai.status();
    let oracle = match ai.model {
        Some(model) if ai.configured => {
            HealthCheck { status: "ready", detail: format!("model {model}") }
        }
        _ => HealthCheck { status: "disabled", detail: "no oracle api key".to_string() },
    };
    let remote_scoring = if state.remote.is_enabled() {
        HealthCheck { status: "ready", detail: "generate-recommendations configured".to_string() }
    } else {
        HealthCheck { status: "disabled", detail: "supabase not configured".to_string() }
    };

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: format!("presente-server serving stages {:?}", state.selector.stages()),
        },
        catalog,
        oracle,
        remote_scoring,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}
