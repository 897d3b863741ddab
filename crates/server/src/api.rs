//! JSON and text routes.
//!
//! - `GET  /api/v1/questions`                     — the quiz
//! - `POST /api/v1/recommendations`               — answers in, gifts out
//! - `POST /api/v1/recommendations/more`          — unseen extra gifts
//! - `POST /api/v1/slugs`                         — shareable landing URL
//! - `GET  /presente-para/{slug}`                 — landing page data
//! - `GET  /sitemap.xml`, `GET /robots.txt`
//! - `POST /functions/v1/generate-recommendations` — catalog ranking function

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use presente_core::domain::product::GiftRecommendation;
use presente_core::domain::questions::{Question, QUESTIONS};
use presente_core::domain::quiz::{QuizAnswers, RecipientProfile, RecommendationRequest};
use presente_core::errors::{ApplicationError, DomainError, InterfaceError};
use presente_core::recommend::{
    RemoteScoringRequest, RemoteScoringResponse, ShowMore, Stage, StageAttempt,
};
use presente_core::seo::{robots_txt, SeoPage};
use presente_core::sitemap::LANDING_PREFIX;
use presente_core::slug::ProfileSlug;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    pub correlation_id: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn reject(error: ApplicationError, correlation_id: &str) -> ApiError {
    let mapped = error.into_interface(correlation_id);
    let (status, message) = match &mapped {
        InterfaceError::BadRequest { message, .. } => (StatusCode::BAD_REQUEST, message),
        InterfaceError::NotFound { message, .. } => (StatusCode::NOT_FOUND, message),
        InterfaceError::ServiceUnavailable { message, .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, message)
        }
        InterfaceError::Internal { message, .. } => (StatusCode::INTERNAL_SERVER_ERROR, message),
    };
    (
        status,
        Json(ErrorBody {
            error: mapped.user_message(),
            message: message.clone(),
            correlation_id: mapped.correlation_id().to_string(),
        }),
    )
}

fn correlation_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Deserialize)]
pub struct RecommendBody {
    pub answers: QuizAnswers,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub correlation_id: String,
    pub profile: RecipientProfile,
    pub source: Stage,
    pub recommendations: Vec<GiftRecommendation>,
    pub attempts: Vec<StageAttempt>,
    pub more: ShowMore,
}

#[derive(Debug, Deserialize)]
pub struct MoreBody {
    pub answers: QuizAnswers,
    #[serde(default)]
    pub shown_ids: Vec<String>,
    #[serde(default)]
    pub reloads: u8,
}

#[derive(Debug, Serialize)]
pub struct MoreResponse {
    pub correlation_id: String,
    pub recommendations: Vec<GiftRecommendation>,
    pub more: ShowMore,
    pub can_load_more: bool,
}

#[derive(Debug, Serialize)]
pub struct SlugResponse {
    pub slug: String,
    pub path: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct LandingResponse {
    pub correlation_id: String,
    pub page: SeoPage,
    pub source: Stage,
    pub recommendations: Vec<GiftRecommendation>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/questions", get(list_questions))
        .route("/api/v1/recommendations", post(recommend))
        .route("/api/v1/recommendations/more", post(recommend_more))
        .route("/api/v1/slugs", post(encode_slug))
        .route("/presente-para/{slug}", get(landing_page))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/robots.txt", get(robots))
        .route("/functions/v1/generate-recommendations", post(generate_recommendations))
        .with_state(state)
}

async fn list_questions() -> Json<&'static [Question]> {
    Json(QUESTIONS)
}

fn checked_request(answers: &QuizAnswers, correlation_id: &str) -> Result<RecommendationRequest, ApiError> {
    let answers = answers
        .resolved()
        .map_err(|error| reject(DomainError::from(error).into(), correlation_id))?;
    Ok(RecommendationRequest::from_answers(&answers))
}

pub async fn recommend(
    State(state): State<AppState>,
    Json(body): Json<RecommendBody>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let correlation_id = correlation_id();
    let request = checked_request(&body.answers, &correlation_id)?;

    let selection = state.selector.recommend(&request).await;
    info!(
        event_name = "api.recommendations.served",
        correlation_id = %correlation_id,
        source = %selection.source,
        count = selection.recommendations.len(),
        "recommendations served"
    );

    Ok(Json(RecommendResponse {
        more: ShowMore::new(&selection.recommendations),
        correlation_id,
        profile: request.profile,
        source: selection.source,
        recommendations: selection.recommendations,
        attempts: selection.attempts,
    }))
}

pub async fn recommend_more(
    State(state): State<AppState>,
    Json(body): Json<MoreBody>,
) -> Result<Json<MoreResponse>, ApiError> {
    let correlation_id = correlation_id();
    let request = checked_request(&body.answers, &correlation_id)?;

    let mut more = ShowMore::resume(body.shown_ids, body.reloads);
    let added = more.load_more(&state.selector, &request).await.map_err(|error| {
        reject(DomainError::InvariantViolation(error.to_string()).into(), &correlation_id)
    })?;
    info!(
        event_name = "api.recommendations.more",
        correlation_id = %correlation_id,
        added = added.len(),
        reloads = more.reloads(),
        "extra recommendations served"
    );

    Ok(Json(MoreResponse {
        correlation_id,
        recommendations: added,
        can_load_more: more.can_load_more(),
        more,
    }))
}

pub async fn encode_slug(
    State(state): State<AppState>,
    Json(profile): Json<ProfileSlug>,
) -> Result<Json<SlugResponse>, ApiError> {
    let slug = state.slugs.encode(&profile);
    if slug.is_empty() {
        let correlation_id = correlation_id();
        warn!(
            event_name = "api.slug.unmapped",
            correlation_id = %correlation_id,
            relationship = %profile.relationship,
            "relationship has no slug token"
        );
        return Err(reject(DomainError::MissingField("relationship").into(), &correlation_id));
    }

    let path = format!("{LANDING_PREFIX}{slug}");
    let url = state
        .site_url
        .join(&path)
        .map(String::from)
        .unwrap_or_else(|_| format!("{}{}", state.site_url.as_str().trim_end_matches('/'), path));
    Ok(Json(SlugResponse { slug, path, url }))
}

pub async fn landing_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<LandingResponse>, ApiError> {
    let correlation_id = correlation_id();
    let profile = state.slugs.decode(&slug).map_err(|error| {
        info!(
            event_name = "api.landing.not_found",
            correlation_id = %correlation_id,
            slug = %slug,
            "unknown landing slug"
        );
        reject(DomainError::from(error).into(), &correlation_id)
    })?;

    let page = SeoPage::for_profile(&profile, &slug, &state.site_url);
    let request = RecommendationRequest::new(profile.into_recipient_profile());
    let selection = state.selector.recommend(&request).await;

    Ok(Json(LandingResponse {
        correlation_id,
        page,
        source: selection.source,
        recommendations: selection.recommendations,
    }))
}

pub async fn sitemap_xml(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let xml = state.sitemap.render_xml(&state.site_url, today).map_err(|error| {
        let correlation_id = correlation_id();
        error!(
            event_name = "api.sitemap.failed",
            correlation_id = %correlation_id,
            error = %error,
            "sitemap rendering failed"
        );
        reject(ApplicationError::Configuration(error.to_string()), &correlation_id)
    })?;
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}

pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], robots_txt(&state.site_url))
}

pub async fn generate_recommendations(
    State(state): State<AppState>,
    Json(request): Json<RemoteScoringRequest>,
) -> (StatusCode, Json<RemoteScoringResponse>) {
    let products = match state.catalog.active_products().await {
        Ok(products) => products,
        Err(error) => {
            error!(event_name = "ranking.catalog.failed", error = %error, "catalog unavailable");
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(RemoteScoringResponse::error("Database error")));
        }
    };

    match state.ranking.rank(&products, &request) {
        Ok(response) => {
            info!(
                event_name = "ranking.completed",
                candidates = products.len(),
                count = response.recommendations.len(),
                "catalog ranked"
            );
            (StatusCode::OK, Json(response))
        }
        Err(error) => (StatusCode::BAD_REQUEST, Json(RemoteScoringResponse::error(error.to_string()))),
    }
}
