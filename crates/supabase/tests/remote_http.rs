use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use presente_core::catalog::{CatalogError, ProductCatalog};
use presente_core::domain::product::Product;
use presente_core::domain::quiz::{RecipientProfile, RecommendationRequest};
use presente_core::recommend::{
    CatalogRanking, RecommendationStrategy, RemoteScoringRequest, StrategyError,
};
use presente_supabase::{RemoteScoringStrategy, SupabaseCatalog, SupabaseClient};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{json, Value};

fn products() -> Vec<Product> {
    let mut mug = Product::new("p1", "Caneca Azul", Decimal::new(3990, 2));
    mug.relationship_types = vec!["Mãe/Pai".to_string()];
    let mut vase = Product::new("p2", "Vaso de Suculentas", Decimal::new(5990, 2));
    vase.image_url = Some("https://http2.mlstatic.com/D_NQ_NP_vaso.webp".to_string());
    vec![mug, vase]
}

fn authorized(headers: &HeaderMap) -> bool {
    let bearer = headers.get("authorization").and_then(|value| value.to_str().ok());
    let apikey = headers.get("apikey").and_then(|value| value.to_str().ok());
    bearer == Some("Bearer anon-key") && apikey == Some("anon-key")
}

async fn list_products(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "no api key"})));
    }
    assert_eq!(query.get("select").map(String::as_str), Some("*"));
    assert_eq!(query.get("is_active").map(String::as_str), Some("eq.true"));
    let rows = serde_json::to_value(products()).unwrap_or(Value::Null);
    (StatusCode::OK, Json(rows))
}

async fn generate(headers: HeaderMap, Json(request): Json<RemoteScoringRequest>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "no api key"})));
    }
    match CatalogRanking::default().rank(&products(), &request) {
        Ok(response) => (StatusCode::OK, Json(serde_json::to_value(response).unwrap_or(Value::Null))),
        Err(error) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"status": "error", "message": error.to_string()})),
        ),
    }
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn client(addr: SocketAddr) -> SupabaseClient {
    SupabaseClient::new(
        &format!("http://{addr}"),
        SecretString::from("anon-key".to_string()),
        Duration::from_secs(5),
    )
    .expect("client")
}

fn request() -> RecommendationRequest {
    RecommendationRequest::new(RecipientProfile {
        relationship: "Mãe/Pai".to_string(),
        ..RecipientProfile::default()
    })
}

fn project() -> Router {
    Router::new()
        .route("/rest/v1/products", get(list_products))
        .route("/functions/v1/generate-recommendations", post(generate))
}

#[tokio::test]
async fn catalog_lists_active_products() {
    let addr = spawn(project()).await;
    let catalog = SupabaseCatalog::new(client(addr));

    let listed = catalog.active_products().await.expect("catalog");

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, "Caneca Azul");
    assert_eq!(listed[0].price, Decimal::new(3990, 2));
}

#[tokio::test]
async fn catalog_failure_is_unavailable() {
    let app = Router::new()
        .route("/rest/v1/products", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let addr = spawn(app).await;

    let error = SupabaseCatalog::new(client(addr)).active_products().await.expect_err("500");
    assert!(matches!(error, CatalogError::Unavailable(_)));
}

#[tokio::test]
async fn remote_scoring_returns_ranked_items() {
    let addr = spawn(project()).await;
    let strategy = RemoteScoringStrategy::new(Some(client(addr)));

    let picks = strategy.attempt(&request()).await.expect("remote scoring");

    assert_eq!(picks.len(), 2);
    assert_eq!(picks[0].name, "Caneca Azul");
    assert_eq!(picks[0].price, "R$ 39,90");
    assert_eq!(picks[0].category, "geral");
    assert_eq!(picks[1].image, "https://http2.mlstatic.com/D_NQ_NP_vaso.jpg");
}

#[tokio::test]
async fn error_status_is_rejected() {
    let app = Router::new().route(
        "/functions/v1/generate-recommendations",
        post(|| async { Json(json!({"status": "error", "message": "Database error"})) }),
    );
    let addr = spawn(app).await;
    let strategy = RemoteScoringStrategy::new(Some(client(addr)));

    let error = strategy.attempt(&request()).await.expect_err("error status");
    assert_eq!(error, StrategyError::Rejected("Database error".to_string()));
}

#[tokio::test]
async fn non_success_http_is_unavailable() {
    let app = Router::new().route(
        "/functions/v1/generate-recommendations",
        post(|| async { StatusCode::BAD_GATEWAY }),
    );
    let addr = spawn(app).await;
    let strategy = RemoteScoringStrategy::new(Some(client(addr)));

    let error = strategy.attempt(&request()).await.expect_err("502");
    assert_eq!(error, StrategyError::Unavailable("HTTP error! status: 502".to_string()));
}

#[tokio::test]
async fn unconfigured_strategy_is_disabled() {
    let strategy = RemoteScoringStrategy::new(None);
    assert!(!strategy.is_enabled());
    assert_eq!(strategy.attempt(&request()).await, Err(StrategyError::NotConfigured));
}
