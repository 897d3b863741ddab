use std::sync::Arc;

use presente_agent::{ChatCompletionsClient, LlmClient};
use presente_core::catalog::{CatalogError, ProductCatalog, StaticCatalog};
use presente_core::config::{AppConfig, ConfigError, LoadOptions};
use presente_core::explanation::ExplanationGenerator;
use presente_core::scoring::ProductScorer;
use presente_supabase::{SupabaseCatalog, SupabaseClient, SupabaseError};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::state::{AppState, StateParts};

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog could not be loaded: {0}")]
    Catalog(#[from] CatalogError),
    #[error("supabase client could not be built: {0}")]
    Supabase(#[from] SupabaseError),
    #[error("oracle client could not be built: {0:#}")]
    Oracle(#[source] anyhow::Error),
    #[error("site.base_url `{url}` is not a valid URL: {source}")]
    SiteUrl { url: String, source: url::ParseError },
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", correlation_id = "bootstrap", "starting bootstrap");

    let site_url = Url::parse(&config.site.base_url).map_err(|source| BootstrapError::SiteUrl {
        url: config.site.base_url.clone(),
        source,
    })?;

    let supabase = SupabaseClient::from_config(&config.supabase)?;
    let catalog = select_catalog(&config, supabase.as_ref())?;

    let oracle = ChatCompletionsClient::from_config(&config.oracle)
        .map_err(BootstrapError::Oracle)?
        .map(|client| Arc::new(client) as Arc<dyn LlmClient>);

    let state = AppState::new(StateParts {
        catalog,
        oracle,
        supabase,
        scorer: ProductScorer::default(),
        explainer: ExplanationGenerator::default(),
        site_url,
    });
    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        stages = ?state.selector.stages(),
        "recommendation chain wired"
    );

    Ok(Application { config, state })
}

/// Hosted table first, then a local JSON export, then nothing.
fn select_catalog(
    config: &AppConfig,
    supabase: Option<&SupabaseClient>,
) -> Result<Arc<dyn ProductCatalog>, BootstrapError> {
    if let Some(client) = supabase {
        info!(
            event_name = "system.bootstrap.catalog",
            source = "supabase",
            base_url = %client.base_url(),
            "using hosted catalog"
        );
        return Ok(Arc::new(SupabaseCatalog::new(client.clone())));
    }

    if let Some(path) = &config.catalog.path {
        let catalog = StaticCatalog::from_json_file(path)?;
        info!(
            event_name = "system.bootstrap.catalog",
            source = "file",
            path = %path.display(),
            products = catalog.len(),
            "using catalog file"
        );
        return Ok(Arc::new(catalog));
    }

    info!(event_name = "system.bootstrap.catalog", source = "empty", "no catalog configured");
    Ok(Arc::new(StaticCatalog::empty()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use presente_core::config::{ConfigOverrides, LoadOptions};
    use presente_core::recommend::Stage;

    use crate::bootstrap::{bootstrap, BootstrapError};

    fn options(overrides: ConfigOverrides) -> LoadOptions {
        LoadOptions {
            config_path: Some("/nonexistent/presente.toml".into()),
            require_file: false,
            overrides,
        }
    }

    #[tokio::test]
    async fn bare_config_wires_local_fallback_only_behind_disabled_tiers() {
        let app = bootstrap(options(ConfigOverrides::default())).await.expect("bootstrap");

        assert!(!app.state.ai.status().configured);
        assert_eq!(
            app.state.selector.stages(),
            vec![Stage::TryAi, Stage::TryRemoteScoring, Stage::UseLocalFallback]
        );
        let products = app.state.catalog.active_products().await.expect("empty catalog");
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn catalog_file_is_loaded_when_supabase_is_absent() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[{{"id": "p1", "name": "Caneca Azul", "price_brl": 39.90, "is_active": true}}]"#
        )
        .expect("write catalog");

        let app = bootstrap(options(ConfigOverrides {
            catalog_path: Some(file.path().to_path_buf()),
            ..ConfigOverrides::default()
        }))
        .await
        .expect("bootstrap");

        let products = app.state.catalog.active_products().await.expect("catalog");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Caneca Azul");
    }

    #[tokio::test]
    async fn unreadable_catalog_file_fails_fast() {
        let result = bootstrap(options(ConfigOverrides {
            catalog_path: Some("/nonexistent/catalog.json".into()),
            ..ConfigOverrides::default()
        }))
        .await;

        assert!(matches!(result, Err(BootstrapError::Catalog(_))));
    }

    #[tokio::test]
    async fn oracle_key_enables_ai_stage() {
        let app = bootstrap(options(ConfigOverrides {
            oracle_api_key: Some("pplx-test".to_string()),
            oracle_model: Some("sonar-pro".to_string()),
            ..ConfigOverrides::default()
        }))
        .await
        .expect("bootstrap");

        let status = app.state.ai.status();
        assert!(status.configured);
        assert_eq!(status.model.as_deref(), Some("sonar-pro"));
    }
}
