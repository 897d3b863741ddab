use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use presente_core::config::{AppConfig, LoadOptions};
use secrecy::{ExposeSecret, SecretString};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

pub fn run() -> CommandResult {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => CommandResult::raw(render(&config)),
        Err(error) => CommandResult::failure("config", "config_validation", error.to_string(), EXIT_CONFIG),
    }
}

pub fn render(config: &AppConfig) -> String {
    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    let mut push = |key: &str, value: String, env_keys: &[&str]| {
        let source =
            field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(format!("- {key} = {value} (source: {source})"));
    };

    push("oracle.api_key", redact(config.oracle.api_key.as_ref()), &["PRESENTE_ORACLE_API_KEY", "PERPLEXITY_API_KEY"]);
    push("oracle.base_url", config.oracle.base_url.clone(), &["PRESENTE_ORACLE_BASE_URL"]);
    push("oracle.model", config.oracle.model.clone(), &["PRESENTE_ORACLE_MODEL"]);
    push("oracle.timeout_secs", config.oracle.timeout_secs.to_string(), &["PRESENTE_ORACLE_TIMEOUT_SECS"]);
    push("oracle.max_tokens", config.oracle.max_tokens.to_string(), &["PRESENTE_ORACLE_MAX_TOKENS"]);
    push("supabase.url", unset_or(config.supabase.url.clone()), &["PRESENTE_SUPABASE_URL"]);
    push("supabase.anon_key", redact(config.supabase.anon_key.as_ref()), &["PRESENTE_SUPABASE_ANON_KEY"]);
    push("supabase.timeout_secs", config.supabase.timeout_secs.to_string(), &["PRESENTE_SUPABASE_TIMEOUT_SECS"]);
    push(
        "catalog.path",
        unset_or(config.catalog.path.as_ref().map(|path| path.display().to_string())),
        &["PRESENTE_CATALOG_PATH"],
    );
    push("site.base_url", config.site.base_url.clone(), &["PRESENTE_SITE_BASE_URL"]);
    push("server.bind_address", config.server.bind_address.clone(), &["PRESENTE_SERVER_BIND_ADDRESS"]);
    push("server.port", config.server.port.to_string(), &["PRESENTE_SERVER_PORT"]);
    push(
        "server.graceful_shutdown_secs",
        config.server.graceful_shutdown_secs.to_string(),
        &["PRESENTE_SERVER_GRACEFUL_SHUTDOWN_SECS"],
    );
    push("logging.level", config.logging.level.clone(), &["PRESENTE_LOGGING_LEVEL", "PRESENTE_LOG_LEVEL"]);
    push(
        "logging.format",
        format!("{:?}", config.logging.format),
        &["PRESENTE_LOGGING_FORMAT", "PRESENTE_LOG_FORMAT"],
    );

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("presente.toml"), PathBuf::from("config/presente.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn unset_or(value: Option<String>) -> String {
    value.unwrap_or_else(|| "<unset>".to_string())
}

/// Keeps a key's vendor prefix (`pplx-`, `eyJ`) so operators can tell which
/// credential is loaded.
fn redact(secret: Option<&SecretString>) -> String {
    let Some(secret) = secret else {
        return "<unset>".to_string();
    };
    let trimmed = secret.expose_secret().trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }
    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }
    if trimmed.len() > 8 && trimmed.is_char_boundary(3) {
        return format!("{}***", &trimmed[..3]);
    }
    "<redacted>".to_string()
}
