use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ORACLE_URL: &str = "https://api.perplexity.ai/chat/completions";
pub const DEFAULT_SITE_URL: &str = "https://presentecerto.com.br";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub oracle: OracleConfig,
    pub supabase: SupabaseConfig,
    pub catalog: CatalogConfig,
    pub site: SiteConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct OracleConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
}

#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<SecretString>,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct SiteConfig {
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub oracle_api_key: Option<String>,
    pub oracle_model: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub site_base_url: Option<String>,
    pub server_port: Option<u16>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            oracle: OracleConfig {
                api_key: None,
                base_url: DEFAULT_ORACLE_URL.to_string(),
                model: "sonar".to_string(),
                timeout_secs: 20,
                max_tokens: 1000,
                temperature: 0.7,
                top_p: 0.9,
            },
            supabase: SupabaseConfig { url: None, anon_key: None, timeout_secs: 15 },
            catalog: CatalogConfig::default(),
            site: SiteConfig { base_url: DEFAULT_SITE_URL.to_string() },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl OracleConfig {
    /// The AI stage only runs when a non-blank credential is present.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_ref().map(|key| !key.expose_secret().trim().is_empty()).unwrap_or(false)
    }
}

impl SupabaseConfig {
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.anon_key.is_some()
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("presente.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(oracle) = patch.oracle {
            if let Some(oracle_api_key_value) = oracle.api_key {
                self.oracle.api_key = Some(secret_value(oracle_api_key_value));
            }
            if let Some(base_url) = oracle.base_url {
                self.oracle.base_url = base_url;
            }
            if let Some(model) = oracle.model {
                self.oracle.model = model;
            }
            if let Some(timeout_secs) = oracle.timeout_secs {
                self.oracle.timeout_secs = timeout_secs;
            }
            if let Some(max_tokens) = oracle.max_tokens {
                self.oracle.max_tokens = max_tokens;
            }
            if let Some(temperature) = oracle.temperature {
                self.oracle.temperature = temperature;
            }
            if let Some(top_p) = oracle.top_p {
                self.oracle.top_p = top_p;
            }
        }

        if let Some(supabase) = patch.supabase {
            if let Some(url) = supabase.url {
                self.supabase.url = Some(url);
            }
            if let Some(anon_key_value) = supabase.anon_key {
                self.supabase.anon_key = Some(secret_value(anon_key_value));
            }
            if let Some(timeout_secs) = supabase.timeout_secs {
                self.supabase.timeout_secs = timeout_secs;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(path);
            }
        }

        if let Some(site) = patch.site {
            if let Some(base_url) = site.base_url {
                self.site.base_url = base_url;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let oracle_key = read_env("PRESENTE_ORACLE_API_KEY").or_else(|| read_env("PERPLEXITY_API_KEY"));
        if let Some(value) = oracle_key {
            self.oracle.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("PRESENTE_ORACLE_BASE_URL") {
            self.oracle.base_url = value;
        }
        if let Some(value) = read_env("PRESENTE_ORACLE_MODEL") {
            self.oracle.model = value;
        }
        if let Some(value) = read_env("PRESENTE_ORACLE_TIMEOUT_SECS") {
            self.oracle.timeout_secs = parse_u64("PRESENTE_ORACLE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("PRESENTE_ORACLE_MAX_TOKENS") {
            self.oracle.max_tokens = parse_u32("PRESENTE_ORACLE_MAX_TOKENS", &value)?;
        }

        if let Some(value) = read_env("PRESENTE_SUPABASE_URL") {
            self.supabase.url = Some(value);
        }
        if let Some(value) = read_env("PRESENTE_SUPABASE_ANON_KEY") {
            self.supabase.anon_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("PRESENTE_SUPABASE_TIMEOUT_SECS") {
            self.supabase.timeout_secs = parse_u64("PRESENTE_SUPABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("PRESENTE_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("PRESENTE_SITE_BASE_URL") {
            self.site.base_url = value;
        }

        if let Some(value) = read_env("PRESENTE_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("PRESENTE_SERVER_PORT") {
            self.server.port = parse_u16("PRESENTE_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("PRESENTE_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("PRESENTE_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level =
            read_env("PRESENTE_LOGGING_LEVEL").or_else(|| read_env("PRESENTE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PRESENTE_LOGGING_FORMAT").or_else(|| read_env("PRESENTE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(oracle_api_key) = overrides.oracle_api_key {
            self.oracle.api_key = Some(secret_value(oracle_api_key));
        }
        if let Some(oracle_model) = overrides.oracle_model {
            self.oracle.model = oracle_model;
        }
        if let Some(supabase_url) = overrides.supabase_url {
            self.supabase.url = Some(supabase_url);
        }
        if let Some(supabase_anon_key) = overrides.supabase_anon_key {
            self.supabase.anon_key = Some(secret_value(supabase_anon_key));
        }
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = Some(catalog_path);
        }
        if let Some(site_base_url) = overrides.site_base_url {
            self.site.base_url = site_base_url;
        }
        if let Some(server_port) = overrides.server_port {
            self.server.port = server_port;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_oracle(&self.oracle)?;
        validate_supabase(&self.supabase)?;
        validate_site(&self.site)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("presente.toml"), PathBuf::from("config/presente.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    match url::Url::parse(value.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::Validation(format!("{field} must be an http:// or https:// URL"))),
    }
}

fn validate_oracle(oracle: &OracleConfig) -> Result<(), ConfigError> {
    if oracle.timeout_secs == 0 || oracle.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "oracle.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if oracle.model.trim().is_empty() {
        return Err(ConfigError::Validation("oracle.model must not be empty".to_string()));
    }

    if oracle.max_tokens == 0 {
        return Err(ConfigError::Validation(
            "oracle.max_tokens must be greater than zero".to_string(),
        ));
    }

    if !(0.0..=2.0).contains(&oracle.temperature) {
        return Err(ConfigError::Validation(
            "oracle.temperature must be in range 0.0..=2.0".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&oracle.top_p) || oracle.top_p == 0.0 {
        return Err(ConfigError::Validation("oracle.top_p must be in range (0.0, 1.0]".to_string()));
    }

    validate_http_url("oracle.base_url", &oracle.base_url)
}

fn validate_supabase(supabase: &SupabaseConfig) -> Result<(), ConfigError> {
    match (&supabase.url, &supabase.anon_key) {
        (Some(url), Some(_)) => validate_http_url("supabase.url", url)?,
        (None, None) => {}
        (Some(_), None) => {
            return Err(ConfigError::Validation(
                "supabase.anon_key is required when supabase.url is set".to_string(),
            ))
        }
        (None, Some(_)) => {
            return Err(ConfigError::Validation(
                "supabase.url is required when supabase.anon_key is set".to_string(),
            ))
        }
    }

    if supabase.timeout_secs == 0 || supabase.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "supabase.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_site(site: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("site.base_url", &site.base_url)
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    oracle: Option<OraclePatch>,
    supabase: Option<SupabasePatch>,
    catalog: Option<CatalogPatch>,
    site: Option<SitePatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct OraclePatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    top_p: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct SupabasePatch {
    url: Option<String>,
    anon_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct SitePatch {
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
