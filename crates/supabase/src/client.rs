use std::time::Duration;

use presente_core::config::SupabaseConfig;
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::SupabaseError;

pub const PRODUCTS_PATH: &str = "rest/v1/products";
pub const SCORING_FUNCTION_PATH: &str = "functions/v1/generate-recommendations";

/// Shared HTTP plumbing for the project: base URL, anon key and timeout.
#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base: Url,
    anon_key: SecretString,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient").field("base", &self.base.as_str()).finish_non_exhaustive()
    }
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: SecretString, timeout: Duration) -> Result<Self, SupabaseError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base = Url::parse(&normalized)
            .map_err(|source| SupabaseError::InvalidUrl { url: base_url.to_string(), source })?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base, anon_key })
    }

    /// `None` unless both the project url and the anon key are set.
    pub fn from_config(config: &SupabaseConfig) -> Result<Option<Self>, SupabaseError> {
        match (&config.url, &config.anon_key) {
            (Some(url), Some(key)) => {
                Self::new(url, key.clone(), Duration::from_secs(config.timeout_secs)).map(Some)
            }
            _ => Ok(None),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, SupabaseError> {
        self.base
            .join(path)
            .map_err(|source| SupabaseError::InvalidUrl { url: path.to_string(), source })
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.authorize(self.http.get(url))
    }

    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        self.authorize(self.http.post(url))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let key = self.anon_key.expose_secret();
        builder.bearer_auth(key).header("apikey", key)
    }
}

#[cfg(test)]
mod tests {
    use presente_core::config::SupabaseConfig;
    use secrecy::SecretString;

    use super::{SupabaseClient, PRODUCTS_PATH, SCORING_FUNCTION_PATH};

    fn config(url: Option<&str>, key: Option<&str>) -> SupabaseConfig {
        SupabaseConfig {
            url: url.map(str::to_string),
            anon_key: key.map(|key| SecretString::from(key.to_string())),
            timeout_secs: 10,
        }
    }

    #[test]
    fn needs_both_url_and_key() {
        assert!(SupabaseClient::from_config(&config(None, Some("anon"))).expect("config").is_none());
        assert!(SupabaseClient::from_config(&config(Some("https://x.supabase.co"), None))
            .expect("config")
            .is_none());
    }

    #[test]
    fn endpoints_are_joined_under_the_project_url() {
        let client = SupabaseClient::from_config(&config(Some("https://abc.supabase.co"), Some("anon")))
            .expect("config")
            .expect("configured");

        assert_eq!(
            client.endpoint(PRODUCTS_PATH).expect("url").as_str(),
            "https://abc.supabase.co/rest/v1/products"
        );
        assert_eq!(
            client.endpoint(SCORING_FUNCTION_PATH).expect("url").as_str(),
            "https://abc.supabase.co/functions/v1/generate-recommendations"
        );
        assert!(!format!("{client:?}").contains("anon"));
    }
}
