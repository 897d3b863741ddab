use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use presente_core::config::OracleConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::llm::{ChatMessage, ChatPrompt, LlmClient};

/// OpenAI-compatible `chat/completions` client. Perplexity by default.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
    model: String,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

impl ChatCompletionsClient {
    /// `None` when no credential is configured; the AI stage stays off.
    pub fn from_config(config: &OracleConfig) -> Result<Option<Self>> {
        if !config.is_configured() {
            return Ok(None);
        }
        let api_key = config.api_key.clone().ok_or_else(|| anyhow!("oracle api key missing"))?;
        let endpoint = Url::parse(&config.base_url)
            .with_context(|| format!("invalid oracle endpoint `{}`", config.base_url))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build oracle http client")?;

        Ok(Some(Self {
            http,
            endpoint,
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        }))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &ChatPrompt) -> Result<String> {
        let started = Instant::now();
        let body = CompletionRequest {
            model: &self.model,
            messages: prompt.messages(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("oracle request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("oracle chat.completions HTTP {status}: {detail}");
        }

        let parsed: CompletionResponse =
            response.json().await.context("oracle response was not valid JSON")?;
        debug!(
            event_name = "oracle.request.completed",
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            choices = parsed.choices.len(),
            "oracle answered"
        );

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("oracle returned no choices"))
    }
}
