//! LLM Client: the single point of entry for every oracle call in the screener.
//!
//! ARCHITECTURAL RULE: No other module may call a provider API directly.
//! Skill extraction, keyword extraction and scoring all go through `LlmClient`,
//! which picks a backend by `LlmProvider` and owns timeout and retry policy.
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod gemini;
pub mod openai;
pub mod prompts;
#[cfg(test)]
pub mod stub;

/// Default delay before the first retry; doubles on each further attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Which backend answers a request. Selection never changes the request or
/// response contract, only who processes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LlmProvider {
    #[default]
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini",
            LlmProvider::OpenAi => "openai",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(LlmProvider::Gemini),
            "openai" => Ok(LlmProvider::OpenAi),
            other => Err(format!("unknown LLM provider '{other}'")),
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM call timed out after {0:?}")]
    Timeout(Duration),

    #[error("LLM provider '{0}' is not configured")]
    ProviderUnavailable(LlmProvider),
}

impl LlmError {
    /// Transport failures, 429 and 5xx are worth another attempt. Everything
    /// else is a property of the request and would fail again.
    fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// One logical oracle request: an instruction plus the JSON schema the
/// answer must conform to. Backends translate it into their wire format.
#[derive(Debug, Clone, Copy)]
pub struct OracleRequest<'a> {
    /// Stable task name, used for logging and as the schema name.
    pub name: &'a str,
    pub system: &'a str,
    pub prompt: &'a str,
    pub schema: &'a Value,
}

/// A provider backend. Implementations make exactly one HTTP attempt and
/// return the raw text of the model's answer.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    fn model(&self) -> &str;

    async fn complete(&self, request: &OracleRequest<'_>) -> Result<String, LlmError>;
}

/// The single LLM client used by the screening pipeline.
/// Holds one optional backend per provider; cloning is cheap.
#[derive(Clone)]
pub struct LlmClient {
    gemini: Option<Arc<dyn LlmBackend>>,
    openai: Option<Arc<dyn LlmBackend>>,
    timeout: Duration,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl LlmClient {
    /// Creates a client without backends. Attach them with `with_backend`.
    pub fn new(timeout: Duration, max_retries: u32) -> Self {
        Self {
            gemini: None,
            openai: None,
            timeout,
            max_retries,
            retry_base_delay: RETRY_BASE_DELAY,
        }
    }

    /// Builds the HTTP backends for every provider that has an API key.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.llm_timeout + Duration::from_secs(5))
            .build()?;

        let mut client = Self::new(config.llm_timeout, config.llm_max_retries);
        if let Some(key) = &config.gemini_api_key {
            client = client.with_backend(
                LlmProvider::Gemini,
                Arc::new(gemini::GeminiBackend::new(http.clone(), key.clone())),
            );
        }
        if let Some(key) = &config.openai_api_key {
            client = client.with_backend(
                LlmProvider::OpenAi,
                Arc::new(openai::OpenAiBackend::new(http, key.clone())),
            );
        }
        Ok(client)
    }

    pub fn with_backend(mut self, provider: LlmProvider, backend: Arc<dyn LlmBackend>) -> Self {
        match provider {
            LlmProvider::Gemini => self.gemini = Some(backend),
            LlmProvider::OpenAi => self.openai = Some(backend),
        }
        self
    }

    #[cfg(test)]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn is_available(&self, provider: LlmProvider) -> bool {
        self.backend(provider).is_ok()
    }

    /// Providers that have a backend attached, in declaration order.
    pub fn available_providers(&self) -> Vec<LlmProvider> {
        [LlmProvider::Gemini, LlmProvider::OpenAi]
            .into_iter()
            .filter(|p| self.is_available(*p))
            .collect()
    }

    fn backend(&self, provider: LlmProvider) -> Result<&Arc<dyn LlmBackend>, LlmError> {
        let backend = match provider {
            LlmProvider::Gemini => self.gemini.as_ref(),
            LlmProvider::OpenAi => self.openai.as_ref(),
        };
        backend.ok_or(LlmError::ProviderUnavailable(provider))
    }

    /// Sends a request to the selected backend and returns the raw answer.
    /// Each attempt is bounded by the configured timeout. Retryable failures
    /// are retried with exponential backoff (1s, 2s, 4s, ... by default).
    pub async fn call(
        &self,
        provider: LlmProvider,
        request: &OracleRequest<'_>,
    ) -> Result<String, LlmError> {
        let backend = self.backend(provider)?;
        let attempts = self.max_retries + 1;
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.retry_base_delay * (1 << (attempt - 1).min(16));
                warn!(
                    "LLM call '{}' attempt {} failed, retrying after {}ms...",
                    request.name,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let outcome = match tokio::time::timeout(self.timeout, backend.complete(request)).await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(LlmError::Timeout(self.timeout)),
            };

            match outcome {
                Ok(text) => {
                    debug!(
                        "LLM call '{}' succeeded via {} ({})",
                        request.name,
                        provider,
                        backend.model()
                    );
                    return Ok(text);
                }
                Err(e) if e.is_retryable() => {
                    warn!("LLM call '{}' via {} failed: {e}", request.name, provider);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: self.max_retries,
        }))
    }

    /// Calls the LLM and deserializes the answer as JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        provider: LlmProvider,
        request: &OracleRequest<'_>,
    ) -> Result<T, LlmError> {
        let text = self.call(provider, request).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&text);
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Error body shared by both providers: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Turns a non-success HTTP response into `LlmError::Api`, preferring the
/// provider's own error message when the body parses.
async fn api_error(response: reqwest::Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ProviderError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
