use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::LlmProvider;

/// Application configuration loaded from environment variables.
/// Fails at startup if no LLM provider key is present.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    /// Provider used when a screening request does not name one.
    pub default_provider: LlmProvider,
    pub llm_timeout: Duration,
    pub llm_max_retries: u32,
    pub max_files: usize,
    pub max_upload_bytes: usize,
    pub pdf_workers: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let gemini_api_key = optional_env("GEMINI_API_KEY").or_else(|| optional_env("GOOGLE_API_KEY"));
        let openai_api_key = optional_env("OPENAI_API_KEY");

        if gemini_api_key.is_none() && openai_api_key.is_none() {
            bail!("Set at least one of GEMINI_API_KEY, GOOGLE_API_KEY or OPENAI_API_KEY");
        }

        let default_provider = match optional_env("LLM_PROVIDER") {
            Some(raw) => raw
                .parse::<LlmProvider>()
                .map_err(anyhow::Error::msg)
                .context("LLM_PROVIDER must be 'gemini' or 'openai'")?,
            None => LlmProvider::default(),
        };

        Ok(Config {
            gemini_api_key,
            openai_api_key,
            default_provider,
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 30)?),
            llm_max_retries: parse_env("LLM_MAX_RETRIES", 3)?,
            max_files: parse_env("MAX_FILES", 500)?,
            max_upload_bytes: parse_env::<usize>("MAX_UPLOAD_MB", 100)? * 1024 * 1024,
            pdf_workers: parse_env("PDF_WORKERS", 4)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Gemini-only configuration with small limits, no environment access.
    pub fn for_tests() -> Self {
        Config {
            gemini_api_key: Some("test-key".to_string()),
            openai_api_key: None,
            default_provider: LlmProvider::Gemini,
            llm_timeout: Duration::from_secs(5),
            llm_max_retries: 0,
            max_files: 10,
            max_upload_bytes: 1024 * 1024,
            pdf_workers: 1,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
