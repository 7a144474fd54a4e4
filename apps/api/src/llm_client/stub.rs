//! Deterministic in-memory backend for tests. Answers are looked up by the
//! request's task name and, optionally, a substring of its prompt.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{LlmBackend, LlmClient, LlmError, LlmProvider, OracleRequest};

struct Rule {
    name: String,
    needle: Option<String>,
    answer: String,
}

#[derive(Default)]
pub struct StubBackend {
    rules: Vec<Rule>,
    calls: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every `name` request with `answer`.
    pub fn answer(mut self, name: &str, answer: &str) -> Self {
        self.rules.push(Rule { name: name.to_string(), needle: None, answer: answer.to_string() });
        self
    }

    /// Answers `name` requests whose prompt contains `needle`. Rules are
    /// checked in insertion order, so add specific rules before catch-alls.
    pub fn answer_when(mut self, name: &str, needle: &str, answer: &str) -> Self {
        self.rules.push(Rule {
            name: name.to_string(),
            needle: Some(needle.to_string()),
            answer: answer.to_string(),
        });
        self
    }

    /// Task names of every request received, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|n| n.as_str() == name).count()
    }
}

#[async_trait]
impl LlmBackend for StubBackend {
    fn model(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: &OracleRequest<'_>) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(request.name.to_string());
        self.rules
            .iter()
            .find(|rule| {
                rule.name == request.name
                    && rule.needle.as_deref().map_or(true, |n| request.prompt.contains(n))
            })
            .map(|rule| rule.answer.clone())
            .ok_or(LlmError::EmptyContent)
    }
}

/// A client whose Gemini backend is `backend`; no retries, short timeout.
pub fn stub_client(backend: Arc<StubBackend>) -> LlmClient {
    LlmClient::new(Duration::from_secs(5), 0)
        .with_retry_delay(Duration::ZERO)
        .with_backend(LlmProvider::Gemini, backend)
}
