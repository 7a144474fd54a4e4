//! Skill and keyword extraction: asks the oracle for a list of strings.

use serde::Deserialize;

use crate::errors::ScreeningError;
use crate::llm_client::prompts::{fill_template, system_prompt};
use crate::llm_client::{LlmClient, LlmProvider, OracleRequest};
use crate::screening::models::ExtractionResult;
use crate::screening::prompts::{
    keywords_schema, skills_schema, KEYWORDS_PROMPT_TEMPLATE, KEYWORDS_ROLE, KEYWORDS_TASK,
    SKILLS_PROMPT_TEMPLATE, SKILLS_ROLE, SKILLS_TASK,
};

#[derive(Debug, Deserialize)]
struct SkillsOutput {
    #[serde(default)]
    skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordsOutput {
    #[serde(default)]
    keywords: Vec<String>,
}

/// Extracts professional skills from resume text.
pub async fn extract_skills(
    llm: &LlmClient,
    resume_text: &str,
    provider: LlmProvider,
) -> Result<ExtractionResult, ScreeningError> {
    let prompt = fill_template(SKILLS_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);
    let system = system_prompt(SKILLS_ROLE);
    let schema = skills_schema();
    let request = OracleRequest {
        name: SKILLS_TASK,
        system: &system,
        prompt: &prompt,
        schema: &schema,
    };

    let output: SkillsOutput = llm
        .call_json(provider, &request)
        .await
        .map_err(|e| ScreeningError::Extraction(format!("Skill extraction failed: {e}")))?;

    Ok(ExtractionResult {
        items: clean_items(output.skills),
    })
}

/// Extracts keywords from a job description.
pub async fn extract_keywords(
    llm: &LlmClient,
    job_description: &str,
    provider: LlmProvider,
) -> Result<ExtractionResult, ScreeningError> {
    let prompt = fill_template(KEYWORDS_PROMPT_TEMPLATE, &[("job_description", job_description)]);
    let system = system_prompt(KEYWORDS_ROLE);
    let schema = keywords_schema();
    let request = OracleRequest {
        name: KEYWORDS_TASK,
        system: &system,
        prompt: &prompt,
        schema: &schema,
    };

    let output: KeywordsOutput = llm
        .call_json(provider, &request)
        .await
        .map_err(|e| ScreeningError::Extraction(format!("Keyword extraction failed: {e}")))?;

    Ok(ExtractionResult {
        items: clean_items(output.keywords),
    })
}

/// Trims entries and drops blank ones, preserving order.
fn clean_items(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::stub::{stub_client, StubBackend};

    #[tokio::test]
    async fn test_extract_skills_returns_oracle_list_in_order() {
        let backend = Arc::new(
            StubBackend::new().answer(SKILLS_TASK, r#"{"skills": ["Rust", " Tokio ", "", "SQL"]}"#),
        );
        let llm = stub_client(backend.clone());

        let result = extract_skills(&llm, "Rust developer", LlmProvider::Gemini).await.unwrap();
        assert_eq!(result.items, vec!["Rust", "Tokio", "SQL"]);
        assert_eq!(backend.calls(), vec![SKILLS_TASK]);
    }

    #[tokio::test]
    async fn test_extract_keywords_uses_keyword_task() {
        let backend = Arc::new(
            StubBackend::new().answer(KEYWORDS_TASK, r#"{"keywords": ["Kubernetes", "Go"]}"#),
        );
        let llm = stub_client(backend.clone());

        let result = extract_keywords(&llm, "Platform engineer", LlmProvider::Gemini)
            .await
            .unwrap();
        assert_eq!(result.items, vec!["Kubernetes", "Go"]);
        assert_eq!(backend.call_count(KEYWORDS_TASK), 1);
    }

    #[tokio::test]
    async fn test_empty_input_is_passed_through() {
        let backend = Arc::new(StubBackend::new().answer(SKILLS_TASK, r#"{"skills": []}"#));
        let llm = stub_client(backend.clone());

        let result = extract_skills(&llm, "", LlmProvider::Gemini).await.unwrap();
        assert!(result.items.is_empty());
        assert_eq!(backend.call_count(SKILLS_TASK), 1);
    }

    #[tokio::test]
    async fn test_oracle_failure_is_extraction_error() {
        let backend = Arc::new(StubBackend::new());
        let llm = stub_client(backend);

        let err = extract_keywords(&llm, "anything", LlmProvider::Gemini).await.unwrap_err();
        assert!(matches!(err, ScreeningError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_malformed_answer_is_extraction_error() {
        let backend = Arc::new(StubBackend::new().answer(SKILLS_TASK, "Rust, Go, SQL"));
        let llm = stub_client(backend);

        let err = extract_skills(&llm, "resume", LlmProvider::Gemini).await.unwrap_err();
        assert!(matches!(err, ScreeningError::Extraction(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_extraction_error() {
        let backend = Arc::new(StubBackend::new().answer(SKILLS_TASK, r#"{"skills": ["Rust"]}"#));
        let llm = stub_client(backend);

        let err = extract_skills(&llm, "resume", LlmProvider::OpenAi).await.unwrap_err();
        assert!(matches!(err, ScreeningError::Extraction(_)));
    }
}
