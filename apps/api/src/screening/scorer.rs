//! Match Scorer: semantic comparison of resume skills against job keywords.
//!
//! Flow for one resume: extract skills and keywords concurrently, then score.
//! An empty skill list short-circuits to a zero score without an oracle call.

use serde::Deserialize;
use tracing::debug;

use crate::errors::ScreeningError;
use crate::llm_client::prompts::{bullet_list, fill_template, system_prompt};
use crate::llm_client::{LlmClient, LlmProvider, OracleRequest};
use crate::screening::models::{MatchResult, ScreeningRequest};
use crate::screening::prompts::{scoring_schema, SCORING_PROMPT_TEMPLATE, SCORING_ROLE, SCORING_TASK};
use crate::screening::skills::{extract_keywords, extract_skills};

/// Wire shape of the scoring answer; names follow the schema sent to the oracle.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreOutput {
    match_score: f64,
    #[serde(default)]
    top_matched_skills: Vec<String>,
}

/// Scores a resume's skills against a job description's keywords.
pub async fn score_match(
    llm: &LlmClient,
    resume_skills: &[String],
    job_keywords: &[String],
    job_description: &str,
    provider: LlmProvider,
) -> Result<MatchResult, ScreeningError> {
    if resume_skills.is_empty() {
        debug!("No resume skills extracted, skipping scoring call");
        return Ok(MatchResult::no_match());
    }

    let resume_skills = bullet_list(resume_skills);
    let job_keywords = bullet_list(job_keywords);
    let prompt = fill_template(
        SCORING_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("resume_skills", resume_skills.as_str()),
            ("job_keywords", job_keywords.as_str()),
        ],
    );
    let system = system_prompt(SCORING_ROLE);
    let schema = scoring_schema();
    let request = OracleRequest {
        name: SCORING_TASK,
        system: &system,
        prompt: &prompt,
        schema: &schema,
    };

    let output: ScoreOutput = llm.call_json(provider, &request).await.map_err(|e| {
        ScreeningError::Scoring(format!("The AI model failed to generate a score: {e}"))
    })?;

    Ok(MatchResult::from_raw(output.match_score, output.top_matched_skills))
}

/// Full per-resume scoring: both extractions run concurrently, then the
/// scorer sees their results together with the job description.
pub async fn compute_match(
    llm: &LlmClient,
    request: &ScreeningRequest<'_>,
) -> Result<MatchResult, ScreeningError> {
    let (skills, keywords) = tokio::join!(
        extract_skills(llm, request.resume_text, request.provider),
        extract_keywords(llm, request.job_description, request.provider),
    );
    let skills = skills?;
    let keywords = keywords?;
    debug!(
        "Extracted {} skill(s) and {} keyword(s)",
        skills.items.len(),
        keywords.items.len()
    );

    score_match(
        llm,
        &skills.items,
        &keywords.items,
        request.job_description,
        request.provider,
    )
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::stub::{stub_client, StubBackend};
    use crate::screening::prompts::{KEYWORDS_TASK, SKILLS_TASK};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_skills_short_circuits_without_oracle_call() {
        let backend = Arc::new(StubBackend::new().answer(SCORING_TASK, r#"{"matchScore": 99, "topMatchedSkills": ["x"]}"#));
        let llm = stub_client(backend.clone());

        let result = score_match(&llm, &[], &strings(&["Rust"]), "JD", LlmProvider::Gemini)
            .await
            .unwrap();
        assert_eq!(result, MatchResult { match_score: 0, top_matched_skills: vec![] });
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_score_is_clamped_and_skills_truncated() {
        let backend = Arc::new(StubBackend::new().answer(
            SCORING_TASK,
            r#"{"matchScore": 130, "topMatchedSkills": ["Rust", "Tokio", "Axum", "SQL"]}"#,
        ));
        let llm = stub_client(backend);

        let result = score_match(&llm, &strings(&["Rust"]), &strings(&["Rust"]), "JD", LlmProvider::Gemini)
            .await
            .unwrap();
        assert_eq!(result.match_score, 100);
        assert_eq!(result.top_matched_skills.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_structured_output_is_scoring_error() {
        let backend = Arc::new(StubBackend::new().answer(SCORING_TASK, r#"{"topMatchedSkills": []}"#));
        let llm = stub_client(backend);

        let err = score_match(&llm, &strings(&["Rust"]), &[], "JD", LlmProvider::Gemini)
            .await
            .unwrap_err();
        assert!(matches!(err, ScreeningError::Scoring(_)));
    }

    #[tokio::test]
    async fn test_prompt_carries_skills_keywords_and_description() {
        let backend = Arc::new(
            StubBackend::new()
                .answer_when(SCORING_TASK, "- Figma", r#"{"matchScore": 88, "topMatchedSkills": ["Figma"]}"#)
                .answer(SCORING_TASK, r#"{"matchScore": 1, "topMatchedSkills": []}"#),
        );
        let llm = stub_client(backend);

        let result = score_match(
            &llm,
            &strings(&["Figma", "Sketch"]),
            &strings(&["UI/UX"]),
            "UI/UX Designer",
            LlmProvider::Gemini,
        )
        .await
        .unwrap();
        assert_eq!(result.match_score, 88);
    }

    #[tokio::test]
    async fn test_placeholder_in_skill_is_not_expanded() {
        let backend = Arc::new(
            StubBackend::new()
                .answer_when(SCORING_TASK, "- CONFIDENTIAL-ROLE", r#"{"matchScore": 77, "topMatchedSkills": []}"#)
                .answer_when(SCORING_TASK, "- {job_description}", r#"{"matchScore": 5, "topMatchedSkills": []}"#),
        );
        let llm = stub_client(backend);

        let result = score_match(
            &llm,
            &strings(&["{job_description}"]),
            &[],
            "CONFIDENTIAL-ROLE",
            LlmProvider::Gemini,
        )
        .await
        .unwrap();
        assert_eq!(result.match_score, 5);
    }

    #[tokio::test]
    async fn test_scoring_is_idempotent_under_fixed_oracle() {
        let backend = Arc::new(StubBackend::new().answer(
            SCORING_TASK,
            r#"{"matchScore": 64.2, "topMatchedSkills": ["Go", "gRPC"]}"#,
        ));
        let llm = stub_client(backend);
        let skills = strings(&["Go", "gRPC", "Docker"]);
        let keywords = strings(&["Go", "microservices"]);

        let first = score_match(&llm, &skills, &keywords, "Backend role", LlmProvider::Gemini)
            .await
            .unwrap();
        let second = score_match(&llm, &skills, &keywords, "Backend role", LlmProvider::Gemini)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.match_score, 64);
    }

    #[tokio::test]
    async fn test_compute_match_runs_both_extractions_then_scores() {
        let backend = Arc::new(
            StubBackend::new()
                .answer(SKILLS_TASK, r#"{"skills": ["React", "TypeScript"]}"#)
                .answer(KEYWORDS_TASK, r#"{"keywords": ["ReactJS"]}"#)
                .answer(SCORING_TASK, r#"{"matchScore": 91, "topMatchedSkills": ["React"]}"#),
        );
        let llm = stub_client(backend.clone());
        let request = ScreeningRequest {
            resume_text: "Frontend dev, React",
            job_description: "ReactJS engineer",
            provider: LlmProvider::Gemini,
        };

        let result = compute_match(&llm, &request).await.unwrap();
        assert_eq!(result.match_score, 91);
        assert_eq!(backend.call_count(SKILLS_TASK), 1);
        assert_eq!(backend.call_count(KEYWORDS_TASK), 1);
        assert_eq!(backend.calls().last().map(String::as_str), Some(SCORING_TASK));
    }

    #[tokio::test]
    async fn test_compute_match_without_skills_never_scores() {
        let backend = Arc::new(
            StubBackend::new()
                .answer(SKILLS_TASK, r#"{"skills": []}"#)
                .answer(KEYWORDS_TASK, r#"{"keywords": ["Rust"]}"#),
        );
        let llm = stub_client(backend.clone());
        let request = ScreeningRequest {
            resume_text: "",
            job_description: "Rust engineer",
            provider: LlmProvider::Gemini,
        };

        let result = compute_match(&llm, &request).await.unwrap();
        assert_eq!(result, MatchResult::no_match());
        assert_eq!(backend.call_count(SCORING_TASK), 0);
    }

    #[tokio::test]
    async fn test_compute_match_keyword_failure_is_extraction_error() {
        let backend = Arc::new(StubBackend::new().answer(SKILLS_TASK, r#"{"skills": ["Rust"]}"#));
        let llm = stub_client(backend);
        let request = ScreeningRequest {
            resume_text: "Rust",
            job_description: "Rust engineer",
            provider: LlmProvider::Gemini,
        };

        let err = compute_match(&llm, &request).await.unwrap_err();
        assert!(matches!(err, ScreeningError::Extraction(_)));
    }
}
