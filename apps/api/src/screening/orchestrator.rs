//! Batch orchestration. Screens uploaded resumes one at a time.
//!
//! Flow per file: extract text, compute_match (skills and keywords in
//! parallel, then score), identity heuristics, CandidateRecord.
//!
//! Files are processed strictly in input order. A failing file becomes a
//! warning and never aborts the batch; progress is reported after every file.

use tracing::{info, warn};

use crate::errors::ScreeningError;
use crate::llm_client::{LlmClient, LlmProvider};
use crate::screening::identity::{extract_email, extract_name};
use crate::screening::models::{
    resume_url, CandidateRecord, ResumeFile, ScreeningOutcome, ScreeningProgress,
    ScreeningRequest, ScreeningWarning,
};
use crate::screening::pdf_text::TextExtractor;
use crate::screening::scorer::compute_match;

/// Drives one screening run over explicitly injected collaborators.
pub struct Screener<'a> {
    llm: &'a LlmClient,
    text_extractor: &'a dyn TextExtractor,
}

impl<'a> Screener<'a> {
    pub fn new(llm: &'a LlmClient, text_extractor: &'a dyn TextExtractor) -> Self {
        Self {
            llm,
            text_extractor,
        }
    }

    /// Run-level checks. Any failure here means no file is touched.
    pub fn validate(
        &self,
        files: &[ResumeFile],
        job_description: &str,
        provider: LlmProvider,
    ) -> Result<(), ScreeningError> {
        if files.is_empty() {
            return Err(ScreeningError::Validation(
                "Please upload at least one resume".to_string(),
            ));
        }
        if job_description.trim().is_empty() {
            return Err(ScreeningError::Validation(
                "Please provide a job description".to_string(),
            ));
        }
        if !self.llm.is_available(provider) {
            return Err(ScreeningError::Validation(format!(
                "LLM provider '{provider}' is not configured"
            )));
        }
        if !self.text_extractor.is_ready() {
            return Err(ScreeningError::Initialization(
                "PDF text extractor is not initialized".to_string(),
            ));
        }
        Ok(())
    }

    /// Screens `files` in order. Returns candidates in input order plus one
    /// warning per failed file; `on_progress` fires once per file.
    pub async fn run<F>(
        &self,
        files: &[ResumeFile],
        job_description: &str,
        provider: LlmProvider,
        mut on_progress: F,
    ) -> Result<ScreeningOutcome, ScreeningError>
    where
        F: FnMut(ScreeningProgress),
    {
        self.validate(files, job_description, provider)?;

        let total = files.len();
        info!("Screening {total} resume(s) with {provider}");

        let mut outcome = ScreeningOutcome::default();

        for (index, file) in files.iter().enumerate() {
            let result = self.screen_file(file, job_description, provider).await;

            let warning = match result {
                Ok(record) => {
                    info!(
                        "Screened {} ({}/{total}): score {}",
                        file.file_name,
                        index + 1,
                        record.match_score
                    );
                    outcome.candidates.push(record);
                    None
                }
                Err(e) => {
                    warn!("Failed to process {}: {e}", file.file_name);
                    let warning = ScreeningWarning {
                        file_name: file.file_name.clone(),
                        message: format!("Could not process {}: {e}", file.file_name),
                    };
                    outcome.warnings.push(warning.clone());
                    Some(warning)
                }
            };

            on_progress(ScreeningProgress {
                index,
                total,
                file_name: file.file_name.clone(),
                fraction: (index + 1) as f64 / total as f64,
                succeeded: warning.is_none(),
                warning,
            });
        }

        info!(
            "Screening finished: {} candidate(s), {} warning(s)",
            outcome.candidates.len(),
            outcome.warnings.len()
        );
        Ok(outcome)
    }

    async fn screen_file(
        &self,
        file: &ResumeFile,
        job_description: &str,
        provider: LlmProvider,
    ) -> Result<CandidateRecord, ScreeningError> {
        let resume_text = self.text_extractor.extract_text(file).await?;

        let request = ScreeningRequest {
            resume_text: &resume_text,
            job_description,
            provider,
        };
        let result = compute_match(self.llm, &request).await?;

        Ok(CandidateRecord {
            id: file.id,
            candidate_name: extract_name(&resume_text),
            email: extract_email(&resume_text),
            file_name: file.file_name.clone(),
            file_url: resume_url(file.id),
            match_score: result.match_score,
            top_matched_skills: result.top_matched_skills,
            resume_text,
        })
    }
}
