use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm_client::LlmProvider;
use crate::screening::ranking::SortState;

/// An uploaded resume. The id is assigned at upload time and becomes the
/// candidate id when the file is screened successfully.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub id: Uuid,
    pub file_name: String,
    pub data: Bytes,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, data: Bytes) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            data,
        }
    }
}

/// Everything the scorer needs for one resume. Built per file, consumed once.
#[derive(Debug, Clone, Copy)]
pub struct ScreeningRequest<'a> {
    pub resume_text: &'a str,
    pub job_description: &'a str,
    pub provider: LlmProvider,
}

/// Skills of a resume or keywords of a job description, in oracle order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub items: Vec<String>,
}

/// Maximum number of skills reported per candidate.
pub const MAX_TOP_SKILLS: usize = 3;

/// Score of one resume against the job description.
/// `match_score` is always within 0..=100 and at most three skills are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_score: u32,
    pub top_matched_skills: Vec<String>,
}

impl MatchResult {
    /// Builds a result from raw oracle output, clamping the score into
    /// 0..=100 (non-finite scores become 0) and truncating the skill list.
    pub fn from_raw(score: f64, mut skills: Vec<String>) -> Self {
        let match_score = if score.is_finite() {
            score.clamp(0.0, 100.0).round() as u32
        } else {
            0
        };
        skills.retain(|s| !s.trim().is_empty());
        skills.truncate(MAX_TOP_SKILLS);
        Self {
            match_score,
            top_matched_skills: skills,
        }
    }

    /// The result for a resume with no extractable skills.
    pub fn no_match() -> Self {
        Self::default()
    }
}

/// Aggregated outcome for one successfully screened resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: Uuid,
    pub candidate_name: String,
    pub email: String,
    pub file_name: String,
    /// Valid only until the next screening run replaces the run store.
    pub file_url: String,
    pub match_score: u32,
    pub top_matched_skills: Vec<String>,
    pub resume_text: String,
}

/// A file that could not be screened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningWarning {
    pub file_name: String,
    pub message: String,
}

/// Emitted once per file, after it finished (successfully or not).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningProgress {
    pub index: usize,
    pub total: usize,
    pub file_name: String,
    /// `(index + 1) / total`, in 0.0..=1.0.
    pub fraction: f64,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ScreeningWarning>,
}

/// What the orchestrator hands back for a run, candidates in input order.
#[derive(Debug, Clone, Default)]
pub struct ScreeningOutcome {
    pub candidates: Vec<CandidateRecord>,
    pub warnings: Vec<ScreeningWarning>,
}

/// Response body of a finished screening run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub run_id: Uuid,
    pub llm_provider: LlmProvider,
    /// Order the candidates are listed in.
    pub sort: SortState,
    pub total_files: usize,
    pub processed_files: usize,
    pub candidates: Vec<CandidateRecord>,
    pub warnings: Vec<ScreeningWarning>,
    pub completed_at: DateTime<Utc>,
}

/// Path under which the run store serves a screened resume.
pub fn resume_url(id: Uuid) -> String {
    format!("/api/v1/resumes/{id}")
}
