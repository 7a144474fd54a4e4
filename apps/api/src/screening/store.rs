//! In-memory holder for the latest screening run.
//!
//! Keeps the report and the PDF bytes of every screened resume so the
//! client can view or download them. Cleared when a new run starts and
//! replaced when it finishes; nothing outlives the process.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::screening::models::{ResumeFile, ScreeningReport};

#[derive(Debug, Clone)]
pub struct StoredResume {
    pub file_name: String,
    pub data: Bytes,
}

struct LatestRun {
    report: ScreeningReport,
    resumes: HashMap<Uuid, StoredResume>,
}

#[derive(Clone, Default)]
pub struct ResumeStore {
    latest: Arc<RwLock<Option<LatestRun>>>,
}

impl ResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the previous run's records and files.
    pub async fn clear(&self) {
        *self.latest.write().await = None;
    }

    /// Publishes a finished run. Only files that produced a candidate are kept.
    pub async fn replace(&self, report: ScreeningReport, files: Vec<ResumeFile>) {
        let mut resumes: HashMap<Uuid, StoredResume> = files
            .into_iter()
            .map(|f| {
                (
                    f.id,
                    StoredResume {
                        file_name: f.file_name,
                        data: f.data,
                    },
                )
            })
            .collect();
        resumes.retain(|id, _| report.candidates.iter().any(|c| c.id == *id));

        *self.latest.write().await = Some(LatestRun { report, resumes });
    }

    pub async fn latest_report(&self) -> Option<ScreeningReport> {
        self.latest.read().await.as_ref().map(|run| run.report.clone())
    }

    pub async fn resume(&self, id: Uuid) -> Option<StoredResume> {
        self.latest
            .read()
            .await
            .as_ref()
            .and_then(|run| run.resumes.get(&id).cloned())
    }
}
