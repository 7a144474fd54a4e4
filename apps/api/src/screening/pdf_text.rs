//! PDF text extraction over `pdf-extract`.
//!
//! Parsing is CPU-bound and runs on the blocking pool. The worker pool must
//! be configured once per process with `initialize` before any extraction.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::errors::ScreeningError;
use crate::screening::models::ResumeFile;

/// Produces plain text for an uploaded resume.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// True once the extractor can accept work.
    fn is_ready(&self) -> bool;

    async fn extract_text(&self, file: &ResumeFile) -> Result<String, ScreeningError>;
}

#[derive(Default)]
pub struct PdfTextExtractor {
    workers: OnceLock<Arc<Semaphore>>,
}

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the blocking worker pool. Later calls are no-ops.
    pub fn initialize(&self, workers: usize) -> Result<(), ScreeningError> {
        if workers == 0 {
            return Err(ScreeningError::Initialization(
                "PDF worker pool needs at least one worker".to_string(),
            ));
        }
        if self.workers.set(Arc::new(Semaphore::new(workers))).is_err() {
            debug!("PDF text extractor already initialized");
            return Ok(());
        }
        info!("PDF text extractor initialized with {workers} worker(s)");
        Ok(())
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    fn is_ready(&self) -> bool {
        self.workers.get().is_some()
    }

    async fn extract_text(&self, file: &ResumeFile) -> Result<String, ScreeningError> {
        let workers = self.workers.get().cloned().ok_or_else(|| {
            ScreeningError::Initialization("PDF worker is not ready".to_string())
        })?;
        let _permit = workers
            .acquire_owned()
            .await
            .map_err(|_| ScreeningError::Initialization("PDF worker pool closed".to_string()))?;

        let data = file.data.clone();
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&data)
        })
        .await
        // pdf-extract panics on some malformed inputs
        .map_err(|e| ScreeningError::Extraction(format!("{}: PDF parser crashed: {e}", file.file_name)))?
        .map_err(|e| ScreeningError::Extraction(format!("{}: {e}", file.file_name)))?;

        debug!("Extracted {} page(s) from {}", pages.len(), file.file_name);
        Ok(join_pages(&pages))
    }
}

/// Joins page texts in order. Within a page, non-empty trimmed lines are
/// joined with single spaces; every page ends with a newline.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    for page in pages {
        let fragments: Vec<&str> = page
            .as_ref()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        text.push_str(&fragments.join(" "));
        text.push('\n');
    }
    text
}

/// Test extractor: the file bytes are the resume text. Files whose bytes
/// start with `CORRUPT` fail like an unparseable PDF.
#[cfg(test)]
pub struct StubTextExtractor {
    pub ready: bool,
}

#[cfg(test)]
#[async_trait]
impl TextExtractor for StubTextExtractor {
    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn extract_text(&self, file: &ResumeFile) -> Result<String, ScreeningError> {
        if file.data.starts_with(b"CORRUPT") {
            return Err(ScreeningError::Extraction(format!(
                "{}: invalid PDF structure",
                file.file_name
            )));
        }
        Ok(String::from_utf8_lossy(&file.data).into_owned())
    }
}
