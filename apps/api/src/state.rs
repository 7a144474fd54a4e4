use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::screening::pdf_text::TextExtractor;
use crate::screening::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Pluggable PDF text extraction. Default: PdfTextExtractor backed by a
    /// bounded pool of blocking workers.
    pub text_extractor: Arc<dyn TextExtractor>,
    /// Latest run's report and resume bytes.
    pub store: ResumeStore,
    pub config: Config,
}
