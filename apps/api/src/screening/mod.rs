// Screening pipeline: PDF text, LLM skill matching, identity heuristics,
// ranking and the HTTP surface for a run.
pub mod handlers;
pub mod identity;
pub mod models;
pub mod orchestrator;
pub mod pdf_text;
pub mod prompts;
pub mod ranking;
pub mod scorer;
pub mod skills;
pub mod store;
