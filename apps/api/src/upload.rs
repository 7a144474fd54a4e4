use axum::extract::Multipart;
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::LlmProvider;
use crate::screening::models::ResumeFile;

/// Parsed form fields of a screening upload.
#[derive(Debug)]
pub struct ScreeningForm {
    pub files: Vec<ResumeFile>,
    pub job_description: String,
    pub provider: Option<LlmProvider>,
}

/// Parse a multipart screening form.
///
/// Fields: repeated `files` parts (PDF only), `job_description`, and an
/// optional `llm_provider` (`gemini` or `openai`). Unknown fields are ignored.
pub async fn parse_screening_form(
    mut multipart: Multipart,
    max_files: usize,
) -> Result<ScreeningForm, AppError> {
    let mut files: Vec<ResumeFile> = Vec::new();
    let mut job_description = String::new();
    let mut provider: Option<LlmProvider> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form field: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "files" | "files[]" => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let content_type = field.content_type().map(str::to_string);

                if !is_pdf(content_type.as_deref(), &file_name) {
                    return Err(AppError::Validation(format!(
                        "{file_name} is not a PDF file"
                    )));
                }
                if files.len() >= max_files {
                    return Err(AppError::Validation(format!(
                        "Too many files: at most {max_files} resumes per run"
                    )));
                }

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read {file_name}: {e}")))?;

                files.push(ResumeFile::new(file_name, data));
            }
            "job_description" => {
                job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read job_description: {e}")))?;
            }
            "llm_provider" => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read llm_provider: {e}")))?;
                if !val.trim().is_empty() {
                    provider = Some(val.parse().map_err(AppError::Validation)?);
                }
            }
            other => debug!("Ignoring unknown form field '{other}'"),
        }
    }

    Ok(ScreeningForm {
        files,
        job_description,
        provider,
    })
}

/// PDF parts are recognised by MIME type or, failing that, by extension.
fn is_pdf(content_type: Option<&str>, file_name: &str) -> bool {
    let ct = content_type.unwrap_or("").to_ascii_lowercase();
    ct.contains("application/pdf") || file_name.to_ascii_lowercase().ends_with(".pdf")
}
