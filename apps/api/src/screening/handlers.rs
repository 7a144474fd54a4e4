//! Axum route handlers for the Screening API.

use std::convert::Infallible;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::LlmProvider;
use crate::screening::models::{ScreeningProgress, ScreeningReport};
use crate::screening::orchestrator::Screener;
use crate::screening::ranking::{sort_candidates, SortQuery, SortState};
use crate::state::AppState;
use crate::upload::{parse_screening_form, ScreeningForm};

type EventStream = UnboundedReceiverStream<Result<Event, Infallible>>;

#[derive(Debug, Deserialize)]
pub struct ResumeQuery {
    #[serde(default)]
    pub download: bool,
}

#[derive(Debug, Serialize)]
struct ErrorEvent {
    message: String,
}

/// POST /api/v1/screenings
///
/// Multipart upload of resumes plus a job description. Screens every file
/// and returns the ranked report (default: best match first).
pub async fn handle_create_screening(
    State(state): State<AppState>,
    Query(sort): Query<SortQuery>,
    multipart: Multipart,
) -> Result<Json<ScreeningReport>, AppError> {
    let form = parse_screening_form(multipart, state.config.max_files).await?;
    let report = execute_run(&state, form, sort.into(), |_| {}).await?;
    Ok(Json(report))
}

/// POST /api/v1/screenings/stream
///
/// Same form as `handle_create_screening`, answered as Server-Sent Events:
/// `progress` after every file, `warning` for every failed file, then
/// `complete` with the report or `error`. Validation failures are returned
/// as a plain 400 before the stream opens.
pub async fn handle_stream_screening(
    State(state): State<AppState>,
    Query(sort): Query<SortQuery>,
    multipart: Multipart,
) -> Result<Sse<EventStream>, AppError> {
    let form = parse_screening_form(multipart, state.config.max_files).await?;
    let provider = resolve_provider(&state, &form);
    Screener::new(&state.llm, state.text_extractor.as_ref()).validate(
        &form.files,
        &form.job_description,
        provider,
    )?;

    let (tx, rx) = mpsc::unbounded_channel::<Result<Event, Infallible>>();
    let sort = SortState::from(sort);

    tokio::spawn(async move {
        let progress_tx = tx.clone();
        let result = execute_run(&state, form, sort, move |progress| {
            // A closed channel means the client went away; the run still
            // finishes so the store reflects it.
            if let Some(warning) = &progress.warning {
                let _ = progress_tx.send(Ok(sse_event("warning", warning)));
            }
            let _ = progress_tx.send(Ok(sse_event("progress", &progress)));
        })
        .await;

        let event = match result {
            Ok(report) => sse_event("complete", &report),
            Err(e) => sse_event("error", &ErrorEvent { message: e.to_string() }),
        };
        let _ = tx.send(Ok(event));
    });

    Ok(Sse::new(UnboundedReceiverStream::new(rx)).keep_alive(KeepAlive::default()))
}

/// GET /api/v1/screenings/latest
///
/// Returns the most recent run, re-sorted by the `sort` / `direction` query.
/// A `toggle` column is applied on top, like a click on a table header.
pub async fn handle_latest_screening(
    State(state): State<AppState>,
    Query(sort): Query<SortQuery>,
) -> Result<Json<ScreeningReport>, AppError> {
    let mut report = state
        .store
        .latest_report()
        .await
        .ok_or_else(|| AppError::NotFound("No screening run has completed yet".to_string()))?;
    let sort = SortState::from(sort);
    sort_candidates(&mut report.candidates, sort);
    report.sort = sort;
    Ok(Json(report))
}

/// GET /api/v1/resumes/:id
///
/// Serves a screened resume from the latest run, inline or as a download.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ResumeQuery>,
) -> Result<Response, AppError> {
    let resume = state
        .store
        .resume(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    let disposition = if query.download { "attachment" } else { "inline" };
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("{disposition}; filename=\"{}\"", header_safe_file_name(&resume.file_name)),
        ),
    ];
    Ok((headers, resume.data).into_response())
}

fn resolve_provider(state: &AppState, form: &ScreeningForm) -> LlmProvider {
    form.provider.unwrap_or(state.config.default_provider)
}

/// Validates, screens, ranks and publishes one run to the store.
async fn execute_run<F>(
    state: &AppState,
    form: ScreeningForm,
    sort: SortState,
    on_progress: F,
) -> Result<ScreeningReport, AppError>
where
    F: FnMut(ScreeningProgress),
{
    let provider = resolve_provider(state, &form);
    let screener = Screener::new(&state.llm, state.text_extractor.as_ref());
    screener.validate(&form.files, &form.job_description, provider)?;

    state.store.clear().await;

    let outcome = screener
        .run(&form.files, &form.job_description, provider, on_progress)
        .await?;

    let mut candidates = outcome.candidates;
    sort_candidates(&mut candidates, sort);

    let report = ScreeningReport {
        run_id: Uuid::new_v4(),
        llm_provider: provider,
        sort,
        total_files: form.files.len(),
        processed_files: candidates.len(),
        candidates,
        warnings: outcome.warnings,
        completed_at: Utc::now(),
    };

    state.store.replace(report.clone(), form.files).await;
    Ok(report)
}

fn sse_event<T: Serialize>(event_type: &str, data: &T) -> Event {
    Event::default()
        .event(event_type)
        .data(serde_json::to_string(data).unwrap_or_default())
}

/// Keeps printable ASCII minus quote and backslash so the name fits in a
/// quoted `Content-Disposition` parameter.
fn header_safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
