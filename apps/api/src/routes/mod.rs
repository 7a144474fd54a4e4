pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/screenings", post(handlers::handle_create_screening))
        .route(
            "/api/v1/screenings/stream",
            post(handlers::handle_stream_screening),
        )
        .route(
            "/api/v1/screenings/latest",
            get(handlers::handle_latest_screening),
        )
        .route("/api/v1/resumes/:id", get(handlers::handle_get_resume))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::stub::{stub_client, StubBackend};
    use crate::screening::pdf_text::StubTextExtractor;
    use crate::screening::store::ResumeStore;

    fn state() -> AppState {
        AppState {
            llm: stub_client(Arc::new(StubBackend::new())),
            text_extractor: Arc::new(StubTextExtractor { ready: true }),
            store: ResumeStore::new(),
            config: Config::for_tests(),
        }
    }

    #[tokio::test]
    async fn test_health_reports_providers() {
        let response = build_router(state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "screener-api");
        assert_eq!(body["llm_providers"], serde_json::json!(["gemini"]));
        assert_eq!(body["pdf_extractor_ready"], true);
    }

    #[tokio::test]
    async fn test_unknown_resume_is_not_found() {
        let response = build_router(state())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/resumes/00000000-0000-0000-0000-000000000000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_resume_id_is_rejected() {
        let response = build_router(state())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/resumes/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
