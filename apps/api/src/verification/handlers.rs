use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::analysis::models::{AnalysisInput, AnalysisResult, Badge};
use crate::errors::AppError;
use crate::state::AppState;
use crate::verification::views;

const SESSION_NOT_FOUND_PAGE: &str = "Session not found. Please verify your credentials again.";

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub trust_score: u32,
    pub reasoning: String,
    pub badge: Badge,
    pub session_id: String,
}

impl VerifyResponse {
    fn new(result: AnalysisResult, session_id: String) -> Self {
        Self {
            trust_score: result.trust_score,
            reasoning: result.reasoning,
            badge: result.badge,
            session_id,
        }
    }
}

/// Logs the error and renders it as the HTML error view.
fn error_view(err: AppError) -> Response {
    err.log();
    views::error_page(err.status(), &err.user_message())
}

/// GET /
pub async fn handle_landing() -> Response {
    views::landing_page()
}

/// GET /verify
pub async fn handle_verify_form() -> Response {
    views::verify_form_page()
}

/// POST /verify
///
/// Form submission. Redirects (303) to the result page on success.
pub async fn handle_verify_submit(
    State(state): State<AppState>,
    Form(input): Form<AnalysisInput>,
) -> Response {
    match state.verifier.handle(&input).await {
        Ok((_, session_id)) => Redirect::to(&format!("/result/{session_id}")).into_response(),
        Err(e) => error_view(e),
    }
}

/// GET /result/:session_id
pub async fn handle_result_page(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.verifier.retrieve(&session_id).await {
        Ok(result) => views::result_page(&result, &session_id),
        Err(AppError::NotFound(_)) => {
            views::error_page(StatusCode::NOT_FOUND, SESSION_NOT_FOUND_PAGE)
        }
        Err(e) => error_view(e),
    }
}

/// POST /api/verify
pub async fn handle_verify_api(
    State(state): State<AppState>,
    Json(input): Json<AnalysisInput>,
) -> Result<Json<VerifyResponse>, AppError> {
    let (result, session_id) = state.verifier.handle(&input).await?;
    Ok(Json(VerifyResponse::new(result, session_id)))
}

/// GET /api/result/:session_id
pub async fn handle_result_api(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<VerifyResponse>, AppError> {
    let result = state.verifier.retrieve(&session_id).await?;
    Ok(Json(VerifyResponse::new(result, session_id)))
}
