//! Axum route handlers for the Review API.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::cv::CvDescriptor;
use crate::review::batch::BatchStatus;
use crate::review::export::{export, ExportFormat};
use crate::review::pipeline::{
    cancel_batch, review_single, run_batch_review, BatchReport, SingleReviewReport,
};
use crate::review::presentation::ResultsView;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SingleReviewRequest {
    #[serde(flatten)]
    pub cv: CvDescriptor,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchReviewRequest {
    pub source: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reviews
pub async fn handle_review_one(
    State(state): State<AppState>,
    Json(request): Json<SingleReviewRequest>,
) -> Result<Json<SingleReviewReport>, AppError> {
    let report = review_single(state.service.as_ref(), &request.cv, &request.job_description).await?;
    Ok(Json(report))
}

/// POST /api/v1/reviews/batch
///
/// Reviews every CV of a source and answers once the batch reaches a terminal
/// state. Cancelled batches answer 200 with a notice.
pub async fn handle_review_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchReviewRequest>,
) -> Result<Json<BatchReport>, AppError> {
    let report = run_batch_review(
        &state.session,
        state.service.clone(),
        &request.source,
        &request.job_description,
    )
    .await?;
    Ok(Json(report))
}

/// POST /api/v1/reviews/batch/cancel
pub async fn handle_cancel_batch(State(state): State<AppState>) -> Json<CancelResponse> {
    Json(CancelResponse {
        cancelled: cancel_batch(&state.session).await,
    })
}

/// GET /api/v1/reviews/batch/status
pub async fn handle_batch_status(State(state): State<AppState>) -> Json<BatchStatus> {
    Json(state.session.lock().await.batch.status())
}

/// GET /api/v1/rankings
pub async fn handle_rankings(State(state): State<AppState>) -> Json<ResultsView> {
    let session = state.session.lock().await;
    let view = session
        .displayed()
        .map(|d| d.view.clone())
        .unwrap_or_else(ResultsView::empty);
    Json(view)
}

/// GET /api/v1/rankings/export?format=json|csv
pub async fn handle_export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let body = {
        let session = state.session.lock().await;
        let ranked = session
            .displayed_ranking()
            .ok_or_else(|| AppError::NotFound("No ranked results to export".to_string()))?;
        export(ranked, query.format)?
    };

    let format = query.format;
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", format.file_name()),
            ),
        ],
        body,
    ))
}
