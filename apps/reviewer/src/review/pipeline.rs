//! Review pipeline: single reviews and the batch review driver.
//!
//! batch: controller.start → spawned driver: service.review_all (lock
//!        released) → controller.finish + render, committed under one lock.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::catalog::naming::display_name;
use crate::errors::AppError;
use crate::models::cv::CvDescriptor;
use crate::review::batch::{BatchHandle, BatchOutcome};
use crate::review::presentation::ResultsView;
use crate::review_client::{ReviewService, ServiceError};
use crate::session::SharedSession;

pub const CANCELLED_NOTICE: &str = "Review process stopped by user.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub operation_id: Uuid,
    pub status: BatchOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ResultsView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleReviewReport {
    pub cv_name: String,
    pub display_name: String,
    pub review: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_score: Option<f64>,
}

/// Runs one batch review to its terminal state.
///
/// Completed and cancelled batches are both `Ok`; a cancelled batch carries a
/// notice instead of a view. Any other failure is returned as an error.
///
/// The service call and the commit run on their own task, so the controller
/// gets back to idle even when the caller's future is dropped mid-flight
/// (client disconnect). The batch then still completes, or stops on cancel.
pub async fn run_batch_review(
    session: &SharedSession,
    service: Arc<dyn ReviewService>,
    source: &str,
    job_description: &str,
) -> Result<BatchReport, AppError> {
    require_source(source)?;

    let handle = {
        let mut session = session.lock().await;
        let handle = session.batch.start(source, job_description)?;
        session.clear_results();
        handle
    };
    let id = handle.id;

    let driver = tokio::spawn(drive_batch(session.clone(), service, handle));

    match driver.await {
        Ok(report) => report,
        Err(err) => {
            error!("Batch review {} driver ended abnormally: {}", id, err);
            session.lock().await.batch.abandon(id);
            Err(AppError::Internal(anyhow::Error::new(err)))
        }
    }
}

async fn drive_batch(
    session: SharedSession,
    service: Arc<dyn ReviewService>,
    handle: BatchHandle,
) -> Result<BatchReport, AppError> {
    let result = service
        .review_all(&handle.source, &handle.job_description, handle.token.clone())
        .await;

    let mut guard = session.lock().await;
    guard.batch.finish(handle.id, &result);

    match result {
        Ok(results) => {
            info!(
                "Batch review {} returned {} results",
                handle.id,
                results.len()
            );
            let view = guard.show_results(&handle.source, &results);
            Ok(BatchReport {
                operation_id: handle.id,
                status: BatchOutcome::Completed,
                notice: None,
                view: Some(view),
            })
        }
        Err(ServiceError::Cancelled) => Ok(BatchReport {
            operation_id: handle.id,
            status: BatchOutcome::Cancelled,
            notice: Some(CANCELLED_NOTICE.to_string()),
            view: None,
        }),
        Err(err) => {
            warn!("Batch review {} failed: {}", handle.id, err);
            Err(AppError::Service(err))
        }
    }
}

/// Signals the running batch to stop. Returns whether anything was signalled.
pub async fn cancel_batch(session: &SharedSession) -> bool {
    session.lock().await.batch.cancel()
}

pub async fn review_single(
    service: &dyn ReviewService,
    cv: &CvDescriptor,
    job_description: &str,
) -> Result<SingleReviewReport, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job description cannot be empty".to_string(),
        ));
    }
    require_source(&cv.source)?;

    let review = service.review_cv(cv, job_description).await?;

    Ok(SingleReviewReport {
        display_name: display_name(&review.cv_name, &cv.path),
        cv_name: review.cv_name,
        review: review.review,
        fit_score: review.fit_score,
    })
}

pub fn require_source(source: &str) -> Result<(), AppError> {
    if source.trim().is_empty() {
        return Err(AppError::Validation("source cannot be empty".to_string()));
    }
    Ok(())
}
