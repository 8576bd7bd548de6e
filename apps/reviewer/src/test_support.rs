//! In-memory `ReviewService` used by unit and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::models::cv::CvDescriptor;
use crate::models::review::{ReviewResult, SingleReview};
use crate::review_client::{ReviewService, ServiceError};

#[derive(Default)]
pub struct FakeReviewService {
    pub listings: HashMap<String, Vec<CvDescriptor>>,
    pub results: Vec<ReviewResult>,
    pub contents: HashMap<String, String>,
    pub batch_failure: Option<(u16, String)>,
    /// When set, `review_all` waits for a permit (or cancellation) before answering.
    pub gate: Option<Arc<Notify>>,
    pub batch_calls: AtomicUsize,
}

impl FakeReviewService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, source: &str, names: &[&str]) -> Self {
        let cvs = names
            .iter()
            .map(|name| CvDescriptor {
                name: name.to_string(),
                path: format!("cvs/{name}"),
                source: source.to_string(),
            })
            .collect();
        self.listings.insert(source.to_string(), cvs);
        self
    }

    pub fn with_results(mut self, results: &[(&str, f64)]) -> Self {
        self.results = results
            .iter()
            .map(|(name, score)| ReviewResult {
                cv_name: name.to_string(),
                cv_path: String::new(),
                fit_score: *score,
                review: format!("Review of {name}"),
            })
            .collect();
        self
    }

    pub fn with_content(mut self, path: &str, text: &str) -> Self {
        self.contents.insert(path.to_string(), text.to_string());
        self
    }

    pub fn failing_batch(mut self, status: u16, message: &str) -> Self {
        self.batch_failure = Some((status, message.to_string()));
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewService for FakeReviewService {
    async fn list_cvs(&self, source: &str) -> Result<Vec<CvDescriptor>, ServiceError> {
        self.listings
            .get(source)
            .cloned()
            .ok_or_else(|| ServiceError::Api {
                status: 422,
                message: format!("unknown source {source}"),
            })
    }

    async fn review_cv(
        &self,
        cv: &CvDescriptor,
        job_description: &str,
    ) -> Result<SingleReview, ServiceError> {
        Ok(SingleReview {
            cv_name: cv.name.clone(),
            review: format!("{} reviewed for: {}", cv.name, job_description),
            fit_score: None,
        })
    }

    async fn review_all(
        &self,
        _source: &str,
        _job_description: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<ReviewResult>, ServiceError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            tokio::select! {
                _ = cancel.cancelled() => return Err(ServiceError::Cancelled),
                _ = gate.notified() => {}
            }
        }

        if let Some((status, message)) = &self.batch_failure {
            return Err(ServiceError::Api {
                status: *status,
                message: message.clone(),
            });
        }

        Ok(self.results.clone())
    }

    async fn fetch_content(&self, _source: &str, path: &str) -> Result<String, ServiceError> {
        self.contents
            .get(path)
            .cloned()
            .ok_or_else(|| ServiceError::Api {
                status: 404,
                message: format!("no document at {path}"),
            })
    }
}
