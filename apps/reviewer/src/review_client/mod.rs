/// Review client — the single point of entry for calls to the remote CV review service.
///
/// No other module talks to the service directly. Handlers and the session
/// depend on the `ReviewService` trait so tests can substitute a fake.
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::models::cv::CvDescriptor;
use crate::models::review::{ReviewResult, SingleReview};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Review service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Request cancelled")]
    Cancelled,
}

impl ServiceError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ServiceError::Cancelled)
    }
}

/// Operations offered by the remote review service.
///
/// Carried in `AppState` as `Arc<dyn ReviewService>`.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Lists the CVs stored in `source`. An empty list is a valid answer.
    async fn list_cvs(&self, source: &str) -> Result<Vec<CvDescriptor>, ServiceError>;

    async fn review_cv(
        &self,
        cv: &CvDescriptor,
        job_description: &str,
    ) -> Result<SingleReview, ServiceError>;

    /// Reviews every CV in `source`. Resolves to `ServiceError::Cancelled` once
    /// `cancel` fires before the service has answered.
    async fn review_all(
        &self,
        source: &str,
        job_description: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<ReviewResult>, ServiceError>;

    async fn fetch_content(&self, source: &str, path: &str) -> Result<String, ServiceError>;
}

#[derive(Debug, Serialize)]
struct ReviewRequest<'a> {
    name: &'a str,
    source: &'a str,
    path: &'a str,
    job_description: &'a str,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    detail: serde_json::Value,
}

/// HTTP implementation of `ReviewService`.
#[derive(Clone)]
pub struct ReviewClient {
    client: Client,
    base_url: String,
}

impl ReviewClient {
    pub fn new(base_url: String, timeout: Option<std::time::Duration>) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and turns non-success statuses into `ServiceError::Api`.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ServiceError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Review service returned {}: {}", status, body);
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = self.send(request).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(ServiceError::Parse)
    }
}

#[async_trait]
impl ReviewService for ReviewClient {
    async fn list_cvs(&self, source: &str) -> Result<Vec<CvDescriptor>, ServiceError> {
        let request = self.client.get(self.url("/cvs")).query(&[("source", source)]);
        let cvs: Vec<CvDescriptor> = self.send_json(request).await?;
        debug!("Listed {} CVs from source {}", cvs.len(), source);
        Ok(cvs)
    }

    async fn review_cv(
        &self,
        cv: &CvDescriptor,
        job_description: &str,
    ) -> Result<SingleReview, ServiceError> {
        let body = ReviewRequest {
            name: &cv.name,
            source: &cv.source,
            path: &cv.path,
            job_description,
        };
        let request = self.client.post(self.url("/review")).json(&body);
        self.send_json(request).await
    }

    async fn review_all(
        &self,
        source: &str,
        job_description: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<ReviewResult>, ServiceError> {
        // The service expects the job description as a bare JSON string.
        let request = self
            .client
            .post(self.url("/review_all"))
            .query(&[("source", source)])
            .json(&job_description);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Batch review for source {} cancelled", source);
                Err(ServiceError::Cancelled)
            }
            results = self.send_json::<Vec<ReviewResult>>(request) => results,
        }
    }

    async fn fetch_content(&self, source: &str, path: &str) -> Result<String, ServiceError> {
        let request = self
            .client
            .get(self.url("/cv_content"))
            .query(&[("source", source), ("path", path)]);
        let response = self.send(request).await?;
        Ok(response.text().await?)
    }
}

/// Pulls a readable message out of an error body. FastAPI-style services answer
/// with `{"detail": ...}`; anything else is passed through verbatim.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ServiceErrorBody>(body) {
        Ok(ServiceErrorBody {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(ServiceErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
