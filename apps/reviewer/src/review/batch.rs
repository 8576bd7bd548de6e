//! Batch review controller — lifecycle of the single in-flight "review all" call.
//!
//! `Idle → Running → {Completed | Cancelled | Failed} → Idle`
//!
//! The controller only holds state and the cancellation token. The network
//! call itself is driven by the review pipeline, which starts an operation
//! here, awaits the service on its own task without holding any lock, and
//! reports back through `finish` (or `abandon` if that task dies).

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::review_client::ServiceError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("job description cannot be empty")]
    EmptyJobDescription,

    #[error("a batch review is already running")]
    AlreadyRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPhase {
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Completed,
    Cancelled,
    Failed,
}

/// Everything the driver needs to issue the call for one started operation.
#[derive(Debug, Clone)]
pub struct BatchHandle {
    pub id: Uuid,
    pub source: String,
    pub job_description: String,
    pub token: CancellationToken,
}

#[derive(Debug)]
struct ActiveBatch {
    id: Uuid,
    source: String,
    token: CancellationToken,
    started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchStatus {
    pub phase: BatchPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub cancel_requested: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_outcome: Option<BatchOutcome>,
}

#[derive(Debug, Default)]
pub struct BatchController {
    active: Option<ActiveBatch>,
    last_outcome: Option<BatchOutcome>,
}

impl BatchController {
    pub fn phase(&self) -> BatchPhase {
        if self.is_running() {
            BatchPhase::Running
        } else {
            BatchPhase::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn last_outcome(&self) -> Option<BatchOutcome> {
        self.last_outcome
    }

    /// Moves to `Running` and hands out the token for the call.
    ///
    /// An empty job description is rejected before the concurrency check so
    /// the user gets the correctable error first; neither failure touches the
    /// running operation.
    pub fn start(&mut self, source: &str, job_description: &str) -> Result<BatchHandle, BatchError> {
        if job_description.trim().is_empty() {
            return Err(BatchError::EmptyJobDescription);
        }
        if self.active.is_some() {
            return Err(BatchError::AlreadyRunning);
        }

        let handle = BatchHandle {
            id: Uuid::new_v4(),
            source: source.to_string(),
            job_description: job_description.to_string(),
            token: CancellationToken::new(),
        };

        self.active = Some(ActiveBatch {
            id: handle.id,
            source: handle.source.clone(),
            token: handle.token.clone(),
            started_at: Utc::now(),
        });

        info!("Batch review {} started for source {}", handle.id, source);
        Ok(handle)
    }

    /// Signals cancellation to the running call. Returns whether a signal was
    /// sent; idle controllers and repeated requests are no-ops.
    pub fn cancel(&mut self) -> bool {
        match &self.active {
            Some(active) if !active.token.is_cancelled() => {
                info!("Cancellation requested for batch review {}", active.id);
                active.token.cancel();
                true
            }
            _ => false,
        }
    }

    /// Records the terminal state of operation `id` and returns to `Idle`.
    /// Reports for an operation that is not the active one are ignored.
    pub fn finish<T>(&mut self, id: Uuid, result: &Result<T, ServiceError>) -> Option<BatchOutcome> {
        match &self.active {
            Some(active) if active.id == id => {}
            _ => {
                warn!("Ignoring completion of inactive batch review {}", id);
                return None;
            }
        }
        self.active = None;

        let outcome = match result {
            Ok(_) => BatchOutcome::Completed,
            Err(err) if err.is_cancelled() => BatchOutcome::Cancelled,
            Err(_) => BatchOutcome::Failed,
        };
        info!("Batch review {} finished: {:?}", id, outcome);

        self.last_outcome = Some(outcome);
        Some(outcome)
    }

    /// Closes operation `id` as failed when its driver ended without
    /// reporting a result.
    pub fn abandon(&mut self, id: Uuid) -> Option<BatchOutcome> {
        match &self.active {
            Some(active) if active.id == id => {
                warn!("Batch review {} abandoned without a result", id);
                active.token.cancel();
                self.active = None;
                self.last_outcome = Some(BatchOutcome::Failed);
                self.last_outcome
            }
            _ => None,
        }
    }

    pub fn status(&self) -> BatchStatus {
        BatchStatus {
            phase: self.phase(),
            operation_id: self.active.as_ref().map(|a| a.id),
            source: self.active.as_ref().map(|a| a.source.clone()),
            started_at: self.active.as_ref().map(|a| a.started_at),
            cancel_requested: self
                .active
                .as_ref()
                .map(|a| a.token.is_cancelled())
                .unwrap_or(false),
            last_outcome: self.last_outcome(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_requires_job_description() {
        let mut controller = BatchController::default();
        assert_eq!(
            controller.start("gdrive", "   ").unwrap_err(),
            BatchError::EmptyJobDescription
        );
        assert_eq!(controller.phase(), BatchPhase::Idle);
    }

    #[test]
    fn test_second_start_rejected_and_first_untouched() {
        let mut controller = BatchController::default();
        let first = controller.start("gdrive", "Rust engineer").unwrap();

        let err = controller.start("github", "Go engineer").unwrap_err();
        assert_eq!(err, BatchError::AlreadyRunning);

        let status = controller.status();
        assert_eq!(status.phase, BatchPhase::Running);
        assert_eq!(status.operation_id, Some(first.id));
        assert_eq!(status.source.as_deref(), Some("gdrive"));
        assert!(!first.token.is_cancelled());
    }

    #[test]
    fn test_cancel_before_start_is_noop() {
        let mut controller = BatchController::default();
        assert!(!controller.cancel());
        assert_eq!(controller.status(), BatchController::default().status());
    }

    #[test]
    fn test_cancel_is_one_shot() {
        let mut controller = BatchController::default();
        let handle = controller.start("gdrive", "Rust engineer").unwrap();

        assert!(controller.cancel());
        assert!(handle.token.is_cancelled());
        assert!(controller.status().cancel_requested);
        assert!(!controller.cancel());
        // Cancellation is cooperative: still running until the call ends.
        assert!(controller.is_running());
    }

    #[test]
    fn test_finish_outcomes_return_to_idle() {
        let mut controller = BatchController::default();

        let handle = controller.start("gdrive", "jd").unwrap();
        let ok: Result<Vec<u32>, ServiceError> = Ok(vec![]);
        assert_eq!(controller.finish(handle.id, &ok), Some(BatchOutcome::Completed));
        assert_eq!(controller.phase(), BatchPhase::Idle);

        let handle = controller.start("gdrive", "jd").unwrap();
        let cancelled: Result<(), ServiceError> = Err(ServiceError::Cancelled);
        assert_eq!(
            controller.finish(handle.id, &cancelled),
            Some(BatchOutcome::Cancelled)
        );
        assert!(!controller.is_running());

        let handle = controller.start("gdrive", "jd").unwrap();
        let failed: Result<(), ServiceError> = Err(ServiceError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(controller.finish(handle.id, &failed), Some(BatchOutcome::Failed));
        assert_eq!(controller.last_outcome(), Some(BatchOutcome::Failed));
        assert!(controller.start("gdrive", "jd").is_ok());
    }

    #[test]
    fn test_cancel_after_terminal_is_noop() {
        let mut controller = BatchController::default();
        let handle = controller.start("gdrive", "jd").unwrap();
        let ok: Result<(), ServiceError> = Ok(());
        controller.finish(handle.id, &ok);

        assert!(!controller.cancel());
        assert!(!handle.token.is_cancelled());
    }

    #[test]
    fn test_abandon_returns_to_idle() {
        let mut controller = BatchController::default();
        let handle = controller.start("gdrive", "jd").unwrap();

        assert_eq!(controller.abandon(Uuid::new_v4()), None);
        assert!(controller.is_running());

        assert_eq!(controller.abandon(handle.id), Some(BatchOutcome::Failed));
        assert!(handle.token.is_cancelled());
        assert_eq!(controller.phase(), BatchPhase::Idle);
        assert!(controller.start("gdrive", "jd").is_ok());
    }

    #[test]
    fn test_finish_for_stale_operation_ignored() {
        let mut controller = BatchController::default();
        let handle = controller.start("gdrive", "jd").unwrap();
        let ok: Result<(), ServiceError> = Ok(());

        assert_eq!(controller.finish(Uuid::new_v4(), &ok), None);
        assert!(controller.is_running());
        assert_eq!(controller.finish(handle.id, &ok), Some(BatchOutcome::Completed));
    }
}
