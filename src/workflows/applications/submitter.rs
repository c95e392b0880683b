use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::domain::ApplicationFormData;
use crate::workflows::jobs::JobId;

pub const SUBMISSION_FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Outbound hook receiving completed applications.
#[async_trait]
pub trait ApplicationSubmitter: Send + Sync {
    async fn submit(
        &self,
        job_id: &JobId,
        data: &ApplicationFormData,
    ) -> Result<(), SubmissionError>;
}

/// Rejection reported by the submitter, optionally with a reason fit for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("submission rejected: {}", .reason.as_deref().unwrap_or("no reason given"))]
pub struct SubmissionError {
    pub reason: Option<String>,
}

impl SubmissionError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }

    pub fn user_message(&self) -> String {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .unwrap_or(SUBMISSION_FALLBACK_MESSAGE)
            .to_string()
    }
}

/// Snapshot of one call made to a [`RecordingSubmitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubmission {
    pub job_id: JobId,
    pub data: ApplicationFormData,
}

/// In-memory submitter that records every call and can be scripted to reject.
#[derive(Debug, Clone, Default)]
pub struct RecordingSubmitter {
    calls: Arc<Mutex<Vec<RecordedSubmission>>>,
    rejection: Option<SubmissionError>,
    latency: Duration,
}

impl RecordingSubmitter {
    pub fn accepting() -> Self {
        Self::default()
    }

    pub fn rejecting(error: SubmissionError) -> Self {
        Self {
            rejection: Some(error),
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<RecordedSubmission> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl ApplicationSubmitter for RecordingSubmitter {
    async fn submit(
        &self,
        job_id: &JobId,
        data: &ApplicationFormData,
    ) -> Result<(), SubmissionError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedSubmission {
                job_id: job_id.clone(),
                data: data.clone(),
            });

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match &self.rejection {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
