use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::domain::{Job, JobId};

/// Data access facade over the job collection.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Arc<[Job]>, StoreError>;
    async fn fetch_by_id(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
}

/// Retrieval failure; the caller may retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("job data unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of a single-job lookup where "missing" is distinct from "unreachable".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobLookupError {
    #[error("job '{0}' not found")]
    NotFound(JobId),
    #[error(transparent)]
    Unavailable(#[from] StoreError),
}

pub async fn job_detail<S>(store: &S, id: &JobId) -> Result<Job, JobLookupError>
where
    S: JobStore + ?Sized,
{
    store
        .fetch_by_id(id)
        .await?
        .ok_or_else(|| JobLookupError::NotFound(id.clone()))
}

/// Store backed by a fixed catalog with an optional simulated network delay.
#[derive(Debug, Clone)]
pub struct InMemoryJobStore {
    jobs: Arc<[Job]>,
    latency: Duration,
}

impl InMemoryJobStore {
    pub fn new(jobs: Arc<[Job]>) -> Self {
        Self {
            jobs,
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn fetch_all(&self) -> Result<Arc<[Job]>, StoreError> {
        self.simulate_latency().await;
        Ok(Arc::clone(&self.jobs))
    }

    async fn fetch_by_id(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        self.simulate_latency().await;
        Ok(self.jobs.iter().find(|job| &job.id == id).cloned())
    }
}
