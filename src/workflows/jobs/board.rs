use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::{info, warn};

use super::domain::Job;
use super::filter::CriteriaPatch;
use super::state::FilterState;
use super::store::{JobStore, StoreError};

pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load jobs. Please try again later.";

/// Shared handle to a board owned by one browsing session.
pub type SharedJobBoard = Arc<Mutex<JobBoard>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// What happened to the result of a catalog fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was started before this one resolved.
    Superseded,
    /// The board was dropped before the fetch resolved.
    Discarded,
}

/// Browsing session state: catalog load status plus the filter state over it.
#[derive(Debug)]
pub struct JobBoard {
    load_state: LoadState,
    filters: FilterState,
    generation: u64,
}

impl Default for JobBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl JobBoard {
    pub fn new() -> Self {
        Self {
            load_state: LoadState::Loading,
            filters: FilterState::default(),
            generation: 0,
        }
    }

    pub fn shared(self) -> SharedJobBoard {
        Arc::new(Mutex::new(self))
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn visible_jobs(&self) -> Vec<&Job> {
        self.filters.visible_jobs()
    }

    /// `Ok` once a catalog has been applied; otherwise the reason the jobs cannot be shown.
    pub fn ready(&self) -> Result<(), StoreError> {
        match &self.load_state {
            LoadState::Ready => Ok(()),
            LoadState::Loading => Err(StoreError::Unavailable(
                "job catalog is still loading".to_string(),
            )),
            LoadState::Failed(message) => Err(StoreError::Unavailable(message.clone())),
        }
    }

    pub fn update_filters(&mut self, patch: CriteriaPatch) {
        self.filters.update(patch);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Marks the board as loading and returns the generation the result must match.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.load_state = LoadState::Loading;
        self.generation
    }

    pub fn finish_load(
        &mut self,
        generation: u64,
        result: Result<Arc<[Job]>, StoreError>,
    ) -> LoadOutcome {
        if generation != self.generation {
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(jobs) => {
                info!(jobs = jobs.len(), "job catalog loaded");
                self.filters.replace_jobs(jobs);
                self.load_state = LoadState::Ready;
            }
            Err(err) => {
                warn!(error = %err, "job catalog unavailable");
                self.load_state = LoadState::Failed(LOAD_FAILURE_MESSAGE.to_string());
            }
        }

        LoadOutcome::Applied
    }
}

/// Fetch the catalog and apply it to the board if the board is still alive.
///
/// Only a weak reference is held while the fetch is pending and no lock is held across the
/// await.
pub async fn load_board<S>(board: Weak<Mutex<JobBoard>>, store: &S) -> LoadOutcome
where
    S: JobStore + ?Sized,
{
    let Some(handle) = board.upgrade() else {
        return LoadOutcome::Discarded;
    };
    let generation = lock(&handle).begin_load();
    drop(handle);

    let result = store.fetch_all().await;

    let Some(handle) = board.upgrade() else {
        return LoadOutcome::Discarded;
    };
    let outcome = lock(&handle).finish_load(generation, result);
    outcome
}

fn lock(board: &Mutex<JobBoard>) -> std::sync::MutexGuard<'_, JobBoard> {
    board.lock().unwrap_or_else(PoisonError::into_inner)
}
