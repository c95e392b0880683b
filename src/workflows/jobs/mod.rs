//! Job catalog access, multi-criteria filtering, and browsing session state.

pub mod board;
pub mod catalog;
pub mod domain;
pub mod filter;
pub mod state;
pub mod store;

pub use board::{load_board, JobBoard, LoadOutcome, LoadState, SharedJobBoard};
pub use catalog::{load_catalog, read_catalog, sample_catalog, CatalogError, CatalogFormat};
pub use domain::{ExperienceLevel, Job, JobCardView, JobId, JobType, UnknownVariant};
pub use filter::{filter_jobs, CriteriaPatch, FilterCriteria};
pub use state::FilterState;
pub use store::{job_detail, InMemoryJobStore, JobLookupError, JobStore, StoreError};
