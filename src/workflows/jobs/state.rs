use std::sync::Arc;

use tracing::debug;

use super::domain::Job;
use super::filter::{matching_indices, CriteriaPatch, FilterCriteria};

/// Current criteria plus the derived visible subset of the catalog.
///
/// The visible set is recomputed before every mutating call returns, so readers never
/// observe results for stale criteria.
#[derive(Debug, Clone)]
pub struct FilterState {
    jobs: Arc<[Job]>,
    criteria: FilterCriteria,
    visible: Vec<usize>,
    evaluations: u64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(Arc::from(Vec::new()))
    }
}

impl FilterState {
    pub fn new(jobs: Arc<[Job]>) -> Self {
        let mut state = Self {
            jobs,
            criteria: FilterCriteria::default(),
            visible: Vec::new(),
            evaluations: 0,
        };
        state.recompute();
        state
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn jobs(&self) -> &Arc<[Job]> {
        &self.jobs
    }

    pub fn visible_jobs(&self) -> Vec<&Job> {
        self.visible.iter().map(|&index| &self.jobs[index]).collect()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Number of times the filter has actually been evaluated.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    pub fn update(&mut self, patch: CriteriaPatch) {
        let mut next = self.criteria.clone();
        next.apply_patch(patch);
        if next == self.criteria {
            return;
        }

        self.criteria = next;
        self.recompute();
    }

    pub fn clear(&mut self) {
        if self.criteria == FilterCriteria::default() {
            return;
        }

        self.criteria = FilterCriteria::default();
        self.recompute();
    }

    pub fn replace_jobs(&mut self, jobs: Arc<[Job]>) {
        if Arc::ptr_eq(&self.jobs, &jobs) {
            return;
        }

        self.jobs = jobs;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = matching_indices(&self.jobs, &self.criteria);
        self.evaluations += 1;
        debug!(
            visible = self.visible.len(),
            total = self.jobs.len(),
            active = self.criteria.is_active(),
            "recomputed visible jobs"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::jobs::catalog::sample_catalog;
    use crate::workflows::jobs::domain::{ExperienceLevel, JobType};
    use crate::workflows::jobs::filter::filter_jobs;

    #[test]
    fn starts_with_every_job_visible() {
        let jobs = sample_catalog();
        let state = FilterState::new(jobs.clone());
        assert_eq!(state.visible_count(), jobs.len());
        assert_eq!(state.criteria(), &FilterCriteria::default());
    }

    #[test]
    fn update_recomputes_before_returning() {
        let jobs = sample_catalog();
        let mut state = FilterState::new(jobs.clone());

        state.update(CriteriaPatch::remote_only(true));
        let expected = filter_jobs(&jobs, state.criteria());
        assert_eq!(state.visible_jobs(), expected);
        assert!(state.visible_jobs().iter().all(|job| job.is_remote));

        state.update(CriteriaPatch::job_type(Some(JobType::Contract)));
        assert!(state.criteria().remote_only, "earlier fields are retained");
        assert!(state
            .visible_jobs()
            .iter()
            .all(|job| job.is_remote && job.job_type == JobType::Contract));
    }

    #[test]
    fn clear_restores_defaults_from_any_state() {
        let mut state = FilterState::new(sample_catalog());
        state.update(CriteriaPatch {
            search: Some("engineer".to_string()),
            location: Some("remote".to_string()),
            job_type: Some(Some(JobType::FullTime)),
            experience: Some(Some(ExperienceLevel::Lead)),
            remote_only: Some(true),
        });
        assert!(state.criteria().is_active());

        state.clear();
        assert_eq!(state.criteria(), &FilterCriteria::default());
        assert_eq!(state.visible_count(), state.jobs().len());
    }

    #[test]
    fn unchanged_inputs_skip_evaluation() {
        let jobs = sample_catalog();
        let mut state = FilterState::new(jobs.clone());
        let baseline = state.evaluations();

        state.update(CriteriaPatch::default());
        state.clear();
        state.replace_jobs(jobs.clone());
        assert_eq!(state.evaluations(), baseline);

        state.update(CriteriaPatch::search("designer"));
        state.update(CriteriaPatch::search("designer"));
        assert_eq!(state.evaluations(), baseline + 1);
    }

    #[test]
    fn replacing_catalog_reapplies_current_criteria() {
        let mut state = FilterState::default();
        state.update(CriteriaPatch::remote_only(true));
        assert_eq!(state.visible_count(), 0);

        let jobs = sample_catalog();
        let remote = jobs.iter().filter(|job| job.is_remote).count();
        state.replace_jobs(jobs);
        assert_eq!(state.visible_count(), remote);
    }
}
