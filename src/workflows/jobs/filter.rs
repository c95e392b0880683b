use super::domain::{ExperienceLevel, Job, JobType};

/// Active constraints applied to the job catalog.
///
/// Empty text and `None` selections mean "no constraint"; they never match against an empty
/// value on the job itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub location: String,
    pub job_type: Option<JobType>,
    pub experience: Option<ExperienceLevel>,
    pub remote_only: bool,
}

impl FilterCriteria {
    pub fn is_active(&self) -> bool {
        !self.search.is_empty()
            || !self.location.is_empty()
            || self.job_type.is_some()
            || self.experience.is_some()
            || self.remote_only
    }

    pub fn matches(&self, job: &Job) -> bool {
        let matches_search = self.search.is_empty()
            || contains_ignore_case(&job.title, &self.search)
            || contains_ignore_case(&job.company, &self.search);

        let matches_location =
            self.location.is_empty() || contains_ignore_case(&job.location, &self.location);

        let matches_type = self.job_type.map_or(true, |wanted| job.job_type == wanted);

        let matches_experience = self
            .experience
            .map_or(true, |wanted| job.experience == wanted);

        let matches_remote = !self.remote_only || job.is_remote;

        matches_search && matches_location && matches_type && matches_experience && matches_remote
    }

    /// Shallow field-level merge; fields left as `None` in the patch are retained.
    pub fn apply_patch(&mut self, patch: CriteriaPatch) {
        let CriteriaPatch {
            search,
            location,
            job_type,
            experience,
            remote_only,
        } = patch;

        if let Some(search) = search {
            self.search = search;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(job_type) = job_type {
            self.job_type = job_type;
        }
        if let Some(experience) = experience {
            self.experience = experience;
        }
        if let Some(remote_only) = remote_only {
            self.remote_only = remote_only;
        }
    }
}

/// Partial update for [`FilterCriteria`].
///
/// The nested options on the select fields distinguish "leave unchanged" (`None`) from
/// "reset to any" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaPatch {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<Option<JobType>>,
    pub experience: Option<Option<ExperienceLevel>>,
    pub remote_only: Option<bool>,
}

impl CriteriaPatch {
    pub fn search(value: impl Into<String>) -> Self {
        Self {
            search: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn location(value: impl Into<String>) -> Self {
        Self {
            location: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn job_type(value: Option<JobType>) -> Self {
        Self {
            job_type: Some(value),
            ..Self::default()
        }
    }

    pub fn experience(value: Option<ExperienceLevel>) -> Self {
        Self {
            experience: Some(value),
            ..Self::default()
        }
    }

    pub fn remote_only(value: bool) -> Self {
        Self {
            remote_only: Some(value),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Stable filter over the catalog; relative order of the input is preserved.
pub fn filter_jobs<'a>(jobs: &'a [Job], criteria: &FilterCriteria) -> Vec<&'a Job> {
    jobs.iter().filter(|job| criteria.matches(job)).collect()
}

pub(crate) fn matching_indices(jobs: &[Job], criteria: &FilterCriteria) -> Vec<usize> {
    jobs.iter()
        .enumerate()
        .filter(|(_, job)| criteria.matches(job))
        .map(|(index, _)| index)
        .collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::jobs::domain::JobId;

    fn job(
        id: &str,
        title: &str,
        company: &str,
        location: &str,
        job_type: JobType,
        experience: ExperienceLevel,
        is_remote: bool,
    ) -> Job {
        Job {
            id: JobId::new(id),
            title: title.to_string(),
            company: company.to_string(),
            logo: None,
            location: location.to_string(),
            salary_range: "$100k - $120k".to_string(),
            job_type,
            experience,
            tags: Vec::new(),
            posted_date: "1 day ago".to_string(),
            description: String::new(),
            responsibilities: Vec::new(),
            requirements: Vec::new(),
            benefits: Vec::new(),
            is_remote,
        }
    }

    fn scenario_jobs() -> Vec<Job> {
        vec![
            job(
                "1",
                "Backend Engineer",
                "Acme",
                "Remote",
                JobType::FullTime,
                ExperienceLevel::Senior,
                true,
            ),
            job(
                "2",
                "Designer",
                "Acme",
                "NYC",
                JobType::Contract,
                ExperienceLevel::Mid,
                false,
            ),
        ]
    }

    fn ids(jobs: &[&Job]) -> Vec<String> {
        jobs.iter().map(|job| job.id.0.clone()).collect()
    }

    #[test]
    fn empty_criteria_is_identity() {
        let jobs = scenario_jobs();
        let criteria = FilterCriteria::default();
        assert!(!criteria.is_active());

        let filtered = filter_jobs(&jobs, &criteria);
        assert_eq!(filtered.len(), jobs.len());
        assert!(filtered.iter().zip(jobs.iter()).all(|(a, b)| *a == b));
    }

    #[test]
    fn remote_only_keeps_remote_jobs() {
        let jobs = scenario_jobs();
        let criteria = FilterCriteria {
            remote_only: true,
            ..FilterCriteria::default()
        };

        assert_eq!(ids(&filter_jobs(&jobs, &criteria)), vec!["1"]);
    }

    #[test]
    fn search_matches_title_or_company_case_insensitively() {
        let jobs = scenario_jobs();

        let by_title = FilterCriteria {
            search: "BACKEND".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &by_title)), vec!["1"]);

        let by_company = FilterCriteria {
            search: "acm".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &by_company)), vec!["1", "2"]);

        let by_location_only = FilterCriteria {
            search: "nyc".to_string(),
            ..FilterCriteria::default()
        };
        assert!(filter_jobs(&jobs, &by_location_only).is_empty());
    }

    #[test]
    fn location_is_substring_match() {
        let jobs = scenario_jobs();
        let criteria = FilterCriteria {
            location: "ny".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &criteria)), vec!["2"]);
    }

    #[test]
    fn type_mismatch_excludes_regardless_of_other_fields() {
        let jobs = scenario_jobs();
        let criteria = FilterCriteria {
            search: "acme".to_string(),
            location: "".to_string(),
            job_type: Some(JobType::Freelance),
            experience: None,
            remote_only: false,
        };
        assert!(filter_jobs(&jobs, &criteria).is_empty());
    }

    #[test]
    fn all_constraints_combine_conjunctively() {
        let jobs = scenario_jobs();
        let criteria = FilterCriteria {
            search: "designer".to_string(),
            location: "nyc".to_string(),
            job_type: Some(JobType::Contract),
            experience: Some(ExperienceLevel::Mid),
            remote_only: false,
        };
        assert_eq!(ids(&filter_jobs(&jobs, &criteria)), vec!["2"]);

        let mismatched_level = FilterCriteria {
            experience: Some(ExperienceLevel::Lead),
            ..criteria
        };
        assert!(filter_jobs(&jobs, &mismatched_level).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let jobs = scenario_jobs();
        let criteria = FilterCriteria {
            search: "e".to_string(),
            experience: Some(ExperienceLevel::Senior),
            ..FilterCriteria::default()
        };

        let once: Vec<Job> = filter_jobs(&jobs, &criteria).into_iter().cloned().collect();
        let twice: Vec<Job> = filter_jobs(&once, &criteria).into_iter().cloned().collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_catalog_yields_empty_result() {
        let criteria = FilterCriteria {
            remote_only: true,
            ..FilterCriteria::default()
        };
        assert!(filter_jobs(&[], &criteria).is_empty());
    }

    #[test]
    fn patch_overwrites_only_given_fields() {
        let mut criteria = FilterCriteria {
            search: "rust".to_string(),
            job_type: Some(JobType::Contract),
            ..FilterCriteria::default()
        };

        criteria.apply_patch(CriteriaPatch::location("Remote"));
        assert_eq!(criteria.search, "rust");
        assert_eq!(criteria.location, "Remote");
        assert_eq!(criteria.job_type, Some(JobType::Contract));

        criteria.apply_patch(CriteriaPatch::job_type(None));
        assert_eq!(criteria.job_type, None);
        assert!(CriteriaPatch::default().is_empty());
    }
}
