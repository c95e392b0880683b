use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    PartTime,
    Contract,
    Freelance,
}

impl JobType {
    pub const fn ordered() -> [Self; 4] {
        [Self::FullTime, Self::PartTime, Self::Contract, Self::Freelance]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FullTime => "Full-Time",
            Self::PartTime => "Part-Time",
            Self::Contract => "Contract",
            Self::Freelance => "Freelance",
        }
    }
}

impl FromStr for JobType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ordered()
            .into_iter()
            .find(|kind| {
                kind.label().eq_ignore_ascii_case(wanted)
                    || kind.label().replace('-', "").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownVariant {
                kind: "job type",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Lead,
}

impl ExperienceLevel {
    pub const fn ordered() -> [Self; 4] {
        [Self::Entry, Self::Mid, Self::Senior, Self::Lead]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Entry => "Entry",
            Self::Mid => "Mid",
            Self::Senior => "Senior",
            Self::Lead => "Lead",
        }
    }

    /// Longer label shown next to filter options.
    pub const fn option_label(self) -> &'static str {
        match self {
            Self::Entry => "Entry Level",
            Self::Mid => "Mid Level",
            Self::Senior => "Senior Level",
            Self::Lead => "Lead / Manager",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ordered()
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                kind: "experience level",
                value: value.to_string(),
            })
    }
}

/// Raised when a label does not name any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Immutable job posting as supplied by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub location: String,
    pub salary_range: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub experience: ExperienceLevel,
    #[serde(default)]
    pub tags: Vec<String>,
    pub posted_date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub is_remote: bool,
}

impl Job {
    pub fn card_view(&self) -> JobCardView {
        JobCardView {
            id: self.id.clone(),
            title: self.title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
            salary_range: self.salary_range.clone(),
            type_label: self.job_type.label(),
            experience_label: self.experience.label(),
            remote: self.is_remote,
            highlighted_tags: self.tags.iter().take(2).cloned().collect(),
            posted_date: self.posted_date.clone(),
        }
    }

    /// Company domain derived the same way the detail page displays it.
    pub fn company_site(&self) -> String {
        let compact: String = self
            .company
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect();
        format!("{}.com", compact.to_lowercase())
    }
}

/// Compact listing entry rendered in result grids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobCardView {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary_range: String,
    pub type_label: &'static str,
    pub experience_label: &'static str,
    pub remote: bool,
    pub highlighted_tags: Vec<String>,
    pub posted_date: String,
}
