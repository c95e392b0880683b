use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use super::domain::{ExperienceLevel, Job, JobId, JobType};

/// Errors raised while importing a job catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read job catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON job catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV job catalog: {0}")]
    Csv(#[from] csv::Error),
    #[error("job catalog contains duplicate id '{0}'")]
    DuplicateId(JobId),
    #[error("unsupported catalog format '{0}' (expected .json or .csv)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Csv,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(CatalogError::UnsupportedFormat(extension)),
        }
    }
}

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Arc<[Job]>, CatalogError> {
    let path = path.as_ref();
    let format = CatalogFormat::from_path(path)?;
    let file = std::fs::File::open(path)?;
    read_catalog(file, format)
}

pub fn read_catalog<R: Read>(reader: R, format: CatalogFormat) -> Result<Arc<[Job]>, CatalogError> {
    let jobs = match format {
        CatalogFormat::Json => serde_json::from_reader::<_, Vec<Job>>(reader)?,
        CatalogFormat::Csv => parse_csv(reader)?,
    };

    ensure_unique_ids(&jobs)?;
    Ok(Arc::from(jobs))
}

fn ensure_unique_ids(jobs: &[Job]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(jobs.len());
    for job in jobs {
        if !seen.insert(&job.id) {
            return Err(CatalogError::DuplicateId(job.id.clone()));
        }
    }
    Ok(())
}

fn parse_csv<R: Read>(reader: R) -> Result<Vec<Job>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut jobs = Vec::new();

    for record in csv_reader.deserialize::<CatalogRow>() {
        jobs.push(record?.into_job());
    }

    Ok(jobs)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogRow {
    id: String,
    title: String,
    company: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    logo: Option<String>,
    location: String,
    salary_range: String,
    #[serde(rename = "type")]
    job_type: JobType,
    experience: ExperienceLevel,
    #[serde(default)]
    tags: String,
    posted_date: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    responsibilities: String,
    #[serde(default)]
    requirements: String,
    #[serde(default)]
    benefits: String,
    is_remote: bool,
}

impl CatalogRow {
    fn into_job(self) -> Job {
        Job {
            id: JobId(self.id),
            title: self.title,
            company: self.company,
            logo: self.logo,
            location: self.location,
            salary_range: self.salary_range,
            job_type: self.job_type,
            experience: self.experience,
            tags: split_list(&self.tags),
            posted_date: self.posted_date,
            description: self.description,
            responsibilities: split_list(&self.responsibilities),
            requirements: split_list(&self.requirements),
            benefits: split_list(&self.benefits),
            is_remote: self.is_remote,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Built-in catalog used when no external catalog is configured.
pub fn sample_catalog() -> Arc<[Job]> {
    let jobs = vec![
        sample_job(SampleJob {
            id: "1",
            title: "Senior Frontend Engineer",
            company: "Vercel",
            location: "San Francisco, CA",
            salary_range: "$160k - $210k",
            job_type: JobType::FullTime,
            experience: ExperienceLevel::Senior,
            tags: &["React", "TypeScript", "Next.js"],
            posted_date: "2 days ago",
            description: "Build the interfaces developers use to ship to the edge.",
            is_remote: true,
        }),
        sample_job(SampleJob {
            id: "2",
            title: "Backend Engineer (Rust)",
            company: "Cloudflare",
            location: "Austin, TX",
            salary_range: "$140k - $185k",
            job_type: JobType::FullTime,
            experience: ExperienceLevel::Mid,
            tags: &["Rust", "Distributed Systems", "Networking"],
            posted_date: "1 week ago",
            description: "Own request-path services handling millions of requests per second.",
            is_remote: false,
        }),
        sample_job(SampleJob {
            id: "3",
            title: "Product Designer",
            company: "Linear",
            location: "Remote",
            salary_range: "$120k - $150k",
            job_type: JobType::Contract,
            experience: ExperienceLevel::Mid,
            tags: &["Figma", "Design Systems"],
            posted_date: "3 days ago",
            description: "Shape the workflows of fast-moving product teams.",
            is_remote: true,
        }),
        sample_job(SampleJob {
            id: "4",
            title: "Junior Full Stack Developer",
            company: "Shopify",
            location: "Toronto, ON",
            salary_range: "$75k - $95k",
            job_type: JobType::FullTime,
            experience: ExperienceLevel::Entry,
            tags: &["Ruby", "React", "GraphQL"],
            posted_date: "5 days ago",
            description: "Ship merchant-facing features with a supportive mentorship program.",
            is_remote: false,
        }),
        sample_job(SampleJob {
            id: "5",
            title: "Engineering Manager, Platform",
            company: "Stripe",
            location: "New York, NY",
            salary_range: "$220k - $280k",
            job_type: JobType::FullTime,
            experience: ExperienceLevel::Lead,
            tags: &["Leadership", "Infrastructure"],
            posted_date: "Just now",
            description: "Lead the team that keeps payment infrastructure reliable.",
            is_remote: false,
        }),
        sample_job(SampleJob {
            id: "6",
            title: "Technical Writer",
            company: "Supabase",
            location: "Remote",
            salary_range: "$60 - $80 / hr",
            job_type: JobType::Freelance,
            experience: ExperienceLevel::Mid,
            tags: &["Documentation", "Postgres"],
            posted_date: "2 weeks ago",
            description: "Write guides that turn first-time users into power users.",
            is_remote: true,
        }),
        sample_job(SampleJob {
            id: "7",
            title: "DevOps Engineer",
            company: "GitLab",
            location: "Remote",
            salary_range: "$70 - $90 / hr",
            job_type: JobType::Contract,
            experience: ExperienceLevel::Senior,
            tags: &["Kubernetes", "Terraform", "CI/CD"],
            posted_date: "4 days ago",
            description: "Harden deployment pipelines across a fully distributed company.",
            is_remote: true,
        }),
        sample_job(SampleJob {
            id: "8",
            title: "Mobile Developer",
            company: "Duolingo",
            location: "Pittsburgh, PA",
            salary_range: "$45k - $60k",
            job_type: JobType::PartTime,
            experience: ExperienceLevel::Entry,
            tags: &["Swift", "Kotlin"],
            posted_date: "6 days ago",
            description: "Build delightful learning experiences on iOS and Android.",
            is_remote: false,
        }),
    ];

    Arc::from(jobs)
}

struct SampleJob {
    id: &'static str,
    title: &'static str,
    company: &'static str,
    location: &'static str,
    salary_range: &'static str,
    job_type: JobType,
    experience: ExperienceLevel,
    tags: &'static [&'static str],
    posted_date: &'static str,
    description: &'static str,
    is_remote: bool,
}

fn sample_job(sample: SampleJob) -> Job {
    Job {
        id: JobId::new(sample.id),
        title: sample.title.to_string(),
        company: sample.company.to_string(),
        logo: None,
        location: sample.location.to_string(),
        salary_range: sample.salary_range.to_string(),
        job_type: sample.job_type,
        experience: sample.experience,
        tags: sample.tags.iter().map(|tag| tag.to_string()).collect(),
        posted_date: sample.posted_date.to_string(),
        description: sample.description.to_string(),
        responsibilities: vec![
            "Collaborate with product and design on roadmap priorities".to_string(),
            "Review code and mentor teammates".to_string(),
        ],
        requirements: vec![format!(
            "Demonstrated experience at the {} level",
            sample.experience.option_label().to_lowercase()
        )],
        benefits: vec![
            "Health, dental, and vision coverage".to_string(),
            "Annual learning stipend".to_string(),
        ],
        is_remote: sample.is_remote,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CSV: &str = "id,title,company,logo,location,salaryRange,type,experience,tags,postedDate,description,responsibilities,requirements,benefits,isRemote\n\
1,Data Engineer,Snowflake,,Remote,$150k,Full-Time,Senior,SQL | Python,1 day ago,Pipelines,Build ETL|Own SLAs,5 years,401k,true\n\
2,QA Analyst,Atlassian,https://logo.example/a.png,Sydney,$90k,Part-Time,Entry,,2 days ago,,,,,false\n";

    #[test]
    fn sample_catalog_has_unique_ids() {
        let jobs = sample_catalog();
        assert!(ensure_unique_ids(&jobs).is_ok());
        assert!(jobs.iter().any(|job| job.is_remote));
        assert!(jobs.iter().any(|job| !job.is_remote));
    }

    #[test]
    fn csv_rows_split_list_columns_and_blank_logo() {
        let jobs = read_catalog(Cursor::new(CSV), CatalogFormat::Csv).expect("csv parses");
        assert_eq!(jobs.len(), 2);

        let first = &jobs[0];
        assert_eq!(first.tags, vec!["SQL", "Python"]);
        assert_eq!(first.responsibilities, vec!["Build ETL", "Own SLAs"]);
        assert!(first.logo.is_none());
        assert!(first.is_remote);

        let second = &jobs[1];
        assert_eq!(second.job_type, JobType::PartTime);
        assert_eq!(second.logo.as_deref(), Some("https://logo.example/a.png"));
        assert!(second.tags.is_empty());
    }

    #[test]
    fn json_catalog_rejects_duplicate_ids() {
        let job = serde_json::to_value(&sample_catalog()[0]).expect("serialize");
        let raw = serde_json::to_string(&vec![job.clone(), job]).expect("serialize list");

        match read_catalog(Cursor::new(raw), CatalogFormat::Json) {
            Err(CatalogError::DuplicateId(id)) => assert_eq!(id, JobId::new("1")),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn format_is_detected_from_extension() {
        assert_eq!(
            CatalogFormat::from_path(Path::new("jobs.JSON")).expect("json"),
            CatalogFormat::Json
        );
        assert!(matches!(
            CatalogFormat::from_path(Path::new("jobs.yaml")),
            Err(CatalogError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        match load_catalog("./does-not-exist.json") {
            Err(CatalogError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
