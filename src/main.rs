use std::path::PathBuf;
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use nexus_jobs::config::AppConfig;
use nexus_jobs::error::AppError;
use nexus_jobs::telemetry;
use nexus_jobs::workflows::applications::{
    open_application, submit_application, ApplicationForm, Attachment, FormError,
    RecordingSubmitter, SubmissionError, SubmitOutcome, TextField, ValidationErrors, INVALID_FORM_MESSAGE,
};
use nexus_jobs::workflows::jobs::{
    job_detail, load_board, load_catalog, sample_catalog, CriteriaPatch, ExperienceLevel,
    InMemoryJobStore, Job, JobBoard, JobCardView, JobId, JobType,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "Nexus Jobs",
    about = "Browse, filter, and apply to developer job listings from the command line",
    version
)]
struct Cli {
    /// Load jobs from a .json or .csv catalog instead of the built-in sample
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Simulated backend latency in milliseconds
    #[arg(long, global = true)]
    latency_ms: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List jobs matching the given filters (default command)
    List(ListArgs),
    /// Show the full posting for one job
    Show(ShowArgs),
    /// Fill in and submit an application for one job
    Apply(ApplyArgs),
    /// Walk through browsing, filtering, and applying with the sample catalog
    Demo,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Case-insensitive match against job title or company
    #[arg(long)]
    search: Option<String>,
    /// Case-insensitive match against the job location
    #[arg(long)]
    location: Option<String>,
    /// Employment type (full-time, part-time, contract, freelance)
    #[arg(long = "type")]
    job_type: Option<JobType>,
    /// Experience level (entry, mid, senior, lead)
    #[arg(long)]
    experience: Option<ExperienceLevel>,
    /// Only include remote jobs
    #[arg(long)]
    remote: bool,
}

impl FilterArgs {
    fn patches(self) -> Vec<CriteriaPatch> {
        let mut patches = Vec::new();
        if let Some(search) = self.search {
            patches.push(CriteriaPatch::search(search));
        }
        if let Some(location) = self.location {
            patches.push(CriteriaPatch::location(location));
        }
        if self.job_type.is_some() {
            patches.push(CriteriaPatch::job_type(self.job_type));
        }
        if self.experience.is_some() {
            patches.push(CriteriaPatch::experience(self.experience));
        }
        if self.remote {
            patches.push(CriteriaPatch::remote_only(true));
        }
        patches
    }
}

#[derive(Args, Debug, Default)]
struct ListArgs {
    #[command(flatten)]
    filters: FilterArgs,
    /// Print the matching job cards as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Job identifier
    id: String,
    /// Print the job as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// Job identifier
    id: String,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    /// Resume file; only its name and size are read
    #[arg(long)]
    resume: Option<PathBuf>,
    /// Make the simulated backend reject the application with this reason
    #[arg(long)]
    reject: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(path) = cli.catalog {
        config.catalog.path = Some(path);
    }
    if let Some(latency_ms) = cli.latency_ms {
        config.catalog.latency = Duration::from_millis(latency_ms);
    }

    telemetry::init(&config.telemetry)?;
    info!(?config.environment, "nexus jobs starting");

    let command = cli
        .command
        .unwrap_or_else(|| Command::List(ListArgs::default()));

    match command {
        Command::List(args) => run_list(&config, args).await,
        Command::Show(args) => run_show(&config, args).await,
        Command::Apply(args) => run_apply(&config, args).await,
        Command::Demo => run_demo(&config).await,
    }
}

fn build_store(config: &AppConfig) -> Result<InMemoryJobStore, AppError> {
    let jobs = match &config.catalog.path {
        Some(path) => load_catalog(path)?,
        None => sample_catalog(),
    };
    Ok(InMemoryJobStore::new(jobs).with_latency(config.catalog.latency))
}

async fn run_list(config: &AppConfig, args: ListArgs) -> Result<(), AppError> {
    let store = build_store(config)?;
    let board = JobBoard::new().shared();
    load_board(Arc::downgrade(&board), &store).await;

    let mut board = board.lock().unwrap_or_else(PoisonError::into_inner);
    board.ready()?;

    for patch in args.filters.patches() {
        board.update_filters(patch);
    }

    let cards: Vec<JobCardView> = board.visible_jobs().into_iter().map(Job::card_view).collect();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    render_cards(&cards, board.filters().jobs().len());
    Ok(())
}

async fn run_show(config: &AppConfig, args: ShowArgs) -> Result<(), AppError> {
    let store = build_store(config)?;
    let job = job_detail(&store, &JobId::new(args.id)).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&job)?);
    } else {
        render_job_detail(&job);
    }
    Ok(())
}

async fn run_apply(config: &AppConfig, args: ApplyArgs) -> Result<(), AppError> {
    let store = build_store(config)?;
    let mut form = open_application(
        &store,
        &JobId::new(args.id),
        config.intake.attachment_policy(),
    )
    .await?;

    let fields = [
        (TextField::FirstName, args.first_name),
        (TextField::LastName, args.last_name),
        (TextField::Email, args.email),
        (TextField::Phone, args.phone),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            form.set_field(field, value)?;
        }
    }
    if let Some(path) = args.resume {
        form.attach_resume(Attachment::from_path(path)?)?;
    }

    let submitter = match args.reject {
        Some(reason) => RecordingSubmitter::rejecting(SubmissionError::rejected(reason)),
        None => RecordingSubmitter::accepting(),
    }
    .with_latency(config.catalog.latency);

    println!("Applying for {} at {}", form.job().title, form.job().company);
    let form = form.shared();
    let outcome = submit_application(Arc::downgrade(&form), &submitter).await;
    render_submit_outcome(&outcome);
    Ok(())
}

async fn run_demo(config: &AppConfig) -> Result<(), AppError> {
    let store = build_store(config)?;
    let board = JobBoard::new().shared();

    println!("Nexus Jobs walkthrough");
    println!("\nLoading catalog...");
    load_board(Arc::downgrade(&board), &store).await;

    let target = {
        let mut board = board.lock().unwrap_or_else(PoisonError::into_inner);
        board.ready()?;
        println!("{} jobs available", board.visible_jobs().len());

        board.update_filters(CriteriaPatch::remote_only(true));
        println!("\nRemote only: {} jobs", board.visible_jobs().len());
        for job in board.visible_jobs() {
            println!("- {} at {}", job.title, job.company);
        }

        board.clear_filters();
        board.update_filters(CriteriaPatch::search("rust"));
        println!("\nSearch \"rust\": {} jobs", board.visible_jobs().len());
        let target = board.visible_jobs().first().map(|job| job.id.clone());
        board.clear_filters();
        target
    };

    let Some(target) = target else {
        println!("\nNo job to apply for.");
        return Ok(());
    };

    let form = open_application(&store, &target, config.intake.attachment_policy())
        .await?
        .shared();
    let submitter = RecordingSubmitter::accepting().with_latency(Duration::from_millis(50));

    println!("\nSubmitting an empty application:");
    let outcome = submit_application(Arc::downgrade(&form), &submitter).await;
    render_submit_outcome(&outcome);

    {
        let mut form = form.lock().unwrap_or_else(PoisonError::into_inner);
        fill_demo_applicant(&mut form)?;
    }

    println!("\nSubmitting twice in quick succession:");
    let (first, second) = tokio::join!(
        submit_application(Arc::downgrade(&form), &submitter),
        submit_application(Arc::downgrade(&form), &submitter),
    );
    render_submit_outcome(&first);
    render_submit_outcome(&second);
    println!("Backend received {} submission(s)", submitter.call_count());
    Ok(())
}

fn fill_demo_applicant(form: &mut ApplicationForm) -> Result<(), FormError> {
    let entries = [
        (TextField::FirstName, "Grace"),
        (TextField::LastName, "Hopper"),
        (TextField::Email, "grace@example.com"),
        (TextField::Phone, "(555) 010-0199"),
    ];
    for (field, value) in entries {
        form.set_field(field, value)?;
    }
    form.attach_resume(Attachment::new("grace-hopper-cv.pdf", 182_000))
}

fn render_cards(cards: &[JobCardView], total: usize) {
    println!("Showing {} of {} jobs", cards.len(), total);
    if cards.is_empty() {
        println!("\nNo jobs match your filters.");
        return;
    }

    for card in cards {
        let remote = if card.remote { " | Remote" } else { "" };
        println!(
            "\n[{}] {} at {}\n    {} | {} | {} | {}{}",
            card.id,
            card.title,
            card.company,
            card.location,
            card.type_label,
            card.experience_label,
            card.salary_range,
            remote
        );
        if !card.highlighted_tags.is_empty() {
            println!("    tags: {}", card.highlighted_tags.join(", "));
        }
        println!("    posted {}", card.posted_date);
    }
}

fn render_job_detail(job: &Job) {
    println!("{}", job.title);
    println!("{} ({})", job.company, job.company_site());
    println!(
        "{} | {} | {} | {}",
        job.location,
        job.job_type.label(),
        job.experience.option_label(),
        job.salary_range
    );
    if job.is_remote {
        println!("Remote friendly");
    }
    println!("Posted {}", job.posted_date);
    if !job.tags.is_empty() {
        println!("Tags: {}", job.tags.join(", "));
    }

    if !job.description.is_empty() {
        println!("\n{}", job.description);
    }
    render_section("Responsibilities", &job.responsibilities);
    render_section("Requirements", &job.requirements);
    render_section("Benefits", &job.benefits);
}

fn render_section(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{title}");
    for item in items {
        println!("- {item}");
    }
}

fn render_submit_outcome(outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Submitted(receipt) => println!("{}", receipt.confirmation_message()),
        SubmitOutcome::Invalid(errors) => render_validation_errors(errors),
        SubmitOutcome::Failed(message) => println!("Submission failed: {message}"),
        SubmitOutcome::InFlight => println!("Already submitting; ignored."),
        SubmitOutcome::AlreadySubmitted => println!("Application was already submitted."),
        SubmitOutcome::Discarded => println!("Application closed before the result arrived."),
    }
}

fn render_validation_errors(errors: &ValidationErrors) {
    println!("{INVALID_FORM_MESSAGE}");
    for (field, message) in errors.iter() {
        println!("- {}: {}", field.label(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_jobs::workflows::applications::{FormPhase, SubmitAttempt};
    use nexus_jobs::workflows::jobs::StoreError;

    fn rust_role() -> Job {
        sample_catalog()
            .iter()
            .find(|job| job.id == JobId::new("2"))
            .cloned()
            .expect("sample job present")
    }

    #[test]
    fn demo_applicant_fills_a_valid_form() {
        let mut form = ApplicationForm::new(rust_role());
        fill_demo_applicant(&mut form).expect("fresh form is editable");

        assert!(form.validate());
        assert_eq!(form.phase(), FormPhase::Idle);
    }

    #[test]
    fn demo_applicant_reports_locked_form() {
        let mut form = ApplicationForm::new(rust_role());
        fill_demo_applicant(&mut form).expect("fresh form is editable");
        assert!(matches!(form.begin_submit(), SubmitAttempt::Ready(_)));

        assert_eq!(
            fill_demo_applicant(&mut form),
            Err(FormError::SubmissionInFlight)
        );
    }

    #[test]
    fn unloaded_catalog_becomes_an_error() {
        let mut board = JobBoard::new();
        let generation = board.begin_load();
        board.finish_load(
            generation,
            Err(StoreError::Unavailable("offline".to_string())),
        );

        let err = AppError::from(board.ready().expect_err("failed load is not ready"));
        assert!(matches!(err, AppError::Store(StoreError::Unavailable(_))));
        assert!(err.to_string().contains("Failed to load jobs"));
    }
}
