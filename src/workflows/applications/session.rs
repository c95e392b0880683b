use std::sync::{Mutex, MutexGuard, PoisonError, Weak};

use super::domain::{SubmissionReceipt, ValidationErrors};
use super::form::{ApplicationForm, Completion, SubmitAttempt};
use super::submitter::ApplicationSubmitter;
use super::validation::AttachmentPolicy;
use crate::workflows::jobs::{job_detail, JobId, JobLookupError, JobStore};

/// Terminal answer for one submit click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(SubmissionReceipt),
    Invalid(ValidationErrors),
    Failed(String),
    /// Another submission for the same form was already running.
    InFlight,
    AlreadySubmitted,
    /// The form went away before the submitter answered.
    Discarded,
}

/// Look up the job and open an empty form for it.
pub async fn open_application<S>(
    store: &S,
    job_id: &JobId,
    policy: AttachmentPolicy,
) -> Result<ApplicationForm, JobLookupError>
where
    S: JobStore + ?Sized,
{
    let job = job_detail(store, job_id).await?;
    Ok(ApplicationForm::with_policy(job, policy))
}

/// Drive one submit click from validation to the submitter's answer.
///
/// The form is only reachable through a weak handle while the submitter is pending, and no
/// lock is held across the await.
pub async fn submit_application<S>(form: Weak<Mutex<ApplicationForm>>, submitter: &S) -> SubmitOutcome
where
    S: ApplicationSubmitter + ?Sized,
{
    let Some(handle) = form.upgrade() else {
        return SubmitOutcome::Discarded;
    };
    let attempt = lock(&handle).begin_submit();
    drop(handle);

    let ticket = match attempt {
        SubmitAttempt::Ready(ticket) => ticket,
        SubmitAttempt::Invalid(errors) => return SubmitOutcome::Invalid(errors),
        SubmitAttempt::InFlight => return SubmitOutcome::InFlight,
        SubmitAttempt::AlreadySubmitted => return SubmitOutcome::AlreadySubmitted,
    };

    let result = submitter.submit(ticket.job_id(), ticket.data()).await;

    let Some(handle) = form.upgrade() else {
        return SubmitOutcome::Discarded;
    };
    let completion = lock(&handle).complete_submit(ticket, result);

    match completion {
        Completion::Submitted(receipt) => SubmitOutcome::Submitted(receipt),
        Completion::Failed(message) => SubmitOutcome::Failed(message),
        Completion::Stale => SubmitOutcome::Discarded,
    }
}

fn lock(form: &Mutex<ApplicationForm>) -> MutexGuard<'_, ApplicationForm> {
    form.lock().unwrap_or_else(PoisonError::into_inner)
}
