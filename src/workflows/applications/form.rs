use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    ApplicationFormData, Attachment, SubmissionReceipt, TextField, ValidationErrors,
};
use super::submitter::SubmissionError;
use super::validation::{validate, AttachmentPolicy};
use crate::workflows::jobs::{Job, JobId};

pub const INVALID_FORM_MESSAGE: &str = "Please correct the errors below to continue.";

/// Shared handle to a form owned by one apply view.
pub type SharedApplicationForm = Arc<Mutex<ApplicationForm>>;

/// Lifecycle of an application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Idle,
    Validating,
    Invalid,
    Submitting,
    Submitted,
    Failed,
}

impl FormPhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Invalid => "invalid",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
            Self::Failed => "failed",
        }
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Validating)
                | (Self::Failed, Self::Validating)
                | (Self::Failed, Self::Idle)
                | (Self::Validating, Self::Invalid)
                | (Self::Validating, Self::Submitting)
                | (Self::Invalid, Self::Idle)
                | (Self::Submitting, Self::Submitted)
                | (Self::Submitting, Self::Failed)
        )
    }

    pub const fn is_editable(self) -> bool {
        !matches!(self, Self::Submitting | Self::Submitted)
    }
}

/// Edits rejected because of the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("form is locked while a submission is in flight")]
    SubmissionInFlight,
    #[error("application has already been submitted")]
    AlreadySubmitted,
}

/// Work item handed to the submitter once validation passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    attempt: u64,
    job_id: JobId,
    data: ApplicationFormData,
}

impl SubmissionTicket {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn data(&self) -> &ApplicationFormData {
        &self.data
    }
}

/// Result of pressing submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    Ready(SubmissionTicket),
    Invalid(ValidationErrors),
    InFlight,
    AlreadySubmitted,
}

/// Result of reporting the submitter's answer back to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Submitted(SubmissionReceipt),
    Failed(String),
    /// The ticket does not belong to the in-flight attempt.
    Stale,
}

/// Field values, validation state, and submission lifecycle for one job application.
#[derive(Debug, Clone)]
pub struct ApplicationForm {
    job: Job,
    policy: AttachmentPolicy,
    data: ApplicationFormData,
    errors: ValidationErrors,
    phase: FormPhase,
    banner: Option<String>,
    receipt: Option<SubmissionReceipt>,
    attempts: u64,
}

impl ApplicationForm {
    pub fn new(job: Job) -> Self {
        Self::with_policy(job, AttachmentPolicy::default())
    }

    pub fn with_policy(job: Job, policy: AttachmentPolicy) -> Self {
        Self {
            job,
            policy,
            data: ApplicationFormData::default(),
            errors: ValidationErrors::default(),
            phase: FormPhase::Idle,
            banner: None,
            receipt: None,
            attempts: 0,
        }
    }

    pub fn shared(self) -> SharedApplicationForm {
        Arc::new(Mutex::new(self))
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn data(&self) -> &ApplicationFormData {
        &self.data
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Top-level message shown above the form.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    /// Number of submit attempts that reached the submitter.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn set_field(
        &mut self,
        field: TextField,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.data.set_text(field, value.into());
        self.after_edit();
        Ok(())
    }

    pub fn attach_resume(&mut self, attachment: Attachment) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.data.resume = Some(attachment);
        self.after_edit();
        Ok(())
    }

    pub fn remove_resume(&mut self) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.data.resume = None;
        self.after_edit();
        Ok(())
    }

    /// Run a full validation pass, replacing any previous errors.
    pub fn validate(&mut self) -> bool {
        self.errors = validate(&self.data, &self.policy);
        self.errors.is_empty()
    }

    /// Handle a submit click.
    ///
    /// A click while a submission is in flight, or after success, changes nothing.
    pub fn begin_submit(&mut self) -> SubmitAttempt {
        match self.phase {
            FormPhase::Submitting => {
                debug!(job_id = %self.job.id, "submit ignored while in flight");
                return SubmitAttempt::InFlight;
            }
            FormPhase::Submitted => return SubmitAttempt::AlreadySubmitted,
            _ => {}
        }

        self.banner = None;
        if self.phase == FormPhase::Failed {
            self.transition(FormPhase::Idle);
        }
        self.transition(FormPhase::Validating);

        if !self.validate() {
            self.transition(FormPhase::Invalid);
            self.banner = Some(INVALID_FORM_MESSAGE.to_string());
            self.transition(FormPhase::Idle);
            return SubmitAttempt::Invalid(self.errors.clone());
        }

        self.attempts += 1;
        self.transition(FormPhase::Submitting);
        SubmitAttempt::Ready(SubmissionTicket {
            attempt: self.attempts,
            job_id: self.job.id.clone(),
            data: self.data.clone(),
        })
    }

    /// Apply the submitter's answer for `ticket`.
    pub fn complete_submit(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<(), SubmissionError>,
    ) -> Completion {
        if self.phase != FormPhase::Submitting || ticket.attempt != self.attempts {
            warn!(
                job_id = %ticket.job_id,
                attempt = ticket.attempt,
                "ignoring completion for stale submission"
            );
            return Completion::Stale;
        }

        match result {
            Ok(()) => {
                let receipt = SubmissionReceipt {
                    job_id: self.job.id.clone(),
                    job_title: self.job.title.clone(),
                    submitted_at: Utc::now(),
                };
                info!(job_id = %receipt.job_id, attempt = ticket.attempt, "application submitted");
                self.receipt = Some(receipt.clone());
                self.transition(FormPhase::Submitted);
                Completion::Submitted(receipt)
            }
            Err(error) => {
                let message = error.user_message();
                warn!(job_id = %self.job.id, %error, "application submission failed");
                self.banner = Some(message.clone());
                self.transition(FormPhase::Failed);
                Completion::Failed(message)
            }
        }
    }

    fn ensure_editable(&self) -> Result<(), FormError> {
        match self.phase {
            FormPhase::Submitting => Err(FormError::SubmissionInFlight),
            FormPhase::Submitted => Err(FormError::AlreadySubmitted),
            _ => Ok(()),
        }
    }

    fn after_edit(&mut self) {
        if self.phase == FormPhase::Failed {
            self.transition(FormPhase::Idle);
        }
        if !self.errors.is_empty() {
            self.validate();
        }
    }

    fn transition(&mut self, next: FormPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal form transition {:?} -> {:?}",
            self.phase,
            next
        );
        debug!(
            job_id = %self.job.id,
            from = self.phase.label(),
            to = next.label(),
            "form phase transition"
        );
        self.phase = next;
    }
}
