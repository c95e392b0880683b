use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::workflows::applications::domain::{ApplicationFormData, Attachment, TextField};
use crate::workflows::applications::form::ApplicationForm;
use crate::workflows::applications::submitter::{ApplicationSubmitter, SubmissionError};
use crate::workflows::jobs::{sample_catalog, Job, JobId};

pub(super) fn job() -> Job {
    sample_catalog()
        .iter()
        .find(|job| job.id == JobId::new("2"))
        .cloned()
        .expect("sample job present")
}

pub(super) fn resume() -> Attachment {
    Attachment::new("grace-hopper-cv.pdf", 182_000)
}

pub(super) fn empty_form() -> ApplicationForm {
    ApplicationForm::new(job())
}

pub(super) fn filled_form() -> ApplicationForm {
    let mut form = empty_form();
    form.set_field(TextField::FirstName, "Grace").expect("form editable");
    form.set_field(TextField::LastName, "Hopper").expect("form editable");
    form.set_field(TextField::Email, "grace@navy.mil").expect("form editable");
    form.set_field(TextField::Phone, "(555) 000-0000").expect("form editable");
    form.attach_resume(resume()).expect("form editable");
    form
}

/// Submitter that parks every call until released, so tests can observe the in-flight state.
#[derive(Default)]
pub(super) struct GatedSubmitter {
    pub(super) entered: Notify,
    pub(super) release: Notify,
    calls: AtomicUsize,
    rejection: Option<SubmissionError>,
}

impl GatedSubmitter {
    pub(super) fn rejecting(error: SubmissionError) -> Self {
        Self {
            rejection: Some(error),
            ..Self::default()
        }
    }

    pub(super) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApplicationSubmitter for GatedSubmitter {
    async fn submit(
        &self,
        _job_id: &JobId,
        _data: &ApplicationFormData,
    ) -> Result<(), SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;

        match &self.rejection {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
