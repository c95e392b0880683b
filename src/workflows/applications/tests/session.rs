use std::sync::Arc;

use super::common::*;
use crate::workflows::applications::form::FormPhase;
use crate::workflows::applications::session::{
    open_application, submit_application, SubmitOutcome,
};
use crate::workflows::applications::submitter::{RecordingSubmitter, SubmissionError};
use crate::workflows::applications::validation::AttachmentPolicy;
use crate::workflows::jobs::{sample_catalog, InMemoryJobStore, JobId, JobLookupError};

#[tokio::test]
async fn open_application_reads_job_context() {
    let store = InMemoryJobStore::new(sample_catalog());
    let form = open_application(&store, &JobId::new("2"), AttachmentPolicy::default())
        .await
        .expect("job exists");
    assert_eq!(form.job().title, "Backend Engineer (Rust)");
    assert_eq!(form.phase(), FormPhase::Idle);

    match open_application(&store, &JobId::new("404"), AttachmentPolicy::default()).await {
        Err(JobLookupError::NotFound(id)) => assert_eq!(id, JobId::new("404")),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_form_never_reaches_submitter() {
    let form = empty_form().shared();
    let submitter = RecordingSubmitter::accepting();

    match submit_application(Arc::downgrade(&form), &submitter).await {
        SubmitOutcome::Invalid(errors) => assert_eq!(errors.len(), 4),
        other => panic!("expected invalid outcome, got {other:?}"),
    }
    assert_eq!(submitter.call_count(), 0);
}

#[tokio::test]
async fn valid_form_is_submitted_once() {
    let form = filled_form().shared();
    let submitter = RecordingSubmitter::accepting();

    match submit_application(Arc::downgrade(&form), &submitter).await {
        SubmitOutcome::Submitted(receipt) => {
            assert_eq!(receipt.job_title, "Backend Engineer (Rust)")
        }
        other => panic!("expected submitted outcome, got {other:?}"),
    }

    let calls = submitter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].job_id, JobId::new("2"));
    assert_eq!(calls[0].data.email, "grace@navy.mil");

    assert_eq!(
        submit_application(Arc::downgrade(&form), &submitter).await,
        SubmitOutcome::AlreadySubmitted
    );
    assert_eq!(submitter.call_count(), 1);
}

#[tokio::test]
async fn second_click_while_in_flight_is_a_no_op() {
    let form = filled_form().shared();
    let submitter = Arc::new(GatedSubmitter::default());

    let first = tokio::spawn({
        let form = Arc::downgrade(&form);
        let submitter = Arc::clone(&submitter);
        async move { submit_application(form, submitter.as_ref()).await }
    });

    submitter.entered.notified().await;
    assert_eq!(
        form.lock().expect("form mutex poisoned").phase(),
        FormPhase::Submitting
    );

    let second = submit_application(Arc::downgrade(&form), submitter.as_ref()).await;
    assert_eq!(second, SubmitOutcome::InFlight);
    assert_eq!(submitter.call_count(), 1);

    submitter.release.notify_one();
    let first = first.await.expect("submit task joins");
    assert!(matches!(first, SubmitOutcome::Submitted(_)));
    assert_eq!(submitter.call_count(), 1);
}

#[tokio::test]
async fn rejection_is_reported_and_form_keeps_values() {
    let form = filled_form().shared();
    let submitter = RecordingSubmitter::rejecting(SubmissionError::rejected("Role closed"));

    let outcome = submit_application(Arc::downgrade(&form), &submitter).await;
    assert_eq!(outcome, SubmitOutcome::Failed("Role closed".to_string()));

    let form = form.lock().expect("form mutex poisoned");
    assert_eq!(form.phase(), FormPhase::Failed);
    assert_eq!(form.data().first_name, "Grace");
    assert_eq!(form.data().resume, Some(resume()));
}

#[tokio::test]
async fn dropped_form_discards_late_result() {
    let form = filled_form().shared();
    let submitter = Arc::new(GatedSubmitter::rejecting(SubmissionError::default()));

    let pending = tokio::spawn({
        let form = Arc::downgrade(&form);
        let submitter = Arc::clone(&submitter);
        async move { submit_application(form, submitter.as_ref()).await }
    });

    submitter.entered.notified().await;
    drop(form);
    submitter.release.notify_one();

    assert_eq!(
        pending.await.expect("submit task joins"),
        SubmitOutcome::Discarded
    );
}
