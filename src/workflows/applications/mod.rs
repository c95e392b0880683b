//! Application intake: form state, whole-form validation, and the submission lifecycle.

pub mod domain;
pub mod form;
pub mod session;
pub mod submitter;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationFormData, Attachment, FormField, SubmissionReceipt, TextField, ValidationErrors,
};
pub use form::{
    ApplicationForm, Completion, FormError, FormPhase, SharedApplicationForm, SubmissionTicket,
    SubmitAttempt, INVALID_FORM_MESSAGE,
};
pub use session::{open_application, submit_application, SubmitOutcome};
pub use submitter::{
    ApplicationSubmitter, RecordedSubmission, RecordingSubmitter, SubmissionError,
    SUBMISSION_FALLBACK_MESSAGE,
};
pub use validation::{is_valid_email, validate, AttachmentPolicy};
