use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::workflows::jobs::JobId;

/// Fields tracked by the application form, keyed the way error maps are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FormField {
    #[serde(rename = "firstName")]
    FirstName,
    #[serde(rename = "lastName")]
    LastName,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "file")]
    Resume,
}

impl FormField {
    pub const fn key(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Resume => "file",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "Email",
            Self::Phone => "Phone Number",
            Self::Resume => "Resume/CV",
        }
    }
}

/// Free-text inputs of the form. The resume is set through the attachment methods instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    FirstName,
    LastName,
    Email,
    Phone,
}

impl From<TextField> for FormField {
    fn from(value: TextField) -> Self {
        match value {
            TextField::FirstName => FormField::FirstName,
            TextField::LastName => FormField::LastName,
            TextField::Email => FormField::Email,
            TextField::Phone => FormField::Phone,
        }
    }
}

/// Metadata describing a selected resume file. File contents are never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub file_name: String,
    pub size_bytes: u64,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            size_bytes,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(file_name, metadata.len()))
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// Values entered by the applicant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationFormData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub resume: Option<Attachment>,
}

impl ApplicationFormData {
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::FirstName => &self.first_name,
            TextField::LastName => &self.last_name,
            TextField::Email => &self.email,
            TextField::Phone => &self.phone,
        }
    }

    pub(crate) fn set_text(&mut self, field: TextField, value: String) {
        let slot = match field {
            TextField::FirstName => &mut self.first_name,
            TextField::LastName => &mut self.last_name,
            TextField::Email => &mut self.email,
            TextField::Phone => &mut self.phone,
        };
        *slot = value;
    }
}

/// Field-level messages from the latest validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FormField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub(crate) fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

/// Proof of a successful submission, used by the confirmation view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub job_id: JobId,
    pub job_title: String,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn confirmation_message(&self) -> String {
        format!(
            "Your application for {} has been sent. You'll receive an email confirmation shortly.",
            self.job_title
        )
    }
}
