use super::domain::{ApplicationFormData, Attachment, FormField, ValidationErrors};

pub const FIRST_NAME_REQUIRED: &str = "First Name is required.";
pub const LAST_NAME_REQUIRED: &str = "Last Name is required.";
pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const EMAIL_INVALID: &str = "Please enter a valid email address.";
pub const RESUME_REQUIRED: &str = "A resume or CV file is required.";

const DEFAULT_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];
const MEBIBYTE: u64 = 1024 * 1024;

/// Limits applied to the selected resume file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPolicy {
    accepted_extensions: Vec<String>,
    max_bytes: u64,
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_BYTES)
    }
}

impl AttachmentPolicy {
    pub const DEFAULT_MAX_BYTES: u64 = 5 * MEBIBYTE;

    pub fn new(max_bytes: u64) -> Self {
        let max_bytes = if max_bytes == 0 {
            Self::DEFAULT_MAX_BYTES
        } else {
            max_bytes
        };

        Self {
            accepted_extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn accepted_extensions(&self) -> &[String] {
        &self.accepted_extensions
    }

    fn check(&self, attachment: &Attachment) -> Option<String> {
        let accepted = attachment
            .extension()
            .is_some_and(|ext| self.accepted_extensions.iter().any(|allowed| *allowed == ext));
        if !accepted {
            let names = self
                .accepted_extensions
                .iter()
                .map(|ext| ext.to_ascii_uppercase())
                .collect::<Vec<_>>();
            return Some(format!("Resume must be a {} file.", join_alternatives(&names)));
        }

        if attachment.size_bytes > self.max_bytes {
            return Some(format!(
                "Resume must be {} or smaller.",
                describe_size(self.max_bytes)
            ));
        }

        None
    }
}

/// Run the whole-form validation pass.
pub fn validate(data: &ApplicationFormData, policy: &AttachmentPolicy) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if data.first_name.is_empty() {
        errors.insert(FormField::FirstName, FIRST_NAME_REQUIRED);
    }
    if data.last_name.is_empty() {
        errors.insert(FormField::LastName, LAST_NAME_REQUIRED);
    }

    if data.email.is_empty() {
        errors.insert(FormField::Email, EMAIL_REQUIRED);
    } else if !is_valid_email(&data.email) {
        errors.insert(FormField::Email, EMAIL_INVALID);
    }

    match &data.resume {
        None => errors.insert(FormField::Resume, RESUME_REQUIRED),
        Some(attachment) => {
            if let Some(message) = policy.check(attachment) {
                errors.insert(FormField::Resume, message);
            }
        }
    }

    errors
}

/// Accepts any whitespace-free run shaped like `local@domain.tld`.
pub fn is_valid_email(value: &str) -> bool {
    value.split_whitespace().any(|token| {
        let Some(at) = token.match_indices('@').map(|(at, _)| at).find(|&at| at > 0) else {
            return false;
        };
        token
            .match_indices('.')
            .any(|(dot, _)| dot > at + 1 && dot + 1 < token.len())
    })
}

fn join_alternatives(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} or {second}"),
        [init @ .., last] => format!("{}, or {}", init.join(", "), last),
    }
}

fn describe_size(bytes: u64) -> String {
    if bytes % MEBIBYTE == 0 {
        format!("{} MB", bytes / MEBIBYTE)
    } else {
        format!("{bytes} bytes")
    }
}
