use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, FieldError};

/// The four form fields, exactly as typed by the visitor. Length limits
/// mirror what the email provider boundary enforces.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(max = 100, message = "Name exceeds maximum allowed length"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(max = 200, message = "Subject exceeds maximum allowed length"))]
    pub subject: String,

    #[validate(length(max = 5000, message = "Message exceeds maximum allowed length"))]
    pub message: String,
}

impl ContactForm {
    /// Flags every field that is blank after trimming. Empty result means
    /// the form is complete.
    pub fn missing_fields(&self) -> Vec<FieldError> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| FieldError {
            field: field.to_string(),
            message: "This field is required".to_string(),
        })
        .collect()
    }

    pub fn ensure_complete(&self) -> Result<(), AppError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(missing))
        }
    }

    /// Resets every field to the empty string. Called only after a
    /// confirmed successful send.
    pub fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
        self.subject.clear();
        self.message.clear();
    }
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub id: Uuid,
}

impl ContactResponse {
    pub fn sent(id: Uuid) -> Self {
        ContactResponse {
            success: true,
            message: "Message sent successfully!".to_string(),
            id,
        }
    }
}
