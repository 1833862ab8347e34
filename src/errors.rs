use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    RateLimited { days_left: i64 },
    SubmissionInFlight,
    TransportError(String),
    ServerRejected(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::RateLimited { days_left } => write!(
                f,
                "Too many messages from this email address. Please try again in {} day(s).",
                days_left
            ),
            AppError::SubmissionInFlight => write!(f, "A submission is already in progress"),
            AppError::TransportError(msg) => write!(f, "Network error: {}", msg),
            AppError::ServerRejected(msg) => write!(f, "{}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "error": "Validation failed",
                    "details": errors
                })
            }
            AppError::RateLimited { days_left } => {
                serde_json::json!({
                    "error": self.to_string(),
                    "days_left": days_left
                })
            }
            AppError::TransportError(_) => {
                serde_json::json!({
                    "error": "Failed to send email. Please check your connection and try again."
                })
            }
            _ => {
                serde_json::json!({"error": self.to_string()})
            }
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::SubmissionInFlight => StatusCode::CONFLICT,
            AppError::TransportError(_) => StatusCode::BAD_GATEWAY,
            AppError::ServerRejected(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        AppError::ValidationError(field_errors)
    }
}

/// Failures of the persisted rate-limit record. Never surfaced to the
/// client: reads fail open to an empty history and writes are best-effort,
/// but callers may log them.
#[derive(Debug, Display)]
pub enum StorageError {
    #[display("Failed to read rate-limit record: {_0}")]
    Read(String),

    #[display("Failed to write rate-limit record: {_0}")]
    Write(String),

    #[display("Failed to serialize rate-limit record: {_0}")]
    Serialize(String),
}

/// Outcome of the outbound provider call, split by where it failed.
#[derive(Debug, Display)]
pub enum MailError {
    #[display("Network error: {_0}")]
    Transport(String),

    #[display("{_0}")]
    Rejected(String),
}

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
