use actix_web::{error::InternalError, http::StatusCode, web, HttpResponse};

pub fn json_error(status: StatusCode, error: &str, details: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": error,
        "details": details
    }))
}

/// Replaces actix's default plain-text body for malformed JSON with the
/// same error envelope the rest of the API uses.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let details = err.to_string();
        let response = json_error(StatusCode::BAD_REQUEST, "Invalid JSON payload", &details);
        InternalError::from_response(err, response).into()
    })
}
