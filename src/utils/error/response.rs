//! HTTP response handling for errors

use super::types::BlogError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for BlogError {
    fn status_code(&self) -> StatusCode {
        match self {
            BlogError::Unauthorized(_) | BlogError::Jwt(_) => StatusCode::UNAUTHORIZED,
            BlogError::Forbidden(_) => StatusCode::FORBIDDEN,
            BlogError::NotFound(_) => StatusCode::NOT_FOUND,
            BlogError::Conflict(_) => StatusCode::CONFLICT,
            BlogError::Validation(_)
            | BlogError::BadRequest(_)
            | BlogError::Serialization(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            BlogError::Config(_) => ("CONFIG_ERROR", self.to_string()),
            BlogError::Database(_) => ("DATABASE_ERROR", "Database operation failed".to_string()),
            BlogError::Jwt(_) => ("INVALID_TOKEN", "Invalid or expired token".to_string()),
            BlogError::Unauthorized(_) => ("UNAUTHORIZED", self.to_string()),
            BlogError::Forbidden(_) => ("FORBIDDEN", self.to_string()),
            BlogError::NotFound(_) => ("NOT_FOUND", self.to_string()),
            BlogError::Conflict(_) => ("CONFLICT", self.to_string()),
            BlogError::Validation(_) => ("VALIDATION_ERROR", self.to_string()),
            BlogError::BadRequest(_) | BlogError::Serialization(_) => {
                ("BAD_REQUEST", self.to_string())
            }
            _ => ("INTERNAL_ERROR", "An internal error occurred".to_string()),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id: None, // carried by the x-request-id response header
            },
        };

        HttpResponse::build(self.status_code()).json(error_response)
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub request_id: Option<String>,
}
