use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("OTP not found. Please request a new OTP.")]
    OtpNotFound,

    #[error("OTP expired. Please request a new OTP.")]
    OtpExpired,

    #[error("Invalid OTP. Please check and try again.")]
    OtpMismatch,

    #[error("Failed to send OTP. Please try again.")]
    DeliveryFailed,

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (actix_web::http::StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::NotFound(msg) => {
                (actix_web::http::StatusCode::NOT_FOUND, msg.clone())
            }
            AppError::Conflict(msg) => {
                log::warn!("Conflict: {msg}");
                (actix_web::http::StatusCode::CONFLICT, msg.clone())
            }
            AppError::OtpNotFound => {
                (actix_web::http::StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::OtpExpired | AppError::OtpMismatch => {
                log::warn!("OTP rejected: {self}");
                (actix_web::http::StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::DeliveryFailed => {
                log::error!("SMS delivery failed");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    self.to_string(),
                )
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::MigrateError(err) => {
                log::error!("Migration error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Migration error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": message
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let resp = AppError::ValidationError("bad".into()).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::NotFound("User not found".into()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::Conflict("User already exists".into()).error_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = AppError::OtpExpired.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::OtpNotFound.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::DeliveryFailed.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
