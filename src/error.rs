//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! It centralizes error management, providing a consistent way to handle and represent
//! the error conditions that can occur, from database issues to validation failures.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handler errors convert
//! into HTTP responses carrying the uniform `{"status","code","message"}` envelope.
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, `bcrypt::BcryptError` and `reqwest::Error` allow
//! conversion with the `?` operator.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError, ResponseError};
use actix_web::{http::StatusCode, HttpRequest, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (HTTP 400).
    BadRequest(String),
    /// Failed input validation, surfaced with field-level messages (HTTP 400).
    Validation(String),
    /// Authentication failure: bad credentials, or a missing/invalid/expired
    /// bearer token at the gate (HTTP 401).
    Unauthorized(String),
    /// A requested resource was not found (HTTP 404).
    NotFound(String),
    /// A uniqueness conflict, e.g. a duplicate email on signup (HTTP 409).
    Conflict(String),
    /// The transactional email provider rejected a message (HTTP 500).
    EmailDelivery(String),
    /// An error originating from database operations (HTTP 500).
    Database(String),
    /// Unclassified server-side error (HTTP 500).
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::EmailDelivery(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::EmailDelivery(msg)
            | AppError::Internal(msg) => msg,
            // Database details stay out of responses; clients get a generic message.
            AppError::Database(_) => "Internal server error",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::EmailDelivery(msg) => write!(f, "Email Delivery Error: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects carrying the
/// uniform error envelope.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status).json(json!({
            "status": "error",
            "code": status.as_u16(),
            "message": self.message(),
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` maps to `NotFound`, and unique-constraint violations map to
/// `Conflict` so the storage layer's uniqueness guarantee surfaces as 409 even
/// when a handler's fast-path existence check loses a race.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Resource already exists".into())
            }
            _ => AppError::Database(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// JWT processing failures (bad signature, expiry) are authentication failures.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

/// Outbound HTTP failures (OAuth token exchange, userinfo fetch).
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> AppError {
        AppError::Internal(error.to_string())
    }
}

// Extractor failures happen before any handler runs, so without these
// handlers a malformed body or path segment would answer with actix's
// plain-text default instead of the envelope. Registered through
// `web::JsonConfig` / `web::QueryConfig` / `web::PathConfig` in app setup.

pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(error.to_string()).into()
}

pub fn query_error_handler(error: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(error.to_string()).into()
}

pub fn path_error_handler(error: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(error.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (AppError::BadRequest("missing field".into()), 400),
            (AppError::Validation("email format".into()), 400),
            (AppError::Unauthorized("invalid token".into()), 401),
            (AppError::NotFound("board not found".into()), 404),
            (AppError::Conflict("email already in use".into()), 409),
            (AppError::EmailDelivery("provider rejected".into()), 500),
            (AppError::Database("connection reset".into()), 500),
            (AppError::Internal("oops".into()), 500),
        ];
        for (error, code) in cases {
            assert_eq!(error.error_response().status().as_u16(), code);
        }
    }

    #[test]
    fn test_database_message_is_redacted() {
        let error = AppError::Database("password authentication failed".into());
        assert_eq!(error.message(), "Internal server error");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, AppError::NotFound(_)));
    }
}
