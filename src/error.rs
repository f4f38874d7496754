//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every lifecycle operation reports one of these variants instead of letting storage or
//! library errors cross the boundary untyped.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert application errors
//! into HTTP responses with a short JSON body. Server-side failures are logged and answered
//! with a generic message so that no internal detail reaches the client.
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError` allow conversion with `?`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned to clients for every 5xx error.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (HTTP 400).
    Validation(String),
    /// A well-formed request the application refuses, such as a duplicate email
    /// or wrong login credentials (HTTP 400).
    BadRequest(String),
    /// No bearer token was supplied (HTTP 401).
    Unauthenticated(String),
    /// The `Authorization` header is not of the form `Bearer <token>` (HTTP 401).
    MalformedCredential(String),
    /// The token failed signature or expiry verification (HTTP 401).
    InvalidCredential(String),
    /// The resource does not exist or is not owned by the caller (HTTP 404).
    /// Both cases are deliberately reported the same way.
    NotFound(String),
    /// The operation is not allowed in the resource's current state (HTTP 400).
    InvalidState(String),
    /// A completed project was asked to complete again (HTTP 400).
    AlreadyCompleted(String),
    /// Error from the database layer (HTTP 500).
    Database(String),
    /// Any other unexpected server-side failure (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::MalformedCredential(msg) => write!(f, "Malformed Credential: {}", msg),
            AppError::InvalidCredential(msg) => write!(f, "Invalid Credential: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InvalidState(msg) => write!(f, "Invalid State: {}", msg),
            AppError::AlreadyCompleted(msg) => write!(f, "Already Completed: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::BadRequest(_)
            | AppError::InvalidState(_)
            | AppError::AlreadyCompleted(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_)
            | AppError::MalformedCredential(_)
            | AppError::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Database(_) | AppError::Internal(_) => {
                log::error!("{}", self);
                INTERNAL_MESSAGE
            }
            AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthenticated(msg)
            | AppError::MalformedCredential(msg)
            | AppError::InvalidCredential(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidState(msg)
            | AppError::AlreadyCompleted(msg) => msg.as_str(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound`, a unique-constraint violation becomes `BadRequest`,
/// and everything else is a `Database` error.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::BadRequest("Record already exists".into())
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

/// JWT decoding failures are credential failures from the caller's point of view.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::InvalidCredential(format!("Invalid token: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_error_responses() {
        let cases = [
            (AppError::Validation("bad".into()), 400),
            (AppError::BadRequest("bad".into()), 400),
            (AppError::Unauthenticated("none".into()), 401),
            (AppError::MalformedCredential("shape".into()), 401),
            (AppError::InvalidCredential("sig".into()), 401),
            (AppError::NotFound("gone".into()), 404),
            (AppError::InvalidState("done".into()), 400),
            (AppError::AlreadyCompleted("done".into()), 400),
            (AppError::Database("boom".into()), 500),
            (AppError::Internal("boom".into()), 500),
        ];

        for (error, status) in cases {
            assert_eq!(error.error_response().status(), status, "{}", error);
        }
    }

    #[actix_rt::test]
    async fn test_internal_details_are_not_exposed() {
        let error = AppError::Database("relation \"projects\" does not exist".into());
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], INTERNAL_MESSAGE);
    }

    #[actix_rt::test]
    async fn test_client_errors_carry_their_message() {
        let error = AppError::AlreadyCompleted("Project is already completed".into());
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Project is already completed");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            AppError::from(sqlx::Error::RowNotFound),
            AppError::NotFound(_)
        ));
    }
}
