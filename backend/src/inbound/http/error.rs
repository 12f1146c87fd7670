//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error types HTTP-agnostic while letting Actix handlers
//! turn port failures into consistent JSON responses and status codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::domain::ports::{CatalogSearchError, IdentityError, ReadingListError};
use crate::domain::{Error, ErrorCode, ReadingStatus, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted.without_details()
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

fn with_code(error: Error, code: &str) -> Error {
    error.with_details(json!({ "code": code }))
}

fn with_field(error: Error, field: &str, code: &str) -> Error {
    error.with_details(json!({ "field": field, "code": code }))
}

fn repository_failure(message: &str, unavailable: bool) -> Error {
    error!(%message, unavailable, "repository failure");
    if unavailable {
        with_code(
            Error::service_unavailable("storage temporarily unavailable"),
            "storage_unavailable",
        )
    } else {
        Error::internal(message)
    }
}

impl From<IdentityError> for Error {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::EmailAlreadyExists => with_field(
                Error::conflict(err.to_string()),
                "email",
                "email_already_exists",
            ),
            IdentityError::InvalidEmail => with_field(
                Error::invalid_request(err.to_string()),
                "email",
                "invalid_email",
            ),
            IdentityError::InvalidPassword { message } => {
                with_field(Error::invalid_request(message), "password", "invalid_password")
            }
            IdentityError::InvalidName { message } => {
                with_field(Error::invalid_request(message), "name", "invalid_name")
            }
            IdentityError::InvalidCredentials => with_code(
                Error::unauthorized(err.to_string()),
                "invalid_credentials",
            ),
            IdentityError::Unauthenticated => {
                with_code(Error::unauthorized(err.to_string()), "unauthenticated")
            }
            IdentityError::UserNotFound => {
                with_code(Error::not_found(err.to_string()), "user_not_found")
            }
            IdentityError::CredentialHashing { .. } | IdentityError::TokenIssuance { .. } => {
                error!(error = %err, "identity operation failed");
                Error::internal(err.to_string())
            }
            IdentityError::RepositoryFailure {
                message,
                unavailable,
            } => repository_failure(&message, unavailable),
        }
    }
}

impl From<ReadingListError> for Error {
    fn from(err: ReadingListError) -> Self {
        match err {
            ReadingListError::UserNotFound { .. } => {
                with_code(Error::not_found(err.to_string()), "user_not_found")
            }
            ReadingListError::BookNotFound { .. } => {
                with_code(Error::not_found(err.to_string()), "book_not_found")
            }
            ReadingListError::InvalidStatus { ref value } => {
                let allowed: Vec<&str> = ReadingStatus::ALL.iter().map(|s| s.as_str()).collect();
                Error::invalid_request(err.to_string()).with_details(json!({
                    "field": "status",
                    "value": value,
                    "allowed": allowed,
                    "code": "invalid_status",
                }))
            }
            ReadingListError::InvalidBook { reason } => {
                with_code(Error::invalid_request(reason.to_string()), reason.code())
            }
            ReadingListError::RepositoryFailure {
                message,
                unavailable,
            } => repository_failure(&message, unavailable),
        }
    }
}

impl From<CatalogSearchError> for Error {
    fn from(err: CatalogSearchError) -> Self {
        if err.is_upstream() {
            error!(error = %err, "catalog search failed");
            with_code(
                Error::service_unavailable("book catalog unavailable"),
                "catalog_unavailable",
            )
        } else {
            with_field(Error::invalid_request(err.to_string()), "q", "empty_query")
        }
    }
}
