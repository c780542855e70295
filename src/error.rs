use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("dotenv error: {0}")]
    Env(#[from] dotenv::Error),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("email is already registered or has a pending application")]
    DuplicateEmail,

    #[error("not found")]
    NotFound,

    #[error("not authorized")]
    NotAuthorized,

    #[error("request has already been processed")]
    AlreadyProcessed,

    #[error("a pending request already exists for this member")]
    AlreadyPending,

    #[error("club is at full capacity")]
    CapacityFull,

    #[error("invalid state: {0}")]
    InvalidState(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl Error {
    fn kind(&self) -> &'static str {
        match self {
            Error::ValidationFailed(_) => "validation_failed",
            Error::DuplicateEmail => "duplicate_email",
            Error::NotFound => "not_found",
            Error::NotAuthorized => "not_authorized",
            Error::AlreadyProcessed => "already_processed",
            Error::AlreadyPending => "already_pending",
            Error::CapacityFull => "capacity_full",
            Error::InvalidState(_) => "invalid_state",
            Error::Jwt(_) => "invalid_token",
            _ => "internal_error",
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateEmail
            | Error::AlreadyProcessed
            | Error::AlreadyPending
            | Error::CapacityFull
            | Error::InvalidState(_) => StatusCode::CONFLICT,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::NotAuthorized => StatusCode::FORBIDDEN,
            Error::Jwt(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("internal error: {}", self);
            return HttpResponse::build(status).json(ErrorBody {
                error: self.kind(),
                message: "an internal error occurred".into(),
            });
        }
        HttpResponse::build(status).json(ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        })
    }
}
