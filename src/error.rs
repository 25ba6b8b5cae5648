use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub const RETRY_MESSAGE: &str = "something went wrong, try again";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
}

impl AppError {
    pub fn invalid_input(detail: impl std::fmt::Display) -> Self {
        Self::BadRequest(format!("invalid input: {detail}"))
    }
}

/// Storage outcome as seen by the handlers: "no rows" and unique-key
/// violations are kept apart from every other failure so they can be
/// mapped to a domain message.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no rows returned")]
    NotFound,
    #[error("row already exists")]
    Duplicate,
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Self::Duplicate,
            other => Self::Database(other),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("resource not found".into()),
            StoreError::Duplicate => AppError::Conflict("resource already exists".into()),
            StoreError::Database(err) => AppError::Database(err),
        }
    }
}

pub trait StoreResultExt<T> {
    /// Maps a "no rows" outcome to a not-found error carrying `message`.
    fn or_not_found(self, message: &str) -> Result<T, AppError>;
    /// Maps a unique-key violation to a conflict carrying `message`.
    fn or_conflict(self, message: &str) -> Result<T, AppError>;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn or_not_found(self, message: &str) -> Result<T, AppError> {
        self.map_err(|err| match err {
            StoreError::NotFound => AppError::NotFound(message.to_string()),
            other => other.into(),
        })
    }

    fn or_conflict(self, message: &str) -> Result<T, AppError> {
        self.map_err(|err| match err {
            StoreError::Duplicate => AppError::Conflict(message.to_string()),
            other => other.into(),
        })
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("failed to load trip: {0}")]
    Store(#[from] StoreError),
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("failed to send message: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message)
            | AppError::NotFound(message)
            | AppError::Conflict(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Database(err) => {
                error!(error = %err, "storage failure");
                (StatusCode::BAD_REQUEST, RETRY_MESSAGE.to_string())
            }
            err @ (AppError::Config(_)
            | AppError::Io(_)
            | AppError::Migrate(_)
            | AppError::Other(_)) => {
                error!(error = %err, "internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}
