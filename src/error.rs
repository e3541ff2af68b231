//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(String),
}

/// Failure of a single statement against one table.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not found: {resource} id {id}")]
    NotFound { resource: &'static str, id: i32 },
    #[error("multiple found: {resource} id {id}")]
    MultipleFound { resource: &'static str, id: i32 },
    #[error("constraint violation: {0}")]
    ConstraintViolation(#[source] sqlx::Error),
    #[error("{op} {resource} error: {affected} rows affected")]
    RowCountMismatch {
        op: Operation,
        resource: &'static str,
        affected: u64,
    },
    #[error("cannot compile query: {0}")]
    QueryCompilation(String),
    #[error("database: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::MultipleFound { .. } => ErrorKind::MultipleFound,
            StoreError::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            StoreError::RowCountMismatch { .. } => ErrorKind::RowCountMismatch,
            StoreError::QueryCompilation(_) => ErrorKind::QueryCompilation,
            StoreError::Database(_) => ErrorKind::Database,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        let is_constraint = match &e {
            sqlx::Error::Database(db) => matches!(
                db.kind(),
                sqlx::error::ErrorKind::UniqueViolation
                    | sqlx::error::ErrorKind::ForeignKeyViolation
                    | sqlx::error::ErrorKind::NotNullViolation
                    | sqlx::error::ErrorKind::CheckViolation
            ),
            _ => false,
        };
        if is_constraint {
            StoreError::ConstraintViolation(e)
        } else {
            StoreError::Database(e)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    MultipleFound,
    ConstraintViolation,
    RowCountMismatch,
    QueryCompilation,
    Database,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Read => write!(f, "read"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Store failure with the repository operation that hit it.
#[derive(Error, Debug)]
#[error("cannot {op} {resource}: {source}")]
pub struct RepoError {
    pub op: Operation,
    pub resource: &'static str,
    #[source]
    pub source: StoreError,
}

impl RepoError {
    pub fn new(op: Operation, resource: &'static str, source: StoreError) -> Self {
        RepoError { op, resource, source }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Repo(e) => {
                let code = match e.kind() {
                    ErrorKind::NotFound => "not_found",
                    ErrorKind::MultipleFound => "multiple_found",
                    ErrorKind::ConstraintViolation => "constraint_violation",
                    ErrorKind::RowCountMismatch => "row_count_mismatch",
                    ErrorKind::QueryCompilation => "query_compilation_error",
                    ErrorKind::Database => "database_error",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, code)
            }
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "bad request");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
