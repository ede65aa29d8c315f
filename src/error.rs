//! Defines the app level error type and its conversion to JSON responses.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{response::ApiResponse, transaction::RejectionReason};

/// The message sent to clients for failures they cannot do anything about.
///
/// The details of these failures are only written to the server logs.
pub(crate) const OPERATION_FAILED: &str = "operation failed";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a person's name.
    #[error("person name cannot be empty")]
    EmptyPersonName,

    /// A negative number was used as a person's age.
    #[error("{0} is not a valid age")]
    InvalidAge(i64),

    /// The request body or query string could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// An empty string was used to create a category description.
    #[error("category description cannot be empty")]
    EmptyCategoryDescription,

    /// The validation engine refused to record a transaction.
    #[error(transparent)]
    Rejected(#[from] RejectionReason),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A report total does not fit in a decimal amount.
    #[error("report totals are too large to compute")]
    TotalOverflow,

    /// Tried to delete a person that does not exist.
    #[error("tried to delete a person that is not in the database")]
    DeleteMissingPerson,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl Error {
    /// The HTTP status code that best describes the error to a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyPersonName
            | Error::InvalidAge(_)
            | Error::InvalidRequest(_)
            | Error::EmptyCategoryDescription => StatusCode::BAD_REQUEST,
            Error::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound | Error::DeleteMissingPerson => StatusCode::NOT_FOUND,
            Error::TotalOverflow | Error::SqlError(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            // Store faults are not intended to be shown to the client.
            Error::SqlError(_) | Error::DatabaseLockError => {
                tracing::error!("An unexpected error occurred: {}", self);
                OPERATION_FAILED.to_owned()
            }
            error => error.to_string(),
        };

        (status, ApiResponse::failure(message)).into_response()
    }
}
