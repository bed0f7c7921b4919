//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::models::TransactionId;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction was given a type other than "income" or "outcome".
    #[error("Type not valid. Transactions' types must be \"income\" or \"outcome\", got \"{0}\"")]
    InvalidTransactionKind(String),

    /// A transaction value was negative, NaN or infinite.
    #[error("{0} is not a valid transaction value, values must be zero or a positive number")]
    InvalidTransactionValue(f64),

    /// An empty string was used as a category title.
    #[error("Category title cannot be empty")]
    EmptyCategoryTitle,

    /// An outcome transaction was larger than the current total balance.
    ///
    /// `total` is the balance at the time the transaction was rejected.
    #[error(
        "You don't have enough cash for this transaction. Your current cash is ${total:.2}"
    )]
    InsufficientFunds {
        /// The total balance of the ledger before the rejected transaction.
        total: f64,
    },

    /// Tried to delete a transaction that does not exist.
    #[error("Transaction {0} not found")]
    TransactionNotFound(TransactionId),

    /// A category with the same title already exists in the database.
    ///
    /// This only happens when another request created the category between
    /// looking it up and creating it.
    #[error("the category \"{0}\" already exists in the database")]
    DuplicateCategoryTitle(String),

    /// The category ID used to create a transaction did not match a valid category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The CSV could not be read.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The uploaded file was larger than the configured limit.
    #[error("The uploaded file is too large, the limit is {limit} bytes")]
    UploadTooLarge {
        /// The largest request body accepted by the import route, in bytes.
        limit: usize,
    },

    /// The multipart form did not contain a file in the `file` field.
    #[error("No file was uploaded, expected a CSV file in the form field \"file\"")]
    MissingImportFile,

    /// The upload for an import took longer than the configured limit.
    #[error("Timed out while receiving the import file")]
    ImportTimedOut,

    /// The uploaded file could not be written to or read from the upload directory.
    #[error("Could not store the uploaded file: {0}")]
    UploadError(String),

    /// The background task that imports a file panicked or was cancelled.
    #[error("the import task did not finish: {0}")]
    ImportTaskFailed(String),

    /// The request body or path could not be extracted.
    ///
    /// `status` is the status axum picked for the rejection.
    #[error("{message}")]
    RequestRejected {
        /// The HTTP status to respond with.
        status: StatusCode,
        /// Why the request was rejected.
        message: String,
    },

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
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

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::InvalidCSV(value.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::RequestRejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::RequestRejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidTransactionKind(_)
            | Error::InvalidTransactionValue(_)
            | Error::EmptyCategoryTitle
            | Error::InsufficientFunds { .. }
            | Error::InvalidCategory
            | Error::InvalidCSV(_)
            | Error::MultipartError(_)
            | Error::MissingImportFile => StatusCode::BAD_REQUEST,
            Error::TransactionNotFound(_) | Error::NotFound => StatusCode::NOT_FOUND,
            Error::ImportTimedOut => StatusCode::REQUEST_TIMEOUT,
            Error::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::DuplicateCategoryTitle(_) => StatusCode::CONFLICT,
            Error::RequestRejected { status, .. } => *status,
            Error::UploadError(_)
            | Error::ImportTaskFailed(_)
            | Error::DatabaseLockError
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal details are only meant for the server logs.
            tracing::error!("An unexpected error occurred: {}", self);
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };

        (
            status_code,
            Json(json!({
                "status": "error",
                "message": message,
            })),
        )
            .into_response()
    }
}
