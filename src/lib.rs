//! Expense Tracker is a web service for recording personal debit and credit
//! transactions, setting monthly saving goals and per-category budgets, and
//! viewing summaries derived from the ledger.
//!
//! This library provides a JSON REST API backed by SQLite. All summaries are
//! recomputed from a fresh snapshot of the user's ledger on every request by
//! the aggregation functions in [dashboard].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod app_state;
mod auth;
mod backup;
mod budget;
pub mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod logging;
pub mod money;
mod routing;
mod saving_goal;
mod timezone;
pub mod transaction;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, User, UserID, ValidatedPassword, create_user, get_user_by_username,
    update_password,
};
pub use budget::{CategoryBudget, upsert_category_budget};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use saving_goal::set_saving_goal;
pub use timezone::get_timezone;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing from a request body.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The user provided an unknown username or the wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no auth cookie in the cookie jar")]
    CookieMissing,

    /// The auth cookie could not be decoded or has expired.
    #[error("the auth token is invalid or has expired")]
    InvalidToken,

    /// The username is too short to be registered.
    #[error("username must be at least {0} characters")]
    UsernameTooShort(usize),

    /// The username has already been registered.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// The password is too short to be accepted.
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// One or more fields of a submitted transaction were invalid.
    ///
    /// Each string describes one problem with the submission.
    #[error("invalid transaction: {}", .0.join(", "))]
    InvalidTransaction(Vec<String>),

    /// A category name was missing or blank.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// A budget limit was missing, not a number, or not positive.
    #[error("monthly limit must be a positive number")]
    InvalidBudgetLimit,

    /// A saving goal was not a number or was negative.
    #[error("goal must be a number 0 or greater")]
    InvalidSavingGoal,

    /// The start of a date range comes after its end.
    #[error("the range start {from} is after the range end {to}")]
    InvalidDateRange {
        /// The first day of the requested range.
        from: Date,
        /// The last day of the requested range.
        to: Date,
    },

    /// The avatar string exceeded the maximum allowed length.
    #[error("avatar image is too large")]
    AvatarTooLarge,

    /// The uploaded backup was not a JSON object.
    #[error("invalid backup format")]
    InvalidBackup,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to delete a category budget that does not exist
    #[error("tried to delete a category budget that is not in the database")]
    DeleteMissingBudget,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while writing CSV data.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// Could not acquire the database lock
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

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::CookieMissing | Error::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Error::MissingField(_)
            | Error::UsernameTooShort(_)
            | Error::DuplicateUsername(_)
            | Error::PasswordTooShort(_)
            | Error::InvalidTransaction(_)
            | Error::EmptyCategory
            | Error::InvalidBudgetLimit
            | Error::InvalidSavingGoal
            | Error::InvalidDateRange { .. }
            | Error::AvatarTooLarge
            | Error::InvalidBackup => StatusCode::BAD_REQUEST,
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::DeleteMissingBudget => StatusCode::NOT_FOUND,
            Error::HashingError(_)
            | Error::SqlError(_)
            | Error::InvalidTimezoneError(_)
            | Error::JSONSerializationError(_)
            | Error::CsvError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the client.
    ///
    /// Internal errors are replaced with a generic message, the details only go to the logs.
    fn client_message(&self) -> String {
        match self {
            Error::MissingField(field) => format!("{field} is required."),
            Error::InvalidCredentials => "Invalid username or password.".to_owned(),
            Error::CookieMissing => "You must be logged in to do that.".to_owned(),
            Error::InvalidToken => "Your session is invalid or has expired.".to_owned(),
            Error::UsernameTooShort(min) => {
                format!("Username must be at least {min} characters.")
            }
            Error::DuplicateUsername(_) => "Username already taken.".to_owned(),
            Error::PasswordTooShort(min) => {
                format!("Password must be at least {min} characters.")
            }
            Error::EmptyCategory => "Category cannot be empty.".to_owned(),
            Error::InvalidBudgetLimit => "Monthly budget must be a positive number.".to_owned(),
            Error::InvalidSavingGoal => "Goal must be a number 0 or greater.".to_owned(),
            Error::InvalidDateRange { .. } => "From date cannot be after To date.".to_owned(),
            Error::AvatarTooLarge => {
                "Avatar image is too large. Please use a smaller image.".to_owned()
            }
            Error::InvalidBackup => "Invalid backup format.".to_owned(),
            Error::NotFound => "The requested resource could not be found.".to_owned(),
            Error::UpdateMissingTransaction | Error::DeleteMissingTransaction => {
                "Transaction not found".to_owned()
            }
            Error::DeleteMissingBudget => "Category budget not found".to_owned(),
            Error::InvalidTimezoneError(timezone) => format!(
                "Could not get local timezone \"{timezone}\". Check your server settings and \
                ensure the timezone has been set to valid, canonical timezone string"
            ),
            Error::InvalidTransaction(_)
            | Error::HashingError(_)
            | Error::SqlError(_)
            | Error::JSONSerializationError(_)
            | Error::CsvError(_)
            | Error::DatabaseLockError => {
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        let body = match self {
            Error::InvalidTransaction(errors) => json!({ "errors": errors }),
            error => json!({ "error": error.client_message() }),
        };

        (status, Json(body)).into_response()
    }
}
