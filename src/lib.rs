//! Expenseur is a web app for tracking your personal expenses against a
//! monthly budget.
//!
//! Expenses are categorised automatically by a pre-trained text classifier,
//! and the current month can be exported as a PDF report.
//!
//! This library provides an HTTP API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod budget;
mod classifier;
mod config;
mod database_id;
mod db;
mod endpoints;
mod error_page;
mod expense;
mod home;
mod html;
mod logging;
mod not_found;
mod period;
mod report;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use classifier::{Classifier, LabeledExample, ModelArtifact, TrainingConfig, fit_model, read_dataset};
pub use config::parse_port_or_default;
pub use logging::logging_middleware;
pub use routing::build_router;

use crate::{
    error_page::render_error_page, not_found::get_404_not_found_response,
};

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
    /// The amount field of a form could not be parsed as a number.
    ///
    /// Holds the raw string the client submitted.
    #[error("could not parse \"{0}\" as an amount")]
    InvalidAmount(String),

    /// The date field of a form was not a calendar date in the form
    /// YYYY-MM-DD.
    #[error("could not parse \"{0}\" as a calendar date")]
    InvalidDate(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The classifier artifact could not be read, or its dimensions do not
    /// agree with each other.
    ///
    /// This error is fatal at startup: the server refuses to run without a
    /// usable classifier.
    #[error("could not load the classifier artifact: {0}")]
    ModelArtifact(String),

    /// The training dataset could not be read or is unusable.
    #[error("could not read the training dataset: {0}")]
    Dataset(String),

    /// The PDF report could not be rendered or written.
    #[error("could not produce the PDF report: {0}")]
    PdfRender(String),
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

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidAmount(value) => render_error_page(
                StatusCode::BAD_REQUEST,
                "Invalid amount",
                &format!(
                    "\"{value}\" is not a number. Go back and enter the amount \
                    as a plain number such as 250 or 249.99."
                ),
            ),
            Error::InvalidDate(value) => render_error_page(
                StatusCode::BAD_REQUEST,
                "Invalid date",
                &format!(
                    "\"{value}\" is not a calendar date. Dates must be in the \
                    form YYYY-MM-DD, for example 2024-03-15."
                ),
            ),
            Error::InvalidTimezone(timezone) => render_error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "Try again later or check the server logs.",
                )
            }
        }
    }
}
