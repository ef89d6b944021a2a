//! Defines the endpoint for downloading the monthly PDF report.

use std::{
    fs,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, expense::get_expenses_in, period::Period, report::compute_aggregate,
};

use super::{REPORT_FILE_NAME, render_pdf};

/// The state needed to produce the PDF report.
#[derive(Debug, Clone)]
pub struct DownloadPdfState {
    /// The database connection for reading expenses and the budget.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DownloadPdfState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler that renders the current month as a PDF, writes it to
/// [REPORT_FILE_NAME] (overwriting any previous report), and serves the
/// bytes as a file download.
pub async fn download_pdf_endpoint(
    State(state): State<DownloadPdfState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let period = Period::current(&state.local_timezone)?;
    let aggregate = compute_aggregate(period, &connection)?;
    let expenses = get_expenses_in(period, &connection)?;

    let bytes = render_pdf(&aggregate, &expenses)?;

    fs::write(REPORT_FILE_NAME, &bytes).map_err(|error| {
        Error::PdfRender(format!("could not write {REPORT_FILE_NAME}: {error}"))
    })?;

    tracing::info!(
        "Wrote {REPORT_FILE_NAME} with {} expenses ({} bytes).",
        expenses.len(),
        bytes.len()
    );

    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILE_NAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod download_pdf_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        budget::upsert_budget,
        db::initialize,
        expense::{NewExpense, insert_expense},
        period::Period,
        report::REPORT_FILE_NAME,
        test_utils::{get_header, response_body_bytes},
    };

    use super::{DownloadPdfState, download_pdf_endpoint};

    fn get_test_state() -> DownloadPdfState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        DownloadPdfState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn serves_pdf_attachment_with_fixed_name() {
        let state = get_test_state();
        let today = OffsetDateTime::now_utc().date();

        {
            let connection = state.db_connection.lock().unwrap();
            upsert_budget(Period::containing(today), 1000.0, &connection).unwrap();
            insert_expense(
                NewExpense {
                    amount: 250.0,
                    description: "Uber ride".to_owned(),
                    date: today,
                    payment_mode: "Card".to_owned(),
                    category: "Transport".to_owned(),
                },
                &connection,
            )
            .unwrap();
        }

        let response = download_pdf_endpoint(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "content-type"), "application/pdf");
        assert_eq!(
            get_header(&response, "content-disposition"),
            format!("attachment; filename=\"{REPORT_FILE_NAME}\"")
        );

        let body = response_body_bytes(response).await;
        assert!(body.starts_with(b"%PDF"), "response body is not a PDF");
    }

    #[tokio::test]
    async fn serves_report_for_empty_month() {
        let state = get_test_state();

        let response = download_pdf_endpoint(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response_body_bytes(response).await;
        assert!(body.starts_with(b"%PDF"));
    }
}
