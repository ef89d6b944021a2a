//! Defines the GET and POST handlers for the home page.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    budget::upsert_budget,
    classifier::Classifier,
    expense::{NewExpense, delete_expenses_in, get_all_expenses, insert_expense},
    period::Period,
    report::compute_aggregate,
};

use super::page::home_view;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// The state needed to serve the home page and its form actions.
#[derive(Debug, Clone)]
pub struct HomeState {
    /// The database connection for managing expenses and the budget.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The classifier that assigns a category to new expenses.
    pub classifier: Arc<Classifier>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for HomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            classifier: state.classifier.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for the home page.
///
/// One submission can carry any combination of the three actions; the
/// marker fields (`add_expense`, `set_budget`, `reset_month`) decide which
/// actions run. The value fields stay raw strings so that each action can
/// fail with a precise parse error without touching the other actions.
#[derive(Debug, Default, Deserialize)]
pub struct HomeForm {
    /// Present when the submission should record a new expense.
    pub add_expense: Option<String>,
    /// The amount spent, parsed as a float by the add expense action.
    pub amount: Option<String>,
    /// What the money was spent on.
    pub description: Option<String>,
    /// The date of the expense in the form YYYY-MM-DD.
    pub date: Option<String>,
    /// How the expense was paid.
    pub payment_mode: Option<String>,

    /// Present when the submission should set this month's budget.
    pub set_budget: Option<String>,
    /// The budget amount, parsed as a float by the set budget action.
    pub budget_amount: Option<String>,

    /// Present when the submission should delete this month's expenses.
    pub reset_month: Option<String>,
}

/// A route handler that displays the current month summary and the expense
/// history.
pub async fn get_home_page(State(state): State<HomeState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let period = Period::current(&state.local_timezone)?;

    render_home(period, &connection)
}

/// A route handler that runs the actions selected by the submitted form and
/// then renders the home page with the updated data.
///
/// The marker checks are independent rather than mutually exclusive, and
/// always run in the order add expense, set budget, reset month.
pub async fn post_home_page(
    State(state): State<HomeState>,
    Form(form): Form<HomeForm>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let period = Period::current(&state.local_timezone)?;

    if form.add_expense.is_some() {
        add_expense(&form, &state.classifier, &connection)?;
    }

    if form.set_budget.is_some() {
        set_budget(&form, period, &connection)?;
    }

    if form.reset_month.is_some() {
        reset_month(period, &connection)?;
    }

    render_home(period, &connection)
}

fn render_home(period: Period, connection: &Connection) -> Result<Response, Error> {
    let aggregate = compute_aggregate(period, connection)?;
    let expenses = get_all_expenses(connection)?;

    Ok(home_view(&aggregate, &expenses).into_response())
}

fn add_expense(
    form: &HomeForm,
    classifier: &Classifier,
    connection: &Connection,
) -> Result<(), Error> {
    let amount = parse_amount(form.amount.as_deref())?;

    let raw_date = form.date.as_deref().unwrap_or_default();
    let date = Date::parse(raw_date, DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(raw_date.to_owned()))?;

    let description = form.description.clone().unwrap_or_default();
    let payment_mode = form.payment_mode.clone().unwrap_or_default();
    let category = classifier.classify(&description).to_owned();

    let expense = insert_expense(
        NewExpense {
            amount,
            description,
            date,
            payment_mode,
            category,
        },
        connection,
    )?;

    tracing::info!(
        "Added expense {} in category \"{}\".",
        expense.id,
        expense.category
    );

    Ok(())
}

fn set_budget(form: &HomeForm, period: Period, connection: &Connection) -> Result<(), Error> {
    let amount = parse_amount(form.budget_amount.as_deref())?;

    upsert_budget(period, amount, connection)?;

    tracing::info!("Set the budget for {}/{} to {amount}.", period.month, period.year);

    Ok(())
}

fn reset_month(period: Period, connection: &Connection) -> Result<(), Error> {
    let rows_deleted = delete_expenses_in(period, connection)?;

    tracing::info!(
        "Reset {}/{}, deleting {rows_deleted} expenses.",
        period.month,
        period.year
    );

    Ok(())
}

fn parse_amount(raw_amount: Option<&str>) -> Result<f64, Error> {
    let raw_amount = raw_amount.unwrap_or_default();

    raw_amount
        .trim()
        .parse()
        .map_err(|_| Error::InvalidAmount(raw_amount.to_owned()))
}
