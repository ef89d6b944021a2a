//! Defines the budget model and its database queries.

use rusqlite::{Connection, Row, params};

use crate::{Error, database_id::DatabaseId, period::Period};

/// The spending budget for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    /// The id for the budget row.
    pub id: DatabaseId,
    /// The month number, 1-12.
    pub month: u8,
    /// The four digit year.
    pub year: i32,
    /// The budgeted amount for the month.
    pub budget_amount: f64,
}

pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            month INTEGER NOT NULL,
            year INTEGER NOT NULL,
            budget_amount REAL NOT NULL,
            UNIQUE(month, year)
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_budget(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        month: row.get(1)?,
        year: row.get(2)?,
        budget_amount: row.get(3)?,
    })
}

/// Set the budget for `period`, replacing any previous amount.
///
/// The insert-or-update is a single atomic statement keyed on
/// (month, year), so repeated calls leave exactly one row for the period
/// holding the last amount written.
///
/// # Errors
/// Returns [Error::SqlError] if the statement fails.
pub fn upsert_budget(period: Period, amount: f64, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO budget (month, year, budget_amount) VALUES (?1, ?2, ?3)
        ON CONFLICT(month, year) DO UPDATE SET budget_amount = excluded.budget_amount",
        params![period.month, period.year, amount],
    )?;

    Ok(())
}

/// Get the budget amount for `period`.
///
/// Months without an explicit budget read as 0.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_budget(period: Period, connection: &Connection) -> Result<f64, Error> {
    let result = connection
        .prepare("SELECT budget_amount FROM budget WHERE month = ?1 AND year = ?2")?
        .query_row(params![period.month, period.year], |row| row.get(0));

    match result {
        Ok(amount) => Ok(amount),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0.0),
        Err(error) => Err(error.into()),
    }
}
