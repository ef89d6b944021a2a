//! Defines the expense model and its database queries.

use rusqlite::{Connection, Row, params};
use time::Date;

use crate::{Error, database_id::DatabaseId, period::Period};

/// A single recorded expense.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The id for the expense.
    pub id: DatabaseId,
    /// How much money was spent.
    pub amount: f64,
    /// A text description of what the money was spent on.
    pub description: String,
    /// When the money was spent.
    pub date: Date,
    /// How the expense was paid, e.g. "Card" or "Cash".
    pub payment_mode: String,
    /// The category label the classifier assigned at insert time.
    ///
    /// Never re-assigned: expenses cannot be edited.
    pub category: String,
}

/// The fields of an expense that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// How much money was spent.
    pub amount: f64,
    /// A text description of what the money was spent on.
    pub description: String,
    /// When the money was spent.
    pub date: Date,
    /// How the expense was paid.
    pub payment_mode: String,
    /// The category label assigned by the classifier.
    pub category: String,
}

pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            amount REAL NOT NULL,
            description TEXT NOT NULL,
            date TEXT NOT NULL,
            payment_mode TEXT NOT NULL,
            category TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_expense(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        description: row.get(2)?,
        date: row.get(3)?,
        payment_mode: row.get(4)?,
        category: row.get(5)?,
    })
}

/// Store a new expense and return it with its generated ID.
///
/// # Errors
/// Returns [Error::SqlError] if the insert fails.
pub fn insert_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    connection.execute(
        "INSERT INTO expense (amount, description, date, payment_mode, category)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new_expense.amount,
            new_expense.description,
            new_expense.date,
            new_expense.payment_mode,
            new_expense.category
        ],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Expense {
        id,
        amount: new_expense.amount,
        description: new_expense.description,
        date: new_expense.date,
        payment_mode: new_expense.payment_mode,
        category: new_expense.category,
    })
}

/// Get the total amount spent in `period`.
///
/// Returns 0 when no expenses fall in the period.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn sum_expenses(period: Period, connection: &Connection) -> Result<f64, Error> {
    let mut statement = connection
        .prepare("SELECT COALESCE(SUM(amount), 0) FROM expense WHERE date >= ?1 AND date < ?2")?;

    let total = statement.query_row(
        params![period.first_day(), period.first_day_of_next()],
        |row| row.get(0),
    )?;

    Ok(total)
}

/// Get every stored expense, newest date first.
///
/// Expenses on the same date keep a stable order by ascending ID.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, amount, description, date, payment_mode, category FROM expense
            ORDER BY date DESC, id ASC",
        )?
        .query_map([], map_row_to_expense)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Get the expenses whose date falls in `period`, newest date first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_expenses_in(period: Period, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, amount, description, date, payment_mode, category FROM expense
            WHERE date >= ?1 AND date < ?2
            ORDER BY date DESC, id ASC",
        )?
        .query_map(
            params![period.first_day(), period.first_day_of_next()],
            map_row_to_expense,
        )?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Delete every expense whose date falls in `period` and return how many
/// rows were removed.
///
/// # Errors
/// Returns [Error::SqlError] if the delete fails.
pub fn delete_expenses_in(period: Period, connection: &Connection) -> Result<usize, Error> {
    let rows_deleted = connection.execute(
        "DELETE FROM expense WHERE date >= ?1 AND date < ?2",
        params![period.first_day(), period.first_day_of_next()],
    )?;

    Ok(rows_deleted)
}

#[cfg(test)]
mod create_expense_table_tests {
    use rusqlite::Connection;

    use super::create_expense_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_expense_table(&connection));
    }
}
