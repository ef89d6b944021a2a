//! The aggregate figures computed for the current period.

use rusqlite::Connection;

use crate::{
    Error, budget::get_budget, expense::sum_expenses, period::Period,
};

/// The three figures every view of a period reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    /// The sum of all expenses in the period.
    pub total_spent: f64,
    /// The budget set for the period, 0 when none was set.
    pub budget_amount: f64,
    /// `budget_amount - total_spent`. Negative when the budget is blown.
    pub remaining: f64,
}

/// Compute the aggregate figures for `period`.
///
/// # Errors
/// Returns [Error::SqlError] if either query fails.
pub fn compute_aggregate(period: Period, connection: &Connection) -> Result<Aggregate, Error> {
    let total_spent = sum_expenses(period, connection)?;
    let budget_amount = get_budget(period, connection)?;

    Ok(Aggregate {
        total_spent,
        budget_amount,
        remaining: budget_amount - total_spent,
    })
}

#[cfg(test)]
mod compute_aggregate_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        budget::upsert_budget,
        db::initialize,
        expense::{NewExpense, insert_expense},
        period::Period,
    };

    use super::compute_aggregate;

    const MARCH: Period = Period {
        month: 3,
        year: 2024,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn empty_database_aggregates_to_zero() {
        let connection = get_test_connection();

        let aggregate = compute_aggregate(MARCH, &connection).unwrap();

        assert_eq!(aggregate.total_spent, 0.0);
        assert_eq!(aggregate.budget_amount, 0.0);
        assert_eq!(aggregate.remaining, 0.0);
    }

    #[test]
    fn remaining_is_budget_minus_total() {
        let connection = get_test_connection();

        upsert_budget(MARCH, 1000.0, &connection).unwrap();
        insert_expense(
            NewExpense {
                amount: 250.0,
                description: "Uber ride".to_owned(),
                date: date!(2024 - 03 - 15),
                payment_mode: "Card".to_owned(),
                category: "Transport".to_owned(),
            },
            &connection,
        )
        .unwrap();

        let aggregate = compute_aggregate(MARCH, &connection).unwrap();

        assert_eq!(aggregate.total_spent, 250.0);
        assert_eq!(aggregate.budget_amount, 1000.0);
        assert_eq!(aggregate.remaining, 750.0);
    }

    #[test]
    fn remaining_goes_negative_without_budget() {
        let connection = get_test_connection();

        insert_expense(
            NewExpense {
                amount: 250.0,
                description: "Uber ride".to_owned(),
                date: date!(2024 - 03 - 15),
                payment_mode: "Card".to_owned(),
                category: "Transport".to_owned(),
            },
            &connection,
        )
        .unwrap();

        let aggregate = compute_aggregate(MARCH, &connection).unwrap();

        assert_eq!(aggregate.remaining, -250.0);
    }
}
