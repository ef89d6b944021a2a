//! Expense records and their database operations.

mod core;

pub use core::{
    Expense, NewExpense, create_expense_table, delete_expenses_in, get_all_expenses,
    get_expenses_in, insert_expense, map_row_to_expense, sum_expenses,
};
