//! The monthly budget and its database operations.

mod core;

pub use core::{Budget, create_budget_table, get_budget, map_row_to_budget, upsert_budget};
