//! The home page: current month summary, the three action forms, and the
//! expense history table.

mod endpoint;
mod page;

pub use endpoint::{HomeForm, get_home_page, post_home_page};
