//! Monthly reporting: the aggregate figures shared by the home page and the
//! PDF export, the PDF document itself, and the download endpoint.

mod core;
mod download_endpoint;
mod pdf;

pub use core::{Aggregate, compute_aggregate};
pub use download_endpoint::download_pdf_endpoint;
pub use pdf::{REPORT_FILE_NAME, render_pdf};
