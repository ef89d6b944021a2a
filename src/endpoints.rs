//! The API endpoints URIs.

/// The home page: current month summary, forms, and expense history.
pub const ROOT: &str = "/";
/// The route for downloading the current month's expenses as a PDF report.
pub const DOWNLOAD_PDF: &str = "/download_pdf";
