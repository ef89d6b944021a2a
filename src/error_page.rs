//! A shared error page for request failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{endpoints, html::base};

/// Render an error page with the given status code, headline and
/// explanation of how to fix the problem.
pub fn render_error_page(status_code: StatusCode, description: &str, fix: &str) -> Response {
    let content = html! {
        h1 { (description) }

        p { (fix) }

        p
        {
            a href=(endpoints::ROOT) { "Back to the home page" }
        }
    };

    (status_code, base("Error", &content)).into_response()
}

#[cfg(test)]
mod render_error_page_tests {
    use axum::http::StatusCode;
    use scraper::Selector;

    use crate::test_utils::{assert_valid_html, parse_html_document};

    use super::render_error_page;

    #[tokio::test]
    async fn renders_description_and_fix() {
        let response = render_error_page(
            StatusCode::BAD_REQUEST,
            "Invalid amount",
            "Enter a number.",
        );

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let heading_selector = Selector::parse("h1").unwrap();
        let heading: String = html
            .select(&heading_selector)
            .next()
            .expect("Could not find heading in error page")
            .text()
            .collect();

        assert_eq!(heading, "Invalid amount");
    }
}
