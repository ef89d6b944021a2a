//! Application router configuration.

use axum::{
    Router,
    routing::get,
};

use crate::{
    AppState, endpoints,
    home::{get_home_page, post_home_page},
    not_found::get_404_not_found,
    report::download_pdf_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_home_page).post(post_home_page))
        .route(endpoints::DOWNLOAD_PDF, get(download_pdf_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

#[cfg(test)]
mod router_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        AppState, build_router,
        classifier::{Classifier, test_artifact},
        endpoints,
    };

    fn get_test_app_state() -> AppState {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let classifier =
            Classifier::new(test_artifact()).expect("Could not build test classifier.");

        AppState::new(db_connection, classifier, "Etc/UTC")
            .expect("Could not initialize app state.")
    }

    fn create_test_server() -> TestServer {
        let app = build_router(get_test_app_state());

        TestServer::new(app)
    }

    fn today_string() -> String {
        let today = OffsetDateTime::now_utc().date();

        format!(
            "{:04}-{:02}-{:02}",
            today.year(),
            today.month() as u8,
            today.day()
        )
    }

    #[tokio::test]
    async fn home_page_loads() {
        let server = create_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        assert!(response.text().contains("Expense History"));
    }

    #[tokio::test]
    async fn added_expense_appears_on_following_get() {
        let server = create_test_server();

        let response = server
            .post(endpoints::ROOT)
            .form(&[
                ("add_expense", "1"),
                ("amount", "250"),
                ("description", "Uber ride"),
                ("date", &today_string()),
                ("payment_mode", "Card"),
            ])
            .await;

        response.assert_status_ok();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("Uber ride"));
        assert!(text.contains("Transport"));
    }

    #[tokio::test]
    async fn malformed_amount_is_a_bad_request() {
        let server = create_test_server();

        let response = server
            .post(endpoints::ROOT)
            .form(&[
                ("add_expense", "1"),
                ("amount", "two hundred"),
                ("description", "Uber ride"),
                ("date", &today_string()),
                ("payment_mode", "Card"),
            ])
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn pdf_download_serves_attachment() {
        let server = create_test_server();

        let response = server.get(endpoints::DOWNLOAD_PDF).await;

        response.assert_status_ok();
        response.assert_header("content-type", "application/pdf");

        let disposition = response.header("content-disposition");
        assert!(
            disposition
                .to_str()
                .expect("content-disposition is not valid UTF-8")
                .starts_with("attachment"),
            "PDF response is not served as an attachment"
        );
    }

    #[tokio::test]
    async fn unknown_route_returns_not_found_page() {
        let server = create_test_server();

        let response = server.get("/no/such/page").await;

        response.assert_status_not_found();
        assert!(response.text().contains("Page not found"));
    }
}
