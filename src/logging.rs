//! Middleware for logging requests and responses.

use axum::{body::Bytes, extract::Request, middleware::Next, response::Response};

const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level. Bodies are
/// buffered as raw bytes so binary responses such as the PDF report pass
/// through unchanged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (headers, body_bytes) = extract_header_and_body_from_request(request).await;
    log_body("Received request", &format!("{headers:#?}"), &body_bytes);

    let request = Request::from_parts(headers, body_bytes.into());
    let response = next.run(request).await;

    let (headers, body_bytes) = extract_header_and_body_from_response(response).await;
    log_body("Sending response", &format!("{headers:#?}"), &body_bytes);

    Response::from_parts(headers, body_bytes.into())
}

async fn extract_header_and_body_from_request(
    request: Request,
) -> (axum::http::request::Parts, Bytes) {
    let (headers, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    (headers, body_bytes)
}

async fn extract_header_and_body_from_response(
    response: Response,
) -> (axum::http::response::Parts, Bytes) {
    let (headers, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    (headers, body_bytes)
}

fn log_body(direction: &str, headers: &str, body: &Bytes) {
    let body_text = String::from_utf8_lossy(body);

    if body_text.chars().count() > LOG_BODY_LENGTH_LIMIT {
        let preview: String = body_text.chars().take(LOG_BODY_LENGTH_LIMIT).collect();

        tracing::info!("{direction}: {headers}\nbody: {preview}...");
        tracing::debug!("Full body: {body_text:?}");
    } else {
        tracing::info!("{direction}: {headers}\nbody: {body_text:?}");
    }
}
