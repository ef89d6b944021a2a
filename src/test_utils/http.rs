use axum::{body::Body, response::Response};

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

pub(crate) async fn response_body_bytes(response: Response<Body>) -> Vec<u8> {
    let body = response.into_body();

    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body")
        .to_vec()
}
