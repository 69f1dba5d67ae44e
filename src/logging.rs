//! Middleware for logging requests and responses.

use axum::{
    body::Bytes, extract::Request, http::header::CONTENT_TYPE, middleware::Next,
    response::Response,
};

/// How many bytes of a request or response body are logged at the `info`
/// level before the rest is relegated to `debug`.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body is logged at the `debug` level. Bodies that carry
/// credentials (the login and user endpoints) are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_bytes) = extract_request_parts_and_body(request).await;
    let body_text = String::from_utf8_lossy(&body_bytes);

    if body_text.contains("\"password\"") {
        log_request(&parts, "[body containing credentials redacted]");
    } else {
        log_request(&parts, &body_text);
    }

    // Rebuild the request from the original bytes, not the lossy text, so
    // that non-UTF-8 uploads (e.g. legacy encoded CSV files) pass through
    // unmodified.
    let request = Request::from_parts(parts, body_bytes.into());
    let response = next.run(request).await;

    let (parts, body_bytes) = extract_response_parts_and_body(response).await;
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, body_bytes.into())
}

async fn extract_request_parts_and_body(
    request: Request,
) -> (axum::http::request::Parts, Bytes) {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (parts, body_bytes)
}

async fn extract_response_parts_and_body(
    response: Response,
) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (parts, body_bytes)
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    let content_type = parts.headers.get(CONTENT_TYPE);

    if body.chars().count() > LOG_BODY_LENGTH_LIMIT {
        let preview: String = body.chars().take(LOG_BODY_LENGTH_LIMIT).collect();
        tracing::info!(
            "Received request: {} {} ({content_type:?})\nbody: {preview}...",
            parts.method,
            parts.uri,
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {} ({content_type:?})\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.chars().count() > LOG_BODY_LENGTH_LIMIT {
        let preview: String = body.chars().take(LOG_BODY_LENGTH_LIMIT).collect();
        tracing::info!("Sending response: {}\nbody: {preview}...", parts.status);
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}
