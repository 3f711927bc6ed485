//! Logging middleware

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request logging middleware
///
/// Reuses an incoming `x-request-id` or mints one, runs the request inside a
/// span carrying it and echoes it on the response.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!("request", request_id = %request_id);
    let mut response = next.run(request).instrument(span.clone()).await;

    let status = response.status().as_u16();
    let duration_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0);

    span.in_scope(|| {
        if response.status().is_server_error() {
            warn!(%method, %path, status, %duration_ms, "Request failed");
        } else {
            info!(%method, %path, status, %duration_ms, "Request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
