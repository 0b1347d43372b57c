//! Request tracing middleware

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use super::rate_limiter::extract_client_ip;

/// Log each request with method, path, client and timing
///
/// Health probes are excluded to keep the log readable under frequent
/// liveness polling.
pub async fn request_tracing(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if path == "/health" {
        return next.run(request).await;
    }

    let client = extract_client_ip(&request);
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        tracing::error!(%method, %path, %client, status = %status.as_u16(), %duration_ms, "Request failed");
    } else if status.is_client_error() {
        tracing::warn!(%method, %path, %client, status = %status.as_u16(), %duration_ms, "Request rejected");
    } else {
        tracing::info!(%method, %path, %client, status = %status.as_u16(), %duration_ms, "Request completed");
    }

    response
}
