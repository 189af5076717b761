use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::types::Principal;

/// Logs every response with method, path, status and, when authenticated,
/// the admin id and role. Severity follows the status class.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let principal = response.extensions().get::<Principal>().copied();
    let admin_id = principal.map(|p| p.identity);
    let role = principal.map(|p| p.role.as_str());
    let latency_ms = started.elapsed().as_millis() as u64;

    if status >= 500 {
        tracing::error!(%method, path, status, admin_id, role, latency_ms, "request failed");
    } else if status >= 400 {
        tracing::warn!(%method, path, status, admin_id, role, latency_ms, "request rejected");
    } else {
        tracing::info!(%method, path, status, admin_id, role, latency_ms, "request completed");
    }

    response
}
