use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::request::X_USER_API_KEY;

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Logs one summary line per request. The query string and key values are
/// left out; only whether the caller sent its own key is recorded.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let user_key = request.headers().contains_key(&X_USER_API_KEY);
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started_at.elapsed().as_millis();

    info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        user_key,
        duration_ms = elapsed_ms,
        "request summary"
    );

    if status.as_u16() == 401 {
        warn!(method = %method, path = %path, "no api key available");
    }

    response
}
