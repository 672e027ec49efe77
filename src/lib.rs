use std::sync::Arc;

use axum::{middleware, routing::get, Router};

pub mod brandfetch_client;
pub mod config;
pub mod cors;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;

use brandfetch_client::BrandfetchApi;

#[derive(Clone)]
pub struct AppState {
    pub fallback_api_key: Option<Arc<str>>,
    pub brandfetch: Arc<dyn BrandfetchApi>,
}

impl AppState {
    pub fn new(fallback_api_key: Option<String>, brandfetch: Arc<dyn BrandfetchApi>) -> Self {
        Self {
            fallback_api_key: fallback_api_key.map(Arc::<str>::from),
            brandfetch,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/brandfetch",
            get(http::handlers::brandfetch_proxy).options(http::handlers::preflight),
        )
        .route("/health", get(http::handlers::health))
        .layer(middleware::from_fn(cors::cors_middleware))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
