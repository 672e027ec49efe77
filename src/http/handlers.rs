//! Axum HTTP handlers for the proxy
//!
//! Provides the Brandfetch proxy route, its CORS preflight, and a health endpoint.

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::TypedHeader;
use serde::Serialize;
use url::Url;

use crate::{
    brandfetch_client::{ImageFetch, UpstreamJson},
    domain::{
        image::{validate_image_url, DEFAULT_IMAGE_CONTENT_TYPE, IMAGE_CACHE_CONTROL},
        request::{resolve_api_key, ApiCall, ProxyParams, ProxyRequest, UserApiKey},
    },
    errors::ProxyError,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// CORS headers are added by the middleware; the body stays empty.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn brandfetch_proxy(
    State(state): State<AppState>,
    user_key: Option<TypedHeader<UserApiKey>>,
    RawQuery(query): RawQuery,
) -> Result<Response, ProxyError> {
    let params = ProxyParams::from_query(query.as_deref());

    let call = match ProxyRequest::classify(params) {
        ProxyRequest::Image(raw) => {
            let url = validate_image_url(&raw)?;
            return proxy_image(&state, &url).await;
        }
        ProxyRequest::Brandfetch(call) => call,
    };

    let api_key = resolve_api_key(
        user_key.as_ref().map(|TypedHeader(key)| key),
        state.fallback_api_key.as_deref(),
    )?;

    let upstream = match call {
        ApiCall::Search(query) => state.brandfetch.search(&api_key, &query).await,
        ApiCall::BrandLookup(domain) => state.brandfetch.brand(&api_key, &domain).await,
        ApiCall::Missing => return Err(ProxyError::MissingQuery),
    };

    let UpstreamJson { status, body } =
        upstream.map_err(|err| ProxyError::Upstream(err.to_string()))?;
    Ok((status, Json(body)).into_response())
}

async fn proxy_image(state: &AppState, url: &Url) -> Result<Response, ProxyError> {
    let fetched = state
        .brandfetch
        .fetch_image(url)
        .await
        .map_err(|err| ProxyError::ImageFetch(err.to_string()))?;

    match fetched {
        ImageFetch::Failed(status) => Err(ProxyError::ImageStatus(status)),
        ImageFetch::Fetched {
            content_type,
            bytes,
        } => {
            let content_type =
                content_type.unwrap_or_else(|| DEFAULT_IMAGE_CONTENT_TYPE.to_string());
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
                ],
                bytes,
            )
                .into_response())
        }
    }
}
