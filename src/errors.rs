use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Invalid image URL")]
    InvalidImageUrl,
    #[error("Image fetch failed: {}", .0.as_u16())]
    ImageStatus(StatusCode),
    #[error("Failed to fetch image: {0}")]
    ImageFetch(String),
    #[error("No API key available. Please provide your own Brandfetch API key.")]
    MissingApiKey,
    #[error("Missing query parameter (q or domain)")]
    MissingQuery,
    #[error("Failed to fetch from Brandfetch API")]
    Upstream(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidImageUrl | Self::MissingQuery => StatusCode::BAD_REQUEST,
            Self::ImageStatus(status) => *status,
            Self::ImageFetch(_) | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingApiKey => StatusCode::UNAUTHORIZED,
        }
    }

    fn is_plain_text(&self) -> bool {
        matches!(
            self,
            Self::InvalidImageUrl | Self::ImageStatus(_) | Self::ImageFetch(_)
        )
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let Self::Upstream(detail) = &self {
            tracing::error!(error = %detail, "brandfetch request failed");
        }
        if let Self::ImageFetch(detail) = &self {
            tracing::error!(error = %detail, "image request failed");
        }

        // Image errors stay plain text; the API branches answer with JSON.
        if self.is_plain_text() {
            return (
                status,
                [(header::CONTENT_TYPE, "text/plain;charset=UTF-8")],
                self.to_string(),
            )
                .into_response();
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_wire_format() {
        assert_eq!(ProxyError::InvalidImageUrl.to_string(), "Invalid image URL");
        assert_eq!(
            ProxyError::ImageStatus(StatusCode::NOT_FOUND).to_string(),
            "Image fetch failed: 404"
        );
        assert_eq!(
            ProxyError::ImageFetch("connection reset".to_string()).to_string(),
            "Failed to fetch image: connection reset"
        );
        assert_eq!(
            ProxyError::Upstream("dns failure".to_string()).to_string(),
            "Failed to fetch from Brandfetch API"
        );
    }

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(ProxyError::InvalidImageUrl.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ProxyError::ImageStatus(StatusCode::FORBIDDEN).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ProxyError::MissingApiKey.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ProxyError::MissingQuery.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ProxyError::Upstream(String::new()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn json_errors_set_json_content_type() {
        let response = ProxyError::MissingApiKey.into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let response = ProxyError::InvalidImageUrl.into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain;charset=UTF-8"
        );
    }
}
