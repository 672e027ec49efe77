use async_trait::async_trait;
use axum::{body::Bytes, http::StatusCode};
use reqwest::{header, redirect, Client};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::domain::image::{is_allowed_url, IMAGE_USER_AGENT};

const MAX_IMAGE_REDIRECTS: usize = 10;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("upstream returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Status and decoded body of a Brandfetch API response.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamJson {
    pub status: StatusCode,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageFetch {
    Fetched {
        content_type: Option<String>,
        bytes: Bytes,
    },
    Failed(StatusCode),
}

#[async_trait]
pub trait BrandfetchApi: Send + Sync {
    async fn search(&self, api_key: &str, query: &str) -> Result<UpstreamJson, UpstreamError>;

    async fn brand(&self, api_key: &str, domain: &str) -> Result<UpstreamJson, UpstreamError>;

    async fn fetch_image(&self, url: &Url) -> Result<ImageFetch, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBrandfetchClient {
    api_base: String,
    api_client: Client,
    image_client: Client,
}

impl ReqwestBrandfetchClient {
    pub fn new(api_base: &Url) -> Result<Self, UpstreamError> {
        let api_client = Client::builder().build()?;
        let image_client = Client::builder()
            .user_agent(IMAGE_USER_AGENT)
            .redirect(allow_listed_redirects())
            .build()?;

        Ok(Self {
            api_base: api_base.as_str().trim_end_matches('/').to_string(),
            api_client,
            image_client,
        })
    }

    fn endpoint(&self, resource: &str, value: &str) -> String {
        format!(
            "{}/{resource}/{}",
            self.api_base,
            urlencoding::encode(value)
        )
    }

    async fn get_json(&self, url: String, api_key: &str) -> Result<UpstreamJson, UpstreamError> {
        let response = self
            .api_client
            .get(url)
            .bearer_auth(api_key)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes)?;

        tracing::debug!(status = status.as_u16(), "brandfetch api responded");
        Ok(UpstreamJson { status, body })
    }
}

/// Redirects are followed only while they stay on allow-listed image hosts.
fn allow_listed_redirects() -> redirect::Policy {
    redirect::Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_IMAGE_REDIRECTS {
            attempt.error("too many redirects")
        } else if is_allowed_url(attempt.url()) {
            attempt.follow()
        } else {
            attempt.error("redirect to a host outside the image allow-list")
        }
    })
}

#[async_trait]
impl BrandfetchApi for ReqwestBrandfetchClient {
    async fn search(&self, api_key: &str, query: &str) -> Result<UpstreamJson, UpstreamError> {
        self.get_json(self.endpoint("search", query), api_key).await
    }

    async fn brand(&self, api_key: &str, domain: &str) -> Result<UpstreamJson, UpstreamError> {
        self.get_json(self.endpoint("brands", domain), api_key).await
    }

    async fn fetch_image(&self, url: &Url) -> Result<ImageFetch, UpstreamError> {
        let response = self.image_client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Ok(ImageFetch::Failed(status));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(ImageFetch::Fetched {
            content_type,
            bytes,
        })
    }
}
