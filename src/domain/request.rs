//! Request classification and API key resolution for the proxy route

use axum::http::{HeaderName, HeaderValue};
use axum_extra::headers::{self, Header};

use crate::errors::ProxyError;

pub static X_USER_API_KEY: HeaderName = HeaderName::from_static("x-user-api-key");

/// Query parameters understood by the proxy. Only the first occurrence of a
/// key counts and empty values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyParams {
    pub q: Option<String>,
    pub domain: Option<String>,
    pub img: Option<String>,
}

impl ProxyParams {
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "q" => &mut params.q,
                "domain" => &mut params.domain,
                "img" => &mut params.img,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        params.q = params.q.filter(|value| !value.is_empty());
        params.domain = params.domain.filter(|value| !value.is_empty());
        params.img = params.img.filter(|value| !value.is_empty());
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyRequest {
    Image(String),
    Brandfetch(ApiCall),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Search(String),
    BrandLookup(String),
    Missing,
}

impl ProxyRequest {
    /// Precedence is `img`, then `q`, then `domain`.
    pub fn classify(params: ProxyParams) -> Self {
        match params {
            ProxyParams { img: Some(img), .. } => Self::Image(img),
            ProxyParams { q: Some(q), .. } => Self::Brandfetch(ApiCall::Search(q)),
            ProxyParams {
                domain: Some(domain),
                ..
            } => Self::Brandfetch(ApiCall::BrandLookup(domain)),
            _ => Self::Brandfetch(ApiCall::Missing),
        }
    }
}

/// Caller-supplied Brandfetch key from the `X-User-Api-Key` header.
#[derive(Debug, Clone)]
pub struct UserApiKey(HeaderValue);

impl UserApiKey {
    /// The key as text; empty or non-UTF-8 values count as absent.
    pub fn as_str(&self) -> Option<&str> {
        self.0.to_str().ok().filter(|value| !value.is_empty())
    }
}

impl Header for UserApiKey {
    fn name() -> &'static HeaderName {
        &X_USER_API_KEY
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, headers::Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        values
            .next()
            .cloned()
            .map(Self)
            .ok_or_else(headers::Error::invalid)
    }

    fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
        values.extend(std::iter::once(self.0.clone()));
    }
}

/// The caller's key wins over the server's fallback key.
pub fn resolve_api_key(
    user_key: Option<&UserApiKey>,
    fallback: Option<&str>,
) -> Result<String, ProxyError> {
    user_key
        .and_then(UserApiKey::as_str)
        .or(fallback.filter(|key| !key.is_empty()))
        .map(str::to_string)
        .ok_or(ProxyError::MissingApiKey)
}
