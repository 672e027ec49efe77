//! Allow-list validation for proxied image URLs

use url::Url;

use crate::errors::ProxyError;

pub const ALLOWED_IMAGE_HOSTS: [&str; 3] =
    ["brandfetch.io", "asset.brandfetch.io", "cdn.brandfetch.io"];

/// Fixed user agent sent with every image fetch.
pub const IMAGE_USER_AGENT: &str = "Mozilla/5.0 (compatible; ImageProxy/1.0)";

pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=86400";
pub const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/png";

/// True when `host` equals an allowed host or is a subdomain of one.
pub fn is_allowed_host(host: &str) -> bool {
    ALLOWED_IMAGE_HOSTS.iter().any(|allowed| {
        host == *allowed
            || host
                .strip_suffix(allowed)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

pub fn is_allowed_url(url: &Url) -> bool {
    url.host_str().is_some_and(is_allowed_host)
}

pub fn validate_image_url(raw: &str) -> Result<Url, ProxyError> {
    let url = Url::parse(raw).map_err(|_| ProxyError::InvalidImageUrl)?;
    if !is_allowed_url(&url) {
        return Err(ProxyError::InvalidImageUrl);
    }
    Ok(url)
}
