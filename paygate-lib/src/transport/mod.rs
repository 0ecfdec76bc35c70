//! Transport seam.
//!
//! The client depends only on [`Transport`]; it does no pooling, retries or
//! redirects of its own. [`HttpTransport`] is the production implementation.

use async_trait::async_trait;

use crate::Result;

#[cfg(feature = "http-transport")]
mod http;

#[cfg(feature = "http-transport")]
pub use http::HttpTransport;

/// Posts encoded request bodies and returns raw response bodies.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `url` over ordinary HTTPS.
    async fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> Result<Vec<u8>>;

    /// POST `body` to `url` presenting the configured client certificate.
    async fn post_over_tls(&self, url: &str, content_type: &str, body: Vec<u8>)
        -> Result<Vec<u8>>;
}
