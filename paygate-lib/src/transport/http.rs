//! reqwest-backed transport.
//!
//! # Feature Flags
//!
//! Requires the `http-transport` feature (enabled by default).
//!
//! # Example
//!
//! ```rust,ignore
//! use paygate_lib::transport::HttpTransport;
//!
//! let config = ClientConfig::from_env()?;
//! let transport = HttpTransport::new(&config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;

use super::Transport;
use crate::config::ClientConfig;
use crate::{PaygateError, Result};

/// HTTP transport with an optional mutual-TLS client.
///
/// Both clients are built once; the certificate is fixed for the lifetime
/// of the transport.
pub struct HttpTransport {
    client: reqwest::Client,
    tls_client: Option<reqwest::Client>,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Build clients from the configuration's timeout and TLS material.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                PaygateError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;

        let tls_client = match &config.tls {
            Some(certificate) => {
                let identity = reqwest::Identity::from_pem(&certificate.identity_pem())
                    .map_err(|e| {
                        PaygateError::Configuration(format!("invalid client certificate: {}", e))
                    })?;
                let client = reqwest::Client::builder()
                    .use_rustls_tls()
                    .identity(identity)
                    .timeout(timeout)
                    .build()
                    .map_err(|e| {
                        PaygateError::Configuration(format!(
                            "failed to build mutual TLS client: {}",
                            e
                        ))
                    })?;
                Some(client)
            }
            None => None,
        };

        Ok(Self {
            client,
            tls_client,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Whether a client certificate is loaded.
    pub fn has_client_certificate(&self) -> bool {
        self.tls_client.is_some()
    }

    async fn send(
        &self,
        client: &reqwest::Client,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>> {
        let response = client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(url, e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_reqwest_error(url, e))?;

        if !status.is_success() {
            return Err(PaygateError::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes.to_vec())
    }

    /// Map reqwest errors to PaygateError.
    fn map_reqwest_error(&self, url: &str, e: reqwest::Error) -> PaygateError {
        if e.is_timeout() {
            PaygateError::ConnectionTimeout {
                operation: format!("POST {}", url),
                timeout_ms: self.timeout_secs * 1000,
            }
        } else {
            PaygateError::ConnectionFailed {
                target: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, content_type: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        self.send(&self.client, url, content_type, body).await
    }

    async fn post_over_tls(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>> {
        let client = self.tls_client.as_ref().ok_or_else(|| {
            PaygateError::Configuration("no client certificate loaded".to_string())
        })?;
        self.send(client, url, content_type, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientCertificate, Credentials};

    fn config() -> ClientConfig {
        ClientConfig::new(Credentials::new("A1", "M1", "K1"))
    }

    #[test]
    fn test_plain_transport_has_no_certificate() {
        let transport = HttpTransport::new(&config()).unwrap();
        assert!(!transport.has_client_certificate());
    }

    #[test]
    fn test_garbage_certificate_is_rejected() {
        let config = config().with_tls(ClientCertificate::new("not a cert", "not a key"));
        let err = HttpTransport::new(&config).err().unwrap();
        assert!(matches!(err, PaygateError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_post_over_tls_without_certificate() {
        let transport = HttpTransport::new(&config()).unwrap();
        let err = transport
            .post_over_tls("https://127.0.0.1:1/", "text/xml", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PaygateError::Configuration(_)));
    }
}
