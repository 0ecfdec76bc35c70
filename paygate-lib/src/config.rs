//! Client configuration.
//!
//! A [`ClientConfig`] is built once at startup and shared read-only by every
//! call. Changing the sign type or TLS material yields a new value; the
//! running client keeps the one it was constructed with.
//!
//! # Environment Variables
//!
//! [`ClientConfig::from_env`] reads:
//!
//! - `PAYGATE_APP_ID` - application identifier (required)
//! - `PAYGATE_MCH_ID` - merchant identifier (required)
//! - `PAYGATE_API_KEY` - shared signing secret (required)
//! - `PAYGATE_SIGN_TYPE` - `MD5` or `HMAC-SHA256` (default: `MD5`)
//! - `PAYGATE_SANDBOX` - `true`/`1`/`yes` to use sandbox paths
//! - `PAYGATE_API_BASE` - gateway base URL override
//! - `PAYGATE_CERT_FILE` + `PAYGATE_KEY_FILE` - PEM client certificate and key
//! - `PAYGATE_TIMEOUT_SECS` - request timeout in seconds (default: 30)

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::endpoints::DEFAULT_API_BASE;
use crate::signing::SignType;
use crate::{PaygateError, Result};

/// Account identity and shared secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Application identifier.
    pub app_id: String,
    /// Merchant identifier.
    pub mch_id: String,
    /// Shared signing secret.
    pub key: String,
}

impl Credentials {
    /// Create a new credential triple.
    pub fn new(
        app_id: impl Into<String>,
        mch_id: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            mch_id: mch_id.into(),
            key: key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("mch_id", &self.mch_id)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// PEM-encoded client certificate and private key for mutual TLS.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCertificate {
    /// Certificate chain (PEM).
    pub cert_pem: String,
    /// Private key (PEM).
    pub key_pem: String,
}

impl ClientCertificate {
    /// Wrap in-memory PEM material.
    pub fn new(cert_pem: impl Into<String>, key_pem: impl Into<String>) -> Self {
        Self {
            cert_pem: cert_pem.into(),
            key_pem: key_pem.into(),
        }
    }

    /// Load a certificate/key pair from PEM files.
    pub fn from_pem_files(cert_file: impl AsRef<Path>, key_file: impl AsRef<Path>) -> Result<Self> {
        let cert_pem = read_pem(cert_file.as_ref())?;
        let key_pem = read_pem(key_file.as_ref())?;
        Ok(Self { cert_pem, key_pem })
    }

    /// Key and certificate concatenated into a single PEM bundle.
    pub fn identity_pem(&self) -> Vec<u8> {
        let mut bundle = Vec::with_capacity(self.key_pem.len() + self.cert_pem.len() + 1);
        bundle.extend_from_slice(self.key_pem.as_bytes());
        if !self.key_pem.ends_with('\n') {
            bundle.push(b'\n');
        }
        bundle.extend_from_slice(self.cert_pem.as_bytes());
        bundle
    }
}

impl fmt::Debug for ClientCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCertificate")
            .field("cert_pem_len", &self.cert_pem.len())
            .field("key_pem", &"<redacted>")
            .finish()
    }
}

fn read_pem(path: &Path) -> Result<String> {
    let pem = std::fs::read_to_string(path).map_err(|e| {
        PaygateError::Configuration(format!("cannot read {}: {}", path.display(), e))
    })?;
    if !pem.contains("-----BEGIN") {
        return Err(PaygateError::Configuration(format!(
            "{} is not PEM encoded",
            path.display()
        )));
    }
    Ok(pem)
}

/// Immutable client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Account identity and secret.
    pub credentials: Credentials,

    /// Default signing algorithm for standard operations.
    #[serde(default)]
    pub sign_type: SignType,

    /// Use sandbox endpoint paths.
    #[serde(default)]
    pub sandbox: bool,

    /// Client certificate for operations that require mutual TLS.
    #[serde(default)]
    pub tls: Option<ClientCertificate>,

    /// Gateway base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl ClientConfig {
    /// Create a configuration with MD5 signing against production.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            sign_type: SignType::default(),
            sandbox: false,
            tls: None,
            api_base: default_api_base(),
            timeout_secs: default_timeout(),
        }
    }

    /// Set the signing algorithm.
    pub fn with_sign_type(mut self, sign_type: SignType) -> Self {
        self.sign_type = sign_type;
        self
    }

    /// Toggle sandbox endpoints.
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Set the mutual TLS client certificate.
    pub fn with_tls(mut self, certificate: ClientCertificate) -> Self {
        self.tls = Some(certificate);
        self
    }

    /// Load the mutual TLS client certificate from PEM files.
    pub fn with_tls_files(
        self,
        cert_file: impl AsRef<Path>,
        key_file: impl AsRef<Path>,
    ) -> Result<Self> {
        let certificate = ClientCertificate::from_pem_files(cert_file, key_file)?;
        Ok(self.with_tls(certificate))
    }

    /// Override the gateway base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// The configured client certificate, or a configuration error naming
    /// the operation that needed it.
    pub fn require_tls(&self, operation: &str) -> Result<&ClientCertificate> {
        self.tls.as_ref().ok_or_else(|| {
            PaygateError::Configuration(format!(
                "{} requires a client certificate; configure TLS first",
                operation
            ))
        })
    }

    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| PaygateError::Configuration(format!("{} is not set", name)))
        };

        let credentials = Credentials::new(
            required("PAYGATE_APP_ID")?,
            required("PAYGATE_MCH_ID")?,
            required("PAYGATE_API_KEY")?,
        );
        let mut config = Self::new(credentials);

        if let Some(sign_type) = lookup("PAYGATE_SIGN_TYPE") {
            config = config.with_sign_type(sign_type.parse()?);
        }

        if let Some(sandbox) = lookup("PAYGATE_SANDBOX") {
            config = config.with_sandbox(parse_flag(&sandbox));
        }

        if let Some(api_base) = lookup("PAYGATE_API_BASE") {
            config = config.with_api_base(api_base);
        }

        if let Some(timeout) = lookup("PAYGATE_TIMEOUT_SECS") {
            let secs = timeout.parse::<u64>().map_err(|_| {
                PaygateError::Configuration(format!(
                    "PAYGATE_TIMEOUT_SECS is not a number: {}",
                    timeout
                ))
            })?;
            config = config.with_timeout(secs);
        }

        match (lookup("PAYGATE_CERT_FILE"), lookup("PAYGATE_KEY_FILE")) {
            (Some(cert), Some(key)) => config = config.with_tls_files(cert, key)?,
            (None, None) => {}
            _ => {
                return Err(PaygateError::Configuration(
                    "PAYGATE_CERT_FILE and PAYGATE_KEY_FILE must be set together".to_string(),
                ))
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.credentials.app_id.is_empty() {
            return Err(PaygateError::Configuration("app_id cannot be empty".into()));
        }
        if self.credentials.mch_id.is_empty() {
            return Err(PaygateError::Configuration("mch_id cannot be empty".into()));
        }
        if self.credentials.key.is_empty() {
            return Err(PaygateError::Configuration("key cannot be empty".into()));
        }
        Ok(())
    }
}

fn parse_flag(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
