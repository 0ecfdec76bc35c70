//! Error types for gateway operations.
//!
//! The variants mirror the failure tiers of a gateway call: call-site
//! parameter checks, signing, the three verification tiers, configuration,
//! and the network/codec plumbing underneath.
//!
//! A business-level failure (`result_code=FAIL`) is *not* an error. It is
//! reported through [`crate::verifier::BusinessStatus`].

use thiserror::Error;

use crate::params::Params;

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PaygateErrorCode {
    /// A required request field was not supplied
    MissingParameter = 1000,
    /// A request field holds an unusable value
    InvalidParameter = 1001,
    /// Signature computation failed
    Signing = 2000,
    /// Gateway rejected the request at protocol level
    Transport = 3000,
    /// Unrecognised business result code
    UnknownResult = 3001,
    /// Response signature did not match
    SignatureMismatch = 3002,
    /// Client configuration is missing or unusable
    Configuration = 4000,
    /// Connection failed
    ConnectionFailed = 5000,
    /// Connection timeout
    ConnectionTimeout = 5001,
    /// Non-success HTTP status
    Http = 5002,
    /// Wire encoding/decoding error
    Codec = 6000,
}

/// Comprehensive error type for gateway operations.
#[derive(Debug, Error)]
pub enum PaygateError {
    /// A business-required field was omitted by the caller.
    #[error("missing required parameter: {field}")]
    MissingParameter {
        /// Field name
        field: String,
    },

    /// A field was present but its value cannot be sent.
    #[error("invalid {field}: {reason}")]
    InvalidParameter {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The keyed-hash computation could not run.
    #[error("signing error: {0}")]
    Signing(String),

    /// `return_code` did not indicate success.
    #[error("gateway rejected request: {code}_{message}")]
    Transport {
        /// Value of `return_code`
        code: String,
        /// Value of `return_msg`
        message: String,
    },

    /// `result_code` was neither `SUCCESS` nor `FAIL`.
    #[error("unknown result: {code}_{description}")]
    UnknownResult {
        /// Value of `result_code`
        code: String,
        /// Value of `err_code_des`
        description: String,
    },

    /// The recomputed signature differs from the supplied `sign`.
    #[error("sign not match [{fields}]")]
    SignatureMismatch {
        /// Snapshot of the fields the signature was checked against
        fields: Params,
    },

    /// The client is not configured for the requested operation.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection failed.
    #[error("connection to {target} failed: {reason}")]
    ConnectionFailed {
        /// Target URL
        target: String,
        /// Underlying error message
        reason: String,
    },

    /// Connection timeout.
    #[error("{operation} timed out after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// The gateway answered with a non-success HTTP status.
    #[error("gateway returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        body: String,
    },

    /// Wire encoding/decoding error.
    #[error("codec error: {0}")]
    Codec(String),
}

impl PaygateError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> PaygateErrorCode {
        match self {
            Self::MissingParameter { .. } => PaygateErrorCode::MissingParameter,
            Self::InvalidParameter { .. } => PaygateErrorCode::InvalidParameter,
            Self::Signing(_) => PaygateErrorCode::Signing,
            Self::Transport { .. } => PaygateErrorCode::Transport,
            Self::UnknownResult { .. } => PaygateErrorCode::UnknownResult,
            Self::SignatureMismatch { .. } => PaygateErrorCode::SignatureMismatch,
            Self::Configuration(_) => PaygateErrorCode::Configuration,
            Self::ConnectionFailed { .. } => PaygateErrorCode::ConnectionFailed,
            Self::ConnectionTimeout { .. } => PaygateErrorCode::ConnectionTimeout,
            Self::Http { .. } => PaygateErrorCode::Http,
            Self::Codec(_) => PaygateErrorCode::Codec,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns true if the failure happened below the protocol and a caller
    /// may reasonably try again. The library itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::ConnectionTimeout { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Create a missing parameter error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingParameter {
            field: field.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a codec error from any displayable error.
    pub fn codec<E: std::fmt::Display>(err: E) -> Self {
        Self::Codec(err.to_string())
    }
}

impl From<serde_json::Error> for PaygateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}
