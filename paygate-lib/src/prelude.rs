//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use paygate_lib::prelude::*;
//! ```

// Core types
pub use crate::params::Params;
pub use crate::{ClientCertificate, ClientConfig, Credentials, SignType};

// Error handling
pub use crate::errors::{PaygateError, PaygateErrorCode};
pub use crate::Result;

// Assembly and verification
pub use crate::assembler::{fill_request, OperationFamily};
pub use crate::verifier::{BusinessStatus, ResponseVerifier, VerifiedResponse};

// Client and seams
pub use crate::client::PayClient;
pub use crate::codec::{WireCodec, XmlCodec};
pub use crate::transport::Transport;

#[cfg(feature = "http-transport")]
pub use crate::transport::HttpTransport;
