//! Paygate library.
//!
//! Client side of a signed request/response protocol for a merchant payment
//! gateway. The crate owns the message authentication scheme; HTTP and the
//! wire format sit behind the [`Transport`] and [`codec::WireCodec`] traits.
//!
//! # Features
//!
//! - **Request assembly**: identity fields, per-request nonce, and a
//!   deterministic MD5 or HMAC-SHA256 signature over the canonical field set
//! - **Response verification**: transport, business and signature tiers with
//!   typed failures; a declined business result is a value, not an error
//! - **Notification checks**: standalone signature verification for pushed
//!   callbacks
//! - **Mutual TLS**: refunds and wallet transfers present a client certificate
//!
//! # Example
//!
//! ```
//! use paygate_lib::assembler::{fill_request, OperationFamily};
//! use paygate_lib::verifier::ResponseVerifier;
//! use paygate_lib::{ClientConfig, Credentials, Params, SignType};
//!
//! let config = ClientConfig::new(Credentials::new("A1", "M1", "K1"));
//!
//! let mut order = Params::new();
//! order.insert("out_trade_no", "T1001");
//! order.insert("total_fee", "100");
//!
//! let signed = fill_request(order, &config, OperationFamily::Standard).unwrap();
//!
//! let verifier = ResponseVerifier::new(SignType::Md5, "K1");
//! assert!(verifier.sign_verify(&signed).unwrap());
//! ```

pub mod assembler;
pub mod client;
pub mod codec;
pub mod config;
pub mod endpoints;
pub mod errors;
pub mod nonce;
pub mod params;
pub mod prelude;
pub mod signing;
pub mod transport;
pub mod verifier;

pub use client::PayClient;
pub use config::{ClientCertificate, ClientConfig, Credentials};
pub use errors::{PaygateError, PaygateErrorCode};
pub use params::Params;
pub use signing::SignType;
pub use transport::Transport;
pub use verifier::{BusinessStatus, VerifiedResponse};

#[cfg(feature = "http-transport")]
pub use transport::HttpTransport;

/// Common result alias for gateway operations.
pub type Result<T> = std::result::Result<T, PaygateError>;
