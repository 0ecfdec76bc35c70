//! Request assembly: identity fields, nonce and signature.
//!
//! The assembler does not know which business fields an operation needs;
//! those are checked by the caller-facing operations in [`crate::client`].
//! It only injects the fields that make a request attributable and
//! tamper-evident.

use crate::config::ClientConfig;
use crate::params::{Params, SIGN};
use crate::signing::{self, SignType};
use crate::{nonce, Result};

/// Field carrying the nonce.
pub const NONCE_STR: &str = "nonce_str";
/// Field carrying the algorithm tag.
pub const SIGN_TYPE: &str = "sign_type";

/// Gateway API family; decides identity field names and signing rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationFamily {
    /// Ordinary payment APIs (orders, refunds).
    Standard,
    /// Wallet transfer API.
    Transfer,
    /// Wallet transfer query API.
    TransferQuery,
}

/// Row of the fixed per-family lookup table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FamilyProfile {
    /// Field name for the application identifier.
    pub app_field: &'static str,
    /// Field name for the merchant identifier.
    pub merchant_field: &'static str,
    /// Whether the request carries a `sign_type` tag.
    pub tags_sign_type: bool,
    /// Algorithm forced by the gateway, if any.
    pub fixed_sign_type: Option<SignType>,
}

impl OperationFamily {
    /// Lookup table row for this family.
    pub const fn profile(self) -> FamilyProfile {
        match self {
            Self::Standard => FamilyProfile {
                app_field: "appid",
                merchant_field: "mch_id",
                tags_sign_type: true,
                fixed_sign_type: None,
            },
            Self::Transfer => FamilyProfile {
                app_field: "mch_appid",
                merchant_field: "mchid",
                tags_sign_type: false,
                fixed_sign_type: Some(SignType::Md5),
            },
            Self::TransferQuery => FamilyProfile {
                app_field: "appid",
                merchant_field: "mch_id",
                tags_sign_type: false,
                fixed_sign_type: None,
            },
        }
    }

    /// Algorithm used for this family given the configured default.
    pub fn sign_type(self, configured: SignType) -> SignType {
        self.profile().fixed_sign_type.unwrap_or(configured)
    }
}

/// Fill identity fields, a fresh nonce, and the signature.
///
/// Existing values for the injected fields are overwritten; every other
/// field passes through untouched.
///
/// # Example
///
/// ```
/// use paygate_lib::assembler::{fill_request, OperationFamily};
/// use paygate_lib::{ClientConfig, Credentials, Params};
///
/// let config = ClientConfig::new(Credentials::new("A1", "M1", "K1"));
/// let mut params = Params::new();
/// params.insert("out_trade_no", "T1001");
///
/// let signed = fill_request(params, &config, OperationFamily::Standard).unwrap();
/// assert_eq!(signed.get("appid"), Some("A1"));
/// assert_eq!(signed.get("mch_id"), Some("M1"));
/// assert_eq!(signed.value("nonce_str").len(), 24);
/// assert!(signed.contains_key("sign"));
/// ```
pub fn fill_request(params: Params, config: &ClientConfig, family: OperationFamily) -> Result<Params> {
    fill_request_with_nonce(params, config, family, nonce::generate())
}

/// [`fill_request`] with a caller-supplied nonce.
pub fn fill_request_with_nonce(
    mut params: Params,
    config: &ClientConfig,
    family: OperationFamily,
    nonce: String,
) -> Result<Params> {
    let profile = family.profile();
    let sign_type = family.sign_type(config.sign_type);
    let credentials = &config.credentials;

    params.insert(profile.app_field, credentials.app_id.as_str());
    params.insert(profile.merchant_field, credentials.mch_id.as_str());
    if profile.tags_sign_type {
        params.insert(SIGN_TYPE, sign_type.as_str());
    }
    params.insert(NONCE_STR, nonce);

    let signature = signing::sign(&params, sign_type, &credentials.key)?;
    params.insert(SIGN, signature);

    #[cfg(feature = "tracing")]
    tracing::debug!(?family, %sign_type, fields = params.len(), "request signed");

    Ok(params)
}
