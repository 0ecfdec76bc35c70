//! Canonicalization and keyed-hash signatures.
//!
//! The canonical form of a parameter map is every non-empty field except
//! `sign`, sorted by key, rendered as `k1=v1&k2=v2`, followed by
//! `&key=<shared secret>`. The digest of that string under the selected
//! algorithm, as uppercase hex, is the signature.
//!
//! Two maps that are field-for-field identical (ignoring `sign`) always
//! produce the same signature under the same secret and algorithm.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::params::{Params, SIGN};
use crate::{PaygateError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Signing algorithm selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignType {
    /// MD5 over the canonical string (gateway default).
    #[default]
    #[serde(rename = "MD5")]
    Md5,
    /// HMAC-SHA256 keyed with the shared secret.
    #[serde(rename = "HMAC-SHA256")]
    HmacSha256,
}

impl SignType {
    /// Wire value carried in the `sign_type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::HmacSha256 => "HMAC-SHA256",
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignType {
    type Err = PaygateError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("MD5") {
            Ok(Self::Md5)
        } else if s.eq_ignore_ascii_case("HMAC-SHA256") {
            Ok(Self::HmacSha256)
        } else {
            Err(PaygateError::Signing(format!(
                "unsupported sign type: {}",
                s
            )))
        }
    }
}

/// Render the canonical string that gets hashed.
///
/// Contains the shared secret, so never log the result.
pub fn canonical_string(params: &Params, key: &str) -> String {
    let mut out = String::new();
    for (k, v) in params.iter() {
        if k == SIGN || v.is_empty() {
            continue;
        }
        out.push_str(k);
        out.push('=');
        out.push_str(v);
        out.push('&');
    }
    out.push_str("key=");
    out.push_str(key);
    out
}

/// Compute the signature of `params` (ignoring any `sign` field).
///
/// # Example
///
/// ```
/// use paygate_lib::signing::{sign, SignType};
/// use paygate_lib::Params;
///
/// let params: Params = [
///     ("appid", "wxd930ea5d5a258f4f"),
///     ("body", "test"),
///     ("device_info", "1000"),
///     ("mch_id", "10000100"),
///     ("nonce_str", "ibuaiVcKdpRxkhJA"),
/// ]
/// .into_iter()
/// .collect();
///
/// let signature = sign(&params, SignType::Md5, "192006250b4c09247ec02edce69f6a2d").unwrap();
/// assert_eq!(signature, "9A0A8659F005D6984697E2CA0A9CF3B7");
/// ```
pub fn sign(params: &Params, sign_type: SignType, key: &str) -> Result<String> {
    let canonical = canonical_string(params, key);
    match sign_type {
        SignType::Md5 => Ok(hex::encode_upper(md5::compute(canonical.as_bytes()).0)),
        SignType::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(key.as_bytes())
                .map_err(|e| PaygateError::Signing(format!("invalid HMAC key: {}", e)))?;
            mac.update(canonical.as_bytes());
            Ok(hex::encode_upper(mac.finalize().into_bytes()))
        }
    }
}

/// Recompute the signature of `params` and compare it, ignoring ASCII case,
/// with the `sign` field it carries.
///
/// A map without a `sign` field never matches.
pub fn verify(params: &Params, sign_type: SignType, key: &str) -> Result<bool> {
    let expected = sign(params, sign_type, key)?;
    Ok(params
        .get(SIGN)
        .is_some_and(|supplied| supplied.eq_ignore_ascii_case(&expected)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC_KEY: &str = "192006250b4c09247ec02edce69f6a2d";

    fn doc_params() -> Params {
        [
            ("appid", "wxd930ea5d5a258f4f"),
            ("mch_id", "10000100"),
            ("device_info", "1000"),
            ("body", "test"),
            ("nonce_str", "ibuaiVcKdpRxkhJA"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_canonical_string() {
        assert_eq!(
            canonical_string(&doc_params(), DOC_KEY),
            "appid=wxd930ea5d5a258f4f&body=test&device_info=1000&mch_id=10000100\
             &nonce_str=ibuaiVcKdpRxkhJA&key=192006250b4c09247ec02edce69f6a2d"
        );
    }

    #[test]
    fn test_canonical_skips_sign_and_empty_values() {
        let mut params = doc_params();
        params.insert("sign", "WHATEVER");
        params.insert("attach", "");

        assert_eq!(
            canonical_string(&params, DOC_KEY),
            canonical_string(&doc_params(), DOC_KEY)
        );
    }

    #[test]
    fn test_canonical_of_empty_map() {
        assert_eq!(canonical_string(&Params::new(), "K1"), "key=K1");
    }

    #[test]
    fn test_md5_vector() {
        assert_eq!(
            sign(&doc_params(), SignType::Md5, DOC_KEY).unwrap(),
            "9A0A8659F005D6984697E2CA0A9CF3B7"
        );
    }

    #[test]
    fn test_hmac_sha256_vector() {
        assert_eq!(
            sign(&doc_params(), SignType::HmacSha256, DOC_KEY).unwrap(),
            "6A9AE1657590FD6257D693A078E1C3E4BB6BA4DC30B23E0EE2496E54170DACD6"
        );
    }

    #[test]
    fn test_verify_is_case_insensitive() {
        let mut params = doc_params();
        params.insert("sign", "9a0a8659f005d6984697e2ca0a9cf3b7");
        assert!(verify(&params, SignType::Md5, DOC_KEY).unwrap());
    }

    #[test]
    fn test_verify_wrong_key_or_algorithm() {
        let mut params = doc_params();
        params.insert("sign", "9A0A8659F005D6984697E2CA0A9CF3B7");

        assert!(!verify(&params, SignType::Md5, "other-key").unwrap());
        assert!(!verify(&params, SignType::HmacSha256, DOC_KEY).unwrap());
    }

    #[test]
    fn test_verify_without_sign_field() {
        assert!(!verify(&doc_params(), SignType::Md5, DOC_KEY).unwrap());
    }

    #[test]
    fn test_sign_type_parsing() {
        assert_eq!("MD5".parse::<SignType>().unwrap(), SignType::Md5);
        assert_eq!(
            "hmac-sha256".parse::<SignType>().unwrap(),
            SignType::HmacSha256
        );

        let err = "SHA1".parse::<SignType>().unwrap_err();
        assert!(matches!(err, PaygateError::Signing(_)));
    }

    #[test]
    fn test_sign_type_serde_uses_wire_names() {
        let json = serde_json::to_string(&SignType::HmacSha256).unwrap();
        assert_eq!(json, "\"HMAC-SHA256\"");
        assert_eq!(SignType::default(), SignType::Md5);
    }
}
