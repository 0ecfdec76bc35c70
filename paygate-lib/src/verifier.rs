//! Response verification.
//!
//! A decoded response passes through three tiers, each a terminal decision:
//!
//! 1. **Transport**: `return_code` must be `SUCCESS`, otherwise
//!    [`PaygateError::Transport`] is returned and nothing else is inspected.
//! 2. **Business**: `result_code=FAIL` is a valid answer and returns
//!    [`BusinessStatus::Failed`]; `SUCCESS` continues; anything else is
//!    [`PaygateError::UnknownResult`].
//! 3. **Signature**: only on business success and only when requested, the
//!    `sign` field is recomputed and compared ignoring case. A passed check
//!    returns the fields without `sign`.

use serde::{Deserialize, Serialize};

use crate::params::Params;
use crate::signing::{self, SignType};
use crate::{PaygateError, Result};

/// Success token for `return_code` and `result_code`.
pub const SUCCESS: &str = "SUCCESS";
/// Failure token for `result_code`.
pub const FAIL: &str = "FAIL";

/// Protocol status field.
pub const RETURN_CODE: &str = "return_code";
/// Protocol status message.
pub const RETURN_MSG: &str = "return_msg";
/// Business result field.
pub const RESULT_CODE: &str = "result_code";
/// Business error code.
pub const ERR_CODE: &str = "err_code";
/// Business error description.
pub const ERR_CODE_DES: &str = "err_code_des";

/// Outcome of the business tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BusinessStatus {
    /// The operation succeeded.
    Success,
    /// The gateway declined or failed the operation.
    Failed {
        /// Value of `err_code`
        err_code: String,
        /// Value of `err_code_des`
        err_code_des: String,
    },
}

/// A response that passed every applicable tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedResponse {
    /// Response fields, unknown keys included. `sign` is dropped once the
    /// signature tier has passed.
    pub params: Params,
    /// Business outcome; callers must branch on it.
    pub business: BusinessStatus,
    /// Whether the signature tier ran (and passed).
    pub signature_checked: bool,
}

impl VerifiedResponse {
    /// True when the business tier reported success.
    pub fn is_success(&self) -> bool {
        self.business == BusinessStatus::Success
    }

    /// Shortcut for a response field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }
}

/// Verifies responses and notifications against one secret and algorithm.
#[derive(Clone, Copy, Debug)]
pub struct ResponseVerifier<'a> {
    sign_type: SignType,
    key: &'a str,
}

impl<'a> ResponseVerifier<'a> {
    /// Create a verifier for the given algorithm and shared secret.
    pub fn new(sign_type: SignType, key: &'a str) -> Self {
        Self { sign_type, key }
    }

    /// Recompute the signature over every field but `sign` and compare it
    /// with the supplied one, ignoring case.
    ///
    /// Usable on its own for asynchronously pushed notifications.
    pub fn sign_verify(&self, params: &Params) -> Result<bool> {
        signing::verify(params, self.sign_type, self.key)
    }

    /// Run the three-tier state machine over a decoded response.
    ///
    /// # Example
    ///
    /// ```
    /// use paygate_lib::verifier::{BusinessStatus, ResponseVerifier};
    /// use paygate_lib::signing::SignType;
    /// use paygate_lib::Params;
    ///
    /// let response: Params = [
    ///     ("return_code", "SUCCESS"),
    ///     ("result_code", "FAIL"),
    ///     ("err_code", "NOTENOUGH"),
    /// ]
    /// .into_iter()
    /// .collect();
    ///
    /// let verified = ResponseVerifier::new(SignType::Md5, "K1")
    ///     .verify(response, true)
    ///     .unwrap();
    /// assert!(matches!(verified.business, BusinessStatus::Failed { .. }));
    /// ```
    pub fn verify(&self, response: Params, require_signature: bool) -> Result<VerifiedResponse> {
        if response.value(RETURN_CODE) != SUCCESS {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                return_code = response.value(RETURN_CODE),
                return_msg = response.value(RETURN_MSG),
                "gateway rejected request"
            );
            return Err(PaygateError::Transport {
                code: response.value(RETURN_CODE).to_string(),
                message: response.value(RETURN_MSG).to_string(),
            });
        }

        let result_code = response.value(RESULT_CODE).to_string();
        match result_code.as_str() {
            FAIL => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    err_code = response.value(ERR_CODE),
                    "business result failed"
                );
                let business = BusinessStatus::Failed {
                    err_code: response.value(ERR_CODE).to_string(),
                    err_code_des: response.value(ERR_CODE_DES).to_string(),
                };
                Ok(VerifiedResponse {
                    params: response,
                    business,
                    signature_checked: false,
                })
            }
            SUCCESS if require_signature => {
                if !self.sign_verify(&response)? {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("response signature mismatch");
                    return Err(PaygateError::SignatureMismatch {
                        fields: response.without_sign(),
                    });
                }
                Ok(VerifiedResponse {
                    params: response.without_sign(),
                    business: BusinessStatus::Success,
                    signature_checked: true,
                })
            }
            SUCCESS => Ok(VerifiedResponse {
                params: response,
                business: BusinessStatus::Success,
                signature_checked: false,
            }),
            other => Err(PaygateError::UnknownResult {
                code: other.to_string(),
                description: response.value(ERR_CODE_DES).to_string(),
            }),
        }
    }

    /// Check a pushed notification's signature; mismatch is an error.
    ///
    /// The returned map no longer carries `sign`.
    pub fn verify_notification(&self, notification: Params) -> Result<Params> {
        if self.sign_verify(&notification)? {
            Ok(notification.without_sign())
        } else {
            Err(PaygateError::SignatureMismatch {
                fields: notification.without_sign(),
            })
        }
    }
}
