//! Caller-facing gateway operations.
//!
//! Every operation is the same pipeline: check required fields, assemble
//! and sign, encode, post, decode, verify. Only the endpoint, the operation
//! family, the TLS requirement and the signature policy differ.

use std::sync::Arc;

use crate::assembler::{self, OperationFamily};
use crate::codec::{WireCodec, XmlCodec};
use crate::config::ClientConfig;
use crate::endpoints::Endpoint;
use crate::params::Params;
use crate::transport::Transport;
use crate::verifier::{ResponseVerifier, VerifiedResponse};
use crate::{PaygateError, Result};

#[cfg(feature = "http-transport")]
use crate::transport::HttpTransport;

const UNIFIED_ORDER_REQUIRED: &[&str] = &[
    "body",
    "out_trade_no",
    "total_fee",
    "spbill_create_ip",
    "notify_url",
    "trade_type",
];

const TRANSFER_REQUIRED: &[&str] = &["partner_trade_no", "openid", "check_name"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Channel {
    Plain,
    MutualTls,
}

/// Static description of one gateway operation.
#[derive(Clone, Copy, Debug)]
struct Operation {
    name: &'static str,
    endpoint: Endpoint,
    family: OperationFamily,
    channel: Channel,
    verify_signature: bool,
}

const UNIFIED_ORDER: Operation = Operation {
    name: "unified_order",
    endpoint: Endpoint::UnifiedOrder,
    family: OperationFamily::Standard,
    channel: Channel::Plain,
    verify_signature: true,
};

const REFUND: Operation = Operation {
    name: "refund",
    endpoint: Endpoint::Refund,
    family: OperationFamily::Standard,
    channel: Channel::MutualTls,
    verify_signature: true,
};

// The gateway does not sign transfer responses.
const TRANSFER: Operation = Operation {
    name: "transfer",
    endpoint: Endpoint::Transfers,
    family: OperationFamily::Transfer,
    channel: Channel::MutualTls,
    verify_signature: false,
};

const TRANSFER_INFO: Operation = Operation {
    name: "transfer_info",
    endpoint: Endpoint::TransferInfo,
    family: OperationFamily::TransferQuery,
    channel: Channel::MutualTls,
    verify_signature: false,
};

fn require(params: &Params, fields: &[&str]) -> Result<()> {
    match fields.iter().find(|field| params.is_blank(field)) {
        Some(field) => Err(PaygateError::missing(*field)),
        None => Ok(()),
    }
}

/// Gateway client.
///
/// Holds an immutable, shared [`ClientConfig`]; calls may run concurrently
/// from any number of tasks. To change the sign type or certificate, build
/// a new client from a new config.
///
/// # Example
///
/// ```rust,ignore
/// use paygate_lib::{ClientConfig, PayClient, Params};
///
/// let client = PayClient::new(ClientConfig::from_env()?)?;
///
/// let mut order = Params::new();
/// order.insert("body", "order1");
/// order.insert("out_trade_no", "T1001");
/// order.insert("total_fee", "100");
/// order.insert("spbill_create_ip", "1.2.3.4");
/// order.insert("notify_url", "https://example.com/notify");
/// order.insert("trade_type", "JSAPI");
///
/// let response = client.unified_order(order).await?;
/// if response.is_success() {
///     println!("prepay_id={}", response.params.value("prepay_id"));
/// }
/// ```
pub struct PayClient<T> {
    config: Arc<ClientConfig>,
    transport: T,
    codec: Arc<dyn WireCodec>,
}

#[cfg(feature = "http-transport")]
impl PayClient<HttpTransport> {
    /// Create a client posting over HTTP(S) with the configured certificate.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> PayClient<T> {
    /// Create a client over an arbitrary transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self::from_shared(Arc::new(config), transport)
    }

    /// Create a client sharing an existing configuration.
    pub fn from_shared(config: Arc<ClientConfig>, transport: T) -> Self {
        Self {
            config,
            transport,
            codec: Arc::new(XmlCodec::new()),
        }
    }

    /// Replace the wire codec.
    pub fn with_codec(mut self, codec: Arc<dyn WireCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Verifier bound to the configured sign type and secret.
    pub fn verifier(&self) -> ResponseVerifier<'_> {
        ResponseVerifier::new(self.config.sign_type, &self.config.credentials.key)
    }

    /// Assemble and sign a request without sending it.
    pub fn sign_request(&self, params: Params, family: OperationFamily) -> Result<Params> {
        assembler::fill_request(params, &self.config, family)
    }

    /// Encode a signed request the way it would go on the wire.
    pub fn encode(&self, params: &Params) -> Result<Vec<u8>> {
        self.codec.encode(params)
    }

    /// Check a parameter map's signature against the configured secret.
    pub fn sign_verify(&self, params: &Params) -> Result<bool> {
        self.verifier().sign_verify(params)
    }

    /// Decode and authenticate an asynchronously pushed notification.
    pub fn verify_notification(&self, body: &[u8]) -> Result<Params> {
        let notification = self.codec.decode(body)?;
        self.verifier().verify_notification(notification)
    }

    /// Create a unified order.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(out_trade_no = req.value("out_trade_no"))))]
    pub async fn unified_order(&self, req: Params) -> Result<VerifiedResponse> {
        require(&req, UNIFIED_ORDER_REQUIRED)?;
        self.execute(UNIFIED_ORDER, req).await
    }

    /// Request a refund. Requires a client certificate.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(out_refund_no = req.value("out_refund_no"))))]
    pub async fn refund(&self, req: Params) -> Result<VerifiedResponse> {
        self.config.require_tls(REFUND.name)?;

        if req.is_blank("transaction_id") && req.is_blank("out_trade_no") {
            return Err(PaygateError::missing("transaction_id or out_trade_no"));
        }
        require(&req, &["total_fee", "refund_fee"])?;

        self.execute(REFUND, req).await
    }

    /// Transfer to a user's wallet. Requires a client certificate.
    ///
    /// Always signed with MD5 and answered without a response signature.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, fields(partner_trade_no = req.value("partner_trade_no"))))]
    pub async fn transfer(&self, req: Params) -> Result<VerifiedResponse> {
        self.config.require_tls(TRANSFER.name)?;

        require(&req, TRANSFER_REQUIRED)?;
        if req.value("check_name") == "FORCE_CHECK" {
            require(&req, &["re_user_name"])?;
        }
        require(&req, &["amount"])?;
        if req.value("amount") == "0" {
            return Err(PaygateError::invalid("amount", "must be greater than zero"));
        }
        require(&req, &["desc", "spbill_create_ip"])?;

        self.execute(TRANSFER, req).await
    }

    /// Query a wallet transfer. Requires a client certificate.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn transfer_info(&self, partner_trade_no: &str) -> Result<VerifiedResponse> {
        self.config.require_tls(TRANSFER_INFO.name)?;

        if partner_trade_no.is_empty() {
            return Err(PaygateError::missing("partner_trade_no"));
        }
        let mut req = Params::new();
        req.insert("partner_trade_no", partner_trade_no);

        self.execute(TRANSFER_INFO, req).await
    }

    async fn execute(&self, op: Operation, req: Params) -> Result<VerifiedResponse> {
        let url = op.endpoint.url(&self.config.api_base, self.config.sandbox);
        let signed = assembler::fill_request(req, &self.config, op.family)?;
        let body = self.codec.encode(&signed)?;
        let content_type = self.codec.content_type();

        #[cfg(feature = "tracing")]
        tracing::debug!(operation = op.name, %url, "posting request");

        let raw = match op.channel {
            Channel::Plain => self.transport.post(&url, content_type, body).await?,
            Channel::MutualTls => {
                self.transport
                    .post_over_tls(&url, content_type, body)
                    .await?
            }
        };

        let response = self.codec.decode(&raw)?;
        self.verifier().verify(response, op.verify_signature)
    }
}
