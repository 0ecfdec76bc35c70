//! Gateway endpoint table.

/// Production gateway domain.
pub const DEFAULT_API_BASE: &str = "https://api.mch.weixin.qq.com";

/// Gateway API an operation is sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Create a unified order.
    UnifiedOrder,
    /// Request a refund.
    Refund,
    /// Transfer to a user wallet.
    Transfers,
    /// Query a wallet transfer.
    TransferInfo,
}

impl Endpoint {
    /// URL path for this endpoint.
    pub fn path(&self, sandbox: bool) -> &'static str {
        match (self, sandbox) {
            (Self::UnifiedOrder, false) => "/pay/unifiedorder",
            (Self::UnifiedOrder, true) => "/sandboxnew/pay/unifiedorder",
            (Self::Refund, false) => "/secapi/pay/refund",
            (Self::Refund, true) => "/sandboxnew/pay/refund",
            (Self::Transfers, false) => "/mmpaymkttransfers/promotion/transfers",
            (Self::Transfers, true) => "/sandboxnew/mmpaymkttransfers/promotion/transfers",
            (Self::TransferInfo, false) => "/mmpaymkttransfers/gettransferinfo",
            (Self::TransferInfo, true) => "/sandboxnew/mmpaymkttransfers/gettransferinfo",
        }
    }

    /// Full URL under `api_base`.
    pub fn url(&self, api_base: &str, sandbox: bool) -> String {
        format!("{}{}", api_base.trim_end_matches('/'), self.path(sandbox))
    }
}
