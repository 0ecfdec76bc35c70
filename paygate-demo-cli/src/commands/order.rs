//! Order commands - unified order and refund

use anyhow::{Context, Result};

use super::Settings;
use crate::ui;

pub async fn unified_order(settings: &Settings, args: &[String]) -> Result<()> {
    let client = super::connect(settings)?;
    let params = super::parse_params(args)?;

    tracing::info!(out_trade_no = params.value("out_trade_no"), "creating unified order");
    let response = client
        .unified_order(params)
        .await
        .context("Unified order failed")?;

    super::print_response(settings, "Unified Order", client.config().sandbox, &response)
}

pub async fn refund(settings: &Settings, args: &[String]) -> Result<()> {
    let client = super::connect(settings)?;
    if client.config().tls.is_none() {
        ui::info("Set PAYGATE_CERT_FILE and PAYGATE_KEY_FILE to enable refunds");
    }
    let params = super::parse_params(args)?;

    tracing::info!(out_refund_no = params.value("out_refund_no"), "requesting refund");
    let response = client.refund(params).await.context("Refund failed")?;

    super::print_response(settings, "Refund", client.config().sandbox, &response)
}
