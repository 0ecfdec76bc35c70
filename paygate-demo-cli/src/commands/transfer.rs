//! Transfer commands - wallet transfer and transfer query

use anyhow::{Context, Result};

use super::Settings;
use crate::ui;

pub async fn transfer(settings: &Settings, args: &[String]) -> Result<()> {
    let client = super::connect(settings)?;
    if client.config().tls.is_none() {
        ui::info("Set PAYGATE_CERT_FILE and PAYGATE_KEY_FILE to enable transfers");
    }
    let params = super::parse_params(args)?;

    tracing::info!(
        partner_trade_no = params.value("partner_trade_no"),
        "requesting wallet transfer"
    );
    let response = client.transfer(params).await.context("Transfer failed")?;

    super::print_response(settings, "Wallet Transfer", client.config().sandbox, &response)
}

pub async fn transfer_info(settings: &Settings, partner_trade_no: &str) -> Result<()> {
    let client = super::connect(settings)?;

    let response = client
        .transfer_info(partner_trade_no)
        .await
        .with_context(|| format!("Transfer query for {} failed", partner_trade_no))?;

    if !settings.json && response.is_success() {
        ui::info(&format!(
            "Transfer {} is {}",
            partner_trade_no,
            response.get("status").unwrap_or("UNKNOWN")
        ));
    }
    super::print_response(settings, "Transfer Status", client.config().sandbox, &response)
}
