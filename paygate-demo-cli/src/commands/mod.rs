//! CLI command implementations

pub mod order;
pub mod sign;
pub mod transfer;
pub mod verify;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use paygate_lib::transport::HttpTransport;
use paygate_lib::{BusinessStatus, ClientConfig, Params, PayClient, SignType, VerifiedResponse};
use serde::Serialize;

use crate::ui;

/// Options shared by every subcommand.
pub struct Settings {
    pub config_file: Option<PathBuf>,
    pub sandbox: bool,
    pub sign_type: Option<String>,
    pub json: bool,
}

/// Load the client configuration and apply command-line overrides.
pub fn load_config(settings: &Settings) -> Result<ClientConfig> {
    let mut config = match &settings.config_file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            ClientConfig::from_json_str(&raw)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => ClientConfig::from_env()
            .context("Failed to load configuration from PAYGATE_* environment variables")?,
    };

    if settings.sandbox {
        config = config.with_sandbox(true);
    }
    if let Some(sign_type) = &settings.sign_type {
        let sign_type: SignType = sign_type.parse()?;
        config = config.with_sign_type(sign_type);
    }

    tracing::debug!(
        sandbox = config.sandbox,
        sign_type = %config.sign_type,
        api_base = %config.api_base,
        "loaded configuration"
    );
    Ok(config)
}

/// Build an HTTP-backed client from the settings.
pub fn connect(settings: &Settings) -> Result<PayClient<HttpTransport>> {
    let config = load_config(settings)?;
    PayClient::new(config).context("Failed to create gateway client")
}

/// Parse a single `key=value` argument.
pub fn parse_param(arg: &str) -> Result<(String, String)> {
    let Some((key, value)) = arg.split_once('=') else {
        bail!("Expected KEY=VALUE, got '{}'", arg);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Empty key in '{}'", arg);
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse repeated `key=value` arguments into a parameter map.
pub fn parse_params(args: &[String]) -> Result<Params> {
    let mut params = Params::new();
    for arg in args {
        let (key, value) = parse_param(arg)?;
        if params.insert(key.clone(), value).is_some() {
            ui::warning(&format!("'{}' given more than once, keeping the last value", key));
        }
    }
    Ok(params)
}

#[derive(Serialize)]
struct ResponseView<'a> {
    success: bool,
    signature_checked: bool,
    business: &'a BusinessStatus,
    fields: &'a Params,
}

/// Print a verified response.
pub fn print_response(
    settings: &Settings,
    title: &str,
    sandbox: bool,
    response: &VerifiedResponse,
) -> Result<()> {
    if settings.json {
        let view = ResponseView {
            success: response.is_success(),
            signature_checked: response.signature_checked,
            business: &response.business,
            fields: &response.params,
        };
        ui::json(&serde_json::to_value(&view)?);
        return Ok(());
    }

    ui::title(title, sandbox);
    ui::business(&response.business);
    ui::signature(response.signature_checked);
    ui::fields(&response.params);
    Ok(())
}
